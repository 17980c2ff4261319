use campusdesk_cli::seeder::{self, SeedConfig};
use campusdesk_cli::superuser::create_superuser;
use campusdesk_config::DatabaseConfig;
use campusdesk_db::{init_db_pool, run_migrations};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::SqlitePool;

#[derive(Parser)]
#[command(name = "campusdesk-cli")]
#[command(about = "Administrative tools for campusdesk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    CreateSuperuser {
        /// Phone number, e.g. +998901234567
        #[arg(short = 'p', long)]
        phone: Option<String>,

        /// Full name
        #[arg(short = 'n', long)]
        full_name: Option<String>,

        /// Password (prompted securely if not provided)
        #[arg(long)]
        password: Option<String>,
    },
    /// Seed the database with fake courses, groups, staff, teachers and students
    Seed {
        /// Number of courses to create
        #[arg(short = 'c', long, default_value = "4")]
        courses: usize,

        /// Number of groups per course
        #[arg(short = 'g', long, default_value = "2")]
        groups: usize,

        /// Number of students per group
        #[arg(short = 's', long, default_value = "12")]
        students: usize,

        /// Number of teachers
        #[arg(short = 't', long, default_value = "6")]
        teachers: usize,

        /// Number of staff users
        #[arg(long, default_value = "2")]
        staff: usize,
    },
    /// Remove all seeded data (admins are kept)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match connect().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to open database: {e:#}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::CreateSuperuser {
            phone,
            full_name,
            password,
        } => handle_create_superuser(&pool, phone, full_name, password).await,
        Commands::Seed {
            courses,
            groups,
            students,
            teachers,
            staff,
        } => {
            let config = SeedConfig {
                courses,
                groups_per_course: groups,
                students_per_group: students,
                teachers,
                staff,
            };
            seeder::seed_all(&pool, config).await
        }
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    };

    if let Err(e) = result {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
}

async fn connect() -> anyhow::Result<SqlitePool> {
    let pool = init_db_pool(&DatabaseConfig::from_env()).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

async fn handle_create_superuser(
    pool: &SqlitePool,
    phone: Option<String>,
    full_name: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let phone = match phone {
        Some(phone) => phone,
        None => Input::new().with_prompt("Phone number").interact_text()?,
    };

    let full_name = match full_name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Full name")
            .allow_empty(true)
            .interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let full_name = Some(full_name.trim()).filter(|name| !name.is_empty());
    let user_id = create_superuser(pool, &phone, full_name, &password).await?;

    println!("\n✅ Superuser created successfully!");
    println!("   Id: {user_id}");
    println!("   Phone: {phone}");
    Ok(())
}
