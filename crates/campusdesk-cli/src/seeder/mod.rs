//! Fake data for local development.
//!
//! Everything seeded is recognizable afterwards: users by
//! [`SEED_PHONE_PREFIX`], courses and groups by [`SEED_MARKER`] in their
//! descriptions. [`clear_all`] removes exactly that and never touches admins.

pub mod courses;
pub mod models;
pub mod people;

use campusdesk_auth::Role;
use sqlx::SqlitePool;
use std::time::Instant;

pub use models::{SEED_MARKER, SEED_PHONE_PREFIX, SeedConfig};

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "Password123";

pub async fn seed_all(db: &SqlitePool, config: SeedConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    println!(
        "🌱 Seeding {} courses, {} groups, {} users...",
        config.courses,
        config.total_groups(),
        config.total_users()
    );

    let mut seq: usize = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE phone LIKE ? || '%'",
    )
    .bind(SEED_PHONE_PREFIX)
    .fetch_one(db)
    .await?
    .try_into()?;

    let staff = people::seed_people(db, Role::Staff, config.staff, seq, SEED_PASSWORD).await?;
    seq += staff.len();

    let teacher_users =
        people::seed_people(db, Role::Teacher, config.teachers, seq, SEED_PASSWORD).await?;
    seq += teacher_users.len();
    let teachers = people::insert_teachers(db, &teacher_users).await?;

    let courses = courses::insert_courses(db, &courses::generate_courses(config.courses)).await?;
    let groups = courses::insert_groups(
        db,
        &courses,
        config.groups_per_course,
        &teachers,
        &format!("S{seq}"),
    )
    .await?;
    println!("   ✓ Inserted {} courses and {} groups", courses.len(), groups.len());

    let student_users =
        people::seed_people(db, Role::Student, config.total_students(), seq, SEED_PASSWORD)
            .await?;
    let students = people::insert_students(db, &student_users, &groups).await?;
    println!("   ✓ Created {students} student profiles");

    println!("✅ Seeding finished in {:?}", start.elapsed());
    println!("   Seeded accounts use the password {SEED_PASSWORD}");
    Ok(())
}

/// Deletes seeded groups, courses and non-admin users. Profiles go with
/// their users through `ON DELETE CASCADE`.
pub async fn clear_all(db: &SqlitePool) -> anyhow::Result<()> {
    let start = Instant::now();
    println!("🗑️  Clearing seeded data...");
    let mut tx = db.begin().await?;

    let groups = sqlx::query("DELETE FROM study_groups WHERE descriptions = ?")
        .bind(SEED_MARKER)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let courses = sqlx::query("DELETE FROM courses WHERE descriptions = ?")
        .bind(SEED_MARKER)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let users = sqlx::query("DELETE FROM users WHERE phone LIKE ? || '%' AND role != ?")
        .bind(SEED_PHONE_PREFIX)
        .bind(Role::Admin)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    println!(
        "   ✓ Deleted {groups} groups, {courses} courses, {users} users in {:?}",
        start.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SeedConfig {
        SeedConfig {
            courses: 2,
            groups_per_course: 2,
            students_per_group: 3,
            teachers: 2,
            staff: 1,
        }
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_seed_then_clear(pool: SqlitePool) {
        seed_all(&pool, small()).await.unwrap();
        assert_eq!(count(&pool, "users").await, 15);
        assert_eq!(count(&pool, "students").await, 12);
        assert_eq!(count(&pool, "teachers").await, 2);
        assert_eq!(count(&pool, "study_groups").await, 4);
        assert_eq!(count(&pool, "group_teachers").await, 4);

        clear_all(&pool).await.unwrap();
        assert_eq!(count(&pool, "users").await, 0);
        assert_eq!(count(&pool, "students").await, 0);
        assert_eq!(count(&pool, "courses").await, 0);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_seed_twice_does_not_collide(pool: SqlitePool) {
        seed_all(&pool, small()).await.unwrap();
        seed_all(&pool, small()).await.unwrap();
        assert_eq!(count(&pool, "users").await, 30);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_clear_keeps_admins(pool: SqlitePool) {
        crate::superuser::create_superuser(&pool, "+998990999999", None, "Secret123")
            .await
            .unwrap();
        seed_all(&pool, small()).await.unwrap();
        clear_all(&pool).await.unwrap();
        assert_eq!(count(&pool, "users").await, 1);
    }
}
