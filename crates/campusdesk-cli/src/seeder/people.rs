//! Fake users with their student and teacher profiles.

use anyhow::Context;
use campusdesk_auth::Role;
use campusdesk_core::hash_password;
use campusdesk_models::{GroupId, TeacherId, UserId};
use chrono::Utc;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::time::Instant;

use super::models::{PersonSeed, seed_phone};

// 7 binds per row, under SQLite's 32766 variable limit.
const BATCH_SIZE: usize = 1000;

pub fn generate_people(role: Role, count: usize, first_seq: usize) -> Vec<PersonSeed> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            PersonSeed {
                phone: seed_phone(first_seq + i),
                full_name: format!("{first} {last}"),
                role,
            }
        })
        .collect()
}

/// Inserts users in batches inside one transaction and returns their ids in
/// input order.
pub async fn insert_users(
    db: &SqlitePool,
    people: &[PersonSeed],
    password: &str,
) -> anyhow::Result<Vec<UserId>> {
    let password_hash = hash_password(password).map_err(|e| e.error)?;
    let now = Utc::now();
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(people.len());

    for chunk in people.chunks(BATCH_SIZE) {
        let mut query = QueryBuilder::<Sqlite>::new(
            "INSERT INTO users (phone, password, full_name, role, is_active, created_at, updated_at) ",
        );
        query.push_values(chunk, |mut row, person| {
            row.push_bind(&person.phone)
                .push_bind(&password_hash)
                .push_bind(&person.full_name)
                .push_bind(person.role)
                .push_bind(true)
                .push_bind(now)
                .push_bind(now);
        });
        query.push(" RETURNING id");

        let chunk_ids: Vec<UserId> = query
            .build_query_scalar()
            .fetch_all(&mut *tx)
            .await
            .context("inserting seeded users")?;
        ids.extend(chunk_ids);
    }

    tx.commit().await?;
    Ok(ids)
}

pub async fn insert_teachers(db: &SqlitePool, users: &[UserId]) -> anyhow::Result<Vec<TeacherId>> {
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(users.len());
    for chunk in users.chunks(BATCH_SIZE) {
        let mut query = QueryBuilder::<Sqlite>::new("INSERT INTO teachers (user_id, description) ");
        query.push_values(chunk, |mut row, user_id| {
            row.push_bind(*user_id).push_bind("Seeded teacher");
        });
        query.push(" RETURNING id");
        let chunk_ids: Vec<TeacherId> = query.build_query_scalar().fetch_all(&mut *tx).await?;
        ids.extend(chunk_ids);
    }
    tx.commit().await?;
    Ok(ids)
}

/// One student row per user, spread round-robin over `groups`.
pub async fn insert_students(
    db: &SqlitePool,
    users: &[UserId],
    groups: &[GroupId],
) -> anyhow::Result<u64> {
    let now = Utc::now();
    let mut tx = db.begin().await?;
    let mut inserted = 0;

    let rows: Vec<(UserId, Option<GroupId>)> = users
        .iter()
        .enumerate()
        .map(|(i, user_id)| {
            let group = (!groups.is_empty()).then(|| groups[i % groups.len()]);
            (*user_id, group)
        })
        .collect();

    for chunk in rows.chunks(BATCH_SIZE) {
        inserted += insert_student_chunk(&mut tx, chunk, now).await?;
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn insert_student_chunk(
    conn: &mut SqliteConnection,
    rows: &[(UserId, Option<GroupId>)],
    now: chrono::DateTime<Utc>,
) -> anyhow::Result<u64> {
    let mut query = QueryBuilder::<Sqlite>::new(
        "INSERT INTO students (user_id, group_id, is_line, is_active, created_at, updated_at) ",
    );
    query.push_values(rows, |mut row, (user_id, group_id)| {
        row.push_bind(*user_id)
            .push_bind(*group_id)
            .push_bind(false)
            .push_bind(true)
            .push_bind(now)
            .push_bind(now);
    });
    Ok(query.build().execute(conn).await?.rows_affected())
}

pub async fn seed_people(
    db: &SqlitePool,
    role: Role,
    count: usize,
    first_seq: usize,
    password: &str,
) -> anyhow::Result<Vec<UserId>> {
    let start = Instant::now();
    let people = generate_people(role, count, first_seq);
    let ids = insert_users(db, &people, password).await?;
    println!("   ✓ Inserted {} {} users in {:?}", ids.len(), role, start.elapsed());
    Ok(ids)
}
