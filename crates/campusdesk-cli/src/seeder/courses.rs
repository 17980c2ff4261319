//! Courses and the study groups running them.

use campusdesk_db::relations::GROUP_TEACHERS;
use campusdesk_models::{CourseId, GroupId, TeacherId};
use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::lorem::en::Word;
use rayon::prelude::*;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::models::{CourseSeed, SEED_MARKER};

pub fn generate_courses(count: usize) -> Vec<CourseSeed> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let word: String = Word().fake();
            CourseSeed {
                title: format!("{} {}", capitalize(&word), i + 1),
            }
        })
        .collect()
}

pub async fn insert_courses(db: &SqlitePool, courses: &[CourseSeed]) -> anyhow::Result<Vec<CourseId>> {
    if courses.is_empty() {
        return Ok(Vec::new());
    }
    let mut query = QueryBuilder::<Sqlite>::new("INSERT INTO courses (title, descriptions) ");
    query.push_values(courses, |mut row, course| {
        row.push_bind(&course.title).push_bind(SEED_MARKER);
    });
    query.push(" RETURNING id");
    Ok(query.build_query_scalar().fetch_all(db).await?)
}

/// `per_course` groups for each course, each taught by one teacher picked
/// round-robin. Titles are prefixed with `tag` so reruns stay unique.
pub async fn insert_groups(
    db: &SqlitePool,
    courses: &[CourseId],
    per_course: usize,
    teachers: &[TeacherId],
    tag: &str,
) -> anyhow::Result<Vec<GroupId>> {
    let today = Utc::now().date_naive();
    let now = Utc::now();
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(courses.len() * per_course);

    for (c, course_id) in courses.iter().enumerate() {
        for g in 0..per_course {
            let n = c * per_course + g;
            let start = today - Duration::days(30 * g as i64);
            let id: GroupId = sqlx::query_scalar(
                "INSERT INTO study_groups
                     (title, course_id, start_date, end_date, price, descriptions, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                 RETURNING id",
            )
            .bind(format!("{tag}-G{:03}", n + 1))
            .bind(*course_id)
            .bind(start)
            .bind(start + Duration::days(90))
            .bind(5_000_000i64)
            .bind(SEED_MARKER)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

            if !teachers.is_empty() {
                GROUP_TEACHERS
                    .insert(&mut tx, id.get(), &[teachers[n % teachers.len()]])
                    .await?;
            }
            ids.push(id);
        }
    }

    tx.commit().await?;
    Ok(ids)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
