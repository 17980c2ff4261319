//! Many-to-many link tables.
//!
//! Every link table has two id columns forming its primary key, both with
//! `ON DELETE CASCADE`. Rows carrying an id list (`Group::teacher_ids`,
//! `Worker::course_ids`, ...) read it through [`LinkTable::load`] and replace
//! it wholesale through [`LinkTable::replace`] inside the caller's
//! transaction.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTable {
    pub table: &'static str,
    pub owner: &'static str,
    pub target: &'static str,
}

impl LinkTable {
    pub const fn new(table: &'static str, owner: &'static str, target: &'static str) -> Self {
        Self {
            table,
            owner,
            target,
        }
    }

    /// Target ids linked to one owner, ascending.
    pub async fn load<'e, T>(
        &self,
        executor: impl SqliteExecutor<'e>,
        owner_id: i64,
    ) -> Result<Vec<T>, sqlx::Error>
    where
        T: From<i64>,
    {
        let ids: Vec<i64> = sqlx::query_scalar(&format!(
            "SELECT {target} FROM {table} WHERE {owner} = ? ORDER BY {target}",
            target = self.target,
            table = self.table,
            owner = self.owner,
        ))
        .bind(owner_id)
        .fetch_all(executor)
        .await?;

        Ok(ids.into_iter().map(T::from).collect())
    }

    /// Target ids for a page of owners in one query. Owners without links
    /// are absent from the map.
    pub async fn load_many<'e, T>(
        &self,
        executor: impl SqliteExecutor<'e>,
        owner_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<T>>, sqlx::Error>
    where
        T: From<i64>,
    {
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {owner}, {target} FROM {table} WHERE {owner} IN (",
            owner = self.owner,
            target = self.target,
            table = self.table,
        ));
        let mut ids = query.separated(", ");
        for id in owner_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(format!(") ORDER BY {}, {}", self.owner, self.target));

        let rows: Vec<(i64, i64)> = query.build_query_as().fetch_all(executor).await?;

        let mut links: HashMap<i64, Vec<T>> = HashMap::new();
        for (owner, target) in rows {
            links.entry(owner).or_default().push(T::from(target));
        }
        Ok(links)
    }

    /// Adds links; ones that already exist are kept as they are. An unknown
    /// target fails with a foreign key violation.
    pub async fn insert<T>(
        &self,
        conn: &mut SqliteConnection,
        owner_id: i64,
        targets: &[T],
    ) -> Result<(), sqlx::Error>
    where
        T: Copy + Into<i64>,
    {
        if targets.is_empty() {
            return Ok(());
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "INSERT OR IGNORE INTO {} ({}, {}) ",
            self.table, self.owner, self.target
        ));
        query.push_values(targets, |mut row, target| {
            let target: i64 = (*target).into();
            row.push_bind(owner_id).push_bind(target);
        });
        query.build().execute(conn).await?;
        Ok(())
    }

    /// Makes `targets` the owner's complete link set.
    pub async fn replace<T>(
        &self,
        conn: &mut SqliteConnection,
        owner_id: i64,
        targets: &[T],
    ) -> Result<(), sqlx::Error>
    where
        T: Copy + Into<i64>,
    {
        sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = ?",
            self.table, self.owner
        ))
        .bind(owner_id)
        .execute(&mut *conn)
        .await?;

        self.insert(conn, owner_id, targets).await
    }

    /// Removes a single link. Returns whether it existed.
    pub async fn remove<'e>(
        &self,
        executor: impl SqliteExecutor<'e>,
        owner_id: i64,
        target_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = ? AND {} = ?",
            self.table, self.owner, self.target
        ))
        .bind(owner_id)
        .bind(target_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub const WORKER_DEPARTMENTS: LinkTable =
    LinkTable::new("worker_departments", "worker_id", "department_id");
pub const WORKER_COURSES: LinkTable = LinkTable::new("worker_courses", "worker_id", "course_id");
pub const TEACHER_DEPARTMENTS: LinkTable =
    LinkTable::new("teacher_departments", "teacher_id", "department_id");
pub const TEACHER_COURSES: LinkTable = LinkTable::new("teacher_courses", "teacher_id", "course_id");
pub const GROUP_TEACHERS: LinkTable = LinkTable::new("group_teachers", "group_id", "teacher_id");
pub const STUDENT_COURSES: LinkTable = LinkTable::new("student_courses", "student_id", "course_id");
pub const PARENT_STUDENTS: LinkTable = LinkTable::new("parent_students", "parent_id", "student_id");

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    const LINKS: LinkTable = LinkTable::new("group_teachers", "group_id", "teacher_id");

    async fn memory_pool() -> sqlx::SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::raw_sql(
            "CREATE TABLE study_groups (id INTEGER PRIMARY KEY);
             CREATE TABLE teachers (id INTEGER PRIMARY KEY);
             CREATE TABLE group_teachers (
                 group_id INTEGER NOT NULL REFERENCES study_groups(id) ON DELETE CASCADE,
                 teacher_id INTEGER NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
                 PRIMARY KEY (group_id, teacher_id));
             INSERT INTO study_groups (id) VALUES (1), (2);
             INSERT INTO teachers (id) VALUES (10), (11), (12);",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_replace_sets_exact_link_set() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        LINKS.replace(&mut conn, 1, &[10i64, 11, 11]).await.unwrap();
        LINKS.replace(&mut conn, 1, &[12i64, 10]).await.unwrap();

        let ids: Vec<i64> = LINKS.load(&mut *conn, 1).await.unwrap();
        assert_eq!(ids, vec![10, 12]);
    }

    #[tokio::test]
    async fn test_load_many_groups_by_owner() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        LINKS.insert(&mut conn, 1, &[11i64]).await.unwrap();
        LINKS.insert(&mut conn, 2, &[10i64, 12]).await.unwrap();

        let links: HashMap<i64, Vec<i64>> = LINKS.load_many(&mut *conn, &[1, 2, 3]).await.unwrap();
        assert_eq!(links[&1], vec![11]);
        assert_eq!(links[&2], vec![10, 12]);
        assert!(!links.contains_key(&3));
    }

    #[tokio::test]
    async fn test_unknown_target_is_foreign_key_error() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let err = LINKS.insert(&mut conn, 1, &[99i64]).await.unwrap_err();
        let db_err = err.as_database_error().unwrap();
        assert!(db_err.is_foreign_key_violation());
    }

    #[tokio::test]
    async fn test_remove_reports_existence() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        LINKS.insert(&mut conn, 1, &[10i64]).await.unwrap();

        assert!(LINKS.remove(&mut *conn, 1, 10).await.unwrap());
        assert!(!LINKS.remove(&mut *conn, 1, 10).await.unwrap());
    }
}
