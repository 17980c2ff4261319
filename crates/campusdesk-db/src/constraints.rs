//! Translation of SQLite constraint failures into [`AppError`]s.
//!
//! | Violation | on insert / update | on delete |
//! |---|---|---|
//! | UNIQUE | 409 | 409 |
//! | FOREIGN KEY | 400 (unknown reference) | 409 (restrict) |
//! | NOT NULL / CHECK | 400 | 400 |
//! | no row | 404 | 404 |

use anyhow::anyhow;
use campusdesk_core::AppError;
use sqlx::error::ErrorKind;

pub trait WriteResultExt<T> {
    /// Maps failures of an INSERT or UPDATE on `entity`.
    fn on_write(self, entity: &str) -> Result<T, AppError>;

    /// Maps failures of a DELETE on `entity`.
    fn on_delete(self, entity: &str) -> Result<T, AppError>;
}

impl<T> WriteResultExt<T> for Result<T, sqlx::Error> {
    fn on_write(self, entity: &str) -> Result<T, AppError> {
        self.map_err(|e| map_error(e, entity, Operation::Write))
    }

    fn on_delete(self, entity: &str) -> Result<T, AppError> {
        self.map_err(|e| map_error(e, entity, Operation::Delete))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Operation {
    Write,
    Delete,
}

fn map_error(err: sqlx::Error, entity: &str, op: Operation) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => return AppError::not_found(anyhow!("{entity} not found")),
        sqlx::Error::Database(db_err) => match db_err.kind() {
            ErrorKind::UniqueViolation => {
                let field = unique_column(db_err.message()).unwrap_or("value");
                return AppError::conflict(anyhow!("{entity} with this {field} already exists"));
            }
            ErrorKind::ForeignKeyViolation => {
                return match op {
                    Operation::Write => AppError::bad_request(anyhow!(
                        "{entity} references a record that does not exist"
                    ))
                    .with_code("invalid_reference"),
                    Operation::Delete => AppError::conflict(anyhow!(
                        "{entity} is still referenced by other records and cannot be deleted"
                    ))
                    .with_code("protected"),
                };
            }
            ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                return AppError::bad_request(anyhow!("Invalid {entity}: {}", db_err.message()));
            }
            _ => {}
        },
        _ => {}
    }
    AppError::from(err)
}

/// `UNIQUE constraint failed: study_groups.title` -> `title`
fn unique_column(message: &str) -> Option<&str> {
    let columns = message.split(':').nth(1)?.trim();
    let first = columns.split(',').next()?.trim();
    first.rsplit('.').next().filter(|s| !s.is_empty())
}
