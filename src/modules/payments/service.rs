use anyhow::anyhow;
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_db::WriteResultExt;
use campusdesk_models::payments::{
    CreatePaymentDto, Month, Payment, PaymentType, TitleDto, UpdatePaymentDto, UpdateTitleDto,
};
use campusdesk_models::{MonthId, PaymentId, PaymentTypeId};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::metrics::track_payment_recorded;

const PAYMENT_COLUMNS: &str =
    "id, student_id, group_id, month_id, payment_type_id, price, created_at, updated_at";

pub struct PaymentService;

impl PaymentService {
    #[instrument(skip(db))]
    pub async fn create_month(db: &SqlitePool, dto: TitleDto) -> Result<Month, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, Month>(
            "INSERT INTO months (title, created_at, updated_at) VALUES (?, ?, ?)
             RETURNING id, title, created_at, updated_at",
        )
        .bind(&dto.title)
        .bind(now)
        .bind(now)
        .fetch_one(db)
        .await
        .on_write("Month")
    }

    #[instrument(skip(db))]
    pub async fn get_months(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Month>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM months")
            .fetch_one(db)
            .await?;
        let months = sqlx::query_as::<_, Month>(
            "SELECT id, title, created_at, updated_at FROM months ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(months, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_month(db: &SqlitePool, id: MonthId) -> Result<Month, AppError> {
        sqlx::query_as::<_, Month>(
            "SELECT id, title, created_at, updated_at FROM months WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Month not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_month(
        db: &SqlitePool,
        id: MonthId,
        dto: UpdateTitleDto,
    ) -> Result<Month, AppError> {
        let existing = Self::get_month(db, id).await?;
        sqlx::query_as::<_, Month>(
            "UPDATE months SET title = ?, updated_at = ? WHERE id = ?
             RETURNING id, title, created_at, updated_at",
        )
        .bind(dto.title.unwrap_or(existing.title))
        .bind(Utc::now())
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Month")
    }

    #[instrument(skip(db))]
    pub async fn delete_month(db: &SqlitePool, id: MonthId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM months WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Month")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Month not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn create_payment_type(
        db: &SqlitePool,
        dto: TitleDto,
    ) -> Result<PaymentType, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, PaymentType>(
            "INSERT INTO payment_types (title, created_at, updated_at) VALUES (?, ?, ?)
             RETURNING id, title, created_at, updated_at",
        )
        .bind(&dto.title)
        .bind(now)
        .bind(now)
        .fetch_one(db)
        .await
        .on_write("Payment type")
    }

    #[instrument(skip(db))]
    pub async fn get_payment_types(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<PaymentType>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment_types")
            .fetch_one(db)
            .await?;
        let types = sqlx::query_as::<_, PaymentType>(
            "SELECT id, title, created_at, updated_at FROM payment_types
             ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(types, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_payment_type(
        db: &SqlitePool,
        id: PaymentTypeId,
    ) -> Result<PaymentType, AppError> {
        sqlx::query_as::<_, PaymentType>(
            "SELECT id, title, created_at, updated_at FROM payment_types WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Payment type not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_payment_type(
        db: &SqlitePool,
        id: PaymentTypeId,
        dto: UpdateTitleDto,
    ) -> Result<PaymentType, AppError> {
        let existing = Self::get_payment_type(db, id).await?;
        sqlx::query_as::<_, PaymentType>(
            "UPDATE payment_types SET title = ?, updated_at = ? WHERE id = ?
             RETURNING id, title, created_at, updated_at",
        )
        .bind(dto.title.unwrap_or(existing.title))
        .bind(Utc::now())
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Payment type")
    }

    #[instrument(skip(db))]
    pub async fn delete_payment_type(db: &SqlitePool, id: PaymentTypeId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM payment_types WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Payment type")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Payment type not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn create_payment(
        db: &SqlitePool,
        dto: CreatePaymentDto,
    ) -> Result<Payment, AppError> {
        let now = Utc::now();
        let payment = sqlx::query_as::<_, Payment>(&format!(
            "INSERT INTO payments
                 (student_id, group_id, month_id, payment_type_id, price, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(dto.student_id)
        .bind(dto.group_id)
        .bind(dto.month_id)
        .bind(dto.payment_type_id)
        .bind(dto.price)
        .bind(now)
        .bind(now)
        .fetch_one(db)
        .await
        .on_write("Payment")?;

        info!(
            payment_id = %payment.id,
            student_id = %payment.student_id,
            price = %payment.price,
            "payment recorded"
        );
        track_payment_recorded();
        Ok(payment)
    }

    #[instrument(skip(db))]
    pub async fn get_payments(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Payment>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
            .fetch_one(db)
            .await?;
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(payments, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_payment(db: &SqlitePool, id: PaymentId) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Payment not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_payment(
        db: &SqlitePool,
        id: PaymentId,
        dto: UpdatePaymentDto,
    ) -> Result<Payment, AppError> {
        let existing = Self::get_payment(db, id).await?;
        sqlx::query_as::<_, Payment>(&format!(
            "UPDATE payments
             SET student_id = ?, group_id = ?, month_id = ?, payment_type_id = ?, price = ?,
                 updated_at = ?
             WHERE id = ?
             RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(dto.student_id.unwrap_or(existing.student_id))
        .bind(dto.group_id.or(existing.group_id))
        .bind(dto.month_id.or(existing.month_id))
        .bind(dto.payment_type_id.unwrap_or(existing.payment_type_id))
        .bind(dto.price.unwrap_or(existing.price))
        .bind(Utc::now())
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Payment")
    }

    #[instrument(skip(db))]
    pub async fn delete_payment(db: &SqlitePool, id: PaymentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Payment")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Payment not found")));
        }
        Ok(())
    }
}
