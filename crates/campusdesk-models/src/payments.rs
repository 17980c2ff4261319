//! Payments, payment types and billing months.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ids::{GroupId, MonthId, PaymentId, PaymentTypeId, StudentId};
use crate::value_types::Price;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Month {
    pub id: MonthId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct PaymentType {
    pub id: PaymentTypeId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating a month or a payment type.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct TitleDto {
    #[validate(length(min = 1, max = 128))]
    pub title: String,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateTitleDto {
    #[validate(length(min = 1, max = 128))]
    pub title: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub id: PaymentId,
    pub student_id: StudentId,
    pub group_id: Option<GroupId>,
    pub month_id: Option<MonthId>,
    pub payment_type_id: PaymentTypeId,
    pub price: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreatePaymentDto {
    pub student_id: StudentId,
    pub group_id: Option<GroupId>,
    pub month_id: Option<MonthId>,
    pub payment_type_id: PaymentTypeId,
    pub price: Price,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdatePaymentDto {
    pub student_id: Option<StudentId>,
    pub group_id: Option<GroupId>,
    pub month_id: Option<MonthId>,
    pub payment_type_id: Option<PaymentTypeId>,
    pub price: Option<Price>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_price_accepts_number_or_string() {
        let from_number: CreatePaymentDto =
            serde_json::from_str(r#"{"student_id":1,"payment_type_id":1,"price":250000}"#).unwrap();
        let from_string: CreatePaymentDto =
            serde_json::from_str(r#"{"student_id":1,"payment_type_id":1,"price":"250000.00"}"#)
                .unwrap();
        assert_eq!(from_number.price, from_string.price);
        assert_eq!(from_number.group_id, None);
        assert_eq!(from_number.month_id, None);
    }

    #[test]
    fn test_payment_serializes_price_with_two_decimals() {
        let payment = Payment {
            id: PaymentId(1),
            student_id: StudentId(1),
            group_id: None,
            month_id: Some(MonthId(2)),
            payment_type_id: PaymentTypeId(1),
            price: "99.5".parse().unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["price"], "99.50");
    }

    #[test]
    fn test_too_many_digits_rejected() {
        let result: Result<CreatePaymentDto, _> = serde_json::from_str(
            r#"{"student_id":1,"payment_type_id":1,"price":"123456789.00"}"#,
        );
        assert!(result.is_err());
    }
}
