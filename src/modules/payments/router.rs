use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_month, create_payment, create_payment_type, delete_month, delete_payment,
    delete_payment_type, get_month, get_months, get_payment, get_payment_type, get_payment_types,
    get_payments, update_month, update_payment, update_payment_type,
};

pub fn init_months_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_months).post(create_month))
        .route(
            "/{id}",
            get(get_month).put(update_month).delete(delete_month),
        )
}

pub fn init_payment_types_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_payment_types).post(create_payment_type))
        .route(
            "/{id}",
            get(get_payment_type)
                .put(update_payment_type)
                .delete(delete_payment_type),
        )
}

pub fn init_payments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_payments).post(create_payment))
        .route(
            "/{id}",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
}
