use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_room, create_table, create_table_type, delete_room, delete_table, delete_table_type,
    get_room, get_rooms, get_table, get_table_type, get_table_types, get_tables, update_room,
    update_table, update_table_type,
};

pub fn init_rooms_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_rooms).post(create_room))
        .route("/{id}", get(get_room).put(update_room).delete(delete_room))
}

pub fn init_table_types_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_table_types).post(create_table_type))
        .route(
            "/{id}",
            get(get_table_type)
                .put(update_table_type)
                .delete(delete_table_type),
        )
}

pub fn init_tables_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_tables).post(create_table))
        .route(
            "/{id}",
            get(get_table).put(update_table).delete(delete_table),
        )
}
