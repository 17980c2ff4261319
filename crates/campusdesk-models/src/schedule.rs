//! Rooms, slot types and timetable slots.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ids::{RoomId, TableId, TableTypeId};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub title: String,
    pub descriptions: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct TableType {
    pub id: TableTypeId,
    pub title: String,
    pub descriptions: Option<String>,
}

/// Create/update body shared by rooms and table types.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateTitledDto {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateTitledDto {
    #[validate(length(min = 1, max = 50))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room_id: RoomId,
    pub table_type_id: TableTypeId,
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateTableDto {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room_id: RoomId,
    pub table_type_id: TableTypeId,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateTableDto {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub room_id: Option<RoomId>,
    pub table_type_id: Option<TableTypeId>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}
