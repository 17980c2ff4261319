pub mod attendance;
pub mod auth;
pub mod comments;
pub mod courses;
pub mod groups;
pub mod homework;
pub mod parents;
pub mod payments;
pub mod schedule;
pub mod students;
pub mod teachers;
pub mod users;
pub mod workers;
