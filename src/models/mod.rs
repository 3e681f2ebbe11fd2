//! 业务数据模型

pub mod ai_models;
pub mod cases;
pub mod categories;
pub mod chat;
pub mod common;
pub mod teachers;
pub mod users;
