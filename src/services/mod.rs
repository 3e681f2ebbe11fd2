//! 组合存储调用的业务流程

pub mod auth;
pub mod cases;
pub mod export;

pub use auth::{register_student, verify_login};
pub use cases::{SaveCaseParams, save_case};
pub use export::export_table_csv;
