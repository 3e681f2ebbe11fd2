//! 账号注册与登录校验

pub mod login;
pub mod register;

pub use login::verify_login;
pub use register::register_student;
