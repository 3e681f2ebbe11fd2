//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_clinic_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum ClinicError {
            $($variant(String),)*
        }

        impl ClinicError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ClinicError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ClinicError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ClinicError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl ClinicError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ClinicError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_clinic_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    ConstraintViolation("E004", "Constraint Violation"),
    NotFound("E005", "Resource Not Found"),
    Validation("E006", "Validation Error"),
    Serialization("E007", "Serialization Error"),
    Authentication("E008", "Authentication Error"),
    ChatTransport("E009", "Chat Transport Error"),
    ChatUpstream("E010", "Chat Upstream Error"),
    Configuration("E011", "Configuration Error"),
}

impl ClinicError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为约束冲突（唯一键、外键）
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, ClinicError::ConstraintViolation(_))
    }

    /// 将数据库错误按上下文分类
    ///
    /// 唯一键与外键冲突归为 `ConstraintViolation`，其余归为 `DatabaseOperation`。
    pub fn from_db(context: &str, err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                ClinicError::ConstraintViolation(format!("{context}: 唯一约束冲突 ({detail})"))
            }
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(detail)) => {
                ClinicError::ConstraintViolation(format!("{context}: 外键约束冲突 ({detail})"))
            }
            _ => ClinicError::DatabaseOperation(format!("{context}: {err}")),
        }
    }
}

impl fmt::Display for ClinicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ClinicError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ClinicError {
    fn from(err: sea_orm::DbErr) -> Self {
        ClinicError::from_db("数据库操作失败", err)
    }
}

impl From<serde_json::Error> for ClinicError {
    fn from(err: serde_json::Error) -> Self {
        ClinicError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for ClinicError {
    fn from(err: csv::Error) -> Self {
        ClinicError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for ClinicError {
    fn from(err: reqwest::Error) -> Self {
        ClinicError::ChatTransport(err.to_string())
    }
}

impl From<config::ConfigError> for ClinicError {
    fn from(err: config::ConfigError) -> Self {
        ClinicError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClinicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ClinicError::database_config("test").code(), "E001");
        assert_eq!(ClinicError::constraint_violation("test").code(), "E004");
        assert_eq!(ClinicError::validation("test").code(), "E006");
        assert_eq!(ClinicError::chat_upstream("test").code(), "E010");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            ClinicError::not_found("test").error_type(),
            "Resource Not Found"
        );
        assert_eq!(
            ClinicError::chat_transport("test").error_type(),
            "Chat Transport Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = ClinicError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = ClinicError::constraint_violation("user.name");
        let formatted = err.format_simple();
        assert!(formatted.contains("Constraint Violation"));
        assert!(formatted.contains("user.name"));
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_generic_db_error_is_operation_error() {
        let err = ClinicError::from(sea_orm::DbErr::Custom("boom".into()));
        assert_eq!(err.code(), "E003");
        assert!(err.message().contains("boom"));
    }
}
