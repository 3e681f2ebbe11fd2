use tracing::info;

use crate::errors::{ClinicError, Result};
use crate::models::users::{
    entities::{User, UserRole},
    requests::CreateUserRequest,
};
use crate::storage::Storage;
use crate::utils::password::hash_password;

/// 注册学生账号
///
/// 用户名重复时返回约束冲突，由存储层的唯一索引保证。
pub async fn register_student(
    storage: &dyn Storage,
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<User> {
    let username = username.trim();

    // 1. 基本校验
    if username.is_empty() {
        return Err(ClinicError::validation("用户名不能为空"));
    }
    if password.is_empty() {
        return Err(ClinicError::validation("密码不能为空"));
    }
    if password != confirm_password {
        return Err(ClinicError::validation("两次输入的密码不一致"));
    }

    // 2. 哈希密码
    let password_hash = hash_password(password)?;

    // 3. 创建用户
    let user = storage
        .create_user(CreateUserRequest {
            name: username.to_string(),
            password: password_hash,
            role: UserRole::Student,
        })
        .await?;

    info!("新用户注册: {} (ID: {})", user.name, user.id);
    Ok(user)
}
