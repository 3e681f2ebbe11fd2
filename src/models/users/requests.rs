use super::entities::UserRole;
use serde::Deserialize;

// 用户创建请求（password 为已哈希的密码）
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub password: String,
    pub role: UserRole,
}

// 用户更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.password.is_none() && self.role.is_none()
    }
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<UserRole>,
}
