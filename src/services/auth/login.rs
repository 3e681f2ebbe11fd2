use tracing::debug;

use crate::errors::Result;
use crate::storage::Storage;
use crate::utils::password::verify_password;

/// 校验登录凭据，用户不存在时一律返回 false
pub async fn verify_login(storage: &dyn Storage, username: &str, password: &str) -> Result<bool> {
    let Some(user) = storage.get_user_by_name(username).await? else {
        debug!("登录失败，用户不存在: {}", username);
        return Ok(false);
    };

    let verified = verify_password(password, &user.password_hash);
    if !verified {
        debug!("登录失败，密码错误: {}", username);
    }
    Ok(verified)
}
