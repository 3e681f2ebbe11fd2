use super::{SeaOrmStorage, updated_or_none};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{ClinicError, Result};
use crate::models::users::{
    entities::{User, UserRole},
    requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let model = ActiveModel {
            name: Set(req.name),
            password: Set(Some(req.password)),
            role: Set(Some(req.role.to_string())),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClinicError::from_db("创建用户失败", e))?;

        debug!("创建用户 {} (ID: {})", result.name, result.id);
        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_name_impl(&self, name: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 列出用户
    pub async fn list_users_impl(&self, query: UserListQuery) -> Result<Vec<User>> {
        let mut select = Users::find();

        // 角色筛选
        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        let users = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_user_by_id_impl(id).await;
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(password) = update.password {
            model.password = Set(Some(password));
        }

        if let Some(role) = update.role {
            model.role = Set(Some(role.to_string()));
        }

        // 用户不存在时 SeaORM 返回 RecordNotUpdated
        let updated = updated_or_none(model.update(&self.db).await, "更新用户失败")?;
        Ok(updated.map(|m| m.into_user()))
    }

    /// 按用户名修改角色，返回是否找到该用户
    pub async fn update_user_role_impl(&self, name: &str, role: UserRole) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(
                Column::Role,
                sea_orm::sea_query::Expr::value(role.to_string()),
            )
            .filter(Column::Name.eq(name))
            .exec(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("更新用户角色失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::users::{
        entities::UserRole,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    };
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::memory_storage;

    fn new_user(name: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            password: "hash".to_string(),
            role: UserRole::Student,
        }
    }

    #[tokio::test]
    async fn test_create_user_then_find_by_name() {
        let storage = memory_storage().await;
        let created = storage.create_user(new_user("alice")).await.unwrap();

        let found = storage.get_user_by_name("alice").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, UserRole::Student);
        assert!(storage.user_exists("alice").await.unwrap());
        assert!(!storage.user_exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_constraint_violation() {
        let storage = memory_storage().await;
        storage.create_user(new_user("alice")).await.unwrap();

        let err = storage.create_user(new_user("alice")).await.unwrap_err();
        assert!(err.is_constraint_violation(), "unexpected error: {err}");
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_user_role_by_name() {
        let storage = memory_storage().await;
        storage.create_user(new_user("alice")).await.unwrap();

        assert!(
            storage
                .update_user_role("alice", UserRole::Teacher)
                .await
                .unwrap()
        );
        assert!(
            !storage
                .update_user_role("nobody", UserRole::Teacher)
                .await
                .unwrap()
        );
        assert_eq!(
            storage.get_user_role("alice").await.unwrap(),
            Some(UserRole::Teacher)
        );
        assert_eq!(storage.get_user_role("nobody").await.unwrap(), None);

        let teachers = storage
            .list_users(UserListQuery {
                role: Some(UserRole::Teacher),
            })
            .await
            .unwrap();
        assert_eq!(teachers.len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_user_returns_none() {
        let storage = memory_storage().await;
        let update = UpdateUserRequest {
            password: Some("new".into()),
            ..Default::default()
        };
        assert!(storage.update_user(42, update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_user() {
        let storage = memory_storage().await;
        let user = storage.create_user(new_user("alice")).await.unwrap();

        let updated = storage
            .update_user(
                user.id,
                UpdateUserRequest {
                    password: Some("other".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.password_hash, "other");
        assert_eq!(updated.name, "alice");

        assert!(storage.delete_user(user.id).await.unwrap());
        assert!(!storage.delete_user(user.id).await.unwrap());
        assert!(storage.get_user_by_id(user.id).await.unwrap().is_none());
    }
}
