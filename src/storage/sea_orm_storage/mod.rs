//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod ai_models;
mod cases;
mod categories;
mod tables;
mod teachers;
mod users;

use crate::config::DatabaseConfig;
use crate::errors::{ClinicError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例，并确保数据表存在
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 建表（幂等）
        Migrator::up(&db, None)
            .await
            .map_err(|e| ClinicError::database_operation(format!("数据表初始化失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");
        if !in_memory {
            Self::ensure_parent_dir(url)?;
        }

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ClinicError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let mut pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout));

        // 内存数据库在最后一个连接关闭时丢失，不回收空闲连接
        pool = if in_memory {
            pool.idle_timeout(None).max_lifetime(None)
        } else {
            pool.idle_timeout(Duration::from_secs(300))
        };

        let pool = pool
            .connect_with(opt)
            .await
            .map_err(|e| ClinicError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| ClinicError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ClinicError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 数据库文件所在目录不存在时先创建
    fn ensure_parent_dir(url: &str) -> Result<()> {
        let path = url
            .trim_start_matches("sqlite://")
            .trim_start_matches("sqlite:")
            .split('?')
            .next()
            .unwrap_or_default();

        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClinicError::database_config(format!("无法创建数据库目录 {}: {e}", parent.display()))
            })?;
        }
        Ok(())
    }
}

/// 按执行结果提交或回滚事务
pub(crate) async fn finalize_transaction<T>(
    txn: DatabaseTransaction,
    result: Result<T>,
) -> Result<T> {
    match result {
        Ok(value) => {
            txn.commit()
                .await
                .map_err(|e| ClinicError::database_operation(format!("提交事务失败: {e}")))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                return Err(ClinicError::database_operation(format!(
                    "回滚事务失败: {rollback_err}"
                )));
            }
            Err(err)
        }
    }
}

/// 单行更新结果：记录不存在时返回 None
///
/// 记录在读取与写入之间被删除时 SeaORM 返回 `RecordNotUpdated`。
pub(crate) fn updated_or_none<M>(
    result: std::result::Result<M, DbErr>,
    context: &str,
) -> Result<Option<M>> {
    match result {
        Ok(model) => Ok(Some(model)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(ClinicError::from_db(context, e)),
    }
}

/// 显式写入主键后，需要让自增序列跳过已占用的 ID
///
/// 只有 PostgreSQL 的序列不会随显式主键前进。
pub(crate) fn sequence_realign_sql(backend: DbBackend, table: &str) -> Option<String> {
    match backend {
        DbBackend::Postgres => Some(format!(
            "SELECT setval(pg_get_serial_sequence('\"{table}\"', 'id'), \
             (SELECT COALESCE(MAX(id), 1) FROM \"{table}\"))"
        )),
        _ => None,
    }
}

// Storage trait 实现
use crate::models::{
    ai_models::{
        entities::{AiModel, EnabledModel},
        requests::{AiModelListQuery, AiModelPatch, CreateAiModelRequest, UpdateAiModelRequest},
    },
    cases::{
        entities::Case,
        requests::{CaseListQuery, CreateCaseRequest, UpdateCaseRequest},
    },
    categories::{
        entities::Category,
        requests::{CreateCategoryRequest, UpdateCategoryRequest},
    },
    common::{DistinctField, TableKind},
    teachers::{
        entities::TeacherPrompt,
        requests::{CreateTeacherPromptRequest, UpdateTeacherPromptRequest},
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>> {
        self.get_user_by_name_impl(name).await
    }

    async fn user_exists(&self, name: &str) -> Result<bool> {
        Ok(self.get_user_by_name_impl(name).await?.is_some())
    }

    async fn get_user_role(&self, name: &str) -> Result<Option<UserRole>> {
        Ok(self.get_user_by_name_impl(name).await?.map(|u| u.role))
    }

    async fn list_users(&self, query: UserListQuery) -> Result<Vec<User>> {
        self.list_users_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn update_user_role(&self, name: &str, role: UserRole) -> Result<bool> {
        self.update_user_role_impl(name, role).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 模型模块
    async fn create_model(&self, model: CreateAiModelRequest) -> Result<AiModel> {
        self.create_model_impl(model).await
    }

    async fn get_model_by_id(&self, id: i64) -> Result<Option<AiModel>> {
        self.get_model_by_id_impl(id).await
    }

    async fn list_models(&self, query: AiModelListQuery) -> Result<Vec<AiModel>> {
        self.list_models_impl(query).await
    }

    async fn list_enabled_models(&self) -> Result<Vec<EnabledModel>> {
        self.list_enabled_models_impl().await
    }

    async fn update_model(
        &self,
        id: i64,
        update: UpdateAiModelRequest,
    ) -> Result<Option<AiModel>> {
        self.update_model_impl(id, update).await
    }

    async fn update_models_bulk(&self, patches: Vec<AiModelPatch>) -> Result<Vec<AiModel>> {
        self.update_models_bulk_impl(patches).await
    }

    async fn delete_model(&self, id: i64) -> Result<bool> {
        self.delete_model_impl(id).await
    }

    // 教师提示词模块
    async fn create_teacher_prompt(
        &self,
        prompt: CreateTeacherPromptRequest,
    ) -> Result<TeacherPrompt> {
        self.create_teacher_prompt_impl(prompt).await
    }

    async fn get_teacher_prompt_by_id(&self, id: i64) -> Result<Option<TeacherPrompt>> {
        self.get_teacher_prompt_by_id_impl(id).await
    }

    async fn get_teacher_prompt_by_memo(&self, memo: &str) -> Result<Option<TeacherPrompt>> {
        self.get_teacher_prompt_by_memo_impl(memo).await
    }

    async fn list_teacher_prompts(&self, creator: &str) -> Result<Vec<TeacherPrompt>> {
        self.list_teacher_prompts_impl(creator).await
    }

    async fn update_teacher_prompt(
        &self,
        id: i64,
        update: UpdateTeacherPromptRequest,
    ) -> Result<Option<TeacherPrompt>> {
        self.update_teacher_prompt_impl(id, update).await
    }

    async fn delete_teacher_prompt(&self, id: i64) -> Result<bool> {
        self.delete_teacher_prompt_impl(id).await
    }

    // 分类模块
    async fn create_category(&self, category: CreateCategoryRequest) -> Result<Category> {
        self.create_category_impl(category).await
    }

    async fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        self.get_category_by_id_impl(id).await
    }

    async fn get_category(&self, book: &str, chapter: &str, subject: &str) -> Result<Category> {
        self.get_category_impl(book, chapter, subject).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.list_categories_impl().await
    }

    async fn update_category(
        &self,
        id: i64,
        update: UpdateCategoryRequest,
    ) -> Result<Option<Category>> {
        self.update_category_impl(id, update).await
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        self.delete_category_impl(id).await
    }

    async fn count_categories(&self) -> Result<u64> {
        self.count_categories_impl().await
    }

    async fn seed_default_category(&self, category: CreateCategoryRequest) -> Result<Category> {
        self.insert_default_category(category).await
    }

    // 病例模块
    async fn create_case(&self, case: CreateCaseRequest) -> Result<Case> {
        self.create_case_impl(case).await
    }

    async fn get_case_by_id(&self, id: i64) -> Result<Option<Case>> {
        self.get_case_by_id_impl(id).await
    }

    async fn list_cases(&self, query: CaseListQuery) -> Result<Vec<Case>> {
        self.list_cases_impl(query).await
    }

    async fn update_case(&self, id: i64, update: UpdateCaseRequest) -> Result<Option<Case>> {
        self.update_case_impl(id, update).await
    }

    async fn delete_case(&self, id: i64) -> Result<bool> {
        self.delete_case_impl(id).await
    }

    // 通用模块
    async fn select_distinct_values(&self, field: DistinctField) -> Result<Vec<String>> {
        self.select_distinct_values_impl(field).await
    }

    async fn export_table(&self, kind: TableKind) -> Result<Vec<serde_json::Value>> {
        self.export_table_impl(kind).await
    }

    async fn close(&self) -> Result<()> {
        self.db
            .clone()
            .close()
            .await
            .map_err(|e| ClinicError::database_connection(format!("关闭数据库连接失败: {e}")))
    }
}

/// 测试用内存数据库
#[cfg(test)]
pub(crate) async fn memory_storage() -> SeaOrmStorage {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    SeaOrmStorage::connect(&config)
        .await
        .expect("in-memory storage should initialize")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("data/clinic.db").unwrap(),
            "sqlite://data/clinic.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/clinic").unwrap(),
            "postgres://u:p@localhost/clinic"
        );
        assert!(SeaOrmStorage::build_database_url("clinic").is_err());
    }

    #[tokio::test]
    async fn test_schema_creation_is_idempotent() {
        let storage = memory_storage().await;
        Migrator::up(&storage.db, None)
            .await
            .expect("second run should be a no-op");
        assert_eq!(storage.count_users().await.unwrap(), 0);
    }

    #[test]
    fn test_sequence_realign_only_on_postgres() {
        let sql = sequence_realign_sql(DbBackend::Postgres, "category").unwrap();
        assert!(sql.contains("pg_get_serial_sequence('\"category\"', 'id')"));
        assert!(sql.contains("MAX(id)"));
        assert!(sequence_realign_sql(DbBackend::Sqlite, "category").is_none());
        assert!(sequence_realign_sql(DbBackend::MySql, "category").is_none());
    }

    #[test]
    fn test_record_not_updated_maps_to_none() {
        let missing = updated_or_none::<i64>(Err(DbErr::RecordNotUpdated), "更新失败").unwrap();
        assert!(missing.is_none());
        assert_eq!(updated_or_none(Ok(7), "更新失败").unwrap(), Some(7));
        assert!(updated_or_none::<i64>(Err(DbErr::Custom("boom".into())), "更新失败").is_err());
    }
}
