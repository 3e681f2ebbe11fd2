use std::sync::Arc;

use crate::config::DatabaseConfig;
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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（用户名重复时返回约束冲突）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>>;
    // 用户名是否已存在
    async fn user_exists(&self, name: &str) -> Result<bool>;
    // 获取用户角色
    async fn get_user_role(&self, name: &str) -> Result<Option<UserRole>>;
    // 列出用户
    async fn list_users(&self, query: UserListQuery) -> Result<Vec<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 按用户名修改角色
    async fn update_user_role(&self, name: &str, role: UserRole) -> Result<bool>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 模型目录方法
    async fn create_model(&self, model: CreateAiModelRequest) -> Result<AiModel>;
    async fn get_model_by_id(&self, id: i64) -> Result<Option<AiModel>>;
    async fn list_models(&self, query: AiModelListQuery) -> Result<Vec<AiModel>>;
    // 列出启用的模型（名称 + 模块）
    async fn list_enabled_models(&self) -> Result<Vec<EnabledModel>>;
    async fn update_model(
        &self,
        id: i64,
        update: UpdateAiModelRequest,
    ) -> Result<Option<AiModel>>;
    // 批量更新，全部成功或全部回滚
    async fn update_models_bulk(&self, patches: Vec<AiModelPatch>) -> Result<Vec<AiModel>>;
    async fn delete_model(&self, id: i64) -> Result<bool>;

    /// 教师提示词方法
    async fn create_teacher_prompt(
        &self,
        prompt: CreateTeacherPromptRequest,
    ) -> Result<TeacherPrompt>;
    async fn get_teacher_prompt_by_id(&self, id: i64) -> Result<Option<TeacherPrompt>>;
    async fn get_teacher_prompt_by_memo(&self, memo: &str) -> Result<Option<TeacherPrompt>>;
    // 列出某创建者的提示词以及所有公开的提示词
    async fn list_teacher_prompts(&self, creator: &str) -> Result<Vec<TeacherPrompt>>;
    async fn update_teacher_prompt(
        &self,
        id: i64,
        update: UpdateTeacherPromptRequest,
    ) -> Result<Option<TeacherPrompt>>;
    // 删除提示词，关联病例的 teacher_id 置空
    async fn delete_teacher_prompt(&self, id: i64) -> Result<bool>;

    /// 分类方法
    async fn create_category(&self, category: CreateCategoryRequest) -> Result<Category>;
    async fn get_category_by_id(&self, id: i64) -> Result<Option<Category>>;
    // 精确匹配分类，找不到时返回默认分类
    async fn get_category(&self, book: &str, chapter: &str, subject: &str) -> Result<Category>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn update_category(
        &self,
        id: i64,
        update: UpdateCategoryRequest,
    ) -> Result<Option<Category>>;
    // 删除分类，关联病例的 chapter_id 置空
    async fn delete_category(&self, id: i64) -> Result<bool>;
    async fn count_categories(&self) -> Result<u64>;
    // 写入固定 ID 的默认分类
    async fn seed_default_category(&self, category: CreateCategoryRequest) -> Result<Category>;

    /// 病例方法
    async fn create_case(&self, case: CreateCaseRequest) -> Result<Case>;
    async fn get_case_by_id(&self, id: i64) -> Result<Option<Case>>;
    async fn list_cases(&self, query: CaseListQuery) -> Result<Vec<Case>>;
    async fn update_case(&self, id: i64, update: UpdateCaseRequest) -> Result<Option<Case>>;
    async fn delete_case(&self, id: i64) -> Result<bool>;

    /// 通用方法
    // 字段去重取值，用于生成选项列表
    async fn select_distinct_values(&self, field: DistinctField) -> Result<Vec<String>>;
    // 导出整张表（全部列）
    async fn export_table(&self, kind: TableKind) -> Result<Vec<serde_json::Value>>;
    // 关闭连接池
    async fn close(&self) -> Result<()>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::connect(config).await?;
    Ok(Arc::new(storage))
}
