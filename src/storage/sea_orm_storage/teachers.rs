//! 教师提示词存储操作

use super::{SeaOrmStorage, finalize_transaction, updated_or_none};
use crate::entity::cases::{Column as CaseColumn, Entity as Cases};
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers};
use crate::errors::{ClinicError, Result};
use crate::models::teachers::{
    entities::TeacherPrompt,
    requests::{CreateTeacherPromptRequest, UpdateTeacherPromptRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use tracing::debug;

impl SeaOrmStorage {
    /// 创建提示词
    pub async fn create_teacher_prompt_impl(
        &self,
        req: CreateTeacherPromptRequest,
    ) -> Result<TeacherPrompt> {
        let model = ActiveModel {
            prompt: Set(req.prompt),
            memo: Set(req.memo),
            model: Set(req.model),
            creator: Set(req.creator),
            public: Set(Some(req.public)),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClinicError::from_db("创建提示词失败", e))?;

        Ok(result.into_teacher_prompt())
    }

    /// 通过 ID 获取提示词
    pub async fn get_teacher_prompt_by_id_impl(&self, id: i64) -> Result<Option<TeacherPrompt>> {
        let result = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询提示词失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher_prompt()))
    }

    /// 通过备注获取提示词（取第一条）
    pub async fn get_teacher_prompt_by_memo_impl(
        &self,
        memo: &str,
    ) -> Result<Option<TeacherPrompt>> {
        let result = Teachers::find()
            .filter(Column::Memo.eq(memo))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询提示词失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher_prompt()))
    }

    /// 列出创建者自己的提示词以及所有公开的提示词
    pub async fn list_teacher_prompts_impl(&self, creator: &str) -> Result<Vec<TeacherPrompt>> {
        let prompts = Teachers::find()
            .filter(
                Condition::any()
                    .add(Column::Creator.eq(creator))
                    .add(Column::Public.eq(true)),
            )
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询提示词列表失败: {e}")))?;

        Ok(prompts.into_iter().map(|m| m.into_teacher_prompt()).collect())
    }

    /// 更新提示词
    pub async fn update_teacher_prompt_impl(
        &self,
        id: i64,
        update: UpdateTeacherPromptRequest,
    ) -> Result<Option<TeacherPrompt>> {
        if update.is_empty() {
            return self.get_teacher_prompt_by_id_impl(id).await;
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(prompt) = update.prompt {
            model.prompt = Set(Some(prompt));
        }
        if let Some(memo) = update.memo {
            model.memo = Set(Some(memo));
        }
        if let Some(name) = update.model {
            model.model = Set(Some(name));
        }
        if let Some(creator) = update.creator {
            model.creator = Set(Some(creator));
        }
        if let Some(public) = update.public {
            model.public = Set(Some(public));
        }

        let updated = updated_or_none(model.update(&self.db).await, "更新提示词失败")?;
        Ok(updated.map(|m| m.into_teacher_prompt()))
    }

    /// 删除提示词
    ///
    /// 关联病例不会被删除，其 teacher_id 在同一事务中置空。
    pub async fn delete_teacher_prompt_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClinicError::database_operation(format!("开启事务失败: {e}")))?;

        let result = Self::detach_and_delete_teacher(&txn, id).await;
        finalize_transaction(txn, result).await
    }

    async fn detach_and_delete_teacher<C: ConnectionTrait>(conn: &C, id: i64) -> Result<bool> {
        let detached = Cases::update_many()
            .col_expr(CaseColumn::TeacherId, Expr::value(Option::<i64>::None))
            .filter(CaseColumn::TeacherId.eq(id))
            .exec(conn)
            .await
            .map_err(|e| ClinicError::database_operation(format!("解除病例关联失败: {e}")))?;

        let result = Teachers::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| ClinicError::database_operation(format!("删除提示词失败: {e}")))?;

        debug!(
            "删除提示词 {}，解除 {} 条病例关联",
            id, detached.rows_affected
        );
        Ok(result.rows_affected > 0)
    }
}
