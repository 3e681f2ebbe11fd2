//! 模型目录存储操作

use super::{SeaOrmStorage, finalize_transaction, updated_or_none};
use crate::entity::ai_models::{ActiveModel, Column, Entity as AiModels};
use crate::errors::{ClinicError, Result};
use crate::models::ai_models::{
    entities::{AiModel, EnabledModel},
    requests::{AiModelListQuery, AiModelPatch, CreateAiModelRequest, UpdateAiModelRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, warn};

/// 把部分更新写入 ActiveModel，只设置提供了的字段
fn apply_changes(model: &mut ActiveModel, changes: UpdateAiModelRequest) {
    if let Some(in_use) = changes.in_use {
        model.in_use = Set(Some(in_use));
    }
    if let Some(free) = changes.free {
        model.free = Set(Some(free));
    }
    if let Some(platform) = changes.platform {
        model.platform = Set(Some(platform));
    }
    if let Some(series) = changes.series {
        model.series = Set(Some(series));
    }
    if let Some(name) = changes.name {
        model.name = Set(Some(name));
    }
    if let Some(module) = changes.module {
        model.module = Set(Some(module));
    }
    if let Some(price_input) = changes.price_input {
        model.price_input = Set(Some(price_input));
    }
    if let Some(price_output) = changes.price_output {
        model.price_output = Set(Some(price_output));
    }
}

impl SeaOrmStorage {
    /// 创建模型
    pub async fn create_model_impl(&self, req: CreateAiModelRequest) -> Result<AiModel> {
        let model = ActiveModel {
            in_use: Set(Some(req.in_use)),
            free: Set(Some(req.free)),
            platform: Set(req.platform),
            series: Set(req.series),
            name: Set(req.name),
            module: Set(req.module),
            price_input: Set(req.price_input),
            price_output: Set(req.price_output),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClinicError::from_db("创建模型失败", e))?;

        Ok(result.into_ai_model())
    }

    /// 通过 ID 获取模型
    pub async fn get_model_by_id_impl(&self, id: i64) -> Result<Option<AiModel>> {
        let result = AiModels::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询模型失败: {e}")))?;

        Ok(result.map(|m| m.into_ai_model()))
    }

    /// 按条件列出模型
    pub async fn list_models_impl(&self, query: AiModelListQuery) -> Result<Vec<AiModel>> {
        let mut select = AiModels::find();

        if let Some(in_use) = query.in_use {
            select = select.filter(Column::InUse.eq(in_use));
        }
        if let Some(free) = query.free {
            select = select.filter(Column::Free.eq(free));
        }
        if let Some(ref platform) = query.platform {
            select = select.filter(Column::Platform.eq(platform.as_str()));
        }

        let models = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询模型列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_ai_model()).collect())
    }

    /// 列出启用的模型
    pub async fn list_enabled_models_impl(&self) -> Result<Vec<EnabledModel>> {
        let models = AiModels::find()
            .filter(Column::InUse.eq(true))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询启用模型失败: {e}")))?;

        Ok(models
            .into_iter()
            .map(|m| EnabledModel {
                name: m.name,
                module: m.module,
            })
            .collect())
    }

    /// 更新单个模型
    pub async fn update_model_impl(
        &self,
        id: i64,
        update: UpdateAiModelRequest,
    ) -> Result<Option<AiModel>> {
        let updated = Self::patch_model(&self.db, id, update).await?;
        Ok(updated.map(|m| m.into_ai_model()))
    }

    /// 批量更新模型
    ///
    /// 在同一事务中执行，任意一条记录不存在或写入失败时整体回滚。
    pub async fn update_models_bulk_impl(&self, patches: Vec<AiModelPatch>) -> Result<Vec<AiModel>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClinicError::database_operation(format!("开启事务失败: {e}")))?;

        let result = Self::apply_model_patches(&txn, patches).await;
        let results = finalize_transaction(txn, result).await?;
        debug!("批量更新模型 {} 条", results.len());
        Ok(results)
    }

    /// 逐条应用补丁，遇到不存在的记录立即失败
    async fn apply_model_patches<C: ConnectionTrait>(
        conn: &C,
        patches: Vec<AiModelPatch>,
    ) -> Result<Vec<AiModel>> {
        let mut results = Vec::with_capacity(patches.len());

        for patch in patches {
            let id = patch.id;
            match Self::patch_model(conn, id, patch.changes).await? {
                Some(model) => results.push(model.into_ai_model()),
                None => {
                    warn!("批量更新模型失败，记录不存在: {}", id);
                    return Err(ClinicError::not_found(format!(
                        "批量更新失败，模型不存在: {id}"
                    )));
                }
            }
        }

        Ok(results)
    }

    /// 删除模型
    pub async fn delete_model_impl(&self, id: i64) -> Result<bool> {
        let result = AiModels::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("删除模型失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 在给定连接（或事务）上应用部分更新，记录不存在时返回 None
    async fn patch_model<C: ConnectionTrait>(
        conn: &C,
        id: i64,
        changes: UpdateAiModelRequest,
    ) -> Result<Option<crate::entity::ai_models::Model>> {
        if changes.is_empty() {
            return AiModels::find_by_id(id)
                .one(conn)
                .await
                .map_err(|e| ClinicError::database_operation(format!("查询模型失败: {e}")));
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        apply_changes(&mut model, changes);

        updated_or_none(model.update(conn).await, "更新模型失败")
    }
}
