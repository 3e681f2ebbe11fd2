use super::{SeaOrmStorage, updated_or_none};
use crate::entity::cases::{ActiveModel, Column, Entity as Cases};
use crate::errors::{ClinicError, Result};
use crate::models::cases::{
    entities::Case,
    requests::{CaseListQuery, CreateCaseRequest, UpdateCaseRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::debug;

impl SeaOrmStorage {
    /// 创建病例
    ///
    /// 引用不存在的提示词或分类时返回约束冲突。
    pub async fn create_case_impl(&self, req: CreateCaseRequest) -> Result<Case> {
        let model = ActiveModel {
            teacher_id: Set(req.teacher_id),
            chapter_id: Set(req.chapter_id),
            creator: Set(req.creator),
            profile: Set(req.profile),
            content: Set(req.content),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClinicError::from_db("创建病例失败", e))?;

        debug!("创建病例 ID: {}", result.id);
        Ok(result.into_case())
    }

    /// 通过 ID 获取病例
    pub async fn get_case_by_id_impl(&self, id: i64) -> Result<Option<Case>> {
        let result = Cases::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询病例失败: {e}")))?;

        Ok(result.map(|m| m.into_case()))
    }

    /// 列出病例
    pub async fn list_cases_impl(&self, query: CaseListQuery) -> Result<Vec<Case>> {
        let mut select = Cases::find();

        if let Some(ref creator) = query.creator {
            select = select.filter(Column::Creator.eq(creator.as_str()));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(chapter_id) = query.chapter_id {
            select = select.filter(Column::ChapterId.eq(chapter_id));
        }

        let cases = select
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询病例列表失败: {e}")))?;

        Ok(cases.into_iter().map(|m| m.into_case()).collect())
    }

    /// 更新病例
    pub async fn update_case_impl(
        &self,
        id: i64,
        update: UpdateCaseRequest,
    ) -> Result<Option<Case>> {
        if update.is_empty() {
            return self.get_case_by_id_impl(id).await;
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        // 外层 None 不修改，Some(None) 清空关联
        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(teacher_id);
        }
        if let Some(chapter_id) = update.chapter_id {
            model.chapter_id = Set(chapter_id);
        }
        if let Some(creator) = update.creator {
            model.creator = Set(Some(creator));
        }
        if let Some(profile) = update.profile {
            model.profile = Set(Some(profile));
        }
        if let Some(content) = update.content {
            model.content = Set(Some(content));
        }

        let updated = updated_or_none(model.update(&self.db).await, "更新病例失败")?;
        Ok(updated.map(|m| m.into_case()))
    }

    /// 删除病例
    pub async fn delete_case_impl(&self, id: i64) -> Result<bool> {
        let result = Cases::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("删除病例失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::cases::requests::{CaseListQuery, CreateCaseRequest, UpdateCaseRequest};
    use crate::models::teachers::requests::CreateTeacherPromptRequest;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::memory_storage;

    #[tokio::test]
    async fn test_create_case_with_unknown_teacher_is_rejected() {
        let storage = memory_storage().await;
        let err = storage
            .create_case(CreateCaseRequest {
                teacher_id: Some(404),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_list_cases_filters_by_creator_and_teacher() {
        let storage = memory_storage().await;
        let teacher = storage
            .create_teacher_prompt(CreateTeacherPromptRequest {
                memo: Some("fever".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        storage
            .create_case(CreateCaseRequest {
                teacher_id: Some(teacher.id),
                creator: Some("alice".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        storage
            .create_case(CreateCaseRequest {
                creator: Some("alice".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        storage
            .create_case(CreateCaseRequest {
                creator: Some("bob".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let alice = storage
            .list_cases(CaseListQuery {
                creator: Some("alice".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(alice.len(), 2);

        let by_teacher = storage
            .list_cases(CaseListQuery {
                teacher_id: Some(teacher.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_teacher.len(), 1);
        assert_eq!(by_teacher[0].creator.as_deref(), Some("alice"));

        assert_eq!(
            storage
                .list_cases(CaseListQuery::default())
                .await
                .unwrap()
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn test_update_case_can_clear_reference() {
        let storage = memory_storage().await;
        let teacher = storage
            .create_teacher_prompt(CreateTeacherPromptRequest::default())
            .await
            .unwrap();
        let case = storage
            .create_case(CreateCaseRequest {
                teacher_id: Some(teacher.id),
                content: Some("draft".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        // 只改内容时保留关联
        let updated = storage
            .update_case(
                case.id,
                UpdateCaseRequest {
                    content: Some("final".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.teacher_id, Some(teacher.id));
        assert_eq!(updated.content.as_deref(), Some("final"));

        let cleared = storage
            .update_case(
                case.id,
                UpdateCaseRequest {
                    teacher_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.teacher_id, None);
        assert_eq!(cleared.content.as_deref(), Some("final"));
    }

    #[tokio::test]
    async fn test_delete_case() {
        let storage = memory_storage().await;
        let case = storage
            .create_case(CreateCaseRequest::default())
            .await
            .unwrap();
        assert!(storage.delete_case(case.id).await.unwrap());
        assert!(storage.get_case_by_id(case.id).await.unwrap().is_none());
        assert!(!storage.delete_case(case.id).await.unwrap());

        // 已删除的记录更新时返回 None 而不是错误
        let update = UpdateCaseRequest {
            content: Some("late".into()),
            ..Default::default()
        };
        assert!(storage.update_case(case.id, update).await.unwrap().is_none());
    }
}
