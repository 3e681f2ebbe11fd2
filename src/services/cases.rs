//! 病例保存

use tracing::debug;

use crate::errors::Result;
use crate::models::cases::{entities::Case, requests::CreateCaseRequest};
use crate::storage::Storage;

/// 保存病例所需的参数
#[derive(Debug, Clone, Default)]
pub struct SaveCaseParams {
    /// 提示词备注，用于查找关联的提示词
    pub teacher_memo: Option<String>,
    pub book: String,
    pub chapter: String,
    pub subject: String,
    pub creator: Option<String>,
    pub profile: Option<String>,
    pub content: Option<String>,
}

/// 解析提示词与分类后保存病例
///
/// 找不到提示词时不关联；找不到分类时归入默认分类。
pub async fn save_case(storage: &dyn Storage, params: SaveCaseParams) -> Result<Case> {
    let teacher_id = match params.teacher_memo.as_deref() {
        Some(memo) => storage
            .get_teacher_prompt_by_memo(memo)
            .await?
            .map(|prompt| prompt.id),
        None => None,
    };

    let category = storage
        .get_category(&params.book, &params.chapter, &params.subject)
        .await?;

    debug!(
        "保存病例 (提示词: {:?}, 分类: {})",
        teacher_id, category.id
    );

    storage
        .create_case(CreateCaseRequest {
            teacher_id,
            chapter_id: Some(category.id),
            creator: params.creator,
            profile: params.profile,
            content: params.content,
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::categories::requests::CreateCategoryRequest;
    use crate::models::teachers::requests::CreateTeacherPromptRequest;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, memory_storage};

    async fn seeded() -> SeaOrmStorage {
        let storage = memory_storage().await;
        storage
            .insert_default_category(CreateCategoryRequest {
                book: Some("未分类".into()),
                chapter: Some("未分类".into()),
                subject: Some("未分类".into()),
            })
            .await
            .unwrap();
        storage
    }

    #[tokio::test]
    async fn test_save_case_resolves_teacher_and_category() {
        let storage = seeded().await;
        let teacher = storage
            .create_teacher_prompt(CreateTeacherPromptRequest {
                memo: Some("fever".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let category = storage
            .create_category(CreateCategoryRequest {
                book: Some("内科学".into()),
                chapter: Some("呼吸系统".into()),
                subject: Some("肺炎".into()),
            })
            .await
            .unwrap();

        let case = save_case(
            &storage,
            SaveCaseParams {
                teacher_memo: Some("fever".into()),
                book: "内科学".into(),
                chapter: "呼吸系统".into(),
                subject: "肺炎".into(),
                creator: Some("alice".into()),
                content: Some("transcript".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(case.teacher_id, Some(teacher.id));
        assert_eq!(case.chapter_id, Some(category.id));
        assert_eq!(case.creator.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_save_case_falls_back_to_defaults() {
        let storage = seeded().await;

        let case = save_case(
            &storage,
            SaveCaseParams {
                teacher_memo: Some("unknown".into()),
                book: "X".into(),
                chapter: "Y".into(),
                subject: "Z".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(case.teacher_id, None);
        assert_eq!(case.chapter_id, Some(1));
    }
}
