//! 跨表通用操作：去重取值与整表导出

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{ai_models, categories, teachers};
use crate::errors::{ClinicError, Result};
use crate::models::common::{DistinctField, TableKind};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::debug;

/// 查询某列的非空去重值
async fn distinct_values<E, C>(db: &DatabaseConnection, column: C) -> Result<Vec<String>>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    E::find()
        .select_only()
        .column(column)
        .distinct()
        .filter(column.is_not_null())
        .order_by_asc(column)
        .into_tuple::<String>()
        .all(db)
        .await
        .map_err(|e| ClinicError::database_operation(format!("查询去重字段失败: {e}")))
}

/// 以 JSON 对象的形式读取整张表
async fn dump_rows<E>(db: &DatabaseConnection) -> Result<Vec<serde_json::Value>>
where
    E: EntityTrait,
{
    E::find()
        .into_json()
        .all(db)
        .await
        .map_err(|e| ClinicError::database_operation(format!("导出数据表失败: {e}")))
}

impl SeaOrmStorage {
    pub async fn select_distinct_values_impl(&self, field: DistinctField) -> Result<Vec<String>> {
        debug!("查询 {} 表去重取值: {:?}", field.table().table_name(), field);
        let db = &self.db;
        match field {
            DistinctField::CategoryBook => {
                distinct_values::<Categories, _>(db, categories::Column::Book).await
            }
            DistinctField::CategoryChapter => {
                distinct_values::<Categories, _>(db, categories::Column::Chapter).await
            }
            DistinctField::CategorySubject => {
                distinct_values::<Categories, _>(db, categories::Column::Subject).await
            }
            DistinctField::ModelPlatform => {
                distinct_values::<AiModels, _>(db, ai_models::Column::Platform).await
            }
            DistinctField::ModelSeries => {
                distinct_values::<AiModels, _>(db, ai_models::Column::Series).await
            }
            DistinctField::ModelModule => {
                distinct_values::<AiModels, _>(db, ai_models::Column::Module).await
            }
            DistinctField::TeacherModel => {
                distinct_values::<Teachers, _>(db, teachers::Column::Model).await
            }
            DistinctField::TeacherCreator => {
                distinct_values::<Teachers, _>(db, teachers::Column::Creator).await
            }
        }
    }

    pub async fn export_table_impl(&self, kind: TableKind) -> Result<Vec<serde_json::Value>> {
        let db = &self.db;
        match kind {
            TableKind::User => dump_rows::<Users>(db).await,
            TableKind::Model => dump_rows::<AiModels>(db).await,
            TableKind::Teacher => dump_rows::<Teachers>(db).await,
            TableKind::Category => dump_rows::<Categories>(db).await,
            TableKind::Case => dump_rows::<Cases>(db).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::categories::requests::CreateCategoryRequest;
    use crate::models::common::{DistinctField, TableKind};
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::memory_storage;

    #[tokio::test]
    async fn test_distinct_values_skip_nulls_and_duplicates() {
        let storage = memory_storage().await;
        for (book, chapter) in [
            (Some("内科学"), "呼吸"),
            (Some("内科学"), "循环"),
            (Some("外科学"), "腹部"),
            (None, "未知"),
        ] {
            storage
                .create_category(CreateCategoryRequest {
                    book: book.map(String::from),
                    chapter: Some(chapter.into()),
                    subject: None,
                })
                .await
                .unwrap();
        }

        let books = storage
            .select_distinct_values(DistinctField::CategoryBook)
            .await
            .unwrap();
        assert_eq!(books, vec!["内科学".to_string(), "外科学".to_string()]);

        let subjects = storage
            .select_distinct_values(DistinctField::CategorySubject)
            .await
            .unwrap();
        assert!(subjects.is_empty());
    }

    #[tokio::test]
    async fn test_export_table_returns_rows_as_objects() {
        let storage = memory_storage().await;
        storage
            .create_user(CreateUserRequest {
                name: "alice".into(),
                password: "hash".into(),
                role: UserRole::Teacher,
            })
            .await
            .unwrap();

        let rows = storage.export_table(TableKind::User).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "alice");
        assert_eq!(rows[0]["role"], "teacher");

        assert!(storage.export_table(TableKind::Case).await.unwrap().is_empty());
    }
}
