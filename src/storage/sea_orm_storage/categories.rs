//! 分类存储操作

use super::{SeaOrmStorage, finalize_transaction, sequence_realign_sql, updated_or_none};
use crate::entity::cases::{Column as CaseColumn, Entity as Cases};
use crate::entity::categories::{ActiveModel, Column, Entity as Categories};
use crate::errors::{ClinicError, Result};
use crate::models::categories::{
    entities::{Category, DEFAULT_CATEGORY_ID},
    requests::{CreateCategoryRequest, UpdateCategoryRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use tracing::debug;

impl SeaOrmStorage {
    /// 创建分类
    pub async fn create_category_impl(&self, req: CreateCategoryRequest) -> Result<Category> {
        let model = ActiveModel {
            book: Set(req.book),
            chapter: Set(req.chapter),
            subject: Set(req.subject),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClinicError::from_db("创建分类失败", e))?;

        Ok(result.into_category())
    }

    /// 通过 ID 获取分类
    pub async fn get_category_by_id_impl(&self, id: i64) -> Result<Option<Category>> {
        let result = Categories::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询分类失败: {e}")))?;

        Ok(result.map(|m| m.into_category()))
    }

    /// 精确匹配 教材/章节/主题，找不到时回退到默认分类
    pub async fn get_category_impl(
        &self,
        book: &str,
        chapter: &str,
        subject: &str,
    ) -> Result<Category> {
        let matched = Categories::find()
            .filter(Column::Book.eq(book))
            .filter(Column::Chapter.eq(chapter))
            .filter(Column::Subject.eq(subject))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询分类失败: {e}")))?;

        if let Some(category) = matched {
            return Ok(category.into_category());
        }

        debug!(
            "分类 {}/{}/{} 不存在，使用默认分类",
            book, chapter, subject
        );
        self.get_category_by_id_impl(DEFAULT_CATEGORY_ID)
            .await?
            .ok_or_else(|| {
                ClinicError::not_found(format!("默认分类不存在 (ID: {DEFAULT_CATEGORY_ID})"))
            })
    }

    /// 列出全部分类
    pub async fn list_categories_impl(&self) -> Result<Vec<Category>> {
        let categories = Categories::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("查询分类列表失败: {e}")))?;

        Ok(categories.into_iter().map(|m| m.into_category()).collect())
    }

    /// 更新分类
    pub async fn update_category_impl(
        &self,
        id: i64,
        update: UpdateCategoryRequest,
    ) -> Result<Option<Category>> {
        if update.is_empty() {
            return self.get_category_by_id_impl(id).await;
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(book) = update.book {
            model.book = Set(Some(book));
        }
        if let Some(chapter) = update.chapter {
            model.chapter = Set(Some(chapter));
        }
        if let Some(subject) = update.subject {
            model.subject = Set(Some(subject));
        }

        let updated = updated_or_none(model.update(&self.db).await, "更新分类失败")?;
        Ok(updated.map(|m| m.into_category()))
    }

    /// 删除分类
    ///
    /// 默认分类不可删除；关联病例的 chapter_id 在同一事务中置空。
    pub async fn delete_category_impl(&self, id: i64) -> Result<bool> {
        if id == DEFAULT_CATEGORY_ID {
            return Err(ClinicError::validation("默认分类不可删除"));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClinicError::database_operation(format!("开启事务失败: {e}")))?;

        let result = Self::detach_and_delete_category(&txn, id).await;
        finalize_transaction(txn, result).await
    }

    async fn detach_and_delete_category<C: ConnectionTrait>(conn: &C, id: i64) -> Result<bool> {
        Cases::update_many()
            .col_expr(CaseColumn::ChapterId, Expr::value(Option::<i64>::None))
            .filter(CaseColumn::ChapterId.eq(id))
            .exec(conn)
            .await
            .map_err(|e| ClinicError::database_operation(format!("解除病例关联失败: {e}")))?;

        let result = Categories::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| ClinicError::database_operation(format!("删除分类失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计分类数量
    pub async fn count_categories_impl(&self) -> Result<u64> {
        let count = Categories::find()
            .count(&self.db)
            .await
            .map_err(|e| ClinicError::database_operation(format!("统计分类数量失败: {e}")))?;

        Ok(count)
    }

    /// 写入默认分类（固定 ID）
    pub async fn insert_default_category(&self, req: CreateCategoryRequest) -> Result<Category> {
        let model = ActiveModel {
            id: Set(DEFAULT_CATEGORY_ID),
            book: Set(req.book),
            chapter: Set(req.chapter),
            subject: Set(req.subject),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClinicError::from_db("创建默认分类失败", e))?;

        if let Some(sql) = sequence_realign_sql(self.db.get_database_backend(), "category") {
            self.db
                .execute_unprepared(&sql)
                .await
                .map_err(|e| ClinicError::database_operation(format!("校正分类序列失败: {e}")))?;
            debug!("分类主键序列已校正");
        }

        Ok(result.into_category())
    }
}
