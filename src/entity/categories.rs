//! 分类实体（教材 / 章节 / 主题）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub book: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub chapter: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub subject: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cases::Entity")]
    Cases,
}

impl Related<super::cases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_category(self) -> crate::models::categories::entities::Category {
        crate::models::categories::entities::Category {
            id: self.id,
            book: self.book,
            chapter: self.chapter,
            subject: self.subject,
        }
    }
}
