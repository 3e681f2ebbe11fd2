//! 病例实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "case")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(nullable)]
    pub teacher_id: Option<i64>,
    #[sea_orm(nullable)]
    pub chapter_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub creator: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub profile: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id",
        on_delete = "SetNull"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::ChapterId",
        to = "super::categories::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_case(self) -> crate::models::cases::entities::Case {
        crate::models::cases::entities::Case {
            id: self.id,
            teacher_id: self.teacher_id,
            chapter_id: self.chapter_id,
            creator: self.creator,
            profile: self.profile,
            content: self.content,
        }
    }
}
