//! 模型目录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "model")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "use", nullable)]
    pub in_use: Option<bool>,
    #[sea_orm(nullable)]
    pub free: Option<bool>,
    #[sea_orm(column_type = "Text", nullable)]
    pub platform: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub series: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub module: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub price_input: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub price_output: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_ai_model(self) -> crate::models::ai_models::entities::AiModel {
        crate::models::ai_models::entities::AiModel {
            id: self.id,
            in_use: self.in_use.unwrap_or(false),
            free: self.free.unwrap_or(false),
            platform: self.platform,
            series: self.series,
            name: self.name,
            module: self.module,
            price_input: self.price_input,
            price_output: self.price_output,
        }
    }
}
