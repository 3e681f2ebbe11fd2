//! 预导入模块，方便使用

pub use super::ai_models::{
    ActiveModel as AiModelActiveModel, Entity as AiModels, Model as AiModelModel,
};
pub use super::cases::{ActiveModel as CaseActiveModel, Entity as Cases, Model as CaseModel};
pub use super::categories::{
    ActiveModel as CategoryActiveModel, Entity as Categories, Model as CategoryModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
