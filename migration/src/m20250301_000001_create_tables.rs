use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(User::Name).text().not_null().unique_key())
                    .col(ColumnDef::new(User::Password).text().null())
                    .col(ColumnDef::new(User::Role).text().null())
                    .to_owned(),
            )
            .await?;

        // 创建模型表
        manager
            .create_table(
                Table::create()
                    .table(Model::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Model::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Model::Use).boolean().null())
                    .col(ColumnDef::new(Model::Free).boolean().null())
                    .col(ColumnDef::new(Model::Platform).text().null())
                    .col(ColumnDef::new(Model::Series).text().null())
                    .col(ColumnDef::new(Model::Name).text().null())
                    .col(ColumnDef::new(Model::Module).text().null())
                    .col(ColumnDef::new(Model::PriceInput).double().null())
                    .col(ColumnDef::new(Model::PriceOutput).double().null())
                    .to_owned(),
            )
            .await?;

        // 创建教师提示词表
        manager
            .create_table(
                Table::create()
                    .table(Teacher::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teacher::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Teacher::Prompt).text().null())
                    .col(ColumnDef::new(Teacher::Memo).text().null())
                    .col(ColumnDef::new(Teacher::Model).text().null())
                    .col(ColumnDef::new(Teacher::Creator).text().null())
                    .col(ColumnDef::new(Teacher::Public).boolean().null())
                    .to_owned(),
            )
            .await?;

        // 创建分类表
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Category::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Category::Book).text().null())
                    .col(ColumnDef::new(Category::Chapter).text().null())
                    .col(ColumnDef::new(Category::Subject).text().null())
                    .to_owned(),
            )
            .await?;

        // 创建病例表
        manager
            .create_table(
                Table::create()
                    .table(Case::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Case::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Case::TeacherId).big_integer().null())
                    .col(ColumnDef::new(Case::ChapterId).big_integer().null())
                    .col(ColumnDef::new(Case::Creator).text().null())
                    .col(ColumnDef::new(Case::Profile).text().null())
                    .col(ColumnDef::new(Case::Content).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Case::Table, Case::TeacherId)
                            .to(Teacher::Table, Teacher::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Case::Table, Case::ChapterId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 病例表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_case_teacher_id")
                    .table(Case::Table)
                    .col(Case::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_case_chapter_id")
                    .table(Case::Table)
                    .col(Case::ChapterId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Case::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teacher::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Model::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "user")]
    Table,
    Id,
    Name,
    Password,
    Role,
}

#[derive(DeriveIden)]
enum Model {
    #[sea_orm(iden = "model")]
    Table,
    Id,
    Use,
    Free,
    Platform,
    Series,
    Name,
    Module,
    PriceInput,
    PriceOutput,
}

#[derive(DeriveIden)]
enum Teacher {
    #[sea_orm(iden = "teacher")]
    Table,
    Id,
    Prompt,
    Memo,
    Model,
    Creator,
    Public,
}

#[derive(DeriveIden)]
enum Category {
    #[sea_orm(iden = "category")]
    Table,
    Id,
    Book,
    Chapter,
    Subject,
}

#[derive(DeriveIden)]
enum Case {
    #[sea_orm(iden = "case")]
    Table,
    Id,
    TeacherId,
    ChapterId,
    Creator,
    Profile,
    Content,
}
