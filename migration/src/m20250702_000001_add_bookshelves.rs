use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Bookshelves {
    Table,
    Id,
    UserId,
    NovelId,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookshelves::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookshelves::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookshelves::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Bookshelves::NovelId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Bookshelves::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_bookshelves_user_novel")
                    .table(Bookshelves::Table)
                    .col(Bookshelves::UserId)
                    .col(Bookshelves::NovelId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(Bookshelves::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
