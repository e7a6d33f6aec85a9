use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Novels {
    Table,
    WordCount,
}

#[derive(DeriveIden)]
enum Chapters {
    Table,
    WordCount,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Chapters::Table)
                    .add_column(
                        ColumnDef::new(Chapters::WordCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Novels::Table)
                    .add_column(
                        ColumnDef::new(Novels::WordCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Novels::Table)
                    .drop_column(Novels::WordCount)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Chapters::Table)
                    .drop_column(Chapters::WordCount)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
