use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
    UserId,
    UserName,
    PenName,
    Email,
    Role,
    Approved,
    Ip,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
    UserId,
}

#[derive(DeriveIden)]
enum Novels {
    Table,
    Id,
    UserId,
    CategoryId,
    Title,
    Description,
    Status,
    IsFree,
    IsShort,
    Published,
    CoverUrl,
    QuotationChapterId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum NovelTags {
    Table,
    Id,
    NovelId,
    TagId,
}

#[derive(DeriveIden)]
enum Chapters {
    Table,
    Id,
    NovelId,
    Title,
    Content,
    IsFree,
    Published,
    ChapterOrder,
    Quotation,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ChapterComments {
    Table,
    Id,
    ChapterId,
    UserId,
    ParentId,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MembershipPlans {
    Table,
    Id,
    Name,
    Description,
    Price,
    PriceCn,
    Duration,
    Features,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserMemberships {
    Table,
    Id,
    UserId,
    PlanId,
    Status,
    StartDate,
    EndDate,
    StripeClientSecret,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Gifts {
    Table,
    Id,
    Name,
    GiftType,
    Price,
    PriceCn,
    IconUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ChapterGifts {
    Table,
    Id,
    UserId,
    NovelId,
    ChapterId,
    GiftId,
    PaymentStatus,
    PaymentMethod,
    StripeClientSecret,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ReadingRecords {
    Table,
    Id,
    UserId,
    NovelId,
    Month,
    ReadingTime,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ContactForms {
    Table,
    Id,
    Title,
    Content,
    Email,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

fn ts_col(name: impl IntoIden) -> ColumnDef {
    let mut col = ColumnDef::new(name);
    col.timestamp_with_time_zone()
        .default(Expr::cust("NOW()"))
        .null();
    col
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // enums
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("user_role"))
                    .values(vec![
                        Alias::new("reader"),
                        Alias::new("author"),
                        Alias::new("admin"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("novel_status"))
                    .values(vec![Alias::new("ongoing"), Alias::new("finished")])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("chapter_policy"))
                    .values(vec![
                        Alias::new("public"),
                        Alias::new("private"),
                        Alias::new("vip"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("membership_status"))
                    .values(vec![
                        Alias::new("pending"),
                        Alias::new("active"),
                        Alias::new("expired"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("gift_type"))
                    .values(vec![
                        Alias::new("must"),
                        Alias::new("random"),
                        Alias::new("negative"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("gift_payment_status"))
                    .values(vec![Alias::new("pending"), Alias::new("paid")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(&mut ts_col(Users::CreatedAt))
                    .col(&mut ts_col(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::UserName)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserProfiles::PenName).string_len(64).null())
                    .col(ColumnDef::new(UserProfiles::Email).string_len(255).not_null())
                    .col(
                        ColumnDef::new(UserProfiles::Role)
                            .custom(Alias::new("user_role"))
                            .not_null()
                            .default(Expr::cust("'reader'::user_role")),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::Approved)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(UserProfiles::Ip).string_len(64).null())
                    .col(&mut ts_col(UserProfiles::CreatedAt))
                    .col(&mut ts_col(UserProfiles::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Categories::Name)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tags::Name)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Tags::UserId).big_integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Novels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Novels::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Novels::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Novels::CategoryId).big_integer().null())
                    .col(ColumnDef::new(Novels::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Novels::Description).text().not_null())
                    .col(
                        ColumnDef::new(Novels::Status)
                            .custom(Alias::new("novel_status"))
                            .not_null()
                            .default(Expr::cust("'ongoing'::novel_status")),
                    )
                    .col(
                        ColumnDef::new(Novels::IsFree)
                            .custom(Alias::new("chapter_policy"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Novels::IsShort)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Novels::Published)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Novels::CoverUrl).string_len(512).null())
                    .col(ColumnDef::new(Novels::QuotationChapterId).big_integer().null())
                    .col(&mut ts_col(Novels::CreatedAt))
                    .col(&mut ts_col(Novels::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_novels_user")
                    .table(Novels::Table)
                    .col(Novels::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NovelTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NovelTags::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NovelTags::NovelId).big_integer().not_null())
                    .col(ColumnDef::new(NovelTags::TagId).big_integer().not_null())
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_novel_tags_pair")
                    .table(NovelTags::Table)
                    .col(NovelTags::NovelId)
                    .col(NovelTags::TagId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Chapters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Chapters::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Chapters::NovelId).big_integer().not_null())
                    .col(ColumnDef::new(Chapters::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Chapters::Content).text().not_null())
                    .col(
                        ColumnDef::new(Chapters::IsFree)
                            .custom(Alias::new("chapter_policy"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Chapters::Published)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Chapters::ChapterOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Chapters::Quotation).text().null())
                    .col(&mut ts_col(Chapters::CreatedAt))
                    .col(&mut ts_col(Chapters::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_chapters_novel_order")
                    .table(Chapters::Table)
                    .col(Chapters::NovelId)
                    .col(Chapters::ChapterOrder)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChapterComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChapterComments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChapterComments::ChapterId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChapterComments::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChapterComments::ParentId).big_integer().null())
                    .col(ColumnDef::new(ChapterComments::Content).text().not_null())
                    .col(&mut ts_col(ChapterComments::CreatedAt))
                    .col(&mut ts_col(ChapterComments::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_chapter_comments_chapter")
                    .table(ChapterComments::Table)
                    .col(ChapterComments::ChapterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MembershipPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MembershipPlans::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MembershipPlans::Name)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MembershipPlans::Description).text().null())
                    .col(ColumnDef::new(MembershipPlans::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(MembershipPlans::PriceCn)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MembershipPlans::Duration)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(MembershipPlans::Features)
                            .json_binary()
                            .null(),
                    )
                    .col(&mut ts_col(MembershipPlans::CreatedAt))
                    .col(&mut ts_col(MembershipPlans::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserMemberships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserMemberships::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserMemberships::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserMemberships::PlanId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserMemberships::Status)
                            .custom(Alias::new("membership_status"))
                            .not_null()
                            .default(Expr::cust("'pending'::membership_status")),
                    )
                    .col(
                        ColumnDef::new(UserMemberships::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserMemberships::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserMemberships::StripeClientSecret)
                            .string_len(255)
                            .null(),
                    )
                    .col(&mut ts_col(UserMemberships::CreatedAt))
                    .col(&mut ts_col(UserMemberships::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_memberships_user")
                    .table(UserMemberships::Table)
                    .col(UserMemberships::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Gifts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Gifts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Gifts::Name).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Gifts::GiftType)
                            .custom(Alias::new("gift_type"))
                            .not_null()
                            .default(Expr::cust("'must'::gift_type")),
                    )
                    .col(ColumnDef::new(Gifts::Price).big_integer().not_null())
                    .col(ColumnDef::new(Gifts::PriceCn).big_integer().not_null())
                    .col(ColumnDef::new(Gifts::IconUrl).string_len(512).null())
                    .col(&mut ts_col(Gifts::CreatedAt))
                    .col(&mut ts_col(Gifts::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChapterGifts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChapterGifts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChapterGifts::UserId).big_integer().not_null())
                    .col(ColumnDef::new(ChapterGifts::NovelId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ChapterGifts::ChapterId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChapterGifts::GiftId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ChapterGifts::PaymentStatus)
                            .custom(Alias::new("gift_payment_status"))
                            .not_null()
                            .default(Expr::cust("'pending'::gift_payment_status")),
                    )
                    .col(
                        ColumnDef::new(ChapterGifts::PaymentMethod)
                            .string_len(32)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ChapterGifts::StripeClientSecret)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ChapterGifts::PaidAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(&mut ts_col(ChapterGifts::CreatedAt))
                    .col(&mut ts_col(ChapterGifts::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        // idempotent retries key on (user, chapter, intent reference)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_chapter_gifts_user_chapter_secret")
                    .table(ChapterGifts::Table)
                    .col(ChapterGifts::UserId)
                    .col(ChapterGifts::ChapterId)
                    .col(ChapterGifts::StripeClientSecret)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReadingRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReadingRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReadingRecords::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReadingRecords::NovelId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReadingRecords::Month).string_len(7).not_null())
                    .col(
                        ColumnDef::new(ReadingRecords::ReadingTime)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(&mut ts_col(ReadingRecords::CreatedAt))
                    .col(&mut ts_col(ReadingRecords::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_reading_records_user_novel_month")
                    .table(ReadingRecords::Table)
                    .col(ReadingRecords::UserId)
                    .col(ReadingRecords::NovelId)
                    .col(ReadingRecords::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContactForms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContactForms::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContactForms::Title).string_len(255).not_null())
                    .col(ColumnDef::new(ContactForms::Content).text().not_null())
                    .col(ColumnDef::new(ContactForms::Email).string_len(255).not_null())
                    .col(&mut ts_col(ContactForms::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "contact_forms",
            "reading_records",
            "chapter_gifts",
            "gifts",
            "user_memberships",
            "membership_plans",
            "chapter_comments",
            "chapters",
            "novel_tags",
            "novels",
            "tags",
            "categories",
            "user_profiles",
            "users",
        ] {
            manager
                .drop_table(Table::drop().if_exists().table(Alias::new(table)).to_owned())
                .await?;
        }
        for ty in [
            "gift_payment_status",
            "gift_type",
            "membership_status",
            "chapter_policy",
            "novel_status",
            "user_role",
        ] {
            manager
                .drop_type(Type::drop().name(Alias::new(ty)).to_owned())
                .await?;
        }
        Ok(())
    }
}
