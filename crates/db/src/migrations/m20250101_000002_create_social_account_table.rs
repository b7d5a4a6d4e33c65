//! Create social account table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SocialAccount::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialAccount::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SocialAccount::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialAccount::Provider)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SocialAccount::AvatarUrl).string().null())
                    .col(
                        ColumnDef::new(SocialAccount::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_account_user")
                            .from(SocialAccount::Table, SocialAccount::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one linked account per provider per user
        manager
            .create_index(
                Index::create()
                    .name("idx_social_account_user_provider")
                    .table(SocialAccount::Table)
                    .col(SocialAccount::UserId)
                    .col(SocialAccount::Provider)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SocialAccount::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SocialAccount {
    Table,
    Id,
    UserId,
    Provider,
    AvatarUrl,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
