//! Create topic table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Topic::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Topic::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Topic::EventId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Topic::Slug)
                            .string_len(200)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Topic::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Topic::Description).text().null())
                    .col(ColumnDef::new(Topic::CreatorId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Topic::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Topic::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Topic::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Topic::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_topic_event")
                            .from(Topic::Table, Topic::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_topic_creator")
                            .from(Topic::Table, Topic::CreatorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (event_id, is_deleted, created_at) - covers the ranked listing filter
        manager
            .create_index(
                Index::create()
                    .name("idx_topic_event_deleted_created")
                    .table(Topic::Table)
                    .col(Topic::EventId)
                    .col(Topic::IsDeleted)
                    .col(Topic::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: creator_id (for ownership checks and per-user listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_topic_creator_id")
                    .table(Topic::Table)
                    .col(Topic::CreatorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Topic::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Topic {
    Table,
    Id,
    EventId,
    Slug,
    Title,
    Description,
    CreatorId,
    IsDeleted,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Event {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
