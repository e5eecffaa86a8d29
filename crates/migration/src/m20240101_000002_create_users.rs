//! Create `users` table.
//!
//! One account per person; `ref_id` points at the matching `dosen` or
//! `mahasiswa` row depending on `user_type`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid(Users::Id).primary_key())
                    .col(string_len(Users::Username, 50).unique_key().not_null())
                    .col(string_len(Users::Email, 100).unique_key().not_null())
                    .col(string_len(Users::PasswordHash, 255).not_null())
                    .col(string_len(Users::UserType, 20).not_null())
                    .col(string_len_null(Users::RefId, 20))
                    .col(boolean(Users::IsActive).not_null().default(true))
                    // Explicitly nullable: only set after the first login
                    .col(
                        ColumnDef::new(Users::LastLogin)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Users::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Users::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Id, Username, Email, PasswordHash, UserType, RefId, IsActive, LastLogin, CreatedAt, UpdatedAt }
