//! Creates the `users` and `logs` tables.
//!
//! Column lengths come from `userlog_core::schema` so the DDL and the
//! validation rules cannot drift apart.

use sea_orm_migration::prelude::*;
use userlog_core::schema::{
    LOG_TEXT_MAX_LEN, USER_EMAIL_MAX_LEN, USER_NAME_MAX_LEN, USER_SURNAME_MAX_LEN,
};

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
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Name)
                            .string_len(column_len(USER_NAME_MAX_LEN))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::Surname)
                            .string_len(column_len(USER_SURNAME_MAX_LEN))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(column_len(USER_EMAIL_MAX_LEN))
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Logs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Logs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Logs::Log)
                            .string_len(column_len(LOG_TEXT_MAX_LEN))
                            .null(),
                    )
                    .col(ColumnDef::new(Logs::UserId).integer().null())
                    .col(
                        ColumnDef::new(Logs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Logs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_logs_user_id")
                            .from(Logs::Table, Logs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_logs_user_id")
                    .table(Logs::Table)
                    .col(Logs::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Logs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await
    }
}

fn column_len(max: usize) -> u32 {
    <u32 as TryFrom<usize>>::try_from(max).unwrap_or(u32::MAX)
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Surname,
    Email,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Logs {
    Table,
    Id,
    Log,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_len() {
        assert_eq!(column_len(USER_NAME_MAX_LEN), 50);
        assert_eq!(column_len(USER_EMAIL_MAX_LEN), 100);
        assert_eq!(column_len(usize::MAX), u32::MAX);
    }
}
