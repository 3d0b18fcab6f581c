//! Initial schema migration.
//!
//! - `users`: authentication and role
//! - `clients`: customers
//! - `projects`: construction jobs, with an optional embedded client name
//! - `revenues`: revenue line items referencing projects and clients by id

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    Role,
}

#[derive(Iden)]
enum Clients {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    ProjectNumber,
    ProjectName,
    ClientName,
}

#[derive(Iden)]
enum Revenues {
    Table,
    Id,
    Date,
    InvoiceNumber,
    AmountMinor,
    Description,
    AccountCode,
    AccountName,
    ExternalTxnId,
    ProjectId,
    ClientId,
    IsSplit,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("viewer"),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Clients
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clients::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Clients::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Projects
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Projects::ProjectNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Projects::ProjectName).string().not_null())
                    .col(ColumnDef::new(Projects::ClientName).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Revenues
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Revenues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Revenues::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Revenues::Date).date().not_null())
                    .col(ColumnDef::new(Revenues::InvoiceNumber).string())
                    .col(
                        ColumnDef::new(Revenues::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Revenues::Description).string())
                    .col(ColumnDef::new(Revenues::AccountCode).string())
                    .col(ColumnDef::new(Revenues::AccountName).string())
                    .col(ColumnDef::new(Revenues::ExternalTxnId).string())
                    .col(ColumnDef::new(Revenues::ProjectId).string())
                    .col(ColumnDef::new(Revenues::ClientId).string())
                    .col(
                        ColumnDef::new(Revenues::IsSplit)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-revenues-project_id")
                            .from(Revenues::Table, Revenues::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-revenues-client_id")
                            .from(Revenues::Table, Revenues::ClientId)
                            .to(Clients::Table, Clients::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-revenues-date")
                    .table(Revenues::Table)
                    .col(Revenues::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Revenues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
