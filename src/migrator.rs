use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251104_000001_create_production_orders_table::Migration),
            Box::new(m20251104_000002_create_projects_table::Migration),
            Box::new(m20251104_000003_create_settings_table::Migration),
        ]
    }
}

mod m20251104_000001_create_production_orders_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20251104_000001_create_production_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductionOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductionOrders::OrderId)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ProductionOrders::CustomerName)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(ProductionOrders::ProductDescription)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(ProductionOrders::Quantity).integer().not_null())
                        .col(ColumnDef::new(ProductionOrders::OrderDate).date().null())
                        .col(ColumnDef::new(ProductionOrders::TargetDate).date().null())
                        .col(ColumnDef::new(ProductionOrders::ProjectId).string().null())
                        .col(
                            ColumnDef::new(ProductionOrders::PicName)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(ProductionOrders::Priority)
                                .string()
                                .not_null()
                                .default("medium"),
                        )
                        .col(
                            ColumnDef::new(ProductionOrders::RequiresAccessories)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ProductionOrders::RequiresWelding)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ProductionOrders::Notes)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(ProductionOrders::RiskLevel)
                                .string()
                                .not_null()
                                .default("LOW"),
                        )
                        .col(
                            ColumnDef::new(ProductionOrders::RiskScore)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(ProductionOrders::Tracking).json().not_null())
                        .col(
                            ColumnDef::new(ProductionOrders::Progress)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductionOrders::CurrentStatus)
                                .string()
                                .not_null()
                                .default("pending"),
                        )
                        .col(
                            ColumnDef::new(ProductionOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_production_orders_project_id")
                        .table(ProductionOrders::Table)
                        .col(ProductionOrders::ProjectId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_production_orders_current_status")
                        .table(ProductionOrders::Table)
                        .col(ProductionOrders::CurrentStatus)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductionOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ProductionOrders {
        Table,
        OrderId,
        CustomerName,
        ProductDescription,
        Quantity,
        OrderDate,
        TargetDate,
        ProjectId,
        PicName,
        Priority,
        RequiresAccessories,
        RequiresWelding,
        Notes,
        RiskLevel,
        RiskScore,
        Tracking,
        Progress,
        CurrentStatus,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20251104_000002_create_projects_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20251104_000002_create_projects_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Projects::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Projects::ProjectId)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Projects::ProjectName).string().not_null())
                        .col(
                            ColumnDef::new(Projects::Client)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Projects::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Projects::Status)
                                .string()
                                .not_null()
                                .default("active"),
                        )
                        .col(ColumnDef::new(Projects::StartDate).date().null())
                        .col(ColumnDef::new(Projects::TargetDate).date().null())
                        .col(
                            ColumnDef::new(Projects::Notes)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Projects::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Projects::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Projects::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Projects {
        Table,
        ProjectId,
        ProjectName,
        Client,
        Description,
        Status,
        StartDate,
        TargetDate,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20251104_000003_create_settings_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20251104_000003_create_settings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Settings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Settings::Id)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Settings::Document).json().not_null())
                        .col(
                            ColumnDef::new(Settings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Settings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Settings {
        Table,
        Id,
        Document,
        UpdatedAt,
    }
}
