use sea_orm_migration::prelude::*;

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
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::ApiKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Admin).boolean().not_null())
                    .col(ColumnDef::new(Users::Enabled).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Trackers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trackers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Trackers::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Trackers::Owner).integer().not_null())
                    .col(ColumnDef::new(Trackers::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(Trackers::Model).string().not_null())
                    .col(ColumnDef::new(Trackers::Enabled).boolean().not_null())
                    .col(
                        ColumnDef::new(Trackers::LastConnected)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trackers_owner")
                            .from(Trackers::Table, Trackers::Owner)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LocationData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LocationData::EntryId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LocationData::TrackerId).string().not_null())
                    .col(
                        ColumnDef::new(LocationData::Timestamp)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LocationData::Lat).unsigned().not_null())
                    .col(ColumnDef::new(LocationData::Lon).unsigned().not_null())
                    .col(
                        ColumnDef::new(LocationData::Speed)
                            .small_unsigned()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LocationData::Heading)
                            .small_unsigned()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_data_tracker")
                            .from(LocationData::Table, LocationData::TrackerId)
                            .to(Trackers::Table, Trackers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_location_data_tracker_timestamp")
                    .table(LocationData::Table)
                    .col(LocationData::TrackerId)
                    .col(LocationData::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuthCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthCodes::TrackerId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuthCodes::Code).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_auth_codes_tracker")
                            .from(AuthCodes::Table, AuthCodes::TrackerId)
                            .to(Trackers::Table, Trackers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeviceModels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeviceModels::Name)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeviceModels::InitCommands)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeviceModels::SuccessKeywords)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LocationData::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthCodes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeviceModels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trackers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    ApiKey,
    Admin,
    Enabled,
}

#[derive(DeriveIden)]
enum Trackers {
    Table,
    Id,
    Name,
    Owner,
    PhoneNumber,
    Model,
    Enabled,
    LastConnected,
}

#[derive(DeriveIden)]
enum LocationData {
    Table,
    EntryId,
    TrackerId,
    Timestamp,
    Lat,
    Lon,
    Speed,
    Heading,
}

#[derive(DeriveIden)]
enum AuthCodes {
    Table,
    TrackerId,
    Code,
}

#[derive(DeriveIden)]
enum DeviceModels {
    Table,
    Name,
    InitCommands,
    SuccessKeywords,
}
