use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Weather::Table)
                    .if_not_exists()
                    .col(pk_auto(Weather::Id))
                    .col(integer(Weather::LocationId))
                    .col(string(Weather::Forecast))
                    .col(string(Weather::WeatherTime))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_weather_location_id")
                            .from(Weather::Table, Weather::LocationId)
                            .to(Locations::Table, Locations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_weather_location_id")
                    .table(Weather::Table)
                    .col(Weather::LocationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(pk_auto(Events::Id))
                    .col(integer(Events::LocationId))
                    .col(big_integer(Events::CreatedAt))
                    .col(string(Events::Link))
                    .col(string(Events::Name))
                    .col(string(Events::EventDate))
                    .col(text_null(Events::Summary))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_location_id")
                            .from(Events::Table, Events::LocationId)
                            .to(Locations::Table, Locations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_location_id")
                    .table(Events::Table)
                    .col(Events::LocationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(integer(Movies::LocationId))
                    .col(big_integer(Movies::CreatedAt))
                    .col(string(Movies::Title))
                    .col(text(Movies::Overview))
                    .col(double(Movies::AvgVotes))
                    .col(integer(Movies::TotalVotes))
                    .col(string_null(Movies::ImageUrl))
                    .col(double(Movies::Popularity))
                    .col(string(Movies::ReleaseDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_location_id")
                            .from(Movies::Table, Movies::LocationId)
                            .to(Locations::Table, Locations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_location_id")
                    .table(Movies::Table)
                    .col(Movies::LocationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Events::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Weather::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Weather {
    Table,
    Id,
    LocationId,
    Forecast,
    WeatherTime,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    LocationId,
    CreatedAt,
    Link,
    Name,
    EventDate,
    Summary,
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    LocationId,
    CreatedAt,
    Title,
    Overview,
    AvgVotes,
    TotalVotes,
    ImageUrl,
    Popularity,
    ReleaseDate,
}
