use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, sea_query::OnConflict,
};
use serde::Serialize;

use crate::{
    entities::{event, location, movie, weather},
    error::AppResult,
    models::{Event, Location, Movie, Weather, now_sec},
};

/// Append-only cache over the location-keyed tables. Nothing here ever
/// updates, expires or deletes a row.
#[derive(Clone)]
pub struct CacheManager {
    db: DatabaseConnection,
}

impl CacheManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_location(&self, search_query: &str) -> AppResult<Option<Location>> {
        let row = location::Entity::find()
            .filter(location::Column::SearchQuery.eq(search_query))
            .one(&self.db)
            .await?;
        Ok(row.map(Location::from))
    }

    /// Inserts the location unless its search text is already stored.
    /// Returns the generated id, or `None` when the insert was ignored.
    pub async fn insert_location(&self, loc: &Location) -> AppResult<Option<i32>> {
        let model = location::ActiveModel {
            id: Default::default(),
            search_query: Set(loc.search_query.clone()),
            formatted_query: Set(loc.formatted_query.clone()),
            latitude: Set(loc.latitude),
            longitude: Set(loc.longitude),
        };

        let result = location::Entity::insert(model)
            .on_conflict(OnConflict::column(location::Column::SearchQuery).do_nothing().to_owned())
            .exec(&self.db)
            .await;

        match result {
            Ok(res) => Ok(Some(res.last_insert_id)),
            Err(DbErr::RecordNotInserted) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get_weather(&self, location_id: i32) -> AppResult<Vec<Weather>> {
        let rows = weather::Entity::find()
            .filter(weather::Column::LocationId.eq(location_id))
            .order_by_asc(weather::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Weather::from).collect())
    }

    pub async fn put_weather(&self, location_id: i32, entries: &[Weather]) -> usize {
        let models = entries.iter().map(|w| weather::ActiveModel {
            id: Default::default(),
            location_id: Set(location_id),
            forecast: Set(w.forecast.clone()),
            weather_time: Set(w.time.clone()),
        });
        self.insert_each(Weather::TABLE, location_id, models).await
    }

    pub async fn get_events(&self, location_id: i32) -> AppResult<Vec<Event>> {
        let rows = event::Entity::find()
            .filter(event::Column::LocationId.eq(location_id))
            .order_by_asc(event::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    pub async fn put_events(&self, location_id: i32, events: &[Event]) -> usize {
        let now = now_sec();
        let models = events.iter().map(|e| event::ActiveModel {
            id: Default::default(),
            location_id: Set(location_id),
            created_at: Set(now),
            link: Set(e.link.clone()),
            name: Set(e.name.clone()),
            event_date: Set(e.event_date.clone()),
            summary: Set(e.summary.clone()),
        });
        self.insert_each(Event::TABLE, location_id, models).await
    }

    pub async fn get_movies(&self, location_id: i32) -> AppResult<Vec<Movie>> {
        let rows = movie::Entity::find()
            .filter(movie::Column::LocationId.eq(location_id))
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn put_movies(&self, location_id: i32, movies: &[Movie]) -> usize {
        let now = now_sec();
        let models = movies.iter().map(|m| movie::ActiveModel {
            id: Default::default(),
            location_id: Set(location_id),
            created_at: Set(now),
            title: Set(m.title.clone()),
            overview: Set(m.overview.clone()),
            avg_votes: Set(m.avg_votes),
            total_votes: Set(m.total_votes),
            image_url: Set(m.image_url.clone()),
            popularity: Set(m.popularity),
            release_date: Set(m.release_date.clone()),
        });
        self.insert_each(Movie::TABLE, location_id, models).await
    }

    /// Inserts rows one at a time, outside any transaction. A failed insert is
    /// logged and skipped; the count of rows written is returned.
    async fn insert_each<A>(
        &self,
        table: &'static str,
        location_id: i32,
        models: impl Iterator<Item = A>,
    ) -> usize
    where
        A: ActiveModelTrait + Send,
    {
        let mut stored = 0;
        for model in models {
            match <A::Entity as EntityTrait>::insert(model).exec(&self.db).await {
                Ok(_) => stored += 1,
                Err(err) => {
                    tracing::warn!(table, location_id, error = %err, "failed to cache row");
                },
            }
        }
        stored
    }
}

/// A location-keyed resource that lives in its own cache table.
#[async_trait]
pub trait Resource: Serialize + Send + Sync + Sized + 'static {
    const TABLE: &'static str;

    async fn cached(cache: &CacheManager, location_id: i32) -> AppResult<Vec<Self>>;

    async fn store(cache: &CacheManager, location_id: i32, records: &[Self]) -> usize;
}

#[async_trait]
impl Resource for Weather {
    const TABLE: &'static str = "weather";

    async fn cached(cache: &CacheManager, location_id: i32) -> AppResult<Vec<Self>> {
        cache.get_weather(location_id).await
    }

    async fn store(cache: &CacheManager, location_id: i32, records: &[Self]) -> usize {
        cache.put_weather(location_id, records).await
    }
}

#[async_trait]
impl Resource for Event {
    const TABLE: &'static str = "events";

    async fn cached(cache: &CacheManager, location_id: i32) -> AppResult<Vec<Self>> {
        cache.get_events(location_id).await
    }

    async fn store(cache: &CacheManager, location_id: i32, records: &[Self]) -> usize {
        cache.put_events(location_id, records).await
    }
}

#[async_trait]
impl Resource for Movie {
    const TABLE: &'static str = "movies";

    async fn cached(cache: &CacheManager, location_id: i32) -> AppResult<Vec<Self>> {
        cache.get_movies(location_id).await
    }

    async fn store(cache: &CacheManager, location_id: i32, records: &[Self]) -> usize {
        cache.put_movies(location_id, records).await
    }
}
