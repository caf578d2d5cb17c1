use crate::get_db_connection;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use trackgate_error::StorageResult;
use trackgate_models::entities::prelude::{
    LocationData, LocationDataActiveModel, LocationDataColumn, LocationDataModel,
};
use trackgate_sdk::LocationFix;

pub struct LocationRepository;

impl LocationRepository {
    pub async fn insert(fix: &LocationFix) -> StorageResult<()> {
        let db = get_db_connection()?;
        LocationDataActiveModel {
            tracker_id: Set(fix.tracker_id.clone()),
            timestamp: Set(fix.timestamp),
            lat: Set(fix.lat),
            lon: Set(fix.lon),
            speed: Set(fix.speed),
            heading: Set(fix.heading),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        Ok(())
    }

    /// Most recent event for a tracker, if it ever reported one.
    pub async fn latest(tracker_id: &str) -> StorageResult<Option<LocationDataModel>> {
        let db = get_db_connection()?;
        Ok(LocationData::find()
            .filter(LocationDataColumn::TrackerId.eq(tracker_id))
            .order_by_desc(LocationDataColumn::Timestamp)
            .one(&db)
            .await?)
    }

    /// Full history, oldest first.
    pub async fn history(tracker_id: &str) -> StorageResult<Vec<LocationDataModel>> {
        let db = get_db_connection()?;
        Ok(LocationData::find()
            .filter(LocationDataColumn::TrackerId.eq(tracker_id))
            .order_by_asc(LocationDataColumn::Timestamp)
            .all(&db)
            .await?)
    }

    /// History between two epoch timestamps (inclusive), oldest first.
    pub async fn history_range(
        tracker_id: &str,
        start: i64,
        end: i64,
    ) -> StorageResult<Vec<LocationDataModel>> {
        let db = get_db_connection()?;
        Ok(LocationData::find()
            .filter(LocationDataColumn::TrackerId.eq(tracker_id))
            .filter(LocationDataColumn::Timestamp.gte(start))
            .filter(LocationDataColumn::Timestamp.lte(end))
            .order_by_asc(LocationDataColumn::Timestamp)
            .all(&db)
            .await?)
    }

    /// The last `limit` events, returned in chronological order.
    pub async fn history_limit(
        tracker_id: &str,
        limit: u64,
    ) -> StorageResult<Vec<LocationDataModel>> {
        let db = get_db_connection()?;
        let mut rows = LocationData::find()
            .filter(LocationDataColumn::TrackerId.eq(tracker_id))
            .order_by_desc(LocationDataColumn::Timestamp)
            .limit(limit)
            .all(&db)
            .await?;
        rows.reverse();
        Ok(rows)
    }
}
