use crate::get_db_connection;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use trackgate_error::StorageResult;
use trackgate_models::domain::prelude::{NewTracker, RegistrationOutcome};
use trackgate_models::entities::prelude::{
    Tracker, TrackerActiveModel, TrackerColumn, TrackerModel,
};

pub struct TrackerRepository;

impl TrackerRepository {
    /// Insert a new tracker. On a constraint conflict the failure is
    /// classified so the control plane can answer precisely.
    pub async fn register(tracker: NewTracker, owner: i32) -> StorageResult<RegistrationOutcome> {
        let db = get_db_connection()?;
        let row = TrackerActiveModel {
            id: Set(tracker.id.clone()),
            name: Set(tracker.name.clone()),
            owner: Set(owner),
            phone_number: Set(tracker.phone_number),
            model: Set(tracker.model),
            enabled: Set(tracker.enabled),
            last_connected: Set(0),
        };

        match row.insert(&db).await {
            Ok(_) => Ok(RegistrationOutcome::Success),
            Err(_) => Self::classify_conflict(&tracker.id, &tracker.name, owner).await,
        }
    }

    /// Decide which conflict made an insert fail, mirroring the outcome
    /// variants the registration endpoint reports.
    async fn classify_conflict(
        id: &str,
        name: &str,
        owner: i32,
    ) -> StorageResult<RegistrationOutcome> {
        let same_id = Self::find_by_id(id).await?;
        let same_name = Self::find_by_name(name).await?;

        Ok(match (same_id, same_name) {
            (None, None) => RegistrationOutcome::Unknown,
            (Some(t), _) if t.id == id && t.name == name => RegistrationOutcome::IdenticalExists,
            (Some(t), _) if t.owner != owner => RegistrationOutcome::IdUsedByOther,
            (Some(_), _) => RegistrationOutcome::IdUsedByOwner,
            (None, Some(t)) if t.owner != owner => RegistrationOutcome::NameUsedByOther,
            (None, Some(_)) => RegistrationOutcome::NameUsedByOwner,
        })
    }

    pub async fn find_by_id(id: &str) -> StorageResult<Option<TrackerModel>> {
        let db = get_db_connection()?;
        Ok(Tracker::find_by_id(id).one(&db).await?)
    }

    pub async fn find_by_name(name: &str) -> StorageResult<Option<TrackerModel>> {
        let db = get_db_connection()?;
        Ok(Tracker::find()
            .filter(TrackerColumn::Name.eq(name))
            .one(&db)
            .await?)
    }

    pub async fn find_all() -> StorageResult<Vec<TrackerModel>> {
        let db = get_db_connection()?;
        Ok(Tracker::find().all(&db).await?)
    }

    pub async fn find_by_owner(owner: i32) -> StorageResult<Vec<TrackerModel>> {
        let db = get_db_connection()?;
        Ok(Tracker::find()
            .filter(TrackerColumn::Owner.eq(owner))
            .all(&db)
            .await?)
    }

    pub async fn delete(id: &str) -> StorageResult<bool> {
        let db = get_db_connection()?;
        let res = Tracker::delete_by_id(id).exec(&db).await?;
        Ok(res.rows_affected == 1)
    }

    pub async fn set_enabled(id: &str, enabled: bool) -> StorageResult<()> {
        let db = get_db_connection()?;
        Tracker::update_many()
            .col_expr(TrackerColumn::Enabled, Expr::value(enabled))
            .filter(TrackerColumn::Id.eq(id))
            .exec(&db)
            .await?;
        Ok(())
    }

    pub async fn is_enabled(id: &str) -> StorageResult<bool> {
        Ok(Self::find_by_id(id).await?.is_some_and(|t| t.enabled))
    }

    pub async fn update_last_connected(id: &str, timestamp: i64) -> StorageResult<()> {
        let db = get_db_connection()?;
        Tracker::update_many()
            .col_expr(TrackerColumn::LastConnected, Expr::value(timestamp))
            .filter(TrackerColumn::Id.eq(id))
            .exec(&db)
            .await?;
        Ok(())
    }
}
