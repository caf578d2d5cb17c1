use crate::get_db_connection;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, EntityTrait};
use trackgate_error::StorageResult;
use trackgate_models::entities::prelude::{AuthCode, AuthCodeActiveModel, AuthCodeColumn};

pub struct AuthCodeRepository;

impl AuthCodeRepository {
    pub async fn fetch(tracker_id: &str) -> StorageResult<Option<String>> {
        let db = get_db_connection()?;
        Ok(AuthCode::find_by_id(tracker_id)
            .one(&db)
            .await?
            .map(|row| row.code))
    }

    /// Upsert: a re-registering terminal simply gets a fresh code.
    pub async fn save(tracker_id: &str, code_b64: &str) -> StorageResult<()> {
        let db = get_db_connection()?;
        let row = AuthCodeActiveModel {
            tracker_id: Set(tracker_id.to_string()),
            code: Set(code_b64.to_string()),
        };
        AuthCode::insert(row)
            .on_conflict(
                OnConflict::column(AuthCodeColumn::TrackerId)
                    .update_column(AuthCodeColumn::Code)
                    .to_owned(),
            )
            .exec(&db)
            .await?;
        Ok(())
    }

    pub async fn remove(tracker_id: &str) -> StorageResult<()> {
        let db = get_db_connection()?;
        AuthCode::delete_by_id(tracker_id).exec(&db).await?;
        Ok(())
    }
}
