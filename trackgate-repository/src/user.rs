use crate::get_db_connection;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use trackgate_error::StorageResult;
use trackgate_models::entities::prelude::{User, UserColumn, UserModel};

pub struct UserRepository;

impl UserRepository {
    /// Resolve an API key to its user. Disabled users resolve to `None`;
    /// the caller cannot tell a revoked key from an unknown one.
    pub async fn find_enabled_by_api_key(api_key: &str) -> StorageResult<Option<UserModel>> {
        let db = get_db_connection()?;
        Ok(User::find()
            .filter(UserColumn::ApiKey.eq(api_key))
            .filter(UserColumn::Enabled.eq(true))
            .one(&db)
            .await?)
    }

    pub async fn find_by_id(id: i32) -> StorageResult<Option<UserModel>> {
        let db = get_db_connection()?;
        Ok(User::find_by_id(id).one(&db).await?)
    }
}
