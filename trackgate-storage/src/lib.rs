mod migration;
mod sql;

use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use trackgate_error::GateResult;
use trackgate_models::settings::Sqlite;
use tracing::info;

/// Open the SQLite database and bring the schema up to date.
pub async fn init_db(config: &Sqlite) -> GateResult<DatabaseConnection> {
    let db = sql::sqlite::connect(config).await?;
    Migrator::up(&db, None)
        .await
        .map_err(trackgate_error::GateError::from)?;
    info!("database schema is up to date");
    Ok(db)
}

/// Close the connection pool on shutdown.
pub async fn close_db(db: DatabaseConnection) -> GateResult<()> {
    info!("closing database connections");
    db.close().await.map_err(trackgate_error::GateError::from)
}
