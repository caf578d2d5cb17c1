use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use trackgate_error::GateResult;
use trackgate_models::settings::Sqlite;
use tracing::{info, log::LevelFilter};

/// Connect to SQLite with the configured pool bounds. `mode=rwc` in the
/// URL creates the database file on first start.
pub async fn connect(config: &Sqlite) -> GateResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.to_url());
    opts.connect_timeout(Duration::from_millis(config.timeout))
        .max_connections(config.max_connections)
        .min_connections(config.min_connections);

    #[cfg(debug_assertions)]
    {
        opts.sqlx_logging(true).sqlx_logging_level(LevelFilter::Info);
    }
    #[cfg(not(debug_assertions))]
    {
        opts.sqlx_logging(false).sqlx_logging_level(LevelFilter::Off);
    }

    info!("connecting to SQLite database at {}", config.path);
    let db = Database::connect(opts)
        .await
        .map_err(trackgate_error::GateError::from)?;

    // WAL keeps concurrent session writes from starving the REST readers.
    {
        use sea_orm::{ConnectionTrait, DbBackend, Statement};
        let _ = db
            .execute(Statement::from_string(
                DbBackend::Sqlite,
                "PRAGMA journal_mode=WAL;".to_string(),
            ))
            .await;
        let _ = db
            .execute(Statement::from_string(
                DbBackend::Sqlite,
                "PRAGMA busy_timeout=5000;".to_string(),
            ))
            .await;
        let _ = db
            .execute(Statement::from_string(
                DbBackend::Sqlite,
                "PRAGMA foreign_keys=ON;".to_string(),
            ))
            .await;
    }

    Ok(db)
}
