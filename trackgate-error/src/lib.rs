pub mod storage;
pub mod web;

use anyhow::Error as AnyhowError;
use config::ConfigError;
use sea_orm::DbErr;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use storage::StorageError;
use thiserror::Error;
use tokio::task::JoinError;
use web::WebError;

pub type GateResult<T, E = GateError> = Result<T, E>;
pub type WebResult<T, E = WebError> = Result<T, E>;
pub type StorageResult<T, E = StorageError> = Result<T, E>;

/// Top-level error for gateway startup and orchestration paths.
///
/// Hot paths (session handlers, codecs) carry their own narrower error
/// types; everything funnels into `GateError` at the binary boundary.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("{0}")]
    Msg(String),
    #[error("{0}")]
    Io(#[from] IoError),
    #[error("{0}")]
    Join(#[from] JoinError),
    #[error("{0}")]
    Json(#[from] SerdeJsonError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Anyhow(#[from] AnyhowError),
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Web(#[from] WebError),
    #[error("initialization error: {0}")]
    Initialization(String),
    #[error("shutdown error: {0}")]
    Shutdown(String),
}

impl From<String> for GateError {
    #[inline]
    fn from(e: String) -> Self {
        GateError::Msg(e)
    }
}

impl From<&str> for GateError {
    #[inline]
    fn from(e: &str) -> Self {
        GateError::Msg(e.to_string())
    }
}

impl From<DbErr> for GateError {
    #[inline]
    fn from(e: DbErr) -> Self {
        GateError::Storage(StorageError::Db(e))
    }
}
