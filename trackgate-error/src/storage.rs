use thiserror::Error;

#[derive(Error, Debug, Default)]
pub enum StorageError {
    #[error("database unavailable")]
    #[default]
    Unavailable,

    #[error("database error: `{0}`")]
    Db(#[from] sea_orm::DbErr),

    #[error("entity not found: {0}")]
    EntityNotFound(String),
}
