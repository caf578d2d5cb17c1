//! `SeaORM` entity for supported tracker models (SMS provisioning templates)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "device_models")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Semicolon-separated SMS commands sent during provisioning.
    /// May contain `<ip>` / `<port>` placeholders.
    pub init_commands: String,
    /// Keywords expected in the device's SMS replies on success.
    pub success_keywords: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
