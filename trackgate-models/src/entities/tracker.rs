//! `SeaORM` entity for registered trackers

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "trackers")]
pub struct Model {
    /// Device identifier as reported on the wire (IMEI for GT06,
    /// BCD terminal id for JT808), hex digits.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub owner: i32,
    pub phone_number: String,
    pub model: String,
    pub enabled: bool,
    /// Epoch seconds of the last successful session attach.
    pub last_connected: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Owner",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::location_data::Entity")]
    LocationData,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::location_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocationData.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
