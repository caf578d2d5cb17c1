//! `SeaORM` entity for reported location events
//!
//! Coordinates are stored as the raw fixed-point integers taken from the
//! wire; the scale is protocol-dependent and conversion to degrees is a
//! presentation concern.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "location_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub entry_id: i64,
    pub tracker_id: String,
    /// Epoch seconds at ingestion.
    pub timestamp: i64,
    pub lat: u32,
    pub lon: u32,
    pub speed: u16,
    pub heading: u16,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tracker::Entity",
        from = "Column::TrackerId",
        to = "super::tracker::Column::Id"
    )]
    Tracker,
}

impl Related<super::tracker::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tracker.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
