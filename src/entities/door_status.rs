//! Door status entity - one row per accepted Post Status call.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Door status log row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "door_statuses")]
pub struct Model {
    /// Monotonic insertion sequence
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Normalized state, `"LOCKED"` or `"UNLOCKED"`
    pub state: String,
    /// Device-local timestamp, if the device sent one
    pub ts_ms: Option<i64>,
    /// Insertion time, assigned by the database clock
    #[sea_orm(default_expr = "sea_orm::sea_query::Expr::current_timestamp()")]
    pub created_at: DateTimeUtc,
}

/// Statuses are not related to any other table
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
