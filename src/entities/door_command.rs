//! Door command entity - one row per accepted Set Command call.
//!
//! The current command is the row with the greatest `created_at`, with `id`
//! breaking ties between rows stamped in the same instant. `created_at` is
//! left to the column default so every relay instance shares one clock.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Door command log row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "door_commands")]
pub struct Model {
    /// Monotonic insertion sequence
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Normalized command, `"OPEN"` or `"CLOSE"`
    pub command: String,
    /// Insertion time, assigned by the database clock
    #[sea_orm(default_expr = "sea_orm::sea_query::Expr::current_timestamp()")]
    pub created_at: DateTimeUtc,
}

/// Commands are not related to any other table
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
