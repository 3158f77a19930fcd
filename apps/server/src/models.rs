//! Domain records for the benchmark tables.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::db::executor::Row;
use crate::error::AppError;

/// Immutable snapshot of a `world` / `cachedworld` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub id: i32,
    #[serde(rename = "randomNumber")]
    pub random_number: i32,
}

impl World {
    pub fn from_row(row: &Row) -> Result<Self, AppError> {
        Ok(Self {
            id: row.get_i32("id")?,
            random_number: row.get_i32("randomnumber")?,
        })
    }
}

/// One `fortune` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fortune {
    pub id: i32,
    pub message: String,
}

impl Fortune {
    pub fn from_row(row: &Row) -> Result<Self, AppError> {
        Ok(Self {
            id: row.get_i32("id")?,
            message: row.get_text("message")?.to_string(),
        })
    }
}

/// Uniform draw over the conventional id range of the benchmark tables.
pub fn random_id() -> i32 {
    rand::rng().random_range(1..=10_000)
}
