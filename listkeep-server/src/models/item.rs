//! Item record
//!
//! Declared by the `create_items` migration. No route reads or writes items;
//! the type exists for the schema tests that query the table.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Item record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
