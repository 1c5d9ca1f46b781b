//! Repository implementations for database access

pub mod lists;

pub use lists::{DbError, ListRepo};
