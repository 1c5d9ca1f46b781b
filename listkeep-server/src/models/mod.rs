//! Domain models with validation at construction
//!
//! User input is validated before it reaches the database.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod list;
pub mod item;

pub use validation::ValidationError;
pub use list::{List, ListName, ListParams};
pub use item::Item;
