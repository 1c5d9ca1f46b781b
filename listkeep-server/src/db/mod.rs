//! Database layer - connection pool, migrations, and repositories
//!
//! - Repositories borrow the pool; no Arc<Mutex<Connection>>
//! - Validation happens in the repository, before any write
//! - Migrations run in a single transaction

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_in_memory_pool, create_pool};
pub use repos::*;
