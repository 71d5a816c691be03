//! Database layer - connection pool, schema and the product store
//!
//! Handlers talk to a [`ProductStore`]; the PostgreSQL implementation wraps
//! [`ProductRepo`] over a sqlx pool, and [`MemoryStore`] backs tests.

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod store;

pub use memory::MemoryStore;
pub use pool::create_pool;
pub use repos::*;
pub use store::{PgProductStore, ProductStore};
