//! Repository implementations for database access
//!
//! Queries are parameterized; absent rows surface as `DbError::NotFound`
//! rather than as a driver error.

pub mod products;

pub use products::{DbError, ProductRepo, ProductRow};
