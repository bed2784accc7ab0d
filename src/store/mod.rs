//! Product storage backends.
//!
//! Every backend assigns ids and timestamps itself and applies each call
//! atomically; callers hand in values that are already validated.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{NewProduct, Product, ProductChanges},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: NewProduct) -> Result<Product>;

    /// All products, newest first.
    async fn list(&self) -> Result<Vec<Product>>;

    async fn find(&self, id: i64) -> Result<Option<Product>>;

    /// Returns `None` when no product has this id.
    async fn update(&self, id: i64, changes: ProductChanges) -> Result<Option<Product>>;

    /// Returns the removed product, or `None` when no product has this id.
    async fn delete(&self, id: i64) -> Result<Option<Product>>;

    async fn ping(&self) -> Result<()>;

    fn backend(&self) -> &'static str;
}
