use async_trait::async_trait;
use sqlx::PgPool;

use super::ProductStore;
use crate::{
    database,
    error::Result,
    models::{NewProduct, Product, ProductChanges},
    queries::product_queries,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        product_queries::create_product(&self.pool, &product).await
    }

    async fn list(&self) -> Result<Vec<Product>> {
        product_queries::find_all(&self.pool).await
    }

    async fn find(&self, id: i64) -> Result<Option<Product>> {
        product_queries::find_by_id(&self.pool, id).await
    }

    async fn update(&self, id: i64, changes: ProductChanges) -> Result<Option<Product>> {
        product_queries::update_product(&self.pool, id, &changes).await
    }

    async fn delete(&self, id: i64) -> Result<Option<Product>> {
        product_queries::delete_product(&self.pool, id).await
    }

    async fn ping(&self) -> Result<()> {
        database::check_health(&self.pool).await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
