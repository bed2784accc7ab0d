use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::ProductStore;
use crate::{
    error::Result,
    models::{NewProduct, Product, ProductChanges},
};

#[derive(Debug)]
pub struct MemoryStore {
    products: RwLock<HashMap<i64, Product>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let now = Utc::now();
        let product = Product {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: product.name,
            price: product.price,
            description: product.description,
            image_url: product.image_url,
            created_at: now,
            updated_at: now,
        };

        self.products
            .write()
            .await
            .insert(product.id, product.clone());

        Ok(product)
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self.products.read().await.values().cloned().collect();
        products.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(products)
    }

    async fn find(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn update(&self, id: i64, changes: ProductChanges) -> Result<Option<Product>> {
        let mut products = self.products.write().await;

        let Some(product) = products.get_mut(&id) else {
            return Ok(None);
        };

        changes.apply(product, Utc::now());

        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.products.write().await.remove(&id))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
