use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    models::{
        CreateProductRequest, ImageUpload, NewProduct, Product, ProductChanges,
        UpdateProductRequest, parse_price,
    },
    services::image_service::MediaHost,
    store::ProductStore,
};

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    media: Option<Arc<dyn MediaHost>>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>, media: Option<Arc<dyn MediaHost>>) -> Self {
        Self { store, media }
    }

    pub fn store(&self) -> &dyn ProductStore {
        self.store.as_ref()
    }

    pub async fn create(
        &self,
        req: CreateProductRequest,
        image: Option<ImageUpload>,
    ) -> Result<Product> {
        let mut product = validate_new(req)?;

        let uploaded = match image {
            Some(image) => {
                let url = self.upload(&image).await?;
                product.image_url = Some(url.clone());
                Some(url)
            }
            None => None,
        };

        match self.store.insert(product).await {
            Ok(product) => {
                tracing::info!("Created product {}", product.id);
                Ok(product)
            }
            Err(e) => {
                if let Some(url) = uploaded {
                    self.discard_image(&url).await;
                }
                Err(e)
            }
        }
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        self.store.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Product> {
        self.store.find(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn update(&self, id: i64, req: UpdateProductRequest) -> Result<Product> {
        let changes = validate_changes(req)?;

        self.store
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let product = self.store.delete(id).await?.ok_or_else(|| not_found(id))?;

        if let Some(url) = product.image_url {
            self.discard_image(&url).await;
        }

        tracing::info!("Deleted product {}", id);

        Ok(())
    }

    async fn upload(&self, image: &ImageUpload) -> Result<String> {
        if image.bytes.is_empty() {
            return Err(AppError::ValidationError(
                "uploaded image is empty".to_string(),
            ));
        }

        let media = self.media.as_ref().ok_or_else(|| {
            AppError::UploadError("image uploads are not configured".to_string())
        })?;

        media.upload(image).await
    }

    async fn discard_image(&self, url: &str) {
        let Some(media) = self.media.as_ref() else {
            return;
        };

        match media.delete(url).await {
            Ok(true) => tracing::info!("Removed image {}", url),
            Ok(false) => {}
            Err(e) => tracing::warn!("Failed to remove image {}: {}", url, e),
        }
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Product with id {} not found", id))
}

fn validate_name(name: String) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError(
            "name cannot be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn validate_new(req: CreateProductRequest) -> Result<NewProduct> {
    let name = req
        .name
        .ok_or_else(|| AppError::ValidationError("name is required".to_string()))
        .and_then(validate_name)?;

    let price = req
        .price
        .ok_or_else(|| AppError::ValidationError("price is required".to_string()))
        .and_then(|price| parse_price(&price))?;

    Ok(NewProduct {
        name,
        price,
        description: req.description,
        image_url: req.image_url,
    })
}

fn validate_changes(req: UpdateProductRequest) -> Result<ProductChanges> {
    let name = match req.name {
        Some(Some(name)) => Some(validate_name(name)?),
        Some(None) => {
            return Err(AppError::ValidationError(
                "name cannot be empty".to_string(),
            ));
        }
        None => None,
    };

    let price = req.price.as_ref().map(parse_price).transpose()?;

    Ok(ProductChanges {
        name,
        price,
        description: req.description,
        image_url: req.image_url,
    })
}
