use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{AppConfig, CorsConfig, load_s3_client},
    database,
    error::{AppError, Result},
    routes,
    services::{MediaHost, ProductService, S3MediaHost},
    store::{MemoryStore, PgStore, ProductStore},
};

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
}

impl AppState {
    pub fn new(products: ProductService) -> Self {
        Self { products }
    }

    pub fn in_memory() -> Self {
        Self::new(ProductService::new(Arc::new(MemoryStore::new()), None))
    }
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let store = open_store(config).await?;
    let media = open_media_host(config).await;
    let state = AppState::new(ProductService::new(store, media));

    let app = router(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors_layer(&config.cors)?);

    Ok(app)
}

pub fn router(state: AppState) -> Router {
    routes::create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn ProductStore>> {
    match &config.database {
        Some(database) => {
            let pool = database::create_pool(database).await?;
            tracing::info!("Using PostgreSQL product store");
            Ok(Arc::new(PgStore::new(pool)))
        }
        None => {
            tracing::info!("DB_URL not set, using in-memory product store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn open_media_host(config: &AppConfig) -> Option<Arc<dyn MediaHost>> {
    let Some(s3) = &config.s3 else {
        tracing::info!("S3_BUCKET not set, image uploads disabled");
        return None;
    };

    let client = load_s3_client(s3).await;

    Some(Arc::new(S3MediaHost::new(client, s3, config.environment)))
}

fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let allow_origin = if config.allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|_| {
                    AppError::ConfigError(format!("Invalid CORS origin: {}", origin))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(allow_origin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_cors_origins() {
        let config = CorsConfig {
            allowed_origins: vec!["https://shop.example.com".to_string(), "bad\norigin".to_string()],
        };

        assert!(matches!(cors_layer(&config), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn empty_origin_list_allows_any() {
        let config = CorsConfig {
            allowed_origins: Vec::new(),
        };

        assert!(cors_layer(&config).is_ok());
    }
}
