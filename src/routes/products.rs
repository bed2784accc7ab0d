use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::Result,
    models::{Product, UpdateProductRequest},
    utils::extractors::{CreateProductPayload, JsonBody, ProductId},
};

pub async fn create_product(
    State(state): State<AppState>,
    payload: CreateProductPayload,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state
        .products
        .create(payload.request, payload.image)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.products.list().await?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<Json<Product>> {
    let product = state.products.get(id).await?;

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    JsonBody(payload): JsonBody<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let product = state.products.update(id, payload).await?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<StatusCode> {
    state.products.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
