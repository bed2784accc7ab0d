use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Multipart, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{AppError, Result},
    models::{CreateProductRequest, ImageUpload},
};

const IMAGE_FIELDS: [&str; 2] = ["image", "file"];

/// `Json` whose rejections become `AppError`s.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Numeric `{id}` path segment.
pub struct ProductId(pub i64);

impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| AppError::ValidationError(format!("Invalid product id: {}", raw)))
    }
}

/// Create payload sent either as JSON or as `multipart/form-data` with an
/// optional image file.
pub struct CreateProductPayload {
    pub request: CreateProductRequest,
    pub image: Option<ImageUpload>,
}

impl<S> FromRequest<S> for CreateProductPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let Json(request) = Json::<CreateProductRequest>::from_request(req, state).await?;
            return Ok(Self {
                request,
                image: None,
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;

        let mut request = CreateProductRequest::default();
        let mut image = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if IMAGE_FIELDS.contains(&name.as_str()) {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;

                // An untouched file input still sends the part, empty.
                if bytes.is_empty() {
                    continue;
                }

                image = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                    file_name,
                });
                continue;
            }

            let text = field.text().await?;
            match name.as_str() {
                "name" => request.name = Some(text),
                "price" => request.price = Some(Value::String(text)),
                "description" => request.description = Some(text),
                "imageUrl" | "ImageUrl" => request.image_url = Some(text),
                other => tracing::debug!("Ignoring multipart field {}", other),
            }
        }

        Ok(Self { request, image })
    }
}
