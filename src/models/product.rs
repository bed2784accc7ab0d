use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: Option<String>,
    #[serde(rename = "ImageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /products`. Fields stay loose here; `ProductService`
/// decides what is valid.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<Value>,
    pub description: Option<String>,
    #[serde(alias = "ImageUrl")]
    pub image_url: Option<String>,
}

/// Body of `PUT /products/{id}`.
///
/// The outer `Option` records whether a field was sent at all, so
/// `"description": null` clears the description while omitting it keeps
/// the stored value. An `id` in the body is never read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", alias = "ImageUrl")]
    pub image_url: Option<Option<String>>,
}

/// Image bytes received with a multipart create.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
}

/// A validated product ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// A validated partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
}

impl ProductChanges {
    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = image_url;
        }
        product.updated_at = now;
    }
}

// Wraps whatever was sent, including `null`, in `Some`; paired with
// `#[serde(default)]` a missing field stays `None`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub fn parse_price(value: &Value) -> Result<Decimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        Value::Null => return Err(AppError::ValidationError("price is required".to_string())),
        _ => {
            return Err(AppError::ValidationError(
                "price must be a number".to_string(),
            ));
        }
    };

    // `f64` parsing decides what counts as numeric text; it refuses digit
    // separators such as "1_000" that `Decimal` would otherwise accept.
    let is_finite_number = text.parse::<f64>().is_ok_and(f64::is_finite);
    if !is_finite_number {
        return Err(AppError::ValidationError(format!(
            "price must be a number, got '{}'",
            text
        )));
    }

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| {
            AppError::ValidationError(format!(
                "price '{}' is out of range (at most {} with up to 28 decimal places)",
                text,
                Decimal::MAX
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;
    use serde_json::json;

    #[test]
    fn parses_numbers_and_numeric_strings() {
        assert_eq!(parse_price(&json!(25.5)).unwrap(), Decimal::from_f64(25.5).unwrap());
        assert_eq!(parse_price(&json!(10)).unwrap(), Decimal::from(10));
        assert_eq!(
            parse_price(&json!(" 99.99 ")).unwrap(),
            Decimal::from_str("99.99").unwrap()
        );
        assert_eq!(parse_price(&json!("1e2")).unwrap(), Decimal::from(100));
    }

    #[test]
    fn rejects_non_numeric_prices() {
        for value in [json!("abc"), json!(""), json!("NaN"), json!(true), json!([1]), json!(null)] {
            assert!(
                matches!(parse_price(&value), Err(AppError::ValidationError(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn digit_separators_are_not_numeric() {
        let err = parse_price(&json!("1_000")).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref msg) if msg.contains("must be a number")));
    }

    #[test]
    fn prices_beyond_decimal_range_report_out_of_range() {
        for value in [json!(1e30), json!("1e30"), json!("-1e30")] {
            let err = parse_price(&value).unwrap_err();
            assert!(
                matches!(err, AppError::ValidationError(ref msg) if msg.contains("out of range")),
                "{value} gave {err}"
            );
        }

        assert_eq!(parse_price(&json!("1e28")).unwrap(), Decimal::from_scientific("1e28").unwrap());
    }

    #[test]
    fn update_request_tells_null_from_missing() {
        let req: UpdateProductRequest =
            serde_json::from_str(r#"{"description": null, "price": 5}"#).unwrap();
        assert_eq!(req.description, Some(None));
        assert_eq!(req.image_url, None);
        assert_eq!(req.name, None);
        assert_eq!(req.price, Some(json!(5)));

        let req: UpdateProductRequest = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert_eq!(req.price, Some(Value::Null));
    }

    #[test]
    fn update_request_ignores_id_and_accepts_both_image_url_spellings() {
        let req: UpdateProductRequest =
            serde_json::from_str(r#"{"id": 7, "ImageUrl": "https://cdn/x.png"}"#).unwrap();
        assert_eq!(req.image_url, Some(Some("https://cdn/x.png".to_string())));

        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name": "a", "price": "1", "imageUrl": "u"}"#).unwrap();
        assert_eq!(req.image_url.as_deref(), Some("u"));
    }

    #[test]
    fn serializes_the_public_shape() {
        let now = Utc::now();
        let product = Product {
            id: 1,
            name: "Test Widget".to_string(),
            price: Decimal::from_str("25.50").unwrap(),
            description: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], json!(25.5));
        assert_eq!(value["ImageUrl"], Value::Null);
        assert_eq!(value["description"], Value::Null);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }

    #[test]
    fn changes_only_touch_supplied_fields() {
        let created = Utc::now();
        let mut product = Product {
            id: 3,
            name: "Lamp".to_string(),
            price: Decimal::from(12),
            description: Some("desk lamp".to_string()),
            image_url: Some("https://cdn/lamp.png".to_string()),
            created_at: created,
            updated_at: created,
        };

        let later = created + chrono::Duration::seconds(5);
        ProductChanges {
            price: Some(Decimal::from(15)),
            image_url: Some(None),
            ..Default::default()
        }
        .apply(&mut product, later);

        assert_eq!(product.name, "Lamp");
        assert_eq!(product.price, Decimal::from(15));
        assert_eq!(product.description.as_deref(), Some("desk lamp"));
        assert_eq!(product.image_url, None);
        assert_eq!(product.updated_at, later);
        assert_eq!(product.created_at, created);
    }
}
