use sqlx::PgPool;

use crate::{
    error::Result,
    models::{NewProduct, Product, ProductChanges},
};

pub async fn create_product(pool: &PgPool, product: &NewProduct) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, price, description, image_url)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&product.name)
    .bind(product.price)
    .bind(&product.description)
    .bind(&product.image_url)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

// Nullable columns carry a "was it sent" flag so an explicit null clears
// them while an omitted field keeps the stored value.
pub async fn update_product(
    pool: &PgPool,
    id: i64,
    changes: &ProductChanges,
) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET
            name = COALESCE($1, name),
            price = COALESCE($2, price),
            description = CASE WHEN $3 THEN $4 ELSE description END,
            image_url = CASE WHEN $5 THEN $6 ELSE image_url END,
            updated_at = NOW()
        WHERE id = $7
        RETURNING *
        "#,
    )
    .bind(&changes.name)
    .bind(changes.price)
    .bind(changes.description.is_some())
    .bind(changes.description.clone().flatten())
    .bind(changes.image_url.is_some())
    .bind(changes.image_url.clone().flatten())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn delete_product(pool: &PgPool, id: i64) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("DELETE FROM products WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}
