use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    response::{ApiResponse, Meta},
    routes::admin::{CreateProductRequest, ProductList, UpdateProductRequest},
};

pub async fn list_products(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;

    let items = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(ApiResponse::success("OK", ProductList { items }, None))
}

pub async fn create_product(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    ensure_category_exists(pool, payload.id_category).await?;
    ensure_brand_exists(pool, payload.id_brand).await?;

    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products
            (id, name, id_brand, id_category, price, discount, stock,
             description, specifications, images)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name)
    .bind(payload.id_brand)
    .bind(payload.id_category)
    .bind(payload.price)
    .bind(payload.discount.unwrap_or_default())
    .bind(payload.stock)
    .bind(payload.description)
    .bind(payload.specifications.unwrap_or_else(|| serde_json::json!({})))
    .bind(payload.images.unwrap_or_else(|| serde_json::json!([])))
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    let existing = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if let Some(category) = payload.id_category {
        ensure_category_exists(pool, category).await?;
    }
    if let Some(brand) = payload.id_brand {
        ensure_brand_exists(pool, brand).await?;
    }

    let name = payload.name.unwrap_or(existing.name);
    let id_brand = payload.id_brand.or(existing.id_brand);
    let id_category = payload.id_category.or(existing.id_category);
    let price = payload.price.unwrap_or(existing.price);
    let discount = payload.discount.unwrap_or(existing.discount);
    let stock = payload.stock.unwrap_or(existing.stock);
    let description = payload.description.or(existing.description);
    let specifications = payload.specifications.unwrap_or(existing.specifications);
    let images = payload.images.unwrap_or(existing.images);

    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET name = $2, id_brand = $3, id_category = $4, price = $5,
            discount = $6, stock = $7, description = $8,
            specifications = $9, images = $10, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(id_brand)
    .bind(id_category)
    .bind(price)
    .bind(discount)
    .bind(stock)
    .bind(description)
    .bind(specifications)
    .bind(images)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product updated",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::ok("Product deleted"))
}

async fn ensure_category_exists(pool: &DbPool, id: Uuid) -> AppResult<()> {
    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::BadRequest("Invalid category ID".into()));
    }
    Ok(())
}

async fn ensure_brand_exists(pool: &DbPool, id: Uuid) -> AppResult<()> {
    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM brands WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::BadRequest("Invalid brand ID".into()));
    }
    Ok(())
}
