use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::cart::{
        AddItemRequest, CartContents, CartEntry, RemoveItemRequest, UpdateCartRequest,
    },
    error::{AppError, AppResult},
    response::ApiResponse,
};

#[derive(FromRow)]
struct CartEntryRow {
    id: Uuid,
    name: String,
    quantity: i32,
    price: Decimal,
    images: serde_json::Value,
}

/// Add a product to the user's open cart, creating the cart lazily.
/// A repeat add of the same product increments the existing line instead of
/// inserting a second one; the line keeps the price snapshotted on first add.
pub async fn add_item(
    pool: &DbPool,
    payload: AddItemRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let product: Option<(Uuid, Decimal)> =
        sqlx::query_as("SELECT id, price FROM products WHERE id = $1")
            .bind(payload.product_id)
            .fetch_optional(pool)
            .await?;
    let (product_id, price) = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let cart_id = resolve_open_cart(pool, payload.user_id).await?;

    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM cart_items WHERE id_cart = $1 AND id_product = $2")
            .bind(cart_id)
            .bind(product_id)
            .fetch_optional(pool)
            .await?;

    if let Some((item_id,)) = existing {
        sqlx::query("UPDATE cart_items SET quantity = quantity + $2 WHERE id = $1")
            .bind(item_id)
            .bind(payload.quantity)
            .execute(pool)
            .await?;
    } else {
        sqlx::query(
            r#"
            INSERT INTO cart_items (id, id_cart, id_product, quantity, price)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(cart_id)
        .bind(product_id)
        .bind(payload.quantity)
        .bind(price)
        .execute(pool)
        .await?;
    }

    if let Err(err) = log_audit(
        pool,
        Some(payload.user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": product_id, "quantity": payload.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::ok("Added to cart"))
}

/// Find the user's open cart or create one. The partial unique index on
/// (id_user) WHERE status = 'open' makes concurrent first-adds converge on a
/// single cart row instead of racing into duplicates.
async fn resolve_open_cart(pool: &DbPool, user_id: Uuid) -> AppResult<Uuid> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM carts WHERE id_user = $1 AND status = 'open'")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    sqlx::query(
        r#"
        INSERT INTO carts (id, id_user, status)
        VALUES ($1, $2, 'open')
        ON CONFLICT (id_user) WHERE status = 'open' DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .execute(pool)
    .await?;

    // A concurrent add may have won the insert; re-read either way.
    let (id,): (Uuid,) =
        sqlx::query_as("SELECT id FROM carts WHERE id_user = $1 AND status = 'open'")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(id)
}

/// Flattened item list across every cart joined to the user. Unknown users
/// simply get an empty list.
pub async fn list_cart(pool: &DbPool, user_id: Uuid) -> AppResult<ApiResponse<CartContents>> {
    let rows = sqlx::query_as::<_, CartEntryRow>(
        r#"
        SELECT ci.id, p.name, ci.quantity, ci.price, p.images
        FROM cart_items ci
        JOIN carts c ON ci.id_cart = c.id
        JOIN products p ON ci.id_product = p.id
        WHERE c.id_user = $1
        ORDER BY ci.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let cart_items = rows
        .into_iter()
        .map(|row| CartEntry {
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            price: row.price,
            images: row.images,
        })
        .collect();

    Ok(ApiResponse::success(
        "OK",
        CartContents { cart_items },
        None,
    ))
}

/// Overwrite quantities by item id, one statement per entry. Deliberately
/// not transactional: the first failure aborts the loop and earlier updates
/// stay applied.
pub async fn update_quantities(
    pool: &DbPool,
    payload: UpdateCartRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let count = payload.cart_items.len();
    for item in payload.cart_items {
        sqlx::query("UPDATE cart_items SET quantity = $2 WHERE id = $1")
            .bind(item.id)
            .bind(item.quantity)
            .execute(pool)
            .await?;
    }

    if let Err(err) = log_audit(
        pool,
        None,
        "cart_update",
        Some("cart_items"),
        Some(serde_json::json!({ "items": count })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::ok("Cart updated"))
}

/// Delete a cart item by id. Idempotent: removing an id that does not exist
/// still reports success.
pub async fn remove_item(
    pool: &DbPool,
    payload: RemoveItemRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    sqlx::query("DELETE FROM cart_items WHERE id = $1")
        .bind(payload.cart_item_id)
        .execute(pool)
        .await?;

    if let Err(err) = log_audit(
        pool,
        None,
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "cart_item_id": payload.cart_item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::ok("Removed from cart"))
}
