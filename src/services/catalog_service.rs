use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::catalog::{BrandRef, CatalogData, CategoryRef, MediaData, ProductDetail},
    error::{AppError, AppResult},
    models::{Brand, Category, MediaAsset},
    response::ApiResponse,
};

#[derive(FromRow)]
struct ProductJoinRow {
    id: Uuid,
    name: String,
    id_brand: Option<Uuid>,
    id_category: Option<Uuid>,
    price: Decimal,
    discount: Decimal,
    stock: i32,
    description: Option<String>,
    specifications: serde_json::Value,
    images: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    brand_name: Option<String>,
    brand_logo: Option<String>,
    brand_origin: Option<String>,
    category_name: Option<String>,
    category_slug: Option<String>,
    category_description: Option<String>,
    category_parent_id: Option<Uuid>,
}

const PRODUCT_JOIN_SQL: &str = r#"
    SELECT p.id, p.name, p.id_brand, p.id_category, p.price, p.discount,
           p.stock, p.description, p.specifications, p.images,
           p.created_at, p.updated_at,
           b.name AS brand_name, b.logo AS brand_logo, b.origin AS brand_origin,
           c.name AS category_name, c.slug AS category_slug,
           c.description AS category_description, c.parent_id AS category_parent_id
    FROM products p
    LEFT JOIN brands b ON p.id_brand = b.id
    LEFT JOIN categories c ON p.id_category = c.id
"#;

fn product_from_row(row: ProductJoinRow) -> ProductDetail {
    ProductDetail {
        id: row.id,
        name: row.name,
        category: CategoryRef {
            id: row.id_category,
            name: row.category_name,
            slug: row.category_slug,
            description: row.category_description,
            parent_id: row.category_parent_id,
        },
        brand: BrandRef {
            id: row.id_brand,
            name: row.brand_name,
            logo: row.brand_logo,
            origin: row.brand_origin,
        },
        price: row.price,
        discount: row.discount,
        stock: row.stock,
        description: row.description,
        specifications: row.specifications,
        images: row.images,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Storefront catalog: products with their brand/category folded in, plus
/// the full category and brand lists, optionally filtered to one category
/// parent.
pub async fn list_catalog(
    pool: &DbPool,
    parent_id: Option<Uuid>,
) -> AppResult<ApiResponse<CatalogData>> {
    let rows = if let Some(parent) = parent_id {
        sqlx::query_as::<_, ProductJoinRow>(&format!(
            "{PRODUCT_JOIN_SQL} WHERE c.parent_id = $1"
        ))
        .bind(parent)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, ProductJoinRow>(PRODUCT_JOIN_SQL)
            .fetch_all(pool)
            .await?
    };

    let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await?;
    let brands = sqlx::query_as::<_, Brand>("SELECT * FROM brands ORDER BY name")
        .fetch_all(pool)
        .await?;

    let data = CatalogData {
        products: rows.into_iter().map(product_from_row).collect(),
        categories,
        brands,
    };

    Ok(ApiResponse::success("OK", data, None))
}

pub async fn get_product(pool: &DbPool, id: Uuid) -> AppResult<ApiResponse<ProductDetail>> {
    let row = sqlx::query_as::<_, ProductJoinRow>(&format!("{PRODUCT_JOIN_SQL} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(ApiResponse::success("OK", product_from_row(row), None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn list_categories(pool: &DbPool) -> AppResult<ApiResponse<Vec<Category>>> {
    let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(ApiResponse::success("OK", categories, None))
}

pub async fn list_brands(pool: &DbPool) -> AppResult<ApiResponse<Vec<Brand>>> {
    let brands = sqlx::query_as::<_, Brand>("SELECT * FROM brands ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(ApiResponse::success("OK", brands, None))
}

/// Home-page media split into the slideshow strip and intro blocks.
pub async fn list_media(pool: &DbPool) -> AppResult<ApiResponse<MediaData>> {
    let slideshow =
        sqlx::query_as::<_, MediaAsset>("SELECT * FROM media_assets WHERE type = 'slideshow'")
            .fetch_all(pool)
            .await?;
    let intro = sqlx::query_as::<_, MediaAsset>("SELECT * FROM media_assets WHERE type = 'intro'")
        .fetch_all(pool)
        .await?;

    Ok(ApiResponse::success(
        "OK",
        MediaData { slideshow, intro },
        None,
    ))
}
