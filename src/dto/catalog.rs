use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Brand, Category, MediaAsset};

/// Category columns folded into a product row; all optional because the
/// joins are LEFT.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryRef {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BrandRef {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub logo: Option<String>,
    pub origin: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub id: Uuid,
    pub name: String,
    pub category: CategoryRef,
    pub brand: BrandRef,
    pub price: Decimal,
    pub discount: Decimal,
    pub stock: i32,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub specifications: serde_json::Value,
    #[schema(value_type = Vec<String>)]
    pub images: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storefront catalog payload: products plus the full category and brand
/// lists for the navigation tree.
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogData {
    pub products: Vec<ProductDetail>,
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MediaData {
    pub slideshow: Vec<MediaAsset>,
    pub intro: Vec<MediaAsset>,
}
