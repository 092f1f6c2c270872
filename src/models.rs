use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    pub logo: Option<String>,
    pub origin: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub id_brand: Option<Uuid>,
    pub id_category: Option<Uuid>,
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

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MediaAsset {
    pub id: Uuid,
    pub name: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub asset_type: String,
    #[schema(value_type = Vec<String>)]
    pub images: serde_json::Value,
    pub url: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart row. The single `open` cart per user is the active one; checkout
/// flips it to `checked_out`.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cart {
    pub id: Uuid,
    pub id_user: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// `price` is the snapshot taken when the product was first added; it is
/// never resynchronized to the live product price.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub id_cart: Uuid,
    pub id_product: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub id_user: Uuid,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PaymentDetail {
    pub id: Uuid,
    pub id_payment: Uuid,
    pub id_product: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}
