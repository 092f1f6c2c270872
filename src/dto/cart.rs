use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

/// One line of the flattened cart listing: the snapshot price joined with
/// the live product name and images.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartEntry {
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
    #[schema(value_type = Vec<String>)]
    pub images: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartContents {
    pub cart_items: Vec<CartEntry>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuantityUpdate {
    pub id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub cart_items: Vec<QuantityUpdate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveItemRequest {
    pub cart_item_id: Uuid,
}
