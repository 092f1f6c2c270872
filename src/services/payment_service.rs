use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use std::collections::BTreeMap;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::payment::{CheckoutData, CheckoutRequest},
    entity::{
        cart_items::{self, Entity as CartItems},
        carts::{self, Entity as Carts},
        payment_details::ActiveModel as PaymentDetailActive,
        payments::{self, ActiveModel as PaymentActive},
    },
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Convert the user's cart into a payment record.
///
/// The whole sequence runs in one transaction with the cart rows locked
/// FOR UPDATE: fetch items, total them, insert the pending payment header,
/// copy the merged lines into payment_details, delete exactly the fetched items,
/// retire the open cart, then flip the payment to completed. Any failure
/// rolls everything back, so a pending header can never be left behind and
/// two concurrent checkouts cannot charge the same items twice.
pub async fn checkout(
    state: &AppState,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutData>> {
    let txn = state.orm.begin().await?;

    let rows = CartItems::find()
        .join(JoinType::InnerJoin, cart_items::Relation::Carts.def())
        .filter(carts::Column::IdUser.eq(payload.user_id))
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    if rows.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let total = cart_total(&rows);

    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        id_user: Set(payload.user_id),
        total_amount: Set(total),
        payment_method: Set(payload.payment_method.clone()),
        status: Set("pending".into()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    // The same product can sit in more than one of the user's carts (a line
    // added mid-checkout lands in the just-retired cart), so merge lines per
    // product and snapshot price before writing details.
    let mut lines: BTreeMap<(Uuid, Decimal), i32> = BTreeMap::new();
    for row in &rows {
        *lines.entry((row.id_product, row.price)).or_insert(0) += row.quantity;
    }
    for ((id_product, price), quantity) in lines {
        PaymentDetailActive {
            id: Set(Uuid::new_v4()),
            id_payment: Set(payment.id),
            id_product: Set(id_product),
            quantity: Set(quantity),
            price: Set(price),
        }
        .insert(&txn)
        .await?;
    }

    // Delete exactly the rows charged above; an item added after the locked
    // read survives for the next checkout instead of being swept silently.
    let item_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    CartItems::delete_many()
        .filter(cart_items::Column::Id.is_in(item_ids))
        .exec(&txn)
        .await?;

    Carts::update_many()
        .col_expr(carts::Column::Status, Expr::value("checked_out"))
        .filter(
            carts::Column::IdUser
                .eq(payload.user_id)
                .and(carts::Column::Status.eq("open")),
        )
        .exec(&txn)
        .await?;

    let mut active: payments::ActiveModel = payment.into();
    active.status = Set("completed".into());
    let payment = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(payload.user_id),
        "checkout",
        Some("payments"),
        Some(serde_json::json!({
            "payment_id": payment.id,
            "payment_method": payload.payment_method,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Checkout completed",
        CheckoutData {
            payment_id: payment.id,
            total_amount: payment.total_amount,
        },
        Some(Meta::empty()),
    ))
}

/// Exact decimal sum of quantity x snapshot price over the cart lines.
pub fn cart_total(items: &[cart_items::Model]) -> Decimal {
    items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum()
}
