use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use tlshop_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::cart::{AddItemRequest, QuantityUpdate, RemoveItemRequest, UpdateCartRequest},
    dto::payment::CheckoutRequest,
    entity::{
        cart_items::{self, ActiveModel as CartItemActive},
        carts::ActiveModel as CartActive,
        products::ActiveModel as ProductActive,
    },
    error::AppError,
    services::{cart_service, payment_service},
    state::AppState,
};
use uuid::Uuid;

// Pure decimal arithmetic, no database required: 2 x 10.00 + 1 x 5.50 = 25.50.
#[test]
fn cart_total_is_exact_decimal() {
    let line = |quantity: i32, price: Decimal| cart_items::Model {
        id: Uuid::new_v4(),
        id_cart: Uuid::new_v4(),
        id_product: Uuid::new_v4(),
        quantity,
        price,
        created_at: chrono::Utc::now().into(),
    };

    let items = vec![
        line(2, Decimal::new(1000, 2)),
        line(1, Decimal::new(550, 2)),
    ];

    assert_eq!(payment_service::cart_total(&items), Decimal::new(2550, 2));
}

// Integration flow: lazy cart creation, quantity accumulation, snapshot
// pricing, idempotent removal, and the transactional checkout.
#[tokio::test]
async fn cart_and_checkout_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let user_id = create_user(&state, "shopper@example.com").await?;

    // A user with no carts gets an empty list, not an error.
    let empty = cart_service::list_cart(&state.pool, user_id).await?;
    assert!(empty.data.unwrap().cart_items.is_empty());

    // Checkout with nothing in the cart fails up front and writes nothing.
    let err = payment_service::checkout(
        &state,
        CheckoutRequest {
            user_id,
            payment_method: "card".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::EmptyCart));
    let (payments,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM payments")
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(payments, 0);

    // Adding a product that does not exist is a 404 and must not create a cart.
    let err = cart_service::add_item(
        &state.pool,
        AddItemRequest {
            user_id,
            product_id: Uuid::new_v4(),
            quantity: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    let (carts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM carts WHERE id_user = $1")
        .bind(user_id)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(carts, 0);

    // Seed a 9.99 product and add it twice: one line, quantity accumulates.
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set("Test Widget".into()),
        id_brand: Set(None),
        id_category: Set(None),
        price: Set(Decimal::new(999, 2)),
        discount: Set(Decimal::ZERO),
        stock: Set(10),
        description: Set(Some("A product for testing".into())),
        specifications: Set(serde_json::json!({})),
        images: Set(serde_json::json!([])),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    cart_service::add_item(
        &state.pool,
        AddItemRequest {
            user_id,
            product_id: product.id,
            quantity: 2,
        },
    )
    .await?;

    // Reprice the live product between adds; the snapshot must not move.
    sqlx::query("UPDATE products SET price = $2 WHERE id = $1")
        .bind(product.id)
        .bind(Decimal::new(1999, 2))
        .execute(&state.pool)
        .await?;

    cart_service::add_item(
        &state.pool,
        AddItemRequest {
            user_id,
            product_id: product.id,
            quantity: 3,
        },
    )
    .await?;

    let contents = cart_service::list_cart(&state.pool, user_id).await?;
    let items = contents.data.unwrap().cart_items;
    assert_eq!(items.len(), 1, "repeat add must not create a second line");
    assert_eq!(items[0].quantity, 5);
    assert_eq!(items[0].price, Decimal::new(999, 2));
    let item_id = items[0].id;

    // Quantity overwrite via the bulk update endpoint.
    cart_service::update_quantities(
        &state.pool,
        UpdateCartRequest {
            cart_items: vec![QuantityUpdate {
                id: item_id,
                quantity: 7,
            }],
        },
    )
    .await?;
    let contents = cart_service::list_cart(&state.pool, user_id).await?;
    let items = contents.data.unwrap().cart_items;
    assert_eq!(items[0].quantity, 7);
    assert_eq!(items[0].price, Decimal::new(999, 2));

    // Back to 5 for the checkout scenario.
    cart_service::update_quantities(
        &state.pool,
        UpdateCartRequest {
            cart_items: vec![QuantityUpdate {
                id: item_id,
                quantity: 5,
            }],
        },
    )
    .await?;

    // Removing an id that does not exist still reports success.
    cart_service::remove_item(
        &state.pool,
        RemoveItemRequest {
            cart_item_id: Uuid::new_v4(),
        },
    )
    .await?;
    let contents = cart_service::list_cart(&state.pool, user_id).await?;
    assert_eq!(contents.data.unwrap().cart_items.len(), 1);

    // Checkout: 5 x 9.99 = 49.95, one detail row, cart emptied, completed.
    let resp = payment_service::checkout(
        &state,
        CheckoutRequest {
            user_id,
            payment_method: "card".into(),
        },
    )
    .await?;
    let data = resp.data.unwrap();
    assert_eq!(data.total_amount, Decimal::new(4995, 2));

    let (status, total_amount): (String, Decimal) =
        sqlx::query_as("SELECT status, total_amount FROM payments WHERE id = $1")
            .bind(data.payment_id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(status, "completed");
    assert_eq!(total_amount, Decimal::new(4995, 2));

    let details: Vec<(Uuid, i32, Decimal)> = sqlx::query_as(
        "SELECT id_product, quantity, price FROM payment_details WHERE id_payment = $1",
    )
    .bind(data.payment_id)
    .fetch_all(&state.pool)
    .await?;
    assert_eq!(details, vec![(product.id, 5, Decimal::new(999, 2))]);

    let contents = cart_service::list_cart(&state.pool, user_id).await?;
    assert!(contents.data.unwrap().cart_items.is_empty());

    let (open_carts,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM carts WHERE id_user = $1 AND status = 'open'")
            .bind(user_id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(open_carts, 0, "checkout must retire the open cart");

    // The next add starts a fresh open cart.
    cart_service::add_item(
        &state.pool,
        AddItemRequest {
            user_id,
            product_id: product.id,
            quantity: 1,
        },
    )
    .await?;
    let contents = cart_service::list_cart(&state.pool, user_id).await?;
    let items = contents.data.unwrap().cart_items;
    assert_eq!(items.len(), 1);
    // Snapshot taken at this add sees the repriced product.
    assert_eq!(items[0].price, Decimal::new(1999, 2));

    // Lines left behind in already-retired carts (an add that raced a
    // checkout) still belong to the user. The next checkout must charge
    // them too, merging same-priced lines per product and keeping lines
    // with a different snapshot price separate.
    for (quantity, price) in [(2, Decimal::new(1999, 2)), (3, Decimal::new(999, 2))] {
        let stale_cart = CartActive {
            id: Set(Uuid::new_v4()),
            id_user: Set(user_id),
            status: Set("checked_out".into()),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?;
        CartItemActive {
            id: Set(Uuid::new_v4()),
            id_cart: Set(stale_cart.id),
            id_product: Set(product.id),
            quantity: Set(quantity),
            price: Set(price),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?;
    }

    // 1 x 19.99 (open cart) + 2 x 19.99 + 3 x 9.99 = 89.94.
    let resp = payment_service::checkout(
        &state,
        CheckoutRequest {
            user_id,
            payment_method: "card".into(),
        },
    )
    .await?;
    let data = resp.data.unwrap();
    assert_eq!(data.total_amount, Decimal::new(8994, 2));

    let details: Vec<(Uuid, i32, Decimal)> = sqlx::query_as(
        "SELECT id_product, quantity, price FROM payment_details WHERE id_payment = $1 ORDER BY price",
    )
    .bind(data.payment_id)
    .fetch_all(&state.pool)
    .await?;
    assert_eq!(
        details,
        vec![
            (product.id, 3, Decimal::new(999, 2)),
            (product.id, 3, Decimal::new(1999, 2)),
        ]
    );

    let contents = cart_service::list_cart(&state.pool, user_id).await?;
    assert!(contents.data.unwrap().cart_items.is_empty());

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;
    let pool = create_pool(database_url).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE payment_details, payments, cart_items, carts, audit_logs, products, media_assets, categories, brands, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

async fn create_user(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(email)
        .bind("dummy")
        .execute(&state.pool)
        .await?;
    Ok(id)
}
