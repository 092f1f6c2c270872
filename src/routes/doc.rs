use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddItemRequest, CartContents, CartEntry, QuantityUpdate, RemoveItemRequest, UpdateCartRequest},
        catalog::{BrandRef, CatalogData, CategoryRef, MediaData, ProductDetail},
        payment::{CheckoutData, CheckoutRequest},
    },
    models::{Brand, Cart, CartItem, Category, MediaAsset, Payment, PaymentDetail, Product, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, catalog, health, payment},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::profile,
        cart::add_item,
        cart::get_cart,
        cart::update_cart,
        cart::remove_item,
        payment::checkout,
        catalog::list_products,
        catalog::get_product,
        catalog::list_categories,
        catalog::list_brands,
        catalog::list_media,
        admin::list_products,
        admin::create_product,
        admin::update_product,
        admin::delete_product
    ),
    components(
        schemas(
            User,
            Brand,
            Category,
            Product,
            MediaAsset,
            Cart,
            CartItem,
            Payment,
            PaymentDetail,
            AddItemRequest,
            CartEntry,
            CartContents,
            QuantityUpdate,
            UpdateCartRequest,
            RemoveItemRequest,
            CheckoutRequest,
            CheckoutData,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CategoryRef,
            BrandRef,
            ProductDetail,
            CatalogData,
            MediaData,
            admin::CreateProductRequest,
            admin::UpdateProductRequest,
            admin::ProductList,
            catalog::CatalogQuery,
            health::HealthData,
            Meta,
            ApiResponse<CartContents>,
            ApiResponse<CheckoutData>,
            ApiResponse<CatalogData>,
            ApiResponse<ProductDetail>,
            ApiResponse<MediaData>,
            ApiResponse<User>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Product, category, brand and media browsing"),
        (name = "Cart", description = "Cart mutation endpoints"),
        (name = "Payment", description = "Checkout endpoint"),
        (name = "Admin", description = "Product management endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
