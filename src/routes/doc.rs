use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        carts::{AddToCartRequest, CartList, LineItemList},
        products,
    },
    models::{Cart, LineItem, Product},
    response::{ApiResponse, Meta},
    routes::{carts, health, products as product_routes},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        product_routes::list_products,
        product_routes::create_product,
        product_routes::get_product,
        product_routes::update_product,
        product_routes::delete_product,
        product_routes::adjust_stock,
        carts::list_carts,
        carts::create_cart,
        carts::get_cart_products,
        carts::add_product_to_cart,
    ),
    components(
        schemas(
            Product,
            Cart,
            LineItem,
            products::CreateProductRequest,
            products::UpdateProductRequest,
            products::AdjustStockRequest,
            products::ProductList,
            product_routes::ListQuery,
            AddToCartRequest,
            CartList,
            LineItemList,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<Cart>,
            ApiResponse<products::ProductList>,
            ApiResponse<CartList>,
            ApiResponse<LineItemList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Carts", description = "Shopping cart endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
