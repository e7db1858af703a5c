use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::carts::{AddToCartRequest, CartList, LineItemList},
    error::AppResult,
    models::Cart,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_carts).post(create_cart))
        .route("/{cid}", get(get_cart_products))
        .route("/{cid}/product/{pid}", post(add_product_to_cart))
}

#[utoipa::path(
    get,
    path = "/api/carts",
    responses(
        (status = 200, description = "List carts", body = ApiResponse<CartList>)
    ),
    tag = "Carts"
)]
pub async fn list_carts(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CartList>>> {
    let items = state.carts.list().await?;
    let total = items.len() as i64;
    Ok(Json(ApiResponse::success(
        "Carts",
        CartList { items },
        Some(Meta::total(total)),
    )))
}

#[utoipa::path(
    post,
    path = "/api/carts",
    responses(
        (status = 200, description = "Create an empty cart", body = ApiResponse<Cart>)
    ),
    tag = "Carts"
)]
pub async fn create_cart(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = state.carts.create().await?;
    Ok(Json(ApiResponse::success(
        "Cart created",
        cart,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/carts/{cid}",
    params(
        ("cid" = String, Path, description = "Cart ID")
    ),
    responses(
        (status = 200, description = "Line items of a cart", body = ApiResponse<LineItemList>),
        (status = 404, description = "Cart not found"),
    ),
    tag = "Carts"
)]
pub async fn get_cart_products(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> AppResult<Json<ApiResponse<LineItemList>>> {
    let items = state.carts.get_products(&cid).await?;
    Ok(Json(ApiResponse::success(
        "Cart products",
        LineItemList { items },
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/carts/{cid}/product/{pid}",
    params(
        ("cid" = String, Path, description = "Cart ID"),
        ("pid" = u64, Path, description = "Product ID"),
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Updated cart", body = ApiResponse<Cart>),
        (status = 404, description = "Cart or product not found"),
        (status = 409, description = "Insufficient stock"),
    ),
    tag = "Carts"
)]
pub async fn add_product_to_cart(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, u64)>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = state.carts.add_product(&cid, pid, payload.quantity).await?;
    Ok(Json(ApiResponse::success(
        "Product added to cart",
        cart,
        Some(Meta::empty()),
    )))
}
