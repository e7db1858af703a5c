use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Cart, LineItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub quantity: u32,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CartList {
    #[schema(value_type = Vec<Cart>)]
    pub items: Vec<Cart>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct LineItemList {
    #[schema(value_type = Vec<LineItem>)]
    pub items: Vec<LineItem>,
}
