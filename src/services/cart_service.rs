use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    events::{CatalogEvent, ChangeNotifier},
    models::{Cart, LineItem},
    services::product_service::ProductRepository,
    store::JsonStore,
};

/// CRUD over the cart collection plus the composite add-product workflow,
/// which cross-calls the product repository to validate and decrement stock.
pub struct CartRepository {
    store: JsonStore<Cart>,
    products: Arc<ProductRepository>,
    notifier: ChangeNotifier,
}

impl CartRepository {
    pub fn new(
        store: JsonStore<Cart>,
        products: Arc<ProductRepository>,
        notifier: ChangeNotifier,
    ) -> Self {
        Self {
            store,
            products,
            notifier,
        }
    }

    pub async fn create(&self) -> AppResult<Cart> {
        let cart = Cart {
            id: Uuid::new_v4().to_string(),
            products: Vec::new(),
        };
        let mut txn = self.store.begin_write().await?;
        txn.records.push(cart.clone());
        txn.commit().await?;

        tracing::debug!(cart_id = %cart.id, "cart created");
        Ok(cart)
    }

    pub async fn list(&self) -> AppResult<Vec<Cart>> {
        self.store.read().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<Cart>> {
        Ok(self.store.read().await?.into_iter().find(|c| c.id == id))
    }

    pub async fn get_products(&self, id: &str) -> AppResult<Vec<LineItem>> {
        self.get_by_id(id)
            .await?
            .map(|cart| cart.products)
            .ok_or(AppError::NotFound("cart"))
    }

    /// Composite workflow over both collections. Locks are taken in a fixed
    /// global order, products before carts, and the stock check-and-decrement
    /// happens under the product lock, so two concurrent calls can never both
    /// pass the stock check on stale data. On any failure before commit
    /// neither file is touched.
    pub async fn add_product(
        &self,
        cart_id: &str,
        product_id: u64,
        quantity: u32,
    ) -> AppResult<Cart> {
        if cart_id.trim().is_empty() {
            return Err(AppError::Validation("cart id is required".to_string()));
        }
        if product_id == 0 {
            return Err(AppError::Validation(
                "product id must be positive".to_string(),
            ));
        }
        if quantity == 0 {
            return Err(AppError::Validation(
                "quantity must be positive".to_string(),
            ));
        }

        let mut products_txn = self.products.store().begin_write().await?;
        let mut carts_txn = self.store.begin_write().await?;

        let cart = carts_txn
            .records
            .iter_mut()
            .find(|c| c.id == cart_id)
            .ok_or(AppError::NotFound("cart"))?;
        let product = products_txn
            .records
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(AppError::NotFound("product"))?;

        let remaining =
            product
                .stock
                .checked_sub(quantity)
                .ok_or(AppError::InsufficientStock {
                    product_id,
                    requested: quantity,
                    available: product.stock,
                })?;
        product.stock = remaining;

        // Re-adding a product merges into the existing line item.
        match cart
            .products
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            Some(item) => {
                item.quantity = item.quantity.checked_add(quantity).ok_or_else(|| {
                    AppError::Validation("line item quantity overflow".to_string())
                })?;
            }
            None => cart.products.push(LineItem {
                product_id,
                quantity,
            }),
        }
        let updated = cart.clone();

        products_txn.commit().await?;
        carts_txn.commit().await?;

        tracing::debug!(cart_id = %updated.id, product_id, quantity, remaining, "product added to cart");
        self.notifier.publish(CatalogEvent::ProductAddedToCart {
            cart_id: updated.id.clone(),
            product_id,
            quantity,
        });
        Ok(updated)
    }
}
