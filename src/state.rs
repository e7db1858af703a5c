use std::sync::Arc;

use tokio::sync::broadcast;

use crate::{
    config::AppConfig,
    error::AppResult,
    events::{CatalogEvent, ChangeNotifier, EventKind},
    services::{cart_service::CartRepository, product_service::ProductRepository},
    store::JsonStore,
};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductRepository>,
    pub carts: Arc<CartRepository>,
    pub notifier: ChangeNotifier,
    pub events: broadcast::Sender<CatalogEvent>,
}

impl AppState {
    /// Open both collection files, wire the repositories to the notifier and
    /// bridge catalog events into the broadcast channel feeding websocket
    /// clients.
    pub async fn initialize(config: &AppConfig) -> AppResult<Self> {
        let notifier = ChangeNotifier::new();

        let product_store = JsonStore::open(config.products_path()).await?;
        let cart_store = JsonStore::open(config.carts_path()).await?;
        let products = Arc::new(ProductRepository::new(product_store, notifier.clone()));
        let carts = Arc::new(CartRepository::new(
            cart_store,
            Arc::clone(&products),
            notifier.clone(),
        ));

        let (events, _) = broadcast::channel(64);
        for kind in [EventKind::ProductAdded, EventKind::ProductRemoved] {
            let tx = events.clone();
            notifier.subscribe(kind, move |event| {
                // Send only fails when no client is connected.
                let _ = tx.send(event.clone());
            });
        }

        Ok(Self {
            products,
            carts,
            notifier,
            events,
        })
    }
}
