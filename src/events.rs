use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::sync::mpsc;

use crate::models::Product;

/// A catalog mutation that already made it to disk. Repositories publish
/// these after commit, never before.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    ProductAdded {
        product: Product,
    },
    ProductRemoved {
        id: u64,
    },
    #[serde(rename_all = "camelCase")]
    ProductAddedToCart {
        cart_id: String,
        product_id: u64,
        quantity: u32,
    },
}

impl CatalogEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            CatalogEvent::ProductAdded { .. } => EventKind::ProductAdded,
            CatalogEvent::ProductRemoved { .. } => EventKind::ProductRemoved,
            CatalogEvent::ProductAddedToCart { .. } => EventKind::ProductAddedToCart,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ProductAdded,
    ProductRemoved,
    ProductAddedToCart,
}

type Handler = Box<dyn Fn(&CatalogEvent) + Send + Sync>;

/// In-process publish/subscribe hub. Events are queued and dispatched from a
/// background task, so a slow subscriber never stalls the repository that
/// published. Handlers run in registration order; there is no replay of
/// events published before a subscription existed.
#[derive(Clone)]
pub struct ChangeNotifier {
    tx: mpsc::UnboundedSender<CatalogEvent>,
    handlers: Arc<RwLock<Vec<(EventKind, Handler)>>>,
}

impl ChangeNotifier {
    /// Spawns the dispatcher task; call from within a tokio runtime.
    pub fn new() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<CatalogEvent>();
        let handlers: Arc<RwLock<Vec<(EventKind, Handler)>>> = Arc::new(RwLock::new(Vec::new()));
        let registered = Arc::clone(&handlers);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let handlers = registered.read().unwrap_or_else(|e| e.into_inner());
                for (kind, handler) in handlers.iter().filter(|(kind, _)| *kind == event.kind()) {
                    // A panicking subscriber must not take the dispatcher down
                    // or starve the handlers registered after it.
                    if catch_unwind(AssertUnwindSafe(|| handler(&event))).is_err() {
                        tracing::warn!(?kind, "event subscriber panicked");
                    }
                }
            }
        });
        Self { tx, handlers }
    }

    pub fn subscribe<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&CatalogEvent) + Send + Sync + 'static,
    {
        self.handlers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((kind, Box::new(handler)));
    }

    pub fn publish(&self, event: CatalogEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("event dispatcher is gone, dropping event");
        }
    }
}
