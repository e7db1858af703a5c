use std::time::Duration;

use axum_file_commerce::{
    dto::products::CreateProductRequest,
    events::{CatalogEvent, ChangeNotifier, EventKind},
    services::product_service::ProductRepository,
    store::JsonStore,
};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::timeout;

async fn setup(dir: &TempDir) -> anyhow::Result<(ProductRepository, ChangeNotifier)> {
    let notifier = ChangeNotifier::new();
    let store = JsonStore::open(dir.path().join("products.json")).await?;
    Ok((ProductRepository::new(store, notifier.clone()), notifier))
}

fn new_product(code: &str) -> CreateProductRequest {
    CreateProductRequest {
        title: "Widget".to_string(),
        description: "A widget".to_string(),
        code: code.to_string(),
        price: 10.0,
        stock: 5,
        status: "available".to_string(),
        category: "misc".to_string(),
        thumbnail: "w.png".to_string(),
        thumbnails: vec![],
    }
}

async fn next<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("event within a second")
        .expect("channel open")
}

#[tokio::test]
async fn subscribers_observe_persisted_mutations() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (repo, notifier) = setup(&dir).await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    notifier.subscribe(EventKind::ProductAdded, move |event| {
        if let CatalogEvent::ProductAdded { product } = event {
            let _ = tx.send(product.id);
        }
    });

    let added = repo.add(new_product("C1")).await?;
    assert_eq!(next(&mut rx).await, added.id);
    Ok(())
}

#[tokio::test]
async fn removal_events_fire_only_for_real_deletions() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (repo, notifier) = setup(&dir).await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    notifier.subscribe(EventKind::ProductRemoved, move |event| {
        if let CatalogEvent::ProductRemoved { id } = event {
            let _ = tx.send(*id);
        }
    });

    let added = repo.add(new_product("C1")).await?;
    // A no-op delete publishes nothing, so the first event observed must be
    // the real deletion that follows it.
    repo.delete(99).await?;
    repo.delete(added.id).await?;
    assert_eq!(next(&mut rx).await, added.id);
    Ok(())
}

#[tokio::test]
async fn a_panicking_subscriber_is_isolated() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (repo, notifier) = setup(&dir).await?;

    notifier.subscribe(EventKind::ProductAdded, |_| {
        panic!("subscriber bug");
    });
    let (tx, mut rx) = mpsc::unbounded_channel();
    notifier.subscribe(EventKind::ProductAdded, move |event| {
        if let CatalogEvent::ProductAdded { product } = event {
            let _ = tx.send(product.id);
        }
    });

    // The publishing repository call succeeds and the handler registered
    // after the faulty one still runs.
    let added = repo.add(new_product("C1")).await?;
    assert_eq!(next(&mut rx).await, added.id);

    // The dispatcher survives for later events too.
    let second = repo.add(new_product("C2")).await?;
    assert_eq!(next(&mut rx).await, second.id);
    Ok(())
}
