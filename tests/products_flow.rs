use axum_file_commerce::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::AppError,
    events::ChangeNotifier,
    services::product_service::ProductRepository,
    store::JsonStore,
};
use tempfile::TempDir;

async fn setup(dir: &TempDir) -> anyhow::Result<ProductRepository> {
    let store = JsonStore::open(dir.path().join("products.json")).await?;
    Ok(ProductRepository::new(store, ChangeNotifier::new()))
}

fn new_product(code: &str) -> CreateProductRequest {
    CreateProductRequest {
        title: "T".to_string(),
        description: "A test product".to_string(),
        code: code.to_string(),
        price: 10.0,
        stock: 5,
        status: "available".to_string(),
        category: "misc".to_string(),
        thumbnail: "t.png".to_string(),
        thumbnails: vec!["t1.png".to_string(), "t2.png".to_string()],
    }
}

#[tokio::test]
async fn ids_are_unique_and_strictly_increasing() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repo = setup(&dir).await?;

    let mut last = 0;
    for code in ["C1", "C2", "C3", "C4"] {
        let product = repo.add(new_product(code)).await?;
        assert!(product.id > last);
        last = product.id;
    }

    // Id assignment is max + 1, so a deleted tail id gets reused but never an
    // id still present in the collection.
    repo.delete(4).await?;
    let product = repo.add(new_product("C5")).await?;
    assert_eq!(product.id, 4);
    Ok(())
}

#[tokio::test]
async fn get_by_code_finds_the_added_product() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repo = setup(&dir).await?;

    repo.add(new_product("C1")).await?;
    let found = repo.get_by_code("C1").await?.expect("product by code");
    assert_eq!(found.id, 1);
    assert_eq!(found.stock, 5);
    assert!(repo.get_by_code("missing").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_code_is_rejected_and_collection_unchanged() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repo = setup(&dir).await?;

    repo.add(new_product("C1")).await?;
    let mut dup = new_product("C1");
    dup.title = "Other".to_string();
    let err = repo.add(dup).await.unwrap_err();
    assert!(matches!(err, AppError::DuplicateCode(code) if code == "C1"));

    let products = repo.list().await?;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "T");
    Ok(())
}

#[tokio::test]
async fn missing_required_fields_are_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repo = setup(&dir).await?;

    let mut bad = new_product("C1");
    bad.title = "  ".to_string();
    assert!(matches!(
        repo.add(bad).await.unwrap_err(),
        AppError::Validation(_)
    ));

    let mut bad = new_product("C1");
    bad.price = -1.0;
    assert!(matches!(
        repo.add(bad).await.unwrap_err(),
        AppError::Validation(_)
    ));

    assert!(repo.list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn update_merges_partial_fields() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repo = setup(&dir).await?;

    let product = repo.add(new_product("C1")).await?;
    let updated = repo
        .update(
            product.id,
            UpdateProductRequest {
                price: Some(12.5),
                status: Some("sold out".to_string()),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.price, 12.5);
    assert_eq!(updated.status, "sold out");
    // Untouched fields keep their stored values.
    assert_eq!(updated.title, "T");
    assert_eq!(updated.code, "C1");
    assert_eq!(updated.stock, 5);

    let err = repo
        .update(99, UpdateProductRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("product")));
    Ok(())
}

#[tokio::test]
async fn delete_is_a_noop_for_absent_ids() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repo = setup(&dir).await?;

    repo.add(new_product("C1")).await?;
    repo.delete(99).await?;
    assert_eq!(repo.list().await?.len(), 1);

    repo.delete(1).await?;
    assert!(repo.list().await?.is_empty());
    assert!(repo.get_by_id(1).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn adjust_stock_validates_bounds() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repo = setup(&dir).await?;

    let product = repo.add(new_product("C1")).await?;
    let updated = repo.adjust_stock(product.id, 42).await?;
    assert_eq!(updated.stock, 42);

    assert!(matches!(
        repo.adjust_stock(product.id, -1).await.unwrap_err(),
        AppError::Validation(_)
    ));
    assert!(matches!(
        repo.adjust_stock(99, 1).await.unwrap_err(),
        AppError::NotFound("product")
    ));

    // The failed adjustments left the stored value alone.
    assert_eq!(repo.get_by_id(product.id).await?.expect("product").stock, 42);
    Ok(())
}

#[tokio::test]
async fn adjust_stock_rejects_values_beyond_u32() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let repo = setup(&dir).await?;

    let product = repo.add(new_product("C1")).await?;
    // u32::MAX + 1 must be rejected outright, never wrapped down to 0.
    let err = repo.adjust_stock(product.id, 4_294_967_296).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(repo.get_by_id(product.id).await?.expect("product").stock, 5);

    let updated = repo.adjust_stock(product.id, u32::MAX as i64).await?;
    assert_eq!(updated.stock, u32::MAX);
    Ok(())
}

#[tokio::test]
async fn create_product_responds_created() -> anyhow::Result<()> {
    use axum::{Json, extract::State, http::StatusCode};
    use axum_file_commerce::{config::AppConfig, routes::products::create_product, state::AppState};

    let dir = TempDir::new()?;
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_dir: dir.path().to_path_buf(),
    };
    let state = AppState::initialize(&config).await?;

    let (status, response) = create_product(State(state), Json(new_product("C1"))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let product = response.0.data.expect("created product");
    assert_eq!(product.id, 1);
    Ok(())
}
