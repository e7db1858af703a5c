use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::{AppError, AppResult},
    events::{CatalogEvent, ChangeNotifier},
    models::Product,
    store::JsonStore,
};

/// CRUD over the product collection. Owns id assignment, the code-uniqueness
/// constraint and stock mutation; every mutating operation runs a full
/// load-modify-save cycle under the product file's write lock.
pub struct ProductRepository {
    store: JsonStore<Product>,
    notifier: ChangeNotifier,
}

impl ProductRepository {
    pub fn new(store: JsonStore<Product>, notifier: ChangeNotifier) -> Self {
        Self { store, notifier }
    }

    /// The cart repository's add-product workflow needs the product file
    /// lock directly so the stock check-and-decrement stays atomic.
    pub(crate) fn store(&self) -> &JsonStore<Product> {
        &self.store
    }

    pub async fn list(&self) -> AppResult<Vec<Product>> {
        self.store.read().await
    }

    pub async fn get_by_id(&self, id: u64) -> AppResult<Option<Product>> {
        Ok(self.store.read().await?.into_iter().find(|p| p.id == id))
    }

    pub async fn get_by_code(&self, code: &str) -> AppResult<Option<Product>> {
        Ok(self.store.read().await?.into_iter().find(|p| p.code == code))
    }

    pub async fn add(&self, fields: CreateProductRequest) -> AppResult<Product> {
        validate_new_product(&fields)?;

        let mut txn = self.store.begin_write().await?;
        if txn.records.iter().any(|p| p.code == fields.code) {
            return Err(AppError::DuplicateCode(fields.code));
        }

        let id = txn.records.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let product = Product {
            id,
            title: fields.title,
            description: fields.description,
            code: fields.code,
            price: fields.price,
            stock: fields.stock,
            status: fields.status,
            category: fields.category,
            thumbnail: fields.thumbnail,
            thumbnails: fields.thumbnails,
        };
        txn.records.push(product.clone());
        txn.commit().await?;

        tracing::debug!(id, code = %product.code, "product added");
        self.notifier.publish(CatalogEvent::ProductAdded {
            product: product.clone(),
        });
        Ok(product)
    }

    /// Partial merge: fields left out of the request keep their stored value.
    pub async fn update(&self, id: u64, fields: UpdateProductRequest) -> AppResult<Product> {
        if let Some(price) = fields.price
            && (price < 0.0 || !price.is_finite())
        {
            return Err(AppError::Validation(
                "price must be a non-negative number".to_string(),
            ));
        }

        let mut txn = self.store.begin_write().await?;
        let product = txn
            .records
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound("product"))?;

        if let Some(title) = fields.title {
            product.title = title;
        }
        if let Some(description) = fields.description {
            product.description = description;
        }
        if let Some(code) = fields.code {
            product.code = code;
        }
        if let Some(price) = fields.price {
            product.price = price;
        }
        if let Some(stock) = fields.stock {
            product.stock = stock;
        }
        if let Some(status) = fields.status {
            product.status = status;
        }
        if let Some(category) = fields.category {
            product.category = category;
        }
        if let Some(thumbnail) = fields.thumbnail {
            product.thumbnail = thumbnail;
        }
        if let Some(thumbnails) = fields.thumbnails {
            product.thumbnails = thumbnails;
        }
        let updated = product.clone();
        txn.commit().await?;

        Ok(updated)
    }

    /// Removing an absent id is a no-op, not an error. The removal event is
    /// only published when a record actually left the collection.
    pub async fn delete(&self, id: u64) -> AppResult<()> {
        let mut txn = self.store.begin_write().await?;
        let before = txn.records.len();
        txn.records.retain(|p| p.id != id);
        let removed = txn.records.len() < before;
        txn.commit().await?;

        if removed {
            tracing::debug!(id, "product removed");
            self.notifier.publish(CatalogEvent::ProductRemoved { id });
        }
        Ok(())
    }

    pub async fn adjust_stock(&self, id: u64, new_stock: i64) -> AppResult<Product> {
        let new_stock = u32::try_from(new_stock).map_err(|_| {
            AppError::Validation("stock must be a non-negative 32-bit integer".to_string())
        })?;

        let mut txn = self.store.begin_write().await?;
        let product = txn
            .records
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound("product"))?;
        product.stock = new_stock;
        let updated = product.clone();
        txn.commit().await?;

        Ok(updated)
    }
}

fn validate_new_product(fields: &CreateProductRequest) -> AppResult<()> {
    let required = [
        ("title", &fields.title),
        ("description", &fields.description),
        ("code", &fields.code),
        ("status", &fields.status),
        ("category", &fields.category),
        ("thumbnail", &fields.thumbnail),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{name} is required")));
        }
    }
    if fields.price < 0.0 || !fields.price.is_finite() {
        return Err(AppError::Validation(
            "price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}
