//!
//! Product document store
//! ----------------------
//! The in-process facade over product persistence. `ProductStore` is the
//! seam the router depends on; `DocumentStore` is the file-backed
//! implementation used by the server, holding one JSON document per product
//! under `<files_root>/db/products`. A `SharedProducts` handle wraps the
//! store for use from the app state.
//!
//! There are no retries and no caching: every call maps to a single pass
//! over the filesystem, and any failure surfaces as a `StorageError`.

use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use super::model::{Product, ProductDraft};

/// Storage seam for product documents.
pub trait ProductStore: Send + Sync {
    /// Return all products, ordered by creation time then id.
    fn find_all(&self) -> AppResult<Vec<Product>>;

    /// Persist a new product; the store assigns `_id` and timestamps.
    fn insert(&self, draft: ProductDraft) -> AppResult<Product>;
}

/// Shared handle used by the HTTP layer.
pub type SharedProducts = Arc<dyn ProductStore>;

/// File-backed document store: one pretty-printed JSON file per product.
pub struct DocumentStore {
    root: PathBuf,
    // Guards multi-file operations against interleaved writers in-process.
    lock: RwLock<()>,
}

impl DocumentStore {
    /// Open (and create if needed) a store rooted at the given directory.
    pub fn new<P: AsRef<Path>>(root: P) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .map_err(|e| AppError::storage(format!("failed to create store root {}: {}", root.display(), e)))?;
        Ok(Self { root, lock: RwLock::new(()) })
    }

    fn doc_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }
}

impl ProductStore for DocumentStore {
    fn find_all(&self) -> AppResult<Vec<Product>> {
        let _guard = self.lock.read();
        let entries = fs::read_dir(&self.root)
            .map_err(|e| AppError::storage(format!("failed to read store root {}: {}", self.root.display(), e)))?;
        let mut products = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AppError::storage(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path)
                .map_err(|e| AppError::storage(format!("failed to read {}: {}", path.display(), e)))?;
            let product: Product = serde_json::from_str(&content)
                .map_err(|e| AppError::storage(format!("corrupt document {}: {}", path.display(), e)))?;
            products.push(product);
        }
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(products)
    }

    fn insert(&self, draft: ProductDraft) -> AppResult<Product> {
        let _guard = self.lock.write();
        let now = chrono::Utc::now().timestamp();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            created_at: now,
            updated_at: now,
            attrs: draft.attrs,
        };
        let path = self.doc_path(&product.id);
        let json = serde_json::to_string_pretty(&product)
            .map_err(|e| AppError::storage(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| AppError::storage(format!("failed to write {}: {}", path.display(), e)))?;
        debug!(id = %product.id, "product saved");
        Ok(product)
    }
}

/// Populate an empty store with a handful of sample products. Used on first
/// run when `seed_db` is enabled; a non-empty store is left untouched.
pub fn seed_sample_products(store: &dyn ProductStore) -> AppResult<usize> {
    if !store.find_all()?.is_empty() {
        return Ok(0);
    }
    let samples = ["Classic Mug", "Canvas Tote", "Enamel Pin"];
    for name in samples {
        store.insert(ProductDraft { name: name.to_string(), ..Default::default() })?;
    }
    Ok(samples.len())
}
