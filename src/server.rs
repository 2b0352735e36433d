//!
//! storefront-admin HTTP server
//! ----------------------------
//! This module defines the Axum-based admin API: product CRUD, photo
//! upload/delete and theme inventory. It owns the shared app state and the
//! route table, and provides the startup entry points used by the binary.
//!
//! Responsibilities:
//! - Assemble settings and provision the on-disk layout before binding.
//! - Open the file-backed product store and optionally seed sample data.
//! - Mount all admin API routes and serve until the process exits.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{delete, get, post};
use axum::Router;
use tracing::info;

use crate::bootstrap;
use crate::config::Settings;
use crate::products;
use crate::products::store::{seed_sample_products, DocumentStore, SharedProducts};
use crate::themes;

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub products: SharedProducts,
}

/// Mount all admin API routes onto a router with the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "storefront-admin ok" }))
        .route(
            "/admin/api/products",
            get(products::router::index).post(products::router::create),
        )
        .route("/admin/api/products/upload_photo", post(products::router::upload_photo))
        .route("/admin/api/products/delete_photo", delete(products::router::delete_photo))
        .route("/admin/api/themes", get(themes::index))
        .with_state(state)
}

fn log_startup_inventory(settings: &Settings) {
    info!(
        target: "startup",
        "file layout: root={}, photos={}, themes={}, logs={}",
        settings.files_root_path.display(),
        settings.product_photo_path.display(),
        settings.themes_path.display(),
        settings.log_files_root_path.display()
    );
    match themes::installed_themes(&settings.themes_path) {
        Ok(listing) => info!(
            target: "startup",
            "installed themes: [{}], current={:?}",
            listing.themes.join(", "),
            listing.current
        ),
        Err(e) => tracing::warn!("could not list installed themes: {e}"),
    }
    info!(target: "startup", "admin api at {}", settings.admin_product_api_url());
}

/// Serve the admin API with already-bootstrapped settings. The caller is
/// responsible for having provisioned the file layout.
pub async fn run_with_settings(settings: Settings) -> Result<()> {
    let store = DocumentStore::new(settings.files_root_path.join("db").join("products"))?;
    if settings.seed_db {
        let seeded = seed_sample_products(&store)?;
        if seeded > 0 {
            info!(target: "startup", "seeded {} sample products", seeded);
        }
    }

    log_startup_inventory(&settings);

    let bind_addr = format!("{}:{}", settings.host, settings.port);
    let state = AppState {
        settings: Arc::new(settings),
        products: Arc::new(store),
    };
    let app = build_router(state);

    info!("Starting server on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Full startup path used by the binary: settings from the environment,
/// filesystem provisioning, then serve.
pub async fn run() -> Result<()> {
    let settings = Settings::from_env()?;
    bootstrap::provision(&settings)?;
    run_with_settings(settings).await
}
