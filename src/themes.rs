//!
//! Theme inventory
//! ---------------
//! The admin themes page lists the installed themes and which one the
//! `current` symlink points at. Themes are plain directories under the
//! provisioned themes path; `current` itself is excluded from the listing.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct ThemeListing {
    pub themes: Vec<String>,
    /// Name of the theme `current` resolves to, if the link exists.
    pub current: Option<String>,
}

/// Scan the themes directory for installed theme names, sorted, excluding
/// the `current` symlink.
pub fn installed_themes(themes_path: &Path) -> AppResult<ThemeListing> {
    let entries = fs::read_dir(themes_path).map_err(|e| {
        AppError::filesystem(format!("failed to read themes directory {}: {}", themes_path.display(), e))
    })?;
    let mut names = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppError::filesystem(e.to_string()))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name == "current" {
            continue;
        }
        if entry.path().is_dir() {
            names.insert(name);
        }
    }
    let current = fs::read_link(themes_path.join("current"))
        .ok()
        .and_then(|t| t.file_name().map(|s| s.to_string_lossy().to_string()));
    Ok(ThemeListing { themes: names.into_iter().collect(), current })
}

/// GET /admin/api/themes
pub async fn index(State(state): State<AppState>) -> Result<Json<ThemeListing>, AppError> {
    let listing = installed_themes(&state.settings.themes_path)?;
    Ok(Json(listing))
}
