//!
//! storefront-admin runtime settings
//! ---------------------------------
//! Settings are assembled exactly once at process start from three layers:
//! built-in defaults, the `HOST`/`PORT` environment variables, and an
//! environment-named override file (`config/<env>.json`, optional) merged
//! last, so the file wins wherever both are set. The resulting `Settings`
//! value is immutable; it is shared through the app state behind an `Arc`
//! and never written after the listener binds.
//!
//! The struct also carries the derived filesystem layout (upload, product
//! photo, theme and log directories, all joined onto `files_root_path`) and
//! the admin URL builders used by operator tooling and tests.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which named environment the process runs as. Selected by the required
/// `APP_ENV` variable; also picks the override file under `config/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunEnv {
    Development,
    Production,
    Test,
}

impl RunEnv {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "development" => Ok(RunEnv::Development),
            "production" => Ok(RunEnv::Production),
            "test" => Ok(RunEnv::Test),
            other => bail!("unknown APP_ENV value: '{}'", other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunEnv::Development => "development",
            RunEnv::Production => "production",
            RunEnv::Test => "test",
        }
    }
}

/// Optional overrides loaded from `config/<env>.json` or taken from process
/// environment variables. Unspecified values inherit the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub files_root_path: Option<PathBuf>,
    pub seed_db: Option<bool>,
    pub max_results_in_page: Option<usize>,
    pub session_secret: Option<String>,
}

impl Overrides {
    /// Load overrides from a JSON file. A missing file yields empty overrides;
    /// a malformed file is a startup error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read override file {}", path.display()))?;
        let ov: Overrides = serde_json::from_str(&content)
            .with_context(|| format!("malformed override file {}", path.display()))?;
        Ok(ov)
    }

    fn from_process_env() -> Self {
        Overrides {
            host: std::env::var("HOST").ok(),
            port: std::env::var("PORT").ok().and_then(|p| p.parse().ok()),
            ..Default::default()
        }
    }
}

/// Fully resolved, immutable runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub env: RunEnv,
    pub host: String,
    pub port: u16,
    /// Root of all server-managed files (uploads, themes, logs, documents).
    pub files_root_path: PathBuf,
    /// Should the store be populated with sample products on first run?
    pub seed_db: bool,
    pub max_results_in_page: usize,
    pub session_secret: String,
    pub user_roles: Vec<String>,

    // Derived URIs (public-facing path fragments)
    pub uploads_uri: String,
    pub product_photo_uri: String,

    // Derived filesystem layout
    pub uploads_path: PathBuf,
    pub product_photo_path: PathBuf,
    pub themes_path: PathBuf,
    pub log_files_root_path: PathBuf,
}

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => bail!("You must set the {} environment variable", name),
    }
}

impl Settings {
    /// Assemble settings from the process environment. `APP_ENV` is required
    /// and the process fails fast without it.
    pub fn from_env() -> Result<Self> {
        let name = required_env("APP_ENV")?;
        let env = RunEnv::parse(&name)?;
        let file = Overrides::load(&Path::new("config").join(format!("{}.json", name)))?;
        Self::build(env, file, Overrides::from_process_env())
    }

    /// Build an effective settings value from defaults + environment
    /// overrides + file overrides. The file wins over the environment, the
    /// environment over defaults.
    pub fn build(env: RunEnv, file: Overrides, env_ov: Overrides) -> Result<Self> {
        let host = file.host.or(env_ov.host).unwrap_or_else(|| "localhost".to_string());
        let port = file.port.or(env_ov.port).unwrap_or(9876);
        let files_root_path = file
            .files_root_path
            .or(env_ov.files_root_path)
            .unwrap_or_else(|| PathBuf::from(".tmp"));
        let seed_db = file.seed_db.or(env_ov.seed_db).unwrap_or(false);
        let max_results_in_page = file
            .max_results_in_page
            .or(env_ov.max_results_in_page)
            .unwrap_or(20);
        let session_secret = file
            .session_secret
            .or(env_ov.session_secret)
            .unwrap_or_else(|| "storefront-secret".to_string());

        let uploads_uri = "/uploads".to_string();
        let product_photo_uri = format!("{}/photos/products", uploads_uri);

        let uploads_path = files_root_path.join("uploads");
        let product_photo_path = uploads_path.join("photos").join("products");
        let themes_path = files_root_path.join("themes");
        let log_files_root_path = files_root_path.join("logs");

        Ok(Settings {
            env,
            host,
            port,
            files_root_path,
            seed_db,
            max_results_in_page,
            session_secret,
            user_roles: vec!["guest".to_string(), "user".to_string(), "admin".to_string()],
            uploads_uri,
            product_photo_uri,
            uploads_path,
            product_photo_path,
            themes_path,
            log_files_root_path,
        })
    }

    /// Settings rooted at an explicit directory, defaults otherwise. Used by
    /// tests to keep every run inside an isolated temp root.
    pub fn for_root(env: RunEnv, root: &Path) -> Self {
        let file = Overrides { files_root_path: Some(root.to_path_buf()), ..Default::default() };
        Self::build(env, file, Overrides::default()).expect("defaults are always buildable")
    }

    // ---- Admin URL builders (string concatenation over host/port) ----

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn admin_base_url(&self) -> String {
        format!("{}/admin", self.base_url())
    }

    pub fn admin_login_url(&self) -> String {
        format!("{}/auth/local", self.admin_base_url())
    }

    pub fn admin_product_api_url(&self) -> String {
        format!("{}/api/products", self.admin_base_url())
    }

    pub fn admin_theme_api_url(&self) -> String {
        format!("{}/api/themes", self.admin_base_url())
    }
}
