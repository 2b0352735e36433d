//!
//! Startup filesystem provisioning
//! -------------------------------
//! Runs once before the server accepts connections. Creates the directory
//! layout the rest of the system depends on (product photos, logs, themes),
//! installs the bundled default theme and sample product images, and points
//! the `themes/current` symlink at the default theme.
//!
//! In the `test` environment the managed directories are removed and
//! recreated so every run starts from a clean slate. In every other
//! environment provisioning is idempotent: existing directories and their
//! contents are left untouched.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::{RunEnv, Settings};

/// Root of the bundled assets (default theme, sample images). Resolved
/// relative to the working directory, where deployed artifacts ship their
/// `assets/`; the compile-time crate path is only a fallback for runs
/// started outside that layout.
fn bundled_assets_root() -> PathBuf {
    let cwd_assets = PathBuf::from("assets");
    if cwd_assets.is_dir() {
        return cwd_assets;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

fn remove_folder(path: &Path) {
    // Removal failures are logged and swallowed; the recreate that follows
    // will surface anything that actually matters.
    if let Err(e) = fs::remove_dir_all(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("could not remove {}: {}", path.display(), e);
        }
    }
}

fn create_folder(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory {}", path.display()))
}

/// Copy a directory tree into `dst`, creating directories as needed and
/// overwriting existing files unconditionally.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("failed to walk {}", src.display()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir yields paths under its root");
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("failed to create directory {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!("failed to copy {} to {}", entry.path().display(), target.display())
            })?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn link_current_theme(themes_path: &Path) -> Result<()> {
    let current = themes_path.join("current");
    // symlink_metadata so a dangling link still counts as present
    if current.symlink_metadata().is_ok() {
        return Ok(());
    }
    std::os::unix::fs::symlink(themes_path.join("default"), &current)
        .with_context(|| format!("failed to create theme symlink {}", current.display()))
}

#[cfg(not(unix))]
fn link_current_theme(themes_path: &Path) -> Result<()> {
    warn!(
        "theme symlink not supported on this platform, skipping {}",
        themes_path.join("current").display()
    );
    Ok(())
}

/// Provision the on-disk layout for the given settings. Fatal on any
/// filesystem error other than the swallowed test-env removals.
pub fn provision(settings: &Settings) -> Result<()> {
    let managed = [
        &settings.product_photo_path,
        &settings.log_files_root_path,
        &settings.themes_path,
    ];

    if settings.env == RunEnv::Test {
        for path in managed {
            remove_folder(path);
            create_folder(path)?;
        }
    } else {
        for path in managed {
            create_folder(path)?;
        }
    }

    // Install bundled default theme and sample product images, overwriting
    let assets = bundled_assets_root();
    copy_tree(&assets.join("themes"), &settings.themes_path)?;
    copy_tree(&assets.join("sample_products"), &settings.product_photo_path)?;

    link_current_theme(&settings.themes_path)?;

    info!(
        target: "startup",
        "provisioned file layout: photos={}, logs={}, themes={}",
        settings.product_photo_path.display(),
        settings.log_files_root_path.display(),
        settings.themes_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provision_creates_layout_and_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::for_root(RunEnv::Development, dir.path());
        provision(&settings).unwrap();

        assert!(settings.product_photo_path.is_dir());
        assert!(settings.log_files_root_path.is_dir());
        assert!(settings.themes_path.join("default").is_dir());

        let current = settings.themes_path.join("current");
        assert!(current.symlink_metadata().unwrap().file_type().is_symlink());
        assert!(fs::read_link(&current).unwrap().ends_with("default"));
    }

    #[test]
    fn provision_is_idempotent_outside_test_env() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::for_root(RunEnv::Development, dir.path());
        provision(&settings).unwrap();

        // Drop a file into a managed directory; a second run must keep it
        let keep = settings.product_photo_path.join("keep.jpg");
        fs::write(&keep, b"photo bytes").unwrap();
        provision(&settings).unwrap();
        assert!(keep.exists());
    }

    #[test]
    fn provision_recreates_in_test_env() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::for_root(RunEnv::Test, dir.path());
        provision(&settings).unwrap();

        let stale = settings.product_photo_path.join("stale.jpg");
        fs::write(&stale, b"old").unwrap();
        provision(&settings).unwrap();
        assert!(!stale.exists());
    }

    #[test]
    fn symlink_left_alone_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::for_root(RunEnv::Development, dir.path());
        provision(&settings).unwrap();
        let before = fs::read_link(settings.themes_path.join("current")).unwrap();
        provision(&settings).unwrap();
        let after = fs::read_link(settings.themes_path.join("current")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn bundled_assets_resolve_relative_to_cwd() {
        // cargo test runs from the crate root, where assets/ is present, so
        // the working-directory path must win over the compile-time one
        assert_eq!(bundled_assets_root(), PathBuf::from("assets"));
        assert!(bundled_assets_root().join("themes").join("default").is_dir());
        assert!(bundled_assets_root().join("sample_products").is_dir());
    }

    #[test]
    fn copy_tree_overwrites_existing_files() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("sub")).unwrap();
        fs::write(src.path().join("sub/a.txt"), b"new").unwrap();
        fs::create_dir_all(dst.path().join("sub")).unwrap();
        fs::write(dst.path().join("sub/a.txt"), b"old").unwrap();

        copy_tree(src.path(), dst.path()).unwrap();
        assert_eq!(fs::read(dst.path().join("sub/a.txt")).unwrap(), b"new");
    }
}
