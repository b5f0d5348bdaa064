//! `[assets]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [assets]
//! root = "public"      # filesystem root for `/…` source references
//! debug = false        # link sources untouched, skip combine/minify
//!
//! [assets.cache]
//! key = "sources"
//! expire = "never"     # or seconds
//! type = "memory"      # or "none"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::asset::CacheConfig;
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::normalize_path;

/// Asset pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory that root-relative references resolve against.
    /// Relative to the config file.
    pub root: PathBuf,

    /// Serve sources untouched.
    pub debug: bool,

    /// Memoization of combine/minify results.
    pub cache: CacheConfig,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: "public".into(),
            debug: false,
            cache: CacheConfig::default(),
        }
    }
}

impl AssetsConfig {
    const ROOT: FieldPath = FieldPath::new("assets.root");
    const CACHE_KEY: FieldPath = FieldPath::new("assets.cache.key");

    /// Resolve `root` against the config directory.
    pub fn normalize(&mut self, base: &Path) {
        self.root = normalize_path(&base.join(&self.root));
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.root.exists() {
            diag.error_with_hint(
                Self::ROOT,
                format!("directory not found: {}", self.root.display()),
                "create it, or point `assets.root` / `--root` at your static files",
            );
        } else if !self.root.is_dir() {
            diag.error(
                Self::ROOT,
                format!("not a directory: {}", self.root.display()),
            );
        }

        if self.cache.key.trim().is_empty() {
            diag.error_with_hint(
                Self::CACHE_KEY,
                "must not be empty",
                "remove the field to use the default `sources`",
            );
        }
    }
}
