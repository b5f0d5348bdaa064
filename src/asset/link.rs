//! Link builder: combine, minify and render in one call.
//!
//! ```text
//! sources ──▶ strip prefix ──▶ combine (cached) ──▶ minify (cached) ──▶ add prefix ──▶ tags
//! ```
//!
//! In debug mode, or with `builtins`, the sources are rendered untouched.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::cache::{CacheConfig, CacheKey, CacheOverride, SourceCache};
use super::combine::combine_sources;
use super::error::AssetError;
use super::kind::AssetKind;
use super::minify::minify_sources;
use super::tag::render_tags;
use crate::config::AssetsConfig;
use crate::debug;
use crate::utils::path::url::{prepend_url_prefix, strip_url_prefix};

/// Per-call options for [`AssetLinker::link`].
#[derive(Debug, Clone, Default)]
pub struct LinkOptions {
    /// Concatenate all sources into one file.
    pub combined: bool,
    /// Minify each (combined) source.
    pub minified: bool,
    /// Replaces the dot-joined source names of the combined file.
    pub combined_filename: Option<String>,
    /// Append a `?t=<unix-seconds>` query to generated paths.
    pub timestamp: bool,
    /// Merged over the linker's cache settings for this call only.
    pub cache: Option<CacheOverride>,
    /// Render sources untouched, as in debug mode.
    pub builtins: bool,
    /// URL prefix that does not exist on disk.
    pub strip_prefix: Option<String>,
    /// Extra tag attributes.
    pub attrs: BTreeMap<String, String>,
}

impl LinkOptions {
    /// Override name for the combined file, if a non-empty one is set.
    pub fn filename(&self) -> Option<&str> {
        self.combined_filename.as_deref().filter(|name| !name.is_empty())
    }

    /// Reject option combinations that cannot be honoured.
    pub fn validate(&self) -> Result<(), AssetError> {
        if self.filename().is_some() && !self.combined {
            return Err(AssetError::InvalidOptions(
                "`combined_filename` names the combined file, but `combined` is not set".into(),
            ));
        }
        Ok(())
    }

    fn prefix(&self) -> &str {
        self.strip_prefix.as_deref().unwrap_or_default()
    }
}

/// Entry point turning source lists into HTML tags.
#[derive(Debug, Clone)]
pub struct AssetLinker<'a> {
    root: PathBuf,
    debug: bool,
    cache: CacheConfig,
    store: &'a SourceCache,
}

impl AssetLinker<'static> {
    /// Linker over `root` using the process-wide cache.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_store(root, SourceCache::global())
    }

    pub fn from_config(assets: &AssetsConfig) -> Self {
        Self::new(assets.root.clone())
            .debug(assets.debug)
            .cache_config(assets.cache.clone())
    }
}

impl<'a> AssetLinker<'a> {
    /// Linker over `root` using a caller-owned cache.
    pub fn with_store(root: impl Into<PathBuf>, store: &'a SourceCache) -> Self {
        Self {
            root: root.into(),
            debug: false,
            cache: CacheConfig::default(),
            store,
        }
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn cache_config(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn javascript_link(
        &self,
        sources: &[String],
        options: &LinkOptions,
    ) -> Result<String, AssetError> {
        self.link(AssetKind::Js, sources, options)
    }

    pub fn stylesheet_link(
        &self,
        sources: &[String],
        options: &LinkOptions,
    ) -> Result<String, AssetError> {
        self.link(AssetKind::Css, sources, options)
    }

    /// Process `sources` according to `options` and render their tags.
    pub fn link(
        &self,
        kind: AssetKind,
        sources: &[String],
        options: &LinkOptions,
    ) -> Result<String, AssetError> {
        let paths = self.resolve(kind, sources, options)?;
        Ok(render_tags(kind, &paths, &options.attrs))
    }

    /// Process `sources` and return the paths to link, without rendering.
    pub fn resolve(
        &self,
        kind: AssetKind,
        sources: &[String],
        options: &LinkOptions,
    ) -> Result<Vec<String>, AssetError> {
        options.validate()?;

        if self.debug || options.builtins || !(options.combined || options.minified) {
            return Ok(sources.to_vec());
        }

        let prefix = options.prefix();
        let cache = self.cache.merged(options.cache.as_ref());
        let root = self.root.display().to_string();
        let filename = options.filename();

        let mut paths: Vec<String> = sources
            .iter()
            .map(|s| strip_url_prefix(s, prefix).to_string())
            .collect();

        if options.combined {
            let key = CacheKey::new("combine")
                .list(&paths)
                .arg(kind)
                .arg(&root)
                .arg(format_args!("{filename:?}"))
                .arg(options.timestamp);
            paths = self.store.get_or_try_insert(&cache, key, || {
                combine_sources(&paths, kind, &self.root, filename, options.timestamp)
            })?;
        }

        if options.minified {
            let key = CacheKey::new("minify")
                .list(&paths)
                .arg(kind)
                .arg(&root)
                .arg(options.timestamp);
            paths = self.store.get_or_try_insert(&cache, key, || {
                minify_sources(&paths, kind, &self.root, options.timestamp)
            })?;
        }

        if !prefix.is_empty() {
            paths = paths
                .iter()
                .map(|path| prepend_url_prefix(path, prefix))
                .collect();
        }

        debug!("link"; "{} {} source(s) -> {}", sources.len(), kind, paths.join(", "));
        Ok(paths)
    }
}
