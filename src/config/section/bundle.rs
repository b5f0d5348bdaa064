//! `[[bundles]]` section configuration.
//!
//! Named asset groups rendered by `minweb build`.
//!
//! # Example
//!
//! ```toml
//! [[bundles]]
//! name = "app"
//! kind = "js"                          # optional, inferred from the sources
//! sources = ["/js/a.js", "/js/b.js"]
//! combined = true
//! minified = true
//! timestamp = false
//! combined_filename = "app"            # requires combined = true
//! strip_prefix = "/static"
//! attrs = { defer = "" }
//! cache = { expire = 600 }             # merged over [assets.cache]
//! ```

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::asset::{AssetKind, CacheOverride, LinkOptions};
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::url::{split_query, splitext};

/// One named asset group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    pub name: String,

    /// Asset kind; inferred from the first source when omitted.
    pub kind: Option<AssetKind>,

    /// Root-relative source references, in output order.
    pub sources: Vec<String>,

    pub combined: bool,
    pub minified: bool,
    pub timestamp: bool,
    pub builtins: bool,
    pub combined_filename: Option<String>,
    pub strip_prefix: Option<String>,

    /// Extra tag attributes.
    pub attrs: BTreeMap<String, String>,

    /// Per-bundle cache settings.
    pub cache: Option<CacheOverride>,
}

impl BundleConfig {
    const NAME: FieldPath = FieldPath::new("bundles.name");
    const KIND: FieldPath = FieldPath::new("bundles.kind");
    const SOURCES: FieldPath = FieldPath::new("bundles.sources");
    const COMBINED: FieldPath = FieldPath::new("bundles.combined");
    const COMBINED_FILENAME: FieldPath = FieldPath::new("bundles.combined_filename");

    /// Declared kind, or the kind of the first source's extension.
    pub fn resolved_kind(&self) -> Option<AssetKind> {
        self.kind
            .or_else(|| self.sources.first().and_then(|source| source_kind(source)))
    }

    /// Link options for this bundle.
    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            combined: self.combined,
            minified: self.minified,
            combined_filename: self.combined_filename.clone(),
            timestamp: self.timestamp,
            cache: self.cache.clone(),
            builtins: self.builtins,
            strip_prefix: self.strip_prefix.clone(),
            attrs: self.attrs.clone(),
        }
    }

    fn validate(&self, idx: usize, diag: &mut ConfigDiagnostics) {
        let label = if self.name.is_empty() {
            format!("[{idx}]")
        } else {
            format!("[{idx}] `{}`", self.name)
        };

        if self.name.trim().is_empty() {
            diag.error(Self::NAME, format!("{label} bundle name must not be empty"));
        }

        if self.sources.is_empty() {
            diag.error(Self::SOURCES, format!("{label} at least one source is required"));
            return;
        }

        match self.resolved_kind() {
            None => diag.error_with_hint(
                Self::KIND,
                format!("{label} cannot infer asset kind from `{}`", self.sources[0]),
                "set `kind = \"js\"` or `kind = \"css\"`",
            ),
            Some(kind) => {
                for source in &self.sources {
                    if source_kind(source) != Some(kind) {
                        diag.error(
                            Self::SOURCES,
                            format!("{label} `{source}` is not a .{} file", kind.ext()),
                        );
                    }
                }
            }
        }

        if !self.combined && self.link_options().filename().is_some() {
            diag.error_with_hint(
                Self::COMBINED_FILENAME,
                format!("{label} `combined_filename` is set but `combined` is not"),
                "add `combined = true` or remove `combined_filename`",
            );
        }

        if self.combined && self.sources.len() < 2 {
            diag.warn(
                Self::COMBINED,
                format!("{label} has a single source, nothing to combine"),
            );
        }
    }
}

fn source_kind(source: &str) -> Option<AssetKind> {
    let (path, _) = split_query(source);
    AssetKind::from_ext(splitext(path).1)
}

/// Validate all bundles, including name uniqueness.
pub fn validate_bundles(bundles: &[BundleConfig], diag: &mut ConfigDiagnostics) {
    let mut seen = FxHashSet::default();
    for (idx, bundle) in bundles.iter().enumerate() {
        bundle.validate(idx, diag);
        if !bundle.name.is_empty() && !seen.insert(bundle.name.as_str()) {
            diag.error(
                BundleConfig::NAME,
                format!("[{idx}] duplicate bundle name `{}`", bundle.name),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Expire;
    use crate::config::test_parse_config;

    fn validate(toml: &str) -> ConfigDiagnostics {
        let config = test_parse_config(toml);
        let mut diag = ConfigDiagnostics::new();
        validate_bundles(&config.bundles, &mut diag);
        diag
    }

    #[test]
    fn test_bundle_config() {
        let config = test_parse_config(
            r#"
[[bundles]]
name = "app"
sources = ["/js/a.js", "/js/b.js"]
combined = true
minified = true
combined_filename = "app"
attrs = { defer = "" }
cache = { expire = 600 }

[[bundles]]
name = "site"
kind = "css"
sources = ["/css/site.css"]
"#,
        );
        assert_eq!(config.bundles.len(), 2);

        let app = &config.bundles[0];
        assert_eq!(app.resolved_kind(), Some(AssetKind::Js));
        let options = app.link_options();
        assert!(options.combined && options.minified);
        assert_eq!(options.filename(), Some("app"));
        assert_eq!(options.attrs.get("defer").map(String::as_str), Some(""));
        assert_eq!(options.cache.and_then(|c| c.expire), Some(Expire::Seconds(600)));

        assert_eq!(config.bundles[1].resolved_kind(), Some(AssetKind::Css));
    }

    #[test]
    fn test_valid_bundles() {
        let diag = validate(
            "[[bundles]]\nname = \"app\"\nsources = [\"/a.js\", \"/b.js?v=2\"]\ncombined = true",
        );
        assert!(!diag.has_errors());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn test_bundle_without_sources() {
        let diag = validate("[[bundles]]\nname = \"app\"");
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, BundleConfig::SOURCES);
    }

    #[test]
    fn test_bundle_mixed_kinds() {
        let diag = validate("[[bundles]]\nname = \"app\"\nsources = [\"/a.js\", \"/b.css\"]");
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].message.contains("/b.css"));
    }

    #[test]
    fn test_bundle_unknown_kind() {
        let diag = validate("[[bundles]]\nname = \"img\"\nsources = [\"/logo.png\"]");
        assert_eq!(diag.errors()[0].field, BundleConfig::KIND);
    }

    #[test]
    fn test_bundle_filename_requires_combined() {
        let diag = validate(
            "[[bundles]]\nname = \"app\"\nsources = [\"/a.js\"]\ncombined_filename = \"x\"",
        );
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, BundleConfig::COMBINED_FILENAME);
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        let diag = validate(
            "[[bundles]]\nname = \"app\"\nsources = [\"/a.js\"]\n\
             [[bundles]]\nname = \"app\"\nsources = [\"/b.js\"]\n\
             [[bundles]]\nsources = [\"/c.js\"]",
        );
        assert_eq!(diag.len(), 2);
        assert!(diag.errors().iter().any(|e| e.message.contains("duplicate")));
        assert!(diag.errors().iter().any(|e| e.message.contains("must not be empty")));
    }

    #[test]
    fn test_single_source_combined_warns() {
        let diag = validate("[[bundles]]\nname = \"app\"\nsources = [\"/a.js\"]\ncombined = true");
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);
    }
}
