//! Asset kind definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of web asset handled by the pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// JavaScript, rendered as `<script>`.
    Js,
    /// Stylesheet, rendered as `<link rel="stylesheet">`.
    Css,
}

impl AssetKind {
    /// File extension without the dot.
    pub const fn ext(self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Css => "css",
        }
    }

    /// Extension of the minified sibling, e.g. `.min.js`.
    pub const fn minified_ext(self) -> &'static str {
        match self {
            Self::Js => ".min.js",
            Self::Css => ".min.css",
        }
    }

    /// Detect the kind from an extension (with or without leading dot).
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "js" | "mjs" => Some(Self::Js),
            "css" => Some(Self::Css),
            _ => None,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ext())
    }
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ext(s).ok_or_else(|| format!("unknown asset kind `{s}` (expected js or css)"))
    }
}
