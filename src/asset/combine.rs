//! Concatenation of asset groups into a single file.
//!
//! ```text
//! /deep/a.js + /b.js    →  /a.b.COMBINED.js
//! /css/1.css + /css/2.css (name "site")  →  /css/site.COMBINED.css
//! ```

use std::fs;
use std::path::Path;

use super::error::AssetError;
use super::kind::AssetKind;
use super::stamp::timestamp_query;
use crate::debug;
use crate::utils::path::resolve_source;
use crate::utils::path::url::{basename, common_prefix, dirname, join, split_query, splitext};

/// Marker inserted between the joined names and the extension.
pub const COMBINED_MARKER: &str = "COMBINED";

/// File name of the combined artifact for `sources`.
///
/// `filename` replaces the dot-joined source stems when set.
pub fn combined_name(sources: &[&str], kind: AssetKind, filename: Option<&str>) -> String {
    let names = match filename {
        Some(name) => name.to_string(),
        None => sources
            .iter()
            .map(|source| splitext(basename(source)).0)
            .collect::<Vec<_>>()
            .join("."),
    };
    format!("{names}.{COMBINED_MARKER}.{}", kind.ext())
}

/// Concatenate `sources` into one file next to their common directory.
///
/// Fewer than two sources are returned unchanged: there is nothing to
/// combine. Inputs are copied as raw bytes, each followed by a newline.
pub fn combine_sources(
    sources: &[String],
    kind: AssetKind,
    fs_root: &Path,
    filename: Option<&str>,
    timestamp: bool,
) -> Result<Vec<String>, AssetError> {
    if sources.len() < 2 {
        return Ok(sources.to_vec());
    }

    let paths: Vec<&str> = sources.iter().map(|s| split_query(s).0).collect();
    let base = dirname(common_prefix(&paths));
    let name = combined_name(&paths, kind, filename);
    let combined_ref = join(base, &name);

    let mut buffer = Vec::new();
    for path in &paths {
        let input = resolve_source(fs_root, path);
        let content = fs::read(&input).map_err(|e| AssetError::io(&input, e))?;
        buffer.extend_from_slice(&content);
        buffer.push(b'\n');
    }

    let output = resolve_source(fs_root, &combined_ref);
    fs::write(&output, &buffer).map_err(|e| AssetError::io(&output, e))?;
    debug!("combine"; "{} sources -> {} ({} bytes)", paths.len(), combined_ref, buffer.len());

    Ok(vec![format!("{combined_ref}{}", timestamp_query(timestamp))])
}
