//! Asset minification for JS and CSS files.
//!
//! JavaScript is checked with the oxc parser and then stripped of comments and
//! whitespace by [`super::jsmin`], so every literal keeps its original bytes.
//! Stylesheets are parsed and reprinted compactly by lightningcss and then run
//! through the declaration rewrites in [`super::rewrite`]. The lightningcss
//! printer also canonicalizes values (`#ff0000` becomes `red`, `bold` becomes
//! `700`, repeated box sides collapse).

use std::fs;
use std::path::Path;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::parser::Parser;
use oxc::span::SourceType;
use thiserror::Error;

use super::error::AssetError;
use super::jsmin::strip_js;
use super::kind::AssetKind;
use super::rewrite::rewrite_declarations;
use super::stamp::timestamp_query;
use crate::debug;
use crate::utils::path::resolve_source;
use crate::utils::path::url::{split_query, splitext};

/// Parse failure reported by the JS or CSS parser.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SyntaxError(pub(super) String);

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Result<String, SyntaxError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();
    if let Some(err) = ret.errors.first() {
        return Err(SyntaxError(err.to_string()));
    }
    strip_js(source)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String, SyntaxError> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| SyntaxError(e.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| SyntaxError(e.to_string()))?;
    Ok(rewrite_declarations(&result.code))
}

/// Minify content of the given kind.
pub fn minify(kind: AssetKind, source: &str) -> Result<String, SyntaxError> {
    match kind {
        AssetKind::Js => minify_js(source),
        AssetKind::Css => minify_css(source),
    }
}

/// Minify each source into a `<stem>.min.<ext>` sibling.
///
/// Returns the minified references in input order. References that already
/// point at a `.min` file are passed through (minus any old query).
pub fn minify_sources(
    sources: &[String],
    kind: AssetKind,
    fs_root: &Path,
    timestamp: bool,
) -> Result<Vec<String>, AssetError> {
    let query = timestamp_query(timestamp);
    let mut minified = Vec::with_capacity(sources.len());

    for reference in sources {
        let (path, _) = split_query(reference);
        let (stem, _) = splitext(path);

        if stem.ends_with(".min") {
            debug!("minify"; "skip {} (already minified)", path);
            minified.push(format!("{path}{query}"));
            continue;
        }

        let input = resolve_source(fs_root, path);
        let output_ref = format!("{stem}{}", kind.minified_ext());
        let output = resolve_source(fs_root, &output_ref);

        let content = fs::read_to_string(&input).map_err(|e| AssetError::io(&input, e))?;
        let code = minify(kind, &content).map_err(|e| AssetError::Minify {
            path: input.clone(),
            message: e.to_string(),
        })?;
        fs::write(&output, &code).map_err(|e| AssetError::io(&output, e))?;

        debug!("minify"; "{} -> {} ({} -> {} bytes)", path, output_ref, content.len(), code.len());
        minified.push(format!("{output_ref}{query}"));
    }

    Ok(minified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_minify_js_strips_comments_and_whitespace() {
        let src = "// header\nfunction add(first, second) {\n    /* sum */\n    return first + second;\n}\n";
        let out = minify_js(src).unwrap();
        assert!(!out.contains("header"));
        assert!(!out.contains("sum */"));
        assert!(!out.contains("    "));
        // no mangling
        assert!(out.contains("first"));
        assert!(out.contains("second"));
        assert!(out.len() < src.len());
    }

    #[test]
    fn test_minify_js_keeps_literals() {
        let src = "var s = \"a  /* not a comment */  b\";\nvar r = /a  b/g;\n";
        let out = minify_js(src).unwrap();
        assert!(out.contains("\"a  /* not a comment */  b\""));
        assert!(out.contains("/a  b/g"));
    }

    #[test]
    fn test_minify_js_keeps_quote_style() {
        let out = minify_js("var t = \"a\";\nvar u = 'b';\nvar v = 'it\\'s';\n").unwrap();
        assert_eq!(out, "var t=\"a\";var u='b';var v='it\\'s';");
    }

    #[test]
    fn test_minify_js_syntax_error() {
        assert!(minify_js("function (").is_err());
    }

    #[test]
    fn test_minify_css_applies_rewrites() {
        let out = minify_css("p {\n  margin: 0px 1pt 0px 0em;\n  font-size: 0.83em;\n}\n").unwrap();
        assert!(out.starts_with("p{"));
        assert!(!out.contains("0px"));
        assert!(!out.contains("0em"));
        assert!(out.contains(".83em"));
        assert!(!out.contains("0.83em"));
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_minify_css_zero_units_end_to_end() {
        let out = minify_css("p { padding: 1px 0em 2em 0pt; color: #a1b2c3; }").unwrap();
        assert!(out.starts_with("p{padding:1px 0 2em"));
        assert!(!out.contains("0em"));
        assert!(!out.contains("0pt"));
        assert!(out.contains("color:#a1b2c3"));
    }

    #[test]
    fn test_minify_css_canonical_values() {
        let out = minify_css(
            "p{ color:#ff0000; font-weight: bold; margin: 10px 10px 10px 10px; background:#aabbcc }",
        )
        .unwrap();
        assert_eq!(out, "p{color:red;font-weight:700;margin:10px;background:#abc}");
    }

    #[test]
    fn test_minify_sources_writes_siblings() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "deep/a.js", "var first = 1; // one\n");
        write(dir.path(), "b.js", "var second = 2;\n");

        let sources = vec!["/deep/a.js".to_string(), "/b.js".to_string()];
        let out = minify_sources(&sources, AssetKind::Js, dir.path(), false).unwrap();

        assert_eq!(out, vec!["/deep/a.min.js", "/b.min.js"]);
        let a = fs::read_to_string(dir.path().join("deep/a.min.js")).unwrap();
        assert!(a.contains("first"));
        assert!(!a.contains("one"));
        assert!(dir.path().join("b.min.js").exists());
    }

    #[test]
    fn test_minify_sources_strips_old_query() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.b.COMBINED.css", "a { color: red }\n");

        let sources = vec!["/a.b.COMBINED.css?t=1700000000".to_string()];
        let out = minify_sources(&sources, AssetKind::Css, dir.path(), false).unwrap();

        assert_eq!(out, vec!["/a.b.COMBINED.min.css"]);
        assert!(dir.path().join("a.b.COMBINED.min.css").exists());
    }

    #[test]
    fn test_minify_sources_timestamp() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.css", "a { color: red }\n");

        let sources = vec!["/a.css".to_string()];
        let out = minify_sources(&sources, AssetKind::Css, dir.path(), true).unwrap();

        assert!(out[0].starts_with("/a.min.css?t="));
        assert!(!dir.path().join("a.min.css?t=").exists());
        assert!(dir.path().join("a.min.css").exists());
    }

    #[test]
    fn test_minify_sources_passes_through_min_files() {
        let dir = TempDir::new().unwrap();
        let sources = vec!["/vendor/lib.min.js".to_string()];
        let out = minify_sources(&sources, AssetKind::Js, dir.path(), false).unwrap();
        assert_eq!(out, sources);
        assert!(!dir.path().join("vendor/lib.min.min.js").exists());
    }

    #[test]
    fn test_minify_sources_missing_file() {
        let dir = TempDir::new().unwrap();
        let sources = vec!["/missing.js".to_string()];
        let err = minify_sources(&sources, AssetKind::Js, dir.path(), false).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn test_minify_sources_syntax_error_names_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bad.js", "function (\n");
        let sources = vec!["/bad.js".to_string()];
        let err = minify_sources(&sources, AssetKind::Js, dir.path(), false).unwrap_err();
        match err {
            AssetError::Minify { path, .. } => assert!(path.ends_with("bad.js")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("bad.min.js").exists());
    }
}
