//! `minweb build`: render the bundles declared in the config file.
//!
//! Bundles are processed one after another in config order. Two bundles may
//! share a combined file, so one must not read it while another rewrites it.
//!
//! ```text
//! <!-- app -->
//! <script src="/js/app.COMBINED.min.js" type="text/javascript"></script>
//!
//! <!-- site -->
//! <link href="/css/site.min.css" media="screen" rel="stylesheet" type="text/css" />
//! ```

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::asset::{AssetKind, AssetLinker, render_tags};
use crate::config::{BundleConfig, MinwebConfig};
use crate::log;

/// Result of rendering one bundle.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedBundle {
    pub name: String,
    pub kind: AssetKind,
    pub paths: Vec<String>,
    pub html: String,
}

/// Render the selected bundles and print them to stdout.
pub fn run_build(config: &MinwebConfig, names: &[String], json: bool) -> Result<()> {
    if config.bundles.is_empty() {
        log!("build"; "no bundles declared in {}", config.config_path.display());
        return Ok(());
    }

    let rendered = build_bundles(config, names)?;
    if json {
        println!("{}", to_json(&rendered)?);
    } else {
        println!("{}", to_html(&rendered));
    }

    let count = rendered.len();
    log!("build"; "rendered {} bundle{}", count, if count == 1 { "" } else { "s" });
    Ok(())
}

/// Render `names` (or every bundle when empty), in config order.
pub fn build_bundles(config: &MinwebConfig, names: &[String]) -> Result<Vec<RenderedBundle>> {
    let selected = select_bundles(config, names)?;
    let linker = AssetLinker::from_config(&config.assets);

    selected
        .iter()
        .map(|bundle| render_bundle(&linker, bundle))
        .collect()
}

fn select_bundles<'a>(config: &'a MinwebConfig, names: &[String]) -> Result<Vec<&'a BundleConfig>> {
    if names.is_empty() {
        return Ok(config.bundles.iter().collect());
    }
    names
        .iter()
        .map(|name| match config.bundle(name) {
            Some(bundle) => Ok(bundle),
            None => bail!("unknown bundle `{name}`"),
        })
        .collect()
}

fn render_bundle(linker: &AssetLinker<'_>, bundle: &BundleConfig) -> Result<RenderedBundle> {
    let kind = bundle
        .resolved_kind()
        .with_context(|| format!("cannot determine asset kind of bundle `{}`", bundle.name))?;
    let options = bundle.link_options();
    let paths = linker
        .resolve(kind, &bundle.sources, &options)
        .with_context(|| format!("failed to build bundle `{}`", bundle.name))?;
    let html = render_tags(kind, &paths, &options.attrs);

    Ok(RenderedBundle {
        name: bundle.name.clone(),
        kind,
        paths,
        html,
    })
}

fn to_html(rendered: &[RenderedBundle]) -> String {
    rendered
        .iter()
        .map(|bundle| format!("<!-- {} -->\n{}", bundle.name, bundle.html))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `{ "<name>": { "kind": ..., "paths": [...], "html": ... }, ... }`
fn to_json(rendered: &[RenderedBundle]) -> Result<String> {
    let mut map = serde_json::Map::new();
    for bundle in rendered {
        map.insert(bundle.name.clone(), serde_json::to_value(bundle)?);
    }
    Ok(serde_json::to_string_pretty(&map)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::CacheKind;
    use crate::config::AssetsConfig;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, MinwebConfig) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("js")).unwrap();
        fs::write(dir.path().join("js/a.js"), "var a = 1;\n").unwrap();
        fs::write(dir.path().join("js/b.js"), "var b = 2;\n").unwrap();
        fs::write(dir.path().join("site.css"), "p { margin: 0px; }\n").unwrap();

        let mut config: MinwebConfig = toml::from_str(
            r#"
[[bundles]]
name = "app"
sources = ["/js/a.js", "/js/b.js"]
combined = true
minified = true
attrs = { defer = "" }

[[bundles]]
name = "site"
sources = ["/site.css"]
minified = true
"#,
        )
        .unwrap();
        config.assets = AssetsConfig {
            root: dir.path().to_path_buf(),
            ..AssetsConfig::default()
        };
        config.assets.cache.kind = CacheKind::Disabled;
        (dir, config)
    }

    #[test]
    fn test_build_all_bundles_in_order() {
        let (dir, config) = fixture();
        let rendered = build_bundles(&config, &[]).unwrap();

        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].name, "app");
        assert_eq!(rendered[0].paths, vec!["/js/a.b.COMBINED.min.js"]);
        assert!(rendered[0].html.contains(" defer "));
        assert_eq!(rendered[1].kind, AssetKind::Css);
        assert_eq!(rendered[1].paths, vec!["/site.min.css"]);
        assert!(dir.path().join("js/a.b.COMBINED.min.js").exists());
    }

    #[test]
    fn test_build_selected_bundle() {
        let (_dir, config) = fixture();
        let rendered = build_bundles(&config, &["site".to_string()]).unwrap();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].name, "site");
    }

    #[test]
    fn test_build_unknown_bundle() {
        let (_dir, config) = fixture();
        let err = build_bundles(&config, &["nope".to_string()]).unwrap_err();
        assert!(err.to_string().contains("unknown bundle `nope`"));
    }

    #[test]
    fn test_html_and_json_output() {
        let (_dir, config) = fixture();
        let rendered = build_bundles(&config, &[]).unwrap();

        let html = to_html(&rendered);
        assert!(html.starts_with("<!-- app -->\n<script defer src="));
        assert!(html.contains("\n\n<!-- site -->\n<link href=\"/site.min.css\""));

        let json: serde_json::Value = serde_json::from_str(&to_json(&rendered).unwrap()).unwrap();
        assert_eq!(json["app"]["kind"], "js");
        assert_eq!(json["site"]["paths"][0], "/site.min.css");
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["app", "site"]);
    }

    #[test]
    fn test_bundles_sharing_a_combined_file() {
        let (dir, mut config) = fixture();
        let mut twin = config.bundles[0].clone();
        twin.name = "app-twin".into();
        twin.attrs.clear();
        config.bundles.push(twin);

        let rendered = build_bundles(&config, &[]).unwrap();
        assert_eq!(rendered[2].paths, rendered[0].paths);
        let minified = fs::read_to_string(dir.path().join("js/a.b.COMBINED.min.js")).unwrap();
        assert_eq!(minified, "var a=1;var b=2;");
    }

    #[test]
    fn test_build_error_names_bundle() {
        let (dir, config) = fixture();
        fs::remove_file(dir.path().join("site.css")).unwrap();
        let err = build_bundles(&config, &[]).unwrap_err();
        assert!(format!("{err:#}").contains("bundle `site`"));
    }
}
