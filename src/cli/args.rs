//! Command-line interface definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand};

use crate::asset::{AssetKind, CacheKind, CacheOverride, LinkOptions};

/// Combine, minify and link JavaScript/CSS assets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "minweb.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Static files root (overrides `assets.root`, relative to the current directory)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Link sources untouched (overrides `assets.debug`)
    #[arg(short, long, global = true, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub debug: Option<bool>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Process sources and print their tags
    #[command(visible_alias = "l")]
    Link {
        #[command(flatten)]
        args: LinkArgs,
    },

    /// Render the bundles declared in the config file
    #[command(visible_alias = "b")]
    Build {
        /// Bundle names to render. If omitted, renders all bundles.
        #[arg(value_name = "NAME")]
        names: Vec<String>,

        /// Print a JSON object instead of HTML
        #[arg(long)]
        json: bool,
    },
}

/// Link command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct LinkArgs {
    /// Asset kind
    #[arg(value_enum)]
    pub kind: AssetKind,

    /// Root-relative source references (e.g. /js/app.js)
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Combine sources into one file
    #[arg(short, long)]
    pub combined: bool,

    /// Minify sources (after combining)
    #[arg(short, long)]
    pub minified: bool,

    /// Name of the combined file (requires --combined)
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Append a ?t=<unix-seconds> cache-busting query
    #[arg(short, long)]
    pub timestamp: bool,

    /// URL prefix that is not part of the on-disk path
    #[arg(long, value_name = "PREFIX")]
    pub strip_prefix: Option<String>,

    /// Link sources untouched
    #[arg(long)]
    pub builtins: bool,

    /// Recompute instead of using the result cache
    #[arg(long)]
    pub no_cache: bool,

    /// Extra tag attribute, repeatable (`--attr defer=` renders a bare attribute)
    #[arg(short, long = "attr", value_name = "KEY=VALUE", value_parser = parse_attr)]
    pub attrs: Vec<(String, String)>,
}

impl LinkArgs {
    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            combined: self.combined,
            minified: self.minified,
            combined_filename: self.name.clone(),
            timestamp: self.timestamp,
            cache: self.no_cache.then(|| CacheOverride {
                kind: Some(CacheKind::Disabled),
                ..CacheOverride::default()
            }),
            builtins: self.builtins,
            strip_prefix: self.strip_prefix.clone(),
            attrs: self.attrs.iter().cloned().collect::<BTreeMap<_, _>>(),
        }
    }
}

/// Parse `KEY=VALUE` (or a bare `KEY`).
fn parse_attr(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
    let key = key.trim();
    if key.is_empty() || key.contains(|c: char| c.is_whitespace() || "\"'<>/=".contains(c)) {
        return Err(format!("invalid attribute name in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attr() {
        assert_eq!(parse_attr("defer").unwrap(), ("defer".into(), String::new()));
        assert_eq!(
            parse_attr("media=print and (x=1)").unwrap(),
            ("media".into(), "print and (x=1)".into())
        );
        assert!(parse_attr("=x").is_err());
        assert!(parse_attr("a b=c").is_err());
    }

    #[test]
    fn test_link_command() {
        let cli = Cli::parse_from([
            "minweb", "-r", "static", "link", "css", "/a.css", "/b.css", "-c", "-m", "--name",
            "site", "--attr", "media=print", "--no-cache",
        ]);
        assert_eq!(cli.root, Some(PathBuf::from("static")));
        let Commands::Link { args } = &cli.command else {
            panic!("expected link command");
        };
        assert_eq!(args.kind, AssetKind::Css);
        assert_eq!(args.sources, vec!["/a.css", "/b.css"]);

        let options = args.link_options();
        assert!(options.combined && options.minified);
        assert_eq!(options.filename(), Some("site"));
        assert_eq!(options.attrs.get("media").map(String::as_str), Some("print"));
        assert_eq!(options.cache.and_then(|c| c.kind), Some(CacheKind::Disabled));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["minweb", "build", "app", "--json", "--debug", "-v"]);
        assert_eq!(cli.debug, Some(true));
        assert!(cli.verbose);
        let Commands::Build { names, json } = &cli.command else {
            panic!("expected build command");
        };
        assert_eq!(names, &vec!["app".to_string()]);
        assert!(*json);
    }

    #[test]
    fn test_link_requires_sources() {
        assert!(Cli::try_parse_from(["minweb", "link", "js"]).is_err());
        assert!(Cli::try_parse_from(["minweb", "link", "png", "/a.png"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
