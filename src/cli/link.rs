//! `minweb link`: process sources given on the command line.

use anyhow::{Context, Result};

use super::args::LinkArgs;
use crate::asset::AssetLinker;
use crate::config::MinwebConfig;

/// Process the sources and print their tags to stdout.
pub fn run_link(config: &MinwebConfig, args: &LinkArgs) -> Result<()> {
    let html = render_link(config, args)?;
    println!("{html}");
    Ok(())
}

fn render_link(config: &MinwebConfig, args: &LinkArgs) -> Result<String> {
    let linker = AssetLinker::from_config(&config.assets);
    linker
        .link(args.kind, &args.sources, &args.link_options())
        .with_context(|| format!("failed to link {} {} source(s)", args.sources.len(), args.kind))
}
