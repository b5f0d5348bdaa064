//! Command-line interface module.

mod args;
pub mod build;
pub mod link;

pub use args::{Cli, Commands, LinkArgs};
