//! Utility modules shared by the asset pipeline and the CLI.

pub mod path;
