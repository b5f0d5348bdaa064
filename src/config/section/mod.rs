//! Configuration section definitions.
//!
//! Each module corresponds to a section in `minweb.toml`:
//!
//! | Module   | TOML Section   | Purpose                              |
//! |----------|----------------|--------------------------------------|
//! | `assets` | `[assets]`     | Static root, debug mode, cache       |
//! | `bundle` | `[[bundles]]`  | Named asset groups for `minweb build` |

mod assets;
mod bundle;

pub use assets::AssetsConfig;
pub use bundle::{BundleConfig, validate_bundles};
