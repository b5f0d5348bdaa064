//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`url`]: forward-slash URL paths (`common_prefix`, `dirname`, `splitext`, ...)
//! - [`fs`]: filesystem paths (`normalize_path`, `resolve_source`)

pub mod fs;
pub mod url;

pub use fs::{normalize_path, resolve_source};
