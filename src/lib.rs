//! minweb - combine, minify and link JavaScript/CSS assets.
//!
//! ```ignore
//! use minweb::asset::{AssetLinker, LinkOptions};
//!
//! let linker = AssetLinker::new("public");
//! let html = linker.javascript_link(
//!     &["/js/a.js".into(), "/js/b.js".into()],
//!     &LinkOptions { combined: true, minified: true, ..Default::default() },
//! )?;
//! // <script src="/js/a.b.COMBINED.min.js" type="text/javascript"></script>
//! ```

pub mod asset;
pub mod cli;
pub mod config;
pub mod logger;
pub mod utils;
