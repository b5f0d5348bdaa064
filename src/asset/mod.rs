//! Asset pipeline: combine, minify, cache and link.
//!
//! # Module Structure
//!
//! ```text
//! asset/
//! ├── kind      # AssetKind (js / css)
//! ├── combine   # N sources → one *.COMBINED.<ext> file
//! ├── minify    # oxc / lightningcss, *.min.<ext> siblings
//! ├── jsmin     # JS comment and whitespace stripping
//! ├── rewrite   # textual CSS declaration rewrites
//! ├── cache     # SourceCache + [assets.cache] config
//! ├── stamp     # ?t=<unix-seconds> queries
//! ├── tag       # <script> / <link> rendering
//! ├── link      # AssetLinker (entry point)
//! └── error     # AssetError
//! ```

pub mod cache;
pub mod combine;
mod error;
mod jsmin;
mod kind;
pub mod link;
pub mod minify;
pub mod rewrite;
mod stamp;
pub mod tag;

// Types
pub use cache::{CacheConfig, CacheKey, CacheKind, CacheOverride, Expire, SourceCache};
pub use error::AssetError;
pub use kind::AssetKind;
pub use link::{AssetLinker, LinkOptions};

// Operations
pub use combine::combine_sources;
pub use minify::{minify, minify_css, minify_js, minify_sources};
pub use rewrite::{rewrite_declarations, shorten_hex_color};
pub use tag::render_tags;
