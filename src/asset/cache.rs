//! Memoization of combine/minify results.
//!
//! Results are keyed by the cache namespace, the operation and every argument
//! that influences the output path, so a hit returns exactly what the
//! computation returned the first time (timestamp query included).
//!
//! # Configuration
//!
//! ```toml
//! [assets.cache]
//! key = "sources"    # namespace
//! expire = "never"   # or a number of seconds
//! type = "memory"    # or "none" to recompute every time
//! ```

use std::fmt;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::debug;

// ============================================================================
// Configuration
// ============================================================================

/// Entry lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ExpireRepr", into = "ExpireRepr")]
pub enum Expire {
    #[default]
    Never,
    Seconds(u64),
}

impl Expire {
    pub fn as_duration(self) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::Seconds(secs) => Some(Duration::from_secs(secs)),
        }
    }
}

/// On-disk form: `"never"` or an integer.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ExpireRepr {
    Seconds(u64),
    Keyword(String),
}

impl TryFrom<ExpireRepr> for Expire {
    type Error = String;

    fn try_from(repr: ExpireRepr) -> Result<Self, Self::Error> {
        match repr {
            ExpireRepr::Seconds(secs) => Ok(Self::Seconds(secs)),
            ExpireRepr::Keyword(word) if word.eq_ignore_ascii_case("never") => Ok(Self::Never),
            ExpireRepr::Keyword(word) => Err(format!(
                "invalid expire `{word}`: expected \"never\" or a number of seconds"
            )),
        }
    }
}

impl From<Expire> for ExpireRepr {
    fn from(expire: Expire) -> Self {
        match expire {
            Expire::Never => Self::Keyword("never".into()),
            Expire::Seconds(secs) => Self::Seconds(secs),
        }
    }
}

/// Cache backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    /// Process-local memo store.
    #[default]
    Memory,
    /// No memoization: every call recomputes.
    #[serde(rename = "none")]
    Disabled,
}

/// `[assets.cache]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Namespace shared by all entries created with this config.
    pub key: String,
    pub expire: Expire,
    #[serde(rename = "type")]
    pub kind: CacheKind,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key: "sources".into(),
            expire: Expire::Never,
            kind: CacheKind::Memory,
        }
    }
}

impl CacheConfig {
    /// Copy of `self` with every field set in `patch` replaced.
    pub fn merged(&self, patch: Option<&CacheOverride>) -> Self {
        let Some(patch) = patch else {
            return self.clone();
        };
        Self {
            key: patch.key.clone().unwrap_or_else(|| self.key.clone()),
            expire: patch.expire.unwrap_or(self.expire),
            kind: patch.kind.unwrap_or(self.kind),
        }
    }
}

/// Per-call (or per-bundle) replacement for some cache fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOverride {
    pub key: Option<String>,
    pub expire: Option<Expire>,
    #[serde(rename = "type")]
    pub kind: Option<CacheKind>,
}

// ============================================================================
// Store
// ============================================================================

/// Operation name plus its stringified arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: &'static str,
    args: Vec<String>,
}

impl CacheKey {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Append a list argument, keeping element boundaries distinct.
    pub fn list<S: AsRef<str>>(self, values: &[S]) -> Self {
        let joined = values
            .iter()
            .map(|v| format!("{:?}", v.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        self.arg(format_args!("[{joined}]"))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operation, self.args.join(", "))
    }
}

#[derive(Debug)]
struct CacheEntry {
    value: Vec<String>,
    created: Instant,
    /// Lifetime it was stored with.
    ttl: Option<Duration>,
}

impl CacheEntry {
    fn is_expired(&self, expire: Expire) -> bool {
        expire
            .as_duration()
            .is_some_and(|ttl| self.created.elapsed() >= ttl)
    }

    fn is_stale(&self) -> bool {
        self.ttl.is_some_and(|ttl| self.created.elapsed() >= ttl)
    }
}

/// Process-wide store used by [`SourceCache::global`].
static GLOBAL: LazyLock<SourceCache> = LazyLock::new(SourceCache::new);

/// Thread-safe memo store for asset path lists.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: DashMap<(String, CacheKey), CacheEntry>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Return the cached value for `key`, or run `compute` and store its
    /// result.
    ///
    /// No lock is held while `compute` runs. Errors are returned as-is and
    /// never stored.
    pub fn get_or_try_insert<E, F>(
        &self,
        config: &CacheConfig,
        key: CacheKey,
        compute: F,
    ) -> Result<Vec<String>, E>
    where
        F: FnOnce() -> Result<Vec<String>, E>,
    {
        if config.kind == CacheKind::Disabled {
            return compute();
        }

        let slot = (config.key.clone(), key);
        if let Some(entry) = self.entries.get(&slot)
            && !entry.is_expired(config.expire)
        {
            debug!("cache"; "hit {}", slot.1);
            return Ok(entry.value.clone());
        }

        debug!("cache"; "miss {}", slot.1);
        let value = compute()?;
        // timestamped keys are never looked up again once stale
        self.entries.retain(|_, entry| !entry.is_stale());
        self.entries.insert(
            slot,
            CacheEntry {
                value: value.clone(),
                created: Instant::now(),
                ttl: config.expire.as_duration(),
            },
        );
        Ok(value)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
