//! HTTP cache control module
//!
//! Provides `ETag` generation, conditional request handling and the cache
//! policy applied to served assets. Bundled development assets (`.js`,
//! `.css` by default) are served with a strict no-store policy so the
//! browser never replays a stale bundle after a rebuild.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate `ETag` using fast hashing
///
/// # Arguments
/// * `content` - File content
///
/// # Returns
/// Quoted `ETag` string, e.g., `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`
///
/// # Returns
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        // Handle multiple ETags separated by comma
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

/// Cache policy attached to a successful file response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// Never cache: `no-cache, no-store, must-revalidate` plus the legacy
    /// `Pragma`/`Expires` pair for old proxies
    NoStore,
}

impl CachePolicy {
    /// Convert to Cache-Control header value
    pub fn cache_control(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::NoStore => "no-cache, no-store, must-revalidate".to_string(),
        }
    }

    /// Whether conditional requests may be short-circuited with 304.
    ///
    /// No-store assets always get a full body: a 304 would let the client
    /// keep a copy we just told it not to store.
    pub const fn allows_conditional(self) -> bool {
        matches!(self, Self::Public(_))
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Public(3600) // 1 hour
    }
}

/// Select the cache policy for a served file based on its extension.
///
/// Extensions listed in `no_cache_extensions` get [`CachePolicy::NoStore`];
/// everything else keeps the default public policy.
pub fn policy_for_extension(extension: Option<&str>, no_cache_extensions: &[String]) -> CachePolicy {
    match extension {
        Some(ext) if no_cache_extensions.iter().any(|e| e == ext) => CachePolicy::NoStore,
        _ => CachePolicy::default(),
    }
}
