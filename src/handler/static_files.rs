//! Static file serving module
//!
//! Resolves request paths against the document root and builds file
//! responses with MIME types and cache headers.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeOutcome};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Resolve a request path to a regular file under the document root.
///
/// Returns `None` when no file exists there, when the path names a
/// directory, or when it escapes the root. Directories deliberately do not
/// count: a client-side route like `/dashboard` may collide with a
/// directory name on disk and must still reach the SPA router.
pub fn resolve_asset(root: &Path, path: &str) -> Option<PathBuf> {
    let relative = path.trim_start_matches('/');
    if relative.is_empty() {
        // "/" is always the SPA document
        return None;
    }

    // Canonicalization fails for nonexistent entries, which also covers
    // the plain not-found case
    let canonical = root.join(relative).canonicalize().ok()?;
    if !canonical.starts_with(root) {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return None;
    }

    canonical.is_file().then_some(canonical)
}

/// Serve a resolved asset file
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    state: &AppState,
    file_path: &Path,
) -> Response<Full<Bytes>> {
    match load_file(file_path).await {
        Some(content) => {
            let extension = file_path.extension().and_then(|e| e.to_str());
            build_file_response(
                &content,
                mime::get_content_type(extension),
                cache::policy_for_extension(extension, &state.config.spa.no_cache_extensions),
                ctx,
            )
        }
        None => http::build_404_response(),
    }
}

/// Serve the SPA root document for a client-side route.
///
/// When the root document itself is missing the server has nothing to fall
/// back to and answers 404.
pub async fn serve_spa_fallback(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let index_path = state.root.join(&state.config.spa.index_file);
    if !index_path.is_file() {
        logger::log_warning(&format!(
            "SPA root document missing: {}",
            index_path.display()
        ));
        return http::build_404_response();
    }

    match load_file(&index_path).await {
        Some(content) => {
            let extension = index_path.extension().and_then(|e| e.to_str());
            build_file_response(
                &content,
                mime::get_content_type(extension),
                cache::policy_for_extension(extension, &state.config.spa.no_cache_extensions),
                ctx,
            )
        }
        None => http::build_404_response(),
    }
}

/// Read a file, logging failures.
async fn load_file(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path).await {
        Ok(content) => Some(content),
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {}", path.display(), e));
            None
        }
    }
}

/// Build the response for file content: conditional handling for cacheable
/// assets, Range support, cache headers per policy.
fn build_file_response(
    data: &[u8],
    content_type: &str,
    policy: cache::CachePolicy,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let total_size = data.len();
    let etag = cache::generate_etag(data);

    // No-store assets never short-circuit to 304; the client must not hold
    // a copy to revalidate
    if policy.allows_conditional()
        && cache::check_etag_match(ctx.if_none_match.as_deref(), &etag)
    {
        return http::build_304_response(&etag, &policy.cache_control());
    }

    match http::parse_range_header(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Valid(range) => {
            let start = range.start;
            let end = range.end_position(total_size);
            http::response::build_partial_response(
                Bytes::from(data[start..=end].to_vec()),
                content_type,
                &etag,
                policy,
                start,
                end,
                total_size,
                ctx.is_head,
            )
        }
        RangeOutcome::NotSatisfiable => http::build_416_response(total_size),
        RangeOutcome::None => http::response::build_file_response(
            Bytes::from(data.to_owned()),
            content_type,
            &etag,
            policy,
            ctx.is_head,
        ),
    }
}
