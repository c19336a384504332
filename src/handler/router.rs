//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, three-way
//! path classification (API call / existing asset / SPA route), and access
//! logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating what the serving path needs
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// How a request path is served
#[derive(Debug, PartialEq, Eq)]
pub enum RouteClass {
    /// Backend API call that reached the frontend port; rejected without
    /// touching the filesystem
    ApiRejection,
    /// Path resolves to a regular file under the document root
    Asset(PathBuf),
    /// Client-side route; serve the SPA root document
    SpaFallback,
}

/// Classify a request path into one of the three serving categories.
pub fn classify_path(path: &str, state: &AppState) -> RouteClass {
    if path.starts_with(state.config.spa.api_prefix.as_str()) {
        return RouteClass::ApiRejection;
    }
    match static_files::resolve_asset(&state.root, path) {
        Some(file) => RouteClass::Asset(file),
        None => RouteClass::SpaFallback,
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let is_head = *req.method() == Method::HEAD;
    // uri.path() already excludes query string and fragment
    let path = req.uri().path().to_string();

    let response = match check_http_method(req.method()) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: &path,
                is_head,
                if_none_match: header_string(&req, "if-none-match"),
                range_header: header_string(&req, "range"),
            };
            route_request(&ctx, &state).await
        }
    };

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            req.method().to_string(),
            path,
        );
        entry.query = req.uri().query().map(ToString::to_string);
        entry.http_version = version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = content_length(&response);
        entry.referer = header_string(&req, "referer");
        entry.user_agent = header_string(&req, "user-agent");
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a classified request to its serving path
pub async fn route_request(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    match classify_path(ctx.path, state) {
        RouteClass::ApiRejection => http::build_api_rejection_response(),
        RouteClass::Asset(file) => static_files::serve_asset(ctx, state, &file).await,
        RouteClass::SpaFallback => static_files::serve_spa_fallback(ctx, state).await,
    }
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn content_length(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::test_config;
    use crate::http::response::API_REJECTION_BODY;
    use http_body_util::BodyExt;
    use std::fs as std_fs;
    use std::path::Path;

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    fn state_with_root(root: &Path) -> Arc<AppState> {
        Arc::new(AppState::with_root(
            test_config(),
            root.canonicalize().unwrap(),
        ))
    }

    /// Document root matching the contract scenario: an index document and
    /// one bundled script.
    fn spa_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std_fs::write(dir.path().join("index.html"), "<html>A</html>").unwrap();
        std_fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
        dir
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_classify_api_path() {
        let dir = spa_root();
        let state = state_with_root(dir.path());
        assert_eq!(
            classify_path("/api/users", &state),
            RouteClass::ApiRejection
        );
        assert_eq!(
            classify_path("/api/tasks/42", &state),
            RouteClass::ApiRejection
        );
        // The prefix is literal: "/api" without the trailing slash is an
        // ordinary (unknown) route
        assert_eq!(classify_path("/api", &state), RouteClass::SpaFallback);
        assert_eq!(
            classify_path("/apiary.html", &state),
            RouteClass::SpaFallback
        );
    }

    #[test]
    fn test_classify_api_wins_over_existing_file() {
        let dir = spa_root();
        std_fs::create_dir_all(dir.path().join("api")).unwrap();
        std_fs::write(dir.path().join("api/users"), "not served").unwrap();
        let state = state_with_root(dir.path());

        assert_eq!(
            classify_path("/api/users", &state),
            RouteClass::ApiRejection
        );
    }

    #[test]
    fn test_classify_existing_asset() {
        let dir = spa_root();
        let state = state_with_root(dir.path());
        match classify_path("/app.js", &state) {
            RouteClass::Asset(p) => assert!(p.ends_with("app.js")),
            other => panic!("Expected Asset, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_unknown_route() {
        let dir = spa_root();
        let state = state_with_root(dir.path());
        assert_eq!(
            classify_path("/dashboard/settings", &state),
            RouteClass::SpaFallback
        );
    }

    #[tokio::test]
    async fn test_api_rejection_response() {
        let dir = spa_root();
        let state = state_with_root(dir.path());

        let resp = route_request(&ctx("/api/users"), &state).await;
        assert_eq!(resp.status(), 404);
        assert!(body_string(resp).await.contains(API_REJECTION_BODY));
    }

    #[tokio::test]
    async fn test_existing_asset_served_with_exact_bytes() {
        let dir = spa_root();
        let state = state_with_root(dir.path());

        let resp = route_request(&ctx("/app.js"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/javascript"
        );
        assert_eq!(
            resp.headers().get("Cache-Control").unwrap(),
            "no-cache, no-store, must-revalidate"
        );
        assert_eq!(body_string(resp).await, "console.log(1)");
    }

    #[tokio::test]
    async fn test_unknown_route_serves_index_document() {
        let dir = spa_root();
        let state = state_with_root(dir.path());

        let fallback = route_request(&ctx("/dashboard/settings"), &state).await;
        let direct = route_request(&ctx("/index.html"), &state).await;

        assert_eq!(fallback.status(), direct.status());
        assert_eq!(fallback.status(), 200);
        assert_eq!(body_string(fallback).await, body_string(direct).await);
    }

    #[tokio::test]
    async fn test_directory_route_falls_back_to_index() {
        let dir = spa_root();
        std_fs::create_dir(dir.path().join("dashboard")).unwrap();
        let state = state_with_root(dir.path());

        let resp = route_request(&ctx("/dashboard"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, "<html>A</html>");
    }

    #[tokio::test]
    async fn test_repeated_requests_are_idempotent() {
        let dir = spa_root();
        let state = state_with_root(dir.path());

        let first = body_string(route_request(&ctx("/app.js"), &state).await).await;
        let second = body_string(route_request(&ctx("/app.js"), &state).await).await;
        assert_eq!(first, second);
        assert_eq!(first, "console.log(1)");
    }

    #[test]
    fn test_method_gate() {
        assert!(check_http_method(&Method::GET).is_none());
        assert!(check_http_method(&Method::HEAD).is_none());

        let options = check_http_method(&Method::OPTIONS).unwrap();
        assert_eq!(options.status(), 204);

        let post = check_http_method(&Method::POST).unwrap();
        assert_eq!(post.status(), 405);
        assert_eq!(post.headers().get("Allow").unwrap(), "GET, HEAD, OPTIONS");
    }
}
