//! HTTP response building module
//!
//! Builders for the status codes the server emits, decoupled from routing
//! and filesystem logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::Response;

use super::cache::CachePolicy;

/// Body of the fixed rejection for API-prefixed paths.
///
/// The message deliberately names the real problem: the frontend and
/// backend ports have been confused, not that the resource is missing.
pub const API_REJECTION_BODY: &str = "API calls should go to backend server";

/// Build 404 response for API-prefixed paths
pub fn build_api_rejection_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(API_REJECTION_BODY)))
        .unwrap_or_else(|e| {
            log_build_error("API rejection", &e);
            Response::new(Full::new(Bytes::from(API_REJECTION_BODY)))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, cache_control: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", cache_control)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> Response<Full<Bytes>> {
    Response::builder()
        .status(416)
        .header("Content-Type", "text/plain")
        .header("Content-Range", format!("bytes */{file_size}"))
        .body(Full::new(Bytes::from("Range Not Satisfiable")))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::from("Range Not Satisfiable")))
        })
}

/// Build a full 200 file response with cache headers applied
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    policy: CachePolicy,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Accept-Ranges", "bytes");

    apply_cache_headers(builder, etag, policy)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 206 Partial Content response
#[allow(clippy::too_many_arguments)]
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    policy: CachePolicy,
    start: usize,
    end: usize,
    total_size: usize,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = end - start + 1;
    let body = if is_head { Bytes::new() } else { data };

    let builder = Response::builder()
        .status(206)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Content-Range", format!("bytes {start}-{end}/{total_size}"))
        .header("Accept-Ranges", "bytes");

    apply_cache_headers(builder, etag, policy)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Attach the cache header set dictated by the policy.
///
/// No-store responses also carry the legacy `Pragma`/`Expires` pair so
/// HTTP/1.0 intermediaries honor the policy, and omit the `ETag` since the
/// client must not hold a copy to revalidate.
fn apply_cache_headers(builder: Builder, etag: &str, policy: CachePolicy) -> Builder {
    match policy {
        CachePolicy::Public(_) => builder
            .header("ETag", etag)
            .header("Cache-Control", policy.cache_control()),
        CachePolicy::NoStore => builder
            .header("Cache-Control", policy.cache_control())
            .header("Pragma", "no-cache")
            .header("Expires", "0"),
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_rejection() {
        let resp = build_api_rejection_response();
        assert_eq!(resp.status(), 404);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_file_response_no_store_headers() {
        let resp = build_file_response(
            Bytes::from_static(b"console.log(1)"),
            "application/javascript",
            "\"abc\"",
            CachePolicy::NoStore,
            false,
        );
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Cache-Control").unwrap(),
            "no-cache, no-store, must-revalidate"
        );
        assert_eq!(resp.headers().get("Pragma").unwrap(), "no-cache");
        assert_eq!(resp.headers().get("Expires").unwrap(), "0");
        assert!(resp.headers().get("ETag").is_none());
    }

    #[test]
    fn test_file_response_public_headers() {
        let resp = build_file_response(
            Bytes::from_static(b"<html>A</html>"),
            "text/html; charset=utf-8",
            "\"abc\"",
            CachePolicy::Public(3600),
            false,
        );
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Cache-Control").unwrap(),
            "public, max-age=3600"
        );
        assert_eq!(resp.headers().get("ETag").unwrap(), "\"abc\"");
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "14");
    }

    #[tokio::test]
    async fn test_head_has_length_but_empty_body() {
        use http_body_util::BodyExt;

        let resp = build_file_response(
            Bytes::from_static(b"0123456789"),
            "text/plain",
            "\"x\"",
            CachePolicy::default(),
            true,
        );
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "10");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
