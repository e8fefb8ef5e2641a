// Board API module
// Dispatches requests to handler functions based on path and method.

mod handlers;
mod response;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::logger;
use crate::store::PostStore;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let resp = if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        resp
    } else {
        match req.collect().await {
            Ok(collected) => {
                dispatch(&method, &path, &collected.to_bytes(), &state.store).await
            }
            Err(e) => {
                logger::log_error(&format!("Failed to read request body: {e}"));
                response::text_response(StatusCode::BAD_REQUEST, "요청 본문을 읽지 못했습니다.")
            }
        }
    };

    if state.config.logging.access_log {
        logger::log_request(method.as_str(), &path, resp.status().as_u16());
    }
    Ok(resp)
}

/// Route a request to its handler. Split out from `handle_request` so
/// the routing table is exercisable without a live hyper connection.
async fn dispatch(
    method: &Method,
    path: &str,
    body: &Bytes,
    store: &PostStore,
) -> Response<Full<Bytes>> {
    match (method, path) {
        // Preflight requests are answered uniformly for every board route.
        (&Method::OPTIONS, p) if is_board_route(p) => response::no_content(),
        (&Method::GET, "/posts") => handlers::list_posts(store).await,
        (&Method::POST, "/posts") => handlers::create_post(store, body).await,
        (&Method::POST, p) => match comment_route(p) {
            Some(post_id) => handlers::add_comment(store, post_id, body).await,
            None => response::not_found(),
        },
        _ => response::not_found(),
    }
}

fn is_board_route(path: &str) -> bool {
    path == "/posts" || comment_route(path).is_some()
}

/// Match `/board/{id}/comments` and return the id segment.
fn comment_route(path: &str) -> Option<&str> {
    let id = path.strip_prefix("/board/")?.strip_suffix("/comments")?;
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(id)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let size_str = content_length.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(response::payload_too_large())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(dir: &TempDir) -> PostStore {
        PostStore::new(dir.path().join("posts.json"))
    }

    #[test]
    fn test_comment_route_matching() {
        assert_eq!(comment_route("/board/abc/comments"), Some("abc"));
        assert_eq!(comment_route("/board//comments"), None);
        assert_eq!(comment_route("/board/a/b/comments"), None);
        assert_eq!(comment_route("/board/abc"), None);
        assert_eq!(comment_route("/posts"), None);
    }

    #[tokio::test]
    async fn test_preflight_returns_204_for_board_routes() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        for path in ["/posts", "/board/some-id/comments"] {
            let resp = dispatch(&Method::OPTIONS, path, &Bytes::new(), &store).await;
            assert_eq!(resp.status(), StatusCode::NO_CONTENT);
            assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_with_cors() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        let resp = dispatch(&Method::GET, "/nope", &Bytes::new(), &store).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");

        let resp = dispatch(&Method::DELETE, "/posts", &Bytes::new(), &store).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dispatch_full_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        let body = Bytes::from(r#"{"title": "Hi", "body": "World"}"#);
        let resp = dispatch(&Method::POST, "/posts", &body, &store).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = dispatch(&Method::GET, "/posts", &Bytes::new(), &store).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let post_id = store.read_all().await.unwrap()[0].id.clone();
        let body = Bytes::from(r#"{"content": "nice"}"#);
        let resp = dispatch(
            &Method::POST,
            &format!("/board/{post_id}/comments"),
            &body,
            &store,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
}
