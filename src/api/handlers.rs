// Board API handlers: validate and normalize input, call the store,
// map outcomes to HTTP responses.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::response::{json_response, text_response};
use crate::store::{PostStore, StoreError};

/// Longest title derived from the body when none was supplied.
const DEFAULT_TITLE_CHARS: usize = 20;

/// Create-post request body. `content` is a legacy alias for `body`.
#[derive(Debug, Deserialize)]
struct NewPostPayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, alias = "content")]
    body: Option<String>,
}

/// Add-comment request body. `body` is a legacy alias for `content`.
#[derive(Debug, Deserialize)]
struct NewCommentPayload {
    #[serde(default, alias = "body")]
    content: Option<String>,
}

/// GET /posts
pub async fn list_posts(store: &PostStore) -> Response<Full<Bytes>> {
    match store.read_all().await {
        Ok(posts) => json_response(StatusCode::OK, &posts),
        Err(e) => text_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

/// POST /posts
pub async fn create_post(store: &PostStore, payload: &Bytes) -> Response<Full<Bytes>> {
    let parsed: NewPostPayload = match serde_json::from_slice(payload) {
        Ok(p) => p,
        Err(e) => {
            return text_response(
                StatusCode::BAD_REQUEST,
                &format!("잘못된 요청 본문입니다: {e}"),
            )
        }
    };

    let body = parsed.body.as_deref().map_or("", str::trim);
    if body.is_empty() {
        return text_response(StatusCode::BAD_REQUEST, "게시글 내용을 입력하세요.");
    }
    let title = match parsed.title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => default_title(body),
    };

    match store.append_post(&title, body).await {
        Ok(posts) => json_response(StatusCode::CREATED, &posts),
        Err(e) => text_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

/// POST /board/{id}/comments
pub async fn add_comment(
    store: &PostStore,
    post_id: &str,
    payload: &Bytes,
) -> Response<Full<Bytes>> {
    let parsed: NewCommentPayload = match serde_json::from_slice(payload) {
        Ok(p) => p,
        Err(e) => {
            return text_response(
                StatusCode::BAD_REQUEST,
                &format!("잘못된 요청 본문입니다: {e}"),
            )
        }
    };

    let content = parsed.content.as_deref().map_or("", str::trim);
    if content.is_empty() {
        return text_response(StatusCode::BAD_REQUEST, "댓글 내용을 입력하세요.");
    }

    match store.append_comment(post_id, content).await {
        Ok(comment) => {
            let mut body = match serde_json::to_value(&comment) {
                Ok(v) => v,
                Err(e) => {
                    return text_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
                }
            };
            // Older clients still read `date`; mirror createdAt for them.
            if let Value::Object(map) = &mut body {
                map.insert(
                    "date".to_string(),
                    Value::String(comment.created_at.clone()),
                );
            }
            json_response(StatusCode::CREATED, &body)
        }
        Err(StoreError::NotFound) => {
            text_response(StatusCode::NOT_FOUND, &StoreError::NotFound.to_string())
        }
        Err(e) => text_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

/// Derive a title from the body's leading characters.
fn default_title(body: &str) -> String {
    body.chars().take(DEFAULT_TITLE_CHARS).collect()
}
