// Post and comment data types plus legacy-shape normalization.
// The on-disk schema changed over time; readers must tolerate the
// older field names (`content` for a post body, `date` for `createdAt`).

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A top-level board entry with its comments embedded, newest first.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub comments: Vec<Comment>,
}

/// A text reply attached to exactly one post.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub created_at: String,
}

/// Generate an opaque unique identifier for a post or comment.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time as an ISO-8601 UTC string, millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// Fill in missing or legacy-named post fields so older data files
/// stay loadable. Missing ids get a fresh one; a missing `comments`
/// array becomes empty rather than failing the whole read.
pub fn normalize_post(raw: &Value) -> Post {
    Post {
        id: string_field(raw, "id").unwrap_or_else(new_id),
        title: string_field(raw, "title").unwrap_or_default(),
        body: string_field(raw, "body")
            .or_else(|| string_field(raw, "content"))
            .unwrap_or_default(),
        created_at: string_field(raw, "createdAt")
            .or_else(|| string_field(raw, "date"))
            .unwrap_or_else(now_timestamp),
        comments: raw
            .get("comments")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(normalize_comment).collect())
            .unwrap_or_default(),
    }
}

/// Comment counterpart of `normalize_post`. The legacy alias runs the
/// other way here: old comments stored their text under `body`.
pub fn normalize_comment(raw: &Value) -> Comment {
    Comment {
        id: string_field(raw, "id").unwrap_or_else(new_id),
        content: string_field(raw, "content")
            .or_else(|| string_field(raw, "body"))
            .unwrap_or_default(),
        created_at: string_field(raw, "createdAt")
            .or_else(|| string_field(raw, "date"))
            .unwrap_or_else(now_timestamp),
    }
}
