// Storage error types. Display strings double as the plain-text HTTP
// error bodies, so the user-facing ones are localized.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Referenced post id does not exist in the collection.
    #[error("게시글을 찾을 수 없습니다.")]
    NotFound,

    /// Backing file held something that is not a JSON post array.
    /// Raised after the file has already been reset to `[]`.
    #[error("데이터 파일 파싱에 실패했습니다: {0}")]
    Corrupt(String),

    /// Generic filesystem failure.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
