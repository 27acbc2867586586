pub mod comments;
pub mod likes;
pub mod posts;
pub mod root;

use crate::error::ApiError;

/// Reject blank `content`, returning it trimmed otherwise.
pub(crate) fn require_content(content: String) -> Result<String, ApiError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ApiError::field_error("content", "Content is required"));
    }
    Ok(trimmed.to_string())
}
