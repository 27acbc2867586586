pub mod format;
pub mod json;

pub use format::{Authors, CommentView, PostView};
pub use json::ApiJson;
