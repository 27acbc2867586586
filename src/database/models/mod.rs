pub mod post;
pub mod user;

pub use post::{Comment, CommentRemovalError, Post};
pub use user::{User, UserSummary};
