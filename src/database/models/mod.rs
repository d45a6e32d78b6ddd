pub mod post;

pub use post::{NewPost, Post, PostSummary, DEFAULT_POST_TITLE};
