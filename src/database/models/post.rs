use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

pub const DEFAULT_POST_TITLE: &str = "Untitled Post";

const TITLE_MIN_CHARS: usize = 3;
const TITLE_MAX_CHARS: usize = 128;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: Option<serde_json::Value>,
    pub published: bool,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dashboard projection of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

impl PostSummary {
    pub const COLUMNS: [&'static str; 4] = ["id", "title", "published", "created_at"];
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            published: post.published,
            created_at: post.created_at,
        }
    }
}

/// Body of `POST /api/posts`. Both fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<serde_json::Value>,
}

impl NewPost {
    /// Trim the title, apply the default and check its length.
    pub fn normalize(self) -> Result<NewPost, HashMap<String, String>> {
        let title = match self.title.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_POST_TITLE.to_string(),
            Some(title) => {
                let len = title.chars().count();
                if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
                    let mut errors = HashMap::new();
                    errors.insert(
                        "title".to_string(),
                        format!(
                            "Title must be between {} and {} characters",
                            TITLE_MIN_CHARS, TITLE_MAX_CHARS
                        ),
                    );
                    return Err(errors);
                }
                title.to_string()
            }
        };

        Ok(NewPost {
            title: Some(title),
            content: self.content,
        })
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_POST_TITLE)
    }
}
