use async_trait::async_trait;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{NewPost, Post, PostSummary};
use crate::database::query::{Param, SelectQuery, SortDirection};

/// Storage seam for posts. Every operation is scoped to one author.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Posts owned by `author_id`, most recently updated first.
    async fn list_for_author(&self, author_id: Uuid) -> Result<Vec<PostSummary>, DatabaseError>;

    async fn create(&self, author_id: Uuid, input: NewPost) -> Result<Post, DatabaseError>;

    /// Returns `false` when no post with that id belongs to the author.
    async fn delete_for_author(&self, id: Uuid, author_id: Uuid) -> Result<bool, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

pub struct PgPostStore {
    pool: PgPool,
    slow_query_threshold: Duration,
}

impl PgPostStore {
    const TABLE: &'static str = "posts";

    pub fn new(pool: PgPool, slow_query_threshold: Duration) -> Self {
        Self { pool, slow_query_threshold }
    }

    fn observe(&self, operation: &str, started: Instant) {
        let elapsed = started.elapsed();
        if elapsed > self.slow_query_threshold {
            tracing::warn!("Slow query: {} took {}ms", operation, elapsed.as_millis());
        } else {
            tracing::debug!("{} took {}ms", operation, elapsed.as_millis());
        }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn list_for_author(&self, author_id: Uuid) -> Result<Vec<PostSummary>, DatabaseError> {
        let query = SelectQuery::new(Self::TABLE)?
            .select(&PostSummary::COLUMNS)?
            .where_eq("author_id", Param::Uuid(author_id))?
            .order_by("updated_at", SortDirection::Desc)?;

        let started = Instant::now();
        let rows = query.fetch_all::<PostSummary>(&self.pool).await?;
        self.observe("list_for_author", started);
        Ok(rows)
    }

    async fn create(&self, author_id: Uuid, input: NewPost) -> Result<Post, DatabaseError> {
        let started = Instant::now();
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content, author_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, published, author_id, created_at, updated_at
            "#,
        )
        .bind(input.title())
        .bind(input.content.clone())
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        self.observe("create_post", started);

        tracing::info!("Created post {} for author {}", post.id, author_id);
        Ok(post)
    }

    async fn delete_for_author(&self, id: Uuid, author_id: Uuid) -> Result<bool, DatabaseError> {
        let started = Instant::now();
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        self.observe("delete_post", started);

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
