use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::database::models::{NewPost, Post, PostSummary};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/posts
pub async fn posts_get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<PostSummary>> {
    let posts = state.posts.list_for_author(user.id).await?;
    Ok(ApiResponse::success(posts))
}

/// POST /api/posts
///
/// Body is optional: `{ "title": "...", "content": {...} }`. An empty body
/// creates an "Untitled Post"; a body that is not a JSON `NewPost` is a 400.
pub async fn posts_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Post> {
    let input = parse_new_post(&headers, &body)?
        .normalize()
        .map_err(|errors| ApiError::validation_error("Invalid post", Some(errors)))?;

    let post = state.posts.create(user.id, input).await?;
    Ok(ApiResponse::created(post))
}

fn parse_new_post(headers: &HeaderMap, body: &[u8]) -> Result<NewPost, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NewPost::default());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().starts_with("application/json"));
    if !is_json {
        return Err(ApiError::validation_error(
            "Expected request with `Content-Type: application/json`",
            None,
        ));
    }

    Json::<NewPost>::from_bytes(body)
        .map(|Json(input)| input)
        .map_err(|rejection| ApiError::validation_error(rejection.body_text(), None))
}

/// DELETE /api/posts/:id
pub async fn post_delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.posts.delete_for_author(id, user.id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Post {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::Value;
    use uuid::Uuid;

    use crate::testing::{self, MemoryPostStore, RecordingProvider};

    #[tokio::test]
    async fn requires_session() {
        let ctx = testing::TestContext::new();
        let res = ctx.request(Method::GET, "/api/posts", None).await;

        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn lists_projection_in_update_order() {
        let user = Uuid::new_v4();
        let now = Utc::now();
        let store = MemoryPostStore::default();
        let first = store.insert(user, "First", false, now - Duration::minutes(5));
        let second = store.insert(user, "Second", true, now);
        store.insert(Uuid::new_v4(), "Elsewhere", false, now);
        let ctx = testing::TestContext::with(testing::test_config(), store, RecordingProvider::ok());

        let res = ctx.request(Method::GET, "/api/posts", Some(user)).await;
        assert_eq!(res.status, StatusCode::OK);

        let body: Value = serde_json::from_str(&res.body).unwrap();
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["id"], second.to_string());
        assert_eq!(data[1]["id"], first.to_string());
        assert!(data[0].get("author_id").is_none());
        assert!(data[0].get("updated_at").is_none());
    }

    #[tokio::test]
    async fn creates_with_title_and_rejects_short_titles() {
        let ctx = testing::TestContext::new();
        let user = Uuid::new_v4();

        let res = ctx.json(Method::POST, "/api/posts", user, r#"{"title":"Roadmap"}"#).await;
        assert_eq!(res.status, StatusCode::CREATED);
        let body: Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(body["data"]["title"], "Roadmap");
        assert_eq!(body["data"]["published"], false);
        assert_eq!(body["data"]["author_id"], user.to_string());

        let res = ctx.json(Method::POST, "/api/posts", user, r#"{"title":"ab"}"#).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&res.body).unwrap();
        assert!(body["field_errors"]["title"].is_string());
    }

    #[tokio::test]
    async fn malformed_or_mistyped_body_is_rejected() {
        let user = Uuid::new_v4();
        let ctx = testing::TestContext::new();

        for body in [r#"{"title": 42}"#, "not json", r#"{"title": "Roadmap""#, r#""just a string""#] {
            let res = ctx.json(Method::POST, "/api/posts", user, body).await;
            assert_eq!(res.status, StatusCode::BAD_REQUEST, "body {body:?}");
            let json: Value = serde_json::from_str(&res.body).unwrap();
            assert_eq!(json["code"], "VALIDATION_ERROR");
        }

        let res = ctx.request(Method::GET, "/api/posts", Some(user)).await;
        let json: Value = serde_json::from_str(&res.body).unwrap();
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_json_content_type_is_rejected() {
        let user = Uuid::new_v4();
        let ctx = testing::TestContext::new();
        let res = ctx
            .send_with_body(Method::POST, "/api/posts", user, "text/plain", r#"{"title":"Roadmap"}"#)
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_body_creates_untitled_post() {
        let ctx = testing::TestContext::new();
        let res = ctx.request(Method::POST, "/api/posts", Some(Uuid::new_v4())).await;

        assert_eq!(res.status, StatusCode::CREATED);
        let body: Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(body["data"]["title"], "Untitled Post");
    }

    #[tokio::test]
    async fn delete_is_scoped_to_owner() {
        let owner = Uuid::new_v4();
        let store = MemoryPostStore::default();
        let post = store.insert(owner, "Mine", false, Utc::now());
        let ctx = testing::TestContext::with(testing::test_config(), store, RecordingProvider::ok());
        let path = format!("/api/posts/{}", post);

        let res = ctx.request(Method::DELETE, &path, Some(Uuid::new_v4())).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);

        let res = ctx.request(Method::DELETE, &path, Some(owner)).await;
        assert_eq!(res.status, StatusCode::NO_CONTENT);

        let res = ctx.request(Method::DELETE, &path, Some(owner)).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }
}
