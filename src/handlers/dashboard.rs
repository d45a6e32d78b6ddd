use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Extension,
};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::database::models::NewPost;
use crate::error::ApiError;
use crate::state::AppState;
use crate::views;

/// GET /dashboard - list the current user's posts.
///
/// Query errors are not caught here; they surface as the generic error response.
pub async fn dashboard_get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, ApiError> {
    let posts = state.posts.list_for_author(user.id).await?;
    tracing::debug!("Dashboard for {}: {} posts", user.id, posts.len());

    Ok(Html(views::dashboard::render(&user, &posts, None)))
}

/// POST /dashboard/posts - create an untitled post from the dashboard button.
pub async fn dashboard_create_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Redirect, ApiError> {
    let input = NewPost::default()
        .normalize()
        .map_err(|errors| ApiError::validation_error("Invalid post", Some(errors)))?;
    state.posts.create(user.id, input).await?;

    Ok(Redirect::to("/dashboard"))
}

/// POST /dashboard/posts/:id/delete
pub async fn dashboard_delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, ApiError> {
    if !state.posts.delete_for_author(id, user.id).await? {
        return Err(ApiError::not_found(format!("Post {} not found", id)));
    }

    Ok(Redirect::to("/dashboard"))
}
