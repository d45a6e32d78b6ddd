use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Redirect},
};
use serde_json::json;

use crate::state::AppState;

/// GET / - the dashboard is the home page.
pub async fn root() -> Redirect {
    Redirect::to("/dashboard")
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let version = env!("CARGO_PKG_VERSION");

    match state.posts.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "version": version,
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "version": version,
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::Value;

    use crate::testing::{self, FailingPostStore, RecordingProvider};

    #[tokio::test]
    async fn reports_ok_when_store_answers() {
        let ctx = testing::TestContext::new();
        let res = ctx.request(Method::GET, "/health", None).await;

        assert_eq!(res.status, StatusCode::OK);
        let body: Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn reports_degraded_when_store_fails() {
        let ctx = testing::TestContext::with(testing::test_config(), FailingPostStore, RecordingProvider::ok());
        let res = ctx.request(Method::GET, "/health", None).await;

        assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(body["data"]["status"], "degraded");
    }

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let ctx = testing::TestContext::new();
        let res = ctx.request(Method::GET, "/", None).await;

        assert_eq!(res.status, StatusCode::SEE_OTHER);
        assert_eq!(res.location(), Some("/dashboard"));
    }
}
