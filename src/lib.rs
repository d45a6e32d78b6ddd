pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod validation;
pub mod views;

#[cfg(test)]
pub mod testing;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .merge(auth_routes())
        // Session required
        .merge(dashboard_routes(&state))
        .merge(api_routes(&state));

    let router = if state.config.security.enable_cors {
        router.layer(cors_layer(&state.config.security))
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/login", get(auth::login_get).post(auth::login_post))
        .route("/register", get(auth::register_get).post(auth::register_post))
        .route("/login/:provider", get(auth::provider_redirect))
        .route("/auth/callback", get(auth::auth_callback))
        .route("/auth/signout", post(auth::signout))
}

fn dashboard_routes(state: &AppState) -> Router<AppState> {
    use handlers::dashboard;

    Router::new()
        .route("/dashboard", get(dashboard::dashboard_get))
        .route("/dashboard/posts", post(dashboard::dashboard_create_post))
        .route("/dashboard/posts/:id/delete", post(dashboard::dashboard_delete_post))
        .route_layer(from_fn_with_state(state.clone(), middleware::session_guard))
}

fn api_routes(state: &AppState) -> Router<AppState> {
    use handlers::posts;

    Router::new()
        .route("/api/posts", get(posts::posts_get).post(posts::posts_post))
        .route("/api/posts/:id", delete(posts::post_delete))
        .route_layer(from_fn_with_state(state.clone(), middleware::api_session_guard))
}

fn cors_layer(config: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
