use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use cookie::time::Duration;
use cookie::{Cookie, CookieBuilder, SameSite};

use crate::auth::{decode_session, CurrentUser, SessionError};
use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Page guard: attach the current user or redirect to the sign-in route.
pub async fn session_guard(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match resolve_user(request.headers(), &state.config.auth) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!("Redirecting {} to sign-in: {}", request.uri().path(), e);
            Redirect::to(state.config.auth.sign_in_path()).into_response()
        }
    }
}

/// API guard: attach the current user or answer 401.
pub async fn api_session_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = resolve_user(request.headers(), &state.config.auth)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Resolve the session from the `Authorization: Bearer` header or the session cookie.
pub fn resolve_user(headers: &HeaderMap, config: &AuthConfig) -> Result<CurrentUser, SessionError> {
    let token = extract_session_token(headers, &config.session_cookie).ok_or(SessionError::Missing)?;
    let claims = decode_session(&token, &config.session_secret)?;
    Ok(CurrentUser::from(claims))
}

fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == cookie_name)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|t| !t.is_empty())
}

/// `Set-Cookie` value carrying a session token.
pub fn session_cookie(config: &AuthConfig, token: &str) -> String {
    let max_age = Duration::hours(config.session_max_age_hours as i64);
    base_cookie(config, token.to_string()).max_age(max_age).build().to_string()
}

/// `Set-Cookie` value that expires the session cookie immediately.
pub fn clear_session_cookie(config: &AuthConfig) -> String {
    base_cookie(config, String::new()).max_age(Duration::ZERO).build().to_string()
}

fn base_cookie(config: &AuthConfig, value: String) -> CookieBuilder<'static> {
    Cookie::build((config.session_cookie.clone(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
}
