// Sign-in pages and the hand-off to the identity provider.
//
// GET  /login, /register           render the form
// POST /login, /register           email-link request
// GET  /login/:provider            federated redirect (github, google)
// GET  /auth/callback              provider hands back a session token
// POST /auth/signout               clear the session cookie

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::auth::callback::resolve_callback_url;
use crate::auth::decode_session;
use crate::auth::provider::{Provider, SignInRequest};
use crate::error::ApiError;
use crate::middleware::{clear_session_cookie, session_cookie};
use crate::state::AppState;
use crate::validation::{FieldErrors, UserAuthForm};
use crate::views::auth_form::{self, AuthAction, AuthFormState, AuthFormView, AuthMode};
use crate::views::Toast;

#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    pub from: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub token: String,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

pub async fn login_get(Query(query): Query<AuthQuery>) -> Html<String> {
    render_form_page(AuthMode::Login, query)
}

pub async fn register_get(Query(query): Query<AuthQuery>) -> Html<String> {
    render_form_page(AuthMode::Register, query)
}

pub async fn login_post(State(state): State<AppState>, Form(form): Form<UserAuthForm>) -> Response {
    submit_email(&state, AuthMode::Login, form).await
}

pub async fn register_post(State(state): State<AppState>, Form(form): Form<UserAuthForm>) -> Response {
    submit_email(&state, AuthMode::Register, form).await
}

fn render_form_page(mode: AuthMode, query: AuthQuery) -> Html<String> {
    let errors = FieldErrors::new();
    // The provider sends people back here with `?error=` when a flow fails.
    let toast = query.error.as_ref().map(|_| Toast::sign_in_failed());

    Html(auth_form::render(&AuthFormView {
        mode,
        state: AuthFormState::default(),
        email: "",
        from: query.from.as_deref(),
        errors: &errors,
        toast,
    }))
}

/// Validate, then hand the lower-cased address to the email provider.
///
/// Validation failures never reach the provider. Provider failures are shown
/// as a toast and not retried.
async fn submit_email(state: &AppState, mode: AuthMode, form: UserAuthForm) -> Response {
    let mut form_state = AuthFormState::default();

    let email = match form.validate() {
        Ok(email) => email,
        Err(errors) => {
            let html = auth_form::render(&AuthFormView {
                mode,
                state: form_state,
                email: &form.email,
                from: form.from.as_deref(),
                errors: &errors,
                toast: None,
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response();
        }
    };

    let callback_url = resolve_callback_url(
        &state.site_url,
        form.from.as_deref(),
        &state.config.auth.default_callback,
    );

    // Submitting is only visible client-side; the response reports the outcome.
    form_state.begin(AuthAction::Email);
    let ok = match state.provider.sign_in(SignInRequest::email(email.as_str(), callback_url)).await {
        Ok(response) => {
            if let Some(error) = &response.error {
                tracing::warn!("Email sign-in rejected by provider: {}", error);
            }
            response.ok
        }
        Err(e) => {
            tracing::warn!("Email sign-in request failed: {}", e);
            false
        }
    };
    form_state.finish(AuthAction::Email, ok);

    let toast = if ok { Toast::check_email() } else { Toast::sign_in_failed() };
    let errors = FieldErrors::new();
    let html = auth_form::render(&AuthFormView {
        mode,
        state: form_state,
        email: &form.email,
        from: form.from.as_deref(),
        errors: &errors,
        toast: Some(toast),
    });

    Html(html).into_response()
}

/// GET /login/:provider - send the browser to the provider.
pub async fn provider_redirect(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<AuthQuery>,
) -> Result<Redirect, ApiError> {
    let provider = provider
        .parse::<Provider>()
        .ok()
        .filter(Provider::is_federated)
        .ok_or_else(|| ApiError::not_found(format!("Unknown sign-in provider '{}'", provider)))?;

    let callback_url = resolve_callback_url(
        &state.site_url,
        query.from.as_deref(),
        &state.config.auth.default_callback,
    );
    let url = state.provider.authorize_url(provider, &callback_url)?;

    tracing::info!("Starting {} sign-in", provider);
    Ok(Redirect::to(url.as_str()))
}

/// GET /auth/callback - store the provider-issued session token.
pub async fn auth_callback(State(state): State<AppState>, Query(query): Query<CallbackQuery>) -> Response {
    let auth = &state.config.auth;

    match decode_session(&query.token, &auth.session_secret) {
        Ok(claims) => {
            tracing::info!("Session established for user {}", claims.sub);
            let target = resolve_callback_url(&state.site_url, query.callback_url.as_deref(), &auth.default_callback);
            (
                [(header::SET_COOKIE, session_cookie(auth, &query.token))],
                Redirect::to(&target),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!("Rejected session token from provider: {}", e);
            Redirect::to(&format!("{}?error=SessionRequired", auth.sign_in_path())).into_response()
        }
    }
}

/// POST /auth/signout
pub async fn signout(State(state): State<AppState>) -> Response {
    let auth = &state.config.auth;
    (
        [(header::SET_COOKIE, clear_session_cookie(auth))],
        Redirect::to(auth.sign_in_path()),
    )
        .into_response()
}
