//! In-process fakes and a request helper for router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, HeaderName, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use tower::ServiceExt;
use url::Url;
use uuid::Uuid;

use crate::auth::provider::{IdentityProvider, Provider, ProviderError, SignInRequest, SignInResponse};
use crate::auth::{encode_session, Claims};
use crate::config::AppConfig;
use crate::database::models::{NewPost, Post, PostSummary};
use crate::database::{DatabaseError, PostStore};
use crate::state::AppState;

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.auth.session_secret = "test-secret".to_string();
    config.server.site_url = "http://localhost:3000".to_string();
    config
}

/// Post store backed by a vector, with the same ownership and ordering rules
/// as the Postgres store.
#[derive(Clone, Default)]
pub struct MemoryPostStore {
    posts: Arc<Mutex<Vec<Post>>>,
}

impl MemoryPostStore {
    pub fn insert(&self, author_id: Uuid, title: &str, published: bool, updated_at: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.posts.lock().unwrap().push(Post {
            id,
            title: title.to_string(),
            content: None,
            published,
            author_id,
            created_at: updated_at,
            updated_at,
        });
        id
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn list_for_author(&self, author_id: Uuid) -> Result<Vec<PostSummary>, DatabaseError> {
        let posts = self.posts.lock().unwrap();
        let mut owned: Vec<&Post> = posts.iter().filter(|p| p.author_id == author_id).collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned.into_iter().map(PostSummary::from).collect())
    }

    async fn create(&self, author_id: Uuid, input: NewPost) -> Result<Post, DatabaseError> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: input.title().to_string(),
            content: input.content,
            published: false,
            author_id,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn delete_for_author(&self, id: Uuid, author_id: Uuid) -> Result<bool, DatabaseError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| !(p.id == id && p.author_id == author_id));
        Ok(posts.len() < before)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Store whose every call fails like a dropped connection.
pub struct FailingPostStore;

impl FailingPostStore {
    fn error() -> DatabaseError {
        DatabaseError::Sqlx(sqlx::Error::Protocol("connection reset".to_string()))
    }
}

#[async_trait]
impl PostStore for FailingPostStore {
    async fn list_for_author(&self, _author_id: Uuid) -> Result<Vec<PostSummary>, DatabaseError> {
        Err(Self::error())
    }

    async fn create(&self, _author_id: Uuid, _input: NewPost) -> Result<Post, DatabaseError> {
        Err(Self::error())
    }

    async fn delete_for_author(&self, _id: Uuid, _author_id: Uuid) -> Result<bool, DatabaseError> {
        Err(Self::error())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Err(Self::error())
    }
}

#[derive(Clone, Copy)]
enum ProviderBehaviour {
    Accept,
    Reject,
    Unreachable,
}

/// Identity provider that records every request it receives.
#[derive(Clone)]
pub struct RecordingProvider {
    behaviour: ProviderBehaviour,
    calls: Arc<Mutex<Vec<SignInRequest>>>,
}

impl RecordingProvider {
    fn new(behaviour: ProviderBehaviour) -> Self {
        Self { behaviour, calls: Arc::default() }
    }

    pub fn ok() -> Self {
        Self::new(ProviderBehaviour::Accept)
    }

    pub fn rejecting() -> Self {
        Self::new(ProviderBehaviour::Reject)
    }

    pub fn unreachable() -> Self {
        Self::new(ProviderBehaviour::Unreachable)
    }

    pub fn calls(&self) -> Vec<SignInRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for RecordingProvider {
    async fn sign_in(&self, request: SignInRequest) -> Result<SignInResponse, ProviderError> {
        self.calls.lock().unwrap().push(request);
        match self.behaviour {
            ProviderBehaviour::Accept => Ok(SignInResponse { ok: true, url: None, error: None }),
            ProviderBehaviour::Reject => Ok(SignInResponse {
                ok: false,
                url: None,
                error: Some("EmailSignin".to_string()),
            }),
            ProviderBehaviour::Unreachable => Err(ProviderError::InvalidUrl("connection refused".to_string())),
        }
    }

    fn authorize_url(&self, provider: Provider, callback_url: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!("https://auth.test/signin/{}", provider.as_str()))
            .map_err(|e| ProviderError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair("callbackUrl", callback_url);
        Ok(url)
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.header(header::LOCATION)
    }
}

/// Router wired to fakes, driven with `oneshot`.
pub struct TestContext {
    app: Router,
    config: AppConfig,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with(test_config(), MemoryPostStore::default(), RecordingProvider::ok())
    }

    pub fn with(config: AppConfig, posts: impl PostStore + 'static, provider: RecordingProvider) -> Self {
        let state = AppState::new(config.clone(), Arc::new(posts), Arc::new(provider))
            .expect("test config should be valid");
        Self {
            app: crate::app(state),
            config,
        }
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        let claims = Claims::new(user_id, format!("{}@example.com", user_id.simple()), None, 1);
        encode_session(&claims, &self.config.auth.session_secret).expect("token should encode")
    }

    pub async fn request(&self, method: Method, uri: &str, user: Option<Uuid>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(
                header::COOKIE,
                format!("{}={}", self.config.auth.session_cookie, self.token_for(user)),
            );
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn request_with_header(&self, method: Method, uri: &str, name: HeaderName, value: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(name, value)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn json(&self, method: Method, uri: &str, user: Uuid, body: &str) -> TestResponse {
        self.send_with_body(method, uri, user, "application/json", body).await
    }

    pub async fn send_with_body(
        &self,
        method: Method,
        uri: &str,
        user: Uuid,
        content_type: &str,
        body: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token_for(user)))
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
