//! Client side of the external identity provider.
//!
//! The provider owns the email-link and OAuth protocols. This module only
//! asks it to start a credential-issuing flow and reports whether the request
//! was accepted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::AuthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Email,
    GitHub,
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Email => "email",
            Provider::GitHub => "github",
            Provider::Google => "google",
        }
    }

    /// Providers that sign in by redirecting the browser.
    pub fn is_federated(&self) -> bool {
        !matches!(self, Provider::Email)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(Provider::Email),
            "github" => Ok(Provider::GitHub),
            "google" => Ok(Provider::Google),
            other => Err(ProviderError::UnknownProvider(other.to_string())),
        }
    }
}

/// Parameters for a credential-issuing request.
#[derive(Debug, Clone, PartialEq)]
pub struct SignInRequest {
    pub provider: Provider,
    pub email: Option<String>,
    pub redirect: bool,
    pub callback_url: String,
}

impl SignInRequest {
    /// Email-link request. The address is sent lower-cased and the provider
    /// is told not to redirect.
    pub fn email(email: &str, callback_url: impl Into<String>) -> Self {
        Self {
            provider: Provider::Email,
            email: Some(email.to_lowercase()),
            redirect: false,
            callback_url: callback_url.into(),
        }
    }
}

/// Outcome reported back to the form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SignInResponse {
    pub ok: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown identity provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),

    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Start a credential-issuing flow without navigating the browser.
    async fn sign_in(&self, request: SignInRequest) -> Result<SignInResponse, ProviderError>;

    /// URL the browser should be sent to for a federated sign-in.
    fn authorize_url(&self, provider: Provider, callback_url: &str) -> Result<Url, ProviderError>;
}

/// Identity provider reached over HTTP at `{base}/signin/{provider}`.
pub struct HttpIdentityProvider {
    base_url: Url,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ProviderReply {
    url: Option<String>,
}

impl HttpIdentityProvider {
    pub fn new(config: &AuthConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()?;
        Ok(Self {
            base_url: normalize_base(&config.provider_url)?,
            client,
        })
    }

    fn signin_url(&self, provider: Provider) -> Result<Url, ProviderError> {
        self.base_url
            .join(&format!("signin/{}", provider.as_str()))
            .map_err(|e| ProviderError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, request: SignInRequest) -> Result<SignInResponse, ProviderError> {
        let endpoint = self.signin_url(request.provider)?;

        let mut form: Vec<(&str, String)> = vec![
            ("callbackUrl", request.callback_url.clone()),
            ("redirect", request.redirect.to_string()),
            ("json", "true".to_string()),
        ];
        if let Some(email) = &request.email {
            form.push(("email", email.clone()));
        }

        tracing::debug!("Requesting {} sign-in from {}", request.provider, endpoint);

        let response = self.client.post(endpoint).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Identity provider rejected {} sign-in: {}", request.provider, status);
            return Ok(SignInResponse {
                ok: false,
                url: None,
                error: Some(status.to_string()),
            });
        }

        let reply: ProviderReply = response.json().await.unwrap_or(ProviderReply { url: None });
        let error = reply.url.as_deref().and_then(error_from_url);

        Ok(SignInResponse {
            ok: error.is_none(),
            url: reply.url,
            error,
        })
    }

    fn authorize_url(&self, provider: Provider, callback_url: &str) -> Result<Url, ProviderError> {
        let mut url = self.signin_url(provider)?;
        url.query_pairs_mut().append_pair("callbackUrl", callback_url);
        Ok(url)
    }
}

/// The base must end in `/` so that `join` appends instead of replacing.
fn normalize_base(raw: &str) -> Result<Url, ProviderError> {
    let with_slash = if raw.ends_with('/') { raw.to_string() } else { format!("{}/", raw) };
    Url::parse(&with_slash).map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Providers report failures by redirecting to a URL carrying `?error=`.
fn error_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "error")
        .map(|(_, value)| value.into_owned())
}
