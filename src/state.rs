use std::sync::Arc;
use url::Url;

use crate::auth::provider::IdentityProvider;
use crate::config::{AppConfig, ConfigError};
use crate::database::PostStore;

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub posts: Arc<dyn PostStore>,
    pub provider: Arc<dyn IdentityProvider>,
    pub site_url: Url,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        posts: Arc<dyn PostStore>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Result<Self, ConfigError> {
        let site_url = Url::parse(&config.server.site_url).map_err(|_| ConfigError::InvalidUrl {
            name: "SITE_URL",
            value: config.server.site_url.clone(),
        })?;

        Ok(Self {
            config: Arc::new(config),
            posts,
            provider,
            site_url,
        })
    }
}
