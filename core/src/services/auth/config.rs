//! Configuration for the authentication service

use sh_shared::config::AppSettings;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Base URL of the web client; reset links are `{app_base_url}ResetPassword?token=...`
    pub app_base_url: String,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self::from(&AppSettings::default())
    }
}

impl From<&AppSettings> for AuthServiceConfig {
    fn from(settings: &AppSettings) -> Self {
        Self {
            app_base_url: settings.base_url.clone(),
        }
    }
}
