use std::time::Duration;

use crate::client::DEFAULT_BASE_URL;
use crate::config_file::{self, ConfigFile};
use crate::{ApiError, Endpoints, HttpMaterialApi, RecordOrder};

pub const ENV_API_URL: &str = "LECTERN_API_URL";
pub const ENV_TIMEOUT: &str = "LECTERN_TIMEOUT";
pub const DEFAULT_THEME: &str = "hacker";

/// Resolved client settings.
///
/// Precedence is flags > environment > config file > defaults; front ends
/// apply their own flags on top of [`Settings::load`].
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub endpoints: Endpoints,
    pub timeout: Option<Duration>,
    pub order: RecordOrder,
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoints: Endpoints::default(),
            timeout: None,
            order: RecordOrder::default(),
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Endpoint paths are appended to the base URL, so they need a leading `/`.
fn absolute_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

impl Settings {
    /// Config files, then environment.
    pub fn load() -> Self {
        let mut settings = Self::from_file(&config_file::load_config());
        settings.apply_env();
        settings
    }

    pub fn from_file(file: &ConfigFile) -> Self {
        let mut settings = Self::default();
        if let Some(server) = &file.server {
            if let Some(url) = server.base_url.as_ref().filter(|u| !u.is_empty()) {
                settings.base_url = url.clone();
            }
            if let Some(path) = &server.upload_path {
                settings.endpoints.upload = absolute_path(path);
            }
            if let Some(path) = &server.list_path {
                settings.endpoints.list = absolute_path(path);
            }
            if let Some(path) = &server.delete_path {
                settings.endpoints.delete = absolute_path(path);
            }
            if let Some(secs) = server.timeout_secs {
                settings.timeout = timeout_from_secs(secs);
            }
        }
        if let Some(display) = &file.display {
            if let Some(theme) = display.theme.as_ref().filter(|t| !t.is_empty()) {
                settings.theme = theme.clone();
            }
            if let Some(order) = display.order {
                settings.order = order;
            }
        }
        settings
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides from an arbitrary lookup.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.is_empty()) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.timeout = timeout_from_secs(secs),
                Err(_) => {
                    tracing::warn!(value = %raw, "ignoring non-numeric {}", ENV_TIMEOUT);
                }
            }
        }
    }

    pub fn build_api(&self) -> Result<HttpMaterialApi, ApiError> {
        let mut builder =
            HttpMaterialApi::builder(self.base_url.clone()).endpoints(self.endpoints.clone());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}
