//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants;
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub notifications: NotificationSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub page_size: u32,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub path: String,
    pub sidebar_collapsed_key: String,
    pub sidebar_expanded_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    pub capacity: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config: Self = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults only, no files or environment.
    pub fn defaults() -> Result<Self, AppError> {
        let config: Self = Self::builder()?.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(AppError::InvalidConfig(format!(
                "api.base_url must be an http(s) URL, got {:?}",
                self.api.base_url
            )));
        }
        if self.api.page_size == 0 || self.api.page_size > constants::MAX_PAGE_SIZE {
            return Err(AppError::InvalidConfig(format!(
                "api.page_size must be between 1 and {}",
                constants::MAX_PAGE_SIZE
            )));
        }
        if self.storage.sidebar_collapsed_key == self.storage.sidebar_expanded_key {
            return Err(AppError::InvalidConfig("sidebar storage keys must differ".into()));
        }
        Ok(())
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.name", "pos-console")?
            .set_default("api.base_url", "http://127.0.0.1:3000/api/v1")?
            .set_default("api.timeout_seconds", constants::DEFAULT_API_TIMEOUT_SECONDS)?
            .set_default("api.page_size", constants::DEFAULT_PAGE_SIZE as u64)?
            .set_default("storage.path", ".pos-preferences.json")?
            .set_default("storage.sidebar_collapsed_key", constants::SIDEBAR_COLLAPSED_KEY)?
            .set_default("storage.sidebar_expanded_key", constants::SIDEBAR_EXPANDED_KEY)?
            .set_default("notifications.capacity", constants::DEFAULT_NOTIFICATION_CAPACITY as u64)
    }
}
