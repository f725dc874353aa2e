//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.
//!
//! Only the composition root should read this directly; pipeline components
//! receive explicit config structs built from it.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    /// Root directory under which per-submission working directories are created.
    pub grading_storage_root: String,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub npm_registry_url: String,
    pub max_concurrent_pipelines: usize,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// This method is used internally to populate the singleton. It panics
    /// if required variables are missing or improperly formatted.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "repo-grader".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "logs/grader.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "true".into()) == "true",
            grading_storage_root: env::var("GRADING_STORAGE_ROOT")
                .unwrap_or_else(|_| "data/grading".into()),
            llm_api_key: env::var("LLM_API_KEY").unwrap_or_default(),
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            npm_registry_url: env::var("NPM_REGISTRY_URL")
                .unwrap_or_else(|_| "https://registry.npmjs.org".into()),
            max_concurrent_pipelines: env::var("MAX_CONCURRENT_PIPELINES")
                .unwrap_or_else(|_| "4".into())
                .parse()
                .unwrap(),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().unwrap();
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    ///
    /// Used by public per-field setter methods.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    /// Override `grading_storage_root` value.
    pub fn set_grading_storage_root(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.grading_storage_root = value.into());
    }

    /// Override `llm_api_key` value.
    pub fn set_llm_api_key(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.llm_api_key = value.into());
    }

    /// Override `llm_base_url` value.
    pub fn set_llm_base_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.llm_base_url = value.into());
    }

    /// Override `llm_model` value.
    pub fn set_llm_model(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.llm_model = value.into());
    }

    /// Override `npm_registry_url` value.
    pub fn set_npm_registry_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.npm_registry_url = value.into());
    }

    /// Override `max_concurrent_pipelines` value.
    pub fn set_max_concurrent_pipelines(value: usize) {
        AppConfig::set_field(|cfg| cfg.max_concurrent_pipelines = value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn overrides_are_visible_through_global() {
        AppConfig::set_grading_storage_root("/tmp/grading-test");
        assert_eq!(AppConfig::global().grading_storage_root, "/tmp/grading-test");
        AppConfig::reset();
    }

    #[test]
    #[serial]
    fn defaults_apply_when_env_is_unset() {
        AppConfig::reset();
        let cfg = AppConfig::from_env();
        assert!(!cfg.npm_registry_url.is_empty());
        assert!(cfg.max_concurrent_pipelines >= 1);
    }
}
