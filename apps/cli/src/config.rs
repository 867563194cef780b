use std::{collections::HashMap, fs};

use client_core::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use tracing::warn;

pub const CONFIG_FILE: &str = "blog.toml";
/// Used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub storage_url: String,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "https://api.realworld.io/api/".into(),
            storage_url: "sqlite://./data/blog_client.db".into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(CONFIG_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// File values override defaults; environment overrides both.
pub fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_url").and_then(toml::Value::as_str) {
                    settings.api_url = v.to_string();
                }
                if let Some(v) = file_cfg.get("storage_url").and_then(toml::Value::as_str) {
                    settings.storage_url = v.to_string();
                }
                if let Some(v) = file_cfg
                    .get("page_size")
                    .and_then(toml::Value::as_integer)
                    .and_then(|v| u32::try_from(v).ok())
                {
                    settings.page_size = v;
                }
            }
            Err(err) => warn!("ignoring malformed {CONFIG_FILE}: {err}"),
        }
    }

    if let Some(v) = env("BLOG_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("BLOG_STORAGE_URL") {
        settings.storage_url = v;
    }
    if let Some(v) = env("APP__STORAGE_URL") {
        settings.storage_url = v;
    }

    if let Some(v) = env("APP__PAGE_SIZE") {
        match v.trim().parse::<u32>() {
            Ok(parsed) => settings.page_size = parsed,
            Err(_) => warn!(value = %v, "ignoring invalid APP__PAGE_SIZE"),
        }
    }

    if settings.page_size == 0 {
        settings.page_size = DEFAULT_PAGE_SIZE;
    }

    settings
}

pub fn prepare_storage_url(raw_storage_url: &str) -> String {
    let raw_storage_url = raw_storage_url.trim();

    if raw_storage_url.is_empty() {
        return Settings::default().storage_url;
    }

    if raw_storage_url.starts_with("sqlite:") || raw_storage_url.contains("://") {
        return raw_storage_url.to_string();
    }

    format!("sqlite://{}", raw_storage_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
