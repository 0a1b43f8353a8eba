//! Layered settings: built-in defaults, `faq.toml`, `faq.<RUST_ENV>.toml`,
//! then `FAQ_*` environment variables (`__` separates nested keys, e.g.
//! `FAQ_DATA__SOURCE`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::model::lang::Lang;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub data: DataSettings,
    pub storage: StorageSettings,
    pub browse: BrowseSettings,
    pub http: HttpSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Directory or `http(s)://` base URL holding the dataset files.
    pub source: String,
    /// `{lang}` is replaced by the language code. Without it the file is a
    /// unified multi-language dataset.
    pub file_pattern: String,
    pub default_lang: Lang,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseSettings {
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    pub level: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            source: "./assets".to_string(),
            file_pattern: "faqs.{lang}.json".to_string(),
            default_lang: Lang::Zh,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: "./.faq-storage".to_string(),
        }
    }
}

impl Default for BrowseSettings {
    fn default() -> Self {
        Self { debounce_ms: 200 }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::from_figment(Self::figment_for_env(&env_name))
    }

    pub fn figment_for_env(env_name: &str) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("faq.toml"))
            .merge(Toml::file(format!("faq.{env_name}.toml")))
            .merge(Env::prefixed("FAQ_").split("__"))
    }

    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let settings: Settings = figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.data.source.trim().is_empty() {
            return Err(anyhow::anyhow!("data.source must not be empty"));
        }
        if self.data.file_pattern.trim().is_empty() {
            return Err(anyhow::anyhow!("data.file_pattern must not be empty"));
        }
        if self.browse.debounce_ms == 0 {
            return Err(anyhow::anyhow!("browse.debounce_ms must be greater than 0"));
        }
        if self.http.timeout_secs == 0 {
            return Err(anyhow::anyhow!("http.timeout_secs must be greater than 0"));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.browse.debounce_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    pub fn storage_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.dir)
    }
}
