use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::{encoding, normalize};
use crate::config::Settings;
use crate::error::{FaqError, Result};
use crate::model::faq::Dataset;
use crate::model::lang::Lang;
use crate::model::localized::Resolution;

const LANG_PLACEHOLDER: &str = "{lang}";

/// Where dataset files live: a local directory or an HTTP(S) base URL.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    base: String,
    file_pattern: String,
    timeout: Duration,
}

impl DatasetSource {
    pub fn new(base: impl Into<String>, file_pattern: impl Into<String>, timeout: Duration) -> Self {
        DatasetSource {
            base: base.into(),
            file_pattern: file_pattern.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.data.source.clone(),
            settings.data.file_pattern.clone(),
            settings.http_timeout(),
        )
    }

    /// One file per language, as opposed to a unified dataset.
    pub fn is_per_language(&self) -> bool {
        self.file_pattern.contains(LANG_PLACEHOLDER)
    }

    pub fn resolution(&self, lang: Lang) -> Resolution {
        if self.is_per_language() {
            Resolution::Strict
        } else {
            Resolution::Localized(lang)
        }
    }

    pub fn file_name(&self, lang: Lang) -> String {
        self.file_pattern.replace(LANG_PLACEHOLDER, lang.code())
    }

    fn is_remote(&self) -> bool {
        self.base.starts_with("http://") || self.base.starts_with("https://")
    }

    pub fn location(&self, lang: Lang) -> String {
        let file = self.file_name(lang);
        if self.is_remote() {
            format!("{}/{}", self.base.trim_end_matches('/'), file)
        } else {
            Path::new(&self.base).join(file).to_string_lossy().to_string()
        }
    }

    /// Default target of an authoring export: the dataset file itself for a
    /// local source, the bare file name in the working directory otherwise.
    pub fn export_path(&self, lang: Lang) -> PathBuf {
        if self.is_remote() {
            PathBuf::from(self.file_name(lang))
        } else {
            Path::new(&self.base).join(self.file_name(lang))
        }
    }

    /// Raw dataset document for `lang`, decoded and parsed but not normalized.
    pub fn fetch_document(&self, lang: Lang) -> Result<Value> {
        let location = self.location(lang);
        let bytes = if self.is_remote() {
            self.fetch_remote(&location)?
        } else {
            fs::read(&location).map_err(|e| FaqError::io(format!("failed to read {location}"), e))?
        };

        let decoded = encoding::decode(&bytes);
        tracing::debug!(%location, encoding = %decoded.encoding, bytes = bytes.len(), "dataset fetched");

        serde_json::from_str(&decoded.text).map_err(|e| FaqError::json(location, e))
    }

    pub fn load(&self, lang: Lang) -> Result<Dataset> {
        let doc = self.fetch_document(lang)?;
        let dataset = normalize::normalize_dataset(&doc, self.resolution(lang));
        tracing::info!(%lang, records = dataset.len(), "dataset loaded");
        Ok(dataset)
    }

    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_err = |source: reqwest::Error| FaqError::Fetch {
            url: url.to_string(),
            source,
        };

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(fetch_err)?;

        let resp = client.get(url).send().map_err(fetch_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FaqError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().map_err(fetch_err)?;
        Ok(bytes.to_vec())
    }
}
