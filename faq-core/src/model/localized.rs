use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lang::Lang;

/// A text field that is either a plain string or an object keyed by
/// language code (unified multi-language datasets).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    PerLanguage(BTreeMap<String, String>),
}

/// How a [`LocalizedText`] collapses into a single string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// One file per language: only plain strings are accepted.
    Strict,
    /// One unified file: per-language objects resolve the active language,
    /// then `zh`, then `en`.
    Localized(Lang),
}

impl LocalizedText {
    /// Reads a raw JSON value. Anything other than a string or an object is
    /// absent; non-string members of an object are skipped.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(LocalizedText::Plain(s.clone())),
            Value::Object(map) => Some(LocalizedText::PerLanguage(
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect(),
            )),
            _ => None,
        }
    }

    pub fn resolve(&self, resolution: Resolution) -> String {
        match (self, resolution) {
            (LocalizedText::Plain(s), _) => s.clone(),
            (LocalizedText::PerLanguage(_), Resolution::Strict) => String::new(),
            (LocalizedText::PerLanguage(map), Resolution::Localized(lang)) => {
                [lang.code(), Lang::Zh.code(), Lang::En.code()]
                    .iter()
                    .find_map(|code| map.get(*code))
                    .cloned()
                    .unwrap_or_default()
            }
        }
    }
}

impl From<&str> for LocalizedText {
    fn from(s: &str) -> Self {
        LocalizedText::Plain(s.to_string())
    }
}
