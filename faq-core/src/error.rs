use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaqError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("invalid json in {origin}: {source}")]
    InvalidJson {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0} not loaded")]
    NotLoaded(&'static str),

    #[error("no record selected")]
    NoSelection,

    #[error("no image staged; stage an image file first")]
    NoStagedImage,

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("{0}")]
    BadRequest(String),
}

impl FaqError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        FaqError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        FaqError::InvalidJson {
            origin: origin.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FaqError>;
