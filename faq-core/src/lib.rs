//! Headless core of the FAQ browser and its authoring tool.
//!
//! Datasets are loaded and normalized into [`model::faq::Dataset`], browsed
//! through [`services::browser::BrowserState`] and edited through
//! [`services::authoring::AuthoringSession`]. The `faq-core` binary exposes
//! both over a line-delimited JSON protocol (see [`protocol`]).

pub mod config;
pub mod error;
pub mod model;
pub mod protocol;
pub mod services;

pub use error::{FaqError, Result};
