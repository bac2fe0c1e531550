// src/error.rs
//! Typed errors for the two places callers need to match on a failure kind.

use thiserror::Error;

/// Startup configuration problems. Always fatal, raised before any network I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

impl ConfigError {
    pub fn invalid(var: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Invalid {
            var,
            message: message.to_string(),
        }
    }
}

/// Why a restaurant produced no record on an attempt.
/// Every variant is recovered by skipping the restaurant.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("page fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no menu image found on {url}")]
    NoImage { url: String },

    #[error("image download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("OCR failed: {0:#}")]
    Ocr(anyhow::Error),
}
