//! Global error handling module for the harvester
//!
//! This module provides a unified error type over every failure a crawl can
//! end with. Any of them aborts the run; records already written stay on
//! disk.

use thiserror::Error;

use crate::parser::{ExtractError, ListingError};
use crate::scraper::ScraperError;

/// Application-wide error type that unifies all error sources
#[derive(Debug, Error)]
pub enum AppError {
    /// Fetch failures (connection, timeout, non-success status)
    #[error("Scraping error: {0}")]
    Scraping(#[from] ScraperError),

    /// A required field is missing from a detail fragment
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// The listing page does not have the expected pager or card deck
    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    /// Writing the output file failed
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding a record failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AppError::Scraping(scraper_err) => match scraper_err {
                ScraperError::NetworkError(msg) => format!("Failed to connect to server: {}", msg),
                ScraperError::HttpError(status) => {
                    format!("Server returned error status: {}", status)
                }
                ScraperError::ResponseError(msg) => format!("Failed to read response: {}", msg),
            },

            AppError::Extraction(err) => format!(
                "The site's detail markup has changed and the harvester no longer understands it ({})",
                err
            ),

            AppError::Listing(err) => format!(
                "The listing page does not look as expected ({})",
                err
            ),

            AppError::Io(err) => format!("Could not write output: {}", err),
            AppError::Json(err) => format!("Could not encode record: {}", err),
            AppError::Config(msg) => msg.clone(),
        }
    }
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;
