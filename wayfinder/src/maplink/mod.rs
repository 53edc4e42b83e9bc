//! Shareable map links for the current location.
//!
//! Builds `https://<provider>/maps?q=<lat>,<lon>` style URLs from the most
//! recent fix. Coordinates go into the URL at full stored precision using
//! shortest round-trip float formatting, so `-74.0060` renders as
//! `-74.006` while display strings elsewhere keep their fixed 4 decimals.

use thiserror::Error;

use crate::location::{Coordinate, LocationStore};

/// Default map service the share link points at.
pub const DEFAULT_MAP_BASE_URL: &str = "https://www.google.com/maps";

/// Failure to produce a map link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapLinkError {
    /// No fix has been recorded yet. Frontends render this as a
    /// "location not yet available" notice rather than an error.
    #[error("location not yet available")]
    NotYetAvailable,

    /// The configured base URL is not usable.
    #[error("invalid map base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Validate a configured map base URL.
pub fn validate_base_url(url: &str) -> Result<(), MapLinkError> {
    if url.is_empty() {
        return Err(MapLinkError::InvalidBaseUrl("URL cannot be empty".to_string()));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(MapLinkError::InvalidBaseUrl(
            "URL must start with http:// or https://".to_string(),
        ));
    }

    if url.contains(' ') {
        return Err(MapLinkError::InvalidBaseUrl(
            "URL cannot contain spaces".to_string(),
        ));
    }

    Ok(())
}

/// Builds shareable map URLs from recorded fixes.
#[derive(Debug, Clone)]
pub struct MapLinkBuilder {
    base_url: String,
}

impl Default for MapLinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MapLinkBuilder {
    /// Create a builder pointing at the default map service.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_MAP_BASE_URL.to_string(),
        }
    }

    /// Create a builder with a custom base URL (no trailing slash).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for a specific fix.
    pub fn url_for(&self, fix: Coordinate) -> String {
        format!("{}?q={},{}", self.base_url, fix.latitude, fix.longitude)
    }

    /// Build the URL for the most recent fix in the store.
    pub fn url_from_store(&self, store: &LocationStore) -> Result<String, MapLinkError> {
        store
            .latest()
            .map(|fix| self.url_for(fix))
            .ok_or(MapLinkError::NotYetAvailable)
    }
}
