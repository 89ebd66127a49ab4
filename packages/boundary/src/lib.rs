#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! National territory boundary for presence classification.
//!
//! Downloads the Census Bureau national boundary shapefile on first use,
//! caches it on disk, unions its shapes into a single multipolygon, and
//! prepares it for repeated point-in-polygon queries. The prepared
//! boundary is held by a [`BoundaryProvider`] that loads it at most once
//! and can be invalidated or refreshed explicitly.

pub mod archive;
pub mod config;
pub mod download;
pub mod load;
pub mod prepared;
pub mod progress;
pub mod provider;

pub use config::{BoundaryConfig, BoundarySource};
pub use prepared::{BoundingBox, PreparedBoundary};
pub use provider::BoundaryProvider;

use thiserror::Error;

/// Errors that prevent the boundary from being obtained.
///
/// Any of these makes classification impossible for the current run.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("HTTP {status} for {url}")]
    HttpStatus {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// I/O error on the local cache.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The downloaded archive could not be read or extracted.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The shapefile could not be parsed.
    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// A `GeoJSON` boundary file could not be parsed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The boundary file has an extension we cannot read.
    #[error("Unsupported boundary file format: {path}")]
    UnsupportedFormat {
        /// Offending path.
        path: String,
    },

    /// The dataset was read but contained no polygons.
    #[error("Boundary dataset contains no polygons: {path}")]
    NoPolygons {
        /// Dataset path.
        path: String,
    },

    /// The boundary source configuration is invalid.
    #[error("Config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// A blocking load task panicked or was cancelled.
    #[error("Load task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl BoundaryError {
    /// Returns `true` if the error is likely transient and worth retrying.
    ///
    /// Client errors other than 429 are permanent.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_body() || e.is_request(),
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
