//! Boundary source definition and cache locations.
//!
//! The default source is embedded from `sources/us_nation.toml`. Runtime
//! settings can be overridden through environment variables:
//!
//! * `RESIDENCY_DATA_DIR` sets the cache root (default `data`).
//! * `RESIDENCY_BOUNDARY_URL` replaces the download URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::BoundaryError;

/// Environment variable overriding the cache root directory.
pub const DATA_DIR_ENV: &str = "RESIDENCY_DATA_DIR";

/// Environment variable overriding the boundary download URL.
pub const BOUNDARY_URL_ENV: &str = "RESIDENCY_BOUNDARY_URL";

const DEFAULT_DATA_DIR: &str = "data";

const US_NATION_TOML: &str = include_str!("../sources/us_nation.toml");

/// A downloadable boundary dataset, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoundarySource {
    /// Unique identifier, also used as the cache subdirectory name.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// URL of the zipped shapefile.
    pub url: String,
    /// Name of the `.shp` file inside the archive.
    pub shapefile: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries for transient download failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

const fn default_timeout_secs() -> u64 {
    120
}

const fn default_max_retries() -> u32 {
    3
}

impl BoundarySource {
    /// Returns the embedded U.S. national boundary source.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::Config`] if the embedded TOML is invalid.
    pub fn us_nation() -> Result<Self, BoundaryError> {
        Self::from_toml(US_NATION_TOML)
    }

    /// Parses a source definition from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::Config`] if the TOML does not match the
    /// source schema.
    pub fn from_toml(toml_str: &str) -> Result<Self, BoundaryError> {
        toml::from_str(toml_str).map_err(|e| BoundaryError::Config {
            message: format!("invalid boundary source: {e}"),
        })
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// File name of the downloaded archive, taken from the URL.
    #[must_use]
    pub fn archive_name(&self) -> String {
        self.url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .map_or_else(|| format!("{}.zip", self.id), str::to_string)
    }
}

/// Runtime configuration for a [`crate::BoundaryProvider`].
#[derive(Debug, Clone)]
pub struct BoundaryConfig {
    /// Dataset to download when no local file is given.
    pub source: BoundarySource,
    /// Root directory for cached datasets.
    pub data_dir: PathBuf,
    /// Local boundary file (`.shp`, `.geojson` or `.json`) used instead of
    /// the download.
    pub boundary_file: Option<PathBuf>,
}

impl BoundaryConfig {
    /// Builds a config for `source` rooted at `data_dir`.
    #[must_use]
    pub fn new(source: BoundarySource, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            data_dir: data_dir.into(),
            boundary_file: None,
        }
    }

    /// Builds the default config from the embedded U.S. source and the
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::Config`] if the embedded source is invalid.
    pub fn from_env() -> Result<Self, BoundaryError> {
        let mut source = BoundarySource::us_nation()?;
        if let Ok(url) = std::env::var(BOUNDARY_URL_ENV) {
            log::info!("Using boundary URL from {BOUNDARY_URL_ENV}: {url}");
            source.url = url;
        }
        let data_dir =
            std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        Ok(Self::new(source, data_dir))
    }

    /// Uses a local boundary file instead of downloading.
    #[must_use]
    pub fn with_boundary_file(mut self, path: Option<PathBuf>) -> Self {
        self.boundary_file = path;
        self
    }

    /// Overrides the cache root.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Directory holding the extracted dataset for this source.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("boundaries").join(&self.source.id)
    }

    /// Path of the extracted `.shp` file.
    #[must_use]
    pub fn shapefile_path(&self) -> PathBuf {
        self.cache_dir().join(&self.source.shapefile)
    }

    /// Path the archive is downloaded to before extraction.
    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        self.cache_dir().join(self.source.archive_name())
    }

    /// Returns the local boundary file, if one was configured.
    #[must_use]
    pub fn boundary_file(&self) -> Option<&Path> {
        self.boundary_file.as_deref()
    }
}
