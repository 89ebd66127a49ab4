//! Process-lifetime boundary cache.
//!
//! [`BoundaryProvider`] owns the only copy of the prepared territory. The
//! first [`BoundaryProvider::get`] call resolves the dataset (local file,
//! on-disk cache, or download), parses and prepares it; later calls return
//! the same `Arc`. Concurrent first calls wait on the same load.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::download::{DownloadOptions, download_file};
use crate::load::read_boundary_file;
use crate::prepared::PreparedBoundary;
use crate::progress::{ProgressCallback, null_progress};
use crate::{BoundaryConfig, BoundaryError, archive};

/// Loads the territory once and hands out shared references to it.
pub struct BoundaryProvider {
    config: BoundaryConfig,
    progress: Arc<dyn ProgressCallback>,
    cached: Mutex<Option<Arc<PreparedBoundary>>>,
}

impl BoundaryProvider {
    /// Creates a provider. Nothing is loaded until [`Self::get`] is called.
    #[must_use]
    pub fn new(config: BoundaryConfig) -> Self {
        Self {
            config,
            progress: null_progress(),
            cached: Mutex::new(None),
        }
    }

    /// Creates a provider that already holds `boundary`.
    #[must_use]
    pub fn preloaded(config: BoundaryConfig, boundary: PreparedBoundary) -> Self {
        Self {
            config,
            progress: null_progress(),
            cached: Mutex::new(Some(Arc::new(boundary))),
        }
    }

    /// Reports download progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// The provider's configuration.
    #[must_use]
    pub const fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    /// Returns the prepared territory, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if the dataset cannot be downloaded,
    /// extracted, or parsed. Nothing is cached on failure, so a later call
    /// tries again.
    pub async fn get(&self) -> Result<Arc<PreparedBoundary>, BoundaryError> {
        let mut slot = self.cached.lock().await;
        if let Some(boundary) = slot.as_ref() {
            return Ok(Arc::clone(boundary));
        }

        let boundary = Arc::new(self.load().await?);
        *slot = Some(Arc::clone(&boundary));
        drop(slot);
        Ok(boundary)
    }

    /// Returns `true` if the territory is loaded in memory.
    pub async fn is_loaded(&self) -> bool {
        self.cached.lock().await.is_some()
    }

    /// Drops the in-memory territory. The next [`Self::get`] reloads it
    /// from disk.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
        log::debug!("Boundary cache invalidated");
    }

    /// Deletes the on-disk dataset and reloads it from the source.
    ///
    /// A configured local boundary file is never deleted; it is simply
    /// read again.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if the cache cannot be removed or the
    /// reload fails.
    pub async fn refresh(&self) -> Result<Arc<PreparedBoundary>, BoundaryError> {
        self.invalidate().await;

        if self.config.boundary_file().is_none() {
            let cache_dir = self.config.cache_dir();
            if tokio::fs::try_exists(&cache_dir).await.unwrap_or(false) {
                log::info!("Removing boundary cache {}", cache_dir.display());
                tokio::fs::remove_dir_all(&cache_dir)
                    .await
                    .map_err(|e| BoundaryError::io(&cache_dir, e))?;
            }
        }

        self.get().await
    }

    async fn load(&self) -> Result<PreparedBoundary, BoundaryError> {
        let path = match self.config.boundary_file() {
            Some(path) => path.to_path_buf(),
            None => self.ensure_dataset().await?,
        };

        log::info!("Loading boundary from {}", path.display());
        let boundary = tokio::task::spawn_blocking(move || {
            let territory = read_boundary_file(&path)?;
            PreparedBoundary::new(territory)
        })
        .await??;

        let bbox = boundary.bounding_box();
        log::info!(
            "Boundary ready: {} parts, lon {:.2}..{:.2}, lat {:.2}..{:.2}",
            boundary.part_count(),
            bbox.min_lon,
            bbox.max_lon,
            bbox.min_lat,
            bbox.max_lat,
        );

        Ok(boundary)
    }

    /// Makes sure the source shapefile exists in the cache, downloading and
    /// extracting the archive if needed.
    async fn ensure_dataset(&self) -> Result<PathBuf, BoundaryError> {
        let shapefile = self.config.shapefile_path();
        if tokio::fs::try_exists(&shapefile).await.unwrap_or(false) {
            log::debug!("Using cached boundary {}", shapefile.display());
            return Ok(shapefile);
        }

        let source = &self.config.source;
        log::info!("Boundary dataset not cached, fetching {}", source.name);

        let archive_path = self.config.archive_path();
        download_file(
            &source.url,
            &archive_path,
            DownloadOptions {
                timeout: source.timeout(),
                max_retries: source.max_retries,
            },
            self.progress.as_ref(),
        )
        .await?;

        let cache_dir = self.config.cache_dir();
        let extract_from = archive_path.clone();
        tokio::task::spawn_blocking(move || archive::extract_zip(&extract_from, &cache_dir))
            .await??;

        tokio::fs::remove_file(&archive_path)
            .await
            .map_err(|e| BoundaryError::io(&archive_path, e))?;

        if !tokio::fs::try_exists(&shapefile).await.unwrap_or(false) {
            return Err(BoundaryError::Io {
                path: shapefile.display().to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("archive did not contain {}", source.shapefile),
                ),
            });
        }

        Ok(shapefile)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use geo::{MultiPolygon, polygon};

    use super::*;
    use crate::BoundarySource;

    const SQUARE: &str = r#"{"type": "Polygon", "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]}"#;

    fn temp_config(name: &str) -> (PathBuf, BoundaryConfig) {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        let config = BoundaryConfig::new(BoundarySource::us_nation().unwrap(), tmp.join("data"));
        (tmp, config)
    }

    #[tokio::test]
    async fn loads_local_file_once() {
        let (tmp, config) = temp_config("residency_boundary_provider_once_test");
        let file = tmp.join("square.geojson");
        fs::write(&file, SQUARE).unwrap();

        let provider = BoundaryProvider::new(config.with_boundary_file(Some(file.clone())));
        assert_eq!(provider.config().boundary_file(), Some(file.as_path()));
        assert!(!provider.is_loaded().await);

        let first = provider.get().await.unwrap();
        assert!(first.contains(5.0, 5.0));
        assert!(!first.contains(15.0, 5.0));

        // The cached copy is served even after the file disappears.
        fs::remove_file(&file).unwrap();
        let second = provider.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let (tmp, config) = temp_config("residency_boundary_provider_invalidate_test");
        let file = tmp.join("square.geojson");
        fs::write(&file, SQUARE).unwrap();

        let provider = BoundaryProvider::new(config.with_boundary_file(Some(file.clone())));
        let first = provider.get().await.unwrap();

        provider.invalidate().await;
        assert!(!provider.is_loaded().await);

        let second = provider.get().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));

        fs::remove_file(&file).unwrap();
        provider.invalidate().await;
        assert!(provider.get().await.is_err());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn preloaded_provider_skips_loading() {
        let (tmp, config) = temp_config("residency_boundary_provider_preloaded_test");
        let boundary = PreparedBoundary::new(MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ]]))
        .unwrap();

        let provider = BoundaryProvider::preloaded(config, boundary);
        assert!(provider.is_loaded().await);
        assert_eq!(provider.get().await.unwrap().part_count(), 1);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn uses_cached_shapefile_without_network() {
        let (tmp, mut config) = temp_config("residency_boundary_provider_cached_test");
        config.source.url = "http://127.0.0.1:9/unreachable.zip".to_string();
        config.source.max_retries = 0;

        // A corrupt cached file proves the cache is read instead of the
        // (unreachable) network: the error is a parse error, not HTTP.
        fs::create_dir_all(config.cache_dir()).unwrap();
        fs::write(config.shapefile_path(), b"not a shapefile").unwrap();

        let provider = BoundaryProvider::new(config);
        assert!(matches!(
            provider.get().await,
            Err(BoundaryError::Shapefile(_))
        ));

        let _ = fs::remove_dir_all(&tmp);
    }
}
