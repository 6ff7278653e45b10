//! On-disk cache of allocated ids.
//!
//! The cache is a flat JSON object of identifier to numeric id. Only the
//! main context writes it; workers get an [`IdCacheReader`].

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use kiln_utils::Identifier;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Why the id cache could not be saved.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem failure.
    #[error("failed to write id cache: {0}")]
    Io(#[from] io::Error),
    /// The mapping could not be encoded.
    #[error("failed to encode id cache: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write handle to the id cache file.
#[derive(Debug)]
pub struct IdCache {
    path: Arc<Path>,
}

impl IdCache {
    /// Default file name inside the plugin data folder.
    pub const FILE_NAME: &'static str = "idcache";

    /// A cache stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::from(path.into()),
        }
    }

    /// Cache at the default location inside `data_folder`.
    pub fn in_folder(data_folder: impl AsRef<Path>) -> Self {
        Self::new(data_folder.as_ref().join(Self::FILE_NAME))
    }

    /// Location of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored mapping. Missing or unreadable caches load as empty.
    #[must_use]
    pub fn load(&self) -> FxHashMap<Identifier, i32> {
        load_from(&self.path)
    }

    /// Replaces the stored mapping with `mapping`.
    ///
    /// Writes a sibling temp file and renames it over the cache, so readers
    /// see either the old or the new mapping.
    pub fn save(&self, mapping: &FxHashMap<Identifier, i32>) -> Result<(), CacheError> {
        let sorted: BTreeMap<String, i32> = mapping
            .iter()
            .map(|(identifier, &id)| (identifier.to_string(), id))
            .collect();
        let json = serde_json::to_vec_pretty(&sorted)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        log::debug!("Saved {} ids to {}", sorted.len(), self.path.display());
        Ok(())
    }

    /// A read-only handle to the same file.
    #[must_use]
    pub fn reader(&self) -> IdCacheReader {
        IdCacheReader {
            path: Arc::clone(&self.path),
        }
    }
}

/// Read-only handle to the id cache, cheap to clone into workers.
#[derive(Debug, Clone)]
pub struct IdCacheReader {
    path: Arc<Path>,
}

impl IdCacheReader {
    /// Location of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored mapping. Missing or unreadable caches load as empty.
    #[must_use]
    pub fn load(&self) -> FxHashMap<Identifier, i32> {
        load_from(&self.path)
    }
}

fn load_from(path: &Path) -> FxHashMap<Identifier, i32> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::debug!("No id cache at {}, starting empty", path.display());
            return FxHashMap::default();
        }
        Err(err) => {
            log::warn!("Failed to read id cache {}: {err}", path.display());
            return FxHashMap::default();
        }
    };
    let raw: BTreeMap<String, i32> = match serde_json::from_slice(&bytes) {
        Ok(raw) => raw,
        Err(err) => {
            log::warn!("Id cache {} is corrupt, ignoring it: {err}", path.display());
            return FxHashMap::default();
        }
    };

    let mut mapping = FxHashMap::default();
    for (key, id) in raw {
        match key.parse::<Identifier>() {
            Ok(identifier) => {
                mapping.insert(identifier, id);
            }
            Err(err) => log::warn!("Skipping id cache entry `{key}`: {err}"),
        }
    }
    log::info!("Loaded {} cached ids from {}", mapping.len(), path.display());
    mapping
}
