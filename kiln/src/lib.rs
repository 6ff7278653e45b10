//! Kiln plugin entry point.
//!
//! A server creates one [`Kiln`] when the plugin is enabled, lets other
//! plugins register their blocks and items through [`Kiln::types_mut`], and
//! calls [`Kiln::start_workers`] once registration is over.

pub mod config;
pub mod logger;

use std::path::{Path, PathBuf};

use kiln_core::{
    CustomTypes,
    id::IdCache,
    worker::{BootstrapError, WorkerPool},
};
use thiserror::Error;

use crate::config::{ConfigError, KilnConfig};

pub use kiln_core::{CreativeInventoryInfo, RegistrationError};

/// Errors from enabling the plugin or starting its workers.
#[derive(Debug, Error)]
pub enum KilnError {
    /// Loading the config failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Starting the workers failed.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}

/// The enabled plugin.
pub struct Kiln {
    data_folder: PathBuf,
    config: KilnConfig,
    types: CustomTypes,
    workers: Option<WorkerPool>,
}

impl Kiln {
    /// Loads the config from `data_folder` and opens the id cache.
    pub fn enable(data_folder: impl Into<PathBuf>) -> Result<Self, KilnError> {
        let data_folder = data_folder.into();
        let config = KilnConfig::load_or_create(&data_folder)?;
        Ok(Self::with_config(data_folder, config))
    }

    /// Like [`Kiln::enable`] with an already loaded config.
    #[must_use]
    pub fn with_config(data_folder: PathBuf, config: KilnConfig) -> Self {
        let cache = IdCache::new(config.cache_path(&data_folder));
        let types = CustomTypes::new(cache, config.id_bases());
        log::info!(
            "Kiln enabled with {} cached ids from {}",
            types.allocator().len(),
            data_folder.display()
        );
        Self {
            data_folder,
            config,
            types,
            workers: None,
        }
    }

    /// Starts the world workers. They replay every registration made so far.
    ///
    /// Later calls return the running pool; registrations made after the
    /// first call are not seen by the workers.
    pub fn start_workers(&mut self) -> Result<&WorkerPool, KilnError> {
        let pool = match self.workers.take() {
            Some(pool) => pool,
            None => WorkerPool::start(self.types.worker_bootstrap(), self.config.worker_threads)?,
        };
        Ok(self.workers.insert(pool))
    }

    /// The worker pool, once started.
    #[must_use]
    pub fn workers(&self) -> Option<&WorkerPool> {
        self.workers.as_ref()
    }

    /// The main-thread custom types.
    #[must_use]
    pub fn types(&self) -> &CustomTypes {
        &self.types
    }

    /// Registration entry point for other plugins.
    pub fn types_mut(&mut self) -> &mut CustomTypes {
        &mut self.types
    }

    /// The loaded config.
    #[must_use]
    pub fn config(&self) -> &KilnConfig {
        &self.config
    }

    /// Where config and id cache live.
    #[must_use]
    pub fn data_folder(&self) -> &Path {
        &self.data_folder
    }
}
