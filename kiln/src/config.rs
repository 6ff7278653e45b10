//! Plugin configuration, read from `kiln_config.json5` in the data folder.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use kiln_core::id::IdBases;
use kiln_registry::vanilla;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("../package-content/kiln_config.json5");

/// Why the config could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("failed to access config file: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid JSON5 for [`KilnConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json5::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Plugin settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KilnConfig {
    /// Id cache file name, relative to the data folder.
    pub cache_file: String,
    /// First candidate id for custom blocks.
    pub first_custom_block_id: i32,
    /// First candidate id for custom items.
    pub first_custom_item_id: i32,
    /// Size of the world worker pool.
    pub worker_threads: usize,
    /// Logger settings.
    pub log: LogConfig,
}

/// Logger settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Prefix records with their module path.
    pub module_path: bool,
}

impl KilnConfig {
    /// Config file name inside the data folder.
    pub const FILE_NAME: &'static str = "kiln_config.json5";

    /// Reads the config from `data_folder`, writing the default one first if
    /// there is none.
    pub fn load_or_create(data_folder: &Path) -> Result<Self, ConfigError> {
        let path = data_folder.join(Self::FILE_NAME);
        let config_str = if path.exists() {
            fs::read_to_string(&path)?
        } else {
            fs::create_dir_all(data_folder)?;
            fs::write(&path, DEFAULT_CONFIG)?;
            DEFAULT_CONFIG.to_owned()
        };
        let config: KilnConfig = serde_json5::from_str(&config_str)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Checks value ranges. Custom ids must start above every vanilla id.
    pub fn validate(&self) -> Result<(), &'static str> {
        let ceiling = vanilla::max_vanilla_id();
        if self.first_custom_block_id <= ceiling {
            return Err("first_custom_block_id must be above every vanilla id");
        }
        if self.first_custom_item_id <= ceiling {
            return Err("first_custom_item_id must be above every vanilla id");
        }
        if self.worker_threads == 0 {
            return Err("worker_threads must be at least 1");
        }
        if self.cache_file.trim().is_empty() {
            return Err("cache_file must not be empty");
        }
        Ok(())
    }

    /// Allocator bases from the configured first ids.
    #[must_use]
    pub fn id_bases(&self) -> IdBases {
        IdBases {
            block: self.first_custom_block_id,
            item: self.first_custom_item_id,
        }
    }

    /// Full path of the id cache file.
    #[must_use]
    pub fn cache_path(&self, data_folder: &Path) -> PathBuf {
        data_folder.join(&self.cache_file)
    }
}

impl Default for KilnConfig {
    fn default() -> Self {
        Self {
            cache_file: "idcache".to_owned(),
            first_custom_block_id: IdBases::FIRST_CUSTOM_BLOCK_ID,
            first_custom_item_id: IdBases::FIRST_CUSTOM_ITEM_ID,
            worker_threads: 4,
            log: LogConfig {
                level: "info".to_owned(),
                module_path: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_default_matches_default_impl() {
        let parsed: KilnConfig = serde_json5::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, KilnConfig::default());
        parsed.validate().unwrap();
    }

    #[test]
    fn creates_default_file_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("kiln");
        let config = KilnConfig::load_or_create(&folder).unwrap();

        assert_eq!(config, KilnConfig::default());
        assert_eq!(
            fs::read_to_string(folder.join(KilnConfig::FILE_NAME)).unwrap(),
            DEFAULT_CONFIG
        );
        assert_eq!(config.cache_path(&folder), folder.join("idcache"));
    }

    #[test]
    fn reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(KilnConfig::FILE_NAME),
            r#"{
                cache_file: "ids.json",
                first_custom_block_id: 6000,
                first_custom_item_id: 20000,
                worker_threads: 2,
                log: { level: "debug", module_path: true },
            }"#,
        )
        .unwrap();
        let config = KilnConfig::load_or_create(dir.path()).unwrap();

        assert_eq!(config.id_bases(), IdBases { block: 6000, item: 20_000 });
        assert_eq!(config.worker_threads, 2);
        assert!(config.log.module_path);
    }

    #[test]
    fn rejects_ids_inside_the_vanilla_range() {
        let config = KilnConfig {
            first_custom_item_id: 1,
            ..KilnConfig::default()
        };
        assert!(config.validate().is_err());

        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(KilnConfig::FILE_NAME),
            r#"{ cache_file: "idcache", first_custom_block_id: 5000, first_custom_item_id: 10000,
                 worker_threads: 0, log: { level: "info", module_path: false } }"#,
        )
        .unwrap();
        assert!(matches!(
            KilnConfig::load_or_create(dir.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(KilnConfig::FILE_NAME), "{ cache_file: ").unwrap();
        assert!(matches!(
            KilnConfig::load_or_create(dir.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
