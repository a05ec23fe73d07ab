//! RON content loader

use crate::error::{Error, Result};
use crate::schema::ContentFile;
use astral_core::{CatalogBuilder, CatalogIndex, EngineConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Accumulates content files into a validated [`CatalogIndex`]
///
/// Entries keep the order they were loaded in. Duplicate ids are rejected as
/// soon as they are added; cross-references such as spell prerequisites are
/// checked by [`Loader::finish`], so they may span files.
#[derive(Debug, Default)]
pub struct Loader {
    builder: CatalogBuilder,
    files: usize,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Load content from a RON string
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        let file: ContentFile = ron::from_str(content)?;
        self.add_file(file)
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        self.load_str(&content)?;
        debug!(path = %path.display(), "Loaded content file");
        Ok(())
    }

    /// Load all RON files under a directory, recursively, in path order
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut entries: Vec<PathBuf> = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        entries.sort();

        for file_path in entries {
            if file_path.is_dir() {
                self.load_directory(&file_path)?;
            } else if file_path.extension().is_some_and(|e| e == "ron") {
                self.load_file(&file_path)?;
            }
        }

        Ok(())
    }

    /// Number of content files accepted so far
    pub fn files_loaded(&self) -> usize {
        self.files
    }

    /// Validate everything loaded and build the catalog
    pub fn finish(self) -> Result<CatalogIndex> {
        let catalog = self.builder.build()?;
        info!(files = self.files, "Catalog built");
        Ok(catalog)
    }

    fn add_file(&mut self, file: ContentFile) -> Result<()> {
        if file.is_empty() {
            debug!("Content file has no entries");
        }
        for def in file.buildings {
            self.builder.add_building(def)?;
        }
        for def in file.spells {
            self.builder.add_spell(def)?;
        }
        for def in file.enemies {
            self.builder.add_enemy(def)?;
        }
        for def in file.guilds {
            self.builder.add_guild(def)?;
        }
        self.files += 1;
        Ok(())
    }
}

/// Parse an [`EngineConfig`] from RON; omitted fields take their defaults
pub fn load_config_str(content: &str) -> Result<EngineConfig> {
    Ok(ron::from_str(content)?)
}

/// Read an [`EngineConfig`] from a RON file
pub fn load_config_file(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let content = fs::read_to_string(path)?;
    load_config_str(&content)
}
