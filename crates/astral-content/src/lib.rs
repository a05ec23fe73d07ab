//! Astral Content - RON loader and the standard catalog
//!
//! Loads game content from RON files:
//! - Building, spell, enemy and guild tables
//! - Engine configuration overrides
//!
//! The standard content ships inside the crate:
//!
//! ```
//! let catalog = astral_content::standard_catalog().unwrap();
//! let fireball = catalog.spell(&"fireball".parse().unwrap()).unwrap();
//! assert_eq!(fireball.base_damage(), Some(65));
//! ```

mod error;
mod loader;
mod schema;

pub use error::{Error, Result};
pub use loader::{load_config_file, load_config_str, Loader};
pub use schema::ContentFile;

use astral_core::{CatalogIndex, EngineConfig};

/// The bundled catalog source
pub const STANDARD_CONTENT: &str = include_str!("../content/standard.ron");

/// The bundled configuration source
pub const DEFAULT_CONFIG: &str = include_str!("../content/config.ron");

/// Build the standard catalog
pub fn standard_catalog() -> Result<CatalogIndex> {
    let mut loader = Loader::new();
    loader.load_str(STANDARD_CONTENT)?;
    loader.finish()
}

/// Parse the bundled configuration
pub fn default_config() -> Result<EngineConfig> {
    load_config_str(DEFAULT_CONFIG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_matches_defaults() {
        assert_eq!(default_config().unwrap(), EngineConfig::default());
    }
}
