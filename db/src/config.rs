//! Mapper configuration: where schemas live and the default environment.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! schema_dirs:
//!   - schemas/
//! bundles:
//!   - /opt/tools/schemas.json
//! env:
//!   LC_ALL: C
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

fn default_version() -> String {
    "1.0".to_string()
}

/// Top-level mapper configuration.
///
/// Loaded from a YAML file (typically `command-mapper.yml`). Relative paths
/// in `schema_dirs` and `bundles` are resolved against the directory that
/// holds the file.
///
/// # Examples
///
/// ```
/// use command_mapper_db::MapperConfig;
///
/// let config: MapperConfig = serde_yaml::from_str("schema_dirs: [defs]").unwrap();
/// assert_eq!(config.version, "1.0");
/// assert!(config.bundles.is_empty());
/// assert!(config.env.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Configuration format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Directories of definition files.
    #[serde(default)]
    pub schema_dirs: Vec<PathBuf>,
    /// Schema package files.
    #[serde(default)]
    pub bundles: Vec<PathBuf>,
    /// Environment variables applied to every built command.
    #[serde(default)]
    pub env: IndexMap<String, String>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            schema_dirs: Vec::new(),
            bundles: Vec::new(),
            env: IndexMap::new(),
        }
    }
}

impl MapperConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::RegistryError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::RegistryError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Self = serde_yaml::from_reader(reader)?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        debug!(
            config = %path.display(),
            dirs = config.schema_dirs.len(),
            bundles = config.bundles.len(),
            "Loaded mapper config"
        );
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::RegistryError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::RegistryError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Makes relative source paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in self.schema_dirs.iter_mut().chain(self.bundles.iter_mut()) {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Returns `true` if the config names at least one schema source.
    pub fn has_sources(&self) -> bool {
        !self.schema_dirs.is_empty() || !self.bundles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
schema_dirs:
  - defs
  - /abs/defs
bundles:
  - bundle.json
env:
  LC_ALL: C
  TZ: UTC
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: MapperConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.schema_dirs.len(), 2);
        assert_eq!(config.bundles, vec![PathBuf::from("bundle.json")]);
        let keys: Vec<&str> = config.env.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["LC_ALL", "TZ"]);
        assert!(config.has_sources());
    }

    #[test]
    fn test_deserialize_empty() {
        let config: MapperConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, MapperConfig::default());
        assert!(!config.has_sources());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("command-mapper.yml");
        std::fs::write(&path, sample_yaml()).unwrap();

        let config = MapperConfig::load(&path).unwrap();
        assert_eq!(config.schema_dirs[0], dir.path().join("defs"));
        assert_eq!(config.schema_dirs[1], PathBuf::from("/abs/defs"));
        assert_eq!(config.bundles[0], dir.path().join("bundle.json"));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");

        let mut original = MapperConfig::default();
        original.schema_dirs.push(dir.path().join("defs"));
        original.env.insert("LANG".into(), "C".into());
        original.save(&path).unwrap();

        let loaded = MapperConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }
}
