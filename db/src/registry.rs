//! Schema registry loading with builder pattern and fallback chains.
//!
//! Provides [`SchemaRegistry`] for shared, by-name schema lookup and
//! [`RegistryBuilder`] for constructing a registry from multiple sources with
//! automatic fallback.
//!
//! # Loading patterns
//!
//! ```no_run
//! use command_mapper_db::SchemaRegistry;
//!
//! // Load from a directory of JSON/YAML definition files
//! let registry = SchemaRegistry::from_dir("schemas/").unwrap();
//! assert!(registry.get("git").is_some());
//!
//! // Load from a single SchemaPackage bundle
//! let registry = SchemaRegistry::from_bundle("schemas.json").unwrap();
//!
//! // Use the builder for a fallback chain
//! let registry = SchemaRegistry::builder()
//!     .from_dir("schemas/")
//!     .from_bundle("schemas.json")
//!     .build()
//!     .unwrap();
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use command_mapper_core::{
    CommandSchema, SchemaPackage, validate_package, validate_schema,
};
use tracing::{debug, info, warn};

use crate::config::MapperConfig;
use crate::error::{RegistryError, Result};

/// Serialization format of a definition file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    /// `*.json`
    Json,
    /// `*.yaml` or `*.yml`
    Yaml,
}

impl DefinitionFormat {
    /// Detects the format from a path's extension.
    ///
    /// ```
    /// use command_mapper_db::DefinitionFormat;
    ///
    /// assert_eq!(DefinitionFormat::from_path("git.yml"), Some(DefinitionFormat::Yaml));
    /// assert_eq!(DefinitionFormat::from_path("notes.txt"), None);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            Some("yaml" | "yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Describes where a [`SchemaRegistry`] was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrySource {
    /// Built in code, starting empty.
    Empty,
    /// Loaded from a directory of individual definition files.
    Directory(PathBuf),
    /// Loaded from a single [`SchemaPackage`] file.
    Bundle(PathBuf),
    /// Loaded from every source named by a [`MapperConfig`].
    Config(Vec<RegistrySource>),
    /// Loaded via a fallback chain of multiple sources.
    Multiple(Vec<RegistrySource>),
}

/// Validated command schemas, looked up by command name.
///
/// Schemas are handed out as [`Arc`]s so every
/// [`Command`](command_mapper_core::Command) built from the registry shares
/// the same immutable definition.
///
/// # Examples
///
/// ```
/// use command_mapper_core::{ArgumentSchema, Command, CommandSchema};
/// use command_mapper_db::SchemaRegistry;
///
/// let mut registry = SchemaRegistry::new();
/// registry.insert(
///     CommandSchema::builder("touch")
///         .argument(ArgumentSchema::new("files").repeats())
///         .build()
///         .unwrap(),
/// );
///
/// let mut touch = Command::new(registry.get("touch").unwrap());
/// touch.set_argument("files", vec!["a", "b"]).unwrap();
/// assert_eq!(touch.argv().unwrap(), vec!["touch", "a", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<CommandSchema>>,
    source: RegistrySource,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
            source: RegistrySource::Empty,
        }
    }

    /// Returns a new [`RegistryBuilder`] for configuring a fallback chain.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Loads every `*.json`, `*.yaml`, and `*.yml` file in a directory.
    ///
    /// Each file holds either a single [`CommandSchema`] or a
    /// [`SchemaPackage`]. Files with other extensions are skipped. When two
    /// files define the same command, the one whose path sorts last wins.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IoError`] if the directory or a file cannot
    /// be read, a parse error for malformed content, or
    /// [`RegistryError::InvalidSchema`] if any schema fails validation.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.is_file() && DefinitionFormat::from_path(&file_path).is_some() {
                files.push(file_path);
            }
        }
        files.sort();

        let mut registry = Self {
            schemas: HashMap::new(),
            source: RegistrySource::Directory(path.to_path_buf()),
        };
        for file in &files {
            for schema in read_definitions(file)? {
                registry.insert_checked(schema, file);
            }
        }

        info!(dir = %path.display(), schemas = registry.len(), "Loaded schema directory");
        Ok(registry)
    }

    /// Loads schemas from a single [`SchemaPackage`] file (JSON or YAML).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnsupportedFormat`] for an unknown
    /// extension, [`RegistryError::IoError`] if the file cannot be read, a
    /// parse error for malformed content, or [`RegistryError::InvalidSchema`]
    /// if the package fails validation.
    pub fn from_bundle(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let package: SchemaPackage = read_file(path)?;
        check_package(&package)?;

        let mut registry = Self {
            schemas: HashMap::new(),
            source: RegistrySource::Bundle(path.to_path_buf()),
        };
        for schema in package.schemas {
            registry.insert(schema);
        }

        info!(bundle = %path.display(), schemas = registry.len(), "Loaded schema bundle");
        Ok(registry)
    }

    /// Loads a directory with [`from_dir`](Self::from_dir), or a single
    /// definition file holding either a schema or a package.
    ///
    /// # Errors
    ///
    /// Same as [`from_dir`](Self::from_dir) and
    /// [`from_bundle`](Self::from_bundle).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            return Self::from_dir(path);
        }

        let mut registry = Self {
            schemas: HashMap::new(),
            source: RegistrySource::Bundle(path.to_path_buf()),
        };
        for schema in read_definitions(path)? {
            registry.insert_checked(schema, path);
        }
        Ok(registry)
    }

    /// Loads every schema directory and bundle named by `config`.
    ///
    /// Unlike the builder, all sources are merged: later sources replace
    /// same-named schemas from earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NoSourcesAvailable`] if the config names no
    /// sources, or the first error from any source.
    pub fn from_config(config: &MapperConfig) -> Result<Self> {
        if config.schema_dirs.is_empty() && config.bundles.is_empty() {
            return Err(RegistryError::NoSourcesAvailable);
        }

        let mut registry = Self::new();
        let mut sources = Vec::new();
        let loaded = config
            .schema_dirs
            .iter()
            .map(Self::from_dir)
            .chain(config.bundles.iter().map(Self::from_bundle));
        for part in loaded {
            let part = part?;
            sources.push(part.source.clone());
            registry.merge(part);
        }
        registry.source = RegistrySource::Config(sources);

        info!(schemas = registry.len(), "Loaded schemas from config");
        Ok(registry)
    }

    /// Adds every schema from `other`, replacing same-named entries.
    ///
    /// The source metadata of `self` is kept.
    pub fn merge(&mut self, other: SchemaRegistry) {
        self.schemas.extend(other.schemas);
    }

    /// Looks up a schema by command name.
    pub fn get(&self, command: &str) -> Option<Arc<CommandSchema>> {
        self.schemas.get(command).cloned()
    }

    /// Inserts a schema under its own name, returning the one it replaces.
    ///
    /// The schema is not validated; schemas built with
    /// [`SchemaBuilder`](command_mapper_core::SchemaBuilder) already are.
    pub fn insert(&mut self, schema: impl Into<Arc<CommandSchema>>) -> Option<Arc<CommandSchema>> {
        let schema = schema.into();
        self.schemas.insert(schema.name.clone(), schema)
    }

    /// Returns `true` if the registry contains a schema for `command`.
    pub fn contains(&self, command: &str) -> bool {
        self.schemas.contains_key(command)
    }

    /// Returns the number of schemas in the registry.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` if the registry contains no schemas.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Returns the command names in sorted order.
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &RegistrySource {
        &self.source
    }

    /// Collects every schema into a package, sorted by command name.
    pub fn to_package(&self, version: impl Into<String>) -> SchemaPackage {
        let mut package = SchemaPackage::new(version);
        package.schemas = self
            .commands()
            .into_iter()
            .filter_map(|name| self.schemas.get(name))
            .map(|schema| CommandSchema::clone(schema))
            .collect();
        package
    }

    fn insert_checked(&mut self, schema: CommandSchema, file: &Path) {
        if let Some(previous) = self.insert(schema) {
            warn!(
                command = %previous.name,
                file = %file.display(),
                "Schema redefined by later file"
            );
        }
    }
}

/// Builder for constructing a [`SchemaRegistry`] with a fallback chain.
///
/// Sources are tried in the order they are added. The first successful load
/// wins; if all fail, [`RegistryError::NoSourcesAvailable`] is returned.
///
/// # Example
///
/// ```no_run
/// use command_mapper_db::SchemaRegistry;
///
/// let registry = SchemaRegistry::builder()
///     .from_dir("/opt/schemas/")
///     .from_bundle("/opt/schemas.json")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    sources: Vec<RegistrySource>,
}

impl RegistryBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a directory of definition files as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(RegistrySource::Directory(path.into()));
        self
    }

    /// Adds a [`SchemaPackage`] bundle file as a source.
    pub fn from_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(RegistrySource::Bundle(path.into()));
        self
    }

    /// Attempts to load schemas from configured sources in order.
    ///
    /// Returns the first successfully loaded registry. If all sources fail,
    /// returns [`RegistryError::NoSourcesAvailable`].
    pub fn build(self) -> Result<SchemaRegistry> {
        if self.sources.is_empty() {
            return Err(RegistryError::NoSourcesAvailable);
        }

        let all_sources = self.sources.clone();

        for source in &self.sources {
            let result = match source {
                RegistrySource::Directory(path) => SchemaRegistry::from_dir(path),
                RegistrySource::Bundle(path) => SchemaRegistry::from_bundle(path),
                _ => continue,
            };

            match result {
                Ok(mut registry) => {
                    registry.source = RegistrySource::Multiple(all_sources);
                    return Ok(registry);
                }
                Err(err) => debug!(source = ?source, error = %err, "Schema source failed"),
            }
        }

        Err(RegistryError::NoSourcesAvailable)
    }
}

/// Reads the schemas in a definition file, validating each one.
///
/// A file whose top level carries a `schemas` key is read as a
/// [`SchemaPackage`]; anything else as a single [`CommandSchema`].
///
/// # Errors
///
/// Returns [`RegistryError::UnsupportedFormat`] for an unknown extension,
/// an I/O or parse error, or [`RegistryError::InvalidSchema`].
pub fn read_definitions(path: impl AsRef<Path>) -> Result<Vec<CommandSchema>> {
    let path = path.as_ref();
    let raw: serde_json::Value = read_file(path)?;

    if raw.get("schemas").is_some() {
        let package: SchemaPackage = serde_json::from_value(raw)?;
        check_package(&package)?;
        debug!(file = %path.display(), schemas = package.schemas.len(), "Read schema package");
        return Ok(package.schemas);
    }

    let schema: CommandSchema = serde_json::from_value(raw)?;
    check_schema(&schema)?;
    debug!(file = %path.display(), command = %schema.name, "Read schema");
    Ok(vec![schema])
}

fn read_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let format = DefinitionFormat::from_path(path)
        .ok_or_else(|| RegistryError::UnsupportedFormat(path.to_path_buf()))?;
    let reader = BufReader::new(File::open(path)?);
    let value = match format {
        DefinitionFormat::Json => serde_json::from_reader(reader)?,
        DefinitionFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    Ok(value)
}

fn check_schema(schema: &CommandSchema) -> Result<()> {
    match validate_schema(schema).into_iter().next() {
        Some(err) => Err(RegistryError::InvalidSchema {
            command: schema.name.clone(),
            reason: err.to_string(),
        }),
        None => Ok(()),
    }
}

fn check_package(package: &SchemaPackage) -> Result<()> {
    match validate_package(package).into_iter().next() {
        Some(err) => Err(RegistryError::InvalidSchema {
            command: package.name.clone().unwrap_or_else(|| "package".to_string()),
            reason: err.to_string(),
        }),
        None => Ok(()),
    }
}
