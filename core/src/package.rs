use serde::{Deserialize, Serialize};

use crate::CommandSchema;

/// Serializable bundle of command schemas.
///
/// A package groups multiple [`CommandSchema`] values with version metadata
/// so a set of command definitions can ship as a single JSON or YAML file.
///
/// # Examples
///
/// ```
/// use command_mapper_core::*;
///
/// let mut package = SchemaPackage::new("1.0.0");
/// package.name = Some("build-tools".into());
/// package.schemas.push(CommandSchema::new("cargo"));
/// package.schemas.push(CommandSchema::new("make"));
///
/// assert_eq!(package.schema_count(), 2);
/// assert!(package.get("make").is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaPackage {
    /// Schema contract version (populated from
    /// [`SCHEMA_CONTRACT_VERSION`](crate::SCHEMA_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Package format version (semver string).
    pub version: String,
    /// Optional package name.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional package description.
    #[serde(default)]
    pub description: Option<String>,
    /// Command schemas included in this package.
    #[serde(default)]
    pub schemas: Vec<CommandSchema>,
}

impl SchemaPackage {
    /// Creates an empty package with the given version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            schema_version: Some(crate::SCHEMA_CONTRACT_VERSION.to_string()),
            version: version.into(),
            name: None,
            description: None,
            schemas: Vec::new(),
        }
    }

    /// Returns the number of schemas in this package.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Finds a schema by command name.
    pub fn get(&self, name: &str) -> Option<&CommandSchema> {
        self.schemas.iter().find(|s| s.name == name)
    }
}
