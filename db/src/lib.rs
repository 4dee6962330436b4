//! Loading command schemas from definition files, bundles, and config.
//!
//! This crate provides a [`SchemaRegistry`] that loads validated
//! [`CommandSchema`](command_mapper_core::CommandSchema) definitions from
//! JSON or YAML files, and a [`MapperConfig`] naming where they live.
//!
//! # Quick start
//!
//! ```no_run
//! use command_mapper_core::Command;
//! use command_mapper_db::{MapperConfig, SchemaRegistry};
//!
//! // Load schemas from a directory
//! let registry = SchemaRegistry::from_dir("schemas/").unwrap();
//! if let Some(schema) = registry.get("git") {
//!     println!("git has {} subcommands", schema.subcommands.len());
//! }
//!
//! // Use the builder for fallback chains
//! let registry = SchemaRegistry::builder()
//!     .from_dir("schemas/")
//!     .from_bundle("schemas.json")
//!     .build()
//!     .unwrap();
//!
//! // Or let a config file name the sources
//! let config = MapperConfig::load("command-mapper.yml").unwrap();
//! let registry = SchemaRegistry::from_config(&config).unwrap();
//! let git = Command::new(registry.get("git").unwrap());
//! ```

mod config;
mod error;
mod registry;

pub use config::MapperConfig;
pub use error::{RegistryError, Result};
pub use registry::{
    DefinitionFormat, RegistryBuilder, RegistrySource, SchemaRegistry, read_definitions,
};
