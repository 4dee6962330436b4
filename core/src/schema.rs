//! Command schemas and the builder used to define them.
//!
//! A [`CommandSchema`] is the immutable description of one command kind: its
//! options, positional arguments (in declaration order), and subcommands.
//! Schemas are shared read-only through [`Arc`] by every
//! [`Command`](crate::Command) instance built from them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::inherit::{inherit_schema, merge_named};
use crate::validate::validate_schema;
use crate::{ArgumentSchema, OptionSchema, Value};

/// Version of the schema definition contract (semver).
///
/// Embedded in every [`CommandSchema`] built through [`SchemaBuilder`] and in
/// every [`SchemaPackage`](crate::SchemaPackage).
pub const SCHEMA_CONTRACT_VERSION: &str = "1.0.0";

/// Complete schema for a command kind.
///
/// # Examples
///
/// ```
/// use command_mapper_core::*;
///
/// let schema = CommandSchema::builder("git")
///     .flag("--verbose")
///     .subcommand("clone", |clone| {
///         clone
///             .option_with_value("--depth", Value::new(Type::num()))
///             .argument(ArgumentSchema::new("repository"))
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.subcommand_names(), vec!["clone"]);
/// assert!(schema.find_option("verbose").is_some());
/// assert!(schema.find_subcommand("clone").unwrap().find_option("depth").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSchema {
    /// Schema contract version (populated from [`SCHEMA_CONTRACT_VERSION`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Command (or subcommand) name, emitted as the first token.
    pub name: String,
    /// Short description of the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Option flags.
    #[serde(default)]
    pub options: Vec<OptionSchema>,
    /// Positional arguments in emission order.
    #[serde(default)]
    pub arguments: Vec<ArgumentSchema>,
    /// Subcommand kinds.
    #[serde(default)]
    pub subcommands: Vec<Arc<CommandSchema>>,
}

impl CommandSchema {
    /// Creates an empty schema with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            schema_version: Some(SCHEMA_CONTRACT_VERSION.to_string()),
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Returns a [`SchemaBuilder`] for a command named `name`.
    pub fn builder(name: &str) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Finds an option by name.
    pub fn find_option(&self, name: &str) -> Option<&OptionSchema> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Finds an option by its literal flag.
    pub fn find_option_by_flag(&self, flag: &str) -> Option<&OptionSchema> {
        self.options.iter().find(|o| o.flag == flag)
    }

    /// Finds an argument by name.
    pub fn find_argument(&self, name: &str) -> Option<&ArgumentSchema> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Finds a subcommand by name.
    pub fn find_subcommand(&self, name: &str) -> Option<&Arc<CommandSchema>> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Option names in declaration order.
    pub fn option_names(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.name.as_str()).collect()
    }

    /// Argument names in declaration order.
    pub fn argument_names(&self) -> Vec<&str> {
        self.arguments.iter().map(|a| a.name.as_str()).collect()
    }

    /// Subcommand names in declaration order.
    pub fn subcommand_names(&self) -> Vec<&str> {
        self.subcommands.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Declarative builder for [`CommandSchema`].
///
/// Entries defined with an existing name replace the earlier entry in
/// place, so a command can override what it inherited. Definition problems
/// (bad flags, duplicates) are collected and reported by
/// [`build`](SchemaBuilder::build).
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    schema: CommandSchema,
    errors: Vec<DefinitionError>,
}

impl SchemaBuilder {
    /// Starts a schema named `name`.
    pub fn new(name: &str) -> Self {
        Self {
            schema: CommandSchema::new(name),
            errors: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn description(mut self, desc: &str) -> Self {
        self.schema.description = Some(desc.to_string());
        self
    }

    /// Copies `parent`'s options, arguments, and subcommands into this
    /// schema. Later definitions with the same names override them.
    pub fn inherit(mut self, parent: &CommandSchema) -> Self {
        self.schema = inherit_schema(parent, &self.schema);
        self
    }

    /// Adds an option.
    pub fn option(mut self, option: OptionSchema) -> Self {
        self.schema.options = merge_named(&self.schema.options, &[option], |o| &o.name);
        self
    }

    /// Adds an option, recording the error if it could not be constructed.
    pub fn try_option(self, option: Result<OptionSchema, DefinitionError>) -> Self {
        match option {
            Ok(option) => self.option(option),
            Err(err) => self.fail(err),
        }
    }

    /// Adds a value-less flag whose name is derived from `flag`.
    pub fn flag(self, flag: &str) -> Self {
        self.try_option(OptionSchema::flag(flag))
    }

    /// Adds an option taking `value` whose name is derived from `flag`.
    pub fn option_with_value(self, flag: &str, value: Value) -> Self {
        self.try_option(OptionSchema::with_value(flag, value))
    }

    /// Adds a positional argument.
    pub fn argument(mut self, argument: ArgumentSchema) -> Self {
        self.schema.arguments = merge_named(&self.schema.arguments, &[argument], |a| &a.name);
        self
    }

    /// Defines a subcommand with its own builder.
    pub fn subcommand<F>(self, name: &str, define: F) -> Self
    where
        F: FnOnce(SchemaBuilder) -> SchemaBuilder,
    {
        match define(SchemaBuilder::new(name)).build() {
            Ok(sub) => self.subcommand_schema(sub),
            Err(err) => self.fail(err),
        }
    }

    /// Adds an already-built subcommand schema.
    pub fn subcommand_schema(mut self, sub: impl Into<Arc<CommandSchema>>) -> Self {
        self.schema.subcommands =
            merge_named(&self.schema.subcommands, &[sub.into()], |s| &s.name);
        self
    }

    fn fail(mut self, err: DefinitionError) -> Self {
        self.errors.push(err);
        self
    }

    /// Finishes the schema.
    ///
    /// # Errors
    ///
    /// Returns the first definition error recorded while building, or the
    /// first problem found by [`validate_schema`].
    pub fn build(self) -> Result<CommandSchema, DefinitionError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }
        match validate_schema(&self.schema).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.schema),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Type;

    #[test]
    fn test_builder_records_flag_errors() {
        let err = CommandSchema::builder("ls").flag("-l").build().unwrap_err();
        assert_eq!(err, DefinitionError::CannotInferName("-l".to_string()));

        let schema = CommandSchema::builder("ls")
            .try_option(OptionSchema::named("-l", "long"))
            .build()
            .unwrap();
        assert_eq!(schema.find_option_by_flag("-l").unwrap().name, "long");
    }

    #[test]
    fn test_builder_redefinition_replaces() {
        let schema = CommandSchema::builder("cmd")
            .flag("--mode")
            .option_with_value("--mode", Value::new(Type::enumeration(["a", "b"])))
            .build()
            .unwrap();
        assert_eq!(schema.options.len(), 1);
        assert!(schema.options[0].accepts_value());
    }

    #[test]
    fn test_subcommand_errors_propagate() {
        let err = CommandSchema::builder("git")
            .subcommand("", |s| s)
            .build()
            .unwrap_err();
        assert_eq!(err, DefinitionError::EmptyCommandName);
    }

    #[test]
    fn test_inherit_then_override() {
        let base = CommandSchema::builder("base")
            .flag("--quiet")
            .argument(ArgumentSchema::new("target"))
            .build()
            .unwrap();
        let schema = CommandSchema::builder("derived")
            .inherit(&base)
            .argument(ArgumentSchema::new("target").optional())
            .build()
            .unwrap();
        assert_eq!(schema.option_names(), vec!["quiet"]);
        assert!(!schema.find_argument("target").unwrap().is_required());
    }

    #[test]
    fn test_schema_json_round_trip() {
        let schema = CommandSchema::builder("git")
            .flag("--verbose")
            .subcommand("init", |s| s.argument(ArgumentSchema::new("dir").optional()))
            .build()
            .unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        let back: CommandSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);
    }
}
