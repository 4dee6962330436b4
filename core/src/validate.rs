//! Schema and package validation.
//!
//! Checks the structural invariants of command schemas: non-empty names,
//! well-formed flags, no duplicate options/arguments/subcommands, no name
//! shared between an option, an argument, and a subcommand, and consistent
//! value-format settings. Schemas loaded from definition files go through
//! the same checks as schemas built in code.
//!
//! # Examples
//!
//! ```
//! use command_mapper_core::*;
//!
//! let schema = CommandSchema::builder("grep").flag("--count").build().unwrap();
//! assert!(validate_schema(&schema).is_empty());
//!
//! let mut bad = schema.clone();
//! bad.options.push(bad.options[0].clone());
//! assert_eq!(
//!     validate_schema(&bad),
//!     vec![DefinitionError::DuplicateOption("count".into())]
//! );
//! ```

use std::collections::HashSet;

use crate::error::DefinitionError;
use crate::option::check_flag;
use crate::{ArgumentSchema, CommandSchema, OptionSchema, SchemaPackage};

/// Validates a full schema package.
///
/// Checks for an empty version string, duplicate command names, and
/// validates each schema individually. Stops at the first problem.
pub fn validate_package(package: &SchemaPackage) -> Vec<DefinitionError> {
    let mut errors = Vec::new();

    if package.version.trim().is_empty() {
        errors.push(DefinitionError::EmptyPackageVersion);
        return errors;
    }

    let mut seen_commands: HashSet<&str> = HashSet::new();
    for schema in &package.schemas {
        let name = schema.name.as_str();
        if !seen_commands.insert(name) {
            errors.push(DefinitionError::DuplicateCommand(name.to_string()));
            return errors;
        }
        errors.extend(validate_schema(schema));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

/// Validates a command schema and all of its subcommands.
///
/// Stops at the first problem.
pub fn validate_schema(schema: &CommandSchema) -> Vec<DefinitionError> {
    let mut errors = Vec::new();

    if schema.name.trim().is_empty() {
        errors.push(DefinitionError::EmptyCommandName);
        return errors;
    }

    errors.extend(validate_options(&schema.options));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_arguments(&schema.arguments));
    if !errors.is_empty() {
        return errors;
    }

    let mut seen_subcommands: HashSet<&str> = HashSet::new();
    for sub in &schema.subcommands {
        if !seen_subcommands.insert(sub.name.as_str()) {
            errors.push(DefinitionError::DuplicateSubcommand(sub.name.clone()));
            return errors;
        }
    }

    let mut names: HashSet<&str> = HashSet::new();
    let all_names = schema
        .options
        .iter()
        .map(|o| o.name.as_str())
        .chain(schema.arguments.iter().map(|a| a.name.as_str()))
        .chain(schema.subcommands.iter().map(|s| s.name.as_str()));
    for name in all_names {
        if !names.insert(name) {
            errors.push(DefinitionError::NameCollision(name.to_string()));
            return errors;
        }
    }

    for sub in &schema.subcommands {
        errors.extend(validate_schema(sub));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_options(options: &[OptionSchema]) -> Vec<DefinitionError> {
    let mut errors = Vec::new();
    let mut seen_names = HashSet::new();
    let mut seen_flags = HashSet::new();

    for option in options {
        if let Err(err) = check_flag(&option.flag) {
            errors.push(err);
            return errors;
        }
        if option.name.trim().is_empty() {
            errors.push(DefinitionError::EmptyName("option".to_string()));
            return errors;
        }
        if !seen_names.insert(option.name.as_str()) {
            errors.push(DefinitionError::DuplicateOption(option.name.clone()));
            return errors;
        }
        if !seen_flags.insert(option.flag.as_str()) {
            errors.push(DefinitionError::DuplicateFlag(option.flag.clone()));
            return errors;
        }
        if option.equals && option.value_in_flag {
            errors.push(DefinitionError::ConflictingFlagFormat(option.name.clone()));
            return errors;
        }
        if (option.equals || option.value_in_flag) && !option.accepts_value() {
            errors.push(DefinitionError::FormatWithoutValue(option.name.clone()));
            return errors;
        }
    }

    errors
}

fn validate_arguments(arguments: &[ArgumentSchema]) -> Vec<DefinitionError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for argument in arguments {
        if argument.name.trim().is_empty() {
            errors.push(DefinitionError::EmptyName("argument".to_string()));
            return errors;
        }
        if !seen.insert(argument.name.as_str()) {
            errors.push(DefinitionError::DuplicateArgument(argument.name.clone()));
            return errors;
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::Value;

    #[test]
    fn test_validate_package_rejects_duplicate_commands() {
        let mut package = SchemaPackage::new("1.0.0");
        package.schemas.push(CommandSchema::new("git"));
        package.schemas.push(CommandSchema::new("git"));

        let errors = validate_package(&package);
        assert_eq!(
            errors,
            vec![DefinitionError::DuplicateCommand("git".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_conflicting_formats() {
        let mut schema = CommandSchema::new("cc");
        schema.options.push(
            OptionSchema::with_value("--std", Value::string())
                .unwrap()
                .equals()
                .value_in_flag(),
        );
        assert_eq!(
            validate_schema(&schema),
            vec![DefinitionError::ConflictingFlagFormat("std".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_format_without_value() {
        let mut schema = CommandSchema::new("cc");
        schema
            .options
            .push(OptionSchema::flag("--static").unwrap().equals());
        assert_eq!(
            validate_schema(&schema),
            vec![DefinitionError::FormatWithoutValue("static".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_name_collision() {
        let mut schema = CommandSchema::new("tool");
        schema.options.push(OptionSchema::flag("--target").unwrap());
        schema.arguments.push(ArgumentSchema::new("target"));
        assert_eq!(
            validate_schema(&schema),
            vec![DefinitionError::NameCollision("target".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_checks_nested_subcommands() {
        let mut remote = CommandSchema::new("remote");
        remote.arguments.push(ArgumentSchema::new(" "));
        let mut schema = CommandSchema::new("git");
        schema.subcommands.push(Arc::new(remote));
        assert_eq!(
            validate_schema(&schema),
            vec![DefinitionError::EmptyName("argument".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_duplicate_flags() {
        let mut schema = CommandSchema::new("tool");
        schema.options.push(OptionSchema::named("-x", "one").unwrap());
        schema.options.push(OptionSchema::named("-x", "two").unwrap());
        assert_eq!(
            validate_schema(&schema),
            vec![DefinitionError::DuplicateFlag("-x".to_string())]
        );
    }
}
