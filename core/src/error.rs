//! Error types for schema definition, argv assembly, and process hand-off.
//!
//! Errors fall into distinct classes:
//!
//! - [`DefinitionError`]: the schema or the assignment is malformed (unknown
//!   names, bad flags, duplicates). Raised at definition or construction time.
//! - [`CommandError`]: an assigned value was rejected while building argv, or a
//!   required positional argument is missing.
//! - [`FormatError`]: a value that never passed validation reached a
//!   formatter. This signals a caller bug, not bad user input.

use std::fmt;

use thiserror::Error;

use crate::Param;

/// Errors raised while defining a schema or assigning values by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// An option, argument, or subcommand has an empty name.
    #[error("{0} name cannot be empty")]
    EmptyName(String),
    /// Flag does not start with `-` or has nothing after the dashes.
    #[error("not an option flag: {0:?}")]
    InvalidFlag(String),
    /// A short flag is too short to derive an option name from.
    #[error("cannot infer a name from short option flag: {0:?}")]
    CannotInferName(String),
    /// An option sets both `equals` and `value_in_flag`.
    #[error("option {0} cannot use both equals and value_in_flag")]
    ConflictingFlagFormat(String),
    /// An option sets `equals` or `value_in_flag` but takes no value.
    #[error("option {0} has a value format but does not accept a value")]
    FormatWithoutValue(String),
    /// Two options share a name.
    #[error("duplicate option: {0}")]
    DuplicateOption(String),
    /// Two options share a flag.
    #[error("duplicate option flag: {0}")]
    DuplicateFlag(String),
    /// Two arguments share a name.
    #[error("duplicate argument: {0}")]
    DuplicateArgument(String),
    /// Two subcommands share a name.
    #[error("duplicate subcommand: {0}")]
    DuplicateSubcommand(String),
    /// The same name is used by more than one of option/argument/subcommand.
    #[error("name is defined more than once: {0}")]
    NameCollision(String),
    /// Assignment to an option the schema does not define.
    #[error("unknown option: {0}")]
    UnknownOption(String),
    /// Assignment to an argument the schema does not define.
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    /// Selection of a subcommand the schema does not define.
    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),
    /// A parameter name matches no option, argument, or subcommand.
    #[error("unknown option or argument: {0}")]
    UnknownParam(String),
    /// Subcommand parameters were not a mapping (or `true`).
    #[error("subcommand {0} expects a mapping of parameters")]
    InvalidSubcommandParams(String),
    /// A subcommand instance carries its own path override or environment.
    #[error("subcommand {0} cannot set its own path or environment")]
    NestedInvocationSettings(String),
    /// Package version string is empty.
    #[error("package version cannot be empty")]
    EmptyPackageVersion,
    /// Two schemas in the same package share a command name.
    #[error("duplicate command in package: {0}")]
    DuplicateCommand(String),
}

/// Which schema entry rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A flag option.
    Option,
    /// A positional argument.
    Argument,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Option => f.write_str("option"),
            ParamKind::Argument => f.write_str("argument"),
        }
    }
}

/// A formatter received a value outside its domain.
///
/// Formatting is only defined for values that validated successfully, so
/// these indicate a contract violation by the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Value is neither a key nor a mapped string of a map/enum type.
    #[error("value ({0}) is not present in the map")]
    UnmappedValue(Param),
    /// Value is not a single key/value pair.
    #[error("value ({0}) is not a key-value pair")]
    NotAPair(Param),
    /// Value cannot be converted to the type's representation.
    #[error("value ({value}) cannot be formatted as {expected}")]
    Incompatible {
        /// Representation the type produces.
        expected: &'static str,
        /// Offending value.
        value: Param,
    },
}

/// Errors raised while building argv for a command instance.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// An assigned value failed validation.
    #[error("{kind} {name} was given an invalid value ({value}): {reason}")]
    Validation {
        /// Whether an option or argument rejected the value.
        kind: ParamKind,
        /// Name of the rejecting option/argument.
        name: String,
        /// The rejected value.
        value: Param,
        /// Human-readable reason from the failing layer.
        reason: String,
    },
    /// A required positional argument has no value.
    #[error("argument {name} is required")]
    ArgumentRequired {
        /// Name of the missing argument.
        name: String,
    },
    /// A formatter was handed an out-of-domain value.
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl CommandError {
    pub(crate) fn invalid(kind: ParamKind, name: &str, value: &Param, reason: String) -> Self {
        CommandError::Validation {
            kind,
            name: name.to_string(),
            value: value.clone(),
            reason,
        }
    }
}

/// Errors raised when handing an invocation to the operating system.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The argv could not be built.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// Spawning or waiting on the process failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
