//! Typed schemas for external commands and argv assembly.
//!
//! Describe an external program once, then turn named parameter values into
//! a validated, correctly ordered argument vector:
//!
//! - [`Type`]: validators/formatters for values (strings, numbers, enums,
//!   maps, lists, key-value pairs, input paths).
//! - [`Value`]: a type plus required/empty/blank policy.
//! - [`OptionSchema`]: a flag, optionally taking a value, that may repeat
//!   and may attach its value with `=` or directly to the flag.
//! - [`ArgumentSchema`]: a positional slot, optionally repeating.
//! - [`CommandSchema`]: the immutable description of a command kind, built
//!   with [`SchemaBuilder`] or loaded from a definition file.
//! - [`Command`]: the values for one invocation; produces
//!   [`argv`](Command::argv) and
//!   [`to_invocation_string`](Command::to_invocation_string).
//!
//! Validation ([`validate_schema`], [`validate_package`]) catches malformed
//! definitions such as duplicate options and bad flags.
//!
//! # Example
//!
//! ```
//! use command_mapper_core::*;
//!
//! let schema = CommandSchema::builder("docker")
//!     .flag("--debug")
//!     .subcommand("run", |run| {
//!         run.flag("--rm")
//!             .try_option(
//!                 OptionSchema::with_value("--env", Value::new(Type::key_value()))
//!                     .map(OptionSchema::repeats),
//!             )
//!             .argument(ArgumentSchema::new("image"))
//!             .argument(ArgumentSchema::new("command").optional().repeats())
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut docker = Command::new(schema);
//! docker
//!     .select_subcommand("run", [
//!         ("rm", Param::from(true)),
//!         ("env", Param::map([("MODE", "test")])),
//!         ("image", Param::from("alpine")),
//!         ("command", Param::from(vec!["ls", "-l"])),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(
//!     docker.argv().unwrap(),
//!     vec!["docker", "run", "--rm", "--env", "MODE=test", "--", "alpine", "ls", "-l"]
//! );
//! ```

mod argument;
mod command;
mod error;
mod inherit;
mod option;
mod package;
mod param;
mod process;
mod schema;
pub mod shell;
mod types;
mod validate;
mod value;

pub use argument::ArgumentSchema;
pub use command::{Command, END_OF_OPTIONS};
pub use error::{CommandError, DefinitionError, FormatError, ParamKind, ProcessError};
pub use inherit::inherit_schema;
pub use option::{MAX_FLAG_REPEATS, OptionSchema, infer_name};
pub use package::SchemaPackage;
pub use param::Param;
pub use schema::{CommandSchema, SCHEMA_CONTRACT_VERSION, SchemaBuilder};
pub use types::*;
pub use validate::{validate_package, validate_schema};
pub use value::Value;
