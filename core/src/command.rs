//! Command instances and argv assembly.
//!
//! A [`Command`] holds the values assigned for one invocation of a command
//! kind. Its [`argv`](Command::argv) turns them into the ordered token
//! vector:
//!
//! 1. the path override, or the schema name;
//! 2. the tokens of every assigned option, in assignment order;
//! 3. either the selected subcommand's name followed by its own tokens
//!    (built the same way, recursively), or the positional
//!    arguments in declaration order, preceded by `--` when any positional
//!    token starts with `-`.
//!
//! Building is all-or-nothing: any rejected value aborts with an error and
//! no tokens.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{CommandError, DefinitionError};
use crate::shell::invocation_string;
use crate::{CommandSchema, Param};

/// End-of-options marker inserted before dash-leading positional tokens.
pub const END_OF_OPTIONS: &str = "--";

/// Values assigned for one invocation of a command kind.
///
/// # Examples
///
/// ```
/// use command_mapper_core::*;
///
/// let schema = CommandSchema::builder("grep")
///     .flag("--count")
///     .option_with_value("--regexp", Value::string())
///     .argument(ArgumentSchema::new("files").repeats())
///     .build()
///     .unwrap();
///
/// let mut grep = Command::new(schema);
/// grep.set_option("count", true).unwrap();
/// grep.set_argument("files", vec!["a.txt", "-weird.txt"]).unwrap();
///
/// assert_eq!(
///     grep.argv().unwrap(),
///     vec!["grep", "--count", "--", "a.txt", "-weird.txt"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    schema: Arc<CommandSchema>,
    path: Option<String>,
    env: IndexMap<String, String>,
    options: IndexMap<String, Param>,
    arguments: IndexMap<String, Param>,
    subcommand: Option<Box<Command>>,
}

impl Command {
    /// Creates an instance with no values assigned.
    pub fn new(schema: impl Into<Arc<CommandSchema>>) -> Self {
        Self {
            schema: schema.into(),
            path: None,
            env: IndexMap::new(),
            options: IndexMap::new(),
            arguments: IndexMap::new(),
            subcommand: None,
        }
    }

    /// Creates an instance and assigns every `(name, value)` pair through
    /// [`set_param`](Command::set_param).
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] for the first unknown name.
    pub fn from_params<I, K, V>(
        schema: impl Into<Arc<CommandSchema>>,
        params: I,
    ) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Param>,
    {
        let mut command = Self::new(schema);
        for (name, value) in params {
            command.set_param(name.as_ref(), value)?;
        }
        Ok(command)
    }

    /// The command kind's schema.
    pub fn schema(&self) -> &Arc<CommandSchema> {
        &self.schema
    }

    /// The command name from the schema.
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// The path override, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The program token: the path override or the command name.
    pub fn program(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.schema.name)
    }

    /// Sets the path override.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.set_path(path);
        self
    }

    /// Sets the path override.
    pub fn set_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    /// Adds an environment variable.
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_env(name, value);
        self
    }

    /// Adds an environment variable.
    pub fn set_env(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.insert(name.into(), value.into());
        self
    }

    /// Environment variables in insertion order.
    pub fn env(&self) -> &IndexMap<String, String> {
        &self.env
    }

    /// Assigns an option value. Nil removes the assignment.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnknownOption`] if the schema defines no
    /// option named `name`.
    pub fn set_option(
        &mut self,
        name: &str,
        value: impl Into<Param>,
    ) -> Result<&mut Self, DefinitionError> {
        if self.schema.find_option(name).is_none() {
            return Err(DefinitionError::UnknownOption(name.to_string()));
        }
        assign(&mut self.options, name, value.into());
        Ok(self)
    }

    /// The value assigned to an option.
    pub fn option(&self, name: &str) -> Option<&Param> {
        self.options.get(name)
    }

    /// Assigns an argument value. Nil removes the assignment.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnknownArgument`] if the schema defines no
    /// argument named `name`.
    pub fn set_argument(
        &mut self,
        name: &str,
        value: impl Into<Param>,
    ) -> Result<&mut Self, DefinitionError> {
        if self.schema.find_argument(name).is_none() {
            return Err(DefinitionError::UnknownArgument(name.to_string()));
        }
        assign(&mut self.arguments, name, value.into());
        Ok(self)
    }

    /// The value assigned to an argument.
    pub fn argument(&self, name: &str) -> Option<&Param> {
        self.arguments.get(name)
    }

    /// Selects a subcommand instance.
    ///
    /// The program path and environment belong to the outermost command, so
    /// the instance may not set either.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnknownSubcommand`] if the schema defines
    /// no subcommand with the instance's name, or
    /// [`DefinitionError::NestedInvocationSettings`] if the instance has a
    /// path override or environment variables.
    pub fn set_subcommand(&mut self, subcommand: Command) -> Result<&mut Self, DefinitionError> {
        if self.schema.find_subcommand(subcommand.name()).is_none() {
            return Err(DefinitionError::UnknownSubcommand(
                subcommand.name().to_string(),
            ));
        }
        if subcommand.path.is_some() || !subcommand.env.is_empty() {
            return Err(DefinitionError::NestedInvocationSettings(
                subcommand.name().to_string(),
            ));
        }
        self.subcommand = Some(Box::new(subcommand));
        Ok(self)
    }

    /// Selects the subcommand `name` with the given parameters and returns
    /// it for further assignment.
    pub fn select_subcommand<I, K, V>(
        &mut self,
        name: &str,
        params: I,
    ) -> Result<&mut Command, DefinitionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Param>,
    {
        let schema = self
            .schema
            .find_subcommand(name)
            .cloned()
            .ok_or_else(|| DefinitionError::UnknownSubcommand(name.to_string()))?;
        let sub = Command::from_params(schema, params)?;
        Ok(&mut **self.subcommand.insert(Box::new(sub)))
    }

    /// Deselects the subcommand.
    pub fn clear_subcommand(&mut self) -> &mut Self {
        self.subcommand = None;
        self
    }

    /// The selected subcommand instance.
    pub fn subcommand(&self) -> Option<&Command> {
        self.subcommand.as_deref()
    }

    /// Assigns a value by name, resolving options first, then arguments,
    /// then subcommands.
    ///
    /// A subcommand takes a mapping of its own parameters, or `true` to
    /// select it without parameters; nil or `false` deselects it.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnknownParam`] if nothing in the schema is
    /// named `name`, or [`DefinitionError::InvalidSubcommandParams`] for a
    /// subcommand given a non-mapping value.
    pub fn set_param(
        &mut self,
        name: &str,
        value: impl Into<Param>,
    ) -> Result<&mut Self, DefinitionError> {
        let value = value.into();
        if self.schema.find_option(name).is_some() {
            return self.set_option(name, value);
        }
        if self.schema.find_argument(name).is_some() {
            return self.set_argument(name, value);
        }
        if self.schema.find_subcommand(name).is_some() {
            match value {
                Param::Nil | Param::Bool(false) => {
                    self.subcommand = None;
                }
                Param::Bool(true) => {
                    self.select_subcommand(name, Vec::<(String, Param)>::new())?;
                }
                Param::Map(entries) => {
                    let params = entries
                        .into_iter()
                        .map(|(k, v)| (param_key(&k), v))
                        .collect::<Vec<_>>();
                    self.select_subcommand(name, params)?;
                }
                _ => return Err(DefinitionError::InvalidSubcommandParams(name.to_string())),
            }
            return Ok(self);
        }
        Err(DefinitionError::UnknownParam(name.to_string()))
    }

    /// Builds the argument vector.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Validation`] for a rejected option or
    /// argument value, or [`CommandError::ArgumentRequired`] when a required
    /// positional argument has no value. No tokens are returned on error.
    pub fn argv(&self) -> Result<Vec<String>, CommandError> {
        let result = self.build_argv(self.program());
        match &result {
            Ok(argv) => debug!(command = %self.schema.name, tokens = argv.len(), "Assembled argv"),
            Err(err) => debug!(command = %self.schema.name, error = %err, "Rejected invocation"),
        }
        result
    }

    // `head` is the program token at the top level and the name below it.
    fn build_argv(&self, head: &str) -> Result<Vec<String>, CommandError> {
        let mut argv = vec![head.to_string()];

        for (name, value) in &self.options {
            // Assignment is checked against the schema, so the lookup holds.
            if let Some(option) = self.schema.find_option(name) {
                argv.extend(option.emit(value)?);
            }
        }

        if let Some(subcommand) = &self.subcommand {
            argv.extend(subcommand.build_argv(subcommand.name())?);
            return Ok(argv);
        }

        for argument in &self.schema.arguments {
            if argument.is_required() && argument.is_missing(self.arguments.get(&argument.name)) {
                return Err(CommandError::ArgumentRequired {
                    name: argument.name.clone(),
                });
            }
        }

        let mut positional = Vec::new();
        for argument in &self.schema.arguments {
            if let Some(value) = self.arguments.get(&argument.name) {
                positional.extend(argument.emit(value)?);
            }
        }

        if positional.iter().any(|token| token.starts_with('-')) {
            argv.push(END_OF_OPTIONS.to_string());
        }
        argv.extend(positional);

        Ok(argv)
    }

    /// Builds the shell-escaped invocation string, prefixed with the
    /// environment assignments when any are set.
    pub fn to_invocation_string(&self) -> Result<String, CommandError> {
        let argv = self.argv()?;
        Ok(invocation_string(&self.env, &argv))
    }
}

fn assign(values: &mut IndexMap<String, Param>, name: &str, value: Param) {
    if value.is_nil() {
        values.shift_remove(name);
    } else {
        values.insert(name.to_string(), value);
    }
}

fn param_key(key: &Param) -> String {
    match key {
        Param::Str(s) => s.clone(),
        other => other.to_plain_string(),
    }
}
