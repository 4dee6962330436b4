//! Option flags and their emission rules.
//!
//! An [`OptionSchema`] describes one flag of the external program: the
//! literal flag token, whether it takes a value (and whether that value is
//! mandatory), whether it repeats, and how the value is attached to the flag
//! (separate token, `flag=value`, or `flagvalue`).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CommandError, DefinitionError, ParamKind};
use crate::{Param, Value};

/// Largest count a repeating flag-only option may be given.
pub const MAX_FLAG_REPEATS: i64 = 1024;

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]+").expect("valid regex"));

/// Schema for an option flag.
///
/// # Examples
///
/// ```
/// use command_mapper_core::{OptionSchema, Param, Type, Value};
///
/// let verbose = OptionSchema::flag("--verbose").unwrap().repeats();
/// assert_eq!(verbose.name, "verbose");
/// assert_eq!(verbose.emit(&Param::from(2)).unwrap(), vec!["--verbose", "--verbose"]);
///
/// let output = OptionSchema::with_value("--output-file", Value::string())
///     .unwrap()
///     .equals();
/// assert_eq!(output.name, "output_file");
/// assert_eq!(output.emit(&Param::from("out.txt")).unwrap(), vec!["--output-file=out.txt"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOption")]
pub struct OptionSchema {
    /// Literal flag token (e.g. `--foo`, `-F`).
    pub flag: String,
    /// Name used to assign values.
    pub name: String,
    /// Value spec when the option takes a value; `required` states whether
    /// the value is mandatory once the option is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Option may be given multiple times.
    #[serde(default)]
    pub repeats: bool,
    /// Join flag and value with `=`.
    #[serde(default)]
    pub equals: bool,
    /// Append the value directly to the flag.
    #[serde(default)]
    pub value_in_flag: bool,
    /// Description for listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Deserialize)]
struct RawOption {
    flag: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    repeats: bool,
    #[serde(default)]
    equals: bool,
    #[serde(default)]
    value_in_flag: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<RawOption> for OptionSchema {
    type Error = DefinitionError;

    fn try_from(raw: RawOption) -> Result<Self, Self::Error> {
        let name = match raw.name {
            Some(name) => {
                check_flag(&raw.flag)?;
                name
            }
            None => infer_name(&raw.flag)?,
        };
        Ok(Self {
            flag: raw.flag,
            name,
            value: raw.value,
            repeats: raw.repeats,
            equals: raw.equals,
            value_in_flag: raw.value_in_flag,
            description: raw.description,
        })
    }
}

/// Derives an option name from its flag.
///
/// Strips leading dashes, lowercases, and collapses runs of `-`/`_` into a
/// single `_`. Short flags need at least two characters after the dash.
///
/// # Examples
///
/// ```
/// use command_mapper_core::{DefinitionError, infer_name};
///
/// assert_eq!(infer_name("--Dry--Run").unwrap(), "dry_run");
/// assert_eq!(infer_name("-Wall").unwrap(), "wall");
/// assert_eq!(
///     infer_name("-v"),
///     Err(DefinitionError::CannotInferName("-v".into()))
/// );
/// ```
pub fn infer_name(flag: &str) -> Result<String, DefinitionError> {
    let stripped = if let Some(rest) = flag.strip_prefix("--") {
        rest
    } else if let Some(rest) = flag.strip_prefix('-') {
        if rest.chars().count() < 2 {
            return Err(DefinitionError::CannotInferName(flag.to_string()));
        }
        rest
    } else {
        return Err(DefinitionError::InvalidFlag(flag.to_string()));
    };

    let name = SEPARATOR_RUN
        .replace_all(&stripped.to_lowercase(), "_")
        .into_owned();
    if name.trim_matches('_').is_empty() {
        return Err(DefinitionError::InvalidFlag(flag.to_string()));
    }
    Ok(name)
}

/// Checks that `flag` starts with a dash and names something.
pub(crate) fn check_flag(flag: &str) -> Result<(), DefinitionError> {
    let body = flag.trim_start_matches('-');
    if !flag.starts_with('-') || body.is_empty() || flag.len() - body.len() > 2 {
        return Err(DefinitionError::InvalidFlag(flag.to_string()));
    }
    Ok(())
}

impl OptionSchema {
    /// Creates a flag that takes no value, deriving its name.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidFlag`] or
    /// [`DefinitionError::CannotInferName`] when no name can be derived.
    pub fn flag(flag: impl Into<String>) -> Result<Self, DefinitionError> {
        let flag = flag.into();
        let name = infer_name(&flag)?;
        Ok(Self::build(flag, name, None))
    }

    /// Creates an option that takes `value`, deriving its name.
    pub fn with_value(flag: impl Into<String>, value: Value) -> Result<Self, DefinitionError> {
        let flag = flag.into();
        let name = infer_name(&flag)?;
        Ok(Self::build(flag, name, Some(value)))
    }

    /// Creates a flag with an explicit name (allows single-letter flags).
    pub fn named(
        flag: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, DefinitionError> {
        let flag = flag.into();
        check_flag(&flag)?;
        Ok(Self::build(flag, name.into(), None))
    }

    fn build(flag: String, name: String, value: Option<Value>) -> Self {
        Self {
            flag,
            name,
            value,
            repeats: false,
            equals: false,
            value_in_flag: false,
            description: None,
        }
    }

    /// Sets the value spec.
    pub fn taking(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Allows the option to be given multiple times.
    pub fn repeats(mut self) -> Self {
        self.repeats = true;
        self
    }

    /// Joins flag and value with `=`.
    pub fn equals(mut self) -> Self {
        self.equals = true;
        self
    }

    /// Appends the value directly to the flag.
    pub fn value_in_flag(mut self) -> Self {
        self.value_in_flag = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Returns `true` if the option takes a value.
    pub fn accepts_value(&self) -> bool {
        self.value.is_some()
    }

    /// Validates a value assigned to this option.
    ///
    /// Nil means "not given" and is always accepted.
    pub fn validate(&self, param: &Param) -> Result<(), String> {
        match &self.value {
            None => self.validate_flag(param),
            Some(value) => self.validate_value(value, param),
        }
    }

    fn validate_flag(&self, param: &Param) -> Result<(), String> {
        match param {
            Param::Nil | Param::Bool(_) => Ok(()),
            Param::Int(n) if self.repeats => {
                if *n < 0 {
                    Err("cannot repeat a negative number of times".to_string())
                } else if *n > MAX_FLAG_REPEATS {
                    Err(format!(
                        "repeat count too large ({n}), at most {MAX_FLAG_REPEATS}"
                    ))
                } else {
                    Ok(())
                }
            }
            Param::Int(_) => Err("only repeating options may accept integers".to_string()),
            _ => Err("only accepts true, false, or nil".to_string()),
        }
    }

    fn validate_value(&self, value: &Value, param: &Param) -> Result<(), String> {
        if param.is_nil() {
            return Ok(());
        }
        if !self.repeats {
            return validate_one(value, param);
        }

        let elements = param.elements();
        if value.required && elements.is_empty() {
            return Err("requires at least one value".to_string());
        }
        elements
            .iter()
            .try_for_each(|element| validate_one(value, element))
    }

    /// Validates `param` and returns the tokens it produces.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Validation`] when the value is rejected or a
    /// separately emitted value would start with `-`.
    pub fn emit(&self, param: &Param) -> Result<Vec<String>, CommandError> {
        self.validate(param)
            .map_err(|reason| CommandError::invalid(ParamKind::Option, &self.name, param, reason))?;

        let mut argv = Vec::new();
        match &self.value {
            None => self.emit_flag_only(param, &mut argv),
            Some(value) if self.repeats => {
                for element in param.elements() {
                    self.emit_flag_and_value(value, element, &mut argv)?;
                }
            }
            Some(value) => self.emit_flag_and_value(value, param, &mut argv)?,
        }
        Ok(argv)
    }

    fn emit_flag_only(&self, param: &Param, argv: &mut Vec<String>) {
        match param {
            Param::Bool(true) => argv.push(self.flag.clone()),
            Param::Int(n) if self.repeats => {
                let count = usize::try_from(*n).unwrap_or(0);
                argv.extend(std::iter::repeat_n(self.flag.clone(), count));
            }
            _ => {}
        }
    }

    fn emit_flag_and_value(
        &self,
        value: &Value,
        param: &Param,
        argv: &mut Vec<String>,
    ) -> Result<(), CommandError> {
        if param.is_nil() {
            return Ok(());
        }
        if !value.required && *param == Param::Bool(true) {
            argv.push(self.flag.clone());
            return Ok(());
        }

        let formatted = value.format(param)?;
        if self.equals {
            argv.push(format!("{}={formatted}", self.flag));
        } else if self.value_in_flag {
            argv.push(format!("{}{formatted}", self.flag));
        } else {
            if formatted.starts_with('-') {
                return Err(CommandError::invalid(
                    ParamKind::Option,
                    &self.name,
                    param,
                    format!("formatted value ({formatted:?}) cannot start with a '-'"),
                ));
            }
            argv.push(self.flag.clone());
            argv.push(formatted);
        }
        Ok(())
    }
}

// An optional value may be given as bare `true` to emit only the flag.
fn validate_one(value: &Value, param: &Param) -> Result<(), String> {
    if !value.required && *param == Param::Bool(true) {
        return Ok(());
    }
    value.validate(param)
}
