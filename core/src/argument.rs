//! Positional arguments.

use serde::{Deserialize, Serialize};

use crate::error::{CommandError, ParamKind};
use crate::{Param, Value};

/// Schema for a positional argument.
///
/// Nil values are dropped rather than rejected, even for required
/// arguments; the [`Command`](crate::Command) assembler is responsible for
/// reporting missing required arguments.
///
/// # Examples
///
/// ```
/// use command_mapper_core::{ArgumentSchema, Param};
///
/// let files = ArgumentSchema::new("files").repeats();
/// let tokens = files
///     .emit(&Param::from(vec![Param::from("foo"), Param::Nil, Param::from("bar")]))
///     .unwrap();
/// assert_eq!(tokens, vec!["foo", "bar"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSchema {
    /// Name used to assign values.
    pub name: String,
    /// Value spec (defaults to a required non-empty string).
    #[serde(default)]
    pub value: Value,
    /// Accept a sequence, emitting one token per element.
    #[serde(default)]
    pub repeats: bool,
    /// Description for listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArgumentSchema {
    /// Creates a required string argument.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_value(name, Value::string())
    }

    /// Creates an argument with the given value spec.
    pub fn with_value(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            repeats: false,
            description: None,
        }
    }

    /// Marks the argument as optional.
    pub fn optional(mut self) -> Self {
        self.value.required = false;
        self
    }

    /// Accepts a sequence of values.
    pub fn repeats(mut self) -> Self {
        self.repeats = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Returns `true` if the argument must be assigned.
    pub fn is_required(&self) -> bool {
        self.value.required
    }

    /// Returns `true` if `param` counts as "no value" for this argument.
    pub(crate) fn is_missing(&self, param: Option<&Param>) -> bool {
        match param {
            None | Some(Param::Nil) => true,
            Some(p) if self.repeats => p.elements().iter().all(Param::is_nil),
            Some(_) => false,
        }
    }

    /// Validates a value assigned to this argument.
    pub fn validate(&self, param: &Param) -> Result<(), String> {
        if self.repeats {
            param
                .elements()
                .iter()
                .filter(|element| !element.is_nil())
                .try_for_each(|element| self.value.validate(element))
        } else if param.is_nil() {
            Ok(())
        } else {
            self.value.validate(param)
        }
    }

    /// Validates `param` and returns the tokens it produces.
    pub fn emit(&self, param: &Param) -> Result<Vec<String>, CommandError> {
        self.validate(param).map_err(|reason| {
            CommandError::invalid(ParamKind::Argument, &self.name, param, reason)
        })?;

        if self.repeats {
            let tokens = param
                .elements()
                .iter()
                .filter(|element| !element.is_nil())
                .map(|element| self.value.format(element))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tokens)
        } else if param.is_nil() {
            Ok(Vec::new())
        } else {
            Ok(vec![self.value.format(param)?])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ListType, Type};

    #[test]
    fn test_nil_dropped_even_when_required() {
        let arg = ArgumentSchema::new("path");
        assert!(arg.is_required());
        assert!(arg.emit(&Param::Nil).unwrap().is_empty());
    }

    #[test]
    fn test_repeats_scalar_is_one_element() {
        let arg = ArgumentSchema::new("files").repeats();
        assert_eq!(arg.emit(&Param::from("a")).unwrap(), vec!["a"]);
    }

    #[test]
    fn test_invalid_element_reports_argument() {
        let arg = ArgumentSchema::with_value("ports", Value::new(Type::num())).repeats();
        let err = arg.emit(&Param::from(vec!["80", "http"])).unwrap_err();
        match err {
            CommandError::Validation { kind, name, reason, .. } => {
                assert_eq!(kind, ParamKind::Argument);
                assert_eq!(name, "ports");
                assert_eq!(reason, r#"contains non-numeric characters ("http")"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_composite_type_formats_single_token() {
        let arg = ArgumentSchema::with_value(
            "fields",
            Value::new(ListType::new(Value::string()).with_separator(":")),
        );
        assert_eq!(
            arg.emit(&Param::from(vec!["a", "b", "c"])).unwrap(),
            vec!["a:b:c"]
        );
    }

    #[test]
    fn test_plain_string_rejects_sequence() {
        let arg = ArgumentSchema::new("name");
        assert!(arg.emit(&Param::from(vec!["a", "b"])).is_err());
    }

    #[test]
    fn test_missing_detection() {
        let arg = ArgumentSchema::new("files").repeats();
        assert!(arg.is_missing(None));
        assert!(arg.is_missing(Some(&Param::List(vec![]))));
        assert!(arg.is_missing(Some(&Param::List(vec![Param::Nil]))));
        assert!(!arg.is_missing(Some(&Param::from("x"))));
    }
}
