//! Value specs: a [`Type`] plus presence and content policy.

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::types::check_content;
use crate::{Param, Type};

/// A [`Type`] wrapped with required/empty/blank policy.
///
/// Used by options (for the option's value), by positional arguments, and
/// by composite types for their elements. Absence ([`Param::Nil`]) is
/// handled here and never reaches the type.
///
/// By default a value is required and rejects empty and whitespace-only
/// strings.
///
/// # Examples
///
/// ```
/// use command_mapper_core::{Param, Type, Value};
///
/// let value = Value::new(Type::str());
/// assert_eq!(value.validate(&Param::Nil).unwrap_err(), "does not allow a nil value");
/// assert_eq!(value.validate(&Param::from("")).unwrap_err(), "does not allow an empty value");
///
/// let lenient = Value::new(Type::str()).optional().allow_empty();
/// assert!(lenient.validate(&Param::Nil).is_ok());
/// assert!(lenient.validate(&Param::from("")).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    /// The wrapped type.
    #[serde(rename = "type", default = "Type::str")]
    pub ty: Type,
    /// Reject absent values.
    #[serde(default = "default_true")]
    pub required: bool,
    /// Accept zero-length strings.
    #[serde(default)]
    pub allow_empty: bool,
    /// Accept whitespace-only strings.
    #[serde(default)]
    pub allow_blank: bool,
}

impl Default for Value {
    fn default() -> Self {
        Self::string()
    }
}

impl Value {
    /// Creates a required value of type `ty`.
    pub fn new(ty: impl Into<Type>) -> Self {
        Self {
            ty: ty.into(),
            required: true,
            allow_empty: false,
            allow_blank: false,
        }
    }

    /// Creates a required, non-empty string value.
    pub fn string() -> Self {
        Self::new(Type::str())
    }

    /// Marks the value as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Accepts zero-length strings.
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// Accepts whitespace-only strings.
    pub fn allow_blank(mut self) -> Self {
        self.allow_blank = true;
        self
    }

    /// Validates `param` against the policy, then the type.
    pub fn validate(&self, param: &Param) -> Result<(), String> {
        if param.is_nil() {
            return if self.required {
                Err("does not allow a nil value".to_string())
            } else {
                Ok(())
            };
        }
        if let Param::Str(s) = param {
            check_content(s, self.allow_empty, self.allow_blank)?;
        }
        self.ty.validate(param)
    }

    /// Formats a validated value through the type.
    pub fn format(&self, param: &Param) -> Result<String, FormatError> {
        self.ty.format(param)
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_distinct_from_empty() {
        let value = Value::string();
        assert_eq!(
            value.validate(&Param::from("   ")).unwrap_err(),
            "does not allow a blank value"
        );
        assert!(value.clone().allow_blank().validate(&Param::from("   ")).is_ok());
        assert_eq!(
            value.allow_blank().validate(&Param::from("")).unwrap_err(),
            "does not allow an empty value"
        );
    }

    #[test]
    fn test_delegates_to_type() {
        let value = Value::new(Type::num());
        assert!(value.validate(&Param::from(3)).is_ok());
        assert!(value.validate(&Param::from("three")).is_err());
        assert_eq!(value.format(&Param::from("03")).unwrap(), "3");
    }

    #[test]
    fn test_serde_defaults() {
        let value: Value = serde_json::from_str("{}").unwrap();
        assert_eq!(value, Value::string());

        let value: Value =
            serde_json::from_str(r#"{"type": {"kind": "num"}, "required": false}"#).unwrap();
        assert_eq!(value, Value::new(Type::num()).optional());
    }
}
