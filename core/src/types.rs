//! Value types: validators and formatters for option and argument values.
//!
//! Every [`Type`] answers two questions about a [`Param`]: is it acceptable
//! ([`Type::validate`]), and what string does it become on the command line
//! ([`Type::format`]). Formatting is only defined for values that validated
//! successfully.
//!
//! Types compose: a [`ListType`] holds an inner [`Value`], and a
//! [`KeyValueType`] holds independently typed key and value. Types are
//! immutable once constructed and serialize with a `kind` tag so schema
//! definition files can describe them.
//!
//! # Examples
//!
//! ```
//! use command_mapper_core::{KeyValueType, ListType, Param, Type, Value};
//!
//! let list = Type::from(ListType::new(Value::new(Type::num())));
//! assert!(list.validate(&Param::from(vec![1, 2, 3])).is_ok());
//! assert_eq!(list.format(&Param::from(vec![1, 2, 3])).unwrap(), "1,2,3");
//!
//! let pair = Type::from(KeyValueType::new().with_separator(":"));
//! assert_eq!(pair.format(&Param::map([("k", "v")])).unwrap(), "k:v");
//! ```

use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::param::format_float;
use crate::{Param, Value};

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("valid regex"));
static HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:0x)?[A-Fa-f0-9]+$").expect("valid regex"));

/// Value type for options and arguments.
///
/// A closed set of validators/formatters. [`Type::Any`] accepts anything and
/// formats it with [`Param::to_plain_string`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    /// Accepts any value.
    #[default]
    Any,
    /// String with an empty/blank policy.
    Str(StrType),
    /// Non-negative digit strings or integers.
    Num(NumType),
    /// Decimal numbers.
    Dec(DecType),
    /// Hexadecimal numbers.
    Hex(HexType),
    /// Closed set of value↔string pairs.
    Map(MapType),
    /// Closed set of literal values.
    Enum(EnumType),
    /// Sequence of values joined by a separator.
    List(ListType),
    /// A single key/value pair joined by a separator.
    KeyValue(KeyValueType),
    /// Sequence of key/value pairs.
    KeyValueList(KeyValueListType),
    /// Path that must exist.
    InputPath,
    /// Path that must be an existing file.
    InputFile,
    /// Path that must be an existing directory.
    InputDir,
}

impl Type {
    /// Plain string type.
    pub fn str() -> Self {
        Type::Str(StrType::new())
    }

    /// Integer type without a range.
    pub fn num() -> Self {
        Type::Num(NumType::new())
    }

    /// Decimal type without a range.
    pub fn dec() -> Self {
        Type::Dec(DecType::new())
    }

    /// Hexadecimal type rendered without a `0x` prefix.
    pub fn hex() -> Self {
        Type::Hex(HexType::new())
    }

    /// Map type from `(value, string)` pairs.
    pub fn map<K, S, I>(pairs: I) -> Self
    where
        K: Into<Param>,
        S: Into<String>,
        I: IntoIterator<Item = (K, S)>,
    {
        Type::Map(MapType::new(pairs))
    }

    /// Enum type from literal values.
    pub fn enumeration<V, I>(values: I) -> Self
    where
        V: Into<Param>,
        I: IntoIterator<Item = V>,
    {
        Type::Enum(EnumType::new(values))
    }

    /// Comma-separated list of required strings.
    pub fn list() -> Self {
        Type::List(ListType::new(Value::string()))
    }

    /// `key=value` pair of strings.
    pub fn key_value() -> Self {
        Type::KeyValue(KeyValueType::new())
    }

    /// Comma-separated list of `key=value` pairs.
    pub fn key_value_list() -> Self {
        Type::KeyValueList(KeyValueListType::new())
    }

    /// Validates a non-nil value.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self, param: &Param) -> Result<(), String> {
        match self {
            Type::Any => Ok(()),
            Type::Str(t) => t.validate(param),
            Type::Num(t) => t.validate(param),
            Type::Dec(t) => t.validate(param),
            Type::Hex(t) => t.validate(param),
            Type::Map(t) => t.validate(param),
            Type::Enum(t) => t.validate(param),
            Type::List(t) => t.validate(param),
            Type::KeyValue(t) => t.validate(param),
            Type::KeyValueList(t) => t.validate(param),
            Type::InputPath => validate_path(param, "path", |p| p.exists()),
            Type::InputFile => validate_path(param, "file", Path::is_file),
            Type::InputDir => validate_path(param, "directory", Path::is_dir),
        }
    }

    /// Formats a value that has already passed [`validate`](Type::validate).
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] when handed a value outside the type's
    /// domain, which only happens if validation was skipped.
    pub fn format(&self, param: &Param) -> Result<String, FormatError> {
        match self {
            Type::Any | Type::Str(_) | Type::InputPath | Type::InputFile | Type::InputDir => {
                Ok(param.to_plain_string())
            }
            Type::Num(t) => t.format(param),
            Type::Dec(t) => t.format(param),
            Type::Hex(t) => t.format(param),
            Type::Map(t) => t.format(param),
            Type::Enum(t) => t.format(param),
            Type::List(t) => t.format(param),
            Type::KeyValue(t) => t.format(param),
            Type::KeyValueList(t) => t.format(param),
        }
    }
}

/// String type.
///
/// Rejects sequences and mappings. On its own the type permits empty and
/// blank strings; a wrapping [`Value`] applies the stricter default policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrType {
    /// Accept zero-length strings.
    #[serde(default = "default_true")]
    pub allow_empty: bool,
    /// Accept whitespace-only strings.
    #[serde(default = "default_true")]
    pub allow_blank: bool,
}

impl Default for StrType {
    fn default() -> Self {
        Self::new()
    }
}

impl StrType {
    /// Creates a permissive string type.
    pub fn new() -> Self {
        Self {
            allow_empty: true,
            allow_blank: true,
        }
    }

    /// Creates a string type that rejects empty and blank strings.
    pub fn strict() -> Self {
        Self {
            allow_empty: false,
            allow_blank: false,
        }
    }

    fn validate(&self, param: &Param) -> Result<(), String> {
        match param {
            Param::List(_) => Err(format!("cannot convert a list into a string ({param})")),
            Param::Map(_) => Err(format!("cannot convert a map into a string ({param})")),
            other => check_content(&other.to_plain_string(), self.allow_empty, self.allow_blank),
        }
    }
}

/// Applies an empty/blank policy to string content.
pub(crate) fn check_content(s: &str, allow_empty: bool, allow_blank: bool) -> Result<(), String> {
    if s.is_empty() {
        if !allow_empty {
            return Err("does not allow an empty value".to_string());
        }
    } else if !allow_blank && s.trim().is_empty() {
        return Err("does not allow a blank value".to_string());
    }
    Ok(())
}

/// Integer type: integers or strings of digits, with an optional range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumType {
    /// Inclusive range of acceptable values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeInclusive<i64>>,
}

impl NumType {
    /// Creates an unbounded integer type.
    pub fn new() -> Self {
        Self { range: None }
    }

    /// Restricts accepted values to `range`.
    pub fn with_range(mut self, range: RangeInclusive<i64>) -> Self {
        self.range = Some(range);
        self
    }

    fn to_int(param: &Param) -> Result<i64, String> {
        match param {
            Param::Int(n) => Ok(*n),
            Param::Str(s) => {
                if !DIGITS.is_match(s) {
                    return Err(format!("contains non-numeric characters ({param})"));
                }
                s.parse::<i64>()
                    .map_err(|_| format!("cannot be converted into an integer ({param})"))
            }
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
            Param::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Ok(*f as i64)
            }
            _ => Err(format!("cannot be converted into an integer ({param})")),
        }
    }

    fn validate(&self, param: &Param) -> Result<(), String> {
        let n = Self::to_int(param)?;
        check_range(n, self.range.as_ref(), param)
    }

    fn format(&self, param: &Param) -> Result<String, FormatError> {
        Self::to_int(param)
            .map(|n| n.to_string())
            .map_err(|_| FormatError::Incompatible {
                expected: "an integer",
                value: param.clone(),
            })
    }
}

fn check_range<T>(n: T, range: Option<&RangeInclusive<T>>, param: &Param) -> Result<(), String>
where
    T: PartialOrd + std::fmt::Debug,
{
    match range {
        Some(range) if !range.contains(&n) => Err(format!(
            "unacceptable value ({param}), must be within the range {range:?}"
        )),
        _ => Ok(()),
    }
}

/// Decimal type: floats, integers, or decimal strings, with an optional range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecType {
    /// Inclusive range of acceptable values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeInclusive<f64>>,
}

impl DecType {
    /// Creates an unbounded decimal type.
    pub fn new() -> Self {
        Self { range: None }
    }

    /// Restricts accepted values to `range`.
    pub fn with_range(mut self, range: RangeInclusive<f64>) -> Self {
        self.range = Some(range);
        self
    }

    fn to_float(param: &Param) -> Result<f64, String> {
        match param {
            Param::Float(f) => Ok(*f),
            Param::Int(n) => Ok(*n as f64),
            Param::Str(s) => {
                if !DECIMAL.is_match(s) {
                    return Err(format!("contains non-decimal characters ({param})"));
                }
                s.parse::<f64>()
                    .map_err(|_| format!("cannot be converted into a decimal ({param})"))
            }
            _ => Err(format!("cannot be converted into a decimal ({param})")),
        }
    }

    fn validate(&self, param: &Param) -> Result<(), String> {
        let f = Self::to_float(param)?;
        check_range(f, self.range.as_ref(), param)
    }

    fn format(&self, param: &Param) -> Result<String, FormatError> {
        Self::to_float(param)
            .map(format_float)
            .map_err(|_| FormatError::Incompatible {
                expected: "a decimal",
                value: param.clone(),
            })
    }
}

/// Hexadecimal type.
///
/// Accepts non-negative integers and hex strings with an optional `0x`
/// prefix. `leading_zero` controls whether formatted values carry `0x`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HexType {
    /// Render values with a `0x` prefix.
    #[serde(default)]
    pub leading_zero: bool,
}

impl HexType {
    /// Creates a hex type rendered without a prefix.
    pub fn new() -> Self {
        Self {
            leading_zero: false,
        }
    }

    /// Renders formatted values with a `0x` prefix.
    pub fn leading_zero(mut self) -> Self {
        self.leading_zero = true;
        self
    }

    fn validate(&self, param: &Param) -> Result<(), String> {
        match param {
            Param::Int(n) if *n >= 0 => Ok(()),
            Param::Str(s) if HEX.is_match(s) => Ok(()),
            Param::Int(_) | Param::Str(_) => Err(format!("not in hex format ({param})")),
            _ => Err(format!("cannot be converted into an integer ({param})")),
        }
    }

    fn format(&self, param: &Param) -> Result<String, FormatError> {
        let digits = match param {
            Param::Int(n) if *n >= 0 => format!("{n:x}"),
            Param::Str(s) if HEX.is_match(s) => s.strip_prefix("0x").unwrap_or(s).to_string(),
            _ => {
                return Err(FormatError::Incompatible {
                    expected: "a hex number",
                    value: param.clone(),
                });
            }
        };
        if self.leading_zero {
            Ok(format!("0x{digits}"))
        } else {
            Ok(digits)
        }
    }
}

/// Closed set of value↔string pairs.
///
/// A value validates if it equals a key or one of the mapped strings.
/// Formatting maps keys to their strings and passes mapped strings through.
///
/// # Examples
///
/// ```
/// use command_mapper_core::{MapType, Param};
///
/// let map = MapType::new([(true, "yes"), (false, "no")]);
/// assert_eq!(map.pairs.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapType {
    /// `(value, string)` pairs in declaration order.
    pub pairs: Vec<(Param, String)>,
}

impl MapType {
    /// Creates a map type from `(value, string)` pairs.
    pub fn new<K, S, I>(pairs: I) -> Self
    where
        K: Into<Param>,
        S: Into<String>,
        I: IntoIterator<Item = (K, S)>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, s)| (k.into(), s.into()))
                .collect(),
        }
    }

    fn validate(&self, param: &Param) -> Result<(), String> {
        map_validate(
            self.pairs.iter().map(|(k, s)| (k, s.as_str())),
            param,
        )
    }

    fn format(&self, param: &Param) -> Result<String, FormatError> {
        map_format(
            self.pairs.iter().map(|(k, s)| (k, s.as_str())),
            param,
        )
    }
}

fn map_validate<'a, I>(pairs: I, param: &Param) -> Result<(), String>
where
    I: Iterator<Item = (&'a Param, &'a str)> + Clone,
{
    let known = pairs
        .clone()
        .any(|(k, s)| k == param || param.as_str() == Some(s));
    if known {
        return Ok(());
    }
    let choices: Vec<String> = pairs.map(|(k, _)| k.to_string()).collect();
    Err(format!(
        "unknown value ({param}), must be one of: {}",
        choices.join(", ")
    ))
}

fn map_format<'a, I>(pairs: I, param: &Param) -> Result<String, FormatError>
where
    I: Iterator<Item = (&'a Param, &'a str)> + Clone,
{
    if let Some((_, s)) = pairs.clone().find(|(k, _)| *k == param) {
        return Ok(s.to_string());
    }
    if let Some(s) = param.as_str() {
        if pairs.clone().any(|(_, mapped)| mapped == s) {
            return Ok(s.to_string());
        }
    }
    Err(FormatError::UnmappedValue(param.clone()))
}

/// Closed set of literal values; each maps to its own string form.
///
/// # Examples
///
/// ```
/// use command_mapper_core::{Param, Type};
///
/// let format = Type::enumeration(["json", "yaml"]);
/// assert!(format.validate(&Param::from("yaml")).is_ok());
/// assert!(format.validate(&Param::from("toml")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnumType {
    /// Accepted values in declaration order.
    pub values: Vec<Param>,
}

impl EnumType {
    /// Creates an enum type from literal values.
    pub fn new<V, I>(values: I) -> Self
    where
        V: Into<Param>,
        I: IntoIterator<Item = V>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The derived `(value, string)` pairs.
    pub fn to_map(&self) -> MapType {
        MapType {
            pairs: self
                .values
                .iter()
                .map(|v| (v.clone(), v.to_plain_string()))
                .collect(),
        }
    }

    fn validate(&self, param: &Param) -> Result<(), String> {
        self.to_map().validate(param)
    }

    fn format(&self, param: &Param) -> Result<String, FormatError> {
        self.to_map().format(param)
    }
}

/// Sequence of values sharing one inner [`Value`], joined by a separator.
///
/// A lone scalar counts as a one-element list and a mapping counts as a
/// list of single-entry mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListType {
    /// Value spec applied to each element.
    #[serde(default = "default_boxed_string")]
    pub value: Box<Value>,
    /// Separator placed between formatted elements.
    #[serde(default = "default_list_separator")]
    pub separator: String,
    /// Accept an empty sequence.
    #[serde(default)]
    pub allow_empty: bool,
}

impl Default for ListType {
    fn default() -> Self {
        Self::new(Value::string())
    }
}

impl ListType {
    /// Creates a comma-separated list of `value`.
    pub fn new(value: Value) -> Self {
        Self {
            value: Box::new(value),
            separator: default_list_separator(),
            allow_empty: false,
        }
    }

    /// Uses `separator` between formatted elements.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Accepts empty sequences.
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    fn validate(&self, param: &Param) -> Result<(), String> {
        let elements = list_elements(param);
        if elements.is_empty() {
            return if self.allow_empty {
                Ok(())
            } else {
                Err("cannot be empty".to_string())
            };
        }
        for element in &elements {
            self.value
                .validate(element)
                .map_err(|reason| format!("element contains an invalid value: {reason}"))?;
        }
        Ok(())
    }

    fn format(&self, param: &Param) -> Result<String, FormatError> {
        let formatted = list_elements(param)
            .iter()
            .map(|element| self.value.format(element))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(formatted.join(&self.separator))
    }
}

fn list_elements(param: &Param) -> Vec<Param> {
    match param {
        Param::Map(entries) => entries
            .iter()
            .map(|entry| Param::Map(vec![entry.clone()]))
            .collect(),
        other => other.elements().to_vec(),
    }
}

/// A single key/value pair, each side independently typed.
///
/// Accepts a one-entry mapping or a two-element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueType {
    /// Value spec for the key.
    #[serde(default = "default_boxed_string")]
    pub key: Box<Value>,
    /// Value spec for the value.
    #[serde(default = "default_boxed_string")]
    pub value: Box<Value>,
    /// Separator between the formatted key and value.
    #[serde(default = "default_pair_separator")]
    pub separator: String,
}

impl Default for KeyValueType {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueType {
    /// Creates a `key=value` pair of required strings.
    pub fn new() -> Self {
        Self {
            key: Box::new(Value::string()),
            value: Box::new(Value::string()),
            separator: default_pair_separator(),
        }
    }

    /// Uses `separator` between key and value.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets the key's value spec.
    pub fn with_key(mut self, key: Value) -> Self {
        self.key = Box::new(key);
        self
    }

    /// Sets the value's value spec.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Box::new(value);
        self
    }

    fn pair(param: &Param) -> Result<(&Param, &Param), String> {
        match param {
            Param::Map(entries) => match entries.as_slice() {
                [] => Err("cannot be empty".to_string()),
                [(k, v)] => Ok((k, v)),
                _ => Err(format!(
                    "cannot contain multiple key-value pairs ({param})"
                )),
            },
            Param::List(items) => match items.as_slice() {
                [k, v] => Ok((k, v)),
                _ => Err(format!("must be a map or a two-element list ({param})")),
            },
            _ => Err(format!("must be a map or a two-element list ({param})")),
        }
    }

    fn validate(&self, param: &Param) -> Result<(), String> {
        let (key, value) = Self::pair(param)?;
        self.key
            .validate(key)
            .map_err(|reason| format!("key {reason}"))?;
        self.value
            .validate(value)
            .map_err(|reason| format!("value {reason}"))
    }

    fn format(&self, param: &Param) -> Result<String, FormatError> {
        let (key, value) =
            Self::pair(param).map_err(|_| FormatError::NotAPair(param.clone()))?;
        Ok(format!(
            "{}{}{}",
            self.key.format(key)?,
            self.separator,
            self.value.format(value)?
        ))
    }
}

/// List of key/value pairs, e.g. `a=1,b=2`.
///
/// A multi-entry mapping is split into one pair per entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueListType {
    /// Separator between pairs.
    #[serde(default = "default_list_separator")]
    pub separator: String,
    /// Separator between each key and value.
    #[serde(default = "default_pair_separator")]
    pub key_value_separator: String,
    /// Value spec for keys.
    #[serde(default = "default_boxed_string")]
    pub key: Box<Value>,
    /// Value spec for values.
    #[serde(default = "default_boxed_string")]
    pub value: Box<Value>,
    /// Accept an empty sequence.
    #[serde(default)]
    pub allow_empty: bool,
}

impl Default for KeyValueListType {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueListType {
    /// Creates a `,`-separated list of `key=value` pairs.
    pub fn new() -> Self {
        Self {
            separator: default_list_separator(),
            key_value_separator: default_pair_separator(),
            key: Box::new(Value::string()),
            value: Box::new(Value::string()),
            allow_empty: false,
        }
    }

    /// Uses `separator` between pairs.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Uses `separator` between each key and value.
    pub fn with_key_value_separator(mut self, separator: impl Into<String>) -> Self {
        self.key_value_separator = separator.into();
        self
    }

    /// Accepts empty sequences.
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// The equivalent list of [`KeyValueType`] elements.
    pub fn as_list(&self) -> ListType {
        let pair = KeyValueType {
            key: self.key.clone(),
            value: self.value.clone(),
            separator: self.key_value_separator.clone(),
        };
        ListType {
            value: Box::new(Value::new(Type::KeyValue(pair))),
            separator: self.separator.clone(),
            allow_empty: self.allow_empty,
        }
    }

    fn validate(&self, param: &Param) -> Result<(), String> {
        self.as_list().validate(param)
    }

    fn format(&self, param: &Param) -> Result<String, FormatError> {
        self.as_list().format(param)
    }
}

fn validate_path(param: &Param, noun: &str, check: impl Fn(&Path) -> bool) -> Result<(), String> {
    match param {
        Param::List(_) => Err(format!("cannot convert a list into a path ({param})")),
        Param::Map(_) => Err(format!("cannot convert a map into a path ({param})")),
        other => {
            let path = other.to_plain_string();
            if check(Path::new(&path)) {
                Ok(())
            } else {
                Err(format!("{noun} does not exist ({param})"))
            }
        }
    }
}

macro_rules! impl_into_type {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Type {
                fn from(value: $ty) -> Self {
                    Type::$variant(value)
                }
            }
        )*
    };
}

impl_into_type! {
    StrType => Str,
    NumType => Num,
    DecType => Dec,
    HexType => Hex,
    MapType => Map,
    EnumType => Enum,
    ListType => List,
    KeyValueType => KeyValue,
    KeyValueListType => KeyValueList,
}

fn default_true() -> bool {
    true
}

fn default_list_separator() -> String {
    ",".to_string()
}

fn default_pair_separator() -> String {
    "=".to_string()
}

fn default_boxed_string() -> Box<Value> {
    Box::new(Value::string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(values: &[&str]) -> Param {
        Param::from(values.to_vec())
    }

    #[test]
    fn test_any_accepts_everything() {
        assert!(Type::Any.validate(&Param::from(vec![1, 2])).is_ok());
        assert_eq!(Type::Any.format(&Param::from(7)).unwrap(), "7");
    }

    #[test]
    fn test_str_rejects_composites() {
        let err = Type::str().validate(&strs(&["a"])).unwrap_err();
        assert!(err.starts_with("cannot convert a list into a string"));
        let err = Type::str()
            .validate(&Param::map([("a", "b")]))
            .unwrap_err();
        assert!(err.starts_with("cannot convert a map into a string"));
    }

    #[test]
    fn test_strict_str_distinguishes_empty_and_blank() {
        let ty = Type::Str(StrType::strict());
        assert_eq!(
            ty.validate(&Param::from("")).unwrap_err(),
            "does not allow an empty value"
        );
        assert_eq!(
            ty.validate(&Param::from("  \t")).unwrap_err(),
            "does not allow a blank value"
        );
        assert!(Type::str().validate(&Param::from("")).is_ok());
    }

    #[test]
    fn test_num_accepts_digits_and_integers() {
        let ty = Type::num();
        assert!(ty.validate(&Param::from(42)).is_ok());
        assert!(ty.validate(&Param::from("0042")).is_ok());
        assert_eq!(ty.format(&Param::from("0042")).unwrap(), "42");
        let err = ty.validate(&Param::from("4x2")).unwrap_err();
        assert_eq!(err, r#"contains non-numeric characters ("4x2")"#);
        assert!(ty.validate(&Param::from(true)).is_err());
    }

    #[test]
    fn test_num_rejects_floats_outside_i64() {
        let ty = Type::num();
        assert_eq!(ty.format(&Param::from(3.0)).unwrap(), "3");
        assert!(ty.validate(&Param::from(1e20)).is_err());
        assert!(ty.validate(&Param::from(-1e20)).is_err());
        assert!(ty.validate(&Param::from(i64::MAX as f64)).is_err());
        assert!(ty.format(&Param::from(1e20)).is_err());
        assert!(ty.validate(&Param::from(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_num_range() {
        let ty = Type::from(NumType::new().with_range(1..=10));
        assert!(ty.validate(&Param::from(10)).is_ok());
        let err = ty.validate(&Param::from(11)).unwrap_err();
        assert!(err.starts_with("unacceptable value (11)"));
    }

    #[test]
    fn test_dec_formats_floats() {
        let ty = Type::dec();
        assert_eq!(ty.format(&Param::from(2)).unwrap(), "2.0");
        assert_eq!(ty.format(&Param::from("0.50")).unwrap(), "0.5");
        assert!(ty.validate(&Param::from("1.2.3")).is_err());

        let bounded = Type::from(DecType::new().with_range(0.0..=1.0));
        assert!(bounded.validate(&Param::from(0.5)).is_ok());
        assert!(bounded.validate(&Param::from(1.5)).is_err());
    }

    #[test]
    fn test_hex_prefix_handling() {
        let plain = Type::hex();
        assert_eq!(plain.format(&Param::from(255)).unwrap(), "ff");
        assert_eq!(plain.format(&Param::from("0xff")).unwrap(), "ff");

        let prefixed = Type::from(HexType::new().leading_zero());
        assert_eq!(prefixed.format(&Param::from("ff")).unwrap(), "0xff");
        assert_eq!(prefixed.format(&Param::from(16)).unwrap(), "0x10");

        let err = plain.validate(&Param::from("xyz")).unwrap_err();
        assert_eq!(err, r#"not in hex format ("xyz")"#);
    }

    #[test]
    fn test_map_lookup_by_key_or_string() {
        let ty = Type::map([(true, "yes"), (false, "no")]);
        assert_eq!(ty.format(&Param::from(true)).unwrap(), "yes");
        assert_eq!(ty.format(&Param::from("no")).unwrap(), "no");
        assert!(ty.validate(&Param::from("maybe")).is_err());
    }

    #[test]
    fn test_map_accepts_owned_strings() {
        let labels: Vec<(i64, String)> = (1..=2).map(|n| (n, format!("level-{n}"))).collect();
        let ty = Type::map(labels);
        assert_eq!(ty.format(&Param::from(2)).unwrap(), "level-2");
    }

    #[test]
    fn test_map_format_unmapped_is_format_error() {
        let ty = Type::map([(1, "one")]);
        assert_eq!(
            ty.format(&Param::from(2)),
            Err(FormatError::UnmappedValue(Param::from(2)))
        );
    }

    #[test]
    fn test_enum_error_lists_choices() {
        let ty = Type::enumeration(["fast", "slow"]);
        let err = ty.validate(&Param::from("medium")).unwrap_err();
        assert_eq!(
            err,
            r#"unknown value ("medium"), must be one of: "fast", "slow""#
        );
    }

    #[test]
    fn test_enum_after_deserialize() {
        let ty: Type = serde_json::from_str(r#"{"kind": "enum", "values": [1, 2]}"#).unwrap();
        assert_eq!(ty.format(&Param::from("2")).unwrap(), "2");
        assert_eq!(ty.format(&Param::from(1)).unwrap(), "1");
    }

    #[test]
    fn test_list_empty_policy() {
        let strict = Type::list();
        assert_eq!(
            strict.validate(&Param::List(vec![])).unwrap_err(),
            "cannot be empty"
        );
        let lenient = Type::from(ListType::new(Value::string()).allow_empty());
        assert!(lenient.validate(&Param::List(vec![])).is_ok());
        assert_eq!(lenient.format(&Param::List(vec![])).unwrap(), "");
    }

    #[test]
    fn test_list_element_errors() {
        let ty = Type::from(ListType::new(Value::new(Type::num())).with_separator(":"));
        assert_eq!(ty.format(&Param::from(vec![1, 2])).unwrap(), "1:2");
        let err = ty.validate(&strs(&["1", "b"])).unwrap_err();
        assert!(err.starts_with("element contains an invalid value: contains non-numeric"));
    }

    #[test]
    fn test_list_scalar_is_single_element() {
        assert_eq!(Type::list().format(&Param::from("a")).unwrap(), "a");
    }

    #[test]
    fn test_key_value_pair_count() {
        let ty = Type::key_value();
        assert_eq!(
            ty.validate(&Param::Map(vec![])).unwrap_err(),
            "cannot be empty"
        );
        let err = ty
            .validate(&Param::map([("a", "1"), ("b", "2")]))
            .unwrap_err();
        assert!(err.starts_with("cannot contain multiple key-value pairs"));
        assert_eq!(ty.format(&strs(&["a", "1"])).unwrap(), "a=1");
    }

    #[test]
    fn test_key_value_typed_sides() {
        let ty = Type::from(KeyValueType::new().with_value(Value::new(Type::num())));
        let err = ty.validate(&Param::map([("port", "http")])).unwrap_err();
        assert!(err.starts_with("value contains non-numeric characters"));
        let err = ty.validate(&Param::map([("", "80")])).unwrap_err();
        assert_eq!(err, "key does not allow an empty value");
    }

    #[test]
    fn test_key_value_list_from_map() {
        let ty = Type::key_value_list();
        let param = Param::map([("a", "1"), ("b", "2")]);
        assert!(ty.validate(&param).is_ok());
        assert_eq!(ty.format(&param).unwrap(), "a=1,b=2");
        assert!(ty.validate(&Param::Map(vec![])).is_err());
    }

    #[test]
    fn test_input_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("input.txt");
        std::fs::write(&file, "data").unwrap();
        let dir_param = Param::from(dir.path().to_str().unwrap());
        let file_param = Param::from(file.to_str().unwrap());
        let missing = Param::from(dir.path().join("missing").to_str().unwrap());

        assert!(Type::InputPath.validate(&dir_param).is_ok());
        assert!(Type::InputFile.validate(&file_param).is_ok());
        assert!(Type::InputDir.validate(&dir_param).is_ok());
        assert!(
            Type::InputFile
                .validate(&dir_param)
                .unwrap_err()
                .starts_with("file does not exist")
        );
        assert!(
            Type::InputDir
                .validate(&file_param)
                .unwrap_err()
                .starts_with("directory does not exist")
        );
        assert!(
            Type::InputPath
                .validate(&missing)
                .unwrap_err()
                .starts_with("path does not exist")
        );
    }

    #[test]
    fn test_type_serde_tag() {
        let ty = Type::from(NumType::new().with_range(1..=3));
        let json = serde_json::to_value(&ty).unwrap();
        assert_eq!(json["kind"], "num");
        let back: Type = serde_json::from_value(json).unwrap();
        assert_eq!(back, ty);
    }
}
