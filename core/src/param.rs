//! Dynamic parameter values supplied by callers.
//!
//! A [`Param`] is whatever a caller assigns to an option or argument: a
//! boolean flag toggle, a repeat count, a string, a number, a sequence, or a
//! mapping. The schema's [`Type`](crate::Type) decides which shapes are
//! acceptable and how they render into argv tokens.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A caller-supplied value for an option, argument, or subcommand.
///
/// `Param::Nil` and an unassigned name are equivalent everywhere: nil values
/// are never handed to a [`Type`](crate::Type).
///
/// The [`Display`](fmt::Display) impl renders a debug-like representation
/// (strings quoted) for use in error messages; use
/// [`to_plain_string`](Param::to_plain_string) for the natural string form.
///
/// # Examples
///
/// ```
/// use command_mapper_core::Param;
///
/// assert_eq!(Param::from("main").to_plain_string(), "main");
/// assert_eq!(Param::from(3).to_plain_string(), "3");
/// assert_eq!(Param::from(vec!["a", "b"]).to_string(), r#"["a", "b"]"#);
/// assert!(Param::from(None::<&str>).is_nil());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Param {
    /// Absence of a value.
    #[default]
    Nil,
    /// Boolean toggle.
    Bool(bool),
    /// Integer value (also used as a repeat count for bare flags).
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    Str(String),
    /// Ordered sequence.
    List(Vec<Param>),
    /// Ordered mapping; insertion order is preserved.
    Map(Vec<(Param, Param)>),
}

impl Param {
    /// Builds a [`Param::Map`] from key/value pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_mapper_core::Param;
    ///
    /// let pair = Param::map([("user", "root")]);
    /// assert_eq!(pair.to_string(), r#"{"user": "root"}"#);
    /// ```
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Param>,
        V: Into<Param>,
        I: IntoIterator<Item = (K, V)>,
    {
        Param::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns `true` for [`Param::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Param::Nil)
    }

    /// Returns the string slice if this is a [`Param::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Param::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a [`Param::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Param::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`Param::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Param::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Normalizes this value into a sequence of elements.
    ///
    /// Nil yields no elements, a list yields its items, and any other value
    /// yields itself as a single element.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_mapper_core::Param;
    ///
    /// assert!(Param::Nil.elements().is_empty());
    /// assert_eq!(Param::from("x").elements().len(), 1);
    /// assert_eq!(Param::from(vec![1, 2, 3]).elements().len(), 3);
    /// ```
    pub fn elements(&self) -> &[Param] {
        match self {
            Param::Nil => &[],
            Param::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Natural string representation used when formatting tokens.
    ///
    /// Lists are joined with `,` and mappings render as `key=value` pairs
    /// joined with `,`.
    pub fn to_plain_string(&self) -> String {
        match self {
            Param::Nil => String::new(),
            Param::Bool(b) => b.to_string(),
            Param::Int(n) => n.to_string(),
            Param::Float(f) => format_float(*f),
            Param::Str(s) => s.clone(),
            Param::List(items) => items
                .iter()
                .map(Param::to_plain_string)
                .collect::<Vec<_>>()
                .join(","),
            Param::Map(entries) => entries
                .iter()
                .map(|(k, v)| format!("{}={}", k.to_plain_string(), v.to_plain_string()))
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Renders a float, keeping a trailing `.0` on whole numbers.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Nil => f.write_str("nil"),
            Param::Bool(b) => write!(f, "{b}"),
            Param::Int(n) => write!(f, "{n}"),
            Param::Float(v) => f.write_str(&format_float(*v)),
            Param::Str(s) => write!(f, "{s:?}"),
            Param::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Param::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Int(value)
    }
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Param::Int(i64::from(value))
    }
}

impl From<u32> for Param {
    fn from(value: u32) -> Self {
        Param::Int(i64::from(value))
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Float(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Str(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Str(value)
    }
}

impl From<&String> for Param {
    fn from(value: &String) -> Self {
        Param::Str(value.clone())
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(value: Option<T>) -> Self {
        value.map_or(Param::Nil, Into::into)
    }
}

impl<T: Into<Param>> From<Vec<T>> for Param {
    fn from(value: Vec<T>) -> Self {
        Param::List(value.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<Param>, V: Into<Param>> From<IndexMap<K, V>> for Param {
    fn from(value: IndexMap<K, V>) -> Self {
        Param::map(value)
    }
}

impl<K: Into<Param>, V: Into<Param>> From<BTreeMap<K, V>> for Param {
    fn from(value: BTreeMap<K, V>) -> Self {
        Param::map(value)
    }
}

impl From<serde_json::Value> for Param {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Param::Nil,
            Json::Bool(b) => Param::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Param::Int(i),
                None => Param::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Param::Str(s),
            Json::Array(items) => Param::List(items.into_iter().map(Param::from).collect()),
            Json::Object(entries) => Param::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (Param::Str(k), Param::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Param {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Param::Nil => serializer.serialize_unit(),
            Param::Bool(b) => serializer.serialize_bool(*b),
            Param::Int(n) => serializer.serialize_i64(*n),
            Param::Float(f) => serializer.serialize_f64(*f),
            Param::Str(s) => serializer.serialize_str(s),
            Param::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Param::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

struct ParamVisitor;

impl<'de> Visitor<'de> for ParamVisitor {
    type Value = Param;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a parameter value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Param, E> {
        Ok(Param::Nil)
    }

    fn visit_none<E: de::Error>(self) -> Result<Param, E> {
        Ok(Param::Nil)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Param, D::Error> {
        Param::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Param, E> {
        Ok(Param::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Param, E> {
        Ok(Param::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Param, E> {
        Ok(i64::try_from(v).map_or(Param::Float(v as f64), Param::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Param, E> {
        Ok(Param::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Param, E> {
        Ok(Param::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Param, E> {
        Ok(Param::Str(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Param, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Param::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Param, A::Error> {
        let mut entries = Vec::new();
        while let Some((k, v)) = map.next_entry()? {
            entries.push((k, v));
        }
        Ok(Param::Map(entries))
    }
}

impl<'de> Deserialize<'de> for Param {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ParamVisitor)
    }
}
