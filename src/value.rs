//! Coercion from JSON payload values to the engagement SDK's value model
//!
//! Traits and properties arrive as loosely typed JSON. Before any vendor
//! call, values are coerced into [`AttributeValue`], which keeps the numeric
//! distinctions the vendor setters care about (int, long, double) and
//! turns nested objects into [`BrazeProperties`].
//!
//! JSON text has no single/double precision distinction, so JSON numbers
//! never coerce to [`AttributeValue::Float`]. Hosts that hold native `f32`
//! values can still construct one with `AttributeValue::from(4.56_f32)`.

use std::fmt;

use serde_json::{Map, Number, Value};

use crate::error::{BrazeError, Result};

/// A host-native value ready to be handed to a vendor setter
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<AttributeValue>),
    Map(BrazeProperties),
}

impl AttributeValue {
    /// The JSON form of this value
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Long(l) => Value::from(*l),
            Self::Float(f) => Value::from(f64::from(*f)),
            Self::Double(d) => Value::from(*d),
            Self::String(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(properties) => Value::Object(properties.as_map().clone()),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Long(l) => write!(f, "{}", l),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(d) => write!(f, "{}", d),
            Self::String(s) => f.write_str(s),
            Self::List(_) | Self::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Ordered key/value properties attached to custom events, purchases and
/// structured custom attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrazeProperties {
    properties: Map<String, Value>,
}

impl BrazeProperties {
    /// Conversion used for structured custom attributes
    ///
    /// Fails on blank keys. `null` values are kept as-is.
    pub fn try_from_object(object: &Map<String, Value>) -> Result<Self> {
        if object.keys().any(|key| key.trim().is_empty()) {
            return Err(BrazeError::validation("property keys cannot be blank"));
        }
        Ok(Self {
            properties: object.clone(),
        })
    }

    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.properties.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.properties
    }
}

impl From<Map<String, Value>> for BrazeProperties {
    fn from(properties: Map<String, Value>) -> Self {
        Self { properties }
    }
}

impl fmt::Display for BrazeProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.properties) {
            Ok(text) => f.write_str(&text),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Coerces a JSON value found under `key` into an [`AttributeValue`]
///
/// A top-level `null` has no vendor representation and is reported as
/// [`BrazeError::UnmappableValue`]. Inside an array a `null` element becomes
/// the string `"null"`; inside an object it is kept.
pub fn coerce(key: &str, value: &Value) -> Result<AttributeValue> {
    match value {
        Value::Null => Err(BrazeError::unmappable(key, value)),
        Value::Bool(b) => Ok(AttributeValue::Bool(*b)),
        Value::Number(n) => Ok(coerce_number(n)),
        Value::String(s) => Ok(AttributeValue::String(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => Ok(AttributeValue::String(item.to_string())),
                _ => coerce(key, item),
            })
            .collect::<Result<Vec<_>>>()
            .map(AttributeValue::List),
        Value::Object(object) => BrazeProperties::try_from_object(object).map(AttributeValue::Map),
    }
}

fn coerce_number(n: &Number) -> AttributeValue {
    if let Some(i) = n.as_i64() {
        return match i32::try_from(i) {
            Ok(small) => AttributeValue::Int(small),
            Err(_) => AttributeValue::Long(i),
        };
    }
    // Unsigned values past i64::MAX and all non-integers
    AttributeValue::Double(n.as_f64().unwrap_or_default())
}

/// Reads a JSON value as a double, accepting numeric strings
pub fn as_double(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Reads a JSON value as a string; scalars are rendered, containers are not
pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
