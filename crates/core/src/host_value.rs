use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

/// JSON key used by the host shim to mark a not-yet-known value.
pub const UNKNOWN_MARKER: &str = "$unknown";

/// Dynamically typed value exchanged with the host runtime.
#[derive(Debug, Clone)]
pub enum HostValue {
    /// Value not yet known at plan time.
    Unknown,
    /// Explicit absence.
    Null,
    /// UTF-8 string.
    String(String),
    /// Boolean flag.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Ordered list.
    List(Vec<HostValue>),
    /// Unordered collection; compared by membership.
    Set(Vec<HostValue>),
    /// Record keyed by attribute name.
    Object(BTreeMap<String, HostValue>),
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unknown, Self::Unknown) | (Self::Null, Self::Null) => true,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left == right,
            (Self::Int(left), Self::Float(right)) | (Self::Float(right), Self::Int(left)) => {
                (*left as f64) == *right
            }
            (Self::List(left), Self::List(right)) => left == right,
            (Self::Set(left), Self::Set(right))
            | (Self::Set(left), Self::List(right))
            | (Self::List(left), Self::Set(right)) => same_members(left, right),
            (Self::Object(left), Self::Object(right)) => left == right,
            _ => false,
        }
    }
}

fn same_members(left: &[HostValue], right: &[HostValue]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let mut matched = vec![false; right.len()];
    left.iter().all(|candidate| {
        let slot = right
            .iter()
            .enumerate()
            .position(|(index, value)| !matched[index] && value == candidate);
        match slot {
            Some(index) => {
                matched[index] = true;
                true
            }
            None => false,
        }
    })
}

impl HostValue {
    /// Builds an object from name/value pairs.
    #[must_use]
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, HostValue)>) -> Self {
        Self::Object(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Convenience constructor for string values.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Returns true for an explicit null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for an unknown value.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Human-readable type label used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int(_) => "number",
            Self::Float(_) => "number",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Object(_) => "object",
        }
    }

    /// Looks up a field on an object value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HostValue> {
        match self {
            Self::Object(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Borrows the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns true when any nested value is unknown.
    #[must_use]
    pub fn contains_unknown(&self) -> bool {
        match self {
            Self::Unknown => true,
            Self::List(items) | Self::Set(items) => items.iter().any(Self::contains_unknown),
            Self::Object(fields) => fields.values().any(Self::contains_unknown),
            _ => false,
        }
    }

    /// Replaces every nested unknown with null.
    #[must_use]
    pub fn resolve_unknowns(self) -> Self {
        match self {
            Self::Unknown => Self::Null,
            Self::List(items) => Self::List(items.into_iter().map(Self::resolve_unknowns).collect()),
            Self::Set(items) => Self::Set(items.into_iter().map(Self::resolve_unknowns).collect()),
            Self::Object(fields) => Self::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, value.resolve_unknowns()))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Encodes the value as JSON for the host shim.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Unknown => {
                let mut marker = Map::new();
                marker.insert(UNKNOWN_MARKER.to_owned(), Value::Bool(true));
                Value::Object(marker)
            }
            Self::Null => Value::Null,
            Self::String(value) => Value::String(value.clone()),
            Self::Bool(value) => Value::Bool(*value),
            Self::Int(value) => Value::Number(Number::from(*value)),
            Self::Float(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
            Self::List(items) | Self::Set(items) => {
                Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// Decodes a host-shim JSON document. Arrays decode as lists.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => match number.as_i64() {
                Some(whole) => Self::Int(whole),
                None => Self::Float(number.as_f64().unwrap_or_default()),
            },
            Value::String(text) => Self::String(text.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(fields) => {
                if fields.len() == 1 && fields.get(UNKNOWN_MARKER) == Some(&Value::Bool(true)) {
                    return Self::Unknown;
                }
                Self::Object(
                    fields
                        .iter()
                        .map(|(name, value)| (name.clone(), Self::from_json(value)))
                        .collect(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::HostValue;

    #[test]
    fn sets_compare_by_membership() {
        let left = HostValue::Set(vec![HostValue::string("a"), HostValue::string("b")]);
        let right = HostValue::Set(vec![HostValue::string("b"), HostValue::string("a")]);
        assert_eq!(left, right);

        let lists_left = HostValue::List(vec![HostValue::string("a"), HostValue::string("b")]);
        let lists_right = HostValue::List(vec![HostValue::string("b"), HostValue::string("a")]);
        assert_ne!(lists_left, lists_right);
    }

    #[test]
    fn null_and_empty_list_are_distinct() {
        assert_ne!(HostValue::Null, HostValue::List(Vec::new()));
    }

    #[test]
    fn resolve_unknowns_reaches_nested_values() {
        let value = HostValue::object([
            ("id", HostValue::Unknown),
            ("tags", HostValue::List(vec![HostValue::Unknown])),
        ]);
        assert!(value.contains_unknown());

        let resolved = value.resolve_unknowns();
        assert!(!resolved.contains_unknown());
        assert_eq!(resolved.get("id"), Some(&HostValue::Null));
    }

    #[test]
    fn json_marker_decodes_to_unknown() {
        let decoded = HostValue::from_json(&json!({ "id": { "$unknown": true }, "n": 3 }));
        assert_eq!(decoded.get("id"), Some(&HostValue::Unknown));
        assert_eq!(decoded.get("n"), Some(&HostValue::Int(3)));
        assert_eq!(decoded.to_json(), json!({ "id": { "$unknown": true }, "n": 3 }));
    }
}
