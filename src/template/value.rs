//! Values and the render context

use indexmap::IndexMap;
use serde::Serialize;

/// A value in the render context
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Display form used for interpolation.
    ///
    /// Arrays and objects are only meaningful as loop sources and
    /// interpolate as the empty string.
    pub fn to_output_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    (*n as i64).to_string()
                } else {
                    n.to_string()
                }
            }
            Value::String(s) => s.clone(),
            Value::Array(_) | Value::Object(_) => String::new(),
        }
    }

    /// Get a field of an object; every other variant has no fields
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(obj) => obj.get(key),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Convert from serde_json::Value
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(arr) => Value::Array(arr.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(obj) => Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Ordered mapping of top-level names available to a render.
///
/// The renderer only ever reads a context; loop bindings are layered on
/// top of it without copying or mutating it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    variables: IndexMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            variables: IndexMap::new(),
        }
    }

    pub fn set<V: Into<Value>>(&mut self, name: &str, value: V) {
        self.variables.insert(name.to_string(), value.into());
    }

    /// Builder form of [`Context::set`]
    pub fn with<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
        self.set(name, value);
        self
    }

    pub fn set_string(&mut self, name: &str, value: &str) {
        self.set(name, Value::String(value.to_string()));
    }

    pub fn set_number(&mut self, name: &str, value: f64) {
        self.set(name, Value::Number(value));
    }

    /// Set a variable from any serializable value
    pub fn set_object<T: Serialize>(&mut self, name: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => self.set(name, Value::from_json(&json)),
            Err(e) => tracing::warn!("Skipping context variable {}: {}", name, e),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_string() {
        assert_eq!(Value::Null.to_output_string(), "");
        assert_eq!(Value::Bool(true).to_output_string(), "true");
        assert_eq!(Value::Number(2024.0).to_output_string(), "2024");
        assert_eq!(Value::Number(19.5).to_output_string(), "19.5");
        assert_eq!(Value::from("12.00").to_output_string(), "12.00");
        assert_eq!(Value::from(vec!["a", "b"]).to_output_string(), "");
    }

    #[test]
    fn test_set_object_preserves_field_order() {
        #[derive(Serialize)]
        struct Site {
            name: String,
            url: String,
        }

        let mut ctx = Context::new();
        ctx.set_object(
            "site",
            &Site {
                name: "Shop".to_string(),
                url: "https://shop.example".to_string(),
            },
        );

        let site = ctx.get("site").unwrap();
        match site {
            Value::Object(obj) => {
                let keys: Vec<_> = obj.keys().cloned().collect();
                assert_eq!(keys, vec!["name", "url"]);
            }
            other => panic!("expected object, got {:?}", other),
        }
        assert_eq!(
            site.get_property("name"),
            Some(&Value::String("Shop".to_string()))
        );
    }

    #[test]
    fn test_array_has_no_properties() {
        let value = Value::from(vec!["a"]);
        assert!(value.get_property("0").is_none());
    }
}
