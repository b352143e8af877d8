use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::controller::FormResult;
use super::path::{self, FieldPath};

/// Field values of one form, kept as an ordered JSON object.
#[derive(Clone, Debug, PartialEq)]
pub struct Store {
    root: Value,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => Self { root: value },
            Value::Null => Self::new(),
            other => {
                tracing::warn!(kind = value_kind(&other), "ignoring non-object store root");
                Self::new()
            }
        }
    }

    pub fn from_model<S: Serialize>(model: &S) -> FormResult<Self> {
        Ok(Self::from_value(serde_json::to_value(model)?))
    }

    pub fn to_model<S: DeserializeOwned>(&self) -> FormResult<S> {
        Ok(serde_json::from_value(self.root.clone())?)
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        path::resolve(&self.root, path)
    }

    pub fn set(&mut self, path: &FieldPath, value: Value) {
        if path.is_empty() {
            *self = Self::from_value(value);
            return;
        }
        path::assign(&mut self.root, path, value);
    }

    pub fn remove(&mut self, path: &FieldPath) -> Option<Value> {
        path::remove(&mut self.root, path)
    }

    /// Nested partial object holding only the requested paths.
    pub fn pick<'p>(&self, paths: impl IntoIterator<Item = &'p FieldPath>) -> Value {
        path::pick(&self.root, paths)
    }

    pub fn merge(&mut self, patch: Value) {
        path::merge(&mut self.root, patch);
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }
}

/// Snapshot of the values a binding depends on, shaped like the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepValues(Value);

impl DepValues {
    pub fn new(values: Value) -> Self {
        Self(values)
    }

    pub fn get(&self, field: impl Into<FieldPath>) -> Option<&Value> {
        path::resolve(&self.0, &field.into())
    }

    pub fn str(&self, field: impl Into<FieldPath>) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn typed<T: DeserializeOwned>(&self, field: impl Into<FieldPath>) -> Option<T> {
        self.get(field)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
