use std::fmt::{Display, Formatter};

use serde_json::{Map, Value};

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        Self::Key(value.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

/// Location of a value inside a form store.
///
/// A single key is a one-segment path; nested object properties and array
/// elements extend it. Two paths name the same field only when their segments
/// are equal.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self(vec![PathSegment::Key(key.into())])
    }

    pub fn join(mut self, segment: impl Into<PathSegment>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// True when a change at one path can change the value seen at the other.
    pub fn overlaps(&self, other: &FieldPath) -> bool {
        self.starts_with(other) || other.starts_with(self)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        Self::key(value)
    }
}

impl From<String> for FieldPath {
    fn from(value: String) -> Self {
        Self::key(value)
    }
}

impl From<usize> for FieldPath {
    fn from(value: usize) -> Self {
        Self(vec![PathSegment::Index(value)])
    }
}

impl From<PathSegment> for FieldPath {
    fn from(value: PathSegment) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<PathSegment>> for FieldPath {
    fn from(value: Vec<PathSegment>) -> Self {
        Self(value)
    }
}

impl<const N: usize> From<[PathSegment; N]> for FieldPath {
    fn from(value: [PathSegment; N]) -> Self {
        Self(value.into())
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(value: &FieldPath) -> Self {
        value.clone()
    }
}

/// Builds a [`FieldPath`](crate::form::FieldPath) from keys and indices:
/// `field_path!["users", 0, "name"]`.
#[macro_export]
macro_rules! field_path {
    ($($segment:expr),+ $(,)?) => {
        $crate::form::FieldPath::from(::std::vec![
            $($crate::form::PathSegment::from($segment)),+
        ])
    };
}

/// Looks up the value at `path`.
///
/// Missing keys, out-of-range indices and descending through `null` or a
/// scalar all yield `None`. Falsy values (`0`, `false`, `""`) are ordinary
/// intermediates.
pub fn resolve<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |current, segment| step(current, segment))
}

fn step<'a>(current: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (current, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Object(map), PathSegment::Index(index)) => map.get(&index.to_string()),
        (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
        (Value::Array(items), PathSegment::Key(key)) => {
            key.parse::<usize>().ok().and_then(|index| items.get(index))
        }
        _ => None,
    }
}

pub(crate) fn assign(root: &mut Value, path: &FieldPath, value: Value) {
    let mut current = root;
    for segment in path.segments() {
        current = slot_mut(current, segment);
    }
    *current = value;
}

pub(crate) fn remove(root: &mut Value, path: &FieldPath) -> Option<Value> {
    let (last, parents) = path.segments().split_last()?;
    let mut current = root;
    for segment in parents {
        current = step_mut(current, segment)?;
    }
    match (current, last) {
        (Value::Object(map), PathSegment::Key(key)) => map.shift_remove(key),
        (Value::Object(map), PathSegment::Index(index)) => map.shift_remove(&index.to_string()),
        (Value::Array(items), PathSegment::Index(index)) => {
            items.get_mut(*index).map(|slot| slot.take())
        }
        (Value::Array(items), PathSegment::Key(key)) => key
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get_mut(index))
            .map(|slot| slot.take()),
        _ => None,
    }
}

/// Nested partial copy of `root` holding only `paths`. Paths without a value
/// are left out.
pub(crate) fn pick<'p>(root: &Value, paths: impl IntoIterator<Item = &'p FieldPath>) -> Value {
    let mut picked = Value::Object(Map::new());
    for path in paths {
        if let Some(value) = resolve(root, path) {
            assign(&mut picked, path, value.clone());
        }
    }
    picked
}

/// Deep-merges `patch` into `target`: objects merge key by key, everything
/// else replaces.
pub(crate) fn merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

fn step_mut<'a>(current: &'a mut Value, segment: &PathSegment) -> Option<&'a mut Value> {
    match (current, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get_mut(key),
        (Value::Object(map), PathSegment::Index(index)) => map.get_mut(&index.to_string()),
        (Value::Array(items), PathSegment::Index(index)) => items.get_mut(*index),
        (Value::Array(items), PathSegment::Key(key)) => key
            .parse::<usize>()
            .ok()
            .and_then(move |index| items.get_mut(index)),
        _ => None,
    }
}

fn slot_mut<'a>(current: &'a mut Value, segment: &PathSegment) -> &'a mut Value {
    match segment {
        PathSegment::Index(index) => {
            if !current.is_array() && !current.is_object() {
                *current = Value::Array(Vec::new());
            }
            match current {
                Value::Array(items) => {
                    if items.len() <= *index {
                        items.resize(index + 1, Value::Null);
                    }
                    &mut items[*index]
                }
                Value::Object(map) => map.entry(index.to_string()).or_insert(Value::Null),
                other => other,
            }
        }
        PathSegment::Key(key) => {
            let array_index = match (current.is_array(), key.parse::<usize>()) {
                (true, Ok(index)) => Some(index),
                _ => None,
            };
            if let Some(index) = array_index {
                return slot_mut(current, &PathSegment::Index(index));
            }
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            match current {
                Value::Object(map) => map.entry(key.clone()).or_insert(Value::Null),
                other => other,
            }
        }
    }
}
