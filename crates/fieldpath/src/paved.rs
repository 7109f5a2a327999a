//! Reading and writing values by field path.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::segment::{Segment, Segments};

/// Minimal read/write capability over a structured document.
///
/// `get_path` distinguishes an absent path (`Ok(None)`) from a malformed path or a
/// document of the wrong shape (`Err`).
pub trait FieldAccess {
    /// Read the value at `path`.
    fn get_path(&self, path: &str) -> Result<Option<Value>>;

    /// Write `value` at `path`, creating intermediate containers as needed.
    fn set_path(&mut self, path: &str, value: Value) -> Result<()>;
}

/// Name of a JSON value's type, used in error messages.
pub const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Look up `segments` in `root`.
pub fn get_in<'v>(root: &'v Value, segments: &Segments) -> Result<&'v Value> {
    let mut current = root;
    for (i, segment) in segments.as_slice().iter().enumerate() {
        let depth = i.saturating_add(1);
        current = match segment {
            Segment::Field(name) => {
                let Value::Object(object) = current else {
                    return Err(Error::not_an_object(segments.prefix(i)));
                };
                object
                    .get(name)
                    .ok_or_else(|| Error::no_such_field(segments.prefix(depth)))?
            }
            Segment::Index(index) => {
                let Value::Array(items) = current else {
                    return Err(Error::not_an_array(segments.prefix(i)));
                };
                items
                    .get(*index)
                    .ok_or_else(|| Error::no_such_element(segments.prefix(depth)))?
            }
        };
    }
    Ok(current)
}

/// Largest array index a write may address.
pub const MAX_ARRAY_INDEX: usize = 1_000_000;

/// Write `value` at `segments` inside `root`.
///
/// Intermediate fields are created as objects or arrays depending on the
/// segment that follows them; an existing intermediate of the wrong kind is
/// replaced. Arrays are padded with `null` up to the addressed index.
/// Indices above [`MAX_ARRAY_INDEX`] are rejected before anything is written.
pub fn set_in(root: &mut Value, segments: &Segments, value: Value) -> Result<()> {
    if segments.is_empty() {
        return Err(Error::EmptyPath);
    }
    if let Some((depth, index)) = segments
        .as_slice()
        .iter()
        .enumerate()
        .find_map(|(depth, segment)| match segment {
            Segment::Index(index) if *index > MAX_ARRAY_INDEX => Some((depth, *index)),
            _ => None,
        })
    {
        return Err(Error::array_too_large(segments.prefix(depth), index));
    }
    set_recursive(root, segments, 0, value)
}

fn set_recursive(current: &mut Value, segments: &Segments, depth: usize, value: Value) -> Result<()> {
    let rest = segments.as_slice().get(depth..).unwrap_or_default();
    let Some((head, tail)) = rest.split_first() else {
        *current = value;
        return Ok(());
    };

    let child = match head {
        Segment::Field(name) => {
            let Value::Object(object) = current else {
                return Err(Error::not_an_object(segments.prefix(depth)));
            };
            object.entry(name.clone()).or_insert(Value::Null)
        }
        Segment::Index(index) => {
            let Value::Array(items) = current else {
                return Err(Error::not_an_array(segments.prefix(depth)));
            };
            grow(items, *index).map_err(|()| Error::array_too_large(segments.prefix(depth), *index))?;
            items
                .get_mut(*index)
                .ok_or_else(|| Error::no_such_element(segments.prefix(depth.saturating_add(1))))?
        }
    };

    if let Some(next) = tail.first() {
        prepare(child, next)
            .map_err(|index| Error::array_too_large(segments.prefix(depth.saturating_add(1)), index))?;
    }
    set_recursive(child, segments, depth.saturating_add(1), value)
}

/// Shape `child` for the segment that follows it. Fails with the index an
/// array could not grow to.
fn prepare(child: &mut Value, next: &Segment) -> std::result::Result<(), usize> {
    match next {
        Segment::Field(_) => {
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            Ok(())
        }
        Segment::Index(index) => {
            if !child.is_array() {
                *child = Value::Array(Vec::new());
            }
            match child {
                Value::Array(items) => grow(items, *index).map_err(|()| *index),
                _ => Ok(()),
            }
        }
    }
}

fn grow(items: &mut Vec<Value>, index: usize) -> std::result::Result<(), ()> {
    if items.len() > index {
        return Ok(());
    }
    let len = index.checked_add(1).ok_or(())?;
    let additional = len.saturating_sub(items.len());
    items.try_reserve(additional).map_err(|_| ())?;
    items.resize(len, Value::Null);
    Ok(())
}

/// A document that can be read and written by field path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paved {
    object: Value,
}

impl Paved {
    /// Wrap an unstructured document.
    pub const fn new(object: Value) -> Self {
        Self { object }
    }

    /// Borrow the underlying document.
    pub const fn object(&self) -> &Value {
        &self.object
    }

    /// Take back the underlying document.
    pub fn into_inner(self) -> Value {
        self.object
    }

    /// Get the value at `path`; absent paths produce an error for which
    /// [`Error::is_not_found`] is true.
    pub fn get_value(&self, path: &str) -> Result<Value> {
        let segments = Segments::parse(path)?;
        get_in(&self.object, &segments).cloned()
    }

    /// Get the string at `path`.
    pub fn get_string(&self, path: &str) -> Result<String> {
        match self.get_value(path)? {
            Value::String(s) => Ok(s),
            other => Err(Error::type_mismatch(path, "string", type_name(&other))),
        }
    }

    /// Get the integer at `path`.
    pub fn get_integer(&self, path: &str) -> Result<i64> {
        let value = self.get_value(path)?;
        value
            .as_i64()
            .ok_or_else(|| Error::type_mismatch(path, "integer", type_name(&value)))
    }

    /// Set the value at `path`.
    pub fn set_value(&mut self, path: &str, value: Value) -> Result<()> {
        let segments = Segments::parse(path)?;
        set_in(&mut self.object, &segments, value)
    }
}

impl From<Value> for Paved {
    fn from(object: Value) -> Self {
        Self::new(object)
    }
}

impl FieldAccess for Paved {
    fn get_path(&self, path: &str) -> Result<Option<Value>> {
        self.object.get_path(path)
    }

    fn set_path(&mut self, path: &str, value: Value) -> Result<()> {
        self.set_value(path, value)
    }
}

impl FieldAccess for Value {
    fn get_path(&self, path: &str) -> Result<Option<Value>> {
        let segments = Segments::parse(path)?;
        match get_in(self, &segments) {
            Ok(value) => Ok(Some(value.clone())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set_path(&mut self, path: &str, value: Value) -> Result<()> {
        let segments = Segments::parse(path)?;
        set_in(self, &segments, value)
    }
}
