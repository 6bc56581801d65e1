// SPDX-License-Identifier: Apache-2.0

//! The lazily iterated value tree.
//!
//! Leaf values are plain data. [`Array`] and [`Object`] are cursors that hold
//! the [`Parser`] mutably and read their children on demand; each child in
//! turn borrows the cursor that produced it. Children must be consumed in
//! document order: a nested container has to be drained before its parent
//! moves on, and a parent advanced past an undrained child fails with
//! [`ParseError::SiblingNotDrained`].

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::number::Int;
use crate::parser::Cursor;
use crate::{ParseError, Parser, Reader};

/// The type of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Null,
    Boolean,
    Int,
    #[cfg(feature = "float")]
    Float,
    String,
    Array,
    Object,
    Mapping,
}

/// One node of the document tree.
pub enum Value<'p, R: Reader> {
    Null,
    Boolean(bool),
    Int(Int),
    #[cfg(feature = "float")]
    Float(f64),
    String(String),
    Array(Array<'p, R>),
    Object(Object<'p, R>),
    /// A member of an object: its key and value.
    Mapping(Mapping<'p, R>),
}

impl<'p, R: Reader> Value<'p, R> {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Int(_) => ValueType::Int,
            #[cfg(feature = "float")]
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
            Value::Mapping(_) => ValueType::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<Int> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as `f64`; integers are converted.
    #[cfg(feature = "float")]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Key of a [`Value::Mapping`].
    pub fn key(&self) -> Option<&str> {
        self.as_mapping().map(Mapping::key)
    }

    pub fn as_mapping(&self) -> Option<&Mapping<'p, R>> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping<'p, R>> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Whether a container (or a mapping holding one) has children left to read.
    ///
    /// Always false for leaf values.
    pub fn has_more(&self) -> bool {
        match self {
            Value::Array(array) => array.has_more(),
            Value::Object(object) => object.has_more(),
            Value::Mapping(mapping) => mapping.value.has_more(),
            _ => false,
        }
    }

    /// Read the next child of a container, or of the container held by a mapping.
    ///
    /// Leaf values have no children and return `Ok(None)`.
    pub fn read_next(&mut self) -> Result<Option<Value<'_, R>>, ParseError> {
        match self {
            Value::Array(array) => array.read_next(),
            Value::Object(object) => object.read_next(),
            Value::Mapping(mapping) => mapping.value.read_next(),
            _ => Ok(None),
        }
    }
}

impl<R: Reader> fmt::Debug for Value<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            #[cfg(feature = "float")]
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Array(array) => fmt::Debug::fmt(array, f),
            Value::Object(object) => fmt::Debug::fmt(object, f),
            Value::Mapping(mapping) => fmt::Debug::fmt(mapping, f),
        }
    }
}

/// A key and the value it maps to, as read from an object.
pub struct Mapping<'p, R: Reader> {
    key: String,
    value: Box<Value<'p, R>>,
}

impl<'p, R: Reader> Mapping<'p, R> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value<'p, R> {
        &self.value
    }

    /// Mutable access, needed to iterate a container value.
    pub fn value_mut(&mut self) -> &mut Value<'p, R> {
        &mut self.value
    }

    pub fn into_value(self) -> Value<'p, R> {
        *self.value
    }

    pub fn into_parts(self) -> (String, Value<'p, R>) {
        (self.key, *self.value)
    }
}

impl<R: Reader> fmt::Debug for Mapping<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapping")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

/// Cursor over the elements of a JSON array.
pub struct Array<'p, R: Reader> {
    parser: &'p mut Parser<R>,
    depth: usize,
    cursor: Cursor,
}

impl<'p, R: Reader> Array<'p, R> {
    pub(crate) fn new(depth: usize, parser: &'p mut Parser<R>) -> Self {
        Self {
            parser,
            depth,
            cursor: Cursor::First,
        }
    }

    /// Whether the closing `]` has not been read yet.
    pub fn has_more(&self) -> bool {
        self.cursor != Cursor::Done
    }

    /// Read the next element, or `None` once the closing `]` was consumed.
    ///
    /// The element borrows this cursor; a container element must be drained
    /// before the call after this one.
    pub fn read_next(&mut self) -> Result<Option<Value<'_, R>>, ParseError> {
        if self.cursor == Cursor::Done {
            return Ok(None);
        }
        let (depth, cursor) = (self.depth, self.cursor);
        match self.parser.guarded(|parser| parser.array_step(depth, cursor))? {
            Some(node) => {
                self.cursor = Cursor::Subsequent;
                Ok(Some(self.parser.open(node)))
            }
            None => {
                self.cursor = Cursor::Done;
                Ok(None)
            }
        }
    }
}

impl<R: Reader> fmt::Debug for Array<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("depth", &self.depth)
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// Cursor over the members of a JSON object, each read as a [`Value::Mapping`].
pub struct Object<'p, R: Reader> {
    parser: &'p mut Parser<R>,
    depth: usize,
    cursor: Cursor,
}

impl<'p, R: Reader> Object<'p, R> {
    pub(crate) fn new(depth: usize, parser: &'p mut Parser<R>) -> Self {
        Self {
            parser,
            depth,
            cursor: Cursor::First,
        }
    }

    /// Whether the closing `}` has not been read yet.
    pub fn has_more(&self) -> bool {
        self.cursor != Cursor::Done
    }

    /// Read the next member as a [`Value::Mapping`], or `None` once the
    /// closing `}` was consumed.
    pub fn read_next(&mut self) -> Result<Option<Value<'_, R>>, ParseError> {
        if self.cursor == Cursor::Done {
            return Ok(None);
        }
        let (depth, cursor) = (self.depth, self.cursor);
        match self.parser.guarded(|parser| parser.object_step(depth, cursor))? {
            Some((key, node)) => {
                self.cursor = Cursor::Subsequent;
                let value = Box::new(self.parser.open(node));
                Ok(Some(Value::Mapping(Mapping { key, value })))
            }
            None => {
                self.cursor = Cursor::Done;
                Ok(None)
            }
        }
    }
}

impl<R: Reader> fmt::Debug for Object<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("depth", &self.depth)
            .field("cursor", &self.cursor)
            .finish()
    }
}
