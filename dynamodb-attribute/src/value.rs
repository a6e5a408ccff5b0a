/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;

use crate::native::{Native, Number, Shape, ShapeMut};

/// Dynamically typed value.
///
/// `Value` is the decode target to use when the attribute type is not known
/// ahead of time. Numbers are decoded into the narrowest of [`Value::Int`],
/// [`Value::Uint`] and [`Value::Float`] that can hold them, tried in that
/// order. Sets decode into [`Value::List`], keeping the scalar kind of their
/// elements.
///
/// `Value` is also encodable, so decoded values can be written back.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null attribute
    #[default]
    Null,
    /// Binary attribute
    Binary(Vec<u8>),
    /// Boolean attribute
    Bool(bool),
    /// Number that fits in a signed 64-bit integer
    Int(i64),
    /// Number that only fits in an unsigned 64-bit integer
    Uint(u64),
    /// Number with a fractional part or exponent
    Float(f64),
    /// String attribute
    String(String),
    /// List, or the elements of a set
    List(Vec<Value>),
    /// Map attribute
    Map(HashMap<String, Value>),
}

impl Value {
    /// Returns true if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl Native for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Null => Shape::Null,
            Value::Binary(bytes) => Shape::Seq(bytes),
            Value::Bool(value) => Shape::Bool(*value),
            Value::Int(value) => Shape::Number(Number::Int(*value)),
            Value::Uint(value) => Shape::Number(Number::Uint(*value)),
            Value::Float(value) => Shape::Number(Number::F64(*value)),
            Value::String(value) => Shape::Str(value),
            Value::List(values) => Shape::Seq(values),
            Value::Map(values) => Shape::Map(values),
        }
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Any(self)
    }

    fn reset(&mut self) {
        *self = Value::Null;
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Binary(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(values: HashMap<String, Value>) -> Self {
        Value::Map(values)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}
