/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Structural views of Rust values used by the encoder and decoder.
//!
//! Every encodable or decodable type implements [`Native`], which describes the
//! value as a [`Shape`] for reading and a [`ShapeMut`] for writing. Records are
//! usually described with `#[derive(Record)]`; the standard library types are
//! covered by the implementations in this module.

use std::fmt;

use crate::field::RawField;
use crate::hook::{Marshaler, Unmarshaler};
use crate::value::Value;

mod collection;
mod pointer;
mod primitive;
mod unsupported;

/// A Rust value that can be encoded to or decoded from an `AttributeValue`.
pub trait Native {
    /// Returns a read-only view of this value.
    fn shape(&self) -> Shape<'_>;

    /// Returns a writable view of this value.
    fn shape_mut(&mut self) -> ShapeMut<'_>;

    /// Sets this value to the zero value of its type.
    fn reset(&mut self);

    /// The Rust type name used in error messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Custom encoding for this value, consulted before the default encoding.
    fn marshaler(&self) -> Option<&dyn Marshaler> {
        None
    }

    /// Custom decoding for this value, consulted before the default decoding.
    fn unmarshaler(&mut self) -> Option<&mut dyn Unmarshaler> {
        None
    }

    #[doc(hidden)]
    fn slice_as_bytes(_slice: &[Self]) -> Option<&[u8]>
    where
        Self: Sized,
    {
        None
    }

    #[doc(hidden)]
    fn slice_as_bytes_mut(_slice: &mut [Self]) -> Option<&mut [u8]>
    where
        Self: Sized,
    {
        None
    }

    #[doc(hidden)]
    fn vec_as_bytes_mut(_vec: &mut Vec<Self>) -> Option<&mut Vec<u8>>
    where
        Self: Sized,
    {
        None
    }

    #[doc(hidden)]
    fn is_byte_sequence() -> bool
    where
        Self: Sized,
    {
        false
    }

    #[doc(hidden)]
    fn is_indirection() -> bool
    where
        Self: Sized,
    {
        false
    }
}

/// Read-only view of a [`Native`] value.
#[non_exhaustive]
pub enum Shape<'a> {
    /// An absent value, such as `None` or [`Value::Null`].
    Null,
    /// A present pointer-like value wrapping another value.
    Indirect(&'a dyn Native),
    /// A record with named fields.
    Record(&'a dyn Record),
    /// A dynamically keyed map.
    Map(&'a dyn MapRef),
    /// A growable or fixed-size sequence.
    Seq(&'a dyn SeqRef),
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(Number),
    /// A string.
    Str(&'a str),
    /// A value with no attribute value representation.
    Unsupported(&'static str),
}

impl fmt::Debug for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Null => f.write_str("Null"),
            Shape::Indirect(inner) => f.debug_tuple("Indirect").field(&inner.type_name()).finish(),
            Shape::Record(record) => f
                .debug_tuple("Record")
                .field(&record.raw_fields().len())
                .finish(),
            Shape::Map(map) => f.debug_tuple("Map").field(&map.len()).finish(),
            Shape::Seq(seq) => f.debug_tuple("Seq").field(&seq.len()).finish(),
            Shape::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Shape::Number(value) => f.debug_tuple("Number").field(value).finish(),
            Shape::Str(value) => f.debug_tuple("Str").field(value).finish(),
            Shape::Unsupported(name) => f.debug_tuple("Unsupported").field(name).finish(),
        }
    }
}

/// Writable view of a [`Native`] value.
#[non_exhaustive]
pub enum ShapeMut<'a> {
    /// An optional value that may need to be allocated or cleared.
    Indirect(&'a mut dyn Indirect),
    /// A record with named fields.
    Record(&'a mut dyn Record),
    /// A dynamically keyed map.
    Map(&'a mut dyn MapMut),
    /// A growable or fixed-size sequence.
    Seq(&'a mut dyn SeqMut),
    /// A boolean.
    Bool(&'a mut bool),
    /// A number.
    Number(NumberMut<'a>),
    /// A string.
    Str(&'a mut String),
    /// A dynamically typed value.
    Any(&'a mut Value),
    /// A value that cannot be written through, such as a shared reference.
    ReadOnly,
    /// A value with no attribute value representation.
    Unsupported,
}

impl fmt::Debug for ShapeMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeMut::Indirect(_) => "Indirect",
            ShapeMut::Record(_) => "Record",
            ShapeMut::Map(_) => "Map",
            ShapeMut::Seq(_) => "Seq",
            ShapeMut::Bool(_) => "Bool",
            ShapeMut::Number(_) => "Number",
            ShapeMut::Str(_) => "Str",
            ShapeMut::Any(_) => "Any",
            ShapeMut::ReadOnly => "ReadOnly",
            ShapeMut::Unsupported => "Unsupported",
        };
        f.write_str(name)
    }
}

/// A number read from a Rust value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    Uint(u64),
    /// A 32-bit float.
    F32(f32),
    /// A 64-bit float.
    F64(f64),
}

impl Number {
    /// Returns true if this number is zero.
    pub fn is_zero(&self) -> bool {
        match *self {
            Number::Int(value) => value == 0,
            Number::Uint(value) => value == 0,
            Number::F32(value) => value == 0.0,
            Number::F64(value) => value == 0.0,
        }
    }

    /// Returns false for NaN and infinite floats.
    pub fn is_finite(&self) -> bool {
        match *self {
            Number::Int(_) | Number::Uint(_) => true,
            Number::F32(value) => value.is_finite(),
            Number::F64(value) => value.is_finite(),
        }
    }

    /// Formats this number as the decimal text carried by an `N` attribute.
    ///
    /// Floats use the shortest representation that round trips, without an exponent.
    pub fn to_text(&self) -> String {
        match *self {
            Number::Int(value) => value.to_string(),
            Number::Uint(value) => value.to_string(),
            Number::F32(value) => value.to_string(),
            Number::F64(value) => value.to_string(),
        }
    }
}

/// A writable numeric slot.
#[derive(Debug)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum NumberMut<'a> {
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
}

/// A record type with a fixed set of fields.
///
/// Implemented by `#[derive(Record)]`. Field indices refer to positions in
/// [`Record::raw_fields`].
pub trait Record {
    /// Declared fields of this record, in declaration order.
    fn raw_fields(&self) -> &'static [RawField];

    /// Returns the field at `index`.
    fn field(&self, index: usize) -> Option<&dyn Native>;

    /// Returns the field at `index` for writing.
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Native>;
}

/// Type-level access to a record's declared fields.
///
/// Used to resolve the fields of flattened records without a value at hand.
pub trait RecordFields {
    /// Declared fields of this record, in declaration order.
    fn record_fields() -> &'static [RawField];
}

/// Read access to a dynamically keyed map.
pub trait MapRef {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns true if the map has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the entries with stringified keys.
    fn entries(&self) -> Box<dyn Iterator<Item = (String, &dyn Native)> + '_>;
}

/// Write access to a dynamically keyed map.
pub trait MapMut {
    /// Whether the key type can be built from an attribute name.
    fn string_keyed(&self) -> bool;

    /// The Rust type name of the key.
    fn key_type_name(&self) -> &'static str;

    /// Stores a default value under `key`, replacing any existing entry, and
    /// returns it for decoding.
    fn insert_default(&mut self, key: &str) -> Option<&mut dyn Native>;
}

/// A type usable as the key of an encodable map.
pub trait MapKey {
    /// Whether keys can be decoded from attribute names.
    const STRING_KEYED: bool = false;

    /// Formats the key as an attribute name.
    fn to_key(&self) -> String;

    /// Builds a key from an attribute name.
    fn from_key(_key: &str) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

/// Read access to a sequence.
pub trait SeqRef {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns true if the sequence has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index`.
    fn get(&self, index: usize) -> Option<&dyn Native>;

    /// The sequence as raw bytes, when its elements are `u8`.
    fn as_bytes(&self) -> Option<&[u8]>;

    /// Whether every element is itself a byte sequence.
    fn elements_are_bytes(&self) -> bool;
}

/// Write access to a sequence.
pub trait SeqMut {
    /// Makes room for `len` elements and returns how many can be written.
    ///
    /// Growable sequences are resized to `len`, keeping existing elements.
    /// Fixed-size sequences keep their length and reset the elements past `len`.
    fn prepare(&mut self, len: usize) -> usize;

    /// Returns the element at `index` for writing.
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Native>;

    /// The sequence as raw bytes, when its elements are `u8`.
    fn bytes_mut(&mut self) -> Option<BytesMut<'_>>;
}

/// Writable raw bytes of a sequence.
#[derive(Debug)]
pub enum BytesMut<'a> {
    /// A growable byte vector.
    Growable(&'a mut Vec<u8>),
    /// A fixed-size byte array.
    Fixed(&'a mut [u8]),
}

/// Write access to an optional value.
pub trait Indirect {
    /// Whether the wrapped type is itself optional.
    fn inner_is_indirection(&self) -> bool;

    /// Clears the value.
    fn clear(&mut self);

    /// The wrapped value, if present.
    fn inner_mut(&mut self) -> Option<&mut dyn Native>;

    /// The wrapped value, allocating a default one if absent.
    fn inner_or_insert(&mut self) -> &mut dyn Native;
}

/// Returns true if `value` is the zero value of its kind.
///
/// Absent values, `false`, numeric zero, empty strings, empty sequences and
/// empty maps are zero. Records are never zero. Present pointers are zero when
/// the value they point to is.
pub fn is_zero_value(value: &dyn Native) -> bool {
    match value.shape() {
        Shape::Null => true,
        Shape::Indirect(inner) => is_zero_value(inner),
        Shape::Record(_) => false,
        Shape::Map(map) => map.is_empty(),
        Shape::Seq(seq) => seq.is_empty(),
        Shape::Bool(value) => !value,
        Shape::Number(number) => number.is_zero(),
        Shape::Str(value) => value.is_empty(),
        Shape::Unsupported(_) => false,
    }
}
