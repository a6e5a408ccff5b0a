/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

//! Conversion between Rust values and DynamoDB `AttributeValue`s.
//!
//! [`marshal`] and [`unmarshal`] convert single values; [`marshal_map`],
//! [`unmarshal_map`] and [`unmarshal_list_of_maps`] work on whole items.
//! Records are described with `#[derive(Record)]`:
//!
//! ```
//! use dynamodb_attribute::{marshal_map, unmarshal_map, Record};
//!
//! #[derive(Record, Default, Debug, PartialEq)]
//! struct Order {
//!     #[dynamodbav = "id"]
//!     pub id: String,
//!     #[dynamodbav = "total,omitempty"]
//!     pub total: u64,
//!     #[dynamodbav = "tags,stringset,omitempty"]
//!     pub tags: Vec<String>,
//! }
//!
//! let order = Order { id: "o-1".into(), total: 0, tags: vec!["new".into()] };
//! let item = marshal_map(&order).unwrap();
//! assert!(!item.contains_key("total"));
//!
//! let mut decoded = Order::default();
//! unmarshal_map(&item, &mut decoded).unwrap();
//! assert_eq!(order, decoded);
//! ```
//!
//! Field names and options come from `dynamodbav` attributes, falling back to
//! `json` attributes when [`MarshalOptions::support_json_tags`] is enabled.
//! See [`FieldTag`] for the tag syntax.

// Lets derived records in unit tests refer to `::dynamodb_attribute`.
#[cfg(test)]
extern crate self as dynamodb_attribute;

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

mod config;
mod decode;
mod encode;
mod error;
mod field;
mod hook;
mod native;
mod tag;
mod value;

pub use config::{DecoderBuilder, DecoderConfig, EncoderBuilder, EncoderConfig, MarshalOptions};
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{BoxError, DecodeError, DecodeErrorKind, EncodeError, EncodeErrorKind};
pub use field::{fields, resolve_fields, Field, Fields, RawField};
pub use hook::{Marshaler, Unmarshaler};
pub use native::{
    is_zero_value, BytesMut, Indirect, MapKey, MapMut, MapRef, Native, Number, NumberMut, Record,
    RecordFields, SeqMut, SeqRef, Shape, ShapeMut,
};
pub use tag::{FieldOptions, FieldTag};
pub use value::Value;

/// Derives [`Native`], [`Record`] and [`RecordFields`] for a struct.
///
/// Field attributes:
/// - `#[dynamodbav = "name,option,..."]` names the attribute and sets its options.
/// - `#[dynamodbav(flatten)]` promotes the fields of a nested record, unless
///   the field is also given a name.
/// - `#[json = "name,option,..."]` is used when the field has no `dynamodbav` tag.
///
/// Container attributes `#[dynamodbav(marshaler)]` and
/// `#[dynamodbav(unmarshaler)]` route the struct through its own
/// [`Marshaler`] and [`Unmarshaler`] implementations.
pub use dynamodb_attribute_macros::Record;

/// Encodes `value` with the default [`Encoder`].
pub fn marshal<T: Native>(value: &T) -> Result<AttributeValue, EncodeError> {
    Encoder::new().encode(value)
}

/// Encodes `value` into the attributes of an item.
///
/// Values that do not encode to a map produce an empty item.
pub fn marshal_map<T: Native>(value: &T) -> Result<HashMap<String, AttributeValue>, EncodeError> {
    Encoder::new().encode_map(value)
}

/// Encodes `value` into the elements of a list.
///
/// Values that do not encode to a list produce no elements.
pub fn marshal_list<T: Native>(value: &T) -> Result<Vec<AttributeValue>, EncodeError> {
    Encoder::new().encode_list(value)
}

/// Decodes `value` into `target` with the default [`Decoder`].
pub fn unmarshal<T: Native>(value: &AttributeValue, target: &mut T) -> Result<(), DecodeError> {
    Decoder::new().decode(value, target)
}

/// Decodes the attributes of an item into `target`.
pub fn unmarshal_map<T: Native>(
    item: &HashMap<String, AttributeValue>,
    target: &mut T,
) -> Result<(), DecodeError> {
    Decoder::new().decode_map(item, target)
}

/// Decodes the elements of a list into `target`.
pub fn unmarshal_list<T: Native>(
    list: &[AttributeValue],
    target: &mut T,
) -> Result<(), DecodeError> {
    Decoder::new().decode_list(list, target)
}

/// Decodes a page of items into `target`.
pub fn unmarshal_list_of_maps<T: Native + Default>(
    items: &[HashMap<String, AttributeValue>],
    target: &mut Vec<T>,
) -> Result<(), DecodeError> {
    Decoder::new().decode_list_of_maps(items, target)
}
