/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Decoding of `AttributeValue`s into Rust values.

use std::collections::HashMap;
use std::num::IntErrorKind;

use aws_sdk_dynamodb::types::AttributeValue;
use tracing::trace;

use crate::config::{DecoderBuilder, DecoderConfig};
use crate::error::DecodeError;
use crate::field::{self, field_mut};
use crate::native::{BytesMut, Native, NumberMut, SeqMut, ShapeMut};
use crate::tag::FieldOptions;
use crate::value::Value;

/// Decodes `AttributeValue`s into Rust values.
///
/// The target is updated in place. Missing attributes leave the corresponding
/// fields untouched, `NULL` attributes reset them to their zero value, and
/// absent `Option`s are allocated as needed.
///
/// ```
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_attribute::{Decoder, Value};
///
/// let mut value = Value::Null;
/// Decoder::new()
///     .decode(&AttributeValue::N("18446744073709551615".into()), &mut value)
///     .unwrap();
/// assert_eq!(Value::Uint(u64::MAX), value);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Creates a decoder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a builder for a decoder.
    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::new()
    }

    /// Creates a decoder from the default configuration adjusted by `configure`.
    pub fn with(configure: impl FnOnce(&mut DecoderConfig)) -> Self {
        let mut config = DecoderConfig::new();
        configure(&mut config);
        Self::from_config(config)
    }

    pub(crate) fn from_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// The configuration of this decoder.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes `value` into `target`.
    pub fn decode<T: Native>(
        &self,
        value: &AttributeValue,
        target: &mut T,
    ) -> Result<(), DecodeError> {
        self.decode_with(value, target, &FieldOptions::default())
    }

    /// Decodes `value` into `target` as if it were a record field carrying `options`.
    pub fn decode_with<T: Native>(
        &self,
        value: &AttributeValue,
        target: &mut T,
        options: &FieldOptions,
    ) -> Result<(), DecodeError> {
        trace!(type_name = target.type_name(), "decoding attribute value");
        self.decode_value(value, target, options)
    }

    /// Decodes the attributes of a `M` attribute value into `target`.
    pub fn decode_map<T: Native>(
        &self,
        map: &HashMap<String, AttributeValue>,
        target: &mut T,
    ) -> Result<(), DecodeError> {
        trace!(type_name = target.type_name(), "decoding attribute map");
        match resolve(target) {
            Resolved::Hook(target) => run_hook(target, &AttributeValue::M(map.clone())),
            Resolved::Shape(ShapeMut::ReadOnly, type_name) => {
                Err(DecodeError::invalid_target(type_name))
            }
            Resolved::Shape(shape, type_name) => self.decode_map_into(map, shape, type_name),
        }
    }

    /// Decodes the elements of a `L` attribute value into `target`.
    pub fn decode_list<T: Native>(
        &self,
        list: &[AttributeValue],
        target: &mut T,
    ) -> Result<(), DecodeError> {
        trace!(type_name = target.type_name(), "decoding attribute list");
        match resolve(target) {
            Resolved::Hook(target) => run_hook(target, &AttributeValue::L(list.to_vec())),
            Resolved::Shape(ShapeMut::ReadOnly, type_name) => {
                Err(DecodeError::invalid_target(type_name))
            }
            Resolved::Shape(shape, type_name) => {
                self.decode_elements(list, shape, "list", type_name)
            }
        }
    }

    /// Decodes a page of items, such as the result of a query or scan, into `target`.
    ///
    /// `target` is resized to the number of items.
    pub fn decode_list_of_maps<T: Native + Default>(
        &self,
        items: &[HashMap<String, AttributeValue>],
        target: &mut Vec<T>,
    ) -> Result<(), DecodeError> {
        target.prepare(items.len());
        for (item, element) in items.iter().zip(target.iter_mut()) {
            self.decode_map(item, element)?;
        }
        Ok(())
    }

    pub(crate) fn decode_value(
        &self,
        value: &AttributeValue,
        target: &mut dyn Native,
        options: &FieldOptions,
    ) -> Result<(), DecodeError> {
        if is_null(value) {
            return decode_null(value, target);
        }
        match resolve(target) {
            Resolved::Hook(target) => run_hook(target, value),
            Resolved::Shape(ShapeMut::ReadOnly, type_name) => {
                Err(DecodeError::invalid_target(type_name))
            }
            Resolved::Shape(shape, type_name) => self.decode_shape(value, shape, type_name, options),
        }
    }

    fn decode_shape(
        &self,
        value: &AttributeValue,
        target: ShapeMut<'_>,
        type_name: &'static str,
        options: &FieldOptions,
    ) -> Result<(), DecodeError> {
        match value {
            AttributeValue::B(blob) => decode_binary(blob.as_ref(), target, type_name),
            AttributeValue::Bool(flag) => match target {
                ShapeMut::Bool(slot) => {
                    *slot = *flag;
                    Ok(())
                }
                ShapeMut::Any(slot) => {
                    *slot = Value::Bool(*flag);
                    Ok(())
                }
                _ => Err(DecodeError::unsupported_shape("bool", type_name)),
            },
            AttributeValue::Bs(set) => {
                let elements: Vec<_> = set.iter().cloned().map(AttributeValue::B).collect();
                self.decode_elements(&elements, target, "binary set", type_name)
            }
            AttributeValue::L(list) => self.decode_elements(list, target, "list", type_name),
            AttributeValue::M(map) => self.decode_map_into(map, target, type_name),
            AttributeValue::N(number) => decode_number(number, target, type_name),
            AttributeValue::Ns(set) => {
                let elements: Vec<_> = set.iter().cloned().map(AttributeValue::N).collect();
                self.decode_elements(&elements, target, "number set", type_name)
            }
            AttributeValue::S(string) if options.as_string => {
                decode_number(string, target, type_name)
            }
            AttributeValue::S(string) => match target {
                ShapeMut::Str(slot) => {
                    slot.clear();
                    slot.push_str(string);
                    Ok(())
                }
                ShapeMut::Any(slot) => {
                    *slot = Value::String(string.clone());
                    Ok(())
                }
                _ => Err(DecodeError::unsupported_shape("string", type_name)),
            },
            AttributeValue::Ss(set) => {
                let elements: Vec<_> = set.iter().cloned().map(AttributeValue::S).collect();
                self.decode_elements(&elements, target, "string set", type_name)
            }
            // null and unknown attributes never reach dispatch
            _ => Ok(()),
        }
    }

    fn decode_elements(
        &self,
        elements: &[AttributeValue],
        target: ShapeMut<'_>,
        wire: &'static str,
        type_name: &'static str,
    ) -> Result<(), DecodeError> {
        let options = FieldOptions::default();
        match target {
            ShapeMut::Any(slot) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    let mut value = Value::Null;
                    self.decode_value(element, &mut value, &options)?;
                    values.push(value);
                }
                *slot = Value::List(values);
                Ok(())
            }
            ShapeMut::Seq(seq) => {
                let len = seq.prepare(elements.len());
                for (index, element) in elements.iter().enumerate().take(len) {
                    if let Some(slot) = seq.get_mut(index) {
                        self.decode_value(element, slot, &options)?;
                    }
                }
                Ok(())
            }
            _ => Err(DecodeError::unsupported_shape(wire, type_name)),
        }
    }

    fn decode_map_into(
        &self,
        map: &HashMap<String, AttributeValue>,
        target: ShapeMut<'_>,
        type_name: &'static str,
    ) -> Result<(), DecodeError> {
        let options = FieldOptions::default();
        match target {
            ShapeMut::Any(slot) => {
                let mut values = HashMap::with_capacity(map.len());
                for (key, element) in map {
                    let mut value = Value::Null;
                    self.decode_value(element, &mut value, &options)?;
                    values.insert(key.clone(), value);
                }
                *slot = Value::Map(values);
                Ok(())
            }
            ShapeMut::Map(target) => {
                let key_type_name = target.key_type_name();
                if !target.string_keyed() {
                    return Err(DecodeError::unsupported_shape("map string key", key_type_name));
                }
                for (key, element) in map {
                    let slot = target
                        .insert_default(key)
                        .ok_or_else(|| DecodeError::unsupported_shape("map string key", key_type_name))?;
                    self.decode_value(element, slot, &options)?;
                }
                Ok(())
            }
            ShapeMut::Record(record) => {
                let fields = field::fields(record.raw_fields(), self.config.marshal_options);
                for (key, element) in map {
                    let Some(field) = fields.get(key) else {
                        continue;
                    };
                    if let Some(slot) = field_mut(&mut *record, field.path()) {
                        self.decode_value(element, slot, &field.options())?;
                    }
                }
                Ok(())
            }
            _ => Err(DecodeError::unsupported_shape("map", type_name)),
        }
    }
}

enum Resolved<'a> {
    Hook(&'a mut dyn Native),
    Shape(ShapeMut<'a>, &'static str),
}

// Follows optional values down to the first value with a hook or a concrete
// shape, allocating absent values on the way.
fn resolve(target: &mut dyn Native) -> Resolved<'_> {
    if target.unmarshaler().is_some() {
        return Resolved::Hook(target);
    }
    let type_name = target.type_name();
    match target.shape_mut() {
        ShapeMut::Indirect(indirect) => resolve(indirect.inner_or_insert()),
        shape => Resolved::Shape(shape, type_name),
    }
}

fn run_hook(target: &mut dyn Native, value: &AttributeValue) -> Result<(), DecodeError> {
    match target.unmarshaler() {
        Some(hook) => hook.unmarshal_attribute_value(value),
        None => Ok(()),
    }
}

fn is_null(value: &AttributeValue) -> bool {
    !matches!(
        value,
        AttributeValue::B(_)
            | AttributeValue::Bool(_)
            | AttributeValue::Bs(_)
            | AttributeValue::L(_)
            | AttributeValue::M(_)
            | AttributeValue::N(_)
            | AttributeValue::Ns(_)
            | AttributeValue::S(_)
            | AttributeValue::Ss(_)
    )
}

// Absent optional values stay absent. A present one is cleared unless it wraps
// another optional value, which is followed instead.
fn decode_null(value: &AttributeValue, target: &mut dyn Native) -> Result<(), DecodeError> {
    if target.unmarshaler().is_some() {
        return run_hook(target, value);
    }
    let type_name = target.type_name();
    match target.shape_mut() {
        ShapeMut::Indirect(indirect) => {
            if !indirect.inner_is_indirection() {
                indirect.clear();
                return Ok(());
            }
            return match indirect.inner_mut() {
                Some(inner) => decode_null(value, inner),
                None => Ok(()),
            };
        }
        ShapeMut::ReadOnly => return Err(DecodeError::invalid_target(type_name)),
        _ => {}
    }
    target.reset();
    Ok(())
}

fn decode_binary(
    bytes: &[u8],
    target: ShapeMut<'_>,
    type_name: &'static str,
) -> Result<(), DecodeError> {
    match target {
        ShapeMut::Any(slot) => {
            *slot = Value::Binary(bytes.to_vec());
            Ok(())
        }
        ShapeMut::Seq(seq) => match seq.bytes_mut() {
            Some(BytesMut::Growable(vec)) => {
                vec.clear();
                vec.extend_from_slice(bytes);
                Ok(())
            }
            Some(BytesMut::Fixed(array)) => {
                let len = array.len().min(bytes.len());
                array[..len].copy_from_slice(&bytes[..len]);
                array[len..].fill(0);
                Ok(())
            }
            None => Err(DecodeError::unsupported_shape("binary", type_name)),
        },
        _ => Err(DecodeError::unsupported_shape("binary", type_name)),
    }
}

fn decode_number(
    text: &str,
    target: ShapeMut<'_>,
    type_name: &'static str,
) -> Result<(), DecodeError> {
    match target {
        ShapeMut::Any(slot) => {
            *slot = number_to_value(text, type_name)?;
            Ok(())
        }
        ShapeMut::Number(slot) => set_number(text, slot, type_name),
        _ => Err(DecodeError::unsupported_shape("number", type_name)),
    }
}

// Signed, then unsigned, then floating point: the first that parses wins.
fn number_to_value(text: &str, type_name: &'static str) -> Result<Value, DecodeError> {
    if let Ok(value) = text.parse::<i64>() {
        return Ok(Value::Int(value));
    }
    if let Ok(value) = text.parse::<u64>() {
        return Ok(Value::Uint(value));
    }
    parse_float(text, type_name).map(Value::Float)
}

fn set_number(
    text: &str,
    slot: NumberMut<'_>,
    type_name: &'static str,
) -> Result<(), DecodeError> {
    match slot {
        NumberMut::I8(slot) => *slot = parse_signed(text, type_name)?,
        NumberMut::I16(slot) => *slot = parse_signed(text, type_name)?,
        NumberMut::I32(slot) => *slot = parse_signed(text, type_name)?,
        NumberMut::I64(slot) => *slot = parse_signed(text, type_name)?,
        NumberMut::Isize(slot) => *slot = parse_signed(text, type_name)?,
        NumberMut::U8(slot) => *slot = parse_unsigned(text, type_name)?,
        NumberMut::U16(slot) => *slot = parse_unsigned(text, type_name)?,
        NumberMut::U32(slot) => *slot = parse_unsigned(text, type_name)?,
        NumberMut::U64(slot) => *slot = parse_unsigned(text, type_name)?,
        NumberMut::Usize(slot) => *slot = parse_unsigned(text, type_name)?,
        NumberMut::F32(slot) => {
            let value = parse_float(text, type_name)?;
            if value.is_finite() && value.abs() > f32::MAX as f64 {
                return Err(DecodeError::overflow(text, type_name));
            }
            *slot = value as f32;
        }
        NumberMut::F64(slot) => *slot = parse_float(text, type_name)?,
    }
    Ok(())
}

fn parse_signed<T: TryFrom<i64>>(text: &str, type_name: &'static str) -> Result<T, DecodeError> {
    let value = text.parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            DecodeError::overflow(text, type_name)
        }
        _ => DecodeError::invalid_number(text, type_name),
    })?;
    T::try_from(value).map_err(|_| DecodeError::overflow(text, type_name))
}

fn parse_unsigned<T: TryFrom<u64>>(text: &str, type_name: &'static str) -> Result<T, DecodeError> {
    let value = text.parse::<u64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow => DecodeError::overflow(text, type_name),
        // negative integers are out of range rather than malformed
        _ if text.parse::<i64>().is_ok() => DecodeError::overflow(text, type_name),
        _ => DecodeError::invalid_number(text, type_name),
    })?;
    T::try_from(value).map_err(|_| DecodeError::overflow(text, type_name))
}

fn parse_float(text: &str, type_name: &'static str) -> Result<f64, DecodeError> {
    let value = text
        .parse::<f64>()
        .map_err(|_| DecodeError::invalid_number(text, type_name))?;
    if value.is_infinite() && !is_infinity_literal(text) {
        return Err(DecodeError::overflow(text, type_name));
    }
    Ok(value)
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}
