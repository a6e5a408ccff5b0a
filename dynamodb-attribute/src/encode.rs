/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Encoding of Rust values into `AttributeValue`s.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::{debug, trace};

use crate::config::{EncoderBuilder, EncoderConfig};
use crate::error::EncodeError;
use crate::field::{self, field_ref};
use crate::native::{is_zero_value, MapRef, Native, Number, Record, SeqRef, Shape};
use crate::tag::FieldOptions;

/// Encodes Rust values into `AttributeValue`s.
///
/// ```
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_attribute::{Encoder, Record};
///
/// #[derive(Record)]
/// struct Song {
///     pub title: String,
///     #[dynamodbav = "plays,omitempty"]
///     pub play_count: u32,
/// }
///
/// let encoder = Encoder::builder().null_empty_string(false).build();
/// let item = encoder
///     .encode_map(&Song { title: "Hey".into(), play_count: 0 })
///     .unwrap();
/// assert_eq!(Some(&AttributeValue::S("Hey".into())), item.get("title"));
/// assert!(!item.contains_key("plays"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    /// Creates an encoder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a builder for an encoder.
    pub fn builder() -> EncoderBuilder {
        EncoderBuilder::new()
    }

    /// Creates an encoder from the default configuration adjusted by `configure`.
    pub fn with(configure: impl FnOnce(&mut EncoderConfig)) -> Self {
        let mut config = EncoderConfig::new();
        configure(&mut config);
        Self::from_config(config)
    }

    pub(crate) fn from_config(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// The configuration of this encoder.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encodes `value`.
    pub fn encode<T: Native>(&self, value: &T) -> Result<AttributeValue, EncodeError> {
        self.encode_with(value, &FieldOptions::default())
    }

    /// Encodes `value` as if it were a record field carrying `options`.
    pub fn encode_with<T: Native>(
        &self,
        value: &T,
        options: &FieldOptions,
    ) -> Result<AttributeValue, EncodeError> {
        trace!(type_name = value.type_name(), "encoding value");
        self.encode_value(value, options)
    }

    /// Encodes `value` into the attributes of a `M` attribute value.
    ///
    /// Returns an empty map if `value` does not encode to a map.
    pub fn encode_map<T: Native>(
        &self,
        value: &T,
    ) -> Result<HashMap<String, AttributeValue>, EncodeError> {
        match self.encode(value)? {
            AttributeValue::M(map) => Ok(map),
            _ => Ok(HashMap::new()),
        }
    }

    /// Encodes `value` into the elements of a `L` attribute value.
    ///
    /// Returns an empty list if `value` does not encode to a list.
    pub fn encode_list<T: Native>(&self, value: &T) -> Result<Vec<AttributeValue>, EncodeError> {
        match self.encode(value)? {
            AttributeValue::L(list) => Ok(list),
            _ => Ok(Vec::new()),
        }
    }

    pub(crate) fn encode_value(
        &self,
        value: &dyn Native,
        options: &FieldOptions,
    ) -> Result<AttributeValue, EncodeError> {
        let mut value = value;
        let shape = loop {
            if let Some(marshaler) = value.marshaler() {
                return marshaler.marshal_attribute_value();
            }
            match value.shape() {
                Shape::Indirect(inner) => value = inner,
                shape => break shape,
            }
        };

        if options.omit_empty && is_zero_value(value) {
            return Ok(null());
        }

        match shape {
            Shape::Null | Shape::Indirect(_) => Ok(null()),
            Shape::Record(record) => self.encode_record(record, value.type_name()),
            Shape::Map(map) => self.encode_map_entries(map, value.type_name(), options),
            Shape::Seq(seq) => self.encode_seq(seq, options),
            Shape::Bool(value) => Ok(AttributeValue::Bool(value)),
            Shape::Number(number) => encode_number(number, options),
            Shape::Str(value) if value.is_empty() && self.config.null_empty_string => Ok(null()),
            Shape::Str(value) => Ok(AttributeValue::S(value.to_string())),
            Shape::Unsupported(type_name) => Err(EncodeError::unsupported_native_kind(type_name)),
        }
    }

    fn encode_record(
        &self,
        record: &dyn Record,
        type_name: &'static str,
    ) -> Result<AttributeValue, EncodeError> {
        let fields = field::fields(record.raw_fields(), self.config.marshal_options);
        let mut map = HashMap::with_capacity(fields.len());
        for field in fields.iter() {
            if field.name().is_empty() {
                return Err(EncodeError::invalid_field_name(type_name));
            }
            // absent flattened record
            let Some(value) = field_ref(record, field.path()) else {
                continue;
            };
            let options = field.options();
            let encoded = self.encode_value(value, &options);
            if let Some(encoded) = keep_or_omit(options.omit_empty, encoded)? {
                map.insert(field.name().to_string(), encoded);
            }
        }
        Ok(map_or_null(map))
    }

    fn encode_map_entries(
        &self,
        entries: &dyn MapRef,
        type_name: &'static str,
        options: &FieldOptions,
    ) -> Result<AttributeValue, EncodeError> {
        let mut map = HashMap::with_capacity(entries.len());
        for (key, value) in entries.entries() {
            if key.is_empty() {
                return Err(EncodeError::invalid_field_name(type_name));
            }
            let encoded = self.encode_value(value, &FieldOptions::default());
            if let Some(encoded) = keep_or_omit(options.omit_empty_elem, encoded)? {
                map.insert(key, encoded);
            }
        }
        Ok(map_or_null(map))
    }

    fn encode_seq(
        &self,
        seq: &dyn SeqRef,
        options: &FieldOptions,
    ) -> Result<AttributeValue, EncodeError> {
        if let Some(bytes) = seq.as_bytes() {
            if bytes.is_empty() {
                return Ok(null());
            }
            return Ok(AttributeValue::B(Blob::new(bytes)));
        }

        let element_options = options.for_elements();
        let mut elements = Vec::with_capacity(seq.len());
        for index in 0..seq.len() {
            let Some(element) = seq.get(index) else {
                continue;
            };
            let encoded = self.encode_value(element, &element_options);
            if let Some(encoded) = keep_or_omit(options.omit_empty_elem, encoded)? {
                elements.push(encoded);
            }
        }

        if elements.is_empty() {
            return Ok(null());
        }
        if options.as_binary_set || seq.elements_are_bytes() {
            collect_set(elements, "BS", |element| match element {
                AttributeValue::B(blob) => Ok(blob),
                other => Err(other),
            })
            .map(AttributeValue::Bs)
        } else if options.as_number_set {
            collect_set(elements, "NS", |element| match element {
                AttributeValue::N(number) => Ok(number),
                other => Err(other),
            })
            .map(AttributeValue::Ns)
        } else if options.as_string_set {
            collect_set(elements, "SS", |element| match element {
                AttributeValue::S(string) => Ok(string),
                other => Err(other),
            })
            .map(AttributeValue::Ss)
        } else {
            Ok(AttributeValue::L(elements))
        }
    }
}

fn null() -> AttributeValue {
    AttributeValue::Null(true)
}

fn map_or_null(map: HashMap<String, AttributeValue>) -> AttributeValue {
    if map.is_empty() {
        null()
    } else {
        AttributeValue::M(map)
    }
}

// DynamoDB numbers are decimal, so NaN and infinities are rejected.
fn encode_number(number: Number, options: &FieldOptions) -> Result<AttributeValue, EncodeError> {
    if !number.is_finite() {
        return Err(EncodeError::non_finite_number(number.to_text()));
    }
    Ok(if options.as_string {
        AttributeValue::S(number.to_text())
    } else {
        AttributeValue::N(number.to_text())
    })
}

// Drops members that cannot be encoded, and null members when omitting empty values.
fn keep_or_omit(
    omit_empty: bool,
    encoded: Result<AttributeValue, EncodeError>,
) -> Result<Option<AttributeValue>, EncodeError> {
    match encoded {
        Err(err) if err.is_unsupported_native_kind() => {
            debug!(error = %err, "omitting value without an attribute value representation");
            Ok(None)
        }
        Err(err) => Err(err),
        Ok(AttributeValue::Null(_)) if omit_empty => Ok(None),
        Ok(encoded) => Ok(Some(encoded)),
    }
}

fn collect_set<T>(
    elements: Vec<AttributeValue>,
    set: &'static str,
    unwrap: impl Fn(AttributeValue) -> Result<T, AttributeValue>,
) -> Result<Vec<T>, EncodeError> {
    elements
        .into_iter()
        .map(|element| {
            unwrap(element).map_err(|other| {
                EncodeError::invalid_set_element(set, attribute_type_name(&other))
            })
        })
        .collect()
}

pub(crate) fn attribute_type_name(value: &AttributeValue) -> &'static str {
    match value {
        AttributeValue::S(_) => "S",
        AttributeValue::N(_) => "N",
        AttributeValue::B(_) => "B",
        AttributeValue::Ss(_) => "SS",
        AttributeValue::Ns(_) => "NS",
        AttributeValue::Bs(_) => "BS",
        AttributeValue::M(_) => "M",
        AttributeValue::L(_) => "L",
        AttributeValue::Null(_) => "NULL",
        AttributeValue::Bool(_) => "BOOL",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeErrorKind;
    use crate::{Marshaler, Record};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_string())
    }

    fn n(value: &str) -> AttributeValue {
        AttributeValue::N(value.to_string())
    }

    fn m(entries: Vec<(&str, AttributeValue)>) -> AttributeValue {
        AttributeValue::M(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }

    #[test]
    fn scalars() {
        let encoder = Encoder::new();
        assert_eq!(AttributeValue::Bool(true), encoder.encode(&true).unwrap());
        assert_eq!(n("-7"), encoder.encode(&-7i16).unwrap());
        assert_eq!(n("255"), encoder.encode(&255u8).unwrap());
        assert_eq!(n("0.25"), encoder.encode(&0.25f32).unwrap());
        assert_eq!(s("abc"), encoder.encode(&"abc").unwrap());
        assert_eq!(null(), encoder.encode(&String::new()).unwrap());
        assert_eq!(null(), encoder.encode(&Option::<u8>::None).unwrap());
        assert_eq!(n("3"), encoder.encode(&Some(Box::new(Rc::new(3u64)))).unwrap());
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let encoder = Encoder::new();
        for value in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = encoder.encode(&value).unwrap_err();
            assert!(matches!(err.kind(), EncodeErrorKind::NonFiniteNumber { .. }));
        }
        let err = encoder.encode(&vec![1.0f32, f32::INFINITY]).unwrap_err();
        assert_eq!("cannot marshal non-finite number inf", err.to_string());
    }

    #[test]
    fn empty_string_can_be_kept() {
        let encoder = Encoder::with(|config| config.null_empty_string = false);
        assert_eq!(s(""), encoder.encode(&"").unwrap());
    }

    #[test]
    fn bytes() {
        let encoder = Encoder::new();
        assert_eq!(
            AttributeValue::B(Blob::new(vec![1, 2])),
            encoder.encode(&vec![1u8, 2]).unwrap()
        );
        assert_eq!(
            AttributeValue::B(Blob::new(vec![9, 9, 9])),
            encoder.encode(&[9u8; 3]).unwrap()
        );
        assert_eq!(null(), encoder.encode(&Vec::<u8>::new()).unwrap());
        assert_eq!(
            AttributeValue::Bs(vec![Blob::new(vec![1]), Blob::new(vec![2])]),
            encoder.encode(&vec![vec![1u8], vec![2u8]]).unwrap()
        );
    }

    #[test]
    fn byte_arrays_form_a_set_only_when_tagged() {
        let encoder = Encoder::new();
        let pairs = vec![[1u8, 2], [3, 4]];
        assert_eq!(
            AttributeValue::L(vec![
                AttributeValue::B(Blob::new(vec![1, 2])),
                AttributeValue::B(Blob::new(vec![3, 4])),
            ]),
            encoder.encode(&pairs).unwrap()
        );

        let binary = FieldOptions {
            as_binary_set: true,
            ..Default::default()
        };
        assert_eq!(
            AttributeValue::Bs(vec![Blob::new(vec![1, 2]), Blob::new(vec![3, 4])]),
            encoder.encode_with(&pairs, &binary).unwrap()
        );
    }

    #[test]
    fn sets_from_options() {
        let encoder = Encoder::new();
        let numbers = FieldOptions {
            as_number_set: true,
            ..Default::default()
        };
        assert_eq!(
            AttributeValue::Ns(vec!["1".into(), "2".into()]),
            encoder.encode_with(&vec![1, 2], &numbers).unwrap()
        );

        let strings = FieldOptions {
            as_string_set: true,
            ..Default::default()
        };
        assert_eq!(
            AttributeValue::Ss(vec!["a".into(), "b".into()]),
            encoder.encode_with(&["a", "b"], &strings).unwrap()
        );
    }

    #[test]
    fn set_elements_must_match_the_set() {
        let encoder = Encoder::new();
        let binary = FieldOptions {
            as_binary_set: true,
            ..Default::default()
        };
        let err = encoder.encode_with(&vec!["a"], &binary).unwrap_err();
        assert!(matches!(
            err.kind(),
            EncodeErrorKind::InvalidSetElement { set: "BS", element: "S" }
        ));

        let strings = FieldOptions {
            as_string_set: true,
            ..Default::default()
        };
        let err = encoder.encode_with(&vec!["a", ""], &strings).unwrap_err();
        assert!(matches!(
            err.kind(),
            EncodeErrorKind::InvalidSetElement { set: "SS", element: "NULL" }
        ));

        let strings = FieldOptions {
            as_string_set: true,
            omit_empty_elem: true,
            ..Default::default()
        };
        assert_eq!(
            AttributeValue::Ss(vec!["a".into()]),
            encoder.encode_with(&vec!["a", ""], &strings).unwrap()
        );
    }

    #[test]
    fn lists_omit_empty_elements_on_request() {
        let encoder = Encoder::new();
        let values = vec![Some(1), None, Some(0)];
        assert_eq!(
            AttributeValue::L(vec![n("1"), null(), n("0")]),
            encoder.encode(&values).unwrap()
        );

        let options = FieldOptions {
            omit_empty_elem: true,
            ..Default::default()
        };
        assert_eq!(
            AttributeValue::L(vec![n("1")]),
            encoder.encode_with(&values, &options).unwrap()
        );
        assert_eq!(null(), encoder.encode_with(&vec![0, 0], &options).unwrap());
    }

    #[test]
    fn maps() {
        let encoder = Encoder::new();
        let mut map = BTreeMap::new();
        map.insert(1u32, "one");
        map.insert(2u32, "");
        assert_eq!(
            m(vec![("1", s("one")), ("2", null())]),
            encoder.encode(&map).unwrap()
        );

        let options = FieldOptions {
            omit_empty_elem: true,
            ..Default::default()
        };
        assert_eq!(
            m(vec![("1", s("one"))]),
            encoder.encode_with(&map, &options).unwrap()
        );

        let mut bad = HashMap::new();
        bad.insert(String::new(), 1);
        let err = encoder.encode(&bad).unwrap_err();
        assert!(matches!(err.kind(), EncodeErrorKind::InvalidFieldName { .. }));

        assert_eq!(null(), encoder.encode(&HashMap::<String, u8>::new()).unwrap());
    }

    #[derive(Record)]
    struct Profile {
        #[dynamodbav = "name"]
        pub name: String,
        #[dynamodbav = "age,omitempty"]
        pub age: u8,
        #[dynamodbav = "zip,string"]
        pub zip: u32,
        pub tags: Vec<String>,
        pub callback: fn() -> u8,
    }

    #[test]
    fn records() {
        let encoder = Encoder::new();
        let profile = Profile {
            name: "ana".into(),
            age: 0,
            zip: 98101,
            tags: vec![],
            callback: || 1,
        };
        assert_eq!(
            m(vec![
                ("name", s("ana")),
                ("zip", s("98101")),
                ("tags", null()),
            ]),
            encoder.encode(&profile).unwrap()
        );
    }

    #[test]
    fn unsupported_values_fail_at_the_top_level() {
        let callback: fn() -> u8 = || 1;
        let err = Encoder::new().encode(&callback).unwrap_err();
        assert!(matches!(
            err.kind(),
            EncodeErrorKind::UnsupportedNativeKind { .. }
        ));
        let values = [callback];
        assert_eq!(null(), Encoder::new().encode(&values).unwrap());
    }

    #[derive(Record, Default)]
    struct TupleRecord(pub u8);

    #[derive(Record, Default)]
    struct Empty {
        #[dynamodbav = ",omitempty"]
        pub count: u8,
    }

    #[test]
    fn records_without_attributes_encode_as_null() {
        assert_eq!(null(), Encoder::new().encode(&Empty::default()).unwrap());
    }

    #[test]
    fn unnamed_fields_need_a_name() {
        let err = Encoder::new().encode(&TupleRecord(1)).unwrap_err();
        assert!(matches!(err.kind(), EncodeErrorKind::InvalidFieldName { .. }));
    }

    #[derive(Default)]
    struct Upper(String);

    impl Marshaler for Upper {
        fn marshal_attribute_value(&self) -> Result<AttributeValue, EncodeError> {
            Ok(AttributeValue::S(self.0.to_uppercase()))
        }
    }

    impl Native for Upper {
        fn shape(&self) -> Shape<'_> {
            Shape::Str(&self.0)
        }

        fn shape_mut(&mut self) -> crate::ShapeMut<'_> {
            crate::ShapeMut::Str(&mut self.0)
        }

        fn reset(&mut self) {
            self.0.clear();
        }

        fn marshaler(&self) -> Option<&dyn Marshaler> {
            Some(self)
        }
    }

    #[test]
    fn marshaler_runs_behind_pointers_and_in_lists() {
        let encoder = Encoder::new();
        assert_eq!(s("A"), encoder.encode(&Box::new(Upper("a".into()))).unwrap());
        assert_eq!(
            AttributeValue::L(vec![s("B"), s("")]),
            encoder
                .encode(&vec![Upper("b".into()), Upper(String::new())])
                .unwrap()
        );
    }

    #[test]
    fn top_level_helpers_fall_back_to_empty() {
        let encoder = Encoder::new();
        assert!(encoder.encode_map(&Empty::default()).unwrap().is_empty());
        assert!(encoder.encode_list(&5).unwrap().is_empty());
        assert_eq!(vec![n("5")], encoder.encode_list(&vec![5]).unwrap());
    }
}
