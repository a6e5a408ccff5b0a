/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;
use std::error::Error;

use aws_sdk_dynamodb::types::AttributeValue;
use dynamodb_attribute::{
    marshal, marshal_map, unmarshal, unmarshal_map, DecodeError, DecodeErrorKind, EncodeError,
    EncodeErrorKind, Marshaler, Record, Unmarshaler,
};
use pretty_assertions::assert_eq;

/// Stored as a single `"x:y"` string rather than a map.
#[derive(Record, Default, Debug, PartialEq, Clone, Copy)]
#[dynamodbav(marshaler, unmarshaler)]
struct Point {
    pub x: i32,
    pub y: i32,
}

impl Marshaler for Point {
    fn marshal_attribute_value(&self) -> Result<AttributeValue, EncodeError> {
        Ok(AttributeValue::S(format!("{}:{}", self.x, self.y)))
    }
}

impl Unmarshaler for Point {
    fn unmarshal_attribute_value(&mut self, value: &AttributeValue) -> Result<(), DecodeError> {
        let text = match value {
            AttributeValue::S(text) => text,
            AttributeValue::Null(_) => {
                *self = Point::default();
                return Ok(());
            }
            _ => return Err(DecodeError::custom("point must be a string")),
        };
        let (x, y) = text
            .split_once(':')
            .ok_or_else(|| DecodeError::custom(format!("malformed point {text:?}")))?;
        self.x = x.parse().map_err(DecodeError::custom)?;
        self.y = y.parse().map_err(DecodeError::custom)?;
        Ok(())
    }
}

#[derive(Record, Default, Debug, PartialEq)]
struct Route {
    pub start: Point,
    pub stops: Vec<Point>,
    pub named: HashMap<String, Point>,
    pub detour: Option<Point>,
}

#[test]
fn hooks_replace_the_default_encoding() {
    assert_eq!(
        AttributeValue::S("1:2".into()),
        marshal(&Point { x: 1, y: 2 }).unwrap()
    );

    let mut point = Point::default();
    unmarshal(&AttributeValue::S("-3:4".into()), &mut point).unwrap();
    assert_eq!(Point { x: -3, y: 4 }, point);
}

#[test]
fn hooks_apply_at_every_depth() {
    let route = Route {
        start: Point { x: 0, y: 0 },
        stops: vec![Point { x: 1, y: 1 }, Point { x: 2, y: 2 }],
        named: HashMap::from([("home".to_string(), Point { x: 9, y: 9 })]),
        detour: Some(Point { x: 5, y: 6 }),
    };

    let item = marshal_map(&route).unwrap();
    assert_eq!(Some(&AttributeValue::S("0:0".into())), item.get("start"));
    assert_eq!(
        Some(&AttributeValue::L(vec![
            AttributeValue::S("1:1".into()),
            AttributeValue::S("2:2".into()),
        ])),
        item.get("stops")
    );
    assert_eq!(Some(&AttributeValue::S("5:6".into())), item.get("detour"));

    let mut decoded = Route::default();
    unmarshal_map(&item, &mut decoded).unwrap();
    assert_eq!(route, decoded);
}

#[test]
fn hook_errors_are_reported_with_their_source() {
    let mut point = Point::default();
    let err = unmarshal(&AttributeValue::S("1:north".into()), &mut point).unwrap_err();
    assert!(matches!(err.kind(), DecodeErrorKind::Custom(_)));
    assert_eq!("custom unmarshaler failed", err.to_string());
    let source = err.source().expect("source");
    assert_eq!("invalid digit found in string", source.to_string());

    let err = unmarshal(&AttributeValue::Bool(true), &mut point).unwrap_err();
    assert_eq!(
        "point must be a string",
        err.source().expect("source").to_string()
    );
}

#[test]
fn hooks_see_null_attributes() {
    let mut point = Point { x: 1, y: 1 };
    unmarshal(&AttributeValue::Null(true), &mut point).unwrap();
    assert_eq!(Point::default(), point);

    let mut detour = Some(Point { x: 1, y: 1 });
    unmarshal(&AttributeValue::Null(true), &mut detour).unwrap();
    assert_eq!(None, detour);
}

#[derive(Default)]
struct Rejecting;

impl Marshaler for Rejecting {
    fn marshal_attribute_value(&self) -> Result<AttributeValue, EncodeError> {
        Err(EncodeError::custom("not today"))
    }
}

impl dynamodb_attribute::Native for Rejecting {
    fn shape(&self) -> dynamodb_attribute::Shape<'_> {
        dynamodb_attribute::Shape::Null
    }

    fn shape_mut(&mut self) -> dynamodb_attribute::ShapeMut<'_> {
        dynamodb_attribute::ShapeMut::ReadOnly
    }

    fn reset(&mut self) {}

    fn marshaler(&self) -> Option<&dyn Marshaler> {
        Some(self)
    }
}

#[test]
fn encode_hook_errors_abort_the_call() {
    let err = marshal(&vec![Some(Rejecting)]).unwrap_err();
    assert!(matches!(err.kind(), EncodeErrorKind::Custom(_)));
    assert_eq!("not today", err.source().expect("source").to_string());
}
