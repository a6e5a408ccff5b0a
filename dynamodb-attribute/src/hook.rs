/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Custom encoding and decoding hooks.
//!
//! A type opts into a hook by returning itself from
//! [`Native::marshaler`](crate::Native::marshaler) or
//! [`Native::unmarshaler`](crate::Native::unmarshaler). With
//! `#[derive(Record)]` this is done with the `#[dynamodbav(marshaler)]` and
//! `#[dynamodbav(unmarshaler)]` container attributes.
//!
//! Hooks are consulted before the default behavior at every level, including
//! the elements of lists, sets and maps.

use aws_sdk_dynamodb::types::AttributeValue;

use crate::error::{DecodeError, EncodeError};

/// Custom encoding of a value into an `AttributeValue`.
pub trait Marshaler {
    /// Encodes `self`.
    fn marshal_attribute_value(&self) -> Result<AttributeValue, EncodeError>;
}

/// Custom decoding of an `AttributeValue` into a value.
///
/// Also called for `NULL` attributes, which the default decoding would
/// otherwise turn into the zero value.
pub trait Unmarshaler {
    /// Decodes `value` into `self`.
    fn unmarshal_attribute_value(&mut self, value: &AttributeValue) -> Result<(), DecodeError>;
}
