/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Errors returned by the encoder and decoder.

use std::error::Error;
use std::fmt;

/// A boxed error raised by a [`Marshaler`](crate::Marshaler) or
/// [`Unmarshaler`](crate::Unmarshaler) implementation.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Error returned when a Rust value cannot be encoded into an `AttributeValue`.
#[derive(Debug)]
pub struct EncodeError {
    kind: EncodeErrorKind,
}

/// The kind of encode error that occurred.
#[derive(Debug)]
#[non_exhaustive]
pub enum EncodeErrorKind {
    /// A record field or map key resolved to an empty attribute name.
    InvalidFieldName {
        /// The Rust type holding the field or key.
        type_name: &'static str,
    },
    /// A set element encoded to a different attribute type than the set requires.
    InvalidSetElement {
        /// The set type being built (`BS`, `NS` or `SS`).
        set: &'static str,
        /// The attribute type the element encoded to.
        element: &'static str,
    },
    /// A float is NaN or infinite and has no decimal representation.
    NonFiniteNumber {
        /// The number as formatted by Rust.
        value: String,
    },
    /// The Rust type has no attribute value representation.
    ///
    /// Records, maps and sequences omit members that fail this way; it only
    /// surfaces when the top-level value itself is unsupported.
    UnsupportedNativeKind {
        /// The unsupported Rust type.
        type_name: &'static str,
    },
    /// Error raised by a custom [`Marshaler`](crate::Marshaler).
    Custom(BoxError),
}

impl EncodeError {
    pub(crate) fn invalid_field_name(type_name: &'static str) -> Self {
        Self {
            kind: EncodeErrorKind::InvalidFieldName { type_name },
        }
    }

    pub(crate) fn invalid_set_element(set: &'static str, element: &'static str) -> Self {
        Self {
            kind: EncodeErrorKind::InvalidSetElement { set, element },
        }
    }

    pub(crate) fn non_finite_number(value: impl Into<String>) -> Self {
        Self {
            kind: EncodeErrorKind::NonFiniteNumber {
                value: value.into(),
            },
        }
    }

    pub(crate) fn unsupported_native_kind(type_name: &'static str) -> Self {
        Self {
            kind: EncodeErrorKind::UnsupportedNativeKind { type_name },
        }
    }

    /// Creates an error from a custom marshaler failure.
    pub fn custom(source: impl Into<BoxError>) -> Self {
        Self {
            kind: EncodeErrorKind::Custom(source.into()),
        }
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> &EncodeErrorKind {
        &self.kind
    }

    pub(crate) fn is_unsupported_native_kind(&self) -> bool {
        matches!(self.kind, EncodeErrorKind::UnsupportedNativeKind { .. })
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EncodeErrorKind::*;
        match &self.kind {
            InvalidFieldName { type_name } => {
                write!(f, "empty attribute name in Rust value of type {type_name}")
            }
            InvalidSetElement { set, element } => {
                write!(f, "{set} set must only contain {set} element values, got {element}")
            }
            NonFiniteNumber { value } => {
                write!(f, "cannot marshal non-finite number {value}")
            }
            UnsupportedNativeKind { type_name } => {
                write!(f, "cannot marshal unsupported Rust type {type_name}")
            }
            Custom(_) => write!(f, "custom marshaler failed"),
        }
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            EncodeErrorKind::Custom(source) => Some(source.as_ref() as _),
            _ => None,
        }
    }
}

/// Error returned when an `AttributeValue` cannot be decoded into a Rust value.
#[derive(Debug)]
pub struct DecodeError {
    kind: DecodeErrorKind,
}

/// The kind of decode error that occurred.
#[derive(Debug)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// The target cannot be written through, such as a shared reference or a
    /// shared `Rc`.
    InvalidTarget {
        /// The Rust type of the target.
        type_name: &'static str,
    },
    /// The attribute type cannot be decoded into the target's kind.
    UnsupportedShape {
        /// The attribute type that was found, such as `number` or `string set`.
        wire: &'static str,
        /// The Rust type of the target.
        type_name: &'static str,
    },
    /// A number does not fit in the target numeric type.
    Overflow {
        /// The number as it appeared on the wire.
        value: String,
        /// The Rust type of the target.
        type_name: &'static str,
    },
    /// A number attribute does not hold a valid number.
    InvalidNumber {
        /// The text that failed to parse.
        value: String,
        /// The Rust type of the target.
        type_name: &'static str,
    },
    /// Error raised by a custom [`Unmarshaler`](crate::Unmarshaler).
    Custom(BoxError),
}

impl DecodeError {
    pub(crate) fn invalid_target(type_name: &'static str) -> Self {
        Self {
            kind: DecodeErrorKind::InvalidTarget { type_name },
        }
    }

    pub(crate) fn unsupported_shape(wire: &'static str, type_name: &'static str) -> Self {
        Self {
            kind: DecodeErrorKind::UnsupportedShape { wire, type_name },
        }
    }

    pub(crate) fn overflow(value: impl Into<String>, type_name: &'static str) -> Self {
        Self {
            kind: DecodeErrorKind::Overflow {
                value: value.into(),
                type_name,
            },
        }
    }

    pub(crate) fn invalid_number(value: impl Into<String>, type_name: &'static str) -> Self {
        Self {
            kind: DecodeErrorKind::InvalidNumber {
                value: value.into(),
                type_name,
            },
        }
    }

    /// Creates an error from a custom unmarshaler failure.
    pub fn custom(source: impl Into<BoxError>) -> Self {
        Self {
            kind: DecodeErrorKind::Custom(source.into()),
        }
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DecodeErrorKind::*;
        match &self.kind {
            InvalidTarget { type_name } => {
                write!(f, "cannot unmarshal into non-writable Rust value of type {type_name}")
            }
            UnsupportedShape { wire, type_name } => {
                write!(f, "cannot unmarshal {wire} into Rust value of type {type_name}")
            }
            Overflow { value, type_name } => write!(
                f,
                "cannot unmarshal number {value} into Rust value of type {type_name}: value out of range"
            ),
            InvalidNumber { value, type_name } => write!(
                f,
                "cannot unmarshal number {value:?} into Rust value of type {type_name}: invalid number"
            ),
            Custom(_) => write!(f, "custom unmarshaler failed"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            DecodeErrorKind::Custom(source) => Some(source.as_ref() as _),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_messages_name_wire_and_rust_types() {
        assert_eq!(
            "cannot unmarshal number into Rust value of type u8",
            DecodeError::unsupported_shape("number", "u8").to_string()
        );
        assert_eq!(
            "cannot unmarshal number 300 into Rust value of type u8: value out of range",
            DecodeError::overflow("300", "u8").to_string()
        );
        assert_eq!(
            "cannot unmarshal number \"abc\" into Rust value of type i32: invalid number",
            DecodeError::invalid_number("abc", "i32").to_string()
        );
    }

    #[test]
    fn encode_messages() {
        assert_eq!(
            "SS set must only contain SS element values, got N",
            EncodeError::invalid_set_element("SS", "N").to_string()
        );
        assert_eq!(
            "cannot marshal non-finite number inf",
            EncodeError::non_finite_number("inf").to_string()
        );
        assert!(EncodeError::unsupported_native_kind("*const u8").is_unsupported_native_kind());
        assert!(!EncodeError::invalid_field_name("Item").is_unsupported_native_kind());
    }

    #[test]
    fn custom_errors_expose_source() {
        let err = DecodeError::custom("boom");
        assert_eq!("boom", err.source().map(|e| e.to_string()).unwrap_or_default());

        let err = EncodeError::custom("bang");
        assert!(matches!(err.kind(), EncodeErrorKind::Custom(_)));
        assert_eq!("bang", err.source().map(|e| e.to_string()).unwrap_or_default());
    }
}
