/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Parsing of `dynamodbav` and `json` field tags.

/// Per-field encoding and decoding options.
///
/// Options are normally produced by parsing a field tag such as
/// `"name,omitempty,stringset"`, but can also be passed directly to
/// [`Encoder::encode_with`](crate::Encoder::encode_with) and
/// [`Decoder::decode_with`](crate::Decoder::decode_with).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldOptions {
    /// Omit the value when it is the zero value for its kind (`omitempty`).
    pub omit_empty: bool,
    /// Omit zero-valued elements of lists, sets and maps (`omitemptyelem`).
    pub omit_empty_elem: bool,
    /// Carry numbers in a string attribute instead of a number attribute (`string`).
    pub as_string: bool,
    /// Encode a sequence as a binary set (`binaryset`).
    pub as_binary_set: bool,
    /// Encode a sequence as a number set (`numberset`).
    pub as_number_set: bool,
    /// Encode a sequence as a string set (`stringset`).
    pub as_string_set: bool,
}

impl FieldOptions {
    /// Options applied to the elements of a list, set or map with these options.
    pub(crate) fn for_elements(&self) -> FieldOptions {
        FieldOptions {
            omit_empty: self.omit_empty_elem,
            ..FieldOptions::default()
        }
    }
}

/// A parsed field tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTag {
    name: String,
    ignore: bool,
    options: FieldOptions,
}

impl FieldTag {
    /// Parses a comma separated tag.
    ///
    /// The first segment is the attribute name; an empty first segment keeps
    /// the field's own name and `-` excludes the field. Unknown options are
    /// ignored.
    pub fn parse(tag: &str) -> Self {
        let mut parsed = FieldTag::default();
        if tag.is_empty() {
            return parsed;
        }

        let mut parts = tag.split(',');
        match parts.next() {
            Some("-") => parsed.ignore = true,
            Some(name) => parsed.name = name.to_string(),
            None => {}
        }

        for option in parts {
            match option {
                "omitempty" => parsed.options.omit_empty = true,
                "omitemptyelem" => parsed.options.omit_empty_elem = true,
                "string" => parsed.options.as_string = true,
                "binaryset" => parsed.options.as_binary_set = true,
                "numberset" => parsed.options.as_number_set = true,
                "stringset" => parsed.options.as_string_set = true,
                _ => {}
            }
        }
        parsed
    }

    /// The attribute name, empty when the tag does not rename the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the field is excluded from encoding and decoding.
    pub fn is_ignored(&self) -> bool {
        self.ignore
    }

    /// The options carried by the tag.
    pub fn options(&self) -> FieldOptions {
        self.options
    }

    pub(crate) fn is_empty(&self) -> bool {
        *self == FieldTag::default()
    }
}
