/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Encoder and decoder configuration.

use crate::decode::Decoder;
use crate::encode::Encoder;

/// Options shared by the encoder and the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct MarshalOptions {
    /// Honor `#[json = "..."]` field tags when a field has no `dynamodbav` tag.
    ///
    /// Defaults to `true`.
    pub support_json_tags: bool,
}

impl Default for MarshalOptions {
    fn default() -> Self {
        Self {
            support_json_tags: true,
        }
    }
}

/// Configuration carried by an [`Encoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct EncoderConfig {
    /// Options shared with the decoder.
    pub marshal_options: MarshalOptions,
    /// Encode empty strings as a `NULL` attribute instead of an empty `S`.
    ///
    /// Defaults to `true`.
    pub null_empty_string: bool,
}

impl EncoderConfig {
    /// Creates the default encoder configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            marshal_options: MarshalOptions::default(),
            null_empty_string: true,
        }
    }
}

/// Configuration carried by a [`Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct DecoderConfig {
    /// Options shared with the encoder.
    pub marshal_options: MarshalOptions,
}

impl DecoderConfig {
    /// Creates the default decoder configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A builder for [`Encoder`]s.
#[derive(Debug, Clone, Default)]
pub struct EncoderBuilder {
    support_json_tags: Option<bool>,
    null_empty_string: Option<bool>,
}

impl EncoderBuilder {
    /// Creates a new `EncoderBuilder`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets whether `json` field tags are honored.
    pub fn support_json_tags(mut self, support_json_tags: bool) -> Self {
        self.set_support_json_tags(Some(support_json_tags));
        self
    }

    /// Sets whether `json` field tags are honored. `None` restores the default.
    pub fn set_support_json_tags(&mut self, support_json_tags: Option<bool>) -> &mut Self {
        self.support_json_tags = support_json_tags;
        self
    }

    /// Sets whether empty strings encode as `NULL`.
    pub fn null_empty_string(mut self, null_empty_string: bool) -> Self {
        self.set_null_empty_string(Some(null_empty_string));
        self
    }

    /// Sets whether empty strings encode as `NULL`. `None` restores the default.
    pub fn set_null_empty_string(&mut self, null_empty_string: Option<bool>) -> &mut Self {
        self.null_empty_string = null_empty_string;
        self
    }

    /// Builds the [`Encoder`].
    pub fn build(self) -> Encoder {
        let mut config = EncoderConfig::new();
        if let Some(support_json_tags) = self.support_json_tags {
            config.marshal_options.support_json_tags = support_json_tags;
        }
        if let Some(null_empty_string) = self.null_empty_string {
            config.null_empty_string = null_empty_string;
        }
        Encoder::from_config(config)
    }
}

/// A builder for [`Decoder`]s.
#[derive(Debug, Clone, Default)]
pub struct DecoderBuilder {
    support_json_tags: Option<bool>,
}

impl DecoderBuilder {
    /// Creates a new `DecoderBuilder`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets whether `json` field tags are honored.
    pub fn support_json_tags(mut self, support_json_tags: bool) -> Self {
        self.set_support_json_tags(Some(support_json_tags));
        self
    }

    /// Sets whether `json` field tags are honored. `None` restores the default.
    pub fn set_support_json_tags(&mut self, support_json_tags: Option<bool>) -> &mut Self {
        self.support_json_tags = support_json_tags;
        self
    }

    /// Builds the [`Decoder`].
    pub fn build(self) -> Decoder {
        let mut config = DecoderConfig::new();
        if let Some(support_json_tags) = self.support_json_tags {
            config.marshal_options.support_json_tags = support_json_tags;
        }
        Decoder::from_config(config)
    }
}
