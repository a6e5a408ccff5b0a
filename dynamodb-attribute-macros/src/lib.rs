/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Derive macros for `dynamodb-attribute`. Use them through the re-exports in
//! that crate.

extern crate proc_macro;

use proc_macro::TokenStream;
use syn::DeriveInput;

use crate::record::derive_record_impl;

mod record;

/// Derives `Native`, `Record` and `RecordFields` for a struct.
#[proc_macro_derive(Record, attributes(dynamodbav, json))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    derive_record_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
