/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Resolution of record fields into attribute names and options.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::config::MarshalOptions;
use crate::native::{Native, Record, Shape, ShapeMut};
use crate::tag::{FieldOptions, FieldTag};

/// Static description of a declared record field.
///
/// Generated by `#[derive(Record)]`, one per field in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct RawField {
    ident: &'static str,
    dynamodbav: Option<&'static str>,
    json: Option<&'static str>,
    exported: bool,
    embedded: Option<fn() -> &'static [RawField]>,
}

impl RawField {
    /// Describes a field.
    ///
    /// `ident` is empty for tuple struct fields. `embedded` is set for
    /// flattened fields and returns the flattened record's own fields.
    pub const fn new(
        ident: &'static str,
        dynamodbav: Option<&'static str>,
        json: Option<&'static str>,
        exported: bool,
        embedded: Option<fn() -> &'static [RawField]>,
    ) -> Self {
        Self {
            ident,
            dynamodbav,
            json,
            exported,
            embedded,
        }
    }

    /// The Rust identifier of the field.
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    fn tag(&self, options: MarshalOptions) -> FieldTag {
        let tag = self.dynamodbav.map(FieldTag::parse).unwrap_or_default();
        match self.json {
            Some(json) if tag.is_empty() && options.support_json_tags => FieldTag::parse(json),
            _ => tag,
        }
    }
}

/// A resolved record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    path: Vec<usize>,
    options: FieldOptions,
    name_from_tag: bool,
}

impl Field {
    /// The attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field indices leading to this field through flattened records.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Options parsed from the field's tag.
    pub fn options(&self) -> FieldOptions {
        self.options
    }

    /// Whether the attribute name came from a tag rather than the identifier.
    pub fn name_from_tag(&self) -> bool {
        self.name_from_tag
    }
}

/// The resolved fields of a record type.
#[derive(Debug, Default)]
pub struct Fields {
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
}

impl Fields {
    /// Iterates the fields in resolution order.
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Looks up a field by its exact attribute name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&index| &self.fields[index])
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no encodable fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    fields: usize,
    len: usize,
    support_json_tags: bool,
}

static FIELD_CACHE: Lazy<RwLock<HashMap<CacheKey, Arc<Fields>>>> = Lazy::new(Default::default);

/// Returns the resolved fields for `raw`, computing them on first use.
///
/// Results are cached per record and [`MarshalOptions::support_json_tags`].
pub fn fields(raw: &'static [RawField], options: MarshalOptions) -> Arc<Fields> {
    let key = CacheKey {
        fields: raw.as_ptr() as usize,
        len: raw.len(),
        support_json_tags: options.support_json_tags,
    };

    if let Some(fields) = FIELD_CACHE
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&key)
    {
        return fields.clone();
    }

    let resolved = Arc::new(resolve_fields(raw, options));
    FIELD_CACHE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .entry(key)
        .or_insert(resolved)
        .clone()
}

struct Pending {
    raw: &'static [RawField],
    path: Vec<usize>,
}

/// Resolves the fields of a record without consulting the cache.
///
/// Fields are visited breadth first by flattening depth, in declaration order.
/// A name found at a shallower depth hides the same name further down; within
/// one depth the last declared field with a name wins.
pub fn resolve_fields(raw: &'static [RawField], options: MarshalOptions) -> Fields {
    let mut resolved = Fields::default();
    let mut depth_of_name: HashMap<String, usize> = HashMap::new();
    let mut visited = HashSet::new();
    let mut next = vec![Pending {
        raw,
        path: Vec::new(),
    }];

    let mut depth = 0;
    while !next.is_empty() {
        for record in std::mem::take(&mut next) {
            if !visited.insert(record.raw.as_ptr() as usize) {
                continue;
            }
            for (index, raw_field) in record.raw.iter().enumerate() {
                let tag = raw_field.tag(options);
                if tag.is_ignored() {
                    continue;
                }

                let mut path = record.path.clone();
                path.push(index);

                match raw_field.embedded {
                    Some(embedded) if tag.name().is_empty() => {
                        next.push(Pending {
                            raw: embedded(),
                            path,
                        });
                        continue;
                    }
                    _ => {}
                }
                if !raw_field.exported {
                    continue;
                }

                let field = Field {
                    name: if tag.name().is_empty() {
                        raw_field.ident.to_string()
                    } else {
                        tag.name().to_string()
                    },
                    path,
                    options: tag.options(),
                    name_from_tag: !tag.name().is_empty(),
                };

                match depth_of_name.get(&field.name) {
                    Some(&found) if found < depth => {
                        debug!(name = %field.name, "field hidden by a shallower field");
                    }
                    Some(_) => {
                        warn!(
                            name = %field.name,
                            "duplicate attribute name, the last declared field wins"
                        );
                        if let Some(&slot) = resolved.by_name.get(&field.name) {
                            resolved.fields[slot] = field;
                        }
                    }
                    None => {
                        depth_of_name.insert(field.name.clone(), depth);
                        resolved
                            .by_name
                            .insert(field.name.clone(), resolved.fields.len());
                        resolved.fields.push(field);
                    }
                }
            }
        }
        depth += 1;
    }

    debug!(fields = resolved.len(), "resolved record fields");
    resolved
}

/// Returns the field at `path`, or `None` when a flattened record on the way is absent.
pub(crate) fn field_ref<'a>(record: &'a dyn Record, path: &[usize]) -> Option<&'a dyn Native> {
    let (last, parents) = path.split_last()?;
    let mut record = record;
    for &index in parents {
        record = embedded_ref(record.field(index)?)?;
    }
    record.field(*last)
}

fn embedded_ref(value: &dyn Native) -> Option<&dyn Record> {
    match value.shape() {
        Shape::Indirect(inner) => embedded_ref(inner),
        Shape::Record(record) => Some(record),
        _ => None,
    }
}

/// Returns the field at `path` for writing, allocating absent flattened records.
pub(crate) fn field_mut<'a>(
    record: &'a mut dyn Record,
    path: &[usize],
) -> Option<&'a mut dyn Native> {
    let (last, parents) = path.split_last()?;
    let mut record = record;
    for &index in parents {
        record = embedded_mut(record.field_mut(index)?)?;
    }
    record.field_mut(*last)
}

fn embedded_mut(value: &mut dyn Native) -> Option<&mut dyn Record> {
    match value.shape_mut() {
        ShapeMut::Indirect(indirect) => embedded_mut(indirect.inner_or_insert()),
        ShapeMut::Record(record) => Some(record),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::RecordFields;
    use crate::Record;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    #[derive(Record, Default)]
    struct Base {
        pub id: String,
        #[dynamodbav = "kind"]
        pub category: String,
    }

    #[derive(Record, Default)]
    struct Item {
        #[dynamodbav(flatten)]
        base: Base,
        #[json = "payload,omitempty"]
        pub body: String,
        #[dynamodbav = "n,string"]
        #[json = "ignored"]
        pub count: u32,
        #[dynamodbav = "-"]
        pub skipped: u8,
        hidden: u8,
        #[dynamodbav = "category"]
        pub category: String,
    }

    fn names(fields: &Fields) -> Vec<&str> {
        fields.iter().map(Field::name).collect()
    }

    #[test]
    fn tags_flattening_and_visibility() {
        let fields = resolve_fields(Item::record_fields(), MarshalOptions::default());
        assert_eq!(vec!["payload", "n", "category", "id", "kind"], names(&fields));

        let payload = fields.get("payload").expect("payload");
        assert!(payload.name_from_tag());
        assert!(payload.options().omit_empty);
        assert!(fields.get("n").expect("n").options().as_string);
        assert_eq!(&[0, 0], fields.get("id").expect("id").path());
        assert!(fields.get("hidden").is_none());
        assert!(fields.get("skipped").is_none());
    }

    #[test]
    fn json_tags_can_be_disabled() {
        let options = MarshalOptions {
            support_json_tags: false,
        };
        let fields = resolve_fields(Item::record_fields(), options);
        assert!(fields.get("payload").is_none());
        assert!(fields.get("body").is_some());
        assert!(!fields.get("body").expect("body").name_from_tag());
    }

    #[derive(Record, Default)]
    struct Shadowing {
        #[dynamodbav(flatten)]
        pub base: Base,
        #[dynamodbav = "id"]
        pub own_id: u64,
    }

    #[test]
    fn shallower_fields_hide_flattened_ones() {
        let fields = resolve_fields(Shadowing::record_fields(), MarshalOptions::default());
        assert_eq!(vec!["id", "kind"], names(&fields));
        assert_eq!(&[1], fields.get("id").expect("id").path());
    }

    #[derive(Record, Default)]
    struct Duplicates {
        #[dynamodbav = "name"]
        pub first: String,
        #[dynamodbav = "name,omitempty"]
        pub second: String,
    }

    #[test]
    #[traced_test]
    fn duplicate_names_keep_the_last_field() {
        let fields = resolve_fields(Duplicates::record_fields(), MarshalOptions::default());
        assert_eq!(1, fields.len());
        let field = fields.get("name").expect("name");
        assert_eq!(&[1], field.path());
        assert!(field.options().omit_empty);
        assert!(logs_contain("duplicate attribute name"));
    }

    #[derive(Record, Default)]
    struct Nested {
        #[dynamodbav = "base"]
        #[dynamodbav(flatten)]
        pub base: Base,
        #[dynamodbav(flatten)]
        pub optional: Option<Box<Base>>,
    }

    #[test]
    fn named_embedded_fields_are_not_flattened() {
        let fields = resolve_fields(Nested::record_fields(), MarshalOptions::default());
        assert_eq!(vec!["base", "id", "kind"], names(&fields));
        assert_eq!(&[1, 0], fields.get("id").expect("id").path());
    }

    #[test]
    fn paths_resolve_through_optional_records() {
        let mut value = Nested::default();
        let path = [1, 0];
        assert!(field_ref(&value, &path).is_none());

        let id = field_mut(&mut value, &path).expect("allocated");
        if let ShapeMut::Str(id) = id.shape_mut() {
            id.push_str("abc");
        }
        assert_eq!(
            Some("abc"),
            value.optional.as_ref().map(|base| base.id.as_str())
        );
        assert!(field_ref(&value, &path).is_some());
    }

    #[test]
    fn cache_returns_shared_fields() {
        let first = fields(Item::record_fields(), MarshalOptions::default());
        let second = fields(Item::record_fields(), MarshalOptions::default());
        assert!(Arc::ptr_eq(&first, &second));

        let options = MarshalOptions {
            support_json_tags: false,
        };
        let third = fields(Item::record_fields(), options);
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[derive(Record, Default)]
    struct Shared {
        #[dynamodbav(flatten)]
        pub base: Base,
        #[dynamodbav(flatten)]
        pub extra: Option<Box<Base>>,
        #[dynamodbav = "total,omitempty"]
        pub total: u64,
    }

    #[test]
    fn cache_is_shared_across_threads() {
        let resolved: Vec<Arc<Fields>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16u64)
                .map(|n| {
                    scope.spawn(move || {
                        let value = Shared {
                            base: Base {
                                id: n.to_string(),
                                category: "thread".into(),
                            },
                            extra: None,
                            total: n,
                        };
                        let item = crate::marshal_map(&value).expect("encodes");
                        let mut decoded = Shared::default();
                        crate::unmarshal_map(&item, &mut decoded).expect("decodes");
                        assert_eq!(n.to_string(), decoded.base.id);
                        fields(Shared::record_fields(), MarshalOptions::default())
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("thread panicked"))
                .collect()
        });

        let first = fields(Shared::record_fields(), MarshalOptions::default());
        assert_eq!(vec!["total", "id", "kind"], names(&first));
        for other in &resolved {
            assert!(Arc::ptr_eq(&first, other));
        }
    }
}
