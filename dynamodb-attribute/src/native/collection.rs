/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::{btree_map, hash_map, BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::native::{BytesMut, MapKey, MapMut, MapRef, Native, SeqMut, SeqRef, Shape, ShapeMut};

// A slice of `T` is a byte sequence when `T` is `u8`.
fn elements_are_u8<T: Native>() -> bool {
    T::slice_as_bytes(&[]).is_some()
}

fn slice_get<T: Native>(slice: &[T], index: usize) -> Option<&dyn Native> {
    slice.get(index).map(|element| element as &dyn Native)
}

impl<T: Native> SeqRef for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Native> {
        slice_get(self, index)
    }

    fn as_bytes(&self) -> Option<&[u8]> {
        T::slice_as_bytes(self)
    }

    fn elements_are_bytes(&self) -> bool {
        T::is_byte_sequence()
    }
}

impl<T: Native + Default> SeqMut for Vec<T> {
    fn prepare(&mut self, len: usize) -> usize {
        self.truncate(len);
        self.resize_with(len, T::default);
        len
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Native> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|element| element as &mut dyn Native)
    }

    fn bytes_mut(&mut self) -> Option<BytesMut<'_>> {
        T::vec_as_bytes_mut(self).map(BytesMut::Growable)
    }
}

impl<T: Native + Default> Native for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Seq(self)
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn is_byte_sequence() -> bool {
        elements_are_u8::<T>()
    }
}

impl<T: Native, const N: usize> SeqRef for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&dyn Native> {
        slice_get(self, index)
    }

    fn as_bytes(&self) -> Option<&[u8]> {
        T::slice_as_bytes(self)
    }

    fn elements_are_bytes(&self) -> bool {
        T::is_byte_sequence()
    }
}

impl<T: Native, const N: usize> SeqMut for [T; N] {
    fn prepare(&mut self, len: usize) -> usize {
        let filled = len.min(N);
        for element in &mut self[filled..] {
            element.reset();
        }
        filled
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Native> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|element| element as &mut dyn Native)
    }

    fn bytes_mut(&mut self) -> Option<BytesMut<'_>> {
        T::slice_as_bytes_mut(self).map(BytesMut::Fixed)
    }
}

impl<T: Native, const N: usize> Native for [T; N] {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Seq(self)
    }

    fn reset(&mut self) {
        for element in self.iter_mut() {
            element.reset();
        }
    }
}

impl<T: Native> SeqRef for &[T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Native> {
        slice_get(self, index)
    }

    fn as_bytes(&self) -> Option<&[u8]> {
        T::slice_as_bytes(self)
    }

    fn elements_are_bytes(&self) -> bool {
        T::is_byte_sequence()
    }
}

impl<T: Native> Native for &[T] {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::ReadOnly
    }

    fn reset(&mut self) {
        *self = &[];
    }

    fn is_byte_sequence() -> bool {
        elements_are_u8::<T>()
    }
}

impl<K, V, S> MapRef for HashMap<K, V, S>
where
    K: MapKey,
    V: Native,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (String, &dyn Native)> + '_> {
        Box::new(
            self.iter()
                .map(|(key, value)| (key.to_key(), value as &dyn Native)),
        )
    }
}

impl<K, V, S> MapMut for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Native + Default,
    S: BuildHasher,
{
    fn string_keyed(&self) -> bool {
        K::STRING_KEYED
    }

    fn key_type_name(&self) -> &'static str {
        std::any::type_name::<K>()
    }

    fn insert_default(&mut self, key: &str) -> Option<&mut dyn Native> {
        let value = match self.entry(K::from_key(key)?) {
            hash_map::Entry::Occupied(entry) => {
                let value = entry.into_mut();
                *value = V::default();
                value
            }
            hash_map::Entry::Vacant(entry) => entry.insert(V::default()),
        };
        Some(value)
    }
}

impl<K, V, S> Native for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Native + Default,
    S: BuildHasher,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Map(self)
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl<K, V> MapRef for BTreeMap<K, V>
where
    K: MapKey,
    V: Native,
{
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (String, &dyn Native)> + '_> {
        Box::new(
            self.iter()
                .map(|(key, value)| (key.to_key(), value as &dyn Native)),
        )
    }
}

impl<K, V> MapMut for BTreeMap<K, V>
where
    K: MapKey + Ord,
    V: Native + Default,
{
    fn string_keyed(&self) -> bool {
        K::STRING_KEYED
    }

    fn key_type_name(&self) -> &'static str {
        std::any::type_name::<K>()
    }

    fn insert_default(&mut self, key: &str) -> Option<&mut dyn Native> {
        let value = match self.entry(K::from_key(key)?) {
            btree_map::Entry::Occupied(entry) => {
                let value = entry.into_mut();
                *value = V::default();
                value
            }
            btree_map::Entry::Vacant(entry) => entry.insert(V::default()),
        };
        Some(value)
    }
}

impl<K, V> Native for BTreeMap<K, V>
where
    K: MapKey + Ord,
    V: Native + Default,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Map(self)
    }

    fn reset(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_prepare_reuses_and_truncates() {
        let mut v = vec![1, 2, 3];
        assert_eq!(2, v.prepare(2));
        assert_eq!(vec![1, 2], v);
        assert_eq!(4, v.prepare(4));
        assert_eq!(vec![1, 2, 0, 0], v);
    }

    #[test]
    fn array_prepare_caps_and_resets_tail() {
        let mut a = [7u16; 4];
        assert_eq!(2, a.prepare(2));
        assert_eq!([7, 7, 0, 0], a);
        assert_eq!(4, a.prepare(10));
    }

    #[test]
    fn byte_sequences() {
        assert!(Vec::<u8>::is_byte_sequence());
        assert!(!<[u8; 4]>::is_byte_sequence());
        assert!(!Vec::<u16>::is_byte_sequence());
        assert!(vec![vec![1u8]].elements_are_bytes());
        assert!(!vec![1u8].elements_are_bytes());
        assert_eq!(Some(&[1u8, 2][..]), vec![1u8, 2].as_bytes());
        assert!(matches!(
            vec![0u8].bytes_mut(),
            Some(BytesMut::Growable(_))
        ));
        assert!(matches!([0u8; 3].bytes_mut(), Some(BytesMut::Fixed(_))));
        assert!(vec![0i32].bytes_mut().is_none());
    }

    #[test]
    fn map_insert_default_replaces() {
        let mut map: HashMap<String, Vec<i32>> = HashMap::new();
        map.insert("a".to_string(), vec![1]);
        assert!(map.insert_default("a").is_some());
        assert_eq!(Some(&Vec::new()), map.get("a"));
        assert!(MapMut::string_keyed(&map));

        let mut keyed_by_int: BTreeMap<u32, i32> = BTreeMap::new();
        assert!(!MapMut::string_keyed(&keyed_by_int));
        assert!(keyed_by_int.insert_default("1").is_none());
        assert_eq!("u32", keyed_by_int.key_type_name());
    }
}
