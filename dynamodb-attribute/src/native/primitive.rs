/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::native::{MapKey, Native, Number, NumberMut, Shape, ShapeMut};

impl Native for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Bool(*self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Bool(self)
    }

    fn reset(&mut self) {
        *self = false;
    }
}

macro_rules! impl_number {
    ($($ty:ty => $number:ident($as:ty), $slot:ident;)*) => {
        $(
            impl Native for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Number(Number::$number(*self as $as))
                }

                fn shape_mut(&mut self) -> ShapeMut<'_> {
                    ShapeMut::Number(NumberMut::$slot(self))
                }

                fn reset(&mut self) {
                    *self = Default::default();
                }
            }
        )*
    };
}

impl_number! {
    i8 => Int(i64), I8;
    i16 => Int(i64), I16;
    i32 => Int(i64), I32;
    i64 => Int(i64), I64;
    isize => Int(i64), Isize;
    u16 => Uint(u64), U16;
    u32 => Uint(u64), U32;
    u64 => Uint(u64), U64;
    usize => Uint(u64), Usize;
    f32 => F32(f32), F32;
    f64 => F64(f64), F64;
}

// `u8` is also the element type of byte sequences.
impl Native for u8 {
    fn shape(&self) -> Shape<'_> {
        Shape::Number(Number::Uint(*self as u64))
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Number(NumberMut::U8(self))
    }

    fn reset(&mut self) {
        *self = 0;
    }

    fn slice_as_bytes(slice: &[Self]) -> Option<&[u8]> {
        Some(slice)
    }

    fn slice_as_bytes_mut(slice: &mut [Self]) -> Option<&mut [u8]> {
        Some(slice)
    }

    fn vec_as_bytes_mut(vec: &mut Vec<Self>) -> Option<&mut Vec<u8>> {
        Some(vec)
    }
}

impl Native for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Str(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Str(self)
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl Native for &str {
    fn shape(&self) -> Shape<'_> {
        Shape::Str(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::ReadOnly
    }

    fn reset(&mut self) {
        *self = "";
    }
}

impl MapKey for String {
    const STRING_KEYED: bool = true;

    fn to_key(&self) -> String {
        self.clone()
    }

    fn from_key(key: &str) -> Option<Self> {
        Some(key.to_string())
    }
}

impl MapKey for &str {
    fn to_key(&self) -> String {
        self.to_string()
    }
}

macro_rules! impl_display_key {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                fn to_key(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_display_key!(bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
