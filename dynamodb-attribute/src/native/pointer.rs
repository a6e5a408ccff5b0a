/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::rc::Rc;
use std::sync::Arc;

use crate::field::RawField;
use crate::hook::Unmarshaler;
use crate::native::{Indirect, Native, RecordFields, Shape, ShapeMut};

impl<T: Native + Default> Indirect for Option<T> {
    fn inner_is_indirection(&self) -> bool {
        T::is_indirection()
    }

    fn clear(&mut self) {
        *self = None;
    }

    fn inner_mut(&mut self) -> Option<&mut dyn Native> {
        self.as_mut().map(|inner| inner as &mut dyn Native)
    }

    fn inner_or_insert(&mut self) -> &mut dyn Native {
        self.get_or_insert_with(T::default)
    }
}

impl<T: Native + Default> Native for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(inner) => Shape::Indirect(inner),
            None => Shape::Null,
        }
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Indirect(self)
    }

    fn reset(&mut self) {
        *self = None;
    }

    fn is_indirection() -> bool {
        true
    }
}

// Boxes and uniquely owned shared pointers are written through transparently,
// so only `Option` is ever cleared by a null attribute.
impl<T: Native> Native for Box<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Indirect(&**self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        (**self).shape_mut()
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn unmarshaler(&mut self) -> Option<&mut dyn Unmarshaler> {
        (**self).unmarshaler()
    }

    fn is_indirection() -> bool {
        T::is_indirection()
    }
}

macro_rules! impl_shared_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: Native> Native for $ptr<T> {
                fn shape(&self) -> Shape<'_> {
                    Shape::Indirect(&**self)
                }

                fn shape_mut(&mut self) -> ShapeMut<'_> {
                    match $ptr::get_mut(self) {
                        Some(inner) => inner.shape_mut(),
                        None => ShapeMut::ReadOnly,
                    }
                }

                fn reset(&mut self) {
                    if let Some(inner) = $ptr::get_mut(self) {
                        inner.reset();
                    }
                }

                fn unmarshaler(&mut self) -> Option<&mut dyn Unmarshaler> {
                    $ptr::get_mut(self).and_then(|inner| inner.unmarshaler())
                }

                fn is_indirection() -> bool {
                    T::is_indirection()
                }
            }
        )*
    };
}

impl_shared_pointer!(Rc, Arc);

impl<T: Native> Native for &T {
    fn shape(&self) -> Shape<'_> {
        Shape::Indirect(*self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::ReadOnly
    }

    fn reset(&mut self) {}
}

impl<T: RecordFields> RecordFields for Option<T> {
    fn record_fields() -> &'static [RawField] {
        T::record_fields()
    }
}

impl<T: RecordFields> RecordFields for Box<T> {
    fn record_fields() -> &'static [RawField] {
        T::record_fields()
    }
}
