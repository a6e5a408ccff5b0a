/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Types that can appear in records but have no attribute value form.
//!
//! Encoding one of these inside a record, map or sequence silently omits it.

use std::sync::mpsc::{Receiver, Sender, SyncSender};

use crate::native::{Native, Shape, ShapeMut};

macro_rules! impl_unsupported {
    ($(impl<$($generic:ident),*> for $ty:ty { reset: $reset:expr })*) => {
        $(
            impl<$($generic),*> Native for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Unsupported(std::any::type_name::<Self>())
                }

                fn shape_mut(&mut self) -> ShapeMut<'_> {
                    ShapeMut::Unsupported
                }

                fn reset(&mut self) {
                    let reset: fn(&mut Self) = $reset;
                    reset(self);
                }
            }
        )*
    };
}

impl_unsupported! {
    impl<T> for *const T { reset: |ptr| *ptr = std::ptr::null() }
    impl<T> for *mut T { reset: |ptr| *ptr = std::ptr::null_mut() }
    impl<R> for fn() -> R { reset: |_| {} }
    impl<A, R> for fn(A) -> R { reset: |_| {} }
    impl<A, B, R> for fn(A, B) -> R { reset: |_| {} }
    impl<T> for Sender<T> { reset: |_| {} }
    impl<T> for SyncSender<T> { reset: |_| {} }
    impl<T> for Receiver<T> { reset: |_| {} }
}
