//! [`Upcast`] implementations for primitive and `alloc` types.
//!
//! These have to live here because of the orphan rule. Primitives and
//! [`String`] can additionally be recovered as `dyn Debug` and `dyn Display`.
//! Other types are recoverable as themselves only, through the default
//! [`Upcast::offer`].

use alloc::{boxed::Box, collections::BTreeMap, string::String, vec::Vec};
use core::fmt::{Debug, Display};

use crate::upcast::{Catcher, Upcast};

/// Implements [`Upcast`] for types that also expose `dyn Debug` and
/// `dyn Display`.
macro_rules! formattable {
    ($($ty:ty),* $(,)?) => {
        $(
            // SAFETY: only `ptr` and unsizing coercions of `ptr` are offered.
            unsafe impl Upcast for $ty {
                #[inline]
                fn offer(ptr: *const Self, catcher: &mut Catcher<'_>) {
                    catcher.accept(ptr);
                    let debug: *const dyn Debug = ptr;
                    catcher.accept_from::<Self, _>(debug);
                    let display: *const dyn Display = ptr;
                    catcher.accept_from::<Self, _>(display);
                }
            }
        )*
    };
}

formattable!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, String,
);

// SAFETY: offers only itself
unsafe impl Upcast for () {}

// SAFETY: offers only itself
unsafe impl<T: 'static> Upcast for Vec<T> {}

// SAFETY: offers only itself
unsafe impl<T: ?Sized + 'static> Upcast for Box<T> {}

// SAFETY: offers only itself
unsafe impl<T: 'static> Upcast for Option<T> {}

// SAFETY: offers only itself
unsafe impl<K: 'static, V: 'static> Upcast for BTreeMap<K, V> {}

// SAFETY: offers only itself
unsafe impl<T: 'static, const N: usize> Upcast for [T; N] {}
