//! Borrow-checked wrappers around [`AnyPtr`].
//!
//! [`AnyRef`] and [`AnyMut`] are built from references instead of raw
//! pointers, so the lifetime of the borrow is tracked and retrieval can hand
//! out references again without any `unsafe` on the caller's side.

use core::{any::TypeId, fmt, marker::PhantomData};

use anyptr_internals::Upcast;

use crate::{AnyPtr, BadCastError};

/// A type-erased shared reference.
///
/// # Examples
///
/// ```
/// use anyptr::{AnyRef, upcast};
///
/// struct Base {
///     id: u32,
/// }
/// upcast!(Base);
///
/// struct Derived {
///     base: Base,
/// }
/// upcast!(Derived { base: Base });
///
/// let derived = Derived { base: Base { id: 4 } };
/// let any = AnyRef::new(&derived);
/// assert_eq!(any.downcast_ref::<Base>().map(|base| base.id), Some(4));
/// assert!(any.downcast_ref::<u32>().is_none());
/// ```
#[derive(Copy, Clone)]
pub struct AnyRef<'a> {
    /// # Safety
    ///
    /// 1. `ptr` was bound from a reference that is valid for reads during
    ///    `'a`.
    ptr: AnyPtr,
    _lifetime: PhantomData<&'a ()>,
}

impl<'a> AnyRef<'a> {
    /// Erases the type of `value`.
    #[inline]
    pub fn new<T: Upcast>(value: &'a T) -> Self {
        Self {
            ptr: AnyPtr::from(value),
            _lifetime: PhantomData,
        }
    }

    /// Returns the [`TypeId`] of the exact pointer type that was erased.
    ///
    /// See [`AnyPtr::type_id`].
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ptr.type_id()
    }

    /// Returns the name of the exact pointer type that was erased.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ptr.type_name()
    }

    /// Returns the underlying [`AnyPtr`], forgetting the lifetime.
    #[inline]
    pub fn as_any_ptr(&self) -> AnyPtr {
        self.ptr
    }

    /// Recovers the reference as a `&R`.
    ///
    /// Returns `None` if `R` is neither the erased type nor exactly one of
    /// its bases.
    pub fn downcast_ref<R: ?Sized + 'static>(&self) -> Option<&'a R> {
        let ptr = self.ptr.try_cast::<R>()?;
        // SAFETY:
        // 1. `self.ptr` was bound from a non-null reference valid for `'a`, and
        //    every upcast of a non-null pointer to a live `T` points to a live
        //    `R` inside that `T` with the same access rights.
        Some(unsafe { &*ptr })
    }

    /// Recovers the reference as a `&R`, or returns a [`BadCastError`].
    pub fn cast<R: ?Sized + 'static>(&self) -> Result<&'a R, BadCastError> {
        let ptr = self.ptr.cast::<R>()?;
        // SAFETY:
        // 1. See `downcast_ref`.
        Ok(unsafe { &*ptr })
    }
}

impl<'a, T: Upcast> From<&'a T> for AnyRef<'a> {
    #[inline]
    fn from(value: &'a T) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for AnyRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnyRef").field(&self.type_name()).finish()
    }
}

/// A type-erased unique reference.
///
/// # Examples
///
/// ```
/// use anyptr::AnyMut;
///
/// let mut value = 1u32;
/// let mut any = AnyMut::new(&mut value);
/// if let Some(value) = any.downcast_mut::<u32>() {
///     *value += 1;
/// }
/// assert_eq!(any.downcast_ref::<u32>(), Some(&2));
/// ```
#[allow(missing_copy_implementations)] // Copying would alias the unique borrow.
pub struct AnyMut<'a> {
    /// # Safety
    ///
    /// 1. `ptr` was bound from a reference that is valid for reads and writes
    ///    during `'a` and is not aliased.
    ptr: AnyPtr,
    _lifetime: PhantomData<&'a mut ()>,
}

impl<'a> AnyMut<'a> {
    /// Erases the type of `value`.
    #[inline]
    pub fn new<T: Upcast>(value: &'a mut T) -> Self {
        Self {
            ptr: AnyPtr::from(value),
            _lifetime: PhantomData,
        }
    }

    /// Returns the [`TypeId`] of the exact pointer type that was erased.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ptr.type_id()
    }

    /// Returns the name of the exact pointer type that was erased.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ptr.type_name()
    }

    /// Reborrows as a shared [`AnyRef`].
    #[inline]
    pub fn as_ref(&self) -> AnyRef<'_> {
        AnyRef {
            ptr: self.ptr,
            _lifetime: PhantomData,
        }
    }

    /// Converts into a shared [`AnyRef`] for the whole of `'a`.
    #[inline]
    pub fn into_ref(self) -> AnyRef<'a> {
        AnyRef {
            ptr: self.ptr,
            _lifetime: PhantomData,
        }
    }

    /// Recovers a shared reference to `R`.
    pub fn downcast_ref<R: ?Sized + 'static>(&self) -> Option<&R> {
        self.as_ref().downcast_ref::<R>()
    }

    /// Recovers a unique reference to `R`.
    pub fn downcast_mut<R: ?Sized + 'static>(&mut self) -> Option<&mut R> {
        let ptr = self.ptr.try_cast_mut::<R>()?;
        // SAFETY:
        // 1. `self.ptr` was bound from a unique reference valid for `'a`, the
        //    upcast points inside it, and `&mut self` keeps it unaliased for the
        //    lifetime of the result.
        Some(unsafe { &mut *ptr })
    }

    /// Converts into a unique reference to `R` for the whole of `'a`.
    ///
    /// Gives `self` back if the conversion is not possible.
    pub fn into_mut<R: ?Sized + 'static>(self) -> Result<&'a mut R, Self> {
        match self.ptr.try_cast_mut::<R>() {
            // SAFETY:
            // 1. `self.ptr` was bound from a unique reference valid for `'a`,
            //    and `self` is consumed so no other access remains.
            Some(ptr) => Ok(unsafe { &mut *ptr }),
            None => Err(self),
        }
    }
}

impl<'a, T: Upcast> From<&'a mut T> for AnyMut<'a> {
    #[inline]
    fn from(value: &'a mut T) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for AnyMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnyMut").field(&self.type_name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String};

    use super::*;

    struct Inner {
        count: u32,
    }
    crate::upcast!(Inner);

    struct Outer {
        _label: &'static str,
        inner: Inner,
    }
    crate::upcast!(Outer { inner: Inner });

    #[test]
    fn test_any_ref_downcast() {
        let outer = Outer {
            _label: "outer",
            inner: Inner { count: 3 },
        };
        let any = AnyRef::from(&outer);
        assert_eq!(any.type_id(), TypeId::of::<*const Outer>());
        assert!(
            any.downcast_ref::<Inner>()
                .is_some_and(|inner| core::ptr::eq(inner, &outer.inner))
        );
        assert!(any.cast::<String>().is_err());
    }

    #[test]
    fn test_any_mut_downcast() {
        let mut outer = Outer {
            _label: "outer",
            inner: Inner { count: 3 },
        };
        let mut any = AnyMut::from(&mut outer);
        if let Some(inner) = any.downcast_mut::<Inner>() {
            inner.count = 10;
        }
        assert_eq!(any.downcast_ref::<Inner>().map(|inner| inner.count), Some(10));

        let any = match any.into_mut::<u8>() {
            Ok(_) => panic!("Outer is not a u8"),
            Err(any) => any,
        };
        let inner = any.into_mut::<Inner>().map(|inner| {
            inner.count += 1;
            inner.count
        });
        assert_eq!(inner.ok(), Some(11));
        assert_eq!(outer.inner.count, 11);

        let shared = AnyMut::new(&mut outer).into_ref();
        assert_eq!(shared.type_id(), TypeId::of::<*mut Outer>());
        assert_eq!(shared.downcast_ref::<Inner>().map(|inner| inner.count), Some(11));
    }

    #[test]
    fn test_debug() {
        let value = 1u8;
        assert_eq!(format!("{:?}", AnyRef::new(&value)), "AnyRef(\"*const u8\")");
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(AnyRef<'static>: Send, Sync);
        static_assertions::assert_not_impl_any!(AnyMut<'static>: Send, Sync, Copy, Clone);
    }
}
