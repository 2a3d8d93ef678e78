//! Vtable for type-erased pointer operations.
//!
//! This module contains the [`PointerVtable`] which remembers the concrete
//! pointee type `T` and pointer mutability `M` of a [`RawAnyPtr`] after both
//! have been erased. The vtable stores function pointers that dispatch to the
//! correct typed implementations.
//!
//! This module encapsulates the fields of [`PointerVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameters must match the actual pointee
//! type of the pointer stored next to it in the [`RawAnyPtr`]**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`PointerVtable::new`], which pairs the function pointers
//! with specific types `T` and `M` at compile time.
//!
//! [`RawAnyPtr`]: crate::pointer::raw::RawAnyPtr

use core::any::TypeId;

use crate::{
    mutability::Mutability,
    upcast::{Catcher, Upcast},
    util::Erased,
};

/// Vtable for type-erased pointer operations.
///
/// Contains the type identity of the stored pointer and the "thrower" that
/// offers the pointer, and every base reachable from it, to a [`Catcher`].
///
/// # Safety Invariant
///
/// The fields `exact` and `throw` are guaranteed to point to the functions
/// defined below instantiated with the pointee type `T` that was used to
/// create this [`PointerVtable`].
pub(crate) struct PointerVtable {
    /// Gets the [`TypeId`] of the pointer type (`*const T` or `*mut T`).
    type_id: fn() -> TypeId,
    /// Gets the [`TypeId`] of the pointee type `T`.
    pointee_type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the pointer type.
    type_name: fn() -> &'static str,
    /// Gets the [`core::any::type_name`] of the pointee type `T`.
    pointee_type_name: fn() -> &'static str,
    /// Whether the pointer was bound from a `*mut T`.
    is_mutable: bool,
    /// Offers the pointer as exactly `T`, without walking any bases.
    exact: unsafe fn(*const Erased, &mut Catcher<'_>),
    /// Offers the pointer as `T` and as every base `T` knows about.
    throw: unsafe fn(*const Erased, &mut Catcher<'_>),
}

impl PointerVtable {
    /// Creates a new [`PointerVtable`] for the pointee type `T` bound with
    /// mutability `M`.
    pub(super) const fn new<T: Upcast, M: Mutability>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<M::Ptr<T>>,
                pointee_type_id: TypeId::of::<T>,
                type_name: core::any::type_name::<M::Ptr<T>>,
                pointee_type_name: core::any::type_name::<T>,
                is_mutable: M::IS_MUTABLE,
                exact: exact::<T>,
                throw: throw::<T>,
            }
        }
    }

    /// Gets the [`TypeId`] of the pointer type that was used to create this
    /// [`PointerVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`TypeId`] of the pointee type that was used to create this
    /// [`PointerVtable`].
    #[inline]
    pub(super) fn pointee_type_id(&self) -> TypeId {
        (self.pointee_type_id)()
    }

    /// Gets the [`core::any::type_name`] of the pointer type.
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Gets the [`core::any::type_name`] of the pointee type.
    #[inline]
    pub(super) fn pointee_type_name(&self) -> &'static str {
        (self.pointee_type_name)()
    }

    /// Whether the pointer was bound from a `*mut T`.
    #[inline]
    pub(super) fn is_mutable(&self) -> bool {
        self.is_mutable
    }

    /// Offers `ptr` to `catcher` as exactly the pointee type `T` used when
    /// creating this [`PointerVtable`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` is null or was erased from a `*const T` for the `T` used when
    ///    creating this [`PointerVtable`].
    #[inline]
    pub(super) unsafe fn exact(&self, ptr: *const Erased, catcher: &mut Catcher<'_>) {
        // SAFETY: We know that `self.exact` points to the function `exact::<T>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe {
            (self.exact)(ptr, catcher);
        }
    }

    /// Offers `ptr` to `catcher` as the pointee type `T` and as every base
    /// listed by [`T::offer`].
    ///
    /// [`T::offer`]: Upcast::offer
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` is null or was erased from a `*const T` for the `T` used when
    ///    creating this [`PointerVtable`].
    #[inline]
    pub(super) unsafe fn throw(&self, ptr: *const Erased, catcher: &mut Catcher<'_>) {
        // SAFETY: We know that `self.throw` points to the function `throw::<T>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe {
            (self.throw)(ptr, catcher);
        }
    }
}

/// Offers the erased pointer as a `*const T`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` is null or was erased from a `*const T`.
unsafe fn exact<T: Upcast>(ptr: *const Erased, catcher: &mut Catcher<'_>) {
    let ptr: *const T = ptr.cast::<T>();
    catcher.accept(ptr);
}

/// Offers the erased pointer, and every base reachable from it, through
/// [`Upcast::offer`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` is null or was erased from a `*const T`.
unsafe fn throw<T: Upcast>(ptr: *const Erased, catcher: &mut Catcher<'_>) {
    let ptr: *const T = ptr.cast::<T>();
    T::offer(ptr, catcher);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutability::{Const, Mut};

    #[test]
    fn test_pointer_vtable_eq() {
        // Promoted constants may or may not be deduplicated
        let vtable1 = PointerVtable::new::<i32, Const>();
        let vtable2 = PointerVtable::new::<i32, Const>();
        assert_eq!(vtable1.type_id(), vtable2.type_id());
        assert_eq!(vtable1.pointee_type_id(), vtable2.pointee_type_id());

        let vtable3 = PointerVtable::new::<i32, Mut>();
        assert_ne!(vtable1.type_id(), vtable3.type_id());
        assert_eq!(vtable1.pointee_type_id(), vtable3.pointee_type_id());
    }

    #[test]
    fn test_pointer_vtable_type_ids() {
        let vtable = PointerVtable::new::<i32, Const>();
        assert_eq!(vtable.type_id(), TypeId::of::<*const i32>());
        assert_eq!(vtable.pointee_type_id(), TypeId::of::<i32>());
        assert!(!vtable.is_mutable());

        let vtable = PointerVtable::new::<i32, Mut>();
        assert_eq!(vtable.type_id(), TypeId::of::<*mut i32>());
        assert_eq!(vtable.pointee_type_id(), TypeId::of::<i32>());
        assert!(vtable.is_mutable());
    }

    #[test]
    fn test_pointer_vtable_type_names() {
        let vtable = PointerVtable::new::<u64, Mut>();
        assert_eq!(vtable.type_name(), "*mut u64");
        assert_eq!(vtable.pointee_type_name(), "u64");
    }

    #[test]
    fn test_pointer_vtable_exact() {
        let value = 11u8;
        let ptr: *const u8 = &value;
        let vtable = PointerVtable::new::<u8, Const>();

        let mut slot: Option<*const u8> = None;
        let mut catcher = Catcher::new(&mut slot);
        // SAFETY: `ptr` was erased from a `*const u8`
        unsafe {
            vtable.exact(ptr.cast::<Erased>(), &mut catcher);
        }
        assert!(catcher.is_caught());
        assert_eq!(slot, Some(ptr));
    }
}
