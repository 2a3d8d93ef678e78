//! Type-erased pointer type.
//!
//! This module encapsulates the `ptr` and `vtable` fields of [`RawAnyPtr`],
//! ensuring they are only visible within this module. This visibility
//! restriction guarantees the safety invariant: **when a vtable is present,
//! the pointer is null or was erased from a `*const T` for the `T` the vtable
//! was created with**.
//!
//! # Safety Invariant
//!
//! The fields can only be set together, by [`RawAnyPtr::new_const`] and
//! [`RawAnyPtr::new_mut`], which take the typed pointer and create the vtable
//! from the same type parameter. The empty state has no vtable and a null
//! pointer. Copying, swapping and resetting move both fields as a unit.
//!
//! # Type Erasure
//!
//! The concrete pointee type `T` is erased by casting to `*const Erased`. The
//! vtable provides the runtime type information needed to recover `T`, or
//! one of the bases of `T`, later.

use core::any::TypeId;

use crate::{
    mutability::{Const, Mut, Mutability},
    pointer::vtable::PointerVtable,
    upcast::{Catcher, Upcast},
    util::Erased,
};

/// Reasons a pointer could not be recovered as the requested type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CastFailure {
    /// The container holds no pointer.
    Empty,
    /// The requested type is neither the stored type nor reachable from it.
    Unrelated,
    /// More than one sub-object of the requested type is reachable.
    Ambiguous,
    /// A mutable pointer was requested but the stored pointer is const.
    Immutable,
}

impl core::fmt::Display for CastFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            CastFailure::Empty => "the pointer is empty",
            CastFailure::Unrelated => "the requested type is not reachable from the stored type",
            CastFailure::Ambiguous => "the requested type is reachable more than once",
            CastFailure::Immutable => "the stored pointer does not permit mutation",
        })
    }
}

/// A pointer of some concrete type `T`, paired with a vtable that remembers
/// `T`, though we do not know statically which `T` it is.
///
/// The pointer is not owned: nothing is dropped or freed, and the pointer may
/// be null or dangling. It is only ever dereferenced by callers that have
/// their own guarantee of validity.
#[derive(Copy, Clone)]
pub struct RawAnyPtr {
    /// The erased pointer
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. If `vtable` is `Some`, the pointer is null or was created from a
    ///    `*const T` for the `T` the vtable was created with.
    /// 2. If `vtable` is `None`, the pointer is null.
    ptr: *const Erased,

    /// Type information for `ptr`, or `None` when empty.
    vtable: Option<&'static PointerVtable>,
}

impl RawAnyPtr {
    /// Creates an empty [`RawAnyPtr`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            ptr: core::ptr::null(),
            vtable: None,
        }
    }

    /// Creates a new [`RawAnyPtr`] bound to a `*const T`.
    ///
    /// The resulting pointer permits shared retrieval only.
    #[inline]
    pub fn new_const<T: Upcast>(ptr: *const T) -> Self {
        Self::from_parts::<T, Const>(ptr)
    }

    /// Creates a new [`RawAnyPtr`] bound to a `*mut T`.
    ///
    /// The resulting pointer permits both shared and mutable retrieval.
    #[inline]
    pub fn new_mut<T: Upcast>(ptr: *mut T) -> Self {
        Self::from_parts::<T, Mut>(ptr.cast_const())
    }

    /// Binds `ptr` together with the vtable for `T` and `M`.
    #[inline]
    fn from_parts<T: Upcast, M: Mutability>(ptr: *const T) -> Self {
        Self {
            ptr: ptr.cast::<Erased>(),
            vtable: Some(PointerVtable::new::<T, M>()),
        }
    }

    /// Returns `true` if no pointer is stored.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.vtable.is_none()
    }

    /// Returns `true` if the stored pointer was bound from a `*mut T`.
    ///
    /// Always `false` when empty.
    #[inline]
    pub fn is_mutable(self) -> bool {
        self.vtable.is_some_and(|vtable| vtable.is_mutable())
    }

    /// Returns the [`TypeId`] of the stored pointer type (`*const T` or
    /// `*mut T`), or `None` when empty.
    #[inline]
    pub fn type_id(self) -> Option<TypeId> {
        self.vtable.map(|vtable| vtable.type_id())
    }

    /// Returns the [`TypeId`] of the stored pointee type `T`, or `None` when
    /// empty.
    #[inline]
    pub fn pointee_type_id(self) -> Option<TypeId> {
        self.vtable.map(|vtable| vtable.pointee_type_id())
    }

    /// Returns the [`core::any::type_name`] of the stored pointer type, or
    /// `None` when empty.
    #[inline]
    pub fn type_name(self) -> Option<&'static str> {
        self.vtable.map(|vtable| vtable.type_name())
    }

    /// Returns the [`core::any::type_name`] of the stored pointee type, or
    /// `None` when empty.
    #[inline]
    pub fn pointee_type_name(self) -> Option<&'static str> {
        self.vtable.map(|vtable| vtable.pointee_type_name())
    }

    /// Returns the stored address with its type erased.
    #[inline]
    pub fn as_ptr(self) -> *const () {
        self.ptr.cast::<()>()
    }

    /// Recovers the stored pointer as a pointer to `R`.
    ///
    /// If `R` is exactly the stored pointee type, the pointer is returned
    /// without walking any bases. Otherwise every base the stored type offers
    /// is checked, and the pointer to the single sub-object of type `R` is
    /// returned.
    ///
    /// Mutability is not checked here; the returned pointer is always
    /// `*const R`.
    pub fn dynamic_upcast<R: ?Sized + 'static>(self) -> Result<*const R, CastFailure> {
        let Some(vtable) = self.vtable else {
            return Err(CastFailure::Empty);
        };

        let mut slot: Option<*const R> = None;
        let mut catcher = Catcher::new(&mut slot);
        if vtable.pointee_type_id() == TypeId::of::<R>() {
            // SAFETY:
            // 1. The pointer matches the vtable as guaranteed by the invariants on
            //    this type
            unsafe {
                vtable.exact(self.ptr, &mut catcher);
            }
        } else {
            // SAFETY:
            // 1. The pointer matches the vtable as guaranteed by the invariants on
            //    this type
            unsafe {
                vtable.throw(self.ptr, &mut catcher);
            }
        }
        let ambiguous = catcher.is_ambiguous();

        match slot {
            Some(_) if ambiguous => Err(CastFailure::Ambiguous),
            Some(ptr) => Ok(ptr),
            None => Err(CastFailure::Unrelated),
        }
    }
}

impl Default for RawAnyPtr {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl core::fmt::Debug for RawAnyPtr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.type_name() {
            Some(type_name) => f
                .debug_struct("RawAnyPtr")
                .field("type", &type_name)
                .field("ptr", &self.ptr)
                .finish(),
            None => f.write_str("RawAnyPtr(empty)"),
        }
    }
}
