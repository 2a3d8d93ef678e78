//! Markers recording whether an erased pointer permits mutable access.
//!
//! A container bound from a `*const T` and one bound from a `*mut T` are
//! distinct: the reported pointer type differs, and only the latter hands out
//! `*mut` pointers on retrieval. The marker is chosen once, at construction,
//! and is baked into the vtable together with `T`.

/// Sealed trait implemented by [`Const`] and [`Mut`].
///
/// The associated [`Ptr`](Mutability::Ptr) type is the raw pointer type a
/// container reports as its identity.
pub trait Mutability: sealed::Sealed + 'static {
    /// Whether pointers bound with this marker may be retrieved as `*mut`.
    const IS_MUTABLE: bool;

    /// The raw pointer type to `T` with this mutability.
    type Ptr<T: ?Sized + 'static>: Copy + 'static;
}

/// Marker for pointers bound from `*const T` or `&T`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Const;

/// Marker for pointers bound from `*mut T` or `&mut T`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mut;

impl Mutability for Const {
    const IS_MUTABLE: bool = false;
    type Ptr<T: ?Sized + 'static> = *const T;
}

impl Mutability for Mut {
    const IS_MUTABLE: bool = true;
    type Ptr<T: ?Sized + 'static> = *mut T;
}

/// Prevents downstream implementations of [`Mutability`].
mod sealed {
    /// Supertrait of [`Mutability`](super::Mutability).
    pub trait Sealed {}
    impl Sealed for super::Const {}
    impl Sealed for super::Mut {}
}
