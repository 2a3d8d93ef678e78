//! The hierarchy protocol used to recover base pointers from an erased
//! pointer.
//!
//! Rust has no class inheritance, so "`Base` is a base of `Derived`" is
//! expressed structurally: `Derived` embeds a `Base` as a field, and a pointer
//! to the `Base` sub-object is the address of that field. Trait objects a type
//! implements can be listed as bases too, which covers the other common form
//! of polymorphism in Rust.
//!
//! A walk works like a thrown pointer meeting a catch clause: the concrete
//! type [offers](Upcast::offer) itself and every sub-object it knows about to
//! a [`Catcher`], and the catcher keeps the one pointer whose type is the
//! requested one.

use core::{
    any::{Any, TypeId},
    marker::PhantomData,
};

/// Trait for types that can be stored in an erased pointer and recovered as
/// themselves or as any of their bases.
///
/// Implementations are usually generated with the `upcast!` macro of the
/// `anyptr` crate. A type with no bases can use the default
/// [`offer`](Upcast::offer), which only offers the type itself.
///
/// # Safety
///
/// Every pointer handed to [`Catcher::accept`] (directly, or through a nested
/// call to another type's [`offer`](Upcast::offer)) must be derived from the
/// `ptr` argument such that:
///
/// 1. If `ptr` is null, the offered pointer is null.
/// 2. Otherwise, if `ptr` points to a live `Self`, the offered pointer points
///    to a live value of the offered type that lies entirely within that
///    `Self` and may be accessed in every way the `Self` may be accessed.
///
/// In practice this means offering `ptr` itself, an unsizing coercion of
/// `ptr` (`*const Self` to `*const dyn Trait`, offered through
/// [`Catcher::accept_from`] with `Self` as the source), or the address of a
/// field computed with [`field_ptr`].
///
/// # Examples
///
/// ```
/// use anyptr_internals::{Catcher, Upcast, upcast::field_ptr};
///
/// struct Base {
///     id: u32,
/// }
///
/// struct Derived {
///     name: &'static str,
///     base: Base,
/// }
///
/// // SAFETY: `Base` offers only itself, which is always allowed.
/// unsafe impl Upcast for Base {}
///
/// // SAFETY: the `Base` pointer is the address of the `base` field.
/// unsafe impl Upcast for Derived {
///     fn offer(ptr: *const Self, catcher: &mut Catcher<'_>) {
///         catcher.accept(ptr);
///         let base: *const Base = field_ptr(ptr, core::mem::offset_of!(Derived, base));
///         Base::offer(base, catcher);
///     }
/// }
/// ```
pub unsafe trait Upcast: Sized + 'static {
    /// Offers `ptr` and every base reachable from it to `catcher`.
    ///
    /// The default implementation offers only `ptr` itself.
    #[inline]
    fn offer(ptr: *const Self, catcher: &mut Catcher<'_>) {
        catcher.accept(ptr);
    }
}

/// The receiving end of an [`Upcast::offer`] walk.
///
/// A catcher is created for one requested pointee type `R` and borrows an
/// `Option<*const R>` slot. Every offered pointer whose pointee type is not
/// `R` is ignored; the first one that is `R` is written to the slot.
///
/// Offering two different sub-objects of type `R` makes the result
/// [ambiguous](Catcher::is_ambiguous). A sub-object is identified by its
/// address together with the concrete type of the object behind it, so the
/// same sub-object offered twice counts once, while a base at offset zero and
/// the object containing it remain distinct even when both are offered as the
/// same trait object.
pub struct Catcher<'a> {
    /// The [`TypeId`] of the requested pointee type `R`.
    target: TypeId,
    /// The slot receiving the first matching pointer. Always an
    /// `Option<*const R>` for the `R` whose id is `target`.
    slot: &'a mut dyn Any,
    /// The concrete type behind the pointer in `slot`, once one is stored.
    source: Option<TypeId>,
    /// Number of distinct matching sub-objects seen so far.
    hits: usize,
}

impl<'a> Catcher<'a> {
    /// Creates a catcher for pointers to `R`, writing into `slot`.
    ///
    /// The slot is reset to `None` first.
    #[inline]
    pub fn new<R: ?Sized + 'static>(slot: &'a mut Option<*const R>) -> Self {
        *slot = None;
        Self {
            target: TypeId::of::<R>(),
            slot,
            source: None,
            hits: 0,
        }
    }

    /// Returns the [`TypeId`] of the pointee type this catcher is waiting
    /// for.
    #[inline]
    pub fn target_type_id(&self) -> TypeId {
        self.target
    }

    /// Offers a pointer to a sub-object of type `T`.
    ///
    /// The pointer is kept if `T` is the requested type and no other
    /// sub-object of that type has been kept yet.
    #[inline]
    pub fn accept<T: 'static>(&mut self, ptr: *const T) {
        self.accept_from::<T, T>(ptr);
    }

    /// Offers a pointer of type `*const U` to an object whose concrete type
    /// is `S`.
    ///
    /// This is how trait objects are offered: `U` is the `dyn Trait` and `S`
    /// is the type the pointer was coerced from. Two offers with the same
    /// address and the same `S` describe the same sub-object.
    pub fn accept_from<S: 'static, U: ?Sized + 'static>(&mut self, ptr: *const U) {
        if TypeId::of::<U>() != self.target {
            return;
        }
        let Some(slot) = self.slot.downcast_mut::<Option<*const U>>() else {
            return;
        };
        let source = TypeId::of::<S>();
        match *slot {
            None => {
                *slot = Some(ptr);
                self.source = Some(source);
                self.hits = 1;
            }
            Some(existing)
                if core::ptr::addr_eq(existing, ptr) && self.source == Some(source) => {}
            Some(_) => self.hits += 1,
        }
    }

    /// Returns `true` once at least one matching pointer has been accepted.
    #[inline]
    pub fn is_caught(&self) -> bool {
        self.hits > 0
    }

    /// Returns `true` if more than one distinct sub-object of the requested
    /// type was offered.
    #[inline]
    pub fn is_ambiguous(&self) -> bool {
        self.hits > 1
    }
}

impl core::fmt::Debug for Catcher<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Catcher")
            .field("target", &self.target)
            .field("hits", &self.hits)
            .finish_non_exhaustive()
    }
}

/// Computes the address of a field at byte `offset` inside `*ptr`.
///
/// Null stays null. The computation uses wrapping arithmetic and never
/// dereferences `ptr`, so it is safe to call on dangling pointers; the result
/// is only meaningful when `offset` comes from
/// [`offset_of!`](core::mem::offset_of) for a field of type `F` in `T`.
#[inline]
pub fn field_ptr<T, F>(ptr: *const T, offset: usize) -> *const F {
    if ptr.is_null() {
        core::ptr::null()
    } else {
        ptr.wrapping_byte_add(offset).cast::<F>()
    }
}

/// Returns a marker carrying the type of `field`.
///
/// Used to check the declared type of a base field. Unlike a `&F`, the
/// returned marker is never subject to deref coercion, so a `Box<Base>` field
/// cannot pass for a `Base` one. The argument is a reference, which rejects
/// fields of `#[repr(packed)]` structs.
#[inline]
pub fn field_type<F>(_field: &F) -> PhantomData<&F> {
    PhantomData
}
