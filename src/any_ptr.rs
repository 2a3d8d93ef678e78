use core::{any::TypeId, fmt};

use anyptr_internals::{RawAnyPtr, Upcast};

use crate::error::{BadCastError, CastFailure};

/// A type-erased, non-owning pointer that can be recovered as its own type or
/// as any of its bases.
///
/// An [`AnyPtr`] is bound to a `*const T` or `*mut T` for some concrete `T`
/// implementing [`Upcast`], or is empty. It can later be recovered as:
///
/// - exactly `T`, through a single [`TypeId`] comparison, or
/// - any base of `T` listed by its [`Upcast`] implementation (and, through
///   those, the bases of the bases), with the pointer adjusted to the base
///   sub-object.
///
/// Which casts succeed depends only on `T`. There is no global state, and
/// two containers bound to the same pointer always answer alike.
///
/// The pointee is never owned, read or written by the container. The stored
/// pointer may be null or dangling; whoever dereferences a retrieved pointer
/// is responsible for its validity. Use [`AnyRef`] or [`AnyMut`] to have the
/// borrow checker track that instead.
///
/// A pointer bound from `*const T` (or `&T`) can only be retrieved as
/// `*const R`. A pointer bound from `*mut T` (or `&mut T`) can be retrieved
/// as either.
///
/// # Examples
///
/// ```
/// use anyptr::{AnyPtr, upcast};
///
/// struct Base {
///     id: u32,
/// }
/// upcast!(Base);
///
/// struct Derived {
///     name: &'static str,
///     base: Base,
/// }
/// upcast!(Derived { base: Base });
///
/// struct Unrelated;
/// upcast!(Unrelated);
///
/// let derived = Derived {
///     name: "derived",
///     base: Base { id: 3 },
/// };
/// let ptr = AnyPtr::from(&derived);
///
/// assert_eq!(ptr.try_cast::<Derived>(), Some(&derived as *const Derived));
/// assert_eq!(ptr.try_cast::<Base>(), Some(&derived.base as *const Base));
/// assert_eq!(ptr.try_cast::<Unrelated>(), None);
/// assert!(ptr.cast::<Unrelated>().is_err());
/// ```
///
/// [`AnyRef`]: crate::AnyRef
/// [`AnyMut`]: crate::AnyMut
#[derive(Copy, Clone, Default)]
#[repr(transparent)]
pub struct AnyPtr {
    raw: RawAnyPtr,
}

impl AnyPtr {
    /// Creates an empty [`AnyPtr`].
    ///
    /// This is the same as [`AnyPtr::default`].
    ///
    /// # Examples
    ///
    /// ```
    /// use core::any::TypeId;
    ///
    /// use anyptr::AnyPtr;
    ///
    /// let ptr = AnyPtr::empty();
    /// assert!(!ptr.has_value());
    /// assert_eq!(ptr.type_id(), TypeId::of::<()>());
    /// assert_eq!(ptr.try_cast::<u32>(), None);
    /// ```
    #[inline]
    pub const fn empty() -> Self {
        Self {
            raw: RawAnyPtr::empty(),
        }
    }

    /// Creates an [`AnyPtr`] bound to a `*const T`.
    ///
    /// The pointer may be null. Only shared retrieval is permitted.
    #[inline]
    pub fn from_const<T: Upcast>(ptr: *const T) -> Self {
        Self {
            raw: RawAnyPtr::new_const(ptr),
        }
    }

    /// Creates an [`AnyPtr`] bound to a `*mut T`.
    ///
    /// The pointer may be null. Both shared and mutable retrieval are
    /// permitted.
    #[inline]
    pub fn from_mut<T: Upcast>(ptr: *mut T) -> Self {
        Self {
            raw: RawAnyPtr::new_mut(ptr),
        }
    }

    /// Returns `true` if a pointer is stored, even if that pointer is null.
    ///
    /// # Examples
    ///
    /// ```
    /// use anyptr::AnyPtr;
    ///
    /// assert!(!AnyPtr::empty().has_value());
    /// assert!(AnyPtr::from_const(core::ptr::null::<u8>()).has_value());
    /// ```
    #[inline]
    pub fn has_value(&self) -> bool {
        !self.raw.is_empty()
    }

    /// Returns `true` if the stored pointer was bound from a `*mut T` or a
    /// `&mut T`.
    #[inline]
    pub fn is_mutable(&self) -> bool {
        self.raw.is_mutable()
    }

    /// Returns the [`TypeId`] of the exact pointer type this was bound to.
    ///
    /// This is `TypeId::of::<*const T>()` or `TypeId::of::<*mut T>()` for the
    /// concrete `T`, never the id of a base. When empty, this is
    /// `TypeId::of::<()>()`.
    ///
    /// This inherent method shadows [`Any::type_id`], which `AnyPtr` also
    /// implements since it is `'static`. Calling `type_id` through
    /// `&dyn Any` returns the id of `AnyPtr` itself instead.
    ///
    /// [`Any::type_id`]: core::any::Any::type_id
    ///
    /// # Examples
    ///
    /// ```
    /// use core::any::TypeId;
    ///
    /// use anyptr::AnyPtr;
    ///
    /// let mut value = 1u8;
    /// assert_eq!(AnyPtr::from(&value).type_id(), TypeId::of::<*const u8>());
    /// assert_eq!(AnyPtr::from(&mut value).type_id(), TypeId::of::<*mut u8>());
    /// ```
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.raw.type_id().unwrap_or_else(TypeId::of::<()>)
    }

    /// Returns the [`core::any::type_name`] of the exact pointer type this
    /// was bound to, or `"()"` when empty.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.raw.type_name().unwrap_or("()")
    }

    /// Returns the stored address with its type erased.
    ///
    /// This is null when empty, and also when bound to a null pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const () {
        self.raw.as_ptr()
    }

    /// Returns this pointer to the empty state.
    ///
    /// Resetting an empty pointer does nothing.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// Exchanges the contents of `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use anyptr::AnyPtr;
    ///
    /// let (a, b) = (1u8, 2u16);
    /// let mut x = AnyPtr::from(&a);
    /// let mut y = AnyPtr::from(&b);
    /// x.swap(&mut y);
    /// assert_eq!(x.try_cast::<u16>(), Some(&b as *const u16));
    /// assert_eq!(y.try_cast::<u8>(), Some(&a as *const u8));
    /// ```
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Moves the contents out of `self`, leaving it empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Recovers the pointer as a `*const R`.
    ///
    /// Returns `None` if this is empty, or if `R` is neither the stored type
    /// nor exactly one base reachable from it.
    #[inline]
    pub fn try_cast<R: ?Sized + 'static>(&self) -> Option<*const R> {
        self.dynamic_upcast::<R>().ok()
    }

    /// Recovers the pointer as a `*mut R`.
    ///
    /// Returns `None` in the same cases as [`try_cast`](Self::try_cast), and
    /// also when the stored pointer was bound from a `*const T`.
    #[inline]
    pub fn try_cast_mut<R: ?Sized + 'static>(&self) -> Option<*mut R> {
        self.dynamic_upcast_mut::<R>().ok()
    }

    /// Recovers the pointer as a `*const R`, or returns a [`BadCastError`]
    /// describing why that is not possible.
    ///
    /// # Examples
    ///
    /// ```
    /// use anyptr::{AnyPtr, CastFailure};
    ///
    /// let value = 9i32;
    /// let ptr = AnyPtr::from(&value);
    /// assert_eq!(ptr.cast::<i32>(), Ok(&value as *const i32));
    ///
    /// let error = ptr.cast::<u8>().unwrap_err();
    /// assert_eq!(error.failure(), CastFailure::Unrelated);
    /// assert_eq!(
    ///     AnyPtr::empty().cast::<i32>().unwrap_err().failure(),
    ///     CastFailure::Empty
    /// );
    /// ```
    pub fn cast<R: ?Sized + 'static>(&self) -> Result<*const R, BadCastError> {
        self.dynamic_upcast::<R>()
            .map_err(|failure| self.cast_error::<R>(failure))
    }

    /// Recovers the pointer as a `*mut R`, or returns a [`BadCastError`]
    /// describing why that is not possible.
    ///
    /// Fails with [`CastFailure::Immutable`] when the stored pointer was bound
    /// from a `*const T`.
    pub fn cast_mut<R: ?Sized + 'static>(&self) -> Result<*mut R, BadCastError> {
        self.dynamic_upcast_mut::<R>()
            .map_err(|failure| self.cast_error::<R>(failure))
    }

    /// The matching routine shared by every retrieval method.
    #[inline]
    fn dynamic_upcast<R: ?Sized + 'static>(&self) -> Result<*const R, CastFailure> {
        self.raw.dynamic_upcast::<R>()
    }

    fn dynamic_upcast_mut<R: ?Sized + 'static>(&self) -> Result<*mut R, CastFailure> {
        if self.has_value() && !self.is_mutable() {
            return Err(CastFailure::Immutable);
        }
        self.dynamic_upcast::<R>().map(|ptr| ptr.cast_mut())
    }

    fn cast_error<R: ?Sized + 'static>(&self, failure: CastFailure) -> BadCastError {
        trace_event!(
            trace,
            held = self.type_name(),
            requested = core::any::type_name::<R>(),
            ?failure,
            "any_ptr cast failed"
        );
        BadCastError::new::<R>(failure, self.raw.type_name())
    }
}

impl<T: Upcast> From<*const T> for AnyPtr {
    #[inline]
    fn from(ptr: *const T) -> Self {
        Self::from_const(ptr)
    }
}

impl<T: Upcast> From<*mut T> for AnyPtr {
    #[inline]
    fn from(ptr: *mut T) -> Self {
        Self::from_mut(ptr)
    }
}

impl<T: Upcast> From<&T> for AnyPtr {
    #[inline]
    fn from(value: &T) -> Self {
        Self::from_const(core::ptr::from_ref(value))
    }
}

impl<T: Upcast> From<&mut T> for AnyPtr {
    #[inline]
    fn from(value: &mut T) -> Self {
        Self::from_mut(core::ptr::from_mut(value))
    }
}

impl fmt::Debug for AnyPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_value() {
            f.debug_struct("AnyPtr")
                .field("type", &self.type_name())
                .field("ptr", &self.as_ptr())
                .finish()
        } else {
            f.write_str("AnyPtr(empty)")
        }
    }
}

/// Recovers the pointer held by `any_ptr` as a `*const R`.
///
/// Free-function form of [`AnyPtr::try_cast`].
#[inline]
pub fn try_cast<R: ?Sized + 'static>(any_ptr: &AnyPtr) -> Option<*const R> {
    any_ptr.try_cast::<R>()
}

/// Recovers the pointer held by `any_ptr` as a `*const R`, or returns a
/// [`BadCastError`].
///
/// Free-function form of [`AnyPtr::cast`].
#[inline]
pub fn cast<R: ?Sized + 'static>(any_ptr: &AnyPtr) -> Result<*const R, BadCastError> {
    any_ptr.cast::<R>()
}

/// Exchanges the contents of two [`AnyPtr`]s.
///
/// Free-function form of [`AnyPtr::swap`], for generic code written against
/// free functions.
#[inline]
pub fn swap(a: &mut AnyPtr, b: &mut AnyPtr) {
    a.swap(b);
}
