use core::fmt;

pub use anyptr_internals::CastFailure;

/// The error returned when an [`AnyPtr`] cannot be recovered as the requested
/// type.
///
/// This is the only error the crate produces. Its [`Display`] output is always
/// the fixed message `bad any_ptr cast`, whatever the cause. The cause and the
/// types involved can be inspected through [`failure`], [`held_type_name`]
/// and [`requested_type_name`].
///
/// # Examples
///
/// ```
/// use anyptr::{AnyPtr, BadCastError, CastFailure};
///
/// let value = 5u32;
/// let ptr = AnyPtr::from(&value);
///
/// let error: BadCastError = ptr.cast::<String>().unwrap_err();
/// assert_eq!(error.to_string(), "bad any_ptr cast");
/// assert_eq!(error.failure(), CastFailure::Unrelated);
/// assert_eq!(error.held_type_name(), Some("*const u32"));
/// ```
///
/// [`AnyPtr`]: crate::AnyPtr
/// [`Display`]: fmt::Display
/// [`failure`]: BadCastError::failure
/// [`held_type_name`]: BadCastError::held_type_name
/// [`requested_type_name`]: BadCastError::requested_type_name
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BadCastError {
    failure: CastFailure,
    held_type_name: Option<&'static str>,
    requested_type_name: &'static str,
}

impl BadCastError {
    pub(crate) fn new<R: ?Sized>(failure: CastFailure, held_type_name: Option<&'static str>) -> Self {
        Self {
            failure,
            held_type_name,
            requested_type_name: core::any::type_name::<R>(),
        }
    }

    /// Returns why the cast failed.
    pub fn failure(&self) -> CastFailure {
        self.failure
    }

    /// Returns the [`core::any::type_name`] of the pointer type that was held,
    /// or `None` if the pointer was empty.
    pub fn held_type_name(&self) -> Option<&'static str> {
        self.held_type_name
    }

    /// Returns the [`core::any::type_name`] of the pointee type that was
    /// requested.
    pub fn requested_type_name(&self) -> &'static str {
        self.requested_type_name
    }
}

impl fmt::Display for BadCastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("bad any_ptr cast")
    }
}

impl core::error::Error for BadCastError {}
