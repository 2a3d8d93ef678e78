//! Internal utility types.

/// Marker type used as the pointee of a type-erased pointer.
///
/// This zero-sized type stands in for the concrete pointee once it has been
/// erased. A `*const Erased` is never dereferenced; it is only ever cast back
/// to `*const T` by code that knows `T` from the vtable it was stored with.
///
/// Using a distinct marker type (rather than `()`) makes the intent clearer
/// in type signatures and error messages.
pub(crate) struct Erased;
