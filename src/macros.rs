/// Implements [`Upcast`] for a struct, listing the bases it can be recovered
/// as.
///
/// The macro takes the type, optionally followed by the fields that hold its
/// base sub-objects in braces, optionally followed by `=>` and the trait
/// objects (or other unsized targets) it can be viewed as:
///
/// ```text
/// upcast!(Type);
/// upcast!(Type { field: FieldType, other: OtherType });
/// upcast!(Type => dyn Trait, dyn OtherTrait);
/// upcast!(Type { field: FieldType } => dyn Trait);
/// ```
///
/// Every field type must itself implement [`Upcast`]; its own bases become
/// reachable from `Type` as well. The macro checks that each listed field
/// has the listed type, and targets after `=>` are produced by unsizing
/// coercion only, so the generated `unsafe impl` is always sound.
///
/// # Examples
///
/// ```
/// use anyptr::{AnyPtr, upcast};
///
/// trait Shape {
///     fn area(&self) -> f64;
/// }
///
/// struct Object {
///     id: u32,
/// }
/// upcast!(Object);
///
/// struct Circle {
///     object: Object,
///     radius: f64,
/// }
/// upcast!(Circle { object: Object } => dyn Shape);
///
/// impl Shape for Circle {
///     fn area(&self) -> f64 {
///         3.0 * self.radius * self.radius
///     }
/// }
///
/// let circle = Circle {
///     object: Object { id: 7 },
///     radius: 2.0,
/// };
/// let ptr = AnyPtr::from(&circle);
///
/// let object: *const Object = ptr.try_cast::<Object>().unwrap();
/// assert_eq!(object, &circle.object as *const Object);
///
/// let shape: *const dyn Shape = ptr.try_cast::<dyn Shape>().unwrap();
/// // SAFETY: `circle` is still alive
/// assert_eq!(unsafe { (*shape).area() }, 12.0);
/// ```
///
/// A field is only accepted as a base if its type is exactly the listed one.
/// A field that merely dereferences to the base, such as a `Box<Base>`, is
/// rejected:
///
/// ```compile_fail
/// use anyptr::upcast;
///
/// struct Base {
///     value: u32,
/// }
/// upcast!(Base);
///
/// struct Holder {
///     boxed: Box<Base>,
/// }
/// upcast!(Holder { boxed: Base });
/// ```
///
/// [`Upcast`]: crate::Upcast
#[macro_export]
macro_rules! upcast {
    ($ty:ty $({ $($field:ident : $base:ty),* $(,)? })? $(=> $($target:ty),+ $(,)?)?) => {
        // SAFETY: every base pointer is the address of a field whose type is
        // checked below, and every target is an unsizing coercion of `ptr`.
        unsafe impl $crate::Upcast for $ty {
            #[inline]
            fn offer(ptr: *const Self, catcher: &mut $crate::Catcher<'_>) {
                catcher.accept(ptr);
                $($(
                    {
                        let target: *const $target = ptr;
                        catcher.accept_from::<Self, _>(target);
                    }
                )+)?
                $($(
                    {
                        let _ = |value: &$ty| {
                            let marker = $crate::field_type(&value.$field);
                            let _: ::core::marker::PhantomData<&$base> = marker;
                        };
                        let base: *const $base = $crate::field_ptr(
                            ptr,
                            ::core::mem::offset_of!($ty, $field),
                        );
                        <$base as $crate::Upcast>::offer(base, catcher);
                    }
                )*)?
            }
        }
    };
}

/// Emits a `tracing` event when the `tracing` feature is enabled, and
/// nothing otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

/// Emits a `tracing` event when the `tracing` feature is enabled, and
/// nothing otherwise.
#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {};
}
