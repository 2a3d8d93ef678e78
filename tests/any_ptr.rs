//! Integration tests for the public `AnyPtr` API.

use core::{any::TypeId, fmt::Display};

use anyptr::{AnyMut, AnyPtr, AnyRef, BadCastError, CastFailure, upcast};

trait Named {
    fn name(&self) -> &'static str;
}

struct Base {
    value: u32,
}
upcast!(Base);

struct Derived {
    _padding: [u8; 3],
    base: Base,
}
upcast!(Derived { base: Base } => dyn Named);

impl Named for Derived {
    fn name(&self) -> &'static str {
        "derived"
    }
}

struct MoreDerived {
    _flag: bool,
    derived: Derived,
}
upcast!(MoreDerived { derived: Derived });

/// Two independent `Base` sub-objects.
struct Pair {
    left: Base,
    right: Base,
}
upcast!(Pair { left: Base, right: Base });

struct Unrelated;
upcast!(Unrelated);

fn derived(value: u32) -> Derived {
    Derived {
        _padding: [0; 3],
        base: Base { value },
    }
}

#[test]
fn test_exact_round_trip() {
    let value = derived(1);
    let ptr = AnyPtr::from_const(&value as *const Derived);
    assert!(ptr.has_value());
    assert_eq!(ptr.type_id(), TypeId::of::<*const Derived>());
    assert_eq!(ptr.try_cast::<Derived>(), Some(&value as *const Derived));
    assert_eq!(ptr.cast::<Derived>(), Ok(&value as *const Derived));

    let null = AnyPtr::from_const(core::ptr::null::<Derived>());
    assert!(null.has_value());
    assert_eq!(null.try_cast::<Derived>(), Some(core::ptr::null()));
    assert_eq!(null.cast::<Derived>(), Ok(core::ptr::null()));
    assert_eq!(anyptr::try_cast::<Derived>(&null), Some(core::ptr::null()));
    assert_eq!(anyptr::cast::<Derived>(&null), Ok(core::ptr::null()));

    let mut target = derived(2);
    let null_mut = AnyPtr::from_mut(core::ptr::null_mut::<Derived>());
    assert_eq!(null_mut.cast_mut::<Derived>(), Ok(core::ptr::null_mut()));
    let unique = AnyPtr::from_mut(&mut target as *mut Derived);
    assert_eq!(
        unique.cast_mut::<Derived>(),
        Ok(&mut target as *mut Derived)
    );
}

#[test]
fn test_upcast_matches_static_upcast() {
    let value = derived(7);
    let ptr = AnyPtr::from(&value);
    let base = ptr.try_cast::<Base>();
    assert_eq!(base, Some(&value.base as *const Base));
    // SAFETY: `value` is alive
    assert_eq!(base.map(|base| unsafe { (*base).value }), Some(7));
}

#[test]
fn test_upcast_through_two_levels() {
    let value = MoreDerived {
        _flag: true,
        derived: derived(3),
    };
    let ptr = AnyPtr::from(&value);
    assert_eq!(
        ptr.try_cast::<Derived>(),
        Some(&value.derived as *const Derived)
    );
    assert_eq!(
        ptr.try_cast::<Base>(),
        Some(&value.derived.base as *const Base)
    );
    let named = ptr.try_cast::<dyn Named>();
    // SAFETY: `value` is alive
    assert_eq!(named.map(|named| unsafe { (*named).name() }), Some("derived"));
}

#[test]
fn test_null_upcast_stays_null() {
    let ptr = AnyPtr::from_const(core::ptr::null::<MoreDerived>());
    assert!(ptr.try_cast::<Base>().is_some_and(|base| base.is_null()));
}

#[test]
fn test_unrelated_is_rejected() {
    let value = derived(1);
    let ptr = AnyPtr::from(&value);
    assert_eq!(ptr.try_cast::<Unrelated>(), None);
    assert_eq!(ptr.try_cast::<MoreDerived>(), None);

    let error: BadCastError = ptr.cast::<Unrelated>().unwrap_err();
    assert_eq!(error.failure(), CastFailure::Unrelated);
    assert_eq!(error.to_string(), "bad any_ptr cast");
    assert!(error.requested_type_name().ends_with("Unrelated"));
}

#[test]
fn test_empty_contract() {
    for ptr in [AnyPtr::empty(), AnyPtr::default()] {
        assert!(!ptr.has_value());
        assert_eq!(ptr.type_id(), TypeId::of::<()>());
        assert_eq!(ptr.type_name(), "()");
        assert!(ptr.as_ptr().is_null());
        assert_eq!(ptr.try_cast::<()>(), None);
        assert_eq!(ptr.try_cast::<Base>(), None);
        let error = ptr.cast::<Base>().unwrap_err();
        assert_eq!(error.failure(), CastFailure::Empty);
        assert_eq!(error.held_type_name(), None);
    }
}

#[test]
fn test_reset_is_idempotent() {
    let value = derived(1);
    let mut ptr = AnyPtr::from(&value);
    ptr.reset();
    assert!(!ptr.has_value());
    ptr.reset();
    assert!(!ptr.has_value());
    assert_eq!(ptr.type_id(), TypeId::of::<()>());
}

#[test]
fn test_swap_is_symmetric() {
    let value = derived(1);
    let other = 5u8;
    let mut a = AnyPtr::from(&value);
    let mut b = AnyPtr::from(&other);

    anyptr::swap(&mut a, &mut b);
    assert_eq!(a.type_id(), TypeId::of::<*const u8>());
    assert_eq!(b.type_id(), TypeId::of::<*const Derived>());

    b.swap(&mut a);
    assert_eq!(a.try_cast::<Derived>(), Some(&value as *const Derived));
    assert_eq!(b.try_cast::<u8>(), Some(&other as *const u8));

    let mut empty = AnyPtr::empty();
    a.swap(&mut empty);
    assert!(!a.has_value());
    assert!(empty.has_value());
}

#[test]
fn test_take_leaves_empty() {
    let value = derived(1);
    let mut source = AnyPtr::from(&value);
    let copy = source;
    let moved = source.take();
    assert!(!source.has_value());
    assert_eq!(moved.type_id(), copy.type_id());
    assert_eq!(moved.as_ptr(), copy.as_ptr());
}

#[test]
fn test_derived_base_unrelated() {
    let value = derived(1);
    let ptr = AnyPtr::from(&value);
    assert!(anyptr::try_cast::<Derived>(&ptr).is_some());
    assert!(anyptr::try_cast::<Base>(&ptr).is_some());
    assert!(anyptr::try_cast::<Unrelated>(&ptr).is_none());
    assert!(anyptr::cast::<Unrelated>(&ptr).is_err());
}

#[test]
fn test_const_and_mut_are_distinct() {
    let mut value = derived(1);
    let shared = AnyPtr::from(&value);
    assert!(!shared.is_mutable());
    assert_eq!(shared.type_name(), core::any::type_name::<*const Derived>());
    assert_eq!(shared.try_cast_mut::<Base>(), None);
    assert_eq!(
        shared.cast_mut::<Base>().unwrap_err().failure(),
        CastFailure::Immutable
    );

    let unique = AnyPtr::from(&mut value);
    assert!(unique.is_mutable());
    assert_eq!(unique.type_id(), TypeId::of::<*mut Derived>());
    assert_ne!(unique.type_id(), shared.type_id());

    let base = unique.cast_mut::<Base>();
    assert!(base.is_ok());
    if let Ok(base) = base {
        // SAFETY: `value` is alive and not otherwise borrowed
        unsafe {
            (*base).value = 99;
        }
    }
    assert!(unique.try_cast::<Base>().is_some());
    assert_eq!(value.base.value, 99);
}

#[test]
fn test_ambiguous_base() {
    let pair = Pair {
        left: Base { value: 1 },
        right: Base { value: 2 },
    };
    let ptr = AnyPtr::from(&pair);
    assert_eq!(ptr.try_cast::<Base>(), None);
    assert_eq!(
        ptr.cast::<Base>().unwrap_err().failure(),
        CastFailure::Ambiguous
    );
    assert_eq!(ptr.try_cast::<Pair>(), Some(&pair as *const Pair));
}

#[test]
fn test_builtin_trait_objects() {
    let value = 12u16;
    let ptr = AnyPtr::from(&value);
    let display = ptr.try_cast::<dyn Display>();
    // SAFETY: `value` is alive
    let text = display.map(|display| unsafe { (*display).to_string() });
    assert_eq!(text.as_deref(), Some("12"));
}

#[test]
fn test_borrowed_views() {
    let mut value = derived(4);
    {
        let any = AnyRef::new(&value);
        assert_eq!(any.downcast_ref::<Base>().map(|base| base.value), Some(4));
        assert_eq!(any.cast::<dyn Named>().map(|named| named.name()), Ok("derived"));
        assert_eq!(any.as_any_ptr().type_id(), TypeId::of::<*const Derived>());
    }

    let mut any = AnyMut::new(&mut value);
    if let Some(base) = any.downcast_mut::<Base>() {
        base.value += 1;
    }
    assert_eq!(any.as_ref().downcast_ref::<Base>().map(|base| base.value), Some(5));
}

/// A base that is itself viewable as `dyn Named`.
struct Tagged {
    _tag: u8,
}
upcast!(Tagged => dyn Named);

impl Named for Tagged {
    fn name(&self) -> &'static str {
        "tagged"
    }
}

#[repr(C)]
struct TaggedFirst {
    tagged: Tagged,
    _extra: u32,
}
upcast!(TaggedFirst { tagged: Tagged } => dyn Named);

impl Named for TaggedFirst {
    fn name(&self) -> &'static str {
        "first"
    }
}

#[repr(C)]
struct TaggedLast {
    _extra: u32,
    tagged: Tagged,
}
upcast!(TaggedLast { tagged: Tagged } => dyn Named);

impl Named for TaggedLast {
    fn name(&self) -> &'static str {
        "last"
    }
}

#[test]
fn test_trait_object_ambiguity_ignores_layout() {
    let first = TaggedFirst {
        tagged: Tagged { _tag: 1 },
        _extra: 2,
    };
    let last = TaggedLast {
        _extra: 2,
        tagged: Tagged { _tag: 1 },
    };
    assert_eq!(core::mem::offset_of!(TaggedFirst, tagged), 0);

    for ptr in [AnyPtr::from(&first), AnyPtr::from(&last)] {
        assert!(ptr.try_cast::<dyn Named>().is_none());
        assert_eq!(
            ptr.cast::<dyn Named>().unwrap_err().failure(),
            CastFailure::Ambiguous
        );
        assert!(ptr.try_cast::<Tagged>().is_some());
    }

    let tagged = Tagged { _tag: 3 };
    let named = AnyRef::new(&tagged).downcast_ref::<dyn Named>();
    assert_eq!(named.map(|named| named.name()), Some("tagged"));
}

#[test]
fn test_boxed_base_is_read_through_its_own_type() {
    struct Holder {
        boxed: Box<Base>,
    }
    upcast!(Holder);

    let holder = Holder {
        boxed: Box::new(Base { value: 7 }),
    };
    let any = AnyRef::new(&holder);
    assert!(any.downcast_ref::<Base>().is_none());
    assert_eq!(
        any.downcast_ref::<Holder>().map(|holder| holder.boxed.value),
        Some(7)
    );
}

#[test]
fn test_unlisted_trait_stays_unrelated() {
    struct Plain {
        value: u32,
    }
    upcast!(Plain);

    impl Named for Plain {
        fn name(&self) -> &'static str {
            "plain"
        }
    }

    let plain = Plain { value: 1 };
    assert_eq!(plain.value, 1);
    let first = AnyPtr::from(&plain);
    let second = AnyPtr::from(&plain);
    for ptr in [first, second] {
        assert!(ptr.try_cast::<dyn Named>().is_none());
        assert_eq!(
            ptr.cast::<dyn Named>().unwrap_err().failure(),
            CastFailure::Unrelated
        );
    }
}
