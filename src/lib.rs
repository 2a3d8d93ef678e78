#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A type-erased, non-owning pointer that remembers what it points to.
//!
//! ## Overview
//!
//! [`AnyPtr`] holds a single `*const T` or `*mut T` of any concrete type `T`,
//! or nothing at all. The static type is forgotten, but not lost: the pointer
//! can later be recovered as exactly `T`, or as any base of `T`, with the
//! address adjusted to point at that base.
//!
//! "Base" here means a sub-object the type chooses to expose: a struct field
//! embedding another type, or a trait object the type can be viewed as. Types
//! list their bases once with the [`upcast!`] macro, and bases of bases are
//! followed automatically.
//!
//! The container never owns, reads or frees its pointee. It is a plain
//! two-word [`Copy`] value that is cheap to pass around in places where the
//! pointee type cannot be named, such as callback registries or plugin
//! boundaries.
//!
//! ## Quick Example
//!
//! ```
//! use anyptr::{AnyPtr, upcast};
//!
//! trait Speak {
//!     fn speak(&self) -> &'static str;
//! }
//!
//! struct Animal {
//!     legs: u32,
//! }
//! upcast!(Animal);
//!
//! struct Dog {
//!     animal: Animal,
//! }
//! upcast!(Dog { animal: Animal } => dyn Speak);
//!
//! impl Speak for Dog {
//!     fn speak(&self) -> &'static str {
//!         "woof"
//!     }
//! }
//!
//! let dog = Dog {
//!     animal: Animal { legs: 4 },
//! };
//! let ptr = AnyPtr::from(&dog);
//!
//! let animal = ptr.try_cast::<Animal>().unwrap();
//! let speak = ptr.try_cast::<dyn Speak>().unwrap();
//! // SAFETY: `dog` is still alive
//! unsafe {
//!     assert_eq!((*animal).legs, 4);
//!     assert_eq!((*speak).speak(), "woof");
//! }
//!
//! assert!(ptr.try_cast::<String>().is_none());
//! assert!(ptr.cast::<String>().is_err());
//! ```
//!
//! ## Retrieval
//!
//! - [`AnyPtr::try_cast`] and [`AnyPtr::try_cast_mut`] return an [`Option`].
//! - [`AnyPtr::cast`] and [`AnyPtr::cast_mut`] return a [`Result`] whose error
//!   is [`BadCastError`], carrying a [`CastFailure`] that says why.
//!
//! A cast for the exact stored type is a single [`TypeId`] comparison. Any
//! other cast walks the bases. If more than one distinct sub-object of the
//! requested type is reachable, the cast fails as ambiguous instead of
//! picking one.
//!
//! A pointer bound from `*const T` or `&T` refuses mutable retrieval.
//!
//! ## Borrowed Views
//!
//! [`AnyRef`] and [`AnyMut`] wrap an [`AnyPtr`] built from a reference and
//! keep its lifetime, so retrieval gives references back without `unsafe`.
//!
//! ## Features
//!
//! - `tracing`: Emit a `tracing` event when a cast fails.
//!
//! [`TypeId`]: core::any::TypeId

extern crate alloc;

#[macro_use]
mod macros;

mod any_ptr;
mod any_ref;
mod error;

#[doc(inline)]
pub use anyptr_internals::upcast::field_ptr;
#[doc(hidden)]
pub use anyptr_internals::upcast::field_type;
pub use anyptr_internals::{Catcher, Const, Mut, Mutability, Upcast};

pub use self::{
    any_ptr::{AnyPtr, cast, swap, try_cast},
    any_ref::{AnyMut, AnyRef},
    error::{BadCastError, CastFailure},
};
