#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`anyptr`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased pointer representation and
//! the unsafe operations that power the [`anyptr`] crate. A pointer of some
//! concrete type `T` is stored as an untyped address next to a `&'static`
//! vtable that remembers `T`, and that vtable is all that is needed later to
//! answer "can this pointer be viewed as a pointer to `R`?".
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`anyptr`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`pointer`]**: Type-erased pointer storage
//!   - [`RawAnyPtr`]: The erased pointer plus its optional vtable
//!   - [`PointerVtable`]: Type identity and the "thrower" for one concrete
//!     pointer type
//!
//! - **[`upcast`]**: The hierarchy protocol
//!   - [`Upcast`]: Implemented by every type that can be stored; lists the
//!     sub-objects and trait objects reachable from a pointer to the type
//!   - [`Catcher`]: The receiving end of a walk, keeping only the pointer
//!     whose type matches the requested one
//!
//! - **[`mutability`]**: [`Const`] and [`Mut`] markers recording whether the
//!   stored pointer permits mutable access
//!
//! # Safety Strategy
//!
//! When a `*const T` is erased to `*const Erased` we must make sure that the
//! vtable stored next to it is the one created for that same `T`.
//!
//! This crate maintains safety through:
//!
//! - **Module-based encapsulation**: [`RawAnyPtr`] keeps its fields
//!   module-private, and the only way to fill them is a constructor that
//!   takes the typed pointer and builds the matching vtable in the same
//!   expression
//! - **Typed out-slots**: a [`Catcher`] only writes into its slot after
//!   comparing [`TypeId`]s, so a walk can never store a pointer of the wrong
//!   type
//! - **Documented vtable contracts**: each vtable method specifies exactly when
//!   it can be safely called
//!
//! [`anyptr`]: https://docs.rs/anyptr/latest/anyptr/
//! [`PointerVtable`]: pointer::vtable::PointerVtable
//! [`TypeId`]: core::any::TypeId

extern crate alloc;

mod impls;
pub mod mutability;
mod pointer;
pub mod upcast;
mod util;

pub use self::{
    mutability::{Const, Mut, Mutability},
    pointer::{CastFailure, RawAnyPtr},
    upcast::{Catcher, Upcast},
};
