//! Module containing the type-erased pointer representation

mod raw;
mod vtable;

pub use self::raw::{CastFailure, RawAnyPtr};
