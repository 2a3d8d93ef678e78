//! Storing shapes behind type-erased pointers.
//!
//! This example demonstrates:
//! 1. Listing bases with `upcast!`
//! 2. Recovering the exact type and a base from the same `AnyPtr`
//! 3. Viewing a stored value as a trait object
//! 4. Handling a failed cast
//!
//! Run with `--features tracing` to see the event emitted by the failed cast.

use anyptr::{AnyPtr, CastFailure, upcast};

trait Shape {
    fn area(&self) -> f64;
}

/// Shared by every shape.
struct Object {
    id: u32,
}
upcast!(Object);

struct Rectangle {
    object: Object,
    width: f64,
    height: f64,
}
upcast!(Rectangle { object: Object } => dyn Shape);

impl Shape for Rectangle {
    fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Squares are rectangles, which are objects.
struct Square {
    rectangle: Rectangle,
}
upcast!(Square { rectangle: Rectangle });

struct Unrelated;
upcast!(Unrelated);

fn describe(ptr: AnyPtr) {
    let Some(object) = ptr.try_cast::<Object>() else {
        println!("{ptr:?} is not an object");
        return;
    };
    // SAFETY: every pointer passed here comes from a value alive in `main`
    let id = unsafe { (*object).id };

    match ptr.try_cast::<dyn Shape>() {
        // SAFETY: as above
        Some(shape) => println!("object {id} has area {}", unsafe { (*shape).area() }),
        None => println!("object {id} is not directly a shape"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let rectangle = Rectangle {
        object: Object { id: 1 },
        width: 2.0,
        height: 3.0,
    };
    let square = Square {
        rectangle: Rectangle {
            object: Object { id: 2 },
            width: 4.0,
            height: 4.0,
        },
    };

    describe(AnyPtr::from(&rectangle));
    describe(AnyPtr::from(&square));
    describe(AnyPtr::empty());

    // `Square` also reaches `dyn Shape`, through its `Rectangle`
    let ptr = AnyPtr::from(&square);
    if let Some(rectangle) = ptr.try_cast::<Rectangle>() {
        // SAFETY: `square` is alive
        println!("square as rectangle has area {}", unsafe {
            (*rectangle).area()
        });
    }

    match ptr.cast::<Unrelated>() {
        Ok(_) => println!("unexpected success"),
        Err(error) => {
            assert_eq!(error.failure(), CastFailure::Unrelated);
            println!(
                "{error}: held {}, requested {}",
                error.held_type_name().unwrap_or("nothing"),
                error.requested_type_name()
            );
        }
    }
}
