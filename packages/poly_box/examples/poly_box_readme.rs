//! Example that demonstrates storing trait objects by value with `PolyBox`.
//!
//! A scene holds shapes of different concrete types. Duplicating the scene duplicates every
//! shape at its own concrete type, and editing the duplicate leaves the original untouched.

use poly_box::{PolyBox, define_poly_base};

define_poly_base!(trait ShapeBase for dyn Shape);

trait Shape: ShapeBase {
    fn describe(&self) -> String;
    fn scale(&mut self, factor: f64);
}

#[derive(Clone)]
struct Circle {
    radius: f64,
}

#[derive(Clone)]
struct Rectangle {
    width: f64,
    height: f64,
}

impl Shape for Circle {
    fn describe(&self) -> String {
        format!("circle with radius {:.1}", self.radius)
    }

    fn scale(&mut self, factor: f64) {
        self.radius *= factor;
    }
}

impl Shape for Rectangle {
    fn describe(&self) -> String {
        format!("rectangle {:.1} x {:.1}", self.width, self.height)
    }

    fn scale(&mut self, factor: f64) {
        self.width *= factor;
        self.height *= factor;
    }
}

#[derive(Clone)]
struct Scene {
    shapes: Vec<PolyBox<dyn Shape>>,
}

fn main() {
    println!("=== PolyBox README Example ===");

    let scene = Scene {
        shapes: vec![
            PolyBox::<dyn Shape>::from_box(Box::new(Circle { radius: 1.0 })),
            PolyBox::<dyn Shape>::from_box(Box::new(Rectangle {
                width: 2.0,
                height: 3.0,
            })),
        ],
    };

    // Deep copy: every shape is cloned at its concrete type.
    let mut enlarged = scene.clone();
    for shape in &mut enlarged.shapes {
        shape.scale(2.0);
    }

    for (original, copy) in scene.shapes.iter().zip(&enlarged.shapes) {
        println!("{} -> {}", original.describe(), copy.describe());
    }

    // Narrowing back to a concrete type.
    let circles = enlarged
        .shapes
        .iter()
        .filter_map(PolyBox::downcast_ref::<Circle>)
        .count();
    println!("The enlarged scene has {circles} circle(s).");

    // Moving a shape out transfers the allocation, no copy is made.
    let mut shapes = enlarged.shapes;
    if let Some(first) = shapes.first_mut() {
        let taken = first.take();
        println!(
            "Took {}; slot is now empty: {}",
            taken.describe(),
            first.is_empty()
        );
    }

    println!("README example completed successfully!");
}
