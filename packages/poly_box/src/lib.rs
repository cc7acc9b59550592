#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Value semantics for trait objects.
//!
//! This package provides [`PolyBox<B>`], an owning handle to a polymorphic object that behaves
//! like a plain value: copying the handle deep-clones the owned object at its concrete type,
//! while moving the handle transfers the existing allocation without cloning. This makes it
//! possible to store trait objects by value in fields, collections and return values without
//! losing the concrete type on copy and without sharing state between copies.
//!
//! This is part of the [Folo project](https://github.com/folo-rs/folo) that provides mechanisms for
//! high-performance hardware-aware programming in Rust.
//!
//! # Participating types
//!
//! A handle needs one capability from its base type `B`: [`PolyClone`], the ability to produce
//! an owned copy of the concrete object through a `&B`. Narrowing queries additionally need
//! [`Narrow`], which exposes the concrete type for `Any`-based checks.
//!
//! For trait hierarchies, [`define_poly_base!`] generates both implementations. All that is
//! left is to name the generated helper trait as a supertrait and derive `Clone` on the
//! concrete types.
//!
//! # Example
//!
//! ```
//! use poly_box::{PolyBox, define_poly_base};
//!
//! define_poly_base!(trait InstrumentBase for dyn Instrument);
//!
//! trait Instrument: InstrumentBase {
//!     fn play(&self) -> String;
//!     fn tune(&mut self, pitch: u32);
//! }
//!
//! #[derive(Clone)]
//! struct Violin {
//!     pitch: u32,
//! }
//!
//! #[derive(Clone)]
//! struct Drum;
//!
//! impl Instrument for Violin {
//!     fn play(&self) -> String {
//!         format!("violin at {} Hz", self.pitch)
//!     }
//!
//!     fn tune(&mut self, pitch: u32) {
//!         self.pitch = pitch;
//!     }
//! }
//!
//! impl Instrument for Drum {
//!     fn play(&self) -> String {
//!         "boom".to_string()
//!     }
//!
//!     fn tune(&mut self, _pitch: u32) {}
//! }
//!
//! let orchestra: Vec<PolyBox<dyn Instrument>> = vec![
//!     PolyBox::<dyn Instrument>::from_box(Box::new(Violin { pitch: 440 })),
//!     PolyBox::<dyn Instrument>::from_box(Box::new(Drum)),
//! ];
//!
//! // Cloning the collection clones every instrument at its concrete type.
//! let mut rehearsal = orchestra.clone();
//! for instrument in &mut rehearsal {
//!     instrument.tune(415);
//! }
//!
//! assert_eq!(orchestra[0].play(), "violin at 440 Hz");
//! assert_eq!(rehearsal[0].play(), "violin at 415 Hz");
//! assert!(rehearsal[1].is::<Drum>());
//! ```
//!
//! # Ownership
//!
//! A handle owns at most one object and never shares it. Every copy operation (`clone()`,
//! [`PolyBox::copy_of()`], [`PolyBox::try_clone()`]) creates a new object. Every move
//! operation (a Rust move, [`PolyBox::take()`], [`PolyBox::move_from()`],
//! [`PolyBox::release()`]) hands over the existing object and never clones.

mod capability;
mod error;
mod macros;
mod poly_box;

pub use capability::*;
pub use error::*;
pub use poly_box::*;
