use std::any::Any;

/// A base type whose values can produce an independently owned copy of themselves,
/// preserving the concrete type behind the base.
///
/// This is the only capability a [`PolyBox<B>`][crate::PolyBox] needs from `B` in order to
/// offer value semantics. `B` is typically a trait object type such as `dyn Shape`, in which
/// case the implementation forwards to a method on the trait that each concrete type implements
/// by cloning itself.
///
/// Implementations must uphold two guarantees:
///
/// * The returned object has the same concrete type as `self`. Returning a value of some other
///   type (e.g. a "default" implementation of the base) slices the object and breaks every
///   handle built on top of it.
/// * The returned object shares no state with `self` beyond what the concrete type's own
///   `Clone` implementation shares.
///
/// Most hierarchies do not implement this by hand. The [`define_poly_base!`][crate::define_poly_base]
/// macro generates a conforming implementation for any trait whose concrete types are `Clone`.
///
/// # Example
///
/// ```
/// use std::any::Any;
///
/// use poly_box::PolyClone;
///
/// trait Message {
///     fn text(&self) -> String;
///     fn clone_message(&self) -> Box<dyn Message>;
/// }
///
/// #[derive(Clone)]
/// struct Greeting(String);
///
/// impl Message for Greeting {
///     fn text(&self) -> String {
///         format!("hello, {}", self.0)
///     }
///
///     fn clone_message(&self) -> Box<dyn Message> {
///         Box::new(self.clone())
///     }
/// }
///
/// impl PolyClone for dyn Message {
///     fn poly_clone(&self) -> Box<Self> {
///         self.clone_message()
///     }
/// }
///
/// let original: Box<dyn Message> = Box::new(Greeting("world".to_string()));
/// let copy = original.poly_clone();
///
/// assert_eq!(copy.text(), "hello, world");
/// ```
pub trait PolyClone {
    /// Creates an independently owned copy of the concrete object behind `self`,
    /// boxed as the base type.
    #[must_use]
    fn poly_clone(&self) -> Box<Self>;
}

/// A base type that exposes the runtime type of the concrete object behind it.
///
/// This powers the narrowing queries of [`PolyBox<B>`][crate::PolyBox] (`downcast_ref()`,
/// `is()`, `release_as()` and friends). Each method must return the concrete object itself,
/// not some value derived from it, so that `TypeId` checks observe the concrete type.
///
/// The [`define_poly_base!`][crate::define_poly_base] macro implements this together with
/// [`PolyClone`].
pub trait Narrow {
    /// Views the concrete object as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Views the concrete object as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Converts the boxed concrete object into `Box<dyn Any>` without reallocating.
    ///
    /// The returned box must hold the same object that [`as_any()`][Self::as_any] views, at
    /// the same concrete type. [`PolyBox::release_as()`][crate::PolyBox::release_as] checks the
    /// type through `as_any()` before giving up ownership, so an implementation that disagrees
    /// loses the object (and fails a debug assertion).
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}
