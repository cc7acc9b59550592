use std::any::{Any, type_name};
use std::fmt;
use std::ops::{Deref, DerefMut};

use tracing::{debug, trace};

use crate::{Error, Narrow, PolyClone, Result};

/// An owning handle to a polymorphic object with value semantics.
///
/// `PolyBox<B>` owns at most one object whose type is `B` or, when `B` is a trait object type
/// such as `dyn Shape`, any concrete type behind that trait object. It behaves like a value:
///
/// * **Copying never aliases.** Cloning the handle clones the owned object through
///   [`PolyClone`], producing an independent object of the same concrete type. A `PolyBox<dyn
///   Shape>` holding a `Circle` clones into another `PolyBox<dyn Shape>` holding a new `Circle`.
/// * **Moving never clones.** Moving the handle, or transferring its contents with
///   [`take()`][Self::take], [`move_from()`][Self::move_from] or [`release()`][Self::release],
///   hands over the existing allocation and leaves the source empty.
///
/// The handle may be empty. An empty handle is created by [`new()`][Self::new], by
/// [`Default`], by the [`NULL`][Self::NULL] constant or by moving the object out of a handle.
/// Checked accessors such as [`get()`][Self::get] and [`try_get()`][Self::try_get] report the
/// empty state; dereferencing an empty handle panics.
///
/// # Narrowing
///
/// When `B` also implements [`Narrow`], the owned object can be viewed as its concrete type
/// through [`downcast_ref()`][Self::downcast_ref], [`downcast_mut()`][Self::downcast_mut] and
/// [`release_as()`][Self::release_as]. These return `None` on a type mismatch instead of
/// failing.
///
/// # Example
///
/// ```
/// use poly_box::{PolyBox, define_poly_base};
///
/// define_poly_base!(trait ShapeBase for dyn Shape);
///
/// trait Shape: ShapeBase {
///     fn scale(&mut self, factor: f64);
///     fn area(&self) -> f64;
/// }
///
/// #[derive(Clone)]
/// struct Circle {
///     radius: f64,
/// }
///
/// impl Shape for Circle {
///     fn scale(&mut self, factor: f64) {
///         self.radius *= factor;
///     }
///
///     fn area(&self) -> f64 {
///         std::f64::consts::PI * self.radius * self.radius
///     }
/// }
///
/// let original = PolyBox::<dyn Shape>::from_box(Box::new(Circle { radius: 1.0 }));
///
/// // The copy is a new `Circle`, not a second reference to the first one.
/// let mut copy = original.clone();
/// copy.scale(2.0);
///
/// assert!(copy.area() > original.area());
/// assert_eq!(copy.downcast_ref::<Circle>().map(|c| c.radius), Some(2.0));
/// ```
///
/// # Thread safety
///
/// The handle has no synchronization of its own. It is [`Send`] and [`Sync`] exactly when
/// `Box<B>` is, so a `PolyBox<dyn Shape + Send>` can be moved between threads.
pub struct PolyBox<B: ?Sized> {
    resource: Option<Box<B>>,
}

impl<B: ?Sized> PolyBox<B> {
    /// A handle that owns nothing.
    ///
    /// This is identical in representation to [`PolyBox::new()`] and exists to name the
    /// "no value" state in constant contexts.
    ///
    /// ```
    /// use poly_box::PolyBox;
    ///
    /// static NOTHING: PolyBox<str> = PolyBox::NULL;
    ///
    /// assert!(NOTHING.is_empty());
    /// assert!(NOTHING.get().is_none());
    /// ```
    pub const NULL: Self = Self { resource: None };

    /// Creates an empty handle.
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self::NULL
    }

    /// Creates a handle that takes ownership of an already allocated object.
    ///
    /// The object is not cloned.
    ///
    /// ```
    /// use std::fmt::Display;
    ///
    /// use poly_box::PolyBox;
    ///
    /// let text = PolyBox::<dyn Display>::from_box(Box::new(42));
    /// assert_eq!(text.to_string(), "42");
    /// ```
    #[must_use]
    #[inline]
    pub fn from_box(resource: Box<B>) -> Self {
        Self {
            resource: Some(resource),
        }
    }

    /// Creates a handle that takes ownership of an already allocated object.
    ///
    /// This is the factory form of [`from_box()`][Self::from_box], for call sites that read
    /// better as "adopt this allocation".
    #[must_use]
    #[inline]
    pub fn adopt(resource: Box<B>) -> Self {
        Self::from_box(resource)
    }

    /// Whether the handle owns an object.
    #[must_use]
    #[inline]
    pub fn is_some(&self) -> bool {
        self.resource.is_some()
    }

    /// Whether the handle owns nothing.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.resource.is_none()
    }

    /// Returns a shared reference to the owned object, or `None` if the handle is empty.
    #[must_use]
    #[inline]
    pub fn get(&self) -> Option<&B> {
        self.resource.as_deref()
    }

    /// Returns an exclusive reference to the owned object, or `None` if the handle is empty.
    #[must_use]
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut B> {
        self.resource.as_deref_mut()
    }

    /// Returns a shared reference to the owned object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySource`] if the handle is empty.
    #[inline]
    pub fn try_get(&self) -> Result<&B> {
        self.get().ok_or(Error::EmptySource {
            operation: "try_get",
        })
    }

    /// Returns an exclusive reference to the owned object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySource`] if the handle is empty.
    #[inline]
    pub fn try_get_mut(&mut self) -> Result<&mut B> {
        self.get_mut().ok_or(Error::EmptySource {
            operation: "try_get_mut",
        })
    }

    /// Moves the owned object into a new handle, leaving this one empty.
    ///
    /// The object is not cloned; the new handle owns the same allocation.
    ///
    /// ```
    /// use std::fmt::Debug;
    ///
    /// use poly_box::PolyBox;
    ///
    /// let mut source = PolyBox::<dyn Debug>::from_box(Box::new("hello"));
    /// let target = source.take();
    ///
    /// assert!(source.is_empty());
    /// assert!(target.is_some());
    /// ```
    #[must_use]
    #[inline]
    pub fn take(&mut self) -> Self {
        Self {
            resource: self.resource.take(),
        }
    }

    /// Replaces the owned object with the one owned by `source`, leaving `source` empty.
    ///
    /// The previously owned object, if any, is dropped. The transferred object is not cloned.
    /// If `source` is empty, this handle becomes empty.
    #[inline]
    pub fn move_from(&mut self, source: &mut Self) {
        self.resource = source.resource.take();
    }

    /// Replaces the owned object with an already allocated one, returning the previous object.
    ///
    /// The caller becomes the owner of the returned object; dropping it destroys it.
    #[must_use = "the previous object is dropped immediately if not used"]
    #[inline]
    pub fn replace(&mut self, resource: Box<B>) -> Option<Box<B>> {
        self.resource.replace(resource)
    }

    /// Transfers ownership of the object out of the handle, leaving the handle empty.
    ///
    /// Returns `None` if the handle was already empty. The handle will not drop the returned
    /// object; that responsibility moves to the caller.
    #[must_use = "the released object is dropped immediately if not used"]
    #[inline]
    pub fn release(&mut self) -> Option<Box<B>> {
        let resource = self.resource.take();

        if resource.is_some() {
            trace!(base = type_name::<B>(), "released ownership of object");
        }

        resource
    }

    /// Consumes the handle, returning the owned object if there is one.
    #[must_use]
    #[inline]
    pub fn into_inner(self) -> Option<Box<B>> {
        self.resource
    }
}

impl<B> PolyBox<B>
where
    B: ?Sized + PolyClone,
{
    /// Creates a handle that owns a new copy of `object`.
    ///
    /// The copy is made through [`PolyClone`], so it has the same concrete type as `object`.
    #[must_use]
    #[inline]
    pub fn copy_of(object: &B) -> Self {
        Self::from_box(clone_object(object))
    }

    /// Creates a handle that owns a new copy of `object`.
    ///
    /// This is the factory form of [`copy_of()`][Self::copy_of].
    #[must_use]
    #[inline]
    #[cfg_attr(test, mutants::skip)] // Pure forwarding, every mutation is unviable.
    pub fn copy(object: &B) -> Self {
        Self::copy_of(object)
    }

    /// Creates a handle that owns a new copy of the object owned by this handle.
    ///
    /// Unlike [`Clone::clone()`], which copies an empty handle into another empty handle,
    /// this treats an empty source as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySource`] if this handle is empty.
    pub fn try_clone(&self) -> Result<Self> {
        let object = self.get().ok_or(Error::EmptySource {
            operation: "try_clone",
        })?;

        Ok(Self::copy_of(object))
    }

    /// Replaces the owned object with a new copy of the object owned by `source`.
    ///
    /// The previously owned object is dropped only after the copy has been made.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySource`] if `source` is empty. This handle is left unchanged.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<()> {
        let object = source.get().ok_or(Error::EmptySource {
            operation: "try_clone_from",
        })?;

        self.resource = Some(clone_object(object));
        Ok(())
    }

    /// Replaces the owned object with a new copy of `object`.
    ///
    /// The previously owned object, if any, is dropped.
    #[inline]
    pub fn assign_copy_of(&mut self, object: &B) {
        self.resource = Some(clone_object(object));
    }
}

impl<B> PolyBox<B>
where
    B: ?Sized + Narrow,
{
    /// Returns a shared reference to the owned object as its concrete type `D`.
    ///
    /// Returns `None` if the handle is empty or the owned object is not a `D`.
    #[must_use]
    #[inline]
    pub fn downcast_ref<D: Any>(&self) -> Option<&D> {
        Narrow::as_any(self.get()?).downcast_ref::<D>()
    }

    /// Returns an exclusive reference to the owned object as its concrete type `D`.
    ///
    /// Returns `None` if the handle is empty or the owned object is not a `D`.
    #[must_use]
    #[inline]
    pub fn downcast_mut<D: Any>(&mut self) -> Option<&mut D> {
        Narrow::as_any_mut(self.get_mut()?).downcast_mut::<D>()
    }

    /// Whether the handle owns an object whose concrete type is `D`.
    ///
    /// This is `true` exactly when [`downcast_ref::<D>()`][Self::downcast_ref] would succeed.
    #[must_use]
    #[inline]
    pub fn is<D: Any>(&self) -> bool {
        self.get()
            .is_some_and(|object| Narrow::as_any(object).is::<D>())
    }

    /// Transfers ownership of the object out of the handle as its concrete type `D`.
    ///
    /// If the owned object is not a `D` (or the handle is empty), returns `None` and the handle
    /// keeps owning whatever it owned before. Ownership only moves when the narrowing succeeds.
    ///
    /// ```
    /// use poly_box::{PolyBox, define_poly_base};
    ///
    /// define_poly_base!(trait TokenBase for dyn Token);
    ///
    /// trait Token: TokenBase {}
    ///
    /// #[derive(Clone)]
    /// struct Word(String);
    /// impl Token for Word {}
    ///
    /// #[derive(Clone)]
    /// struct Number(i64);
    /// impl Token for Number {}
    ///
    /// let mut token = PolyBox::<dyn Token>::from_box(Box::new(Number(5)));
    ///
    /// assert!(token.release_as::<Word>().is_none());
    /// assert!(token.is_some());
    ///
    /// let number = token.release_as::<Number>();
    /// assert_eq!(number.map(|n| n.0), Some(5));
    /// assert!(token.is_empty());
    /// ```
    #[must_use = "the released object is dropped immediately if not used"]
    pub fn release_as<D: Any>(&mut self) -> Option<Box<D>> {
        if !self.is::<D>() {
            if self.is_some() {
                debug!(
                    base = type_name::<B>(),
                    target = type_name::<D>(),
                    "refused to release object as a type it does not have"
                );
            }

            return None;
        }

        let resource = self.release()?;

        // Only fails if `into_any()` disagrees with `as_any()`, which `Narrow` forbids.
        let released = Narrow::into_any(resource).downcast::<D>();
        debug_assert!(
            released.is_ok(),
            "Narrow::into_any() returned a different concrete type than Narrow::as_any()"
        );

        released.ok()
    }
}

fn clone_object<B>(object: &B) -> Box<B>
where
    B: ?Sized + PolyClone,
{
    trace!(base = type_name::<B>(), "cloning owned object");

    object.poly_clone()
}

impl<B> Clone for PolyBox<B>
where
    B: ?Sized + PolyClone,
{
    /// Creates a handle that owns a new copy of the owned object.
    ///
    /// Cloning an empty handle produces an empty handle. Use
    /// [`try_clone()`][PolyBox::try_clone] to treat that as an error instead.
    fn clone(&self) -> Self {
        Self {
            resource: self.get().map(clone_object),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.resource = source.get().map(clone_object);
    }
}

impl<B: ?Sized> Default for PolyBox<B> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ?Sized> From<Box<B>> for PolyBox<B> {
    #[inline]
    fn from(resource: Box<B>) -> Self {
        Self::from_box(resource)
    }
}

impl<B: ?Sized> From<Option<Box<B>>> for PolyBox<B> {
    #[inline]
    fn from(resource: Option<Box<B>>) -> Self {
        Self { resource }
    }
}

impl<B: ?Sized> From<PolyBox<B>> for Option<Box<B>> {
    #[inline]
    fn from(value: PolyBox<B>) -> Self {
        value.into_inner()
    }
}

impl<B> From<&B> for PolyBox<B>
where
    B: ?Sized + PolyClone,
{
    #[inline]
    fn from(object: &B) -> Self {
        Self::copy_of(object)
    }
}

impl<B> fmt::Debug for PolyBox<B>
where
    B: ?Sized + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("resource", &self.resource)
            .finish()
    }
}

impl<B: ?Sized> Deref for PolyBox<B> {
    type Target = B;

    /// # Panics
    ///
    /// Panics if the handle is empty. Use [`get()`][PolyBox::get] or
    /// [`try_get()`][PolyBox::try_get] when the handle may be empty.
    #[inline]
    fn deref(&self) -> &Self::Target {
        match self.resource.as_deref() {
            Some(resource) => resource,
            None => panic!("dereferenced an empty {}", type_name::<Self>()),
        }
    }
}

impl<B: ?Sized> DerefMut for PolyBox<B> {
    /// # Panics
    ///
    /// Panics if the handle is empty. Use [`get_mut()`][PolyBox::get_mut] or
    /// [`try_get_mut()`][PolyBox::try_get_mut] when the handle may be empty.
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self.resource.as_deref_mut() {
            Some(resource) => resource,
            None => panic!("dereferenced an empty {}", type_name::<Self>()),
        }
    }
}
