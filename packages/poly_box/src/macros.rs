/// Makes a trait usable as the base of a [`PolyBox`][crate::PolyBox] by generating a helper
/// trait that every `Clone` implementation of the base trait automatically satisfies.
///
/// The macro emits:
///
/// * A helper trait with the given name. Declare it as a supertrait of your base trait.
/// * A blanket implementation of the helper trait for every `T: Base + Clone + 'static`,
///   so concrete types only need `#[derive(Clone)]`.
/// * Implementations of [`PolyClone`][crate::PolyClone] and [`Narrow`][crate::Narrow] for
///   `dyn Base` (and for `dyn Base + Auto...` when auto traits are listed).
///
/// # Example
///
/// ```
/// use poly_box::{PolyBox, define_poly_base};
///
/// define_poly_base!(pub trait ShapeBase for dyn Shape);
///
/// pub trait Shape: ShapeBase {
///     fn area(&self) -> f64;
/// }
///
/// #[derive(Clone)]
/// struct Square(f64);
///
/// impl Shape for Square {
///     fn area(&self) -> f64 {
///         self.0 * self.0
///     }
/// }
///
/// let shape = PolyBox::<dyn Shape>::from_box(Box::new(Square(3.0)));
/// let copy = shape.clone();
///
/// assert!(copy.is::<Square>());
/// assert_eq!(copy.area(), shape.area());
/// ```
///
/// # Auto traits
///
/// Listing auto traits after the base trait makes them part of the contract: only types that
/// implement them can implement the base trait, and both `dyn Base + Auto` and plain `dyn Base`
/// become valid [`PolyBox`][crate::PolyBox] bases.
///
/// ```
/// use poly_box::{PolyBox, define_poly_base};
///
/// define_poly_base!(trait JobBase for dyn Job + Send + Sync);
///
/// trait Job: JobBase {
///     fn run(&self) -> u32;
/// }
///
/// #[derive(Clone)]
/// struct Constant(u32);
///
/// impl Job for Constant {
///     fn run(&self) -> u32 {
///         self.0
///     }
/// }
///
/// let job = PolyBox::<dyn Job + Send + Sync>::from_box(Box::new(Constant(7)));
///
/// let result = std::thread::spawn(move || job.run()).join().unwrap();
/// assert_eq!(result, 7);
/// ```
#[macro_export]
macro_rules! define_poly_base {
    (@object $helper:ident, $object:ty) => {
        impl $crate::PolyClone for $object {
            #[inline]
            fn poly_clone(&self) -> ::std::boxed::Box<Self> {
                <Self as $helper>::poly_clone_base(self)
            }
        }

        impl $crate::Narrow for $object {
            #[inline]
            fn as_any(&self) -> &dyn ::std::any::Any {
                <Self as $helper>::poly_any(self)
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                <Self as $helper>::poly_any_mut(self)
            }

            #[inline]
            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                <Self as $helper>::poly_into_any(self)
            }
        }
    };

    (@without_auto $helper:ident, $base:ident, []) => {};

    (@without_auto $helper:ident, $base:ident, [$($auto:ident)+]) => {
        $crate::define_poly_base!(@object $helper, dyn $base);
    };

    ($(#[$attr:meta])* $vis:vis trait $helper:ident for dyn $base:ident $(+ $auto:ident)* $(;)?) => {
        $(#[$attr])*
        #[doc = concat!("Clone and narrowing support for `dyn ", stringify!($base), "`, generated by `define_poly_base!`.")]
        $vis trait $helper: ::std::any::Any {
            #[doc(hidden)]
            fn poly_clone_base(&self) -> ::std::boxed::Box<dyn $base $(+ $auto)*>;

            #[doc(hidden)]
            fn poly_any(&self) -> &dyn ::std::any::Any;

            #[doc(hidden)]
            fn poly_any_mut(&mut self) -> &mut dyn ::std::any::Any;

            #[doc(hidden)]
            fn poly_into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any>;
        }

        impl<T> $helper for T
        where
            T: $base + ::std::clone::Clone $(+ $auto)* + 'static,
        {
            #[inline]
            fn poly_clone_base(&self) -> ::std::boxed::Box<dyn $base $(+ $auto)*> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }

            #[inline]
            fn poly_any(&self) -> &dyn ::std::any::Any {
                self
            }

            #[inline]
            fn poly_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            #[inline]
            fn poly_into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }

        $crate::define_poly_base!(@object $helper, dyn $base $(+ $auto)*);
        $crate::define_poly_base!(@without_auto $helper, $base, [$($auto)*]);
    };
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::ptr;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use crate::{Narrow, PolyClone};

    define_poly_base!(trait AnimalBase for dyn Animal);

    trait Animal: AnimalBase {
        fn name(&self) -> &str;
        fn rename(&mut self, name: &str);
    }

    #[derive(Clone, Debug)]
    struct Dog {
        name: String,
    }

    #[derive(Clone, Debug)]
    struct Cat {
        name: String,
        lives: u8,
    }

    impl Animal for Dog {
        fn name(&self) -> &str {
            &self.name
        }

        fn rename(&mut self, name: &str) {
            name.clone_into(&mut self.name);
        }
    }

    impl Animal for Cat {
        fn name(&self) -> &str {
            &self.name
        }

        fn rename(&mut self, name: &str) {
            name.clone_into(&mut self.name);
        }
    }

    define_poly_base!(trait TaskBase for dyn Task + Send);

    trait Task: TaskBase {
        fn id(&self) -> u32;
    }

    #[derive(Clone)]
    struct Ping(u32);

    impl Task for Ping {
        fn id(&self) -> u32 {
            self.0
        }
    }

    assert_impl_all!(dyn Animal: PolyClone, Narrow);
    assert_impl_all!(dyn Task + Send: PolyClone, Narrow);
    assert_impl_all!(dyn Task: PolyClone, Narrow);
    assert_not_impl_any!(dyn Animal + Send: PolyClone);

    #[test]
    fn clone_preserves_concrete_type() {
        let cat: Box<dyn Animal> = Box::new(Cat {
            name: "Tom".to_string(),
            lives: 9,
        });

        let copy = cat.poly_clone();

        let copy_cat = copy.as_any().downcast_ref::<Cat>();
        assert_eq!(copy_cat.map(|c| c.lives), Some(9));
        assert!(!copy.as_any().is::<Dog>());
        assert!(!ptr::addr_eq(&raw const *cat, &raw const *copy));
    }

    #[test]
    fn clone_is_independent() {
        let dog: Box<dyn Animal> = Box::new(Dog {
            name: "Rex".to_string(),
        });

        let mut copy = dog.poly_clone();
        copy.rename("Max");

        assert_eq!(dog.name(), "Rex");
        assert_eq!(copy.name(), "Max");
    }

    #[test]
    fn narrow_mut_and_into_any_reach_concrete_object() {
        let mut dog: Box<dyn Animal> = Box::new(Dog {
            name: "Rex".to_string(),
        });

        if let Some(concrete) = dog.as_any_mut().downcast_mut::<Dog>() {
            concrete.name.push('!');
        }
        assert_eq!(dog.name(), "Rex!");

        let concrete = dog.into_any().downcast::<Dog>().ok();
        assert_eq!(concrete.map(|d| d.name), Some("Rex!".to_string()));
    }

    #[test]
    fn auto_trait_base_also_supports_plain_object() {
        let task: Box<dyn Task + Send> = Box::new(Ping(3));
        let plain: Box<dyn Task> = Box::new(Ping(4));

        let task_copy = task.poly_clone();
        let plain_copy = plain.poly_clone();

        assert_eq!(task_copy.id(), 3);
        assert_eq!(plain_copy.id(), 4);
        assert!(plain_copy.as_any().is::<Ping>());
    }
}
