use crate::any::TypeInfo;

/// Declared type hierarchy of a registered service.
///
/// Rust has no runtime class hierarchy, so the container takes the base
/// types of a service as explicit metadata. Implement it with the
/// [`reflect!`](macro@crate::reflect) macro; the default is a root type
/// with no bases.
pub trait Reflect: 'static {
    #[inline]
    #[must_use]
    fn type_info() -> TypeInfo
    where
        Self: Sized,
    {
        TypeInfo::of::<Self>()
    }

    /// Direct base types in declaration order.
    #[must_use]
    fn bases() -> Vec<Base> {
        Vec::new()
    }
}

/// One edge of the declared hierarchy: a base's key together with a handle
/// to that base's own bases, so linking can walk to the transitive root.
#[derive(Clone, Copy)]
pub struct Base {
    pub info: TypeInfo,
    pub bases: fn() -> Vec<Base>,
}

impl Base {
    #[inline]
    #[must_use]
    pub fn of<T: Reflect>() -> Self {
        Self {
            info: T::type_info(),
            bases: T::bases,
        }
    }
}

/// Declares the base types of a service.
///
/// # Examples
/// ```rust
/// use wirebox::reflect;
///
/// struct Animal;
/// struct Pet;
/// struct Dog;
///
/// reflect!(Animal);
/// reflect!(Pet);
/// reflect!(Dog: Animal, Pet);
/// ```
#[macro_export]
macro_rules! reflect {
    ($ty:ty) => {
        impl $crate::Reflect for $ty {}
    };
    ($ty:ty: $($base:ty),+ $(,)?) => {
        impl $crate::Reflect for $ty {
            fn bases() -> ::std::vec::Vec<$crate::Base> {
                ::std::vec![$($crate::Base::of::<$base>()),+]
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::{Base, Reflect};
    use crate::any::TypeInfo;

    struct Animal;
    struct Pet;
    struct Dog;

    crate::reflect!(Animal);
    crate::reflect!(Pet);
    crate::reflect!(Dog: Animal, Pet);

    #[test]
    fn test_root_has_no_bases() {
        assert!(Animal::bases().is_empty());
    }

    #[test]
    fn test_bases_in_declaration_order() {
        let bases = Dog::bases();
        let infos: Vec<TypeInfo> = bases.iter().map(|base| base.info).collect();
        assert_eq!(infos, vec![TypeInfo::of::<Animal>(), TypeInfo::of::<Pet>()]);
    }

    #[test]
    fn test_base_handle_reaches_grandparents() {
        struct Puppy;
        crate::reflect!(Puppy: Dog);

        let bases = Puppy::bases();
        assert_eq!(bases.len(), 1);
        let grandparents = (bases[0].bases)();
        assert_eq!(grandparents.len(), 2);
        assert_eq!(grandparents[0].info, TypeInfo::of::<Animal>());
    }

    #[test]
    fn test_base_of() {
        assert_eq!(Base::of::<Dog>().info, TypeInfo::of::<Dog>());
    }
}
