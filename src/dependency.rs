use std::{collections::HashMap, sync::Arc};

use crate::{
    any::{BoxAny, TypeInfo},
    container::Container,
    errors::{InvokeErrorKind, ResolveErrorKind},
    registry::ServiceKey,
};

/// A single declared parameter of an injectable callable.
///
/// [`Inject`] parameters resolve through the container graph; native value
/// types never do and are only satisfiable as supplied arguments of a
/// bound call.
pub trait Dependency: Clone + Send + Sync + Sized + 'static {
    #[must_use]
    fn type_info() -> TypeInfo;

    fn resolve(container: &Container) -> Result<Self, ResolveErrorKind>;

    fn from_supplied(value: BoxAny) -> Result<Self, InvokeErrorKind>;
}

/// Marks a parameter as a service to pull from the container.
pub struct Inject<Dep>(pub Arc<Dep>);

impl<Dep> Clone for Inject<Dep> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Dep: Send + Sync + 'static> Dependency for Inject<Dep> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Dep>()
    }

    fn resolve(container: &Container) -> Result<Self, ResolveErrorKind> {
        container.get().map(Self)
    }

    fn from_supplied(value: BoxAny) -> Result<Self, InvokeErrorKind> {
        // A bound call may receive either the bare value or an already
        // shared handle for an unregistered service parameter.
        let value = match value.downcast::<Dep>() {
            Ok(value) => return Ok(Self(Arc::new(*value))),
            Err(value) => value,
        };
        value
            .downcast::<Arc<Dep>>()
            .map(|value| Self(*value))
            .map_err(|_| InvokeErrorKind::IncorrectArgument {
                expected: TypeInfo::of::<Dep>(),
            })
    }
}

macro_rules! native_dependency {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Dependency for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::of::<$ty>()
                }

                fn resolve(_container: &Container) -> Result<Self, ResolveErrorKind> {
                    Err(ResolveErrorKind::NotFound(ServiceKey::Type(TypeInfo::of::<$ty>())))
                }

                fn from_supplied(value: BoxAny) -> Result<Self, InvokeErrorKind> {
                    value
                        .downcast::<$ty>()
                        .map(|value| *value)
                        .map_err(|_| InvokeErrorKind::IncorrectArgument {
                            expected: TypeInfo::of::<$ty>(),
                        })
                }
            }
        )*
    };
}

native_dependency!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
    &'static str,
);

impl<T: Clone + Send + Sync + 'static> Dependency for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>()
    }

    fn resolve(_container: &Container) -> Result<Self, ResolveErrorKind> {
        Err(ResolveErrorKind::NotFound(ServiceKey::Type(TypeInfo::of::<Self>())))
    }

    fn from_supplied(value: BoxAny) -> Result<Self, InvokeErrorKind> {
        value
            .downcast::<Self>()
            .map(|value| *value)
            .map_err(|_| InvokeErrorKind::IncorrectArgument {
                expected: TypeInfo::of::<Self>(),
            })
    }
}

impl<K, V> Dependency for HashMap<K, V>
where
    K: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>()
    }

    fn resolve(_container: &Container) -> Result<Self, ResolveErrorKind> {
        Err(ResolveErrorKind::NotFound(ServiceKey::Type(TypeInfo::of::<Self>())))
    }

    fn from_supplied(value: BoxAny) -> Result<Self, InvokeErrorKind> {
        value
            .downcast::<Self>()
            .map(|value| *value)
            .map_err(|_| InvokeErrorKind::IncorrectArgument {
                expected: TypeInfo::of::<Self>(),
            })
    }
}
