use tracing::debug;

use crate::{
    any::{BoxAny, TypeInfo},
    bound::{ArgList, BoundCall},
    container::Container,
    dependency::Dependency,
    errors::ResolveErrorKind,
    service::{service_fn, BoxCloneService},
};

/// A callable the container can drive: a constructor, factory function or
/// handler whose parameters all implement [`Dependency`]. The declared
/// return type is the class key a registration is stored under.
pub trait Instantiator<Params>: Clone + Send + Sync + 'static {
    type Provides: Send + Sync + 'static;

    /// Invokes the callable with already-built parameters.
    fn instantiate(&mut self, params: Params) -> Self::Provides;

    /// Resolves every declared parameter from the container, then invokes
    /// the callable. Fails on the first unsatisfiable parameter.
    fn inject_call(self, container: &Container) -> Result<Self::Provides, ResolveErrorKind>;

    /// Partitions parameters into known (their type resolves in the
    /// container right now, resolved eagerly once) and unknown (resolution
    /// fails, native types always do), and defers the call.
    fn bind_call(self, container: &Container) -> BoundCall;
}

pub(crate) type BoxedCloneInstantiator = BoxCloneService<Container, BoxAny, ResolveErrorKind>;

/// Wraps a callable so that, at resolution time, its own dependencies are
/// pulled from the resolving container. Used for both singleton and
/// factory nodes; caching is the container's concern.
#[must_use]
pub(crate) fn boxed_instantiator<Inst, Params>(service: Inst) -> BoxedCloneInstantiator
where
    Inst: Instantiator<Params>,
{
    let info = TypeInfo::of::<Inst::Provides>();
    BoxCloneService(Box::new(service_fn(move |container: Container| {
        service
            .clone()
            .inject_call(&container)
            .map(|value| {
                debug!("Resolved");
                Box::new(value) as BoxAny
            })
            .map_err(|err| ResolveErrorKind::Dependencies {
                service: info,
                source: Box::new(err),
            })
    })))
}

/// Assembler nodes re-bind on every resolution, so known parameters are
/// re-resolved each time the bound call is requested.
#[must_use]
pub(crate) fn boxed_assembler<Inst, Params>(service: Inst) -> BoxedCloneInstantiator
where
    Inst: Instantiator<Params>,
{
    BoxCloneService(Box::new(service_fn(move |container: Container| {
        Ok(Box::new(service.clone().bind_call(&container)) as BoxAny)
    })))
}

/// Resolving the container itself yields a fresh handle onto the same
/// shared state, which keeps the registry free of reference cycles.
#[must_use]
pub(crate) fn boxed_container_instantiator() -> BoxedCloneInstantiator {
    BoxCloneService(Box::new(service_fn(|container: Container| {
        Ok(Box::new(container) as BoxAny)
    })))
}

macro_rules! impl_instantiator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case, unused_variables, unused_mut)]
        impl<F, Response, $($ty,)*> Instantiator<($($ty,)*)> for F
        where
            F: FnMut($($ty,)*) -> Response + Clone + Send + Sync + 'static,
            Response: Send + Sync + 'static,
            $( $ty: Dependency, )*
        {
            type Provides = Response;

            fn instantiate(&mut self, ($($ty,)*): ($($ty,)*)) -> Self::Provides {
                self($($ty,)*)
            }

            fn inject_call(mut self, container: &Container) -> Result<Self::Provides, ResolveErrorKind> {
                Ok(self.instantiate(($(<$ty as Dependency>::resolve(container)?,)*)))
            }

            fn bind_call(self, container: &Container) -> BoundCall {
                let mut unknowns = Vec::new();
                $(
                    let $ty = match <$ty as Dependency>::resolve(container) {
                        Ok(value) => Some(value),
                        Err(_) => {
                            unknowns.push(<$ty as Dependency>::type_info());
                            None
                        }
                    };
                )*

                let mut callable = self;
                let service = service_fn(move |supplied: ArgList| {
                    let mut supplied = supplied.into_iter();
                    let value = callable.instantiate((
                        $(
                            match &$ty {
                                Some(value) => value.clone(),
                                None => <$ty as Dependency>::from_supplied(
                                    supplied.next().expect("argument count checked by the bound call"),
                                )?,
                            },
                        )*
                    ));
                    Ok(Box::new(value) as BoxAny)
                });

                BoundCall::new(unknowns, BoxCloneService(Box::new(service)))
            }
        }
    };
}

all_the_tuples!(impl_instantiator);
