use std::any::TypeId;

use crate::{any::TypeInfo, registry::ServiceKey};

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("{0} does not exist in the container")]
    NotFound(ServiceKey),
    #[error("too many candidates for {key}, like: {}", .candidates.iter().map(|info| info.name).collect::<Vec<_>>().join(", "))]
    Ambiguous {
        key: ServiceKey,
        candidates: Vec<TypeInfo>,
    },
    #[error("{expected} resolved to a value of a different concrete type ({actual:?})")]
    IncorrectType { expected: TypeInfo, actual: TypeId },
    #[error("instantiator for {service} failed to resolve a dependency")]
    Dependencies {
        service: TypeInfo,
        #[source]
        source: Box<ResolveErrorKind>,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum InvokeErrorKind {
    #[error("{expected} arguments expected, {given} given")]
    ArityMismatch { expected: usize, given: usize },
    #[error("supplied argument for {expected} has an incorrect type")]
    IncorrectArgument { expected: TypeInfo },
    #[error("bound call returned a value of a different type ({actual:?}), expected {expected}")]
    IncorrectResult { expected: TypeInfo, actual: TypeId },
}
