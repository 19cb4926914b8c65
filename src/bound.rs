use std::any::Any;

use crate::{
    any::{BoxAny, TypeInfo},
    errors::InvokeErrorKind,
    service::{BoxCloneService, Service as _},
};

/// Type-erased positional argument list for [`BoundCall::call`].
/// Usually built with the [`args!`](crate::args) macro.
pub type ArgList = Vec<Box<dyn Any + Send + Sync>>;

/// A reusable deferred call produced by [`Container::bind`](crate::Container::bind).
///
/// Parameters whose type resolved in the container at bind time were
/// resolved once and are baked in; the remaining ones must be supplied at
/// call time, positionally, in declaration order. The argument count is
/// checked strictly.
#[derive(Clone)]
pub struct BoundCall {
    unknowns: Vec<TypeInfo>,
    service: BoxCloneService<ArgList, BoxAny, InvokeErrorKind>,
}

impl BoundCall {
    #[inline]
    #[must_use]
    pub(crate) fn new(
        unknowns: Vec<TypeInfo>,
        service: BoxCloneService<ArgList, BoxAny, InvokeErrorKind>,
    ) -> Self {
        Self { unknowns, service }
    }

    /// Number of arguments the call expects.
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.unknowns.len()
    }

    /// Types of the caller-supplied parameters, in declaration order.
    #[inline]
    #[must_use]
    pub fn unknowns(&self) -> &[TypeInfo] {
        &self.unknowns
    }

    /// Invokes the underlying callable.
    ///
    /// # Errors
    /// - [`InvokeErrorKind::ArityMismatch`] unless exactly [`Self::arity`] arguments are given
    /// - [`InvokeErrorKind::IncorrectArgument`] if a supplied argument has the wrong type
    pub fn call(&self, args: ArgList) -> Result<Box<dyn Any + Send + Sync>, InvokeErrorKind> {
        if args.len() != self.unknowns.len() {
            return Err(InvokeErrorKind::ArityMismatch {
                expected: self.unknowns.len(),
                given: args.len(),
            });
        }
        self.service.clone().call(args)
    }

    /// Invokes the underlying callable and downcasts its result.
    pub fn call_as<R: 'static>(&self, args: ArgList) -> Result<R, InvokeErrorKind> {
        self.call(args)?
            .downcast::<R>()
            .map(|value| *value)
            .map_err(|value| InvokeErrorKind::IncorrectResult {
                expected: TypeInfo::of::<R>(),
                actual: (*value).type_id(),
            })
    }
}

/// Builds an [`ArgList`] from a list of values.
///
/// ```rust
/// use wirebox::args;
///
/// let list = args!["x".to_string(), 5u32];
/// assert_eq!(list.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        <$crate::ArgList>::from([
            $(::std::boxed::Box::new($arg) as ::std::boxed::Box<dyn ::std::any::Any + ::std::marker::Send + ::std::marker::Sync>,)*
        ])
    };
}
