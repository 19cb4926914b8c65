//! A typing-driven service container and dependency injector.
//!
//! Services are registered under their concrete type, optionally with
//! declared base types and a name; resolution narrows a requested type or
//! name down to the most specific registration, and callables run with
//! their parameters pulled from the container.
//!
//! ```rust
//! use wirebox::{reflect, Container, Inject};
//!
//! struct Engine;
//! struct Car(std::sync::Arc<Engine>);
//!
//! reflect!(Engine);
//! reflect!(Car);
//!
//! let container = Container::new();
//! container.singleton(|| Engine);
//! container.factory(|Inject(engine): Inject<Engine>| Car(engine));
//!
//! let car = container.get::<Car>().unwrap();
//! let same_engine = container.get::<Engine>().unwrap();
//! assert!(std::sync::Arc::ptr_eq(&car.0, &same_engine));
//! ```

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod bound;
pub(crate) mod cache;
pub(crate) mod container;
pub(crate) mod dependency;
pub(crate) mod errors;
pub(crate) mod instantiator;
pub(crate) mod reflect;
pub(crate) mod registry;
pub(crate) mod service;

pub use any::TypeInfo;
pub use bound::{ArgList, BoundCall};
pub use container::{Container, CONTAINER_ALIAS};
pub use dependency::{Dependency, Inject};
pub use errors::{InvokeErrorKind, ResolveErrorKind};
pub use instantiator::Instantiator;
pub use reflect::{Base, Reflect};
pub use registry::ServiceKey;
