use parking_lot::{Mutex, RwLock};
use std::{any::Any, sync::Arc};
use tracing::{debug, error, info_span};

use crate::{
    any::{RcAny, TypeInfo},
    bound::BoundCall,
    cache::Cache,
    errors::ResolveErrorKind,
    instantiator::{boxed_assembler, boxed_container_instantiator, boxed_instantiator, Instantiator},
    reflect::Reflect,
    registry::{NodeProvider, Registry, ServiceKey, Target},
    service::Service as _,
};

/// Well-known alias under which every container registers itself.
pub const CONTAINER_ALIAS: &str = "container";

/// The service container. Cloning yields another handle onto the same
/// registrations and singleton cache.
///
/// Registration goes through [`Self::singleton`], [`Self::factory`],
/// [`Self::assembler`], [`Self::instance`] and [`Self::value`]; resolution
/// through [`Self::get`], [`Self::get_named`] and [`Self::resolve`].
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    registry: RwLock<Registry>,
    cache: Mutex<Cache>,
}

impl Container {
    #[must_use]
    pub fn new() -> Self {
        let container = Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(Registry::new()),
                cache: Mutex::new(Cache::new()),
            }),
        };

        {
            let mut registry = container.inner.registry.write();
            let info = TypeInfo::of::<Container>();
            registry.set_provider(info, NodeProvider::Factory(boxed_container_instantiator()));
            registry.alias(CONTAINER_ALIAS.to_owned(), info);
        }

        container
    }

    /// Whether two handles share the same container state.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Registers a service built lazily on first resolution and reused
    /// forever. The callable's return type is the class key.
    pub fn singleton<Inst, Params>(&self, service: Inst)
    where
        Inst: Instantiator<Params>,
        Inst::Provides: Reflect,
    {
        self.insert_provider::<Inst::Provides>(NodeProvider::Singleton(boxed_instantiator(service)), None);
    }

    /// [`Self::singleton`], additionally reachable under `name`.
    pub fn singleton_named<Inst, Params>(&self, service: Inst, name: &str)
    where
        Inst: Instantiator<Params>,
        Inst::Provides: Reflect,
    {
        self.insert_provider::<Inst::Provides>(NodeProvider::Singleton(boxed_instantiator(service)), Some(name));
    }

    /// Registers a service built fresh on every resolution.
    pub fn factory<Inst, Params>(&self, service: Inst)
    where
        Inst: Instantiator<Params>,
        Inst::Provides: Reflect,
    {
        self.insert_provider::<Inst::Provides>(NodeProvider::Factory(boxed_instantiator(service)), None);
    }

    /// [`Self::factory`], additionally reachable under `name`.
    pub fn factory_named<Inst, Params>(&self, service: Inst, name: &str)
    where
        Inst: Instantiator<Params>,
        Inst::Provides: Reflect,
    {
        self.insert_provider::<Inst::Provides>(NodeProvider::Factory(boxed_instantiator(service)), Some(name));
    }

    /// Registers a handler whose resolution yields a [`BoundCall`] instead
    /// of an instance: known parameters are re-resolved on each resolution,
    /// the rest are supplied when the bound call is finally invoked.
    pub fn assembler<Inst, Params>(&self, service: Inst)
    where
        Inst: Instantiator<Params>,
        Inst::Provides: Reflect,
    {
        self.insert_provider::<Inst::Provides>(NodeProvider::Assembler(boxed_assembler(service)), None);
    }

    /// [`Self::assembler`], additionally reachable under `name`.
    pub fn assembler_named<Inst, Params>(&self, service: Inst, name: &str)
    where
        Inst: Instantiator<Params>,
        Inst::Provides: Reflect,
    {
        self.insert_provider::<Inst::Provides>(NodeProvider::Assembler(boxed_assembler(service)), Some(name));
    }

    /// Stores an exact value, returned unchanged on every resolution.
    pub fn instance<T: Reflect + Send + Sync>(&self, value: T) {
        self.insert_provider::<T>(NodeProvider::Instance(Arc::new(value)), None);
    }

    /// [`Self::instance`], additionally reachable under `name`.
    pub fn instance_named<T: Reflect + Send + Sync>(&self, value: T, name: &str) {
        self.insert_provider::<T>(NodeProvider::Instance(Arc::new(value)), Some(name));
    }

    /// Stores a native value under a name only; it never enters the class
    /// graph and is resolvable exclusively by that name.
    pub fn value<T: Any + Send + Sync>(&self, name: &str, value: T) {
        self.inner.registry.write().insert_value(name.to_owned(), Arc::new(value));
    }

    fn insert_provider<T: Reflect>(&self, provider: NodeProvider, name: Option<&str>) {
        let info = T::type_info();
        let mut registry = self.inner.registry.write();
        if registry.set_provider(info, provider).is_some() {
            debug!(service = info.short_name(), "Provider overwritten");
            // A singleton built by the replaced provider must not outlive it.
            self.inner.cache.lock().remove(&info);
        }
        registry.link_hierarchy(info, T::bases());
        if let Some(name) = name {
            registry.alias(name.to_owned(), info);
        }
    }

    /// Resolves a service by type or name to a type-erased shared handle.
    ///
    /// # Errors
    /// - [`ResolveErrorKind::NotFound`] if the key was never registered, directly or transitively
    /// - [`ResolveErrorKind::Ambiguous`] if narrowing found two or more equally specific candidates
    /// - [`ResolveErrorKind::Dependencies`] if a provider failed to resolve its own parameters
    pub fn resolve(&self, key: impl Into<ServiceKey>) -> Result<Arc<dyn Any + Send + Sync>, ResolveErrorKind> {
        let key = key.into();
        let span = info_span!("get", service = %key);
        let _guard = span.enter();

        // The lock is released before any provider runs: providers resolve
        // their own dependencies through this same container.
        let target = match self.inner.registry.read_recursive().lookup(&key) {
            Ok(target) => target,
            Err(err) => {
                error!("{err}");
                return Err(err);
            }
        };

        match target {
            Target::Value(value) => Ok(value),
            Target::Node { info, provider } => self.invoke_provider(info, provider),
        }
    }

    /// Resolves by type and downcasts.
    ///
    /// # Errors
    /// Everything [`Self::resolve`] returns, plus
    /// [`ResolveErrorKind::IncorrectType`] if the narrowed concrete type is not `T`.
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ResolveErrorKind> {
        let value = self.resolve(ServiceKey::of::<T>())?;
        downcast_resolved(value)
    }

    /// Resolves by name and downcasts.
    ///
    /// # Errors
    /// Same as [`Self::get`].
    pub fn get_named<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, ResolveErrorKind> {
        let value = self.resolve(name)?;
        downcast_resolved(value)
    }

    /// Never fails: `true` exactly when [`Self::resolve`] would succeed.
    /// Mirrors resolution fully, so providers may run.
    #[must_use]
    pub fn has(&self, key: impl Into<ServiceKey>) -> bool {
        self.resolve(key).is_ok()
    }

    /// Invokes `callable` with every declared parameter resolved from the
    /// container, recursively, and returns its result.
    ///
    /// # Errors
    /// Fails on the first parameter that does not resolve; parameters with
    /// no registered service (native types included) are not supported here.
    pub fn inject<Inst, Params>(&self, callable: Inst) -> Result<Inst::Provides, ResolveErrorKind>
    where
        Inst: Instantiator<Params>,
    {
        callable.inject_call(self)
    }

    /// Pre-resolves the parameters of `callable` that the container can
    /// satisfy right now, once, and defers the rest to call time.
    #[must_use]
    pub fn bind<Inst, Params>(&self, callable: Inst) -> BoundCall
    where
        Inst: Instantiator<Params>,
    {
        callable.bind_call(self)
    }

    fn invoke_provider(&self, info: TypeInfo, provider: NodeProvider) -> Result<RcAny, ResolveErrorKind> {
        match provider {
            NodeProvider::Instance(value) => Ok(value),
            NodeProvider::Factory(mut instantiator) | NodeProvider::Assembler(mut instantiator) => {
                match instantiator.call(self.clone()) {
                    Ok(value) => Ok(Arc::from(value)),
                    Err(err) => {
                        error!("{err}");
                        Err(err)
                    }
                }
            }
            NodeProvider::Singleton(mut instantiator) => {
                if let Some(value) = self.inner.cache.lock().get(&info) {
                    debug!("Found in cache");
                    return Ok(value);
                }

                // Built outside the cache lock: the instantiator re-enters
                // the container for its dependencies. Two threads may race
                // the first build; insertion picks one canonical instance.
                let value = match instantiator.call(self.clone()) {
                    Ok(value) => value,
                    Err(err) => {
                        error!("{err}");
                        return Err(err);
                    }
                };

                let value = self.inner.cache.lock().insert_canonical(info, Arc::from(value));
                debug!("Cached");
                Ok(value)
            }
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

fn downcast_resolved<T: Send + Sync + 'static>(value: RcAny) -> Result<Arc<T>, ResolveErrorKind> {
    value.downcast::<T>().map_err(|value| {
        let err = ResolveErrorKind::IncorrectType {
            expected: TypeInfo::of::<T>(),
            actual: (*value).type_id(),
        };
        error!("{err}");
        err
    })
}
