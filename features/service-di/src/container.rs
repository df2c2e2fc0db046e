use std::{
    any::TypeId,
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak},
};

use crate::{
    entry::{DynEntry, ServiceEntry},
    errors::ResolveError,
    types::{Injectable, Lifecycle, TypeInfo},
};

pub(crate) type EntryMap = HashMap<TypeId, Arc<dyn DynEntry>>;

/// Container mapping service types to the way they are constructed
///
/// Cloning is cheap, all clones share the same registry.
#[derive(Clone, Default)]
pub struct Container(Arc<ContainerInner>);

#[derive(Default)]
struct ContainerInner {
    services: RwLock<EntryMap>,
}

impl Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let services = self.read();
        let mut map = f.debug_struct("Container");
        for entry in services.values() {
            map.field(entry.info().type_name, &format_args!("{}", entry.state()));
        }
        map.finish()
    }
}

impl Container {
    /// Creates an empty container
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(services: EntryMap) -> Self {
        Self(Arc::new(ContainerInner {
            services: RwLock::new(services),
        }))
    }

    /// Registers a constructor for `T`
    ///
    /// Replaces any earlier registration of `T`, including an already created singleton.
    pub fn register<T, F>(&self, constructor: F, lifecycle: Lifecycle)
    where
        T: Injectable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.insert(Arc::new(ServiceEntry::new(constructor, lifecycle)));
    }

    pub fn register_transient<T, F>(&self, constructor: F)
    where
        T: Injectable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(constructor, Lifecycle::Transient);
    }

    pub fn register_singleton<T, F>(&self, constructor: F)
    where
        T: Injectable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(constructor, Lifecycle::Singleton);
    }

    /// Registers an already constructed value as singleton
    pub fn register_instance<T: Injectable>(&self, instance: T) {
        self.insert(Arc::new(ServiceEntry::with_instance(instance)));
    }

    fn insert(&self, entry: Arc<dyn DynEntry>) {
        let info = entry.info();
        let lifecycle = entry.lifecycle();

        if let Some(previous) = self.write().insert(info.type_id, entry) {
            tracing::debug!(
                "Replaced {} registration of {} with {lifecycle} registration",
                previous.lifecycle(),
                info.type_name
            );
        } else {
            tracing::debug!("Registered {} as {lifecycle}", info.type_name);
        }
    }

    /// Attempts to get an instance of the requested type
    ///
    /// Transient services are constructed on every call, singletons on the first call only.
    /// The registry lock is only held for the lookup, so constructors may resolve
    /// their own dependencies from this container.
    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>, ResolveError> {
        let info = TypeInfo::of::<T>();
        tracing::trace!("Resolving {}", info.type_name);

        let entry = self.read().get(&info.type_id).cloned();
        let Some(entry) = entry else {
            tracing::warn!("Tried to resolve an unregistered type: {}", info.type_name);
            return Err(ResolveError::NotRegistered(info.type_name));
        };

        let actual_type = entry.info().type_name;
        let entry = entry
            .into_any()
            .downcast::<ServiceEntry<T>>()
            .map_err(|_| {
                tracing::error!(
                    "Registry entry for {} holds a service entry of {actual_type}",
                    info.type_name
                );
                ResolveError::InvalidEntry {
                    required_type: info.type_name,
                    actual_type,
                }
            })?;

        Ok(entry.produce())
    }

    /// Gets an instance of the requested type
    ///
    /// ### Panics
    ///
    /// If the type can not be resolved
    pub fn must_resolve<T: Injectable>(&self) -> Arc<T> {
        match self.resolve::<T>() {
            Ok(instance) => instance,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn is_registered<T: Injectable>(&self) -> bool {
        self.read().contains_key(&TypeId::of::<T>())
    }

    /// Lifecycle `T` is currently registered with
    pub fn lifecycle_of<T: Injectable>(&self) -> Option<Lifecycle> {
        self.read()
            .get(&TypeId::of::<T>())
            .map(|entry| entry.lifecycle())
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn registered_types(&self) -> Vec<TypeInfo> {
        self.read().values().map(|entry| entry.info()).collect()
    }

    /// Handle which does not keep the container alive
    ///
    /// Constructors capturing the container should hold one of these,
    /// otherwise the container and its entries keep each other alive.
    pub fn downgrade(&self) -> WeakContainer {
        WeakContainer(Arc::downgrade(&self.0))
    }

    // Nothing panics while the registry lock is held, recover if a poisoned lock shows up anyway
    fn read(&self) -> RwLockReadGuard<'_, EntryMap> {
        self.0.services.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EntryMap> {
        self.0.services.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Non owning handle to a [Container]
#[derive(Clone, Debug)]
pub struct WeakContainer(Weak<ContainerInner>);

impl WeakContainer {
    /// Returns the container, if it is still alive
    pub fn upgrade(&self) -> Option<Container> {
        self.0.upgrade().map(Container)
    }
}
