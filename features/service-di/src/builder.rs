use std::{collections::HashMap, sync::Arc};

use crate::{
    container::{Container, EntryMap},
    entry::{DynEntry, ServiceEntry},
    types::{Injectable, Lifecycle},
};

/// Collects registrations up front and turns them into a [Container]
///
/// Registering the same type twice keeps the last registration, same as [Container::register].
pub struct ContainerBuilder {
    /// Registered entries, keyed by the type they provide
    pub(crate) registered: EntryMap,
}
impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    pub fn new() -> Self {
        ContainerBuilder {
            registered: HashMap::new(),
        }
    }
}
impl ContainerBuilder {
    pub fn add_factory<T, F>(self, constructor: F, lifecycle: Lifecycle) -> Self
    where
        T: Injectable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.add_entry(Arc::new(ServiceEntry::new(constructor, lifecycle)))
    }

    pub fn add_transient<T, F>(self, constructor: F) -> Self
    where
        T: Injectable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.add_factory(constructor, Lifecycle::Transient)
    }

    pub fn add_singleton<T, F>(self, constructor: F) -> Self
    where
        T: Injectable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.add_factory(constructor, Lifecycle::Singleton)
    }

    pub fn add_instance<T: Injectable>(self, instance: T) -> Self {
        self.add_entry(Arc::new(ServiceEntry::with_instance(instance)))
    }

    fn add_entry(mut self, entry: Arc<dyn DynEntry>) -> Self {
        let info = entry.info();
        if self.registered.insert(info.type_id, entry).is_some() {
            tracing::debug!("{} was added twice, keeping the last registration", info.type_name);
        }
        self
    }

    pub fn build(self) -> Container {
        tracing::debug!("Building container with {} services", self.registered.len());
        Container::from_entries(self.registered)
    }
}
