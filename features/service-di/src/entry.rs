use std::{
    any::Any,
    sync::{Arc, Mutex, PoisonError, TryLockError},
};

use crate::types::{Injectable, Lifecycle, TypeInfo};

/// Builds a new shared instance of a service
pub(crate) type Constructor<T> = Box<dyn Fn() -> Arc<T> + Send + Sync + 'static>;

/// Registration of a single service type
///
/// Owns its own lock, so resolving a singleton only ever contends with
/// resolutions of the same type.
pub(crate) struct ServiceEntry<T: Injectable> {
    constructor: Constructor<T>,
    lifecycle: Lifecycle,
    /// Cached singleton - None until first resolved
    instance: Mutex<Option<Arc<T>>>,
}

impl<T: Injectable> ServiceEntry<T> {
    pub(crate) fn new<F>(constructor: F, lifecycle: Lifecycle) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        ServiceEntry {
            constructor: Box::new(move || Arc::new(constructor())),
            lifecycle,
            instance: Mutex::new(None),
        }
    }

    /// Singleton entry around an already constructed value
    pub(crate) fn with_instance(instance: T) -> Self {
        let instance = Arc::new(instance);
        let shared = instance.clone();
        ServiceEntry {
            constructor: Box::new(move || shared.clone()),
            lifecycle: Lifecycle::Singleton,
            instance: Mutex::new(Some(instance)),
        }
    }

    /// Returns an instance according to the entry's lifecycle
    ///
    /// For singletons the constructor runs while the entry lock is held.
    /// Resolving the same singleton from inside its own constructor never returns.
    pub(crate) fn produce(&self) -> Arc<T> {
        match self.lifecycle {
            Lifecycle::Transient => (self.constructor)(),
            Lifecycle::Singleton => {
                // The slot is only written after the constructor returned,
                // so a guard poisoned by a panicking constructor is still consistent
                let mut instance = self.instance.lock().unwrap_or_else(PoisonError::into_inner);

                if let Some(existing) = instance.as_ref() {
                    return existing.clone();
                }

                let created = (self.constructor)();
                tracing::debug!("Constructed singleton instance of {}", std::any::type_name::<T>());

                *instance = Some(created.clone());
                created
            }
        }
    }
}

/// State of an entry as shown by the container's Debug output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryState {
    Transient,
    Pending,
    Constructing,
    Created,
}
impl std::fmt::Display for EntryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryState::Transient => f.write_str("transient"),
            EntryState::Pending => f.write_str("singleton (pending)"),
            EntryState::Constructing => f.write_str("singleton (constructing)"),
            EntryState::Created => f.write_str("singleton (created)"),
        }
    }
}

/// Type erased view of a [ServiceEntry], allowing entries of
/// different types to live in the same registry
pub(crate) trait DynEntry: Send + Sync {
    fn info(&self) -> TypeInfo;

    fn lifecycle(&self) -> Lifecycle;

    /// Never blocks - reports `Constructing` if the entry lock is taken
    fn state(&self) -> EntryState;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Injectable> DynEntry for ServiceEntry<T> {
    fn info(&self) -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn state(&self) -> EntryState {
        if self.lifecycle == Lifecycle::Transient {
            return EntryState::Transient;
        }

        let created = match self.instance.try_lock() {
            Ok(instance) => instance.is_some(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_some(),
            Err(TryLockError::WouldBlock) => return EntryState::Constructing,
        };

        if created {
            EntryState::Created
        } else {
            EntryState::Pending
        }
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
