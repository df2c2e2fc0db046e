use std::any::TypeId;

/// Anything stored in the container may be resolved from any thread,
/// so services need to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Type Name and Type Id
///
/// The `type_id` is the registry key, the name is only used for messages.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

/// Determines how a service is instantiated and cached
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
pub enum Lifecycle {
    /// A new instance is constructed on every resolve
    #[default]
    Transient,
    /// The instance is constructed on first resolve and reused afterwards
    Singleton,
}
impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifecycle::Transient => f.write_str("transient"),
            Lifecycle::Singleton => f.write_str("singleton"),
        }
    }
}
