use thiserror::Error;

/// Errors when trying to resolve a certain type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The requested type was never registered
    #[error("The requested type '{0}' is not registered.")]
    NotRegistered(&'static str),

    /// The stored entry does not belong to the requested type
    #[error("Invalid service entry, required: '{required_type}' actual: '{actual_type}'")]
    InvalidEntry {
        required_type: &'static str,
        actual_type: &'static str,
    },
}

impl ResolveError {
    /// Name of the type the failed resolution asked for
    pub fn type_name(&self) -> &'static str {
        match self {
            ResolveError::NotRegistered(type_name) => type_name,
            ResolveError::InvalidEntry { required_type, .. } => required_type,
        }
    }
}
