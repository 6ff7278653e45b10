//! Registration errors.

use kiln_registry::PatchError;
use kiln_utils::{Identifier, IdentifierError};
use thiserror::Error;

use crate::id::{CacheError, TypeKind};

/// Why a registration or lookup failed.
///
/// None of these are retryable. [`RegistrationError::RegistryShape`] means
/// the host is not what this crate was written against and startup must stop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// Malformed identifier, wrong prototype kind, or an unknown identifier.
    #[error("invalid registration: {0}")]
    InvalidRegistration(String),
    /// The identifier or id is already bound to something else.
    #[error("duplicate registration: {0}")]
    DuplicateRegistration(String),
    /// Creative category outside the known set.
    #[error("unknown creative category `{0}`")]
    UnknownCategory(String),
    /// A component value has no tag representation.
    #[error("cannot build metadata for component `{component}`: {reason}")]
    MetadataBuild {
        /// Name of the offending component.
        component: String,
        /// What was wrong with its value.
        reason: String,
    },
    /// The host registries do not have the expected layout. Fatal.
    #[error("host registry shape mismatch: {0}")]
    RegistryShape(String),
    /// The id cache could not be written after allocating a new id.
    #[error("{0}")]
    CacheStore(String),
    /// A worker replay met an identifier the cache does not know.
    #[error("`{0}` is not in the id cache")]
    UncachedIdentifier(Identifier),
}

impl RegistrationError {
    pub(crate) fn kind_conflict(identifier: &Identifier, existing: TypeKind, requested: TypeKind) -> Self {
        Self::DuplicateRegistration(format!(
            "`{identifier}` is already registered as {existing}, cannot register it as {requested}"
        ))
    }

    pub(crate) fn not_registered(identifier: &Identifier) -> Self {
        Self::InvalidRegistration(format!("`{identifier}` is not registered"))
    }
}

impl From<IdentifierError> for RegistrationError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidRegistration(err.to_string())
    }
}

impl From<PatchError> for RegistrationError {
    fn from(err: PatchError) -> Self {
        match err {
            PatchError::Shape(reason) => Self::RegistryShape(reason),
            other => Self::DuplicateRegistration(other.to_string()),
        }
    }
}

impl From<CacheError> for RegistrationError {
    fn from(err: CacheError) -> Self {
        Self::CacheStore(err.to_string())
    }
}
