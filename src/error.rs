//! Error handling for vireo operations.
//!
//! All public APIs return `Result<T, GraphError>`. Every failure the engine
//! reports is synchronous and locally detectable; nothing is retried
//! internally, so an error always describes the first thing that went wrong.

use thiserror::Error;

use crate::model::TypeId;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur during graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A schema lookup by name or type id found no matching type.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// The referenced element does not exist (or no longer exists).
    ///
    /// Stale handles held across a removal surface here: local ids are
    /// recycled, so the handle may later resolve to a different element,
    /// but between removal and reuse the lookup fails.
    #[error("{0} not found")]
    ElementNotFound(&'static str),

    /// An edge endpoint does not match a restricted edge type's declared
    /// tail or head vertex type.
    #[error("invalid endpoint type: expected vertex type {expected}, found {found}")]
    InvalidEndpointType {
        /// The vertex type the restricted edge type declares.
        expected: TypeId,
        /// The vertex type actually supplied.
        found: TypeId,
    },

    /// A property lookup by name found no declaration on the type.
    #[error("property not found: {0}")]
    PropertyNotFound(String),

    /// The local-id space of a type is fully allocated.
    ///
    /// Not expected in practice with 32-bit local ids, but representable
    /// so the allocator never silently wraps.
    #[error("identifier space exhausted")]
    AllocatorExhausted,

    /// A write to a `Unique`-kind property would duplicate an existing
    /// value. Only raised when [`Config::enforce_unique`] is on.
    ///
    /// [`Config::enforce_unique`]: crate::Config::enforce_unique
    #[error("unique constraint violated on property {property:?}")]
    UniqueViolation {
        /// Name of the property whose uniqueness would be broken.
        property: String,
    },

    /// Invalid argument or operation, e.g. a property value whose data
    /// type does not match the declaration.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
