//! Error types for the dependency resolution engine.

use thiserror::Error;

/// Dependency resolution errors
///
/// Every failure aborts the current resolve, construct or invoke call chain.
/// Resolution is deterministic, so retrying against the same container state
/// reproduces the same error.
///
/// # Examples
///
/// ```rust
/// use cradle_di::{Container, DiError};
///
/// let container = Container::new();
/// match container.resolve("database") {
///     Err(DiError::Unregistered(name)) => assert_eq!(name, "database"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// A plain name or symbol was resolved without any registration in the chain
    #[error("Cannot resolve unregistered token \"{0}\"")]
    Unregistered(String),
    /// An absent token was resolved, usually a forward reference evaluated too early
    #[error("Failed to resolve undefined token, this could be a circular dependency issue")]
    UndefinedToken,
    /// The type has no recorded initializer and no zero-argument initializer
    #[error("Cannot construct an instance of {0} because no type information is known")]
    MissingTypeInfo(&'static str),
    /// The method was never recorded in the metadata registry
    #[error("Cannot resolve parameters for {type_name}.{method} because no type information is known")]
    MissingMethodInfo {
        /// Owning type name
        type_name: &'static str,
        /// Method name
        method: String,
    },
    /// A parameter has neither a declared type nor a default value
    #[error("Parameter at index {index} of {target} has no declared type")]
    UndeclaredParameterType {
        /// `Type.method` being dispatched
        target: String,
        /// Parameter position
        index: usize,
    },
    /// No override, container registration or default exists for the parameter
    #[error("Cannot resolve a value for the \"{name}\" parameter on {target}")]
    UnresolvedParameter {
        /// `Type.method` being dispatched
        target: String,
        /// Parameter name
        name: String,
    },
    /// `register_singleton` got a plain name as `from` and no `to`
    #[error("A `to` token must be provided when the `from` token \"{0}\" is a name")]
    AmbiguousSingleton(String),
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// An initializer or invoker asked for an argument that was not resolved
    #[error("No argument was resolved at position {0}")]
    MissingArgument(usize),
    /// Maximum resolution depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
}

/// Result type for resolution operations
pub type DiResult<T> = Result<T, DiError>;
