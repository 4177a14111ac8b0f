//! Process-wide containers.
//!
//! The default container and every named container are created on first use
//! and live for the rest of the process. All of them read the global
//! [`MetadataRegistry`](crate::MetadataRegistry).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::debug;

use crate::container::Container;
use crate::internal::construction;

static CONTAINER_REGISTRY: Lazy<ContainerRegistry> = Lazy::new(ContainerRegistry::new);

/// Default and named root containers.
///
/// # Examples
///
/// ```rust
/// use cradle_di::ContainerRegistry;
///
/// let registry = ContainerRegistry::global();
/// let jobs = registry.instance("jobs");
///
/// assert!(jobs.ptr_eq(&registry.instance("jobs")));
/// assert!(!jobs.ptr_eq(&registry.global_instance()));
/// assert!(jobs.parent().is_none());
/// ```
pub struct ContainerRegistry {
    default: Container,
    named: Mutex<HashMap<String, Container>>,
}

impl ContainerRegistry {
    fn new() -> Self {
        Self {
            default: Container::new(),
            named: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static ContainerRegistry {
        &CONTAINER_REGISTRY
    }

    /// The default container.
    pub fn global_instance(&self) -> Container {
        self.default.clone()
    }

    /// The container called `name`, created as a new root on first request.
    pub fn instance(&self, name: &str) -> Container {
        self.named
            .lock()
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(name, "creating named container");
                Container::new()
            })
            .clone()
    }

    /// The container currently running an initializer on this thread.
    pub fn constructor_instance(&self) -> Option<Container> {
        construction::current()
    }

    /// Forgets the containers recorded as running an initializer on this thread.
    pub fn clear_constructor_instance(&self) {
        construction::clear();
    }
}

/// The default process-wide container.
pub fn global() -> Container {
    ContainerRegistry::global().global_instance()
}

/// The process-wide container called `name`.
pub fn named(name: &str) -> Container {
    ContainerRegistry::global().instance(name)
}

/// The container currently running an initializer on this thread, if any.
///
/// Initializers can use this to reach the container building them without it
/// being passed in.
pub fn constructing_container() -> Option<Container> {
    construction::current()
}
