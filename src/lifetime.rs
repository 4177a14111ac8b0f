//! Registration lifecycle definitions.

/// Caching policy of a registration
///
/// # Examples
///
/// ```rust
/// use cradle_di::{Container, Lifecycle, Provider, Resolver};
/// use std::sync::Arc;
///
/// struct Connection;
///
/// let container = Container::new();
/// container.register_with(
///     "connection",
///     Provider::factory(|_| Ok(Connection)),
///     Lifecycle::Singleton,
/// );
///
/// let a = container.get_token::<Connection>("connection").unwrap();
/// let b = container.get_token::<Connection>("connection").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// New instance per resolution, never cached
    ///
    /// The provider runs on every resolution. Value providers still hand back
    /// the stored instance each time.
    #[default]
    Transient,
    /// Single instance per registration, cached until `clear_instances`
    ///
    /// The cache lives on the registration itself, so child containers that
    /// reach the registration through their parent share the same instance.
    Singleton,
    /// Single instance per resolving container
    ///
    /// Every container keeps its own cache, so a child container gets its own
    /// instance even for a registration it inherited from the parent.
    ContainerScoped,
}
