//! The dependency container.
//!
//! A [`Container`] owns its provider tables, a container-scoped instance cache
//! and a small map of named context variables. Containers form a tree: a child
//! sees every registration of its ancestors and can shadow them locally without
//! touching the parent.

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::context::{Context, ContextKey, DEFAULT_RESOLUTION_CONTEXT};
use crate::dispatcher::{Dispatcher, TiedDispatcher};
use crate::error::{DiError, DiResult};
use crate::lifetime::Lifecycle;
use crate::metadata::MetadataRegistry;
use crate::registration::{Provider, Registration, RegistrationId, Value};
use crate::token::{ClassType, Symbol, Token};

mod resolution;

/// Dependency container handle.
///
/// Cloning a `Container` is cheap and yields another handle to the same
/// container; use [`Container::ptr_eq`] to compare identities.
///
/// # Thread Safety
///
/// Tables are guarded by locks that are never held while a provider runs, so a
/// factory or initializer can freely resolve from the container building it.
/// Resolution itself is synchronous and lock-free with respect to user code.
///
/// # Examples
///
/// ```rust
/// use cradle_di::{Container, Lifecycle, Provider, Resolver};
/// use std::sync::Arc;
///
/// struct Config { url: String }
///
/// let root = Container::new();
/// root.register_value(Arc::new(Config { url: "postgres://root".into() }));
///
/// let child = root.create_child_container();
/// assert_eq!(child.get::<Config>().unwrap().url, "postgres://root");
///
/// child.register_value(Arc::new(Config { url: "postgres://child".into() }));
/// assert_eq!(child.get::<Config>().unwrap().url, "postgres://child");
/// assert_eq!(root.get::<Config>().unwrap().url, "postgres://root");
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    parent: Option<Container>,
    metadata: Arc<MetadataRegistry>,
    providers: RwLock<HashMap<Token, Vec<Arc<Registration>>>>,
    context_providers: RwLock<HashMap<Token, HashMap<ContextKey, Arc<Registration>>>>,
    scoped: Mutex<HashMap<RegistrationId, Value>>,
    context: RwLock<HashMap<String, Value>>,
}

impl Container {
    /// Creates a root container reading the global metadata registry.
    pub fn new() -> Self {
        Self::with_registry(MetadataRegistry::global())
    }

    /// Creates a root container reading `metadata`.
    pub fn with_registry(metadata: Arc<MetadataRegistry>) -> Self {
        Self::build(None, metadata)
    }

    fn build(parent: Option<Container>, metadata: Arc<MetadataRegistry>) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                parent,
                metadata,
                providers: RwLock::new(HashMap::new()),
                context_providers: RwLock::new(HashMap::new()),
                scoped: Mutex::new(HashMap::new()),
                context: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Whether both handles point at the same container.
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The parent container, if any.
    pub fn parent(&self) -> Option<&Container> {
        self.inner.parent.as_ref()
    }

    /// The metadata registry this container reads.
    pub fn metadata(&self) -> &Arc<MetadataRegistry> {
        &self.inner.metadata
    }

    // ----- Registration -----

    /// Registers a transient provider for `token`.
    ///
    /// Later registrations win for single resolution; every registration stays
    /// visible to [`resolve_all`](Self::resolve_all).
    pub fn register(&self, token: impl Into<Token>, provider: impl Into<Provider>) -> &Self {
        self.register_with(token, provider, Lifecycle::Transient)
    }

    /// Registers a provider for `token` with an explicit lifecycle.
    ///
    /// A token provider pointing at the very type being registered is turned
    /// into a class provider. A value provider carrying a context goes to the
    /// contextual table, once per context key.
    pub fn register_with(&self, token: impl Into<Token>, provider: impl Into<Provider>, lifecycle: Lifecycle) -> &Self {
        let token = token.into();
        let mut provider = provider.into();

        if let Token::Type(class) = &token {
            if matches!(&provider, Provider::Token(target) if target == &token) {
                provider = Provider::Class(*class);
            }
        }

        debug!(token = %token, provider = provider.kind(), ?lifecycle, "registering provider");

        let contextual = match &provider {
            Provider::Value { context: Some(context), .. } => Some(context.clone()),
            _ => None,
        };
        let registration = Registration::new(provider, lifecycle);

        {
            let mut providers = self.inner.providers.write();
            let list = providers.entry(token.clone()).or_default();
            if contextual.is_none() {
                list.push(registration.clone());
            }
        }

        if let Some(context) = contextual {
            let replaced: Vec<Arc<Registration>> = {
                let mut table = self.inner.context_providers.write();
                let by_key = table.entry(token).or_default();
                context
                    .keys()
                    .filter_map(|key| by_key.insert(key.clone(), registration.clone()))
                    .collect()
            };
            drop(replaced);
        }

        self
    }

    /// Registers a type under its own token.
    pub fn register_type(&self, class: ClassType, lifecycle: Lifecycle) -> &Self {
        self.register_with(Token::Type(class), Provider::Class(class), lifecycle)
    }

    /// Registers `T` under its own token.
    pub fn register_class<T: Any + Send + Sync>(&self, lifecycle: Lifecycle) -> &Self {
        self.register_type(ClassType::of::<T>(), lifecycle)
    }

    /// Registers an existing object under the token of its type.
    pub fn register_value<T: Any + Send + Sync>(&self, value: Arc<T>) -> &Self {
        self.register(Token::of::<T>(), Provider::value(value))
    }

    /// Registers an existing object under the token of its type, reachable only
    /// under `context`.
    pub fn register_value_in<T: Any + Send + Sync>(&self, value: Arc<T>, context: impl Into<Context>) -> &Self {
        self.register(Token::of::<T>(), Provider::value_in(value, context))
    }

    /// Registers an existing instance for `token`, optionally under a context.
    pub fn register_instance(&self, token: impl Into<Token>, instance: Value, context: Option<Context>) -> &Self {
        self.register(token, Provider::Value { value: instance, context })
    }

    /// Registers a singleton for `from`.
    ///
    /// A type token defaults to constructing itself; `to` may name another type
    /// to construct instead. A plain name requires `to`: another name becomes an
    /// alias, a type becomes the class to construct.
    ///
    /// # Errors
    ///
    /// [`DiError::AmbiguousSingleton`] when `from` is a plain name and `to` is
    /// missing.
    pub fn register_singleton(&self, from: impl Into<Token>, to: Option<Token>) -> DiResult<&Self> {
        let from = from.into();

        let provider = match (&from, to) {
            (_, Some(Token::Type(class))) => Provider::Class(class),
            (Token::Type(class), _) => Provider::Class(*class),
            (_, Some(alias)) => Provider::Token(alias),
            (plain, None) => return Err(DiError::AmbiguousSingleton(plain.to_string())),
        };

        Ok(self.register_with(from, provider, Lifecycle::Singleton))
    }

    /// Whether `token` has ordinary registrations here, or anywhere up the
    /// parent chain when `recursive` is set.
    pub fn is_registered(&self, token: &Token, recursive: bool) -> bool {
        if self.inner.providers.read().contains_key(token) {
            return true;
        }
        recursive && self.parent().is_some_and(|parent| parent.is_registered(token, true))
    }

    /// Forgets every registration, cached instance and context variable.
    pub fn reset(&self) {
        debug!("resetting container");
        // Dropped once every guard is released: a value's `Drop` may call back in.
        let providers = std::mem::take(&mut *self.inner.providers.write());
        let context_providers = std::mem::take(&mut *self.inner.context_providers.write());
        let context = std::mem::take(&mut *self.inner.context.write());
        let scoped = std::mem::take(&mut *self.inner.scoped.lock());
        drop((providers, context_providers, context, scoped));
    }

    /// Drops cached singleton and container-scoped instances; registrations stay.
    pub fn clear_instances(&self) {
        debug!("clearing cached instances");
        let mut registrations: Vec<Arc<Registration>> = Vec::new();
        for list in self.inner.providers.read().values() {
            registrations.extend(list.iter().cloned());
        }
        for by_key in self.inner.context_providers.read().values() {
            registrations.extend(by_key.values().cloned());
        }

        let mut released: Vec<Value> = registrations.iter().filter_map(|r| r.clear()).collect();
        released.extend(std::mem::take(&mut *self.inner.scoped.lock()).into_values());
        drop(released);
    }

    // ----- Context variables -----

    /// Stores a context variable. The value is moved into the container.
    pub fn set_context<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) {
        let previous = self.inner.context.write().insert(name.into(), Arc::new(value));
        drop(previous);
    }

    /// Reads a context variable of type `T`.
    pub fn get_context<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        let value = self.inner.context.read().get(name).cloned()?;
        value.downcast::<T>().ok()
    }

    /// Reads a context variable, falling back to `default`.
    pub fn get_context_or<T: Any + Send + Sync>(&self, name: &str, default: T) -> Arc<T> {
        self.get_context(name).unwrap_or_else(|| Arc::new(default))
    }

    /// Whether a context variable is set, whatever its type.
    pub fn has_context(&self, name: &str) -> bool {
        self.inner.context.read().contains_key(name)
    }

    /// Removes a context variable.
    pub fn remove_context(&self, name: &str) {
        let previous = self.inner.context.write().remove(name);
        drop(previous);
    }

    /// Sets the context used by resolutions that don't pass one.
    pub fn set_default_resolution_context(&self, context: impl Into<Context>) {
        self.set_context(DEFAULT_RESOLUTION_CONTEXT, context.into());
    }

    /// The context applied when a caller passes none.
    ///
    /// Accepts a [`Context`], a [`ContextKey`], a `Vec` of keys or strings, or a
    /// single string, integer, boolean, [`Symbol`] or [`Token`] stored under
    /// [`DEFAULT_RESOLUTION_CONTEXT`]. Fixed-size arrays can't be recognised
    /// once erased; pass them through [`Container::set_default_resolution_context`].
    pub fn default_resolution_context(&self) -> Option<Context> {
        let value = self.inner.context.read().get(DEFAULT_RESOLUTION_CONTEXT).cloned()?;
        context_from_value(&value)
    }

    // ----- Hierarchy and dispatch -----

    /// Creates a child container sharing this container's metadata registry.
    pub fn create_child_container(&self) -> Container {
        debug!("creating child container");
        Self::build(Some(self.clone()), self.inner.metadata.clone())
    }

    /// Creates a dispatcher resolving method parameters from this container.
    pub fn create_dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.clone())
    }

    /// Creates a dispatcher bound to one method of `object`.
    pub fn create_tied_dispatcher(&self, object: Value, method: impl Into<Cow<'static, str>>) -> TiedDispatcher {
        TiedDispatcher::new(self.create_dispatcher(), object, method.into())
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        s.push_str("Registrations:\n");
        for (token, list) in self.inner.providers.read().iter() {
            for registration in list {
                s.push_str(&format!(
                    "  {}: {} {:?}\n",
                    token,
                    registration.provider.kind(),
                    registration.lifecycle
                ));
            }
        }
        s.push_str("Contextual Registrations:\n");
        for (token, by_key) in self.inner.context_providers.read().iter() {
            for (key, registration) in by_key {
                s.push_str(&format!(
                    "  {} @ {}: {} {:?}\n",
                    token,
                    key,
                    registration.provider.kind(),
                    registration.lifecycle
                ));
            }
        }
        s.push_str(&format!("Scoped instances: {}\n", self.inner.scoped.lock().len()));
        s
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("tokens", &self.inner.providers.read().len())
            .field("contextual_tokens", &self.inner.context_providers.read().len())
            .field("has_parent", &self.inner.parent.is_some())
            .finish()
    }
}

/// Reads an erased context variable as a [`Context`].
fn context_from_value(value: &Value) -> Option<Context> {
    let any: &(dyn Any + Send + Sync) = &**value;
    if let Some(context) = any.downcast_ref::<Context>() {
        return Some(context.clone());
    }
    if let Some(keys) = any.downcast_ref::<Vec<ContextKey>>() {
        return Some(Context::Any(keys.clone()));
    }
    if let Some(keys) = any.downcast_ref::<Vec<&'static str>>() {
        return Some(Context::from(keys.clone()));
    }
    if let Some(keys) = any.downcast_ref::<Vec<String>>() {
        return Some(Context::Any(keys.iter().cloned().map(ContextKey::from).collect()));
    }

    let key = if let Some(key) = any.downcast_ref::<ContextKey>() {
        key.clone()
    } else if let Some(s) = any.downcast_ref::<&'static str>() {
        ContextKey::from(*s)
    } else if let Some(s) = any.downcast_ref::<String>() {
        ContextKey::from(s.clone())
    } else if let Some(n) = any.downcast_ref::<i64>() {
        ContextKey::from(*n)
    } else if let Some(b) = any.downcast_ref::<bool>() {
        ContextKey::from(*b)
    } else if let Some(symbol) = any.downcast_ref::<Symbol>() {
        ContextKey::from(*symbol)
    } else {
        ContextKey::from(any.downcast_ref::<Token>()?.clone())
    };
    Some(Context::Single(key))
}
