//! Providers and registrations.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::container::Container;
use crate::context::Context;
use crate::error::DiResult;
use crate::lifetime::Lifecycle;
use crate::token::{ClassType, Token};

/// Type-erased instance produced by a container.
pub type Value = Arc<dyn Any + Send + Sync>;

pub(crate) type FactoryFn = Arc<dyn Fn(&Container) -> DiResult<Value> + Send + Sync>;

/// How a registration produces its value.
///
/// # Examples
///
/// ```rust
/// use cradle_di::{Container, Provider, Resolver, Token};
/// use std::sync::Arc;
///
/// struct Settings { verbose: bool }
///
/// let container = Container::new();
/// container
///     .register("settings", Provider::value(Arc::new(Settings { verbose: true })))
///     .register("alias", Provider::token("settings"));
///
/// let settings = container.get_token::<Settings>("alias").unwrap();
/// assert!(settings.verbose);
/// ```
#[derive(Clone)]
pub enum Provider {
    /// A precomputed value, optionally reachable only under a context
    Value {
        /// The stored instance
        value: Value,
        /// Context the value is registered under
        context: Option<Context>,
    },
    /// A type built through its recorded initializer
    Class(ClassType),
    /// Another token resolved in its place
    Token(Token),
    /// A function receiving the resolving container
    Factory(FactoryFn),
}

impl Provider {
    /// Value provider for an existing instance.
    pub fn value<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Provider::Value { value, context: None }
    }

    /// Value provider reachable only under `context`.
    pub fn value_in<T: Any + Send + Sync>(value: Arc<T>, context: impl Into<Context>) -> Self {
        Provider::Value {
            value,
            context: Some(context.into()),
        }
    }

    /// Class provider for `T`.
    pub fn class<T: Any + Send + Sync>() -> Self {
        Provider::Class(ClassType::of::<T>())
    }

    /// Alias provider.
    pub fn token(token: impl Into<Token>) -> Self {
        Provider::Token(token.into())
    }

    /// Factory provider; the result is wrapped in a fresh `Arc`.
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
    {
        Provider::Factory(Arc::new(move |c: &Container| -> DiResult<Value> {
            Ok(Arc::new(factory(c)?))
        }))
    }

    /// Factory provider returning an already type-erased value.
    pub fn factory_value<F>(factory: F) -> Self
    where
        F: Fn(&Container) -> DiResult<Value> + Send + Sync + 'static,
    {
        Provider::Factory(Arc::new(factory))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Provider::Value { .. } => "value",
            Provider::Class(_) => "class",
            Provider::Token(_) => "token",
            Provider::Factory(_) => "factory",
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Value { context, .. } => f
                .debug_struct("Value")
                .field("context", context)
                .finish_non_exhaustive(),
            Provider::Class(class) => f.debug_tuple("Class").field(class).finish(),
            Provider::Token(token) => f.debug_tuple("Token").field(token).finish(),
            Provider::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl From<ClassType> for Provider {
    fn from(class: ClassType) -> Self {
        Provider::Class(class)
    }
}

static NEXT_REGISTRATION: AtomicU64 = AtomicU64::new(1);

/// Identity of a registration, used to key container-scoped caches.
pub(crate) type RegistrationId = u64;

/// A provider together with its lifecycle and singleton cache
pub(crate) struct Registration {
    pub(crate) id: RegistrationId,
    pub(crate) provider: Provider,
    pub(crate) lifecycle: Lifecycle,
    /// Singleton cache; only ever filled for `Lifecycle::Singleton`
    pub(crate) instance: Mutex<Option<Value>>,
}

impl Registration {
    pub(crate) fn new(provider: Provider, lifecycle: Lifecycle) -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_REGISTRATION.fetch_add(1, Ordering::Relaxed),
            provider,
            lifecycle,
            instance: Mutex::new(None),
        })
    }

    pub(crate) fn cached(&self) -> Option<Value> {
        self.instance.lock().clone()
    }

    /// Stores `value` unless a nested resolution already filled the slot, and
    /// returns whatever ends up cached.
    pub(crate) fn cache(&self, value: Value) -> Value {
        let mut slot = self.instance.lock();
        match slot.as_ref() {
            Some(existing) => {
                let existing = existing.clone();
                drop(slot);
                drop(value);
                existing
            }
            None => {
                *slot = Some(value.clone());
                value
            }
        }
    }

    /// Empties the cache and hands back the old value so the caller drops it
    /// outside the lock.
    #[must_use]
    pub(crate) fn clear(&self) -> Option<Value> {
        self.instance.lock().take()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("provider", &self.provider)
            .field("lifecycle", &self.lifecycle)
            .field("cached", &self.instance.lock().is_some())
            .finish()
    }
}
