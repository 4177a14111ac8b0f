//! Declarative registration of types, methods and parameter overrides.
//!
//! [`Annotate`] is a small builder over a [`MetadataRegistry`] that records what
//! the resolver needs to know about a type: its initializer, its injectable
//! methods, per-parameter token and context overrides, and which container the
//! type should be registered in.
//!
//! # Examples
//!
//! ```rust
//! use cradle_di::{Annotate, Arguments, Container, DiResult, Member, MetadataRegistry, ParameterDescriptor, Resolver};
//! use std::sync::Arc;
//!
//! struct Pool { url: String }
//!
//! struct Repository { pool: Arc<Pool> }
//!
//! let registry = Arc::new(MetadataRegistry::new());
//! let container = Container::with_registry(registry.clone());
//! container.register_value_in(Arc::new(Pool { url: "primary".into() }), "primary");
//! container.register_value_in(Arc::new(Pool { url: "replica".into() }), "replica");
//!
//! Annotate::<Repository>::on(&registry)
//!     .initializer(vec![ParameterDescriptor::new(0, "pool").of_type::<Pool>()], |args| {
//!         Ok(Repository { pool: args.get(0)? })
//!     })
//!     .context(Member::Initializer, 0, "replica");
//!
//! assert_eq!(container.get::<Repository>().unwrap().pool.url, "replica");
//! ```

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::container::Container;
use crate::context::Context;
use crate::error::DiResult;
use crate::global::ContainerRegistry;
use crate::lifetime::Lifecycle;
use crate::metadata::{Arguments, Injectable, Member, MetadataRegistry, ParameterDescriptor};
use crate::registration::Value;
use crate::token::{ClassType, TokenSource};

/// Metadata builder for the type `T`.
pub struct Annotate<T> {
    registry: Arc<MetadataRegistry>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> Annotate<T> {
    /// Annotates `T` in `registry`.
    pub fn on(registry: &Arc<MetadataRegistry>) -> Self {
        Self {
            registry: registry.clone(),
            _marker: PhantomData,
        }
    }

    /// Annotates `T` in the process-wide registry.
    pub fn global() -> Self {
        Self::on(&MetadataRegistry::global())
    }

    /// Records the initializer of `T`.
    pub fn initializer<F>(&self, parameters: Vec<ParameterDescriptor>, initializer: F) -> &Self
    where
        F: Fn(&Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        self.registry
            .register_class(ClassType::of::<T>(), parameters, move |args: &Arguments| -> DiResult<Value> {
                Ok(Arc::new(initializer(args)?))
            });
        self
    }

    /// Records an injectable method of `T`.
    pub fn method<F>(&self, name: impl Into<Cow<'static, str>>, parameters: Vec<ParameterDescriptor>, method: F) -> &Self
    where
        F: Fn(&T, &Arguments) -> DiResult<Value> + Send + Sync + 'static,
    {
        self.registry.register_method_fn::<T, F>(name, parameters, method);
        self
    }

    /// Forces the token used for one parameter. Pass [`TokenSource::lazy`] to
    /// refer to a type that isn't available yet.
    pub fn token(&self, member: Member, index: usize, source: impl Into<TokenSource>) -> &Self {
        self.registry
            .set_parameter_token(std::any::TypeId::of::<T>(), member, index, source);
        self
    }

    /// Forces the resolution context used for one parameter.
    pub fn context(&self, member: Member, index: usize, context: impl Into<Context>) -> &Self {
        self.registry
            .set_parameter_context(std::any::TypeId::of::<T>(), member, index, context);
        self
    }

    /// Registers `T` in `container` as a singleton.
    pub fn singleton_in(&self, container: &Container) -> &Self {
        container.register_class::<T>(Lifecycle::Singleton);
        self
    }

    /// Registers `T` in `container` as a transient.
    pub fn transient_in(&self, container: &Container) -> &Self {
        container.register_class::<T>(Lifecycle::Transient);
        self
    }

    /// Registers `T` as a singleton in the default global container, or in the
    /// named one.
    pub fn singleton(&self, container: Option<&str>) -> &Self {
        self.singleton_in(&target(container))
    }

    /// Registers `T` as a transient in the default global container, or in the
    /// named one.
    pub fn transient(&self, container: Option<&str>) -> &Self {
        self.transient_in(&target(container))
    }
}

impl<T: Injectable> Annotate<T> {
    /// Records the initializer declared by `T`'s [`Injectable`] impl.
    pub fn injectable(&self) -> &Self {
        self.registry.register_injectable::<T>();
        self
    }
}

impl<T: Any + Send + Sync + Default> Annotate<T> {
    /// Records `T::default()` as a zero-parameter initializer.
    pub fn defaulted(&self) -> &Self {
        self.initializer(Vec::new(), |_| Ok(T::default()))
    }
}

impl<T> fmt::Debug for Annotate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotate")
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

fn target(name: Option<&str>) -> Container {
    let registry = ContainerRegistry::global();
    match name {
        Some(name) => registry.instance(name),
        None => registry.global_instance(),
    }
}
