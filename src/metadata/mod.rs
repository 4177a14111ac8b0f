//! Metadata registry for initializer and method parameters.
//!
//! The registry is the only place the engine learns about parameters. It is
//! populated explicitly, usually through [`Annotate`](crate::Annotate), and is
//! never cleared. Re-registering a type or method overwrites the earlier entry.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::context::Context;
use crate::error::{DiError, DiResult};
use crate::registration::Value;
use crate::token::{ClassType, TokenSource};

pub mod arguments;
pub mod descriptors;

pub use arguments::Arguments;
pub use descriptors::ParameterDescriptor;

pub(crate) type Initializer = Arc<dyn Fn(&Arguments) -> DiResult<Value> + Send + Sync>;
pub(crate) type Invoker = Arc<dyn Fn(&Value, &Arguments) -> DiResult<Value> + Send + Sync>;

/// A type whose initializer can be driven by a container.
///
/// This is the hand-written counterpart of reflected constructor metadata: the
/// type lists its parameters and builds itself from the resolved arguments.
///
/// # Examples
///
/// ```rust
/// use cradle_di::{Arguments, Container, DiResult, Injectable, MetadataRegistry, ParameterDescriptor, Resolver};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Database;
///
/// struct Repository {
///     db: Arc<Database>,
/// }
///
/// impl Injectable for Repository {
///     fn parameters() -> Vec<ParameterDescriptor> {
///         vec![ParameterDescriptor::new(0, "db").of_type::<Database>()]
///     }
///
///     fn construct(args: &Arguments) -> DiResult<Self> {
///         Ok(Repository { db: args.get(0)? })
///     }
/// }
///
/// let registry = Arc::new(MetadataRegistry::new());
/// registry.register_injectable::<Repository>();
///
/// let container = Container::with_registry(registry);
/// container.register_value(Arc::new(Database));
///
/// let repo = container.get::<Repository>().unwrap();
/// assert!(Arc::ptr_eq(&repo.db, &container.get::<Database>().unwrap()));
/// ```
pub trait Injectable: Any + Send + Sync + Sized {
    /// Parameters of the initializer, in declaration order.
    fn parameters() -> Vec<ParameterDescriptor>;

    /// Builds the value from resolved arguments.
    fn construct(args: &Arguments) -> DiResult<Self>;
}

/// The member a parameter belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Member {
    /// The type's initializer
    Initializer,
    /// A named method
    Method(Cow<'static, str>),
}

impl Member {
    /// Method member.
    pub fn method(name: impl Into<Cow<'static, str>>) -> Self {
        Member::Method(name.into())
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Initializer => f.write_str("constructor"),
            Member::Method(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ParameterKey {
    owner: TypeId,
    member: Member,
    index: usize,
}

/// Recorded initializer of a type
#[derive(Clone)]
pub struct ClassInfo {
    class: ClassType,
    parameters: Arc<[ParameterDescriptor]>,
    initializer: Initializer,
}

impl ClassInfo {
    /// The described type.
    pub fn class(&self) -> ClassType {
        self.class
    }

    /// Initializer parameters.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub(crate) fn initialize(&self, args: &Arguments) -> DiResult<Value> {
        (self.initializer)(args)
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("class", &self.class)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Recorded method of a type
#[derive(Clone)]
pub struct MethodInfo {
    owner: &'static str,
    name: Cow<'static, str>,
    parameters: Arc<[ParameterDescriptor]>,
    invoker: Invoker,
}

impl MethodInfo {
    /// Name of the owning type.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Method parameters.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub(crate) fn call(&self, target: &Value, args: &Arguments) -> DiResult<Value> {
        (self.invoker)(target, args)
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

static GLOBAL_REGISTRY: Lazy<Arc<MetadataRegistry>> = Lazy::new(|| Arc::new(MetadataRegistry::new()));

/// Store of parameter descriptors and per-parameter overrides.
///
/// Containers hold a handle to the registry they read from. `Container::new()`
/// uses [`MetadataRegistry::global`]; tests and embedders can thread an isolated
/// registry through [`Container::with_registry`](crate::Container::with_registry).
#[derive(Default)]
pub struct MetadataRegistry {
    classes: RwLock<HashMap<TypeId, ClassInfo>>,
    methods: RwLock<HashMap<TypeId, HashMap<Cow<'static, str>, MethodInfo>>>,
    tokens: RwLock<HashMap<ParameterKey, TokenSource>>,
    contexts: RwLock<HashMap<ParameterKey, Context>>,
    names: RwLock<HashMap<TypeId, &'static str>>,
}

impl MetadataRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created on first access.
    pub fn global() -> Arc<MetadataRegistry> {
        GLOBAL_REGISTRY.clone()
    }

    /// Records the initializer of `class`.
    pub fn register_class<F>(&self, class: ClassType, parameters: Vec<ParameterDescriptor>, initializer: F)
    where
        F: Fn(&Arguments) -> DiResult<Value> + Send + Sync + 'static,
    {
        debug!(class = class.name(), parameters = parameters.len(), "recording initializer");
        self.names.write().insert(class.id(), class.name());
        self.classes.write().insert(
            class.id(),
            ClassInfo {
                class,
                parameters: parameters.into(),
                initializer: Arc::new(initializer),
            },
        );
    }

    /// Records the initializer of an [`Injectable`] type.
    pub fn register_injectable<T: Injectable>(&self) {
        self.register_class(ClassType::of::<T>(), T::parameters(), |args: &Arguments| -> DiResult<Value> {
            Ok(Arc::new(T::construct(args)?))
        });
    }

    /// Records a method of `class` with a type-erased invoker.
    pub fn register_method<F>(
        &self,
        class: ClassType,
        name: impl Into<Cow<'static, str>>,
        parameters: Vec<ParameterDescriptor>,
        invoker: F,
    ) where
        F: Fn(&Value, &Arguments) -> DiResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(class = class.name(), method = %name, parameters = parameters.len(), "recording method");
        self.names.write().insert(class.id(), class.name());
        self.methods.write().entry(class.id()).or_default().insert(
            name.clone(),
            MethodInfo {
                owner: class.name(),
                name,
                parameters: parameters.into(),
                invoker: Arc::new(invoker),
            },
        );
    }

    /// Records a method of `T` whose invoker receives `&T`.
    pub fn register_method_fn<T, F>(
        &self,
        name: impl Into<Cow<'static, str>>,
        parameters: Vec<ParameterDescriptor>,
        method: F,
    ) where
        T: Any + Send + Sync,
        F: Fn(&T, &Arguments) -> DiResult<Value> + Send + Sync + 'static,
    {
        self.register_method(ClassType::of::<T>(), name, parameters, move |target, args| {
            let target = target
                .downcast_ref::<T>()
                .ok_or(DiError::TypeMismatch(std::any::type_name::<T>()))?;
            method(target, args)
        });
    }

    /// Initializer record for a type.
    pub fn class(&self, id: TypeId) -> Option<ClassInfo> {
        self.classes.read().get(&id).cloned()
    }

    /// Initializer parameters for a type, or `None` if it was never recorded.
    pub fn constructor_parameters(&self, id: TypeId) -> Option<Arc<[ParameterDescriptor]>> {
        self.classes.read().get(&id).map(|info| info.parameters.clone())
    }

    /// Name of a type that has an initializer or a method recorded.
    pub fn type_name(&self, id: TypeId) -> Option<&'static str> {
        self.names.read().get(&id).copied()
    }

    /// Method record for a type.
    pub fn method(&self, id: TypeId, name: &str) -> Option<MethodInfo> {
        self.methods.read().get(&id)?.get(name).cloned()
    }

    /// Method parameters, or `None` if the method was never recorded.
    pub fn method_parameters(&self, id: TypeId, name: &str) -> Option<Arc<[ParameterDescriptor]>> {
        self.methods.read().get(&id)?.get(name).map(|info| info.parameters.clone())
    }

    /// Whether the member of `id` has been recorded.
    pub fn has_member(&self, id: TypeId, member: &Member) -> bool {
        match member {
            Member::Initializer => self.classes.read().contains_key(&id),
            Member::Method(name) => self
                .methods
                .read()
                .get(&id)
                .is_some_and(|methods| methods.contains_key(name.as_ref())),
        }
    }

    /// Forces the token used for one parameter.
    pub fn set_parameter_token(&self, owner: TypeId, member: Member, index: usize, token: impl Into<TokenSource>) {
        self.tokens
            .write()
            .insert(ParameterKey { owner, member, index }, token.into());
    }

    /// Forced token of one parameter.
    pub fn parameter_token(&self, owner: TypeId, member: &Member, index: usize) -> Option<TokenSource> {
        self.tokens
            .read()
            .get(&ParameterKey { owner, member: member.clone(), index })
            .cloned()
    }

    /// Forces the resolution context used for one parameter.
    pub fn set_parameter_context(&self, owner: TypeId, member: Member, index: usize, context: impl Into<Context>) {
        self.contexts
            .write()
            .insert(ParameterKey { owner, member, index }, context.into());
    }

    /// Forced context of one parameter.
    pub fn parameter_context(&self, owner: TypeId, member: &Member, index: usize) -> Option<Context> {
        self.contexts
            .read()
            .get(&ParameterKey { owner, member: member.clone(), index })
            .cloned()
    }
}

impl fmt::Debug for MetadataRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataRegistry")
            .field("classes", &self.classes.read().len())
            .field("methods", &self.methods.read().values().map(HashMap::len).sum::<usize>())
            .field("token_overrides", &self.tokens.read().len())
            .field("context_overrides", &self.contexts.read().len())
            .finish()
    }
}
