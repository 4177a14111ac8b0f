//! Method dispatch with injected parameters.
//!
//! A [`Dispatcher`] resolves the parameters of a recorded method from its
//! container, layered under three caller-supplied override tables. For each
//! parameter the first of these that applies wins:
//!
//! 1. a value set for the parameter's type (or forced token)
//! 2. a registration for that type anywhere in the container chain
//! 3. a value set for the parameter's name
//! 4. a value set for the parameter's position
//! 5. the parameter's own default
//!
//! A [`TiedDispatcher`] is the same thing bound to one object and method.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::metadata::{Arguments, Member, MethodInfo};
use crate::registration::Value;
use crate::token::{ClassType, Token};

fn downcast<R: Any + Send + Sync>(value: Value) -> DiResult<Arc<R>> {
    value
        .downcast::<R>()
        .map_err(|_| DiError::TypeMismatch(std::any::type_name::<R>()))
}

/// Resolves and invokes recorded methods.
///
/// Cloning a dispatcher copies its override tables; the clone and the original
/// never see each other's later changes.
///
/// # Examples
///
/// ```rust
/// use cradle_di::{Arguments, Container, MetadataRegistry, ParameterDescriptor, Value};
/// use std::sync::Arc;
///
/// struct Logger;
/// struct Handler;
///
/// let registry = Arc::new(MetadataRegistry::new());
/// registry.register_method_fn::<Handler, _>(
///     "handle",
///     vec![
///         ParameterDescriptor::new(0, "logger").of_type::<Logger>(),
///         ParameterDescriptor::new(1, "path").of_primitive::<String>(),
///     ],
///     |_handler, args| -> cradle_di::DiResult<Value> {
///         let _logger = args.get::<Logger>(0)?;
///         let path = args.get::<String>(1)?;
///         Ok(Arc::new(format!("handled {}", path)))
///     },
/// );
///
/// let container = Container::with_registry(registry);
/// container.register_value(Arc::new(Logger));
///
/// let mut dispatcher = container.create_dispatcher();
/// dispatcher.set_named_parameter("path", Arc::new("/index".to_string()));
///
/// let handler: Value = Arc::new(Handler);
/// let out = dispatcher.invoke_as::<String>(&handler, "handle").unwrap();
/// assert_eq!(*out, "handled /index");
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    container: Container,
    named: HashMap<String, Value>,
    typed: HashMap<Token, Value>,
    positional: HashMap<usize, Value>,
}

impl Dispatcher {
    pub(crate) fn new(container: Container) -> Self {
        Self {
            container,
            named: HashMap::new(),
            typed: HashMap::new(),
            positional: HashMap::new(),
        }
    }

    /// The container parameters are resolved from.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Supplies a value for parameters named `name` that the container can't fill.
    pub fn set_named_parameter(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.named.insert(name.into(), value);
        self
    }

    /// Supplies `value` for every parameter of type `T`, ahead of the container.
    pub fn set_typed_parameter<T: Any + Send + Sync>(&mut self, value: Arc<T>) -> &mut Self {
        self.typed.insert(Token::of::<T>(), value);
        self
    }

    /// Supplies a value for every parameter looked up by `token`, ahead of the container.
    pub fn set_token_parameter(&mut self, token: impl Into<Token>, value: Value) -> &mut Self {
        self.typed.insert(token.into(), value);
        self
    }

    /// Supplies a value for the parameter at `index` that nothing else can fill.
    pub fn set_positional_parameter(&mut self, index: usize, value: Value) -> &mut Self {
        self.positional.insert(index, value);
        self
    }

    /// Drops the override for parameters named `name`.
    pub fn remove_named_parameter(&mut self, name: &str) -> &mut Self {
        self.named.remove(name);
        self
    }

    /// Drops the override for parameters of type `T`.
    pub fn remove_typed_parameter<T: Any + Send + Sync>(&mut self) -> &mut Self {
        self.typed.remove(&Token::of::<T>());
        self
    }

    /// Drops the override keyed by `token`.
    pub fn remove_token_parameter(&mut self, token: &Token) -> &mut Self {
        self.typed.remove(token);
        self
    }

    /// Drops the override for the parameter at `index`.
    pub fn remove_positional_parameter(&mut self, index: usize) -> &mut Self {
        self.positional.remove(&index);
        self
    }

    /// Resolves the parameters of `class`'s method `method`.
    ///
    /// # Errors
    ///
    /// - [`DiError::MissingMethodInfo`] when the method was never recorded
    /// - [`DiError::UndeclaredParameterType`] for an untyped parameter without a default
    /// - [`DiError::UnresolvedParameter`] when no source can fill a parameter
    pub fn resolve_parameters(&self, class: ClassType, method: &str) -> DiResult<Arguments> {
        let info = self.method_info(class.id(), class.name(), method)?;
        self.resolve_method(class.id(), &info)
    }

    /// Resolves the parameters of `method` on the runtime type of `object`.
    pub fn resolve_parameters_for(&self, object: &Value, method: &str) -> DiResult<Arguments> {
        let owner = (**object).type_id();
        let info = self.method_info(owner, self.type_name(owner), method)?;
        self.resolve_method(owner, &info)
    }

    /// Resolves the parameters of `method` and calls it on `object`.
    pub fn invoke(&self, object: &Value, method: &str) -> DiResult<Value> {
        let owner = (**object).type_id();
        let info = self.method_info(owner, self.type_name(owner), method)?;
        let args = self.resolve_method(owner, &info)?;
        trace!(owner = info.owner(), method, "invoking");
        info.call(object, &args)
    }

    /// Like [`invoke`](Self::invoke), downcasting the result to `R`.
    pub fn invoke_as<R: Any + Send + Sync>(&self, object: &Value, method: &str) -> DiResult<Arc<R>> {
        downcast(self.invoke(object, method)?)
    }

    fn type_name(&self, owner: TypeId) -> &'static str {
        self.container.metadata().type_name(owner).unwrap_or("object")
    }

    fn method_info(&self, owner: TypeId, type_name: &'static str, method: &str) -> DiResult<MethodInfo> {
        self.container
            .metadata()
            .method(owner, method)
            .ok_or_else(|| DiError::MissingMethodInfo {
                type_name,
                method: method.to_string(),
            })
    }

    fn resolve_method(&self, owner: TypeId, info: &MethodInfo) -> DiResult<Arguments> {
        let metadata = self.container.metadata();
        let member = Member::method(info.name().to_string());
        let target = || format!("{}.{}", info.owner(), info.name());
        let mut slots = Vec::with_capacity(info.parameters().len());

        for param in info.parameters() {
            let forced = metadata.parameter_token(owner, &member, param.index());
            let context = metadata.parameter_context(owner, &member, param.index());

            let token = match &forced {
                Some(source) => Some(source.get().ok_or(DiError::UndefinedToken)?),
                None => param.declared_type().cloned(),
            };

            let Some(token) = token else {
                if param.has_default() {
                    slots.push(None);
                    continue;
                }
                return Err(DiError::UndeclaredParameterType {
                    target: target(),
                    index: param.index(),
                });
            };

            if let Some(value) = self.typed.get(&token) {
                slots.push(Some(value.clone()));
            } else if (param.is_known_type() || forced.is_some()) && self.container.is_registered(&token, true) {
                slots.push(Some(self.container.resolve_token(Some(token), context)?));
            } else if let Some(value) = self.named.get(param.name()) {
                slots.push(Some(value.clone()));
            } else if let Some(value) = self.positional.get(&param.index()) {
                slots.push(Some(value.clone()));
            } else if param.has_default() {
                slots.push(None);
            } else {
                return Err(DiError::UnresolvedParameter {
                    target: target(),
                    name: param.name().to_string(),
                });
            }
        }

        Ok(Arguments::from(slots))
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("named", &self.named.keys().collect::<Vec<_>>())
            .field("typed", &self.typed.keys().collect::<Vec<_>>())
            .field("positional", &self.positional.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// A [`Dispatcher`] bound to one object and method.
///
/// # Examples
///
/// ```rust
/// use cradle_di::{Container, MetadataRegistry, ParameterDescriptor, Value};
/// use std::sync::Arc;
///
/// struct Greeter;
///
/// let registry = Arc::new(MetadataRegistry::new());
/// registry.register_method_fn::<Greeter, _>(
///     "greet",
///     vec![ParameterDescriptor::new(0, "name").of_primitive::<String>()],
///     |_greeter, args| -> cradle_di::DiResult<Value> {
///         Ok(Arc::new(format!("hello {}", args.get::<String>(0)?)))
///     },
/// );
///
/// let container = Container::with_registry(registry);
/// let mut tied = container.create_tied_dispatcher(Arc::new(Greeter), "greet");
/// tied.set_positional_parameter(0, Arc::new("world".to_string()));
///
/// assert_eq!(*tied.invoke_as::<String>().unwrap(), "hello world");
/// ```
#[derive(Clone)]
pub struct TiedDispatcher {
    dispatcher: Dispatcher,
    object: Value,
    method: Cow<'static, str>,
}

impl TiedDispatcher {
    pub(crate) fn new(dispatcher: Dispatcher, object: Value, method: Cow<'static, str>) -> Self {
        Self {
            dispatcher,
            object,
            method,
        }
    }

    /// The bound object.
    pub fn object(&self) -> &Value {
        &self.object
    }

    /// The bound method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The container parameters are resolved from.
    pub fn container(&self) -> &Container {
        self.dispatcher.container()
    }

    /// See [`Dispatcher::set_named_parameter`].
    pub fn set_named_parameter(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.dispatcher.set_named_parameter(name, value);
        self
    }

    /// See [`Dispatcher::set_typed_parameter`].
    pub fn set_typed_parameter<T: Any + Send + Sync>(&mut self, value: Arc<T>) -> &mut Self {
        self.dispatcher.set_typed_parameter(value);
        self
    }

    /// See [`Dispatcher::set_token_parameter`].
    pub fn set_token_parameter(&mut self, token: impl Into<Token>, value: Value) -> &mut Self {
        self.dispatcher.set_token_parameter(token, value);
        self
    }

    /// See [`Dispatcher::set_positional_parameter`].
    pub fn set_positional_parameter(&mut self, index: usize, value: Value) -> &mut Self {
        self.dispatcher.set_positional_parameter(index, value);
        self
    }

    /// See [`Dispatcher::remove_named_parameter`].
    pub fn remove_named_parameter(&mut self, name: &str) -> &mut Self {
        self.dispatcher.remove_named_parameter(name);
        self
    }

    /// See [`Dispatcher::remove_typed_parameter`].
    pub fn remove_typed_parameter<T: Any + Send + Sync>(&mut self) -> &mut Self {
        self.dispatcher.remove_typed_parameter::<T>();
        self
    }

    /// See [`Dispatcher::remove_token_parameter`].
    pub fn remove_token_parameter(&mut self, token: &Token) -> &mut Self {
        self.dispatcher.remove_token_parameter(token);
        self
    }

    /// See [`Dispatcher::remove_positional_parameter`].
    pub fn remove_positional_parameter(&mut self, index: usize) -> &mut Self {
        self.dispatcher.remove_positional_parameter(index);
        self
    }

    /// Resolves the parameters of the bound method.
    pub fn resolve_parameters(&self) -> DiResult<Arguments> {
        self.dispatcher.resolve_parameters_for(&self.object, &self.method)
    }

    /// Calls the bound method with resolved parameters.
    pub fn invoke(&self) -> DiResult<Value> {
        self.dispatcher.invoke(&self.object, &self.method)
    }

    /// Like [`invoke`](Self::invoke), downcasting the result to `R`.
    pub fn invoke_as<R: Any + Send + Sync>(&self) -> DiResult<Arc<R>> {
        downcast(self.invoke()?)
    }
}

impl fmt::Debug for TiedDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiedDispatcher")
            .field("method", &self.method)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
