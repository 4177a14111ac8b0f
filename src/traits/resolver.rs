//! Resolver traits for typed resolution.

use std::any::Any;
use std::sync::Arc;

use crate::context::Context;
use crate::error::{DiError, DiResult};
use crate::registration::Value;
use crate::token::Token;

/// Object-safe resolution over type-erased values.
///
/// Implementors look a token up, honour lifecycles and construct unregistered
/// types. Most callers want the typed helpers on [`Resolver`] instead.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single value for `token`.
    ///
    /// A `None` context means "use the resolver's default resolution context".
    fn resolve_any(&self, token: &Token, context: Option<&Context>) -> DiResult<Value>;

    /// Resolves every value registered for `token`, ancestor first.
    fn resolve_many(&self, token: &Token, context: Option<&Context>) -> DiResult<Vec<Value>>;
}

fn downcast<T: Any + Send + Sync>(value: Value) -> DiResult<Arc<T>> {
    value
        .downcast::<T>()
        .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
}

/// Typed resolution built on [`ResolverCore`].
///
/// # Examples
///
/// ```
/// use cradle_di::{Container, Provider, Resolver};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.register_value(Arc::new(42usize));
/// container.register("greeting", Provider::value(Arc::new("hello".to_string())));
///
/// assert_eq!(*container.get::<usize>().unwrap(), 42);
/// assert_eq!(*container.get_token::<String>("greeting").unwrap(), "hello");
/// assert!(container.get_token::<usize>("greeting").is_err());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves the value registered under the type token of `T`.
    fn get<T: Any + Send + Sync>(&self) -> DiResult<Arc<T>> {
        downcast(self.resolve_any(&Token::of::<T>(), None)?)
    }

    /// Resolves the type token of `T` under `context`.
    fn get_in<T: Any + Send + Sync>(&self, context: impl Into<Context>) -> DiResult<Arc<T>> {
        downcast(self.resolve_any(&Token::of::<T>(), Some(&context.into()))?)
    }

    /// Resolves an arbitrary token and downcasts the result to `T`.
    fn get_token<T: Any + Send + Sync>(&self, token: impl Into<Token>) -> DiResult<Arc<T>> {
        downcast(self.resolve_any(&token.into(), None)?)
    }

    /// Resolves an arbitrary token under `context` and downcasts the result.
    fn get_token_in<T: Any + Send + Sync>(&self, token: impl Into<Token>, context: impl Into<Context>) -> DiResult<Arc<T>> {
        downcast(self.resolve_any(&token.into(), Some(&context.into()))?)
    }

    /// Resolves every value registered under the type token of `T`.
    fn get_all<T: Any + Send + Sync>(&self) -> DiResult<Vec<Arc<T>>> {
        self.get_all_token(Token::of::<T>())
    }

    /// Resolves every value registered under `token`, downcasting each one.
    fn get_all_token<T: Any + Send + Sync>(&self, token: impl Into<Token>) -> DiResult<Vec<Arc<T>>> {
        self.resolve_many(&token.into(), None)?
            .into_iter()
            .map(downcast)
            .collect()
    }

    /// Resolves `T`, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics if `T` cannot be resolved or the value is not a `T`.
    fn get_required<T: Any + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }
}
