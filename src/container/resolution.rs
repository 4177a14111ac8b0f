//! Lookup, production and construction.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::trace;

use super::Container;
use crate::context::Context;
use crate::error::{DiError, DiResult};
use crate::internal::{ConstructionGuard, DepthGuard};
use crate::lifetime::Lifecycle;
use crate::metadata::{Arguments, Member};
use crate::registration::{Provider, Registration, Value};
use crate::token::{ClassType, Token};
use crate::traits::{Resolver, ResolverCore};

impl Container {
    /// Resolves one value for `token` using the default resolution context.
    ///
    /// When several registrations exist, the latest one wins. An unregistered
    /// type token is constructed as a fresh transient instance without being
    /// registered.
    ///
    /// # Errors
    ///
    /// - [`DiError::Unregistered`] for an unknown name or symbol
    /// - [`DiError::MissingTypeInfo`] for a type that cannot be constructed
    /// - any error raised while producing the value
    pub fn resolve(&self, token: impl Into<Token>) -> DiResult<Value> {
        self.resolve_token(Some(token.into()), None)
    }

    /// Resolves one value for `token` under `context`.
    pub fn resolve_in(&self, token: impl Into<Token>, context: impl Into<Context>) -> DiResult<Value> {
        self.resolve_token(Some(token.into()), Some(context.into()))
    }

    /// Resolves every value registered for `token` along the parent chain.
    ///
    /// Values come ancestor first, in registration order within a container,
    /// followed by contextual matches. The same instance is only reported once.
    pub fn resolve_all(&self, token: impl Into<Token>) -> DiResult<Vec<Value>> {
        self.resolve_all_token(&token.into(), None)
    }

    /// Like [`resolve_all`](Self::resolve_all), matching contextual
    /// registrations against `context`.
    pub fn resolve_all_in(&self, token: impl Into<Token>, context: impl Into<Context>) -> DiResult<Vec<Value>> {
        self.resolve_all_token(&token.into(), Some(context.into()))
    }

    /// Resolution entry point shared by containers and dispatchers. A `None`
    /// token is a forward reference that evaluated to nothing.
    pub(crate) fn resolve_token(&self, token: Option<Token>, context: Option<Context>) -> DiResult<Value> {
        let _depth = DepthGuard::enter()?;
        let token = token.ok_or(DiError::UndefinedToken)?;
        let context = context.or_else(|| self.default_resolution_context());

        trace!(token = %token, ?context, "resolving");

        if let Some(registration) = self.find_registration(&token, context.as_ref()) {
            return self.make(&registration);
        }

        match token {
            Token::Type(class) => {
                trace!(class = class.name(), "constructing unregistered type");
                self.construct(class)
            }
            plain => Err(DiError::Unregistered(plain.to_string())),
        }
    }

    fn resolve_all_token(&self, token: &Token, context: Option<Context>) -> DiResult<Vec<Value>> {
        let _depth = DepthGuard::enter()?;
        let context = context.or_else(|| self.default_resolution_context());

        let registrations = self.collect_registrations(token, context.as_ref());
        let mut seen = HashSet::with_capacity(registrations.len());
        let mut values = Vec::with_capacity(registrations.len());

        for registration in &registrations {
            let value = self.make(registration)?;
            if seen.insert(Arc::as_ptr(&value) as *const () as usize) {
                values.push(value);
            }
        }

        Ok(values)
    }

    /// The registration a single resolution would use: a contextual match
    /// first, then the latest ordinary registration, then the parent's pick.
    fn find_registration(&self, token: &Token, context: Option<&Context>) -> Option<Arc<Registration>> {
        if let Some(context) = context {
            let table = self.inner.context_providers.read();
            if let Some(by_key) = table.get(token) {
                if let Some(found) = context.keys().find_map(|key| by_key.get(key)) {
                    return Some(found.clone());
                }
            }
        }

        let latest = self
            .inner
            .providers
            .read()
            .get(token)
            .and_then(|list| list.last().cloned());

        match latest {
            Some(registration) => Some(registration),
            None => {
                let parent = self.parent()?;
                parent.find_registration(token, parent.default_resolution_context().as_ref())
            }
        }
    }

    /// Every registration for `token`, root ancestor first.
    fn collect_registrations(&self, token: &Token, context: Option<&Context>) -> Vec<Arc<Registration>> {
        let mut registrations = match self.parent() {
            Some(parent) => parent.collect_registrations(token, parent.default_resolution_context().as_ref()),
            None => Vec::new(),
        };

        if let Some(list) = self.inner.providers.read().get(token) {
            registrations.extend(list.iter().cloned());
        }

        if let Some(context) = context {
            if let Some(by_key) = self.inner.context_providers.read().get(token) {
                registrations.extend(context.keys().filter_map(|key| by_key.get(key).cloned()));
            }
        }

        registrations
    }

    /// Produces the value of a registration, honouring its lifecycle.
    fn make(&self, registration: &Registration) -> DiResult<Value> {
        match registration.lifecycle {
            Lifecycle::Transient => self.make_instance(&registration.provider),
            Lifecycle::Singleton => {
                if let Some(value) = registration.cached() {
                    trace!(registration = registration.id, "singleton cache hit");
                    return Ok(value);
                }
                let value = self.make_instance(&registration.provider)?;
                Ok(registration.cache(value))
            }
            Lifecycle::ContainerScoped => {
                if let Some(value) = self.inner.scoped.lock().get(&registration.id).cloned() {
                    trace!(registration = registration.id, "scoped cache hit");
                    return Ok(value);
                }
                let value = self.make_instance(&registration.provider)?;
                let mut scoped = self.inner.scoped.lock();
                match scoped.get(&registration.id) {
                    // A nested resolution got there first
                    Some(existing) => {
                        let existing = existing.clone();
                        drop(scoped);
                        drop(value);
                        Ok(existing)
                    }
                    None => {
                        scoped.insert(registration.id, value.clone());
                        Ok(value)
                    }
                }
            }
        }
    }

    /// Runs a provider without any caching.
    fn make_instance(&self, provider: &Provider) -> DiResult<Value> {
        match provider {
            Provider::Class(class) => self.construct(*class),
            Provider::Factory(factory) => factory(self),
            Provider::Token(token) => self.resolve_token(Some(token.clone()), None),
            Provider::Value { value, .. } => Ok(value.clone()),
        }
    }

    /// Builds `class` through its recorded initializer, resolving every
    /// parameter in declaration order.
    fn construct(&self, class: ClassType) -> DiResult<Value> {
        let metadata = self.metadata();

        let Some(info) = metadata.class(class.id()) else {
            if let Some(initializer) = class.zero_arg_initializer() {
                let _constructing = ConstructionGuard::enter(self);
                return Ok(initializer());
            }
            return Err(DiError::MissingTypeInfo(class.name()));
        };

        let default_context = self.default_resolution_context();
        let mut slots = Vec::with_capacity(info.parameters().len());

        for param in info.parameters() {
            let context = metadata
                .parameter_context(class.id(), &Member::Initializer, param.index())
                .or_else(|| default_context.clone());

            if let Some(source) = metadata.parameter_token(class.id(), &Member::Initializer, param.index()) {
                slots.push(Some(self.resolve_token(source.get(), context)?));
                continue;
            }

            if param.defers_to_default() {
                slots.push(None);
                continue;
            }

            let Some(ty) = param.declared_type() else {
                return Err(DiError::UndeclaredParameterType {
                    target: class.name().to_string(),
                    index: param.index(),
                });
            };

            slots.push(Some(self.resolve_token(Some(ty.clone()), context)?));
        }

        let _constructing = ConstructionGuard::enter(self);
        info.initialize(&Arguments::from(slots))
    }
}

impl ResolverCore for Container {
    fn resolve_any(&self, token: &Token, context: Option<&Context>) -> DiResult<Value> {
        self.resolve_token(Some(token.clone()), context.cloned())
    }

    fn resolve_many(&self, token: &Token, context: Option<&Context>) -> DiResult<Vec<Value>> {
        self.resolve_all_token(token, context.cloned())
    }
}

impl Resolver for Container {}
