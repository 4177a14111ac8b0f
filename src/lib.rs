//! # cradle-di
//!
//! Runtime dependency resolution driven by explicitly recorded parameter
//! metadata.
//!
//! ## Features
//!
//! - **Tokens**: look values up by type, by name or by unique symbol
//! - **Providers**: fixed values, constructed types, aliases and factories
//! - **Lifecycles**: Transient, Singleton and ContainerScoped registrations
//! - **Contexts**: register several values under one token and pick one per request
//! - **Hierarchy**: child containers inherit and shadow their parent's registrations
//! - **Dispatch**: call recorded methods with injected, overridable parameters
//!
//! ## Quick Start
//!
//! ```rust
//! use cradle_di::{Annotate, Container, Lifecycle, MetadataRegistry, ParameterDescriptor, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let registry = Arc::new(MetadataRegistry::new());
//! Annotate::<UserService>::on(&registry).initializer(
//!     vec![ParameterDescriptor::new(0, "db").of_type::<Database>()],
//!     |args| Ok(UserService { db: args.get(0)? }),
//! );
//!
//! let container = Container::with_registry(registry);
//! container.register_value(Arc::new(Database { url: "postgres://localhost".into() }));
//! container.register_class::<UserService>(Lifecycle::Singleton);
//!
//! let users = container.get::<UserService>().unwrap();
//! assert_eq!(users.db.url, "postgres://localhost");
//! assert!(Arc::ptr_eq(&users, &container.get::<UserService>().unwrap()));
//! ```
//!
//! ## Contextual Registrations
//!
//! ```rust
//! use cradle_di::{Container, Resolver};
//! use std::sync::Arc;
//!
//! struct Endpoint(&'static str);
//!
//! let container = Container::new();
//! container.register_value(Arc::new(Endpoint("default")));
//! container.register_value_in(Arc::new(Endpoint("eu")), "eu");
//! container.register_value_in(Arc::new(Endpoint("us")), "us");
//!
//! assert_eq!(container.get::<Endpoint>().unwrap().0, "default");
//! assert_eq!(container.get_in::<Endpoint>("eu").unwrap().0, "eu");
//! assert_eq!(container.get_in::<Endpoint>(["ap", "us"]).unwrap().0, "us");
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events: `debug` for registrations and container
//! creation, `trace` for resolutions and cache hits. No subscriber is installed.

pub mod annotations;
pub mod container;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod global;
pub mod lifetime;
pub mod metadata;
pub mod registration;
pub mod token;
pub mod traits;

mod internal;

pub use annotations::Annotate;
pub use container::Container;
pub use context::{Context, ContextKey, DEFAULT_RESOLUTION_CONTEXT};
pub use dispatcher::{Dispatcher, TiedDispatcher};
pub use error::{DiError, DiResult};
pub use global::{constructing_container, ContainerRegistry};
pub use internal::MAX_RESOLUTION_DEPTH;
pub use lifetime::Lifecycle;
pub use metadata::{Arguments, ClassInfo, Injectable, Member, MetadataRegistry, MethodInfo, ParameterDescriptor};
pub use registration::{Provider, Value};
pub use token::{ClassType, Symbol, Token, TokenSource};
pub use traits::{Resolver, ResolverCore};
