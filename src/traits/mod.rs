//! Core traits for the dependency container.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
