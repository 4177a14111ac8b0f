//! Context values for contextual registrations.
//!
//! A value registered with a context is only reachable when the caller asks for
//! a matching context. A request may carry a single key or a list of keys; with a
//! list, the first key that has a match wins.

use std::borrow::Cow;
use std::fmt;

use crate::token::{Symbol, Token};

/// Name of the container context variable that supplies the default context for
/// resolutions that don't pass one explicitly.
pub const DEFAULT_RESOLUTION_CONTEXT: &str = "defaultResolutionContext";

/// A single context key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextKey {
    /// Text key
    Str(Cow<'static, str>),
    /// Integer key
    Int(i64),
    /// Boolean key
    Bool(bool),
    /// Unique symbol
    Symbol(Symbol),
    /// Any injection token
    Token(Token),
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKey::Str(s) => f.write_str(s),
            ContextKey::Int(i) => write!(f, "{}", i),
            ContextKey::Bool(b) => write!(f, "{}", b),
            ContextKey::Symbol(s) => write!(f, "Symbol({})", s.description()),
            ContextKey::Token(t) => write!(f, "{}", t),
        }
    }
}

impl From<&'static str> for ContextKey {
    fn from(s: &'static str) -> Self {
        ContextKey::Str(Cow::Borrowed(s))
    }
}

impl From<String> for ContextKey {
    fn from(s: String) -> Self {
        ContextKey::Str(Cow::Owned(s))
    }
}

impl From<i64> for ContextKey {
    fn from(i: i64) -> Self {
        ContextKey::Int(i)
    }
}

impl From<bool> for ContextKey {
    fn from(b: bool) -> Self {
        ContextKey::Bool(b)
    }
}

impl From<Symbol> for ContextKey {
    fn from(s: Symbol) -> Self {
        ContextKey::Symbol(s)
    }
}

impl From<Token> for ContextKey {
    fn from(t: Token) -> Self {
        ContextKey::Token(t)
    }
}

/// The context of a registration or of a resolution request.
///
/// # Examples
///
/// ```rust
/// use cradle_di::{Context, ContextKey};
///
/// let single = Context::from("primary");
/// let list = Context::from(["replica", "primary"]);
///
/// assert_eq!(single.keys().count(), 1);
/// assert_eq!(list.keys().next(), Some(&ContextKey::from("replica")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// Exactly one key
    Single(ContextKey),
    /// Several keys, in priority order
    Any(Vec<ContextKey>),
}

impl Context {
    /// Iterates the keys in priority order.
    pub fn keys(&self) -> std::slice::Iter<'_, ContextKey> {
        match self {
            Context::Single(key) => std::slice::from_ref(key).iter(),
            Context::Any(keys) => keys.iter(),
        }
    }
}

impl From<ContextKey> for Context {
    fn from(key: ContextKey) -> Self {
        Context::Single(key)
    }
}

impl From<&'static str> for Context {
    fn from(s: &'static str) -> Self {
        Context::Single(s.into())
    }
}

impl From<String> for Context {
    fn from(s: String) -> Self {
        Context::Single(s.into())
    }
}

impl From<Symbol> for Context {
    fn from(s: Symbol) -> Self {
        Context::Single(s.into())
    }
}

impl From<Vec<ContextKey>> for Context {
    fn from(keys: Vec<ContextKey>) -> Self {
        Context::Any(keys)
    }
}

impl From<Vec<&'static str>> for Context {
    fn from(keys: Vec<&'static str>) -> Self {
        Context::Any(keys.into_iter().map(ContextKey::from).collect())
    }
}

impl<const N: usize> From<[&'static str; N]> for Context {
    fn from(keys: [&'static str; N]) -> Self {
        Context::Any(keys.into_iter().map(ContextKey::from).collect())
    }
}

impl<const N: usize> From<[ContextKey; N]> for Context {
    fn from(keys: [ContextKey; N]) -> Self {
        Context::Any(keys.into_iter().collect())
    }
}
