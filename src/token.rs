//! Injection tokens used as lookup keys in containers.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::registration::Value;

/// Identity of a constructible type.
///
/// Besides the `TypeId` used for lookups, a `ClassType` remembers the type name
/// for diagnostics and, optionally, a zero-argument initializer. Types carrying
/// one can be auto-constructed without any entry in the metadata registry.
///
/// Equality and hashing only look at the `TypeId`, so `ClassType::of::<T>()` and
/// `ClassType::with_default::<T>()` name the same token.
///
/// # Examples
///
/// ```rust
/// use cradle_di::ClassType;
///
/// #[derive(Default)]
/// struct Clock;
///
/// assert_eq!(ClassType::of::<Clock>(), ClassType::with_default::<Clock>());
/// assert!(ClassType::with_default::<Clock>().has_zero_arg_initializer());
/// assert!(!ClassType::of::<Clock>().has_zero_arg_initializer());
/// ```
#[derive(Clone, Copy)]
pub struct ClassType {
    id: TypeId,
    name: &'static str,
    zero_arg: Option<fn() -> Value>,
}

impl ClassType {
    /// Type identity without a zero-argument initializer.
    #[inline]
    pub fn of<T: Any + Send + Sync>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            zero_arg: None,
        }
    }

    /// Type identity whose zero-argument initializer is `T::default()`.
    pub fn with_default<T: Any + Send + Sync + Default>() -> Self {
        fn make<T: Any + Send + Sync + Default>() -> Value {
            Arc::new(T::default())
        }

        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            zero_arg: Some(make::<T>),
        }
    }

    /// The `TypeId` of the underlying type.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The type name, for display only.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the type can be built with no arguments at all.
    pub fn has_zero_arg_initializer(&self) -> bool {
        self.zero_arg.is_some()
    }

    pub(crate) fn zero_arg_initializer(&self) -> Option<fn() -> Value> {
        self.zero_arg
    }
}

impl PartialEq for ClassType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClassType {}

impl Hash for ClassType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassType").field(&self.name).finish()
    }
}

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// A process-unique symbolic name.
///
/// Two symbols are equal only when they come from the same `Symbol::new` call,
/// regardless of their descriptions.
#[derive(Debug, Clone, Copy)]
pub struct Symbol {
    id: u64,
    description: &'static str,
}

impl Symbol {
    /// Creates a fresh symbol.
    pub fn new(description: &'static str) -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description,
        }
    }

    /// The description given at creation.
    pub fn description(&self) -> &'static str {
        self.description
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Key used to request a value from a container.
///
/// Tokens are compared by identity: a type token by its `TypeId`, a name by its
/// text and a symbol by the call that created it.
///
/// # Examples
///
/// ```rust
/// use cradle_di::{Symbol, Token};
///
/// struct Database;
///
/// let by_type = Token::of::<Database>();
/// let by_name = Token::from("database");
/// let by_symbol = Token::from(Symbol::new("database"));
///
/// assert!(by_type.is_type());
/// assert!(by_name.is_plain());
/// assert!(by_symbol.is_plain());
/// assert_ne!(by_symbol, Token::from(Symbol::new("database")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// A constructible type
    Type(ClassType),
    /// A plain string name
    Name(Cow<'static, str>),
    /// A unique symbolic name
    Symbol(Symbol),
}

impl Token {
    /// Type token for `T`.
    #[inline]
    pub fn of<T: Any + Send + Sync>() -> Self {
        Token::Type(ClassType::of::<T>())
    }

    /// Name token.
    pub fn name(name: impl Into<Cow<'static, str>>) -> Self {
        Token::Name(name.into())
    }

    /// Whether this is a plain identifier (name or symbol) which can never be
    /// constructed from the token itself.
    pub fn is_plain(&self) -> bool {
        matches!(self, Token::Name(_) | Token::Symbol(_))
    }

    /// Whether this token names a type.
    pub fn is_type(&self) -> bool {
        matches!(self, Token::Type(_))
    }

    /// The class behind a type token.
    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            Token::Type(class) => Some(class),
            _ => None,
        }
    }

    /// Human-readable form for errors and logs.
    pub fn display_name(&self) -> &str {
        match self {
            Token::Type(class) => class.name(),
            Token::Name(name) => name,
            Token::Symbol(symbol) => symbol.description(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Symbol(symbol) => write!(f, "Symbol({})", symbol.description()),
            other => f.write_str(other.display_name()),
        }
    }
}

impl From<ClassType> for Token {
    fn from(class: ClassType) -> Self {
        Token::Type(class)
    }
}

impl From<Symbol> for Token {
    fn from(symbol: Symbol) -> Self {
        Token::Symbol(symbol)
    }
}

impl From<&'static str> for Token {
    fn from(name: &'static str) -> Self {
        Token::Name(Cow::Borrowed(name))
    }
}

impl From<String> for Token {
    fn from(name: String) -> Self {
        Token::Name(Cow::Owned(name))
    }
}

impl From<&Token> for Token {
    fn from(token: &Token) -> Self {
        token.clone()
    }
}

type TokenSupplier = Arc<dyn Fn() -> Option<Token> + Send + Sync>;

/// A token, or a supplier evaluated at lookup time.
///
/// The lazy form lets a parameter refer to a type that is not known yet when
/// the override is recorded. A supplier returning `None` produces an
/// [`UndefinedToken`](crate::DiError::UndefinedToken) failure on resolution.
#[derive(Clone)]
pub enum TokenSource {
    /// A token known up front
    Direct(Token),
    /// Evaluated on every lookup
    Lazy(TokenSupplier),
}

impl TokenSource {
    /// Wraps a supplier.
    pub fn lazy<F>(supplier: F) -> Self
    where
        F: Fn() -> Option<Token> + Send + Sync + 'static,
    {
        TokenSource::Lazy(Arc::new(supplier))
    }

    /// Evaluates the source.
    pub fn get(&self) -> Option<Token> {
        match self {
            TokenSource::Direct(token) => Some(token.clone()),
            TokenSource::Lazy(supplier) => supplier(),
        }
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Direct(token) => f.debug_tuple("Direct").field(token).finish(),
            TokenSource::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<Token> for TokenSource {
    fn from(token: Token) -> Self {
        TokenSource::Direct(token)
    }
}

impl From<ClassType> for TokenSource {
    fn from(class: ClassType) -> Self {
        TokenSource::Direct(Token::Type(class))
    }
}

impl From<&'static str> for TokenSource {
    fn from(name: &'static str) -> Self {
        TokenSource::Direct(Token::from(name))
    }
}
