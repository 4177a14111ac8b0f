//! Parameter descriptors for initializers and methods.

use std::any::Any;
use std::borrow::Cow;

use crate::token::{ClassType, Token};

/// Describes one parameter of an initializer or method
///
/// Descriptors stand in for reflected type information: they record the position,
/// the name, the declared type (if any) and a few facts about that type which
/// drive the resolution rules.
///
/// # Use Cases
///
/// - **Construction**: parameters with a default and no injectable type are skipped
/// - **Dispatch**: names and positions allow caller-supplied overrides
///
/// # Examples
///
/// ```rust
/// use cradle_di::ParameterDescriptor;
///
/// struct Database;
///
/// let db = ParameterDescriptor::new(0, "db").of_type::<Database>();
/// let retries = ParameterDescriptor::new(1, "retries").of_primitive::<u32>().with_default();
/// let untyped = ParameterDescriptor::new(2, "extra");
///
/// assert!(db.is_class_type());
/// assert!(retries.is_primitive_type() && retries.has_default());
/// assert!(untyped.declared_type().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    index: usize,
    name: Cow<'static, str>,
    ty: Option<Token>,
    has_default: bool,
    is_known_type: bool,
    is_class_type: bool,
    is_primitive_type: bool,
}

impl ParameterDescriptor {
    /// Untyped parameter at `index`.
    pub fn new(index: usize, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            index,
            name: name.into(),
            ty: None,
            has_default: false,
            is_known_type: false,
            is_class_type: false,
            is_primitive_type: false,
        }
    }

    /// Declares an injectable class type.
    pub fn of_type<T: Any + Send + Sync>(self) -> Self {
        self.of_class(ClassType::of::<T>())
    }

    /// Declares an injectable class type from an existing `ClassType`.
    pub fn of_class(mut self, class: ClassType) -> Self {
        self.ty = Some(Token::Type(class));
        self.is_known_type = true;
        self.is_class_type = true;
        self.is_primitive_type = false;
        self
    }

    /// Declares a primitive type such as a number or a string.
    pub fn of_primitive<T: Any + Send + Sync>(mut self) -> Self {
        self.ty = Some(Token::of::<T>());
        self.is_known_type = true;
        self.is_class_type = false;
        self.is_primitive_type = true;
        self
    }

    /// Declares a type the resolver cannot reason about, like an erased `dyn Any`.
    pub fn opaque(mut self, token: impl Into<Token>) -> Self {
        self.ty = Some(token.into());
        self.is_known_type = false;
        self.is_class_type = false;
        self.is_primitive_type = false;
        self
    }

    /// Marks the parameter as having a default value.
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Position, zero based.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type, if any.
    pub fn declared_type(&self) -> Option<&Token> {
        self.ty.as_ref()
    }

    /// Whether the parameter has a default value.
    pub fn has_default(&self) -> bool {
        self.has_default
    }

    /// Whether the declared type is one the resolver understands.
    pub fn is_known_type(&self) -> bool {
        self.is_known_type
    }

    /// Whether the declared type is class-like.
    pub fn is_class_type(&self) -> bool {
        self.is_class_type
    }

    /// Whether the declared type is primitive.
    pub fn is_primitive_type(&self) -> bool {
        self.is_primitive_type
    }

    /// Whether construction should leave this parameter to its own default
    /// rather than resolving it.
    pub(crate) fn defers_to_default(&self) -> bool {
        self.has_default && (!self.is_known_type || !self.is_class_type || self.is_primitive_type)
    }
}
