//! Resolved argument lists handed to initializers and method invokers.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::registration::Value;

/// Resolved arguments, one slot per declared parameter.
///
/// A slot is empty when the parameter was left to its default value.
///
/// # Examples
///
/// ```rust
/// use cradle_di::{Arguments, Value};
/// use std::sync::Arc;
///
/// let port: Value = Arc::new(8080u16);
/// let args = Arguments::from(vec![Some(port), None]);
///
/// assert_eq!(*args.get::<u16>(0).unwrap(), 8080);
/// assert_eq!(args.optional::<String>(1).unwrap(), None);
/// assert_eq!(*args.optional::<u16>(1).unwrap().unwrap_or_else(|| Arc::new(80)), 80);
/// ```
#[derive(Clone, Default)]
pub struct Arguments {
    slots: Vec<Option<Value>>,
}

impl Arguments {
    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Raw slot at `index`.
    pub fn raw(&self, index: usize) -> Option<&Value> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Required argument of type `T`.
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<T>> {
        self.optional(index)?.ok_or(DiError::MissingArgument(index))
    }

    /// Argument of type `T`, or `None` when the slot was left to its default.
    pub fn optional<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Option<Arc<T>>> {
        match self.raw(index) {
            Some(value) => value
                .clone()
                .downcast::<T>()
                .map(Some)
                .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>())),
            None => Ok(None),
        }
    }

    /// Consumes the list into its slots.
    pub fn into_inner(self) -> Vec<Option<Value>> {
        self.slots
    }

    /// Iterates the slots.
    pub fn iter(&self) -> std::slice::Iter<'_, Option<Value>> {
        self.slots.iter()
    }
}

impl From<Vec<Option<Value>>> for Arguments {
    fn from(slots: Vec<Option<Value>>) -> Self {
        Self { slots }
    }
}

impl std::fmt::Debug for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|s| if s.is_some() { "Some(..)" } else { "None" }))
            .finish()
    }
}
