/// Unit tests for tokens, contexts, descriptors and argument lists

use cradle_di::{Arguments, ClassType, Context, ContextKey, DiError, ParameterDescriptor, Symbol, Token, TokenSource, Value};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Default)]
struct Alpha;
struct Beta;

#[test]
fn test_type_tokens_compare_by_type_id() {
    assert_eq!(Token::of::<Alpha>(), Token::of::<Alpha>());
    assert_ne!(Token::of::<Alpha>(), Token::of::<Beta>());
    assert_eq!(Token::of::<Alpha>(), Token::from(ClassType::with_default::<Alpha>()));

    let mut set = HashSet::new();
    set.insert(Token::of::<Alpha>());
    set.insert(Token::from(ClassType::with_default::<Alpha>()));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_name_and_symbol_tokens() {
    assert_eq!(Token::from("db"), Token::from(String::from("db")));
    assert_eq!(Token::from("db"), Token::name("db"));
    assert!(Token::from("db").is_plain());
    assert!(!Token::of::<Alpha>().is_plain());

    let a = Symbol::new("db");
    assert_eq!(Token::from(a), Token::from(a));
    assert_ne!(Token::from(a), Token::from(Symbol::new("db")));
    assert_eq!(a.description(), "db");
}

#[test]
fn test_token_display() {
    assert_eq!(Token::from("db").to_string(), "db");
    assert_eq!(Token::from(Symbol::new("key")).to_string(), "Symbol(key)");
    assert!(Token::of::<Alpha>().to_string().ends_with("Alpha"));
    assert!(Token::of::<Alpha>().as_class().is_some());
    assert!(Token::from("db").as_class().is_none());
}

#[test]
fn test_token_source() {
    let direct = TokenSource::from("db");
    assert_eq!(direct.get(), Some(Token::from("db")));

    let lazy = TokenSource::lazy(|| Some(Token::of::<Beta>()));
    assert_eq!(lazy.get(), Some(Token::of::<Beta>()));

    assert_eq!(TokenSource::lazy(|| None).get(), None);
}

#[test]
fn test_context_conversions() {
    assert_eq!(Context::from("a"), Context::Single(ContextKey::from("a")));
    assert_eq!(
        Context::from(["a", "b"]),
        Context::Any(vec![ContextKey::from("a"), ContextKey::from("b")])
    );
    assert_eq!(Context::from(vec!["a"]).keys().count(), 1);
    assert_ne!(ContextKey::from(1i64), ContextKey::from(true));
    assert_eq!(ContextKey::from(Token::from("t")).to_string(), "t");
}

#[test]
fn test_descriptor_defaults() {
    let class = ParameterDescriptor::new(0, "a").of_type::<Alpha>();
    assert!(class.is_known_type() && class.is_class_type() && !class.is_primitive_type());
    assert_eq!(class.declared_type(), Some(&Token::of::<Alpha>()));

    let primitive = ParameterDescriptor::new(1, "n").of_primitive::<u32>().with_default();
    assert!(primitive.is_primitive_type() && primitive.has_default());
    assert_eq!(primitive.index(), 1);
    assert_eq!(primitive.name(), "n");

    let opaque = ParameterDescriptor::new(2, "x").opaque("x");
    assert!(!opaque.is_known_type());
}

#[test]
fn test_arguments_access() {
    let value: Value = Arc::new(3u8);
    let args = Arguments::from(vec![Some(value), None]);

    assert_eq!(args.len(), 2);
    assert_eq!(*args.get::<u8>(0).unwrap(), 3);
    assert_eq!(args.get::<u16>(0).unwrap_err(), DiError::TypeMismatch("u16"));
    assert_eq!(args.get::<u8>(1).unwrap_err(), DiError::MissingArgument(1));
    assert_eq!(args.get::<u8>(7).unwrap_err(), DiError::MissingArgument(7));
    assert!(args.optional::<u8>(1).unwrap().is_none());
    assert_eq!(args.iter().filter(|slot| slot.is_some()).count(), 1);
    assert!(Arguments::default().is_empty());
}
