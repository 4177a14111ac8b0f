/// Unit tests for DiError and DiResult types

use cradle_di::{DiError, DiResult};
use std::error::Error;

#[test]
fn test_error_display_unregistered() {
    let error = DiError::Unregistered("database".to_string());
    assert_eq!(error.to_string(), "Cannot resolve unregistered token \"database\"");
}

#[test]
fn test_error_display_undefined_token() {
    let display_str = DiError::UndefinedToken.to_string();
    assert!(display_str.contains("undefined token"));
    assert!(display_str.contains("circular"));
}

#[test]
fn test_error_display_missing_type_info() {
    let error = DiError::MissingTypeInfo("app::Repository");
    let display_str = error.to_string();
    assert!(display_str.contains("app::Repository"));
    assert!(display_str.contains("no type information"));
}

#[test]
fn test_error_display_missing_method_info() {
    let error = DiError::MissingMethodInfo {
        type_name: "app::Handler",
        method: "handle".to_string(),
    };
    assert!(error.to_string().contains("app::Handler.handle"));
}

#[test]
fn test_error_display_parameters() {
    let undeclared = DiError::UndeclaredParameterType {
        target: "Handler.handle".to_string(),
        index: 2,
    };
    assert_eq!(undeclared.to_string(), "Parameter at index 2 of Handler.handle has no declared type");

    let unresolved = DiError::UnresolvedParameter {
        target: "Handler.handle".to_string(),
        name: "path".to_string(),
    };
    assert_eq!(
        unresolved.to_string(),
        "Cannot resolve a value for the \"path\" parameter on Handler.handle"
    );
}

#[test]
fn test_error_display_misc() {
    assert_eq!(
        DiError::TypeMismatch("std::string::String").to_string(),
        "Type mismatch for: std::string::String"
    );
    assert_eq!(DiError::DepthExceeded(128).to_string(), "Max depth 128 exceeded");
    assert_eq!(
        DiError::MissingArgument(1).to_string(),
        "No argument was resolved at position 1"
    );
    assert!(DiError::AmbiguousSingleton("cache".into()).to_string().contains("\"cache\""));
}

#[test]
fn test_error_trait() {
    let error = DiError::UndefinedToken;
    assert!(error.source().is_none());

    let boxed: Box<dyn Error + Send + Sync> = Box::new(DiError::DepthExceeded(3));
    assert_eq!(boxed.to_string(), "Max depth 3 exceeded");
}

#[test]
fn test_error_equality_and_clone() {
    let a = DiError::Unregistered("x".into());
    assert_eq!(a.clone(), a);
    assert_ne!(a, DiError::Unregistered("y".into()));
    assert_ne!(DiError::MissingArgument(0), DiError::MissingArgument(1));
}

#[test]
fn test_di_result_propagation() {
    fn inner() -> DiResult<u8> {
        Err(DiError::MissingArgument(4))
    }

    fn outer() -> DiResult<u8> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert_eq!(outer(), Err(DiError::MissingArgument(4)));
}
