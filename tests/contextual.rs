use cradle_di::{
    Container, Context, ContextKey, DiError, MetadataRegistry, Provider, Resolver, Symbol, Token,
    DEFAULT_RESOLUTION_CONTEXT,
};
use std::sync::Arc;

#[derive(Debug, PartialEq)]
struct Endpoint(&'static str);

fn container() -> Container {
    let container = Container::with_registry(Arc::new(MetadataRegistry::new()));
    container.register_value(Arc::new(Endpoint("a")));
    container.register_value_in(Arc::new(Endpoint("b")), "b");
    container.register_value_in(Arc::new(Endpoint("c")), "c");
    container
}

fn name(container: &Container, context: Option<Context>) -> &'static str {
    match context {
        Some(context) => container.get_in::<Endpoint>(context).unwrap().0,
        None => container.get::<Endpoint>().unwrap().0,
    }
}

#[test]
fn test_context_selects_registration() {
    let container = container();

    assert_eq!(name(&container, None), "a");
    assert_eq!(name(&container, Some("b".into())), "b");
    assert_eq!(name(&container, Some("c".into())), "c");
}

#[test]
fn test_unknown_context_falls_back_to_ordinary() {
    let container = container();
    assert_eq!(name(&container, Some("z".into())), "a");
}

#[test]
fn test_list_context_takes_first_match() {
    let container = container();

    assert_eq!(name(&container, Some(["z", "c", "b"].into())), "c");
    assert_eq!(name(&container, Some(["b", "c"].into())), "b");
}

#[test]
fn test_later_registration_overwrites_context() {
    let container = container();
    container.register_value_in(Arc::new(Endpoint("b2")), "b");

    assert_eq!(name(&container, Some("b".into())), "b2");
    assert_eq!(name(&container, Some("c".into())), "c");
    assert_eq!(name(&container, None), "a");
}

#[test]
fn test_list_registration_is_reachable_by_each_key() {
    let container = Container::with_registry(Arc::new(MetadataRegistry::new()));
    container.register_value_in(Arc::new(Endpoint("shared")), ["x", "y"]);

    let x = container.get_in::<Endpoint>("x").unwrap();
    let y = container.get_in::<Endpoint>("y").unwrap();
    assert!(Arc::ptr_eq(&x, &y));
}

#[test]
fn test_context_only_registration_counts_as_registered() {
    let container = Container::with_registry(Arc::new(MetadataRegistry::new()));
    container.register(
        "endpoint",
        Provider::value_in(Arc::new(Endpoint("only")), "only"),
    );

    assert!(container.is_registered(&Token::from("endpoint"), false));
    assert_eq!(container.get_token_in::<Endpoint>("endpoint", "only").unwrap().0, "only");
    assert!(matches!(container.resolve("endpoint"), Err(DiError::Unregistered(_))));
}

#[test]
fn test_non_string_context_keys() {
    let container = Container::with_registry(Arc::new(MetadataRegistry::new()));
    let tenant = Symbol::new("tenant");

    container.register_value_in(Arc::new(Endpoint("one")), ContextKey::from(1i64));
    container.register_value_in(Arc::new(Endpoint("yes")), ContextKey::from(true));
    container.register_value_in(Arc::new(Endpoint("tenant")), tenant);

    assert_eq!(container.get_in::<Endpoint>(ContextKey::from(1i64)).unwrap().0, "one");
    assert_eq!(container.get_in::<Endpoint>(ContextKey::from(true)).unwrap().0, "yes");
    assert_eq!(container.get_in::<Endpoint>(tenant).unwrap().0, "tenant");
}

#[test]
fn test_default_resolution_context() {
    let container = container();

    container.set_default_resolution_context("c");
    assert_eq!(name(&container, None), "c");

    // An explicit context still wins
    assert_eq!(name(&container, Some("b".into())), "b");

    container.set_context(DEFAULT_RESOLUTION_CONTEXT, "b");
    assert_eq!(name(&container, None), "b");

    container.set_context(DEFAULT_RESOLUTION_CONTEXT, String::from("c"));
    assert_eq!(name(&container, None), "c");

    container.remove_context(DEFAULT_RESOLUTION_CONTEXT);
    assert_eq!(name(&container, None), "a");
}

#[test]
fn test_raw_default_context_variables() {
    let container = Container::with_registry(Arc::new(MetadataRegistry::new()));
    let symbol = Symbol::new("blue");

    container.set_context(DEFAULT_RESOLUTION_CONTEXT, vec!["x", "y"]);
    assert_eq!(container.default_resolution_context(), Some(Context::from(["x", "y"])));

    container.set_context(DEFAULT_RESOLUTION_CONTEXT, vec![String::from("x")]);
    assert_eq!(container.default_resolution_context(), Some(Context::from(vec!["x"])));

    container.set_context(DEFAULT_RESOLUTION_CONTEXT, 7i64);
    assert_eq!(container.default_resolution_context(), Some(Context::Single(ContextKey::from(7i64))));

    container.set_context(DEFAULT_RESOLUTION_CONTEXT, true);
    assert_eq!(container.default_resolution_context(), Some(Context::Single(ContextKey::from(true))));

    container.set_context(DEFAULT_RESOLUTION_CONTEXT, symbol);
    assert_eq!(container.default_resolution_context(), Some(Context::from(symbol)));

    container.set_context(DEFAULT_RESOLUTION_CONTEXT, Token::from("t"));
    assert_eq!(
        container.default_resolution_context(),
        Some(Context::Single(ContextKey::from(Token::from("t"))))
    );

    // Not a context-like value
    container.set_context(DEFAULT_RESOLUTION_CONTEXT, 1.5f64);
    assert_eq!(container.default_resolution_context(), None);
}

#[test]
fn test_raw_list_default_context_selects_registration() {
    let container = container();
    container.set_context(DEFAULT_RESOLUTION_CONTEXT, vec!["z", "c"]);
    assert_eq!(name(&container, None), "c");
}

#[test]
fn test_resolve_all_appends_contextual_matches() {
    let container = container();

    let plain: Vec<_> = container.get_all::<Endpoint>().unwrap().iter().map(|e| e.0).collect();
    assert_eq!(plain, vec!["a"]);

    let with_context: Vec<_> = container
        .resolve_all_in(Token::of::<Endpoint>(), ["c", "b"])
        .unwrap()
        .into_iter()
        .map(|v| v.downcast::<Endpoint>().unwrap().0)
        .collect();
    assert_eq!(with_context, vec!["a", "c", "b"]);
}

#[test]
fn test_resolve_all_deduplicates_shared_instances() {
    let container = Container::with_registry(Arc::new(MetadataRegistry::new()));
    let shared = Arc::new(Endpoint("shared"));
    container.register_value(shared.clone());
    container.register_value(shared.clone());
    container.register_value_in(shared, ["x", "y"]);

    let all = container.resolve_all_in(Token::of::<Endpoint>(), ["x", "y"]).unwrap();
    assert_eq!(all.len(), 1);
}

#[test]
fn test_context_variables() {
    let container = Container::with_registry(Arc::new(MetadataRegistry::new()));

    assert!(!container.has_context("retries"));
    assert_eq!(*container.get_context_or("retries", 3u32), 3);

    container.set_context("retries", 5u32);
    assert!(container.has_context("retries"));
    assert_eq!(*container.get_context::<u32>("retries").unwrap(), 5);
    assert!(container.get_context::<String>("retries").is_none());

    container.remove_context("retries");
    assert!(container.get_context::<u32>("retries").is_none());
}
