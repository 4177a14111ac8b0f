use cradle_di::{
    Annotate, Container, DiError, Lifecycle, MetadataRegistry, ParameterDescriptor, Provider, Resolver, Token,
    MAX_RESOLUTION_DEPTH,
};
use std::sync::Arc;

struct Chicken {
    _egg: Arc<Egg>,
}

struct Egg {
    _chicken: Arc<Chicken>,
}

#[test]
fn test_constructor_cycle_hits_depth_limit() {
    let registry = Arc::new(MetadataRegistry::new());
    Annotate::<Chicken>::on(&registry).initializer(
        vec![ParameterDescriptor::new(0, "egg").of_type::<Egg>()],
        |args| Ok(Chicken { _egg: args.get(0)? }),
    );
    Annotate::<Egg>::on(&registry).initializer(
        vec![ParameterDescriptor::new(0, "chicken").of_type::<Chicken>()],
        |args| Ok(Egg { _chicken: args.get(0)? }),
    );

    let container = Container::with_registry(registry);
    let err = container.get::<Chicken>().err().unwrap();
    assert_eq!(err, DiError::DepthExceeded(MAX_RESOLUTION_DEPTH));

    // The counter unwinds, so unrelated resolutions still work
    container.register_value(Arc::new(5u8));
    assert_eq!(*container.get::<u8>().unwrap(), 5);
}

#[test]
fn test_alias_cycle_hits_depth_limit() {
    let container = Container::with_registry(Arc::new(MetadataRegistry::new()));
    container
        .register("ping", Provider::token("pong"))
        .register("pong", Provider::token("ping"));

    assert_eq!(
        container.resolve("ping").err(),
        Some(DiError::DepthExceeded(MAX_RESOLUTION_DEPTH))
    );
}

#[test]
fn test_self_alias_does_not_loop() {
    #[derive(Default)]
    struct Solo;

    let registry = Arc::new(MetadataRegistry::new());
    Annotate::<Solo>::on(&registry).defaulted();
    let container = Container::with_registry(registry);

    container.register_with(Token::of::<Solo>(), Provider::token(Token::of::<Solo>()), Lifecycle::Singleton);

    let a = container.get::<Solo>().unwrap();
    assert!(Arc::ptr_eq(&a, &container.get::<Solo>().unwrap()));
}

#[test]
fn test_factory_recursion_is_bounded() {
    let container = Container::with_registry(Arc::new(MetadataRegistry::new()));
    container.register(
        "recursive",
        Provider::factory_value(|c: &Container| c.resolve("recursive")),
    );

    assert!(matches!(container.resolve("recursive"), Err(DiError::DepthExceeded(_))));
}

