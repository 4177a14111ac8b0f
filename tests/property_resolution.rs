/// Property-based tests for resolution
///
/// These tests verify that resolution order, lifecycles and contextual lookup
/// hold for arbitrary registration sequences.

use cradle_di::{Container, Lifecycle, MetadataRegistry, Provider, Resolver, Token};
use proptest::prelude::*;
use std::sync::Arc;

fn container() -> Container {
    Container::with_registry(Arc::new(MetadataRegistry::new()))
}

// Property: the latest ordinary registration wins, and resolve_all keeps registration order
proptest! {
    #[test]
    fn latest_registration_wins(values in prop::collection::vec(any::<u64>(), 1..20)) {
        let container = container();
        for v in &values {
            container.register("n", Provider::value(Arc::new(*v)));
        }

        let single = container.get_token::<u64>("n").unwrap();
        prop_assert_eq!(*single, *values.last().unwrap());

        let all: Vec<u64> = container.get_all_token::<u64>("n").unwrap().iter().map(|v| **v).collect();
        prop_assert_eq!(all, values);
    }
}

// Property: resolve_all over a chain lists the parent's values before the child's
proptest! {
    #[test]
    fn resolve_all_is_ancestor_first(
        parent_values in prop::collection::vec(any::<u32>(), 0..10),
        child_values in prop::collection::vec(any::<u32>(), 0..10),
    ) {
        let parent = container();
        let child = parent.create_child_container();

        for v in &parent_values {
            parent.register("n", Provider::value(Arc::new(*v)));
        }
        for v in &child_values {
            child.register("n", Provider::value(Arc::new(*v)));
        }

        let all: Vec<u32> = child.get_all_token::<u32>("n").unwrap().iter().map(|v| **v).collect();
        let expected: Vec<u32> = parent_values.iter().chain(child_values.iter()).copied().collect();
        prop_assert_eq!(all, expected);
    }
}

// Property: lifecycles control instance identity across repeated resolutions
proptest! {
    #[test]
    fn lifecycle_identity(lifecycle_index in 0usize..3, repeats in 2usize..10) {
        let lifecycle = [Lifecycle::Transient, Lifecycle::Singleton, Lifecycle::ContainerScoped][lifecycle_index];
        let container = container();
        container.register_with("s", Provider::factory(|_| Ok(String::from("x"))), lifecycle);

        let first = container.get_token::<String>("s").unwrap();
        for _ in 1..repeats {
            let next = container.get_token::<String>("s").unwrap();
            prop_assert_eq!(Arc::ptr_eq(&first, &next), lifecycle != Lifecycle::Transient);
        }
    }
}

// Property: a contextual registration is only returned for its own key
proptest! {
    #[test]
    fn contextual_lookup(keys in prop::collection::hash_set("[a-z]{1,8}", 1..8), lookup_key in "[a-z]{1,8}") {
        let container = container();
        container.register("v", Provider::value(Arc::new(String::from("<none>"))));
        for key in &keys {
            container.register("v", Provider::value_in(Arc::new(key.clone()), key.clone()));
        }

        let resolved = container.get_token_in::<String>("v", lookup_key.clone()).unwrap();
        if keys.contains(&lookup_key) {
            prop_assert_eq!(&*resolved, &lookup_key);
        } else {
            prop_assert_eq!(resolved.as_str(), "<none>");
        }

        prop_assert!(container.is_registered(&Token::from("v"), false));
    }
}
