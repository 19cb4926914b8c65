use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

use wirebox::{reflect, Container, Inject, ResolveErrorKind, ServiceKey};

struct Apple;
reflect!(Apple);

#[test]
fn test_instance_is_returned_unchanged() {
    let container = Container::new();
    container.instance_named(Apple, "apple");

    let by_name_1 = container.get_named::<Apple>("apple").unwrap();
    let by_name_2 = container.get_named::<Apple>("apple").unwrap();
    let by_type = container.get::<Apple>().unwrap();

    assert!(Arc::ptr_eq(&by_name_1, &by_name_2));
    assert!(Arc::ptr_eq(&by_name_2, &by_type));
}

#[test]
fn test_instance_by_type_only() {
    struct Pear;
    reflect!(Pear);

    let container = Container::new();
    container.instance(Pear);

    let first = container.get::<Pear>().unwrap();
    let second = container.get::<Pear>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_singleton_is_built_lazily_and_once() {
    struct Expensive;
    reflect!(Expensive);

    let build_count = Arc::new(AtomicU8::new(0));

    let container = Container::new();
    container.singleton({
        let build_count = build_count.clone();
        move || {
            build_count.fetch_add(1, Ordering::SeqCst);
            Expensive
        }
    });

    assert_eq!(build_count.load(Ordering::SeqCst), 0);

    let first = container.get::<Expensive>().unwrap();
    let second = container.get::<Expensive>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(build_count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_singleton_identical_via_name_and_type() {
    struct See;
    reflect!(See);

    let container = Container::new();
    container.singleton_named(|| See, "see");

    let by_name = container.get_named::<See>("see").unwrap();
    let by_type = container.get::<See>().unwrap();
    assert!(Arc::ptr_eq(&by_name, &by_type));
}

#[test]
fn test_singleton_builder_function() {
    struct Dee;
    reflect!(Dee);

    fn build_dee() -> Dee {
        Dee
    }

    let container = Container::new();
    container.singleton_named(build_dee, "dee");

    let by_name = container.get_named::<Dee>("dee").unwrap();
    let by_type = container.get::<Dee>().unwrap();
    assert!(Arc::ptr_eq(&by_name, &by_type));
}

#[test]
fn test_factory_returns_fresh_instances() {
    struct Jee;
    reflect!(Jee);

    let container = Container::new();
    container.factory_named(|| Jee, "jee");

    let first = container.get::<Jee>().unwrap();
    let second = container.get_named::<Jee>("jee").unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_narrowing_to_registered_grandchild() {
    struct A;
    struct B;
    struct C;
    struct D;
    reflect!(A);
    reflect!(B: A);
    reflect!(C);
    reflect!(D: B, C);

    let container = Container::new();
    container.singleton(|| B);
    container.singleton(|| D);

    // A and C were never registered themselves; both narrow down to D.
    let via_a = container.resolve(ServiceKey::of::<A>()).unwrap();
    let via_c = container.resolve(ServiceKey::of::<C>()).unwrap();
    let leaf = container.get::<D>().unwrap();

    let via_a = via_a.downcast::<D>().unwrap();
    let via_c = via_c.downcast::<D>().unwrap();
    assert!(Arc::ptr_eq(&via_a, &leaf));
    assert!(Arc::ptr_eq(&via_c, &leaf));
}

#[test]
fn test_narrowing_with_only_the_leaf_registered() {
    struct A;
    struct B;
    struct C;
    struct D;
    reflect!(A);
    reflect!(B: A);
    reflect!(C);
    reflect!(D: B, C);

    let container = Container::new();
    container.singleton(|| D);

    let via_a = container.resolve(ServiceKey::of::<A>()).unwrap();
    assert!(via_a.downcast::<D>().is_ok());
}

#[test]
fn test_ambiguous_base_is_rejected() {
    struct A;
    struct B;
    struct C;
    struct D;
    reflect!(A);
    reflect!(B: A);
    reflect!(C: A);
    reflect!(D: B, C);

    let container = Container::new();
    container.singleton(|| B);
    container.singleton(|| D);

    let err = container.resolve(ServiceKey::of::<A>()).unwrap_err();
    match err {
        ResolveErrorKind::Ambiguous { candidates, .. } => assert_eq!(candidates.len(), 2),
        err => panic!("expected ambiguous, got {err}"),
    }

    let message = container.resolve(ServiceKey::of::<A>()).unwrap_err().to_string();
    assert!(message.contains("too many candidates"));
    assert!(message.contains("::B"));
    assert!(message.contains("::C"));
}

#[test]
fn test_typed_get_of_narrowed_ancestor_is_incorrect_type() {
    struct A;
    struct B;
    reflect!(A);
    reflect!(B: A);

    let container = Container::new();
    container.singleton(|| B);

    // Dynamic resolution narrows A to B; the typed accessor cannot lie
    // about the concrete type.
    assert!(matches!(
        container.get::<A>(),
        Err(ResolveErrorKind::IncorrectType { .. })
    ));
    assert!(container.resolve(ServiceKey::of::<A>()).unwrap().downcast::<B>().is_ok());
}

#[test]
fn test_has_mirrors_resolution() {
    struct A;
    struct B;
    struct C;
    struct D;
    reflect!(A);
    reflect!(B: A);
    reflect!(C: A);
    reflect!(D);

    let container = Container::new();
    container.singleton(|| B);
    container.singleton(|| C);

    assert!(container.has(ServiceKey::of::<B>()));
    assert!(container.has(ServiceKey::of::<C>()));
    // Ambiguity and absence both collapse to false, never a failure.
    assert!(!container.has(ServiceKey::of::<A>()));
    assert!(!container.has(ServiceKey::of::<D>()));
    assert!(!container.has("nope"));
}

#[test]
fn test_container_resolves_itself() {
    let container = Container::new();

    let by_alias = container.get_named::<Container>(wirebox::CONTAINER_ALIAS).unwrap();
    assert!(by_alias.ptr_eq(&container));

    let by_type = container.get::<Container>().unwrap();
    assert!(by_type.ptr_eq(&container));

    let outer = container.clone();
    let same = container
        .inject(move |Inject(inner): Inject<Container>| inner.ptr_eq(&outer))
        .unwrap();
    assert!(same);
}

#[test]
fn test_reregistration_last_write_wins() {
    struct Swapped;
    reflect!(Swapped);

    let container = Container::new();
    container.singleton(|| Swapped);
    container.factory(|| Swapped);

    let first = container.get::<Swapped>().unwrap();
    let second = container.get::<Swapped>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_reregistered_singleton_is_rebuilt() {
    struct Setting(u8);
    reflect!(Setting);

    let container = Container::new();
    container.singleton(|| Setting(1));
    assert_eq!(container.get::<Setting>().unwrap().0, 1);

    // Re-registration after a first resolution must not serve the stale
    // cached instance.
    container.singleton(|| Setting(2));
    assert_eq!(container.get::<Setting>().unwrap().0, 2);
}

#[test]
fn test_named_value_never_enters_the_graph() {
    let container = Container::new();
    container.value("timeout", 30u32);

    let first = container.get_named::<u32>("timeout").unwrap();
    let second = container.get_named::<u32>("timeout").unwrap();
    assert_eq!(*first, 30);
    assert!(Arc::ptr_eq(&first, &second));

    assert!(matches!(
        container.get::<u32>(),
        Err(ResolveErrorKind::NotFound(_))
    ));
}

#[test]
fn test_full_type_path_resolves() {
    struct Pathy;
    reflect!(Pathy);

    let container = Container::new();
    container.singleton(|| Pathy);

    let value = container.resolve(std::any::type_name::<Pathy>()).unwrap();
    assert!(value.downcast::<Pathy>().is_ok());
}

#[test]
fn test_failed_dependency_propagates() {
    struct Missing;
    #[derive(Debug)]
    struct Needy;
    reflect!(Needy);

    let container = Container::new();
    container.singleton(|Inject(_missing): Inject<Missing>| Needy);

    let err = container.get::<Needy>().unwrap_err();
    assert!(matches!(err, ResolveErrorKind::Dependencies { .. }));
    assert!(!container.has(ServiceKey::of::<Needy>()));
}
