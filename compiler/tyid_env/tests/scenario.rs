//! End-to-end use of an environment the way a checker drives it.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tracing_subscriber::EnvFilter;
use tyid_env::{Environment, SharedEnvironment};
use tyid_types::{BasicKind, Named, Type, TypeName, TypeParam};

fn init_tracing() {
    // Several tests race to install; only the first wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("tyid_env=trace"))
        .with_test_writer()
        .try_init();
}

fn int() -> Type {
    Type::Basic(BasicKind::Int)
}

#[test]
fn register_then_identify() {
    init_tracing();
    let env = Environment::new();
    let list = Named::declare(
        TypeName::qualified("container/list", "List"),
        vec![TypeParam::new("T", 0)],
    );
    let x = Named::instance(&list, vec![int()]);
    let y = Named::instance(&list, vec![int()]);

    let canonical = env.type_for_hash("H1", Some(Arc::clone(&x))).unwrap();
    assert!(Arc::ptr_eq(&canonical, &x));
    let canonical = env.type_for_hash("H1", Some(Arc::clone(&y))).unwrap();
    assert!(Arc::ptr_eq(&canonical, &x));

    assert_eq!(env.id_for(&x), 0);
    assert_eq!(env.id_for(&y), 1);
    assert_eq!(env.id_for(&x), 0);
}

#[test]
fn checker_style_lookup_before_construction() {
    init_tracing();
    let env = SharedEnvironment::new();
    let map = Named::declare(
        TypeName::qualified("collections", "Map"),
        vec![TypeParam::new("K", 0), TypeParam::new("V", 1)],
    );
    let targs = vec![Type::Basic(BasicKind::String), Type::slice(int())];

    // Hash the instantiation before any instance exists.
    let hash = env.type_hash(&Type::named(&map), &targs);
    assert_eq!(hash, "0:collections.Map[string, []int]");
    assert!(env.type_for_hash(&hash, None).is_none());

    // Build a candidate only on a miss, then publish it.
    let candidate = Named::instance(&map, targs.clone());
    let canonical = env.type_for_hash(&hash, Some(Arc::clone(&candidate))).unwrap();
    assert!(Arc::ptr_eq(&canonical, &candidate));

    // Later requests, by either path, return the published instance.
    assert!(Arc::ptr_eq(&env.instance(&map, targs), &candidate));
    assert_eq!(env.canonical_count(), 1);
}

#[test]
fn nested_instances_hash_through_their_arguments() {
    init_tracing();
    let env = Environment::new();
    let list = Named::declare(TypeName::new("List"), vec![TypeParam::new("T", 0)]);

    let inner = env.instance(&list, vec![int()]);
    let outer = env.instance(&list, vec![Type::named(&inner)]);
    let again = env.instance(&list, vec![Type::named(&Named::instance(&list, vec![int()]))]);

    assert!(Arc::ptr_eq(&outer, &again));
    assert_eq!(env.type_hash(&Type::named(&outer), &[]), "0:List[0:List[int]]");
}
