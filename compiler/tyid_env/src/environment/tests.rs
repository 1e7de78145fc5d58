use super::*;
use tyid_types::{BasicKind, TypeName, TypeParam};

fn int() -> Type {
    Type::Basic(BasicKind::Int)
}

fn string() -> Type {
    Type::Basic(BasicKind::String)
}

fn list_decl() -> Arc<Named> {
    Named::declare(
        TypeName::qualified("container/list", "List"),
        vec![TypeParam::new("T", 0)],
    )
}

#[test]
fn end_to_end_scenario() {
    let env = Environment::new();
    let list = list_decl();
    let x = Named::instance(&list, vec![int()]);
    let y = Named::instance(&list, vec![int()]);

    let got = env.type_for_hash("H1", Some(Arc::clone(&x)));
    assert!(got.is_some_and(|got| Arc::ptr_eq(&got, &x)));

    let got = env.type_for_hash("H1", Some(Arc::clone(&y)));
    assert!(got.is_some_and(|got| Arc::ptr_eq(&got, &x)));

    assert_eq!(env.id_for(&x), 0);
    assert_eq!(env.id_for(&y), 1);
    assert_eq!(env.id_for(&x), 0);
}

#[test]
fn lookup_without_candidate_creates_nothing() {
    let env = Environment::new();

    assert!(env.type_for_hash("missing", None).is_none());
    assert_eq!(env.canonical_count(), 0);
    assert!(env.type_for_hash("missing", None).is_none());
}

#[test]
fn lookup_returns_published_instance() {
    let env = Environment::new();
    let x = Named::instance(&list_decl(), vec![int()]);

    env.type_for_hash("H", Some(Arc::clone(&x)));
    let found = env.type_for_hash("H", None);

    assert!(found.is_some_and(|found| Arc::ptr_eq(&found, &x)));
    assert_eq!(env.canonical_count(), 1);
}

#[test]
fn republishing_same_candidate_is_idempotent() {
    let env = Environment::new();
    let x = Named::instance(&list_decl(), vec![int()]);

    for _ in 0..3 {
        let got = env.type_for_hash("H", Some(Arc::clone(&x)));
        assert!(got.is_some_and(|got| Arc::ptr_eq(&got, &x)));
    }
    assert_eq!(env.canonical_count(), 1);
}

#[test]
fn discarded_candidate_is_not_retained() {
    let env = Environment::new();
    let list = list_decl();
    let x = Named::instance(&list, vec![int()]);
    let y = Named::instance(&list, vec![int()]);

    env.type_for_hash("H", Some(Arc::clone(&x)));
    env.type_for_hash("H", Some(Arc::clone(&y)));

    assert_eq!(Arc::strong_count(&y), 1);
}

#[test]
fn ids_are_sequential_from_zero() {
    let env = Environment::new();
    let decls: Vec<_> = (0..5)
        .map(|i| Named::declare(TypeName::new(format!("T{i}")), vec![]))
        .collect();

    for (expected, decl) in decls.iter().enumerate() {
        assert_eq!(env.id_for(decl) as usize, expected);
    }
    for (expected, decl) in decls.iter().enumerate().rev() {
        assert_eq!(env.id_for(decl) as usize, expected);
    }
    assert_eq!(env.id_count(), 5);
}

#[test]
fn identical_but_distinct_references_get_distinct_ids() {
    let env = Environment::new();
    let a = Named::declare(TypeName::new("Celsius"), vec![]);
    let b = Named::declare(TypeName::new("Celsius"), vec![]);

    assert_ne!(env.id_for(&a), env.id_for(&b));
}

#[test]
fn id_overflow_is_reported() {
    let env = Environment::new();
    env.state.lock().next_id = u32::MAX;
    let decl = Named::declare(TypeName::new("Last"), vec![]);

    assert_eq!(
        env.try_id_for(&decl),
        Err(EnvError::IdOverflow {
            assigned: u64::from(u32::MAX)
        })
    );
    assert_eq!(env.id_count(), 0);
}

#[test]
#[should_panic(expected = "exhausted its id space")]
fn id_for_panics_on_overflow() {
    let env = Environment::new();
    env.state.lock().next_id = u32::MAX;
    env.id_for(&Named::declare(TypeName::new("Last"), vec![]));
}

#[test]
fn environments_are_isolated() {
    let first = Environment::new();
    let second = Environment::new();
    let a = Named::declare(TypeName::new("A"), vec![]);
    let b = Named::declare(TypeName::new("B"), vec![]);
    let x = Named::instance(&list_decl(), vec![int()]);

    assert_eq!(first.id_for(&a), 0);
    assert_eq!(second.id_for(&b), 0);
    assert_eq!(second.id_for(&a), 1);

    first.type_for_hash("H", Some(x));
    assert!(second.type_for_hash("H", None).is_none());
}

#[test]
fn substituted_hash_matches_instance_hash() {
    let env = Environment::new();
    let list = list_decl();
    let inst = Named::instance(&list, vec![string()]);

    let hypothetical = env.type_hash(&Type::named(&list), &[string()]);
    let built = env.type_hash(&Type::named(&inst), &[]);

    assert_eq!(hypothetical, built);
}

#[test]
fn substituted_hash_ignores_existing_arguments() {
    let env = Environment::new();
    let list = list_decl();
    let of_int = Named::instance(&list, vec![int()]);
    let of_string = Named::instance(&list, vec![string()]);

    let resubstituted = env.type_hash(&Type::named(&of_int), &[string()]);

    assert_eq!(resubstituted, env.type_hash(&Type::named(&of_string), &[]));
}

#[test]
#[should_panic(expected = "type arguments supplied for a type that is not named")]
fn arguments_for_unnamed_type_panic() {
    let env = Environment::new();
    env.type_hash(&Type::slice(int()), &[int()]);
}

#[test]
fn instance_is_canonical() {
    let env = Environment::new();
    let list = list_decl();

    let a = env.instance(&list, vec![int()]);
    let b = env.instance(&list, vec![int()]);
    let c = env.instance(&list, vec![string()]);

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert!(Arc::ptr_eq(a.origin(), &list));
    assert_eq!(env.canonical_count(), 2);
}

#[test]
fn instance_through_another_instance_uses_declaration() {
    let env = Environment::new();
    let list = list_decl();
    let of_int = env.instance(&list, vec![int()]);

    let again = env.instance(&of_int, vec![int()]);

    assert!(Arc::ptr_eq(&again, &of_int));
}

#[test]
fn instance_agrees_with_manual_publish() {
    let env = Environment::new();
    let list = list_decl();
    let manual = Named::instance(&list, vec![int()]);
    let hash = env.type_hash(&Type::named(&list), &[int()]);
    env.type_for_hash(&hash, Some(Arc::clone(&manual)));

    let via_instance = env.instance(&list, vec![int()]);

    assert!(Arc::ptr_eq(&via_instance, &manual));
}

#[test]
#[should_panic(expected = "wrong number of type arguments")]
fn instance_arity_mismatch_panics() {
    let env = Environment::new();
    env.instance(&list_decl(), vec![int(), string()]);
}

#[test]
#[should_panic(expected = "requires type arguments")]
fn instance_without_arguments_panics() {
    let env = Environment::new();
    env.instance(&list_decl(), vec![]);
}

#[test]
fn debug_shows_counts() {
    let env = Environment::with_capacity(16);
    env.id_for(&list_decl());
    assert_eq!(format!("{env:?}"), "Environment { canonical: 0, ids: 1 }");
}

#[test]
fn shared_environment_clones_share_state() {
    let shared = SharedEnvironment::new();
    let clone = shared.clone();
    let decl = list_decl();

    assert_eq!(shared.id_for(&decl), 0);
    assert_eq!(clone.id_for(&decl), 0);
    assert_eq!(clone.id_count(), 1);
}
