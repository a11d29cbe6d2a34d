use auto_dict::{dict, list, map, shared, tuple, Dict, DictError, DictKey, ErrorKind, Map, Value};
use pretty_assertions::assert_eq;

fn test_val() -> Value {
    list![1, 2, 3]
}

fn test_dict() -> Map {
    map! { "a" => map! { "b" => map! { "c" => test_val() } } }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// setting items

#[test]
fn test_set_one_level_item() {
    let mut d = Dict::new();
    d.set("a", test_val()).unwrap();
    assert_eq!(d, map! { "a" => test_val() });
}

#[test]
fn test_set_three_level_items() {
    init_logger();
    let mut d = Dict::new();
    d.child("a").unwrap().child("b").unwrap().set("c", test_val()).unwrap();
    assert_eq!(d, test_dict());
}

#[test]
fn test_set_three_level_properties() {
    let mut d = Dict::new();
    d.set_path("a.b.c", test_val()).unwrap();
    assert_eq!(d, test_dict());
}

#[test]
fn test_absent_chain_is_materialized() {
    let mut d = Dict::new();
    d.get_path("x.y.z").unwrap();
    assert_eq!(d.to_string(), "{'x': {'y': {'z': {}}}}");
}

// construction

#[test]
fn test_init_with_dict() {
    assert_eq!(Dict::from(test_dict()), test_dict());
}

#[test]
fn test_init_with_kws() {
    let d = Dict::from_args(Vec::<Value>::new(), [("a", Value::from(2)), ("b", Value::from(map! { "c" => 3 }))]).unwrap();
    assert_eq!(d, map! { "a" => 2, "b" => map! { "c" => 3 } });
    assert!(matches!(d.get("b"), Some(Value::Dict(_))));
}

#[test]
fn test_init_with_tuples() {
    let d = Dict::from_args([tuple![0, 1], tuple![1, 2], tuple![2, 3]], Vec::<(&str, Value)>::new()).unwrap();
    assert_eq!(d, map! { 0 => 1, 1 => 2, 2 => 3 });
}

#[test]
fn test_init_with_list() {
    let d = Dict::from_args([list![tuple![0, 1], tuple![1, 2], tuple![2, 3]]], Vec::<(&str, Value)>::new()).unwrap();
    assert_eq!(d, map! { 0 => 1, 1 => 2, 2 => 3 });
}

#[test]
fn test_init_with_generator() {
    let d: Dict = (0..3).map(|i| (i as i64, i as i64 + 1)).collect();
    assert_eq!(d, map! { 0 => 1, 1 => 2, 2 => 3 });
}

#[test]
fn test_init_with_tuples_and_empty_list() {
    let d = Dict::from_args([tuple![0, 1], list![], tuple![2, 3]], Vec::<(&str, Value)>::new()).unwrap();
    assert_eq!(d, map! { 0 => 1, 2 => 3 });
}

#[test]
fn test_init_raises() {
    let err = Dict::from_args([Value::Int(5)], Vec::<(&str, Value)>::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    let err = Dict::from_args([Value::str("a")], Vec::<(&str, Value)>::new()).unwrap_err();
    assert_eq!(err, DictError::UnsupportedArg { found: "str".into() });
}

#[test]
fn test_init_with_empty_stuff() {
    let none = Vec::<(&str, Value)>::new;
    assert!(Dict::from_args([Value::from(map! {})], none()).unwrap().is_empty());
    assert!(Dict::from_args([list![]], none()).unwrap().is_empty());
    assert!(Dict::from_args([tuple![]], none()).unwrap().is_empty());
    assert!(Dict::from_args([Value::Nil], none()).unwrap().is_empty());
}

#[test]
fn test_init_with_list_of_dicts() {
    let d = Dict::from(map! { "a" => list![map! { "b" => 2 }] });
    let first = &d.get("a").and_then(Value::as_slice).unwrap()[0];
    assert!(matches!(first, Value::Dict(_)));
    assert_eq!(first.as_dict().and_then(|d| d.get("b")), Some(&Value::Int(2)));
}

#[test]
fn test_macro_matches_constructor() {
    let from_macro = dict! { "a" => map! { "b" => 1 }, 3 => tuple![1, 2] };
    let from_pairs = Dict::from_pairs([(DictKey::from("a"), Value::from(map! { "b" => 1 })), (DictKey::from(3), tuple![1, 2])]);
    assert_eq!(from_macro, from_pairs);
    assert_eq!(dict! {}, Dict::default());
}

// reading

#[test]
fn test_getitem_and_getattr() {
    let mut d = Dict::from(test_dict());
    assert_eq!(
        d.child("a").unwrap().child("b").unwrap().item("c").unwrap(),
        &test_val()
    );
    assert_eq!(d.attr("a").unwrap(), &Value::from(map! { "b" => map! { "c" => test_val() } }));
}

#[test]
fn test_str() {
    let d = Dict::from(test_dict());
    assert_eq!(d.to_string(), "{'a': {'b': {'c': [1, 2, 3]}}}");
    assert_eq!(d.to_string(), Value::from(test_dict()).to_string());
}

#[test]
fn test_repr_html() {
    let mut d = Dict::new();
    d.set_path("a.b.c", test_val()).unwrap();
    assert_eq!(d.repr_html(), "{'a': {'b': {'c': [1, 2, 3]}}}");
}

#[test]
fn test_tuple_key() {
    let mut d = Dict::new();
    d.set((1, 2), 2).unwrap();
    assert_eq!(d, map! { (1, 2) => 2 });
    assert_eq!(d.item((1, 2)).unwrap(), &Value::Int(2));
}

#[test]
fn test_unhashable_key() {
    let err = Dict::from_args([list![tuple![list![1], 2]]], Vec::<(&str, Value)>::new()).unwrap_err();
    assert_eq!(err, DictError::Unhashable { found: "list".into() });
}

// deleting

#[test]
fn test_delitem() {
    let mut d = Dict::from(map! { "a" => 2 });
    d.remove("a").unwrap();
    assert_eq!(d, map! {});
}

#[test]
fn test_delitem_nested() {
    let mut d = Dict::from(test_dict());
    d.child("a").unwrap().child("b").unwrap().remove("c").unwrap();
    assert_eq!(d, map! { "a" => map! { "b" => map! {} } });
}

#[test]
fn test_delattr_nested() {
    let mut d = Dict::from(test_dict());
    d.child("a").unwrap().child("b").unwrap().del_attr("c").unwrap();
    assert_eq!(d, map! { "a" => map! { "b" => map! {} } });
}

#[test]
fn test_delitem_delattr() {
    let mut d = Dict::from(test_dict());
    d.child("a").unwrap().del_attr("b").unwrap();
    assert_eq!(d, map! { "a" => map! {} });
    assert_eq!(d.remove("zzz").unwrap_err().kind(), ErrorKind::MissingKey);
}

// attribute names

#[test]
fn test_set_prop_invalid() {
    let mut d = Dict::new();
    assert_eq!(d.set_attr("keys", 2).unwrap_err().kind(), ErrorKind::AttributeReadOnly);
    assert_eq!(
        d.set_attr("items", 3).unwrap_err().to_string(),
        "'Dict' object attribute 'items' is read-only"
    );
    assert!(d.is_empty());
    d.set("keys", 2).unwrap();
    assert_eq!(d.get("keys"), Some(&Value::Int(2)));
}

#[test]
fn test_dir() {
    let d = Dict::from(map! { "a" => 1, "not ident" => 2, 3 => 4 });
    let names = d.attr_names();
    assert!(names.iter().any(|n| n.as_str() == "a"));
    assert!(!names.iter().any(|n| n.as_str() == "not ident"));
    for reserved in auto_dict::RESERVED_NAMES {
        assert!(names.iter().any(|n| n.as_str() == *reserved), "{}", reserved);
    }
}

#[test]
fn test_dir_with_members() {
    let d = Dict::from(map! { "__members__" => 1 });
    assert!(d.attr_names().iter().any(|n| n.as_str() == "__members__"));
    assert!(d.contains_key("__members__"));
}

// conversion and copies

#[test]
fn test_to_dict() {
    let nested = map! { "a" => list![map! { "a" => 0 }, 2], "b" => map! {}, "c" => 2 };
    let d = Dict::from(nested.clone());
    let regular = d.to_dict();
    assert_eq!(regular, d);
    assert_eq!(regular, nested);
    let first = &regular[&DictKey::from("a")].as_slice().unwrap()[0];
    assert!(matches!(first, Value::Map(_)));
    assert!(matches!(regular[&DictKey::from("b")], Value::Map(_)));
}

#[test]
fn test_to_dict_with_tuple() {
    let nested = map! { "a" => tuple![map! { "a" => 0 }, map! { 2 => 0 }] };
    let d = Dict::from(nested.clone());
    let regular = d.to_dict();
    assert_eq!(regular, nested);
    let Value::Tuple(items) = &regular[&DictKey::from("a")] else {
        panic!("expected tuple");
    };
    assert!(matches!(items[0], Value::Map(_)));
}

#[test]
fn test_update() {
    let mut old = Dict::new();
    old.set_path("child.a", "old a").unwrap();
    old.set_path("child.b", "old b").unwrap();
    old.set("foo", "no dict").unwrap();

    let mut new = Dict::new();
    new.set_path("child.b", "new b").unwrap();
    new.set_path("child.c", "new c").unwrap();
    new.set_path("foo.now_my_papa_is_a_dict", true).unwrap();

    old.update(new).unwrap();

    let reference = map! {
        "foo" => map! { "now_my_papa_is_a_dict" => true },
        "child" => map! { "a" => "old a", "c" => "new c", "b" => "new b" },
    };
    assert_eq!(old, reference);
}

#[test]
fn test_update_with_lists() {
    let mut org = Dict::new();
    org.set("a", list![1, 2, map! { "a" => "superman" }]).unwrap();
    let mut other = Dict::new();
    other.set("b", list![map! { "b" => 123 }]).unwrap();
    org.update(other.clone()).unwrap();
    org.update(other).unwrap();

    let correct = map! {
        "a" => list![1, 2, map! { "a" => "superman" }],
        "b" => list![map! { "b" => 123 }],
    };
    assert_eq!(org, correct);
    let first = &org.get("b").and_then(Value::as_slice).unwrap()[0];
    assert!(matches!(first, Value::Dict(_)));
}

#[test]
fn test_update_merge_is_recursive() {
    let mut a = Dict::from(map! { "x" => map! { "y" => map! { "keep" => 1 } } });
    a.update(map! { "x" => map! { "y" => map! { "add" => 2 } } }).unwrap();
    a.update(map! { "x" => 5 }).unwrap();
    assert_eq!(a, map! { "x" => 5 });
}

#[test]
fn test_copy() {
    let foo = shared(Value::Bool(true));
    let mut a = Dict::new();
    a.set_path("child.immutable", 42).unwrap();
    a.set_path("child.mutable", foo.clone()).unwrap();

    let mut b = a.copy();

    b.set_path("child.immutable", 21).unwrap();
    assert_eq!(a.try_get_path("child.immutable"), Some(&Value::Int(42)));

    if let Some(Value::Shared(cell)) = b.try_get_path("child.mutable") {
        *cell.borrow_mut() = Value::Bool(false);
    }
    assert_eq!(*foo.borrow(), Value::Bool(false));
    assert_eq!(a.try_get_path("child.mutable"), b.try_get_path("child.mutable"));

    b.set("child", "new stuff").unwrap();
    assert!(matches!(a.get("child"), Some(Value::Dict(_))));
}

#[test]
fn test_deepcopy() {
    let foo = shared(Value::Bool(true));
    let mut a = Dict::new();
    a.set_path("child.immutable", 42).unwrap();
    a.set_path("child.mutable", foo.clone()).unwrap();
    a.set_path("alias", foo.clone()).unwrap();

    let mut b = a.deep_copy();

    b.set_path("child.immutable", 21).unwrap();
    assert_eq!(a.try_get_path("child.immutable"), Some(&Value::Int(42)));

    let (Some(Value::Shared(inner)), Some(Value::Shared(alias))) =
        (b.try_get_path("child.mutable"), b.try_get_path("alias"))
    else {
        panic!("expected shared cells");
    };
    assert!(std::rc::Rc::ptr_eq(inner, alias));
    *inner.borrow_mut() = Value::Bool(false);
    assert_eq!(*foo.borrow(), Value::Bool(true));

    b.set("child", "new stuff").unwrap();
    assert!(matches!(a.get("child"), Some(Value::Dict(_))));
}

#[test]
fn test_copy_is_not_frozen() {
    let mut a = Dict::from(test_dict());
    a.freeze();
    let mut b = a.copy();
    let mut c = a.deep_copy();
    assert!(b.item("new").is_ok());
    assert!(c.item("new").is_ok());
    assert!(a.item("new").is_err());
}

// freezing

#[test]
fn test_freeze_and_unfreeze() {
    init_logger();
    let mut d = Dict::from(map! { "inner" => map! { "x" => 1 } });
    d.freeze();

    assert_eq!(d.get_path("inner.y").unwrap_err().kind(), ErrorKind::MissingKey);
    assert_eq!(d.set_path("inner.y", 1).unwrap_err().kind(), ErrorKind::MissingKey);
    assert!(d.set_path("inner.x", 2).is_ok());
    assert_eq!(d.get_or("missing", &Value::Nil), &Value::Nil);
    assert_eq!(d.len(), 1);

    d.unfreeze();
    d.set_path("inner.y", 1).unwrap();
    assert_eq!(d, map! { "inner" => map! { "x" => 2, "y" => 1 } });
}

// arithmetic

#[test]
fn test_add_on_vivified_slot() {
    let mut d = Dict::new();
    d.path(["x", "y"]).add_assign(1).unwrap();
    assert_eq!(d, map! { "x" => map! { "y" => 1 } });
    d.path(["x", "y"]).add_assign(1.5).unwrap();
    assert_eq!(d.try_get_path("x.y"), Some(&Value::Float(2.5)));
}

#[test]
fn test_add_on_populated_dict_fails() {
    let mut d = Dict::new();
    d.set_path("x.y", 1).unwrap();
    let err = d.add_assign("x", 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperand);
    assert_eq!(d, map! { "x" => map! { "y" => 1 } });
}

#[test]
fn test_add_sequences_and_strings() {
    let mut d = dict! { "l" => list![1], "s" => "ab" };
    d.add_assign("l", list![map! { "z" => 1 }]).unwrap();
    d.add_assign("s", "c").unwrap();
    assert_eq!(d.get("s"), Some(&Value::str("abc")));
    let items = d.get("l").and_then(Value::as_slice).unwrap();
    assert!(matches!(items[1], Value::Dict(_)));
}
