use super::*;
use pretty_assertions::assert_eq;

fn r(index: u32) -> ValueRef {
    ValueRef::new(index, 0)
}

#[test]
fn tag_matches_variant() {
    assert_eq!(Object::Int(1).tag(), Tag::Int);
    assert_eq!(Object::Double(1.5).tag(), Tag::Double);
    assert_eq!(Object::string(b"hi").tag(), Tag::Str);
    assert_eq!(Object::VectorInt(Vec::new()).tag(), Tag::VectorInt);
    assert_eq!(Object::Label(3).tag(), Tag::Label);
    assert_eq!(Object::Pair { lhs: None, rhs: None }.tag(), Tag::Pair);
    assert_eq!(Object::Tagged { tag: 0, value: None }.tag(), Tag::Tagged);
    assert_eq!(Object::Closure { env: None, label: 0 }.tag(), Tag::Closure);
}

#[test]
fn sizes_include_fixed_header() {
    assert_eq!(Object::Int(0).size(), HEADER_SIZE + 8);
    assert_eq!(Object::Double(0.0).size(), HEADER_SIZE + 8);
    assert_eq!(Object::Label(0).size(), HEADER_SIZE + 8);
    assert_eq!(Object::Pair { lhs: None, rhs: None }.size(), HEADER_SIZE + 16);
    assert_eq!(Object::Closure { env: None, label: 1 }.size(), HEADER_SIZE + 16);
}

#[test]
fn string_size_counts_bytes() {
    assert_eq!(Object::string(b"").size(), HEADER_SIZE + 8);
    assert_eq!(Object::string(b"hello").size(), HEADER_SIZE + 8 + 5);
}

#[test]
fn vector_size_ignores_elements() {
    let empty = Object::VectorInt(Vec::new()).size();
    let full = Object::VectorInt(vec![1, 2, 3, 4]).size();
    assert_eq!(empty, full);
}

#[test]
fn references_in_field_order() {
    let pair = Object::Pair {
        lhs: Some(r(1)),
        rhs: Some(r(2)),
    };
    assert_eq!(pair.references().collect::<Vec<_>>(), vec![r(1), r(2)]);

    let half = Object::Pair {
        lhs: None,
        rhs: Some(r(4)),
    };
    assert_eq!(half.references().collect::<Vec<_>>(), vec![r(4)]);

    let tagged = Object::Tagged {
        tag: 9,
        value: Some(r(5)),
    };
    assert_eq!(tagged.references().collect::<Vec<_>>(), vec![r(5)]);

    let closure = Object::Closure {
        env: Some(r(6)),
        label: 12,
    };
    assert_eq!(closure.references().collect::<Vec<_>>(), vec![r(6)]);
}

#[test]
fn leaves_have_no_references() {
    for object in [
        Object::Int(1),
        Object::Double(2.0),
        Object::string(b"x"),
        Object::VectorInt(vec![1]),
        Object::Label(7),
    ] {
        assert!(!object.tag().has_references());
        assert_eq!(object.references().count(), 0);
    }
}

#[test]
fn typed_accessors() {
    assert_eq!(Object::Int(-4).as_int(), Some(-4));
    assert_eq!(Object::Int(-4).as_double(), None);
    assert_eq!(Object::Double(0.25).as_double(), Some(0.25));
    assert_eq!(Object::Label(8).as_label(), Some(8));
    assert_eq!(Object::string(b"abc").as_str(), Some("abc"));
    assert_eq!(Object::string(&[0xff, 0xfe]).as_str(), None);
    assert_eq!(
        Object::string(&[0xff, 0xfe]).as_str_bytes(),
        Some(&[0xff, 0xfe][..])
    );
    assert_eq!(
        Object::Tagged {
            tag: 3,
            value: Some(r(1))
        }
        .as_tagged(),
        Some((3, Some(r(1))))
    );
    assert_eq!(
        Object::Closure {
            env: None,
            label: 40
        }
        .as_closure(),
        Some((None, 40))
    );
}

#[test]
fn vector_int_grows_in_place() {
    let mut object = Object::VectorInt(Vec::new());
    if let Some(items) = object.as_vector_int_mut() {
        items.extend([1, 2, 3]);
    }
    assert_eq!(object.as_vector_int(), Some(&[1, 2, 3][..]));
    assert!(Object::Int(1).as_vector_int_mut().is_none());
}

#[test]
fn setters_only_apply_to_matching_variant() {
    let mut pair = Object::Pair {
        lhs: None,
        rhs: None,
    };
    assert!(pair.set_lhs(Some(r(1))));
    assert!(pair.set_rhs(Some(r(2))));
    assert_eq!(pair.as_pair(), Some((Some(r(1)), Some(r(2)))));
    assert!(!pair.set_closure_env(None));

    let mut tagged = Object::Tagged { tag: 1, value: None };
    assert!(tagged.set_tagged_value(Some(r(3))));
    assert!(!tagged.set_lhs(None));

    let mut closure = Object::Closure { env: None, label: 2 };
    assert!(closure.set_closure_env(Some(r(4))));
    assert_eq!(closure.as_closure(), Some((Some(r(4)), 2)));

    let mut int = Object::Int(1);
    assert!(!int.set_rhs(None));
    assert!(!int.set_tagged_value(None));
}
