use super::*;
use pretty_assertions::assert_eq;

#[test]
fn tags_start_at_reserved_base() {
    assert_eq!(Tag::Int.raw(), RESERVED_TAG);
    assert_eq!(Tag::Closure.raw(), RESERVED_TAG + 7);
}

#[test]
fn raw_values_are_contiguous() {
    for (offset, tag) in (0u64..).zip(Tag::ALL) {
        assert_eq!(tag.raw(), RESERVED_TAG + offset);
    }
}

#[test]
fn from_raw_accepts_every_tag() {
    for tag in Tag::ALL {
        assert_eq!(Tag::from_raw(tag.raw()), Ok(tag));
        assert_eq!(Tag::try_from(tag.raw()), Ok(tag));
    }
}

#[test]
fn from_raw_rejects_unknown_words() {
    assert_eq!(Tag::from_raw(0), Err(UnknownTag(0)));
    assert_eq!(Tag::from_raw(RESERVED_TAG - 1), Err(UnknownTag(0xfffe)));
    assert_eq!(
        Tag::from_raw(RESERVED_TAG + 8),
        Err(UnknownTag(RESERVED_TAG + 8))
    );
}

#[test]
fn unknown_tag_message() {
    assert_eq!(UnknownTag(0x2a).to_string(), "unknown object tag 0x2a");
}

#[test]
fn only_compound_tags_have_references() {
    assert!(Tag::Pair.has_references());
    assert!(Tag::Tagged.has_references());
    assert!(Tag::Closure.has_references());

    assert!(!Tag::Int.has_references());
    assert!(!Tag::Double.has_references());
    assert!(!Tag::Str.has_references());
    assert!(!Tag::VectorInt.has_references());
    assert!(!Tag::Label.has_references());
}

#[test]
fn display_and_debug() {
    assert_eq!(Tag::VectorInt.to_string(), "vector_int");
    assert_eq!(format!("{:?}", Tag::Pair), "Tag::pair");
}
