use std::rc::Rc;

use super::*;

#[test]
fn test_intern_same_text_same_name() {
    let mut interner = StringInterner::new();
    let a = interner.intern("position");
    let b = interner.intern("position");
    assert_eq!(a, b);
    assert!(Rc::ptr_eq(interner.storage(a), interner.storage(b)));
}

#[test]
fn test_intern_distinct_text() {
    let mut interner = StringInterner::new();
    let a = interner.intern("u_color");
    let b = interner.intern("u_colour");
    assert_ne!(a, b);
    assert!(!interner.equals_name(a, b));
    assert_eq!(interner.lookup(a), "u_color");
}

#[test]
fn test_empty_is_preinterned() {
    let mut interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.len(), 1);
    assert!(!interner.is_empty());
}

#[test]
fn test_intern_owned_reuses_entry() {
    let mut interner = StringInterner::new();
    let a = interner.intern("vTexCoord");
    let b = interner.intern_owned(String::from("vTexCoord"));
    assert_eq!(a, b);
    assert_eq!(interner.len(), 2);
}

#[test]
fn test_append() {
    let mut interner = StringInterner::new();
    let a = interner.intern("webgl_");
    let b = interner.intern("main");
    let joined = interner.append(a, b);
    assert_eq!(interner.lookup(joined), "webgl_main");
    assert_eq!(interner.get("webgl_main"), Some(joined));
}

#[test]
fn test_equals_text() {
    let mut interner = StringInterner::new();
    let name = interner.intern("gl_FragColor");
    assert!(interner.equals(name, "gl_FragColor"));
    assert!(!interner.equals(name, "gl_FragData"));
}

#[test]
fn test_hash_is_djb_and_cached() {
    let mut interner = StringInterner::new();
    let name = interner.intern("a");
    // 5381 * 33 + 'a'
    assert_eq!(interner.hash(name), 177_670);
    assert_eq!(interner.hash(name), djb_hash("a"));
    assert_eq!(djb_hash(""), 5381);
}

#[test]
fn test_separate_interners_do_not_share_storage() {
    let mut one = StringInterner::new();
    let mut two = StringInterner::new();
    let a = one.intern("shared");
    let b = two.intern("shared");
    assert!(!Rc::ptr_eq(one.storage(a), two.storage(b)));
    assert_eq!(one.hash(a), two.hash(b));
}

#[test]
fn test_debug_shows_entry_count() {
    let mut interner = StringInterner::new();
    interner.intern("uv");
    interner.intern("tint");
    assert_eq!(format!("{interner:?}"), "StringInterner { len: 3, .. }");
}
