//! Signature grammar tests: valid forms, round-trips, and every parse
//! failure kind.

use sigwalk::{parse_signature, BasicType, CompleteType, SignatureError};

fn err(signature: &str) -> SignatureError {
    parse_signature(signature).expect_err(signature)
}

#[test]
fn empty_signature_is_zero_types() {
    assert_eq!(parse_signature("").expect("parse"), vec![]);
}

#[test]
fn all_basic_codes_parse_as_leaves() {
    let types = parse_signature("ybnqiuxtdhsog").expect("parse");
    let expected = [
        BasicType::Byte,
        BasicType::Boolean,
        BasicType::Int16,
        BasicType::Uint16,
        BasicType::Int32,
        BasicType::Uint32,
        BasicType::Int64,
        BasicType::Uint64,
        BasicType::Double,
        BasicType::UnixFd,
        BasicType::String,
        BasicType::ObjectPath,
        BasicType::Signature,
    ];
    assert_eq!(types.len(), expected.len());
    for (t, bt) in types.iter().zip(expected) {
        assert_eq!(*t, CompleteType::Basic(bt));
    }
}

#[test]
fn variant_is_a_leaf() {
    assert_eq!(parse_signature("v").expect("parse"), vec![CompleteType::Variant]);
}

#[test]
fn containers_nest() {
    let types = parse_signature("a{sa(iv)}").expect("parse");
    assert_eq!(types.len(), 1);
    let CompleteType::Array(elem) = &types[0] else {
        panic!("expected array, got {:?}", types[0]);
    };
    let CompleteType::DictEntry(key, value) = elem.as_ref() else {
        panic!("expected dict entry, got {:?}", elem);
    };
    assert_eq!(**key, CompleteType::Basic(BasicType::String));
    let CompleteType::Array(inner) = value.as_ref() else {
        panic!("expected array value, got {:?}", value);
    };
    assert_eq!(
        **inner,
        CompleteType::Struct(vec![
            CompleteType::Basic(BasicType::Int32),
            CompleteType::Variant,
        ])
    );
}

#[test]
fn trailing_types_start_the_next_item() {
    // A message body is an unparenthesized struct of its top-level types.
    let types = parse_signature("(so)(av)ii").expect("parse");
    assert_eq!(types.len(), 4);
}

#[test]
fn round_trip_reproduces_the_signature() {
    for sig in [
        "",
        "i",
        "ybnqiuxtdhsogv",
        "ai",
        "aai",
        "(so)",
        "(i(i(i)))",
        "a{sv}",
        "a{qa{ss}}",
        "av",
        "(so)(av)ii",
        "a(ua{sv})",
    ] {
        let types = parse_signature(sig).expect(sig);
        let rendered: String = types.iter().map(|t| t.signature()).collect();
        assert_eq!(rendered, sig);
        // Re-parsing the rendered form is idempotent.
        assert_eq!(parse_signature(&rendered).expect(sig), types);
    }
}

#[test]
fn unknown_type_code() {
    assert_eq!(err("z"), SignatureError::UnknownTypeCode { code: b'z', at: 0 });
    assert_eq!(err("iz"), SignatureError::UnknownTypeCode { code: b'z', at: 1 });
    assert_eq!(err("(m)"), SignatureError::UnknownTypeCode { code: b'm', at: 1 });
}

#[test]
fn array_missing_element_type() {
    assert_eq!(err("a"), SignatureError::ArrayMissingElementType { at: 0 });
    assert_eq!(err("ia"), SignatureError::ArrayMissingElementType { at: 1 });
    assert_eq!(err("(a)"), SignatureError::ArrayMissingElementType { at: 1 });
    assert_eq!(err("a{sa}"), SignatureError::ArrayMissingElementType { at: 3 });
}

#[test]
fn empty_struct() {
    assert_eq!(err("()"), SignatureError::EmptyStruct { at: 0 });
    assert_eq!(err("(i())"), SignatureError::EmptyStruct { at: 2 });
}

#[test]
fn unmatched_struct_open() {
    assert_eq!(err("(i"), SignatureError::UnmatchedStructOpen { at: 0 });
    assert_eq!(err("(i(s)"), SignatureError::UnmatchedStructOpen { at: 0 });
}

#[test]
fn unmatched_struct_close() {
    assert_eq!(err(")"), SignatureError::UnmatchedStructClose { at: 0 });
    assert_eq!(err("i)"), SignatureError::UnmatchedStructClose { at: 1 });
}

#[test]
fn dict_entry_outside_array() {
    assert_eq!(err("{sv}"), SignatureError::DictEntryOutsideArray { at: 0 });
    assert_eq!(err("({sv})"), SignatureError::DictEntryOutsideArray { at: 1 });
    // A stray close marker is a dict-entry delimiter with no context.
    assert_eq!(err("}"), SignatureError::DictEntryOutsideArray { at: 0 });
    // Dict entry is only legal as the element type itself, not nested below it.
    assert_eq!(err("a({sv})"), SignatureError::DictEntryOutsideArray { at: 2 });
}

#[test]
fn dict_entry_key_must_be_basic() {
    assert_eq!(err("a{(i)s}"), SignatureError::DictEntryKeyMustBeBasic { at: 2 });
    assert_eq!(err("a{ays}"), SignatureError::DictEntryKeyMustBeBasic { at: 2 });
    assert_eq!(err("a{vs}"), SignatureError::DictEntryKeyMustBeBasic { at: 2 });
}

#[test]
fn dict_entry_wrong_arity() {
    assert_eq!(err("a{}"), SignatureError::DictEntryWrongArity { at: 1 });
    assert_eq!(err("a{s}"), SignatureError::DictEntryWrongArity { at: 1 });
    assert_eq!(err("a{sss}"), SignatureError::DictEntryWrongArity { at: 1 });
}

#[test]
fn unterminated_dict_entry() {
    assert_eq!(err("a{"), SignatureError::UnterminatedContainer { at: 1 });
    assert_eq!(err("a{s"), SignatureError::UnterminatedContainer { at: 1 });
    assert_eq!(err("a{sv"), SignatureError::UnterminatedContainer { at: 1 });
}

#[test]
fn nesting_too_deep() {
    let deep_ok = format!("{}i", "a".repeat(64));
    assert!(parse_signature(&deep_ok).is_ok());

    let too_deep = format!("{}i", "a".repeat(65));
    assert!(matches!(
        parse_signature(&too_deep),
        Err(SignatureError::NestingTooDeep { .. })
    ));

    let struct_bomb = format!("{}i{}", "(".repeat(80), ")".repeat(80));
    assert!(matches!(
        parse_signature(&struct_bomb),
        Err(SignatureError::NestingTooDeep { .. })
    ));
}

#[test]
fn parsing_is_referentially_transparent() {
    for sig in ["a{sv}", "z", "(so)"] {
        assert_eq!(parse_signature(sig), parse_signature(sig));
    }
}
