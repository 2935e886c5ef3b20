use ironstone_nbt::snbt::{self, SnbtError};
use ironstone_nbt::{DepthLimit, NbtCompound, NbtList, NbtTag, TagId};


#[test]
fn numeric_suffixes_select_variants() {
    let compound = snbt::parse_compound("{a:1b,b:2s,c:3,d:4L,e:5.0f,f:6.0}").unwrap();

    assert!(compound.get_tag("a").unwrap().strict_eq(&NbtTag::Byte(1)));
    assert!(compound.get_tag("b").unwrap().strict_eq(&NbtTag::Short(2)));
    assert!(compound.get_tag("c").unwrap().strict_eq(&NbtTag::Int(3)));
    assert!(compound.get_tag("d").unwrap().strict_eq(&NbtTag::Long(4)));
    assert!(compound.get_tag("e").unwrap().strict_eq(&NbtTag::Float(5.0)));
    assert!(compound.get_tag("f").unwrap().strict_eq(&NbtTag::Double(6.0)));
}

#[test]
fn numeric_edge_forms() {
    assert!(NbtTag::from_snbt("-128b").unwrap().strict_eq(&NbtTag::Byte(-128)));
    assert!(NbtTag::from_snbt("+5").unwrap().strict_eq(&NbtTag::Int(5)));
    assert!(NbtTag::from_snbt("2147483647").unwrap().strict_eq(&NbtTag::Int(i32::MAX)));
    assert!(NbtTag::from_snbt("-2147483648").unwrap().strict_eq(&NbtTag::Int(i32::MIN)));
    assert!(NbtTag::from_snbt("5.").unwrap().strict_eq(&NbtTag::Double(5.0)));
    assert!(NbtTag::from_snbt(".5").unwrap().strict_eq(&NbtTag::Double(0.5)));
    assert!(NbtTag::from_snbt("1e3").unwrap().strict_eq(&NbtTag::Double(1000.0)));
    assert!(NbtTag::from_snbt("1.5E-1").unwrap().strict_eq(&NbtTag::Double(0.15)));
    assert!(NbtTag::from_snbt("3s").unwrap().strict_eq(&NbtTag::Short(3)));
    assert!(NbtTag::from_snbt("3D").unwrap().strict_eq(&NbtTag::Double(3.0)));
}

#[test]
fn words_that_are_not_numbers_are_strings() {
    // Out of range for an Int with no suffix, so not a number at all
    let tag = NbtTag::from_snbt("3000000000").unwrap();
    assert!(tag.strict_eq(&NbtTag::String("3000000000".to_owned())));

    // Out of range for the suffixed width
    let tag = NbtTag::from_snbt("300b").unwrap();
    assert!(tag.strict_eq(&NbtTag::String("300b".to_owned())));

    for word in ["1.2.3", "12abc", "-", "+", "5e", "bare_word-1.0+x"] {
        let tag = NbtTag::from_snbt(word).unwrap();
        assert!(
            tag.strict_eq(&NbtTag::String(word.to_owned())),
            "{word:?} should parse as a string",
        );
    }
}

#[test]
fn booleans_and_non_finite_words() {
    assert!(NbtTag::from_snbt("true").unwrap().strict_eq(&NbtTag::Byte(1)));
    assert!(NbtTag::from_snbt("false").unwrap().strict_eq(&NbtTag::Byte(0)));
    assert!(NbtTag::from_snbt("Infinityf")
        .unwrap()
        .strict_eq(&NbtTag::Float(f32::INFINITY)));
    assert!(NbtTag::from_snbt("-Infinityd")
        .unwrap()
        .strict_eq(&NbtTag::Double(f64::NEG_INFINITY)));
    assert!(NbtTag::from_snbt("NaNf")
        .unwrap()
        .strict_eq(&NbtTag::Float(f32::NAN)));

    // In key position these words are plain strings
    let compound = snbt::parse_compound("{true:1,NaNd:2}").unwrap();
    assert!(compound.contains_key("true"));
    assert!(compound.contains_key("NaNd"));
}

#[test]
fn strings_quotes_and_escapes() {
    assert!(NbtTag::from_snbt("Herobrine")
        .unwrap()
        .strict_eq(&NbtTag::String("Herobrine".to_owned())));
    assert!(NbtTag::from_snbt("\"with space\"")
        .unwrap()
        .strict_eq(&NbtTag::String("with space".to_owned())));
    assert!(NbtTag::from_snbt("'single \" double'")
        .unwrap()
        .strict_eq(&NbtTag::String("single \" double".to_owned())));
    assert!(NbtTag::from_snbt(r#""a\"b\\c\'d""#)
        .unwrap()
        .strict_eq(&NbtTag::String(r#"a"b\c'd"#.to_owned())));

    // The quoted empty string is a value; the empty input is not
    assert!(NbtTag::from_snbt("\"\"")
        .unwrap()
        .strict_eq(&NbtTag::String(String::new())));
    assert!(NbtTag::from_snbt("").is_err());

    assert!(matches!(
        NbtTag::from_snbt(r#""a\nb""#),
        Err(SnbtError::UnknownEscape { .. }),
    ));
    assert!(matches!(
        NbtTag::from_snbt("\"unterminated"),
        Err(SnbtError::UnmatchedQuote { .. }),
    ));
}

#[test]
fn compound_grammar() {
    let compound = snbt::parse_compound(
        "{ bare-word.key : 1 , \"quoted key\" : two , nested : { x : [] } , }",
    )
    .unwrap();

    assert_eq!(compound.len(), 3);
    assert!(compound.get_tag("bare-word.key").unwrap().strict_eq(&NbtTag::Int(1)));
    assert!(compound
        .get_tag("quoted key")
        .unwrap()
        .strict_eq(&NbtTag::String("two".to_owned())));
    let nested: &NbtCompound = compound.get("nested").unwrap();
    let list: &NbtList = nested.get("x").unwrap();
    assert!(list.is_empty());

    // Numeric-looking keys are still keys
    let compound = snbt::parse_compound("{1:2}").unwrap();
    assert!(compound.get_tag("1").unwrap().strict_eq(&NbtTag::Int(2)));

    assert!(matches!(
        snbt::parse_compound("{a:1,a:2}"),
        Err(SnbtError::DuplicateKey { .. }),
    ));
    assert!(matches!(
        snbt::parse_compound("{a:1"),
        Err(SnbtError::UnmatchedBrace { .. }),
    ));
    assert!(snbt::parse_compound("{a}").is_err());
    assert!(snbt::parse_compound("{,a:1}").is_err());
}

#[test]
fn list_grammar() {
    let tag = NbtTag::from_snbt("[1, 2, 3]").unwrap();
    let NbtTag::List(list) = &tag else {
        panic!("expected a list");
    };
    assert_eq!(list.element_id(), TagId::Int);
    assert_eq!(list.len(), 3);

    // Trailing commas are accepted in lists and compounds
    assert!(NbtTag::from_snbt("[1, 2,]").is_ok());
    assert!(NbtTag::from_snbt("{a:1,}").is_ok());

    // The first element locks the element variant
    assert!(matches!(
        NbtTag::from_snbt("[1, 2b]"),
        Err(SnbtError::NonHomogeneousList { .. }),
    ));
    assert!(matches!(
        NbtTag::from_snbt("[{}, []]"),
        Err(SnbtError::NonHomogeneousList { .. }),
    ));

    // Nested lists are fine, including mixed element types one level down
    let tag = NbtTag::from_snbt("[[1, 2], [three], []]").unwrap();
    let NbtTag::List(list) = &tag else {
        panic!("expected a list");
    };
    assert_eq!(list.element_id(), TagId::List);
    assert_eq!(list.len(), 3);

    assert!(NbtTag::from_snbt("[,]").is_err());
    assert!(NbtTag::from_snbt("[1 2]").is_err());
}

#[test]
fn typed_array_grammar() {
    assert!(NbtTag::from_snbt("[B; 1, 2, 3]")
        .unwrap()
        .strict_eq(&NbtTag::ByteArray(vec![1, 2, 3])));
    assert!(NbtTag::from_snbt("[B;1b,2b]")
        .unwrap()
        .strict_eq(&NbtTag::ByteArray(vec![1, 2])));
    assert!(NbtTag::from_snbt("[I;]")
        .unwrap()
        .strict_eq(&NbtTag::IntArray(vec![])));
    assert!(NbtTag::from_snbt("[l; 9223372036854775807]")
        .unwrap()
        .strict_eq(&NbtTag::LongArray(vec![i64::MAX])));

    // Elements must be integers that fit the element width
    assert!(matches!(
        NbtTag::from_snbt("[B; 300]"),
        Err(SnbtError::InvalidArrayElement { .. }),
    ));
    assert!(matches!(
        NbtTag::from_snbt("[I; 1.5]"),
        Err(SnbtError::InvalidArrayElement { .. }),
    ));
    assert!(matches!(
        NbtTag::from_snbt("[L; foo]"),
        Err(SnbtError::InvalidArrayElement { .. }),
    ));

    // Typed arrays accept no trailing comma
    assert!(matches!(
        NbtTag::from_snbt("[B; 1, 2,]"),
        Err(SnbtError::TrailingComma { .. }),
    ));

    // An unknown specifier is not an array header
    assert!(NbtTag::from_snbt("[X; 1]").is_err());
}

#[test]
fn whole_input_must_be_consumed() {
    assert!(NbtTag::from_snbt("  42  ").unwrap().strict_eq(&NbtTag::Int(42)));
    assert!(NbtTag::from_snbt("42 junk").is_err());
    assert!(snbt::parse_compound("{} {}").is_err());
}

#[test]
fn compact_printing() {
    let mut compound = NbtCompound::new();
    compound.insert("name", "Herobrine");
    compound.insert("health", NbtTag::Byte(20));
    assert_eq!(
        NbtTag::Compound(compound).to_snbt(),
        r#"{name:"Herobrine",health:20b}"#,
    );

    let mut compound = NbtCompound::new();
    compound.insert("key with space", 1_i16);
    compound.insert("", 2_i64);
    assert_eq!(
        NbtTag::Compound(compound).to_snbt(),
        r#"{"key with space":1s,"":2l}"#,
    );

    assert_eq!(NbtTag::List(NbtList::from(vec![1_i32, 2, 3])).to_snbt(), "[1,2,3]");
    assert_eq!(NbtTag::ByteArray(vec![1, 2, 3]).to_snbt(), "[B;1,2,3]");
    assert_eq!(NbtTag::IntArray(vec![]).to_snbt(), "[I;]");
    assert_eq!(NbtTag::LongArray(vec![-5]).to_snbt(), "[L;-5]");
    assert_eq!(NbtTag::String("a\"b\\c".to_owned()).to_snbt(), r#""a\"b\\c""#);
    assert_eq!(NbtTag::Compound(NbtCompound::new()).to_snbt(), "{}");
    assert_eq!(NbtTag::List(NbtList::new()).to_snbt(), "[]");
}

#[test]
fn numeric_printing_is_reparsable() {
    assert_eq!(NbtTag::Byte(-128).to_snbt(), "-128b");
    assert_eq!(NbtTag::Short(3).to_snbt(), "3s");
    assert_eq!(NbtTag::Int(42).to_snbt(), "42");
    assert_eq!(NbtTag::Long(42).to_snbt(), "42l");
    assert_eq!(NbtTag::Float(5.0).to_snbt(), "5f");
    assert_eq!(NbtTag::Float(0.25).to_snbt(), "0.25f");

    // A double without a fractional part takes the `d` suffix so it does not
    // reparse as an Int
    assert_eq!(NbtTag::Double(6.0).to_snbt(), "6d");
    assert_eq!(NbtTag::Double(6.5).to_snbt(), "6.5");

    assert_eq!(NbtTag::Float(f32::INFINITY).to_snbt(), "Infinityf");
    assert_eq!(NbtTag::Double(f64::NEG_INFINITY).to_snbt(), "-Infinityd");
    assert_eq!(NbtTag::Double(f64::NAN).to_snbt(), "NaNd");
}

#[test]
fn pretty_printing() {
    let mut compound = NbtCompound::new();
    compound.insert("a", 1_i32);
    compound.insert("b", NbtList::from(vec![1_i32, 2]));
    compound.insert("arr", NbtTag::ByteArray(vec![1, 2]));
    let tag = NbtTag::Compound(compound);

    let expected = "{\n    a: 1,\n    b: [\n        1,\n        2\n    ],\n    arr: [B; 1, 2]\n}";
    assert_eq!(tag.to_pretty_snbt(), expected);

    let expected_two_space = "{\n  a: 1,\n  b: [\n    1,\n    2\n  ],\n  arr: [B; 1, 2]\n}";
    assert_eq!(tag.to_snbt_indented_by(2), expected_two_space);
    assert_eq!(tag.to_snbt_indented("  "), expected_two_space);

    let expected_tab = "{\n\ta: 1,\n\tb: [\n\t\t1,\n\t\t2\n\t],\n\tarr: [B; 1, 2]\n}";
    assert_eq!(tag.to_snbt_indented("\t"), expected_tab);

    // Empty containers stay on one line in the indented form
    assert_eq!(NbtTag::Compound(NbtCompound::new()).to_pretty_snbt(), "{}");
    assert_eq!(NbtTag::List(NbtList::new()).to_pretty_snbt(), "[]");
}

#[test]
fn snbt_round_trips_strictly() {
    let mut inner = NbtCompound::new();
    inner.insert("x", NbtTag::Double(-0.5));
    inner.insert("weird key!", "value");

    let mut compound = NbtCompound::new();
    compound.insert("byte", NbtTag::Byte(-1));
    compound.insert("short", NbtTag::Short(i16::MIN));
    compound.insert("int", NbtTag::Int(i32::MAX));
    compound.insert("long", NbtTag::Long(i64::MIN));
    compound.insert("float", NbtTag::Float(0.5));
    compound.insert("whole_float", NbtTag::Float(2.0));
    compound.insert("double", NbtTag::Double(1.0e10));
    compound.insert("whole_double", NbtTag::Double(3.0));
    compound.insert("nan", NbtTag::Float(f32::NAN));
    compound.insert("string", "multi \"quoted\" \\ and 'single'");
    compound.insert("unicode", "\u{C5}\u{C4}\u{D6} \u{1F642}");
    compound.insert("bytes", NbtTag::ByteArray(vec![i8::MIN, 0, i8::MAX]));
    compound.insert("ints", NbtTag::IntArray(vec![i32::MIN, i32::MAX]));
    compound.insert("longs", NbtTag::LongArray(vec![i64::MIN, i64::MAX]));
    compound.insert("list", NbtList::from(vec!["a", "b", "true", "3"]));
    compound.insert("empty_list", NbtList::new());
    compound.insert("nested", inner);

    let tag = NbtTag::Compound(compound);

    let reparsed = NbtTag::from_snbt(&tag.to_snbt()).unwrap();
    assert!(tag.strict_eq(&reparsed), "compact form failed to round-trip");

    let reparsed = NbtTag::from_snbt(&tag.to_pretty_snbt()).unwrap();
    assert!(tag.strict_eq(&reparsed), "pretty form failed to round-trip");

    let reparsed = NbtTag::from_snbt(&tag.to_snbt_indented("\t")).unwrap();
    assert!(tag.strict_eq(&reparsed), "tab-indented form failed to round-trip");
}

#[test]
fn depth_limit_bounds_parsing() {
    let deep = "[".repeat(600) + &"]".repeat(600);
    assert!(matches!(
        snbt::parse_any(&deep),
        Err(SnbtError::ExceededDepthLimit { .. }),
    ));

    let shallow = "[".repeat(16) + &"]".repeat(16);
    assert!(snbt::parse_any_with_limit(&shallow, DepthLimit(16)).is_ok());
    assert!(matches!(
        snbt::parse_any_with_limit(&shallow, DepthLimit(15)),
        Err(SnbtError::ExceededDepthLimit { .. }),
    ));
}
