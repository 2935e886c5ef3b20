use std::collections::HashSet;

use ironstone_nbt::{
    NbtCompound, NbtList, NbtStructureError, NbtTag, ScalarKey, TagId,
};


#[test]
fn permissive_equality_crosses_variants() {
    assert_eq!(NbtTag::Byte(5), NbtTag::Int(5));
    assert_eq!(NbtTag::Short(-3), NbtTag::Long(-3));
    assert_eq!(NbtTag::Float(1.0), NbtTag::Double(1.0));
    assert_eq!(NbtTag::Int(2), NbtTag::Double(2.0));

    assert_ne!(NbtTag::Byte(5), NbtTag::Int(6));
    assert_ne!(NbtTag::Int(1), NbtTag::String("1".to_owned()));
}

#[test]
fn equality_against_primitives() {
    assert_eq!(NbtTag::Byte(5), 5);
    assert_eq!(5, NbtTag::Byte(5));
    assert_eq!(NbtTag::Long(-9), -9_i64);
    assert_eq!(NbtTag::Float(0.5), 0.5_f64);
    assert_eq!(NbtTag::Double(2.0), 2_i32);
    assert_eq!(NbtTag::String("test".to_owned()), "test");
    assert_ne!(NbtTag::String("test".to_owned()), "other");
}

#[test]
fn strict_equality_demands_matching_variants() {
    assert!(NbtTag::Byte(5).strict_eq(&NbtTag::Byte(5)));
    assert!(!NbtTag::Byte(5).strict_eq(&NbtTag::Int(5)));

    // Equal under permissive equality, unequal under strict
    let float = NbtTag::Float(1.5);
    let double = NbtTag::Double(1.5);
    assert_eq!(float, double);
    assert!(!float.strict_eq(&double));

    // Strict equality recurses through composites
    let a = NbtList::from(vec![1_i32, 2]);
    let b = NbtList::try_from(vec![NbtTag::Long(1), NbtTag::Long(2)]).unwrap();
    assert_eq!(NbtTag::List(a.clone()), NbtTag::List(b.clone()));
    assert!(!NbtTag::List(a).strict_eq(&NbtTag::List(b)));
}

#[test]
fn arrays_compare_by_value_across_widths() {
    let bytes = NbtTag::ByteArray(vec![1, 2, 3]);
    let ints = NbtTag::IntArray(vec![1, 2, 3]);
    let longs = NbtTag::LongArray(vec![1, 2, 3]);

    assert_eq!(bytes, ints);
    assert_eq!(ints, longs);
    assert_eq!(bytes, longs);
    assert!(!bytes.strict_eq(&ints));

    assert_ne!(NbtTag::ByteArray(vec![1, 2]), NbtTag::IntArray(vec![1, 2, 3]));
    assert_ne!(NbtTag::ByteArray(vec![1, 2]), NbtTag::IntArray(vec![1, 3]));
}

#[test]
fn ordering_crosses_variants() {
    assert!(NbtTag::Byte(1) < NbtTag::Int(2));
    assert!(NbtTag::Double(2.5) > NbtTag::Long(2));
    assert!(NbtTag::Short(5) > 4);
    assert!(NbtTag::String("a".to_owned()) < NbtTag::String("b".to_owned()));

    // Composites are unordered
    assert_eq!(
        NbtTag::ByteArray(vec![]).partial_cmp(&NbtTag::ByteArray(vec![])),
        None,
    );
}

#[test]
fn construction_wraps_to_width() {
    // A Byte constructed from 128 equals -128
    let byte = NbtTag::from_i64(TagId::Byte, 128).unwrap();
    assert!(byte.strict_eq(&NbtTag::Byte(-128)));

    assert!(NbtTag::from_i64(TagId::Short, 65535 + 2)
        .unwrap()
        .strict_eq(&NbtTag::Short(1)));
    assert!(NbtTag::from_i64(TagId::Double, 3)
        .unwrap()
        .strict_eq(&NbtTag::Double(3.0)));

    assert!(matches!(
        NbtTag::from_i64(TagId::String, 1),
        Err(NbtStructureError::NotNumeric { .. }),
    ));
}

#[test]
fn construction_from_floats_truncates_toward_zero() {
    assert!(NbtTag::from_f64(TagId::Int, 5.9)
        .unwrap()
        .strict_eq(&NbtTag::Int(5)));
    assert!(NbtTag::from_f64(TagId::Int, -5.9)
        .unwrap()
        .strict_eq(&NbtTag::Int(-5)));
    assert!(NbtTag::from_f64(TagId::Float, 0.5)
        .unwrap()
        .strict_eq(&NbtTag::Float(0.5)));
}

#[test]
fn scalar_overflow_wraps() {
    let mut b = NbtTag::Byte(0);
    let mut s = NbtTag::Short(0);
    let mut i = NbtTag::Int(0);

    b += 1_i64 << 7;
    s += 1_i64 << 15;
    i += 1_i64 << 31;

    assert_eq!(b, -(1_i64 << 7));
    assert_eq!(s, -(1_i64 << 15));
    assert_eq!(i, -(1_i64 << 31));

    b -= 1;
    s -= 1;
    i -= 1;

    assert_eq!(b, (1_i64 << 7) - 1);
    assert_eq!(s, (1_i64 << 15) - 1);
    assert_eq!(i, (1_i64 << 31) - 1);

    let mut l = NbtTag::Long(i64::MAX);
    l += 1;
    assert_eq!(l, i64::MIN);
}

#[test]
fn float_arithmetic() {
    let mut f = NbtTag::Float(1.0);
    f += 0.5_f64;
    assert!(f.strict_eq(&NbtTag::Float(1.5)));

    let mut d = NbtTag::Double(1.5);
    d *= 2.0_f64;
    assert!(d.strict_eq(&NbtTag::Double(3.0)));

    // Float operands truncate toward zero on integer targets
    let mut i = NbtTag::Int(3);
    i += 0.9_f64;
    assert!(i.strict_eq(&NbtTag::Int(3)));
}

#[test]
fn array_arithmetic_is_elementwise_and_wraps() {
    let mut bytes = NbtTag::ByteArray(vec![0]);
    bytes += 1_i64 << 7;
    assert!(bytes.strict_eq(&NbtTag::ByteArray(vec![i8::MIN])));
    bytes -= 1;
    assert!(bytes.strict_eq(&NbtTag::ByteArray(vec![i8::MAX])));

    let mut ints = NbtTag::IntArray(vec![0, 1]);
    ints += 1_i64 << 31;
    assert!(ints.strict_eq(&NbtTag::IntArray(vec![i32::MIN, i32::MIN + 1])));
}

#[test]
#[should_panic(expected = "cannot apply integer arithmetic")]
fn arithmetic_on_strings_panics() {
    let mut tag = NbtTag::String("5".to_owned());
    tag += 1;
}

#[test]
fn array_builders_wrap_elements() {
    let tag = NbtTag::byte_array_from([0, 300, -1]);
    assert!(tag.strict_eq(&NbtTag::ByteArray(vec![0, 44, -1])));

    let tag = NbtTag::int_array_from([1_i64 << 32]);
    assert!(tag.strict_eq(&NbtTag::IntArray(vec![0])));

    // Width coercion between arrays goes through the builders
    let wide = vec![1_i64, 2, 130];
    let narrowed = NbtTag::byte_array_from(wide.iter().copied());
    assert!(narrowed.strict_eq(&NbtTag::ByteArray(vec![1, 2, -126])));
}

#[test]
fn list_locks_element_id_on_first_insert() {
    let mut list = NbtList::new();
    assert_eq!(list.element_id(), TagId::End);

    list.push(1_i32).unwrap();
    assert_eq!(list.element_id(), TagId::Int);

    let err = list.push(NbtTag::Byte(1)).unwrap_err();
    assert!(matches!(err, NbtStructureError::MismatchedListElement { .. }));
    assert_eq!(list.len(), 1);

    list.push(2_i32).unwrap();
    list.insert(1, 3_i32).unwrap();
    assert!(list.insert(0, "nope").is_err());
    assert!(list.set(0, 5.0_f64).is_err());

    let old = list.set(0, 7_i32).unwrap();
    assert!(old.strict_eq(&NbtTag::Int(1)));
}

#[test]
fn emptying_a_list_resets_its_element_id() {
    let mut list = NbtList::from(vec![1_i32]);
    assert_eq!(list.element_id(), TagId::Int);

    list.pop().unwrap();
    assert_eq!(list.element_id(), TagId::End);

    // After the reset the list accepts any variant again
    list.push(NbtTag::Byte(1)).unwrap();
    assert_eq!(list.element_id(), TagId::Byte);

    list.clear();
    assert_eq!(list.element_id(), TagId::End);
    list.push("text").unwrap();
    assert_eq!(list.element_id(), TagId::String);

    let mut list = NbtList::from(vec![1_i32, 2]);
    list.remove(0).unwrap();
    assert_eq!(list.element_id(), TagId::Int);
    list.remove(0).unwrap();
    assert_eq!(list.element_id(), TagId::End);
}

#[test]
fn heterogeneous_list_construction_fails() {
    let err = NbtList::try_from(vec![NbtTag::Int(1), NbtTag::Byte(2)]).unwrap_err();
    assert!(matches!(err, NbtStructureError::MismatchedListElement { .. }));

    let list = NbtList::try_from(vec![NbtTag::Int(1), NbtTag::Int(2)]).unwrap();
    assert_eq!(list.element_id(), TagId::Int);

    let mut list = NbtList::new();
    let err = list.try_extend([NbtTag::Byte(1), NbtTag::Short(2)]).unwrap_err();
    assert!(matches!(err, NbtStructureError::MismatchedListElement { .. }));
}

#[test]
fn typed_list_access() {
    let list = NbtList::from(vec![10_i32, 20, 30]);

    let value: i32 = list.get(1).unwrap();
    assert_eq!(value, 20);
    assert!(list.get::<i64>(1).is_err());
    assert!(list.get::<i32>(3).is_err());
    assert_eq!(list[2], 30);
}

#[test]
fn compound_preserves_insertion_order() {
    let mut compound = NbtCompound::new();
    compound.insert("zebra", 1_i32);
    compound.insert("apple", 2_i32);
    compound.insert("mango", 3_i32);

    let keys: Vec<&str> = compound.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, ["zebra", "apple", "mango"]);

    // Replacing a value keeps the original slot
    compound.insert("apple", 4_i32);
    let keys: Vec<&str> = compound.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, ["zebra", "apple", "mango"]);

    compound.remove("zebra").unwrap();
    let keys: Vec<&str> = compound.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, ["apple", "mango"]);
}

#[test]
fn typed_compound_access() {
    let mut compound = NbtCompound::new();
    compound.insert("n", 42_i32);
    compound.insert("s", "text");

    let n: i32 = compound.get("n").unwrap();
    assert_eq!(n, 42);
    let s: &str = compound.get("s").unwrap();
    assert_eq!(s, "text");

    assert!(compound.get::<_, i8>("n").is_err());
    assert!(compound.get::<_, i32>("missing").is_err());
    assert!(bool::try_from(compound.get_tag("n").unwrap()).unwrap());
}

#[test]
fn deep_copies_are_independent() {
    let mut inner = NbtCompound::new();
    inner.insert("x", 1_i32);
    let mut list = NbtList::new();
    list.push(inner).unwrap();

    let mut root = NbtCompound::new();
    root.insert("list", list);
    root.insert("arr", NbtTag::IntArray(vec![1, 2, 3]));

    let copy = root.clone();
    assert_eq!(root, copy);

    // Mutate the original through every composite layer
    let arr: &mut Vec<i32> = root.get_mut("arr").unwrap();
    arr[0] = 99;
    let list: &mut NbtList = root.get_mut("list").unwrap();
    let inner: &mut NbtCompound = list
        .get_tag_mut(0)
        .map(|tag| <&mut NbtCompound>::try_from(tag).unwrap())
        .unwrap();
    inner.insert("x", 100_i32);

    let copied_arr: &Vec<i32> = copy.get("arr").unwrap();
    assert_eq!(copied_arr, &vec![1, 2, 3]);
    let copied_list: &NbtList = copy.get("list").unwrap();
    let copied_inner: &NbtCompound = copied_list.get(0).unwrap();
    let x: i32 = copied_inner.get("x").unwrap();
    assert_eq!(x, 1);
}

#[test]
fn scalar_keys_hash_strictly() {
    let mut set = HashSet::new();
    set.insert(ScalarKey::new(&NbtTag::Int(1)).unwrap());
    set.insert(ScalarKey::new(&NbtTag::Byte(1)).unwrap());
    set.insert(ScalarKey::new(&NbtTag::String("1".to_owned())).unwrap());
    set.insert(ScalarKey::new(&NbtTag::Double(0.5)).unwrap());

    // Byte(1) and Int(1) are permissively equal but key differently
    assert_eq!(set.len(), 4);
    assert!(set.contains(&ScalarKey::new(&NbtTag::Int(1)).unwrap()));
}

#[test]
fn composites_are_unhashable() {
    for tag in [
        NbtTag::ByteArray(vec![]),
        NbtTag::IntArray(vec![1, 2]),
        NbtTag::LongArray(vec![]),
        NbtTag::List(NbtList::new()),
        NbtTag::Compound(NbtCompound::new()),
    ] {
        assert!(matches!(
            ScalarKey::new(&tag),
            Err(NbtStructureError::Unhashable { .. }),
        ));
    }
}

#[test]
fn tag_id_round_trips_through_bytes() {
    for id in 0_u8..=12 {
        assert_eq!(TagId::from_u8(id).unwrap().to_u8(), id);
    }
    assert_eq!(TagId::from_u8(13), None);
    assert!(TagId::Float.is_numeric());
    assert!(!TagId::String.is_numeric());
}
