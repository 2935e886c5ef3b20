mod compound;
mod list;


use std::fmt;
use std::{
    borrow::Cow,
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    ops::{AddAssign, MulAssign, SubAssign},
};

use crate::snbt;
use crate::{repr::NbtStructureError, snbt::SnbtError};


pub use self::compound::{Map, NbtCompound};
pub use self::list::NbtList;


/// The one-byte discriminator identifying a tag variant on the wire.
///
/// `End` (0) is a wire-format marker: it terminates compounds and stands in for
/// the element type of empty lists, but never appears as a materialised value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagId {
    End       = 0,
    Byte      = 1,
    Short     = 2,
    Int       = 3,
    Long      = 4,
    Float     = 5,
    Double    = 6,
    ByteArray = 7,
    String    = 8,
    List      = 9,
    Compound  = 10,
    IntArray  = 11,
    LongArray = 12,
}

impl TagId {
    /// Converts a raw id byte into a `TagId`, or `None` if the byte is outside the
    /// closed set `0..=12`.
    pub fn from_u8(id: u8) -> Option<Self> {
        Some(match id {
            0  => Self::End,
            1  => Self::Byte,
            2  => Self::Short,
            3  => Self::Int,
            4  => Self::Long,
            5  => Self::Float,
            6  => Self::Double,
            7  => Self::ByteArray,
            8  => Self::String,
            9  => Self::List,
            10 => Self::Compound,
            11 => Self::IntArray,
            12 => Self::LongArray,
            _  => return None,
        })
    }

    /// The raw id byte of this variant.
    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Whether tags of this id carry a numeric scalar payload.
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Byte | Self::Short | Self::Int | Self::Long | Self::Float | Self::Double,
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::End       => "End",
            Self::Byte      => "Byte",
            Self::Short     => "Short",
            Self::Int       => "Int",
            Self::Long      => "Long",
            Self::Float     => "Float",
            Self::Double    => "Double",
            Self::ByteArray => "ByteArray",
            Self::String    => "String",
            Self::List      => "List",
            Self::Compound  => "Compound",
            Self::IntArray  => "IntArray",
            Self::LongArray => "LongArray",
        }
    }
}

impl Display for TagId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The generic NBT tag type, containing all twelve tag variants, each wrapping the
/// corresponding Rust type.
///
/// Scalar and string tags are plain value wrappers; the composite variants
/// ([`List`](Self::List), [`Compound`](Self::Compound) and the three arrays) own
/// their children exclusively. [`Clone`] is a deep copy.
///
/// `PartialEq` on tags is *permissive*: numeric tags compare by numeric value across
/// variants, and arrays compare element values across widths, mirroring comparison
/// against raw primitives. Use [`strict_eq`](Self::strict_eq) when the variant itself
/// must also match (codec round-trip checks want this).
#[derive(Clone)]
pub enum NbtTag {
    /// A signed, one-byte integer.
    Byte(i8),
    /// A signed, two-byte integer.
    Short(i16),
    /// A signed, four-byte integer.
    Int(i32),
    /// A signed, eight-byte integer.
    Long(i64),
    /// A 32-bit floating point value.
    Float(f32),
    /// A 64-bit floating point value.
    Double(f64),
    /// A contiguous array of signed one-byte integers.
    ByteArray(Vec<i8>),
    /// A UTF-8 string.
    String(String),
    /// An ordered, element-homogeneous list of tags.
    List(NbtList),
    /// A mapping from string keys to tags, preserving insertion order.
    Compound(NbtCompound),
    /// A contiguous array of signed four-byte integers.
    IntArray(Vec<i32>),
    /// A contiguous array of signed eight-byte integers.
    LongArray(Vec<i64>),
}

impl NbtTag {
    /// Returns this tag's id.
    pub fn id(&self) -> TagId {
        match self {
            Self::Byte(..)      => TagId::Byte,
            Self::Short(..)     => TagId::Short,
            Self::Int(..)       => TagId::Int,
            Self::Long(..)      => TagId::Long,
            Self::Float(..)     => TagId::Float,
            Self::Double(..)    => TagId::Double,
            Self::ByteArray(..) => TagId::ByteArray,
            Self::String(..)    => TagId::String,
            Self::List(..)      => TagId::List,
            Self::Compound(..)  => TagId::Compound,
            Self::IntArray(..)  => TagId::IntArray,
            Self::LongArray(..) => TagId::LongArray,
        }
    }

    pub(crate) fn tag_name(&self) -> &'static str {
        self.id().name()
    }

    /// Constructs a numeric scalar tag of the given id from an integer, wrapping the
    /// value to the target width with two's-complement semantics (so `Byte` from `128`
    /// yields `-128`). Fails if `id` is not a numeric tag id.
    pub fn from_i64(id: TagId, value: i64) -> Result<Self, NbtStructureError> {
        Ok(match id {
            TagId::Byte   => Self::Byte(value as i8),
            TagId::Short  => Self::Short(value as i16),
            TagId::Int    => Self::Int(value as i32),
            TagId::Long   => Self::Long(value),
            TagId::Float  => Self::Float(value as f32),
            TagId::Double => Self::Double(value as f64),
            _ => return Err(NbtStructureError::not_numeric(id)),
        })
    }

    /// Constructs a numeric scalar tag of the given id from a float. Integer targets
    /// truncate toward zero and then wrap to the target width. Fails if `id` is not a
    /// numeric tag id.
    pub fn from_f64(id: TagId, value: f64) -> Result<Self, NbtStructureError> {
        Ok(match id {
            TagId::Byte   => Self::Byte((value as i64) as i8),
            TagId::Short  => Self::Short((value as i64) as i16),
            TagId::Int    => Self::Int((value as i64) as i32),
            TagId::Long   => Self::Long(value as i64),
            TagId::Float  => Self::Float(value as f32),
            TagId::Double => Self::Double(value),
            _ => return Err(NbtStructureError::not_numeric(id)),
        })
    }

    /// Builds a `ByteArray` tag from any iterable of integers, wrapping each element
    /// to the one-byte width.
    pub fn byte_array_from<I: IntoIterator<Item = i64>>(values: I) -> Self {
        Self::ByteArray(values.into_iter().map(|v| v as i8).collect())
    }

    /// Builds an `IntArray` tag from any iterable of integers, wrapping each element
    /// to the four-byte width.
    pub fn int_array_from<I: IntoIterator<Item = i64>>(values: I) -> Self {
        Self::IntArray(values.into_iter().map(|v| v as i32).collect())
    }

    /// Builds a `LongArray` tag from any iterable of integers.
    pub fn long_array_from<I: IntoIterator<Item = i64>>(values: I) -> Self {
        Self::LongArray(values.into_iter().collect())
    }

    /// The payload of an integer scalar tag widened to `i64`, or `None` for any other
    /// variant.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Byte(v)  => Some(i64::from(v)),
            Self::Short(v) => Some(i64::from(v)),
            Self::Int(v)   => Some(i64::from(v)),
            Self::Long(v)  => Some(v),
            _ => None,
        }
    }

    /// The payload of any numeric scalar tag as `f64`, or `None` for non-numeric
    /// variants.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_numeric().map(Numeric::as_f64)
    }

    /// A reference to the payload of a `String` tag, or `None` for any other variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    fn as_numeric(&self) -> Option<Numeric> {
        match *self {
            Self::Byte(v)   => Some(Numeric::Int(i64::from(v))),
            Self::Short(v)  => Some(Numeric::Int(i64::from(v))),
            Self::Int(v)    => Some(Numeric::Int(i64::from(v))),
            Self::Long(v)   => Some(Numeric::Int(v)),
            Self::Float(v)  => Some(Numeric::Float(f64::from(v))),
            Self::Double(v) => Some(Numeric::Float(v)),
            _ => None,
        }
    }

    /// Equality that demands identical variants as well as equal payloads, applied
    /// recursively through composites. Float payloads compare by bit pattern, so two
    /// tags related by a codec round trip are strict-equal even when NaN is involved.
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Byte(a),      Self::Byte(b))      => a == b,
            (Self::Short(a),     Self::Short(b))     => a == b,
            (Self::Int(a),       Self::Int(b))       => a == b,
            (Self::Long(a),      Self::Long(b))      => a == b,
            (Self::Float(a),     Self::Float(b))     => a.to_bits() == b.to_bits(),
            (Self::Double(a),    Self::Double(b))    => a.to_bits() == b.to_bits(),
            (Self::ByteArray(a), Self::ByteArray(b)) => a == b,
            (Self::String(a),    Self::String(b))    => a == b,
            (Self::List(a),      Self::List(b))      => a.strict_eq_impl(b),
            (Self::Compound(a),  Self::Compound(b))  => a.strict_eq_impl(b),
            (Self::IntArray(a),  Self::IntArray(b))  => a == b,
            (Self::LongArray(a), Self::LongArray(b)) => a == b,
            _ => false,
        }
    }

    /// Parses an NBT tag of any variant from SNBT.
    #[inline]
    pub fn from_snbt(input: &str) -> Result<Self, SnbtError> {
        snbt::parse_any(input)
    }

    /// Converts this tag into a valid, parsable SNBT string with no extraneous
    /// spacing. For user-facing text, prefer [`to_pretty_snbt`](Self::to_pretty_snbt).
    #[inline]
    pub fn to_snbt(&self) -> String {
        format!("{self}")
    }

    /// Converts this tag into a valid, parsable SNBT string with each child of a
    /// compound or list on its own line, indented by four spaces per level.
    #[inline]
    pub fn to_pretty_snbt(&self) -> String {
        format!("{self:#}")
    }

    /// Wraps the given string in double quotes, escaping backslashes and double
    /// quotes.
    pub fn string_to_snbt(string: &str) -> String {
        let mut quoted = String::with_capacity(2 + string.len());
        quoted.push('"');
        for ch in string.chars() {
            if matches!(ch, '"' | '\\') {
                quoted.push('\\');
            }
            quoted.push(ch);
        }
        quoted.push('"');
        quoted
    }

    /// Compound keys print bare when every character is in the bare-word alphabet;
    /// anything else (including the empty key) must be quoted.
    pub(crate) fn key_to_snbt(key: &str) -> Cow<'_, str> {
        if !key.is_empty() && key.chars().all(snbt::allowed_unquoted) {
            Cow::Borrowed(key)
        } else {
            Cow::Owned(Self::string_to_snbt(key))
        }
    }

    pub(crate) fn fmt_snbt(
        &self,
        f:      &mut Formatter<'_>,
        indent: &mut String,
        unit:   &str,
        pretty: bool,
    ) -> fmt::Result {
        match self {
            Self::Byte(v)  => write!(f, "{v}b"),
            Self::Short(v) => write!(f, "{v}s"),
            Self::Int(v)   => write!(f, "{v}"),
            Self::Long(v)  => write!(f, "{v}l"),
            Self::Float(v) => {
                if v.is_finite() {
                    write!(f, "{v}f")
                } else if v.is_nan() {
                    f.write_str("NaNf")
                } else if *v > 0.0 {
                    f.write_str("Infinityf")
                } else {
                    f.write_str("-Infinityf")
                }
            }
            Self::Double(v) => {
                if v.is_finite() {
                    // A double rendered without a decimal point would reparse as an
                    // Int, so such values carry the `d` suffix instead.
                    let repr = v.to_string();
                    if repr.contains('.') {
                        f.write_str(&repr)
                    } else {
                        write!(f, "{repr}d")
                    }
                } else if v.is_nan() {
                    f.write_str("NaNd")
                } else if *v > 0.0 {
                    f.write_str("Infinityd")
                } else {
                    f.write_str("-Infinityd")
                }
            }
            Self::ByteArray(v)  => fmt_int_array(f, "B", v, pretty),
            Self::String(v)     => f.write_str(&Self::string_to_snbt(v)),
            Self::List(v)       => v.fmt_snbt(f, indent, unit, pretty),
            Self::Compound(v)   => v.fmt_snbt(f, indent, unit, pretty),
            Self::IntArray(v)   => fmt_int_array(f, "I", v, pretty),
            Self::LongArray(v)  => fmt_int_array(f, "L", v, pretty),
        }
    }
}

// Typed arrays stay on a single line even in the indented form.
fn fmt_int_array<T: Display>(
    f:      &mut Formatter<'_>,
    prefix: &str,
    values: &[T],
    pretty: bool,
) -> fmt::Result {
    if values.is_empty() {
        return write!(f, "[{prefix};]");
    }

    write!(f, "[{prefix};")?;
    for (index, value) in values.iter().enumerate() {
        match (index, pretty) {
            (0, false) => write!(f, "{value}")?,
            (0, true)  => write!(f, " {value}")?,
            (_, false) => write!(f, ",{value}")?,
            (_, true)  => write!(f, ", {value}")?,
        }
    }
    write!(f, "]")
}


// ================================
//      Equality and ordering
// ================================

#[derive(Clone, Copy)]
enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(v)   => v as f64,
            Self::Float(v) => v,
        }
    }

    fn loose_eq(self, other: Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }

    fn loose_cmp(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

fn cross_array_eq<A, B>(a: &[A], b: &[B]) -> bool
where
    A: Copy + Into<i64>,
    B: Copy + Into<i64>,
{
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(&x, &y)| x.into() == y.into())
}

impl PartialEq for NbtTag {
    /// Permissive equality: numeric tags compare by value across variants, arrays
    /// compare element values across widths, and composites compare structurally with
    /// permissively-equal children. See [`strict_eq`](Self::strict_eq) for the form
    /// that also demands matching variants.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a),    Self::String(b))    => a == b,
            (Self::List(a),      Self::List(b))      => a == b,
            (Self::Compound(a),  Self::Compound(b))  => a == b,
            (Self::ByteArray(a), Self::ByteArray(b)) => a == b,
            (Self::IntArray(a),  Self::IntArray(b))  => a == b,
            (Self::LongArray(a), Self::LongArray(b)) => a == b,
            (Self::ByteArray(a), Self::IntArray(b))  => cross_array_eq(a, b),
            (Self::ByteArray(a), Self::LongArray(b)) => cross_array_eq(a, b),
            (Self::IntArray(a),  Self::ByteArray(b)) => cross_array_eq(a, b),
            (Self::IntArray(a),  Self::LongArray(b)) => cross_array_eq(a, b),
            (Self::LongArray(a), Self::ByteArray(b)) => cross_array_eq(a, b),
            (Self::LongArray(a), Self::IntArray(b))  => cross_array_eq(a, b),
            _ => match (self.as_numeric(), other.as_numeric()) {
                (Some(a), Some(b)) => a.loose_eq(b),
                _ => false,
            },
        }
    }
}

impl PartialOrd for NbtTag {
    /// Numeric scalars order by value across variants and strings order
    /// lexicographically; composite tags are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            _ => match (self.as_numeric(), other.as_numeric()) {
                (Some(a), Some(b)) => a.loose_cmp(b),
                _ => None,
            },
        }
    }
}

macro_rules! eq_with_int {
    ($($type:ty),* $(,)?) => {$(
        impl PartialEq<$type> for NbtTag {
            fn eq(&self, other: &$type) -> bool {
                self.as_numeric()
                    .is_some_and(|n| n.loose_eq(Numeric::Int(i64::from(*other))))
            }
        }

        impl PartialEq<NbtTag> for $type {
            fn eq(&self, other: &NbtTag) -> bool {
                other == self
            }
        }

        impl PartialOrd<$type> for NbtTag {
            fn partial_cmp(&self, other: &$type) -> Option<Ordering> {
                self.as_numeric()?.loose_cmp(Numeric::Int(i64::from(*other)))
            }
        }

        impl PartialOrd<NbtTag> for $type {
            fn partial_cmp(&self, other: &NbtTag) -> Option<Ordering> {
                other.partial_cmp(self).map(Ordering::reverse)
            }
        }
    )*};
}

eq_with_int!(i8, i16, i32, i64);

macro_rules! eq_with_float {
    ($($type:ty),* $(,)?) => {$(
        impl PartialEq<$type> for NbtTag {
            fn eq(&self, other: &$type) -> bool {
                self.as_numeric()
                    .is_some_and(|n| n.loose_eq(Numeric::Float(f64::from(*other))))
            }
        }

        impl PartialEq<NbtTag> for $type {
            fn eq(&self, other: &NbtTag) -> bool {
                other == self
            }
        }

        impl PartialOrd<$type> for NbtTag {
            fn partial_cmp(&self, other: &$type) -> Option<Ordering> {
                self.as_numeric()?.loose_cmp(Numeric::Float(f64::from(*other)))
            }
        }

        impl PartialOrd<NbtTag> for $type {
            fn partial_cmp(&self, other: &NbtTag) -> Option<Ordering> {
                other.partial_cmp(self).map(Ordering::reverse)
            }
        }
    )*};
}

eq_with_float!(f32, f64);

impl PartialEq<&str> for NbtTag {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Self::String(s) if s == other)
    }
}

impl PartialEq<NbtTag> for &str {
    fn eq(&self, other: &NbtTag) -> bool {
        other == self
    }
}

impl PartialEq<String> for NbtTag {
    fn eq(&self, other: &String) -> bool {
        matches!(self, Self::String(s) if s == other)
    }
}

impl PartialEq<NbtTag> for String {
    fn eq(&self, other: &NbtTag) -> bool {
        other == self
    }
}


// ================================
//      In-place arithmetic
// ================================

// Integer targets compute in i64 and truncate back to the tag's width, which is
// exactly wrap-around modulo 2^w. Array variants apply the operation elementwise.
macro_rules! int_assign_ops {
    ($($trait:ident, $method:ident, $wrapping:ident, $op:tt);* $(;)?) => {$(
        impl $trait<i64> for NbtTag {
            /// In-place arithmetic on numeric or array tags, wrapping to the tag's
            /// width.
            ///
            /// # Panics
            /// Panics when applied to a `String`, `List` or `Compound` tag.
            fn $method(&mut self, rhs: i64) {
                match self {
                    Self::Byte(v)   => *v = i64::from(*v).$wrapping(rhs) as i8,
                    Self::Short(v)  => *v = i64::from(*v).$wrapping(rhs) as i16,
                    Self::Int(v)    => *v = i64::from(*v).$wrapping(rhs) as i32,
                    Self::Long(v)   => *v = v.$wrapping(rhs),
                    Self::Float(v)  => *v = *v $op rhs as f32,
                    Self::Double(v) => *v = *v $op rhs as f64,
                    Self::ByteArray(a) => {
                        for v in a {
                            *v = i64::from(*v).$wrapping(rhs) as i8;
                        }
                    }
                    Self::IntArray(a) => {
                        for v in a {
                            *v = i64::from(*v).$wrapping(rhs) as i32;
                        }
                    }
                    Self::LongArray(a) => {
                        for v in a {
                            *v = v.$wrapping(rhs);
                        }
                    }
                    _ => panic!(
                        "cannot apply integer arithmetic to a {} tag",
                        self.tag_name(),
                    ),
                }
            }
        }
    )*};
}

int_assign_ops!(
    AddAssign, add_assign, wrapping_add, +;
    SubAssign, sub_assign, wrapping_sub, -;
    MulAssign, mul_assign, wrapping_mul, *;
);

// A float right-hand side truncates toward zero on integer targets, then wraps.
macro_rules! float_assign_ops {
    ($($trait:ident, $method:ident, $op:tt);* $(;)?) => {$(
        impl $trait<f64> for NbtTag {
            /// In-place arithmetic with a float operand; integer targets truncate the
            /// result toward zero and wrap to the tag's width.
            ///
            /// # Panics
            /// Panics when applied to a `String`, `List` or `Compound` tag.
            fn $method(&mut self, rhs: f64) {
                match self {
                    Self::Byte(v)   => *v = (i64::from(*v) as f64 $op rhs) as i64 as i8,
                    Self::Short(v)  => *v = (i64::from(*v) as f64 $op rhs) as i64 as i16,
                    Self::Int(v)    => *v = (i64::from(*v) as f64 $op rhs) as i64 as i32,
                    Self::Long(v)   => *v = (*v as f64 $op rhs) as i64,
                    Self::Float(v)  => *v = (f64::from(*v) $op rhs) as f32,
                    Self::Double(v) => *v = *v $op rhs,
                    Self::ByteArray(a) => {
                        for v in a {
                            *v = (i64::from(*v) as f64 $op rhs) as i64 as i8;
                        }
                    }
                    Self::IntArray(a) => {
                        for v in a {
                            *v = (i64::from(*v) as f64 $op rhs) as i64 as i32;
                        }
                    }
                    Self::LongArray(a) => {
                        for v in a {
                            *v = (*v as f64 $op rhs) as i64;
                        }
                    }
                    _ => panic!(
                        "cannot apply float arithmetic to a {} tag",
                        self.tag_name(),
                    ),
                }
            }
        }
    )*};
}

float_assign_ops!(
    AddAssign, add_assign, +;
    SubAssign, sub_assign, -;
    MulAssign, mul_assign, *;
);


// ================================
//      Conversions
// ================================

// Implement the From trait for all the tag's internal types.
macro_rules! tag_from {
    ($($type:ty, $tag:ident);* $(;)?) => {$(
        impl From<$type> for NbtTag {
            #[inline]
            fn from(value: $type) -> Self {
                Self::$tag(value)
            }
        }
    )*};
}

tag_from!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    String, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    Vec<i64>, LongArray;
);

impl From<&str> for NbtTag {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<&String> for NbtTag {
    #[inline]
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<bool> for NbtTag {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Byte(if value { 1 } else { 0 })
    }
}

impl From<u8> for NbtTag {
    #[inline]
    fn from(value: u8) -> Self {
        Self::Byte(value as i8)
    }
}

impl From<Vec<u8>> for NbtTag {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self::ByteArray(value.into_iter().map(|b| b as i8).collect())
    }
}

macro_rules! prim_from_tag {
    ($($type:ty, $tag:ident);* $(;)?) => {$(
        impl TryFrom<&NbtTag> for $type {
            type Error = NbtStructureError;

            #[inline]
            fn try_from(tag: &NbtTag) -> Result<Self, Self::Error> {
                if let NbtTag::$tag(value) = tag {
                    Ok(*value)
                } else {
                    Err(NbtStructureError::type_mismatch(
                        stringify!($tag),
                        tag.tag_name(),
                    ))
                }
            }
        }
    )*};
}

prim_from_tag!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
);

impl TryFrom<&NbtTag> for bool {
    type Error = NbtStructureError;

    fn try_from(tag: &NbtTag) -> Result<Self, Self::Error> {
        match *tag {
            NbtTag::Byte(value)  => Ok(value != 0),
            NbtTag::Short(value) => Ok(value != 0),
            NbtTag::Int(value)   => Ok(value != 0),
            NbtTag::Long(value)  => Ok(value != 0),
            _ => Err(NbtStructureError::type_mismatch(
                "Byte, Short, Int, or Long",
                tag.tag_name(),
            )),
        }
    }
}

macro_rules! ref_from_tag {
    ($($type:ty, $tag:ident);* $(;)?) => {$(
        impl<'a> TryFrom<&'a NbtTag> for &'a $type {
            type Error = NbtStructureError;

            #[inline]
            fn try_from(tag: &'a NbtTag) -> Result<Self, Self::Error> {
                if let NbtTag::$tag(value) = tag {
                    Ok(value)
                } else {
                    Err(NbtStructureError::type_mismatch(
                        stringify!($tag),
                        tag.tag_name(),
                    ))
                }
            }
        }

        impl<'a> TryFrom<&'a mut NbtTag> for &'a mut $type {
            type Error = NbtStructureError;

            #[inline]
            fn try_from(tag: &'a mut NbtTag) -> Result<Self, Self::Error> {
                if let NbtTag::$tag(value) = tag {
                    Ok(value)
                } else {
                    Err(NbtStructureError::type_mismatch(
                        stringify!($tag),
                        tag.tag_name(),
                    ))
                }
            }
        }
    )*};
}

ref_from_tag!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    [i8], ByteArray;
    String, String;
    str, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    [i32], IntArray;
    Vec<i64>, LongArray;
    [i64], LongArray;
);

macro_rules! from_tag {
    ($($type:ty, $tag:ident);* $(;)?) => {$(
        impl TryFrom<NbtTag> for $type {
            type Error = NbtStructureError;

            #[inline]
            fn try_from(tag: NbtTag) -> Result<Self, Self::Error> {
                if let NbtTag::$tag(value) = tag {
                    Ok(value)
                } else {
                    Err(NbtStructureError::type_mismatch(
                        stringify!($tag),
                        tag.tag_name(),
                    ))
                }
            }
        }
    )*};
}

from_tag!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    String, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    Vec<i64>, LongArray;
);


// ================================
//      Hashing
// ================================

/// An owned `(tag id, payload)` hashing key for scalar and string tags.
///
/// The five mutable composite variants (arrays, lists and compounds) are
/// unhashable, matching the model's single-owner mutability: [`ScalarKey::new`]
/// fails for them with [`NbtStructureError::Unhashable`]. Float payloads key on
/// their IEEE-754 bit pattern, so the key is strict where tag equality is
/// permissive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    /// The bit pattern of an `f32` payload.
    Float(u32),
    /// The bit pattern of an `f64` payload.
    Double(u64),
    String(String),
}

impl ScalarKey {
    pub fn new(tag: &NbtTag) -> Result<Self, NbtStructureError> {
        Ok(match tag {
            NbtTag::Byte(v)   => Self::Byte(*v),
            NbtTag::Short(v)  => Self::Short(*v),
            NbtTag::Int(v)    => Self::Int(*v),
            NbtTag::Long(v)   => Self::Long(*v),
            NbtTag::Float(v)  => Self::Float(v.to_bits()),
            NbtTag::Double(v) => Self::Double(v.to_bits()),
            NbtTag::String(v) => Self::String(v.clone()),
            _ => return Err(NbtStructureError::unhashable(tag.tag_name())),
        })
    }
}

impl TryFrom<&NbtTag> for ScalarKey {
    type Error = NbtStructureError;

    #[inline]
    fn try_from(tag: &NbtTag) -> Result<Self, Self::Error> {
        Self::new(tag)
    }
}


// ================================
//      SNBT formatting surface
// ================================

/// Displays a tag as SNBT with each child on its own line, indented by an
/// arbitrary unit string. Created by the `to_snbt_indented` methods.
pub struct IndentedSnbt<'a, T> {
    value: &'a T,
    unit:  &'a str,
}

macro_rules! display_and_debug {
    ($tag:ty) => {
        /// `Display` and `Debug` both render SNBT; the alternate flag (`{:#}`)
        /// selects the indented form with four spaces per level.
        impl Display for $tag {
            #[inline]
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.fmt_snbt(f, &mut String::new(), "    ", f.alternate())
            }
        }

        impl Debug for $tag {
            #[inline]
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.fmt_snbt(f, &mut String::new(), "    ", f.alternate())
            }
        }

        impl Display for IndentedSnbt<'_, $tag> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.value.fmt_snbt(f, &mut String::new(), self.unit, true)
            }
        }

        impl $tag {
            /// Converts this value into an SNBT string with each child of a compound
            /// or list on its own line at `depth × unit` indentation. Typed arrays
            /// and empty containers stay on one line.
            pub fn to_snbt_indented(&self, unit: &str) -> String {
                format!("{}", IndentedSnbt { value: self, unit })
            }

            /// [`to_snbt_indented`](Self::to_snbt_indented) with an indent unit of
            /// the given number of spaces.
            pub fn to_snbt_indented_by(&self, spaces: usize) -> String {
                self.to_snbt_indented(&" ".repeat(spaces))
            }
        }
    };
}

display_and_debug!(NbtTag);
display_and_debug!(NbtList);
display_and_debug!(NbtCompound);
