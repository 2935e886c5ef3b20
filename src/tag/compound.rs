use std::fmt;
use std::hash::Hash;
use std::{borrow::Borrow, fmt::Formatter};

use crate::snbt;
use crate::repr::{NbtReprError, NbtStructureError};
use crate::snbt::SnbtError;

use super::NbtTag;


/// The map type backing [`NbtCompound`]. Compounds preserve insertion order through
/// iteration, binary encoding, and SNBT printing, so an
/// [`IndexMap`](https://docs.rs/indexmap/latest/indexmap/) is used.
pub type Map<T> = indexmap::IndexMap<String, T>;

/// The NBT tag compound type: a mapping from string keys to tags with unique keys
/// and stable insertion order.
///
/// Key order carries no meaning in the NBT data model, but it is preserved
/// bit-for-bit across decode/encode round trips.
#[repr(transparent)]
#[derive(Clone)]
pub struct NbtCompound(pub(crate) Map<NbtTag>);

impl NbtCompound {
    /// Returns a new NBT tag compound with an empty internal map.
    #[inline]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Returns a new NBT tag compound with the given initial capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Map::with_capacity(capacity))
    }

    /// Returns a reference to the internal map of this compound.
    #[inline]
    pub fn inner(&self) -> &Map<NbtTag> {
        &self.0
    }

    /// Returns a mutable reference to the internal map of this compound.
    #[inline]
    pub fn inner_mut(&mut self) -> &mut Map<NbtTag> {
        &mut self.0
    }

    /// Returns the internal map of this compound.
    #[inline]
    pub fn into_inner(self) -> Map<NbtTag> {
        self.0
    }

    /// Returns the number of tags in this compound.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the length of this compound is zero, false otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value of the tag with the given name, or an error if no tag exists
    /// with the given name or the tag cannot convert to the specified type. This method
    /// should be used to obtain primitives as well as shared references to lists and
    /// compounds.
    #[inline]
    pub fn get<'a, 'b, K, T>(&'a self, name: &'b K) -> Result<T, NbtReprError>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
        &'b K: Into<String>,
        T: TryFrom<&'a NbtTag>,
        T::Error: Into<anyhow::Error>,
    {
        T::try_from(
            self.0
                .get(name)
                .ok_or_else(|| NbtStructureError::missing_tag(name))?,
        )
        .map_err(NbtReprError::from_any)
    }

    /// Returns the value of the tag with the given name, or an error if no tag exists
    /// with the given name or the tag cannot convert to the specified type. This method
    /// should be used to obtain mutable references to lists and compounds.
    #[inline]
    pub fn get_mut<'a, 'b, K, T>(&'a mut self, name: &'b K) -> Result<T, NbtReprError>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
        &'b K: Into<String>,
        T: TryFrom<&'a mut NbtTag>,
        T::Error: Into<anyhow::Error>,
    {
        T::try_from(
            self.0
                .get_mut(name)
                .ok_or_else(|| NbtStructureError::missing_tag(name))?,
        )
        .map_err(NbtReprError::from_any)
    }

    /// Returns whether this compound has a tag with the given name.
    #[inline]
    pub fn contains_key<K>(&self, key: &K) -> bool
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
    {
        self.0.contains_key(key)
    }

    /// Returns a reference to the tag with the given name without any casting,
    /// or `None` if no tag exists with the given name.
    #[inline]
    pub fn get_tag<K>(&self, key: &K) -> Option<&NbtTag>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
    {
        self.0.get(key)
    }

    /// Returns a mutable reference to the tag with the given name without any casting,
    /// or `None` if no tag exists with the given name.
    #[inline]
    pub fn get_tag_mut<K>(&mut self, key: &K) -> Option<&mut NbtTag>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
    {
        self.0.get_mut(key)
    }

    /// Removes and returns the tag with the given name without any casting, or `None`
    /// if no tag exists with the given name. The insertion order of the remaining
    /// entries is preserved.
    pub fn remove<K>(&mut self, key: &K) -> Option<NbtTag>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
    {
        self.0.shift_remove(key)
    }

    /// Adds the given value to this compound with the given name after wrapping it in
    /// an `NbtTag`, returning the previous tag stored under that name, if any.
    /// A replaced tag keeps its original position in the insertion order.
    #[inline]
    pub fn insert<K: Into<String>, T: Into<NbtTag>>(&mut self, name: K, value: T) -> Option<NbtTag> {
        self.0.insert(name.into(), value.into())
    }

    /// Iterates over the `(key, tag)` entries of this compound in insertion order.
    #[inline]
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, NbtTag> {
        self.0.iter()
    }

    /// Iterates over the entries of this compound in insertion order,
    /// with mutable references to the tags.
    #[inline]
    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, NbtTag> {
        self.0.iter_mut()
    }

    /// Iterates over this compound, converting each tag reference into the specified
    /// type. Each key is paired with the result of the attempted conversion. The
    /// iterator does not terminate early if a conversion fails.
    #[inline]
    pub fn iter_map<'a, T: TryFrom<&'a NbtTag>>(
        &'a self,
    ) -> impl Iterator<Item = (&'a str, Result<T, <T as TryFrom<&'a NbtTag>>::Error>)> + 'a {
        self.0
            .iter()
            .map(|(key, tag)| (key.as_str(), T::try_from(tag)))
    }

    /// Parses an NBT compound from SNBT.
    #[inline]
    pub fn from_snbt(input: &str) -> Result<Self, SnbtError> {
        snbt::parse_compound(input)
    }

    /// Converts this compound into a valid SNBT string with no extraneous spacing.
    #[inline]
    pub fn to_snbt(&self) -> String {
        format!("{self}")
    }

    /// Converts this compound into a valid SNBT string with extra spacing
    /// for readability, indented by four spaces per level.
    #[inline]
    pub fn to_pretty_snbt(&self) -> String {
        format!("{self:#}")
    }

    pub(super) fn fmt_snbt(
        &self,
        f:      &mut Formatter<'_>,
        indent: &mut String,
        unit:   &str,
        pretty: bool,
    ) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{{}}");
        }

        if pretty {
            indent.push_str(unit);
            write!(f, "{{\n")?;
        } else {
            write!(f, "{{")?;
        }

        let last_index = self.len() - 1;
        for (index, (key, value)) in self.0.iter().enumerate() {
            if pretty {
                write!(f, "{indent}{}: ", NbtTag::key_to_snbt(key))?;
            } else {
                write!(f, "{}:", NbtTag::key_to_snbt(key))?;
            }

            value.fmt_snbt(f, indent, unit, pretty)?;

            if index != last_index {
                write!(f, "{}", if pretty { ",\n" } else { "," })?;
            }
        }

        if pretty {
            indent.truncate(indent.len() - unit.len());
            write!(f, "\n{indent}}}")
        } else {
            write!(f, "}}")
        }
    }

    pub(crate) fn strict_eq_impl(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, tag)| other.get_tag(key.as_str()).is_some_and(|o| tag.strict_eq(o)))
    }
}

impl Default for NbtCompound {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for NbtCompound {
    /// Permissive equality: both compounds hold the same key set and, for every key,
    /// values that are [permissively equal](NbtTag::eq). Insertion order is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl IntoIterator for NbtCompound {
    type IntoIter = <Map<NbtTag> as IntoIterator>::IntoIter;
    type Item = <Map<NbtTag> as IntoIterator>::Item;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NbtCompound {
    type IntoIter = <&'a Map<NbtTag> as IntoIterator>::IntoIter;
    type Item = <&'a Map<NbtTag> as IntoIterator>::Item;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a mut NbtCompound {
    type IntoIter = <&'a mut Map<NbtTag> as IntoIterator>::IntoIter;
    type Item = (&'a String, &'a mut NbtTag);

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

impl FromIterator<(String, NbtTag)> for NbtCompound {
    #[inline]
    fn from_iter<T: IntoIterator<Item = (String, NbtTag)>>(iter: T) -> Self {
        Self(Map::from_iter(iter))
    }
}

impl<Q> std::ops::Index<&Q> for NbtCompound
where
    String: Borrow<Q>,
    Q: Eq + Hash + ?Sized,
{
    type Output = NbtTag;

    #[inline]
    fn index(&self, key: &Q) -> &NbtTag {
        &self.0[key]
    }
}

impl Extend<(String, NbtTag)> for NbtCompound {
    #[inline]
    fn extend<T: IntoIterator<Item = (String, NbtTag)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}
