use std::{fmt, slice};
use std::fmt::Formatter;

use crate::repr::{NbtReprError, NbtStructureError};

use super::{NbtCompound, NbtTag, TagId};


/// The NBT tag list type: an ordered sequence of tags which all share one variant.
///
/// The list remembers its element tag id. An empty list has the element id
/// [`TagId::End`]; the first insertion locks the id, and every mutating operation
/// checks candidates against it, so a mismatched insert fails with
/// [`NbtStructureError::MismatchedListElement`]. [`clear`](Self::clear) (or removing
/// the last element) resets the id to `End`.
///
/// The one escape hatch is [`get_tag_mut`](Self::get_tag_mut), through which a
/// caller can overwrite an element's variant in place; the binary writer re-checks
/// homogeneity as a backstop and refuses to encode such a list.
#[derive(Clone)]
pub struct NbtList {
    element_id: TagId,
    tags:       Vec<NbtTag>,
}

impl NbtList {
    /// Returns a new, empty NBT tag list.
    #[inline]
    pub const fn new() -> Self {
        Self {
            element_id: TagId::End,
            tags:       Vec::new(),
        }
    }

    /// Returns a new NBT tag list with the given initial capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            element_id: TagId::End,
            tags:       Vec::with_capacity(capacity),
        }
    }

    /// Assembles a list from parts the caller has already verified to be homogeneous.
    pub(crate) fn from_parts(element_id: TagId, tags: Vec<NbtTag>) -> Self {
        debug_assert!(
            tags.iter().all(|tag| tag.id() == element_id),
            "from_parts called with a non-homogeneous vec",
        );
        Self { element_id, tags }
    }

    /// The tag id shared by every element of this list, or [`TagId::End`] if the
    /// list is empty.
    #[inline]
    pub fn element_id(&self) -> TagId {
        self.element_id
    }

    /// Returns the length of this list.
    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if this tag list has a length of zero, false otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The elements of this list as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[NbtTag] {
        &self.tags
    }

    /// Iterates over references to each tag in this list.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, NbtTag> {
        self.tags.iter()
    }

    /// Returns the value of the tag at the given index, or an error if the index is
    /// out of bounds or the tag cannot convert to the specified type. This method
    /// should be used for obtaining primitives and shared references to lists and
    /// compounds.
    #[inline]
    pub fn get<'a, T>(&'a self, index: usize) -> Result<T, NbtReprError>
    where
        T: TryFrom<&'a NbtTag>,
        T::Error: Into<anyhow::Error>,
    {
        T::try_from(
            self.tags
                .get(index)
                .ok_or_else(|| NbtStructureError::invalid_index(index, self.len()))?,
        )
        .map_err(NbtReprError::from_any)
    }

    /// Returns a reference to the tag at the given index without any casting,
    /// or `None` if the index is out of bounds.
    #[inline]
    pub fn get_tag(&self, index: usize) -> Option<&NbtTag> {
        self.tags.get(index)
    }

    /// Returns a mutable reference to the tag at the given index without any casting,
    /// or `None` if the index is out of bounds.
    ///
    /// Mutating the payload in place is fine; overwriting the element with a tag of a
    /// different variant leaves the list inconsistent and will be rejected when the
    /// list is encoded. Prefer [`set`](Self::set) for replacement.
    #[inline]
    pub fn get_tag_mut(&mut self, index: usize) -> Option<&mut NbtTag> {
        self.tags.get_mut(index)
    }

    /// Appends the given value to the back of the list after wrapping it in an
    /// `NbtTag`, or fails if its variant does not match the list's element id.
    /// Pushing onto an empty list locks the element id to the pushed tag's variant.
    pub fn push<T: Into<NbtTag>>(&mut self, value: T) -> Result<(), NbtStructureError> {
        let tag = value.into();
        self.admit(&tag)?;
        self.tags.push(tag);
        Ok(())
    }

    /// Inserts the given value at the given index, shifting later elements back.
    /// Fails if the index is greater than the length or the value's variant does not
    /// match the list's element id.
    pub fn insert<T: Into<NbtTag>>(
        &mut self,
        index: usize,
        value: T,
    ) -> Result<(), NbtStructureError> {
        if index > self.tags.len() {
            return Err(NbtStructureError::invalid_index(index, self.len()));
        }
        let tag = value.into();
        self.admit(&tag)?;
        self.tags.insert(index, tag);
        Ok(())
    }

    /// Replaces the element at the given index, returning the previous element.
    /// Fails if the index is out of bounds or the value's variant does not match the
    /// list's element id.
    pub fn set<T: Into<NbtTag>>(
        &mut self,
        index: usize,
        value: T,
    ) -> Result<NbtTag, NbtStructureError> {
        if index >= self.tags.len() {
            return Err(NbtStructureError::invalid_index(index, self.tags.len()));
        }
        let tag = value.into();
        self.admit(&tag)?;
        Ok(std::mem::replace(&mut self.tags[index], tag))
    }

    /// Appends every value from the given iterable, or fails on the first value whose
    /// variant does not match the list's element id. Elements accepted before the
    /// failure remain in the list.
    pub fn try_extend<T, I>(&mut self, values: I) -> Result<(), NbtStructureError>
    where
        T: Into<NbtTag>,
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.push(value)?;
        }
        Ok(())
    }

    /// While preserving the order of the remaining elements, removes and returns the
    /// tag at the given index, or returns `None` if the index is out of bounds.
    /// Removing the last element resets the element id to `End`.
    pub fn remove(&mut self, index: usize) -> Option<NbtTag> {
        if index >= self.tags.len() {
            return None;
        }
        let tag = self.tags.remove(index);
        if self.tags.is_empty() {
            self.element_id = TagId::End;
        }
        Some(tag)
    }

    /// Removes and returns the last element of the list, or `None` if it is empty.
    /// Removing the last element resets the element id to `End`.
    pub fn pop(&mut self) -> Option<NbtTag> {
        let tag = self.tags.pop();
        if self.tags.is_empty() {
            self.element_id = TagId::End;
        }
        tag
    }

    /// Removes all elements and resets the element id to `End`.
    pub fn clear(&mut self) {
        self.tags.clear();
        self.element_id = TagId::End;
    }

    /// Checks a candidate element against the element id, locking the id if the list
    /// is currently empty.
    fn admit(&mut self, tag: &NbtTag) -> Result<(), NbtStructureError> {
        if self.tags.is_empty() {
            self.element_id = tag.id();
            Ok(())
        } else if tag.id() == self.element_id {
            Ok(())
        } else {
            Err(NbtStructureError::mismatched_list_element(
                self.element_id,
                tag.id(),
            ))
        }
    }

    /// Converts this list into a valid SNBT string with no extraneous spacing.
    #[inline]
    pub fn to_snbt(&self) -> String {
        format!("{self}")
    }

    /// Converts this list into a valid SNBT string with extra spacing for
    /// readability, indented by four spaces per level.
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
            return write!(f, "[]");
        }

        if pretty {
            indent.push_str(unit);
            write!(f, "[\n")?;
        } else {
            write!(f, "[")?;
        }

        let last_index = self.len() - 1;
        for (index, element) in self.tags.iter().enumerate() {
            if pretty {
                write!(f, "{indent}")?;
            }

            element.fmt_snbt(f, indent, unit, pretty)?;

            if index != last_index {
                write!(f, "{}", if pretty { ",\n" } else { "," })?;
            }
        }

        if pretty {
            indent.truncate(indent.len() - unit.len());
            write!(f, "\n{indent}]")
        } else {
            write!(f, "]")
        }
    }

    pub(crate) fn strict_eq_impl(&self, other: &Self) -> bool {
        self.element_id == other.element_id
            && self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.strict_eq(b))
    }
}

impl Default for NbtList {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for NbtList {
    /// Permissive equality: elementwise [permissive equality](NbtTag::eq) of the
    /// tags, ignoring the element id (which the payloads already determine).
    fn eq(&self, other: &Self) -> bool {
        self.tags == other.tags
    }
}

/// Checks homogeneity, locking the element id to the variant of the first tag.
impl TryFrom<Vec<NbtTag>> for NbtList {
    type Error = NbtStructureError;

    fn try_from(tags: Vec<NbtTag>) -> Result<Self, Self::Error> {
        let mut list = Self::with_capacity(tags.len());
        list.try_extend(tags)?;
        Ok(list)
    }
}

// Conversions from vecs of types which map to a single tag variant; these cannot
// produce a mixed list, so no checking is involved.
macro_rules! list_from {
    ($($type:ty),* $(,)?) => {
        $(
            impl From<Vec<$type>> for NbtList {
                fn from(values: Vec<$type>) -> Self {
                    let tags: Vec<NbtTag> = values.into_iter().map(Into::into).collect();
                    let element_id = tags.first().map_or(TagId::End, NbtTag::id);
                    Self::from_parts(element_id, tags)
                }
            }
        )*
    };
}

list_from!(i8, i16, i32, i64, f32, f64, String, &str, NbtList, NbtCompound);

impl IntoIterator for NbtList {
    type IntoIter = <Vec<NbtTag> as IntoIterator>::IntoIter;
    type Item = NbtTag;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

impl<'a> IntoIterator for &'a NbtList {
    type IntoIter = slice::Iter<'a, NbtTag>;
    type Item = &'a NbtTag;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl AsRef<[NbtTag]> for NbtList {
    #[inline]
    fn as_ref(&self) -> &[NbtTag] {
        &self.tags
    }
}

impl std::ops::Index<usize> for NbtList {
    type Output = NbtTag;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.tags[index]
    }
}
