use serde::{Deserialize, Serialize};

/// Either a single value or an ordered sequence of values.
///
/// JSON:API uses the same member for both shapes: primary `data` is a
/// resource object or an array of them, and relationship linkage is an
/// identifier (to-one) or an array of identifiers (to-many).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    // `Many` must come first: serde would otherwise try to read an array as a
    // struct in sequence form.
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn as_one(&self) -> Option<&T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[T]> {
        match self {
            OneOrMany::One(_) => None,
            OneOrMany::Many(items) => Some(items),
        }
    }

    pub fn as_ref(&self) -> OneOrMany<&T> {
        match self {
            OneOrMany::One(item) => OneOrMany::One(item),
            OneOrMany::Many(items) => OneOrMany::Many(items.iter().collect()),
        }
    }

    /// Apply `f` to every element, keeping the shape.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> OneOrMany<U> {
        match self {
            OneOrMany::One(item) => OneOrMany::One(f(item)),
            OneOrMany::Many(items) => OneOrMany::Many(items.into_iter().map(f).collect()),
        }
    }

    /// Fallible [`OneOrMany::map`]; stops at the first error.
    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<OneOrMany<U>, E> {
        Ok(match self {
            OneOrMany::One(item) => OneOrMany::One(f(item)?),
            OneOrMany::Many(items) => {
                OneOrMany::Many(items.into_iter().map(f).collect::<Result<_, _>>()?)
            }
        })
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<'a, T> IntoIterator for &'a OneOrMany<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
