use std::collections::HashMap;
use std::collections::hash_map;

/// Response header fields.
///
/// Names are stored in lowercase, lookup is case-insensitive. Inserting a name that already
/// exists replaces its value, so the last occurrence on the wire wins.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    fields: HashMap<String, String>,
}

impl HeaderMap {
    /// Create new empty [`HeaderMap`].
    ///
    /// This function does not allocate.
    #[inline]
    pub fn new() -> Self {
        Self { fields: HashMap::new() }
    }

    /// Returns headers length.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if headers has no element.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if the map contains a value for given header name.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the value of given header name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = if name.bytes().any(|b| b.is_ascii_uppercase()) {
            self.fields.get(&name.to_ascii_lowercase())
        } else {
            self.fields.get(name)
        };
        value.map(String::as_str)
    }

    /// Returns `true` if the header value equals `value`, ignoring ASCII case.
    #[inline]
    pub fn value_eq_ignore_case(&self, name: &str, value: &str) -> bool {
        self.get(name).is_some_and(|v| v.eq_ignore_ascii_case(value))
    }

    /// Insert a header field, returning the replaced value if any.
    ///
    /// `name` is lowercased before insertion.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let mut name = name.into();
        name.make_ascii_lowercase();
        self.fields.insert(name, value.into())
    }

    /// Remove a header field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(&name.to_ascii_lowercase())
    }

    /// Clear the map, keeping the allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Returns an iterator over header fields, in arbitrary order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.fields.iter() }
    }
}

/// Iterator over [`HeaderMap`] fields, created by [`HeaderMap::iter`].
#[derive(Debug)]
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a str, &'a str);

    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for HeaderMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
