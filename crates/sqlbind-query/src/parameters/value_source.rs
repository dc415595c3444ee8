//! Value sources for bind variable substitution
//!
//! A value source answers one question: what is the value of the bind
//! variable called `name`? `None` means the variable does not exist, which
//! is different from a present-but-empty value (substituted as `NULL`).

use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;
use sqlbind_core::Value;

/// Lookup-by-name capability consumed by the rewriter.
pub trait ValueSource {
    /// Returns the value bound to `name`, or `None` if there is none.
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl<T: ValueSource + ?Sized> ValueSource for &T {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).lookup(name)
    }
}

impl<K, S> ValueSource for HashMap<K, String, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl<K, S> ValueSource for HashMap<K, Value, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(Value::to_bind_text)
    }
}

impl<K> ValueSource for BTreeMap<K, String>
where
    K: Borrow<str> + Ord,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl<K, S> ValueSource for IndexMap<K, String, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

/// An ordered set of key/value pairs in which keys may repeat.
///
/// Lookups are case-sensitive and return the first matching field, so a
/// later `put` of an existing key does not shadow the earlier one. Use
/// [`NamedSet::update`] to replace a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedSet {
    name: Option<String>,
    fields: Vec<(String, String)>,
}

impl NamedSet {
    /// Create an empty, unnamed set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            fields: Vec::new(),
        }
    }

    /// The set's name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Append a field and return its index
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> usize {
        self.fields.push((key.into(), value.into()));
        self.fields.len() - 1
    }

    /// Replace the first field named `key`, or append it if absent
    pub fn update(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value.into(),
            None => self.fields.push((key, value.into())),
        }
    }

    /// Value of the first field named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove the first field named `key`, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(index).1)
    }

    /// Number of fields, duplicates included
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the set has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl ValueSource for NamedSet {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(Cow::Borrowed)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NamedSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = NamedSet::new();
        set.extend(iter);
        set
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for NamedSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.fields
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

/// A value source backed by a closure, e.g. a script interpreter's
/// variable table.
pub struct FnSource<F>(F);

impl<F> std::fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource").finish_non_exhaustive()
    }
}

impl<F> ValueSource for FnSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        (self.0)(name).map(Cow::Owned)
    }
}

/// Wrap a lookup closure as a [`ValueSource`].
///
/// ```
/// use sqlbind_query::parameters::{ValueSource, from_fn};
///
/// let source = from_fn(|name| (name == "id").then(|| "42".to_string()));
/// assert_eq!(source.lookup("id").as_deref(), Some("42"));
/// assert_eq!(source.lookup("other"), None);
/// ```
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    FnSource(f)
}
