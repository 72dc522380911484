//! Environment snapshots and merging.
//!
//! `Env` is an explicit, immutable snapshot of environment variables.
//! Callers take a snapshot once and pass it down the call chain; merging
//! produces a fresh mapping and never touches the live process environment.

use std::collections::BTreeMap;

/// An ordered mapping of environment variable names to values.
///
/// Keys are unique; applying overrides is last-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env(BTreeMap<String, String>);

impl Env {
    /// An empty environment.
    pub fn empty() -> Self {
        Env(BTreeMap::new())
    }

    /// Snapshot the current process environment. Variables whose name or
    /// value is not valid Unicode are captured lossily rather than aborting.
    pub fn snapshot() -> Self {
        Env(std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect())
    }

    /// Return a new `Env` equal to `self` with `overrides` applied on top.
    /// On key collision the override replaces the base value. `self` is
    /// left untouched.
    pub fn merged<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = self.0.clone();
        for (k, v) in overrides {
            map.insert(k.into(), v.into());
        }
        Env(map)
    }

    /// Builder-style insert on an owned value.
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.as_str())
    }

    /// Iterate over `(name, value)` pairs in key order.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of variables in the snapshot.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Env(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
