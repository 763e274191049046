//! Request parameter sets for Zoho API calls.

use std::collections::BTreeMap;

/// An ordered set of form parameters for one API call.
///
/// Values are stringified on insertion so non-string inputs (integers,
/// booleans) round-trip through their display form before form-encoding.
/// The dispatcher always clones the caller's set before merging session
/// state in, so a `Params` handed to a call is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: BTreeMap<String, String>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, stringifying the value.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.entries.insert(key.into(), value.to_string());
        self
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Get a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate over parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the set holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}
