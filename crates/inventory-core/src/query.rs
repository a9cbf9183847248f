//! Convenience builder for HTTP query parameters.
//!
//! Lookup filters such as `?mac=` are assembled here so resource clients
//! pass plain key/value pairs to the transport.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Start a builder holding a single required pair.
    #[must_use]
    pub fn single<T>(key: &'static str, value: T) -> Self
    where
        T: Display,
    {
        let mut params = Self::new();
        params.push(key, value);
        params
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Borrow the collected key/value pairs.
    #[must_use]
    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
