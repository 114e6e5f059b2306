// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment variable management.
//!
//! ```text
//! Env (copy-on-write Arc<BTreeMap<EnvKey, String>>)
//! Sources: Env::new(), Env::parse_assignments(text), FromIterator
//! Ops:     set/get/iter
//! ```
//!
//! `Env` is an overlay of variables layered on top of the inherited
//! environment of a child process. Published variables live
//! here rather than in the process environment, which is never mutated.

mod types;


use std::collections::BTreeMap;
use std::sync::Arc;

use types::EnvKey;

/// A set of environment variables with copy-on-write semantics.
///
/// Clones share data until one of them is modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    vars: Arc<BTreeMap<EnvKey, String>>,
}

impl Env {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `KEY=VALUE` lines, as printed by `set` on Windows.
    ///
    /// Lines without `=` or with an empty key are skipped. Only the first `=`
    /// splits, so values may contain `=`.
    #[must_use]
    pub fn parse_assignments(text: &str) -> Self {
        text.lines()
            .filter_map(|line| {
                let line = line.trim_end_matches('\r');
                let (key, value) = line.split_once('=')?;
                let key = key.trim();
                (!key.is_empty()).then(|| (key.to_string(), value.to_string()))
            })
            .collect()
    }

    /// Sets an environment variable, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        Arc::make_mut(&mut self.vars).insert(EnvKey::new(key), value.into());
        self
    }

    /// Gets an environment variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(&EnvKey::new(key)).map(String::as_str)
    }

    /// Returns an iterator over environment variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns true if no variables are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter
            .into_iter()
            .map(|(k, v)| (EnvKey::new(k), v.into()))
            .collect();
        Self {
            vars: Arc::new(vars),
        }
    }
}
