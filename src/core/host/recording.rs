// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory [`Host`] for unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{Host, Matcher};
use crate::error::Result;

/// A matcher registration event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatcherEvent {
    Added(Matcher),
    Removed(Matcher),
}

#[derive(Default)]
pub(crate) struct RecordingHost {
    variables: Mutex<BTreeMap<String, String>>,
    outputs: Mutex<BTreeMap<String, String>>,
    events: Mutex<Vec<MatcherEvent>>,
}

impl RecordingHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pre-sets a variable, as if inherited from the job.
    pub(crate) fn with_variable(self, name: &str, value: &str) -> Self {
        self.variables
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        self
    }

    pub(crate) fn variables(&self) -> BTreeMap<String, String> {
        self.variables.lock().unwrap().clone()
    }

    pub(crate) fn outputs(&self) -> BTreeMap<String, String> {
        self.outputs.lock().unwrap().clone()
    }

    pub(crate) fn events(&self) -> Vec<MatcherEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Host for RecordingHost {
    fn set_variable(&self, name: &str, value: &str) -> Result<()> {
        self.variables
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn variable(&self, name: &str) -> Option<String> {
        self.variables.lock().unwrap().get(name).cloned()
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        self.outputs
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn add_matcher(&self, matcher: Matcher) -> Result<()> {
        self.events.lock().unwrap().push(MatcherEvent::Added(matcher));
        Ok(())
    }

    fn remove_matcher(&self, matcher: Matcher) {
        self.events
            .lock()
            .unwrap()
            .push(MatcherEvent::Removed(matcher));
    }
}
