//! Registry sink and deferred-registration dispatch.
//!
//! # Responsibility
//! - Hold the queryable crate-to-implementors registry for one trait.
//! - Route shard registrations to the sink or to a pending buffer.
//!
//! # Invariants
//! - The registry never holds two entries for one crate name.
//! - Re-registering a crate overwrites the earlier list (last write wins).
//! - A missing crate means "no known implementors", never an error.

use crate::model::fragment::{Fragment, Implementor};
use log::{debug, warn};
use std::collections::BTreeMap;

pub mod dispatcher;

/// Consumer of fragments once registration is ready.
///
/// Drained and direct fragments arrive through the same call, one at a
/// time, in application order.
pub trait ImplementorSink {
    fn accept(&mut self, fragment: Fragment);
}

/// Queryable crate-to-implementors mapping owned by the sink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImplementorRegistry {
    entries: BTreeMap<String, Vec<Implementor>>,
}

impl ImplementorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores one fragment and returns the list it replaced, if any.
    pub fn apply(&mut self, fragment: Fragment) -> Option<Vec<Implementor>> {
        let Fragment {
            crate_name,
            implementors,
        } = fragment;
        let count = implementors.len();
        let previous = self.entries.insert(crate_name.clone(), implementors);
        match &previous {
            Some(old) => warn!(
                "event=duplicate_crate module=registry status=overwritten crate={} previous_count={} count={}",
                crate_name,
                old.len(),
                count
            ),
            None => debug!(
                "event=fragment_applied module=registry status=ok crate={} count={}",
                crate_name, count
            ),
        }
        previous
    }

    /// Returns implementors contributed by one crate.
    pub fn get(&self, crate_name: &str) -> Option<&[Implementor]> {
        self.entries.get(crate_name).map(Vec::as_slice)
    }

    pub fn contains(&self, crate_name: &str) -> bool {
        self.entries.contains_key(crate_name)
    }

    /// Returns sorted crate names.
    pub fn crate_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Iterates entries sorted by crate name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Implementor])> {
        self.entries
            .iter()
            .map(|(name, implementors)| (name.as_str(), implementors.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total implementor descriptions across all crates.
    pub fn implementor_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

impl ImplementorSink for ImplementorRegistry {
    fn accept(&mut self, fragment: Fragment) {
        self.apply(fragment);
    }
}
