//! Per-trait implementor index.
//!
//! # Responsibility
//! - Keep one independent dispatcher per trait page.
//! - Let emitters and initializers touch a trait in either order.
//!
//! # Invariants
//! - A trait's dispatcher is created on first touch and never removed.
//! - Traits never share buffers or registries.

use crate::model::fragment::{Implementor, ShardPayload};
use crate::registry::dispatcher::{
    DispatchError, DrainReport, ImplementorDispatcher, RegistrationRoute,
};
use crate::registry::ImplementorRegistry;
use std::collections::BTreeMap;

/// Trait-path keyed collection of implementor dispatchers.
#[derive(Debug, Default)]
pub struct TraitIndex {
    traits: BTreeMap<String, ImplementorDispatcher>,
}

impl TraitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one shard payload for `trait_path`.
    pub fn register(&mut self, trait_path: &str, payload: ShardPayload) -> RegistrationRoute {
        self.entry(trait_path).register(payload)
    }

    /// Initializes the registry for `trait_path` and drains its buffer.
    pub fn initialize(
        &mut self,
        trait_path: &str,
        initial: Option<ShardPayload>,
    ) -> Result<DrainReport, DispatchError> {
        self.entry(trait_path)
            .initialize(ImplementorRegistry::new(), initial)
    }

    /// Returns one crate's implementors of one trait.
    ///
    /// `None` covers unknown traits, uninitialized traits and unknown crates.
    pub fn implementors(&self, trait_path: &str, crate_name: &str) -> Option<&[Implementor]> {
        self.registry(trait_path)?.get(crate_name)
    }

    /// Returns the ready registry for `trait_path`.
    pub fn registry(&self, trait_path: &str) -> Option<&ImplementorRegistry> {
        self.traits.get(trait_path)?.sink()
    }

    pub fn dispatcher(&self, trait_path: &str) -> Option<&ImplementorDispatcher> {
        self.traits.get(trait_path)
    }

    /// Returns sorted trait paths seen so far.
    pub fn trait_paths(&self) -> Vec<&str> {
        self.traits.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    fn entry(&mut self, trait_path: &str) -> &mut ImplementorDispatcher {
        self.traits.entry(trait_path.to_string()).or_default()
    }
}
