//! Shard emitter: builds one payload and registers it once.

use crate::model::fragment::{Fragment, Implementor, ShardPayload};
use crate::registry::dispatcher::{Dispatcher, RegistrationRoute};
use crate::registry::ImplementorSink;

/// One independently produced shard.
///
/// `emit` consumes the emitter, so each shard registers exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardEmitter {
    payload: ShardPayload,
}

impl ShardEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one crate's implementor list to this shard.
    pub fn with_crate<I, T>(mut self, crate_name: impl Into<String>, implementors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Implementor>,
    {
        self.payload.push(Fragment::new(crate_name, implementors));
        self
    }

    pub fn payload(&self) -> &ShardPayload {
        &self.payload
    }

    /// Hands the whole local mapping to the dispatcher in one call.
    pub fn emit<S: ImplementorSink>(self, dispatcher: &mut Dispatcher<S>) -> RegistrationRoute {
        dispatcher.register(self.payload)
    }
}

impl From<ShardPayload> for ShardEmitter {
    fn from(payload: ShardPayload) -> Self {
        Self { payload }
    }
}
