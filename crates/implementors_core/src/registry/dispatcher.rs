//! Deferred registration between shard emitters and the registry sink.
//!
//! # Responsibility
//! - Accept registrations before and after the sink exists.
//! - Buffer early payloads and drain them once, in arrival order.
//!
//! # Invariants
//! - State moves `Uninitialized -> Ready` exactly once; never back.
//! - The pending buffer is created on first buffered registration and is
//!   consumed by the single successful `initialize` call.
//! - `register` never fails from the emitter's perspective.
//! - An initial payload passed to `initialize` is applied before the drain.

use crate::model::fragment::ShardPayload;
use crate::registry::{ImplementorRegistry, ImplementorSink};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Payloads registered before the sink existed, in arrival order.
pub type PendingBuffer = Vec<ShardPayload>;

/// Dispatcher routing into the default registry sink.
pub type ImplementorDispatcher = Dispatcher<ImplementorRegistry>;

/// Two-state registration lifecycle.
#[derive(Debug)]
pub enum RegistrationState<S> {
    /// Sink absent; registrations are buffered. `None` until first use.
    Uninitialized { pending: Option<PendingBuffer> },
    /// Sink present; registrations are applied directly.
    Ready { sink: S },
}

/// Where one registration call ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationRoute {
    /// Appended to the pending buffer at `position` (zero-based).
    Buffered { position: usize },
    /// Applied to the sink immediately.
    Delivered { fragments: usize },
}

/// Summary of one successful initialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Fragments applied from the initializer's own payload.
    pub initial_fragments: usize,
    /// Buffered payloads drained after the initial payload.
    pub drained_payloads: usize,
    /// Fragments contained in the drained payloads.
    pub drained_fragments: usize,
}

/// Registration lifecycle errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    AlreadyInitialized,
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "implementor sink is already initialized"),
        }
    }
}

impl Error for DispatchError {}

/// Routes shard payloads to a sink that may not exist yet.
#[derive(Debug)]
pub struct Dispatcher<S> {
    state: RegistrationState<S>,
}

impl<S> Default for Dispatcher<S> {
    fn default() -> Self {
        Self {
            state: RegistrationState::Uninitialized { pending: None },
        }
    }
}

impl<S: ImplementorSink> Dispatcher<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one emitter's payload.
    ///
    /// Delivers straight to the sink when ready, otherwise appends to the
    /// pending buffer (creating it on first use).
    pub fn register(&mut self, payload: ShardPayload) -> RegistrationRoute {
        match &mut self.state {
            RegistrationState::Ready { sink } => {
                let fragments = deliver(sink, payload);
                debug!(
                    "event=payload_delivered module=dispatcher status=ok fragments={}",
                    fragments
                );
                RegistrationRoute::Delivered { fragments }
            }
            RegistrationState::Uninitialized { pending } => {
                let buffer = pending.get_or_insert_with(Vec::new);
                debug!(
                    "event=payload_buffered module=dispatcher status=ok crates={} position={}",
                    payload.crate_names().collect::<Vec<_>>().join(","),
                    buffer.len()
                );
                buffer.push(payload);
                RegistrationRoute::Buffered {
                    position: buffer.len() - 1,
                }
            }
        }
    }

    /// Installs the sink, applies `initial`, then drains the pending buffer.
    ///
    /// # Errors
    /// - Returns `AlreadyInitialized` when the sink is already installed.
    ///   The existing sink and its contents are left untouched.
    pub fn initialize(
        &mut self,
        mut sink: S,
        initial: Option<ShardPayload>,
    ) -> Result<DrainReport, DispatchError> {
        let pending = match &mut self.state {
            RegistrationState::Ready { .. } => {
                error!("event=sink_reinitialized module=dispatcher status=rejected");
                return Err(DispatchError::AlreadyInitialized);
            }
            RegistrationState::Uninitialized { pending } => pending.take().unwrap_or_default(),
        };

        let mut report = DrainReport::default();
        if let Some(payload) = initial {
            report.initial_fragments = deliver(&mut sink, payload);
        }
        report.drained_payloads = pending.len();
        for payload in pending {
            report.drained_fragments += deliver(&mut sink, payload);
        }

        self.state = RegistrationState::Ready { sink };
        info!(
            "event=sink_ready module=dispatcher status=ok initial_fragments={} drained_payloads={} drained_fragments={}",
            report.initial_fragments, report.drained_payloads, report.drained_fragments
        );
        Ok(report)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, RegistrationState::Ready { .. })
    }

    /// Number of payloads waiting for the sink.
    pub fn pending_len(&self) -> usize {
        match &self.state {
            RegistrationState::Uninitialized { pending } => pending.as_ref().map_or(0, Vec::len),
            RegistrationState::Ready { .. } => 0,
        }
    }

    pub fn state(&self) -> &RegistrationState<S> {
        &self.state
    }

    pub fn sink(&self) -> Option<&S> {
        match &self.state {
            RegistrationState::Ready { sink } => Some(sink),
            RegistrationState::Uninitialized { .. } => None,
        }
    }

    pub fn sink_mut(&mut self) -> Option<&mut S> {
        match &mut self.state {
            RegistrationState::Ready { sink } => Some(sink),
            RegistrationState::Uninitialized { .. } => None,
        }
    }

    pub fn into_sink(self) -> Option<S> {
        match self.state {
            RegistrationState::Ready { sink } => Some(sink),
            RegistrationState::Uninitialized { .. } => None,
        }
    }
}

fn deliver<S: ImplementorSink>(sink: &mut S, payload: ShardPayload) -> usize {
    let mut count = 0;
    for fragment in payload {
        sink.accept(fragment);
        count += 1;
    }
    count
}
