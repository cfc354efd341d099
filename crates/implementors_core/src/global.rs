//! Process-wide registration bindings.
//!
//! # Responsibility
//! - Provide the single process-wide dispatcher that shards register into
//!   and hosting code initializes.
//!
//! # Invariants
//! - The check for readiness and the buffering append happen under one lock,
//!   so no registration can land in a buffer that was already drained.
//! - Lock poisoning is recovered; dispatcher state is append-only.
//!
//! Prefer passing an owned `Dispatcher` by reference; these bindings exist for
//! hosts that cannot thread one through.

use crate::model::fragment::ShardPayload;
use crate::registry::dispatcher::{
    DispatchError, DrainReport, ImplementorDispatcher, RegistrationRoute,
};
use crate::registry::ImplementorRegistry;
use once_cell::sync::Lazy;
use std::sync::{Mutex, MutexGuard, PoisonError};

static DISPATCHER: Lazy<Mutex<ImplementorDispatcher>> =
    Lazy::new(|| Mutex::new(ImplementorDispatcher::new()));

fn dispatcher() -> MutexGuard<'static, ImplementorDispatcher> {
    DISPATCHER.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registers one shard payload with the process-wide dispatcher.
pub fn register_implementors(payload: ShardPayload) -> RegistrationRoute {
    dispatcher().register(payload)
}

/// Installs the process-wide registry and drains buffered shards.
///
/// # Errors
/// - Returns `AlreadyInitialized` on every call after the first success.
pub fn initialize_implementors(
    initial: Option<ShardPayload>,
) -> Result<DrainReport, DispatchError> {
    dispatcher().initialize(ImplementorRegistry::new(), initial)
}

/// Returns whether the process-wide registry has been initialized.
pub fn is_initialized() -> bool {
    dispatcher().is_ready()
}

/// Runs `f` against the process-wide registry.
///
/// Returns `None` while the registry is not initialized.
pub fn with_registry<R>(f: impl FnOnce(&ImplementorRegistry) -> R) -> Option<R> {
    let guard = dispatcher();
    guard.sink().map(f)
}
