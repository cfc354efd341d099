//! Order-independent registration of per-crate trait implementor shards.
//!
//! Shards register whenever they load; the registry sink may appear before,
//! after or between them. Early shards are buffered and drained once, in
//! arrival order, when the sink initializes.

pub mod emitter;
pub mod global;
pub mod index;
pub mod logging;
pub mod model;
pub mod registry;
pub mod shard;

pub use emitter::ShardEmitter;
pub use global::{initialize_implementors, is_initialized, register_implementors, with_registry};
pub use index::TraitIndex;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::fragment::{Fragment, Implementor, ShardPayload};
pub use registry::dispatcher::{
    DispatchError, Dispatcher, DrainReport, ImplementorDispatcher, PendingBuffer,
    RegistrationRoute, RegistrationState,
};
pub use registry::{ImplementorRegistry, ImplementorSink};
pub use shard::{load_shard_file, ShardError, ShardResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
