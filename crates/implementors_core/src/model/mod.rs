//! Shard payload model shared by emitters and the registry.
//!
//! # Responsibility
//! - Define the fragment shape exchanged between emitters and sinks.
//!
//! # Invariants
//! - Payload content is display-only; nothing in core interprets markup.

pub mod fragment;
