//! Capability matching and ranking for agent action discovery.
//!
//! Other agents advertise the actions they can perform as descriptors (name,
//! description, alternate names, capability tags). This crate scores a
//! catalog of such descriptors against a structured query and returns a
//! deterministic, thresholded, sorted shortlist.
//!
//! The engine is a pure computation over in-memory inputs: sourcing
//! descriptors from wherever advertisements are published (ledger events,
//! registries) and persisting discovery results belong to the caller.

pub mod config;
pub mod error;
pub mod matcher;
pub mod types;

pub use config::*;
pub use error::*;
pub use matcher::*;
pub use types::*;
