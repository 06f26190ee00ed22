//! # Host-to-Engine Bridging
//!
//! The pieces that let the engine's persistence layer borrow connections from
//! the pool the host application owns:
//!
//! - [`handoff`] — hands the host pool across the reflective construction
//!   boundary to a job store the engine builds by name
//! - [`provider`] — implements the engine's connection-provider extension
//!   point on top of the host pool
//! - [`job_store`] — composes the engine's transactional job store with
//!   host-managed connections, a database-dialect locking probe, and a
//!   trigger-retention override

pub mod handoff;
pub mod job_store;
pub mod provider;

pub use handoff::PoolHandoff;
pub use job_store::JobStoreAdapter;
pub use provider::PooledConnectionProvider;
