#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Quartz Bridge
//!
//! Adapts a host application's configuration tree and connection pool to the
//! bootstrap format and extension points of an external, Quartz-compatible
//! job-scheduling engine. The engine's trigger firing, misfire recovery and
//! clustering stay entirely on its side of the seam; this crate only
//! translates and bridges.
//!
//! ## What it does
//!
//! - **Configuration flattening**: a typed, nested configuration tree is
//!   serialized into the flat `org.quartz.*` key/value set the engine's
//!   string-keyed factory consumes ([`config`]).
//! - **Connection bridging**: the engine's JDBC-backed job store borrows
//!   connections from the pool the host owns, instead of a pool the engine
//!   creates itself ([`bridge`]).
//! - **Dialect-aware locking**: at job-store initialization the database
//!   product is probed and the engine's locking strategy downgraded for
//!   embedded databases that cannot satisfy row-locking SQL.
//!
//! ## Data flow
//!
//! ```text
//! host config ─► BridgeConfigLoader ─► flatten ─► engine bootstrap
//! host pool   ─► PoolHandoff ─► JobStoreAdapter ─► ConnectionRegistry
//!                                      │
//!                                      └─► engine threads borrow host
//!                                          connections via the registry
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use quartz_bridge::bootstrap::prepare_scheduler;
//! use quartz_bridge::config::BridgeConfigLoader;
//! use sqlx::PgPool;
//!
//! # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
//! let config = BridgeConfigLoader::new("config").load()?;
//! let bootstrap = prepare_scheduler(&config, pool)?;
//!
//! // Hand bootstrap.properties to the engine factory; construct the job
//! // store adapter with bootstrap.instance_id so it claims the staged pool.
//! for (key, value) in &bootstrap.properties {
//!     println!("{key} = {value}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod bridge;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod logging;

pub use bootstrap::{prepare_scheduler, SchedulerBootstrap};
pub use bridge::{JobStoreAdapter, PoolHandoff, PooledConnectionProvider};
pub use config::{flatten, BridgeConfig, BridgeConfigLoader, FlatPropertyMap, QuartzProperties};
pub use engine::{
    CompletionInstruction, ConnectionProvider, ConnectionRegistry, JobStoreCore, LockingStrategy,
    TriggerKey,
};
pub use error::{BridgeError, Result};
