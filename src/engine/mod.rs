//! # Engine Contracts
//!
//! The small surface of the external scheduling engine that the bridge
//! touches. The engine's trigger-firing state machine, misfire recovery and
//! clustering all live behind these seams; the bridge only implements its
//! connection-provider extension point and composes over the published
//! surface of its transactional JDBC job store.
//!
//! Composition replaces the subclass-with-two-overrides shape: the override
//! points (`initialize`, `close_connection`, trigger completion) are explicit
//! trait methods on [`JobStoreCore`] that the adapter wraps and delegates to.

pub mod registry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::pool::PoolConnection;
use sqlx::Postgres;

use crate::error::Result;

pub use registry::ConnectionRegistry;

/// The engine's extension point for obtaining database connections from an
/// arbitrary source. Registered by name with the [`ConnectionRegistry`];
/// the engine's internal threads call [`ConnectionProvider::connection`]
/// whenever they need one. Calls block on the caller's task; no dispatch is
/// introduced at this layer.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Borrow a connection. Failures propagate to the engine unchanged.
    async fn connection(&self) -> Result<PoolConnection<Postgres>>;

    /// Called once when the engine wires the provider in.
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Called when the engine shuts down.
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

/// Mechanism the engine uses to serialize trigger acquisition across threads
/// and cluster nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockingStrategy {
    /// Row-level `SELECT ... FOR UPDATE` against the engine's lock table
    DatabaseRowLock,
    /// In-process semaphore, for databases without reliable row locking
    InMemorySemaphore,
}

impl Default for LockingStrategy {
    fn default() -> Self {
        Self::DatabaseRowLock
    }
}

/// Identity of a trigger within the engine's store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerKey {
    pub name: String,
    pub group: String,
}

impl TriggerKey {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }
}

impl std::fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

/// Instruction the engine derives from a completed trigger firing. Only
/// `DeleteTrigger` is ever intercepted by the bridge; everything else passes
/// through to the store untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionInstruction {
    NoInstruction,
    ReExecuteJob,
    SetTriggerComplete,
    DeleteTrigger,
    SetTriggerError,
    SetAllJobTriggersComplete,
    SetAllJobTriggersError,
}

/// Published surface of the engine's transactional JDBC job store that the
/// bridge's adapter composes over. Setter calls configure the store before
/// [`JobStoreCore::initialize`] runs the engine's own initialization.
#[async_trait]
pub trait JobStoreCore: Send + Sync {
    /// Name of the registered provider used for transaction-managed work
    fn set_data_source(&mut self, provider_name: &str);

    /// Name of the registered provider used for work that must commit
    /// independently of the caller's transaction (cluster check-in et al.)
    fn set_non_managed_tx_data_source(&mut self, provider_name: &str);

    /// The host pool hands out connections with autocommit already managed;
    /// the store must not force it off again.
    fn set_dont_set_auto_commit_false(&mut self, value: bool);

    fn set_locking_strategy(&mut self, strategy: LockingStrategy);

    /// The engine's own initialization, run after the data sources and
    /// locking strategy are in place.
    async fn initialize(&mut self) -> Result<()>;

    /// The engine's trigger-completion bookkeeping.
    async fn triggered_job_complete(
        &mut self,
        trigger: &TriggerKey,
        instruction: CompletionInstruction,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locking_strategy_defaults_to_row_lock() {
        assert_eq!(LockingStrategy::default(), LockingStrategy::DatabaseRowLock);
    }

    #[test]
    fn trigger_key_displays_group_first() {
        let key = TriggerKey::new("nightly", "reports");
        assert_eq!(key.to_string(), "reports.nightly");
    }
}
