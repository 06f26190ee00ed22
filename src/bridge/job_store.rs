//! # Job Store Adapter
//!
//! Composes the engine's transactional JDBC job store with host-managed
//! connections. At initialization the adapter claims the host pool staged in
//! [`PoolHandoff`], registers one transaction-managed and one independent
//! connection provider under instance-scoped names, probes the database
//! product to pick a locking strategy, and only then runs the engine's own
//! initialization. Afterwards it behaves as a normal job store, with one
//! behavioral override: completed triggers can be retained instead of
//! deleted.

use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres, Row};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::constants::{NON_TX_DATA_SOURCE_PREFIX, TX_DATA_SOURCE_PREFIX};
use crate::engine::{
    CompletionInstruction, ConnectionRegistry, JobStoreCore, LockingStrategy, TriggerKey,
};
use crate::error::{BridgeError, Result};

use super::handoff::PoolHandoff;
use super::provider::PooledConnectionProvider;

/// Database products without reliable row-level locking. Matching is
/// substring, case-insensitive, against the reported product string.
const EMBEDDED_PRODUCT_MARKERS: &[&str] = &["hsql", "h2", "sqlite"];

/// Job store specialization borrowing connections from the host pool.
pub struct JobStoreAdapter<C: JobStoreCore> {
    core: C,
    instance_id: String,
    retain_completed_triggers: bool,
    locking_strategy: LockingStrategy,
    pool: Option<PgPool>,
    initialized: bool,
}

impl<C: JobStoreCore> JobStoreAdapter<C> {
    /// Adapter for the scheduler instance `instance_id`, wrapping the
    /// engine's store core. Trigger retention defaults to on.
    pub fn new(core: C, instance_id: impl Into<String>) -> Self {
        Self {
            core,
            instance_id: instance_id.into(),
            retain_completed_triggers: true,
            locking_strategy: LockingStrategy::default(),
            pool: None,
            initialized: false,
        }
    }

    /// Control whether triggers that completed with a delete instruction are
    /// kept for auditing instead.
    pub fn with_trigger_retention(mut self, retain: bool) -> Self {
        self.retain_completed_triggers = retain;
        self
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn retains_completed_triggers(&self) -> bool {
        self.retain_completed_triggers
    }

    /// Strategy chosen during initialization; row locking until then.
    pub fn locking_strategy(&self) -> LockingStrategy {
        self.locking_strategy
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Name of this adapter's transaction-managed provider registration.
    pub fn tx_provider_name(&self) -> String {
        format!("{TX_DATA_SOURCE_PREFIX}.{}", self.instance_id)
    }

    /// Name of this adapter's independently-committing provider
    /// registration.
    pub fn non_tx_provider_name(&self) -> String {
        format!("{NON_TX_DATA_SOURCE_PREFIX}.{}", self.instance_id)
    }

    /// Run the initialization sequence. Executed once per store; the missing
    /// hand-off case fails before anything is registered, so a failed start
    /// leaves no dangling providers behind.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Err(BridgeError::configuration(
                "job_store",
                format!("job store '{}' is already initialized", self.instance_id),
            ));
        }

        let Some(pool) = PoolHandoff::take(&self.instance_id) else {
            return Err(BridgeError::configuration(
                "job_store",
                format!(
                    "no connection pool staged for scheduler instance '{}' - \
                     install one before constructing the scheduler factory",
                    self.instance_id
                ),
            ));
        };

        let registry = ConnectionRegistry::global();
        let tx_name = self.tx_provider_name();
        let non_tx_name = self.non_tx_provider_name();

        self.core.set_data_source(&tx_name);
        self.core.set_dont_set_auto_commit_false(true);
        registry.register(
            &tx_name,
            Arc::new(PooledConnectionProvider::transaction_managed(pool.clone())),
        );

        self.core.set_non_managed_tx_data_source(&non_tx_name);
        registry.register(
            &non_tx_name,
            Arc::new(PooledConnectionProvider::non_transaction_managed(
                pool.clone(),
            )),
        );

        // Best-effort dialect probe. Failure keeps the default strategy and
        // never aborts initialization.
        let strategy = match database_product(&pool).await {
            Ok(product) => {
                let strategy = locking_strategy_for_product(&product);
                if strategy == LockingStrategy::InMemorySemaphore {
                    info!(
                        instance_id = %self.instance_id,
                        product = %product,
                        "Database lacks reliable row locking; using in-memory semaphore"
                    );
                }
                strategy
            }
            Err(e) => {
                warn!(
                    instance_id = %self.instance_id,
                    error = %e,
                    "Could not detect database type. Assuming locks can be taken."
                );
                LockingStrategy::DatabaseRowLock
            }
        };
        self.core.set_locking_strategy(strategy);
        self.locking_strategy = strategy;

        if let Err(e) = self.core.initialize().await {
            registry.deregister(&tx_name);
            registry.deregister(&non_tx_name);
            return Err(e);
        }

        self.pool = Some(pool);
        self.initialized = true;

        info!(
            instance_id = %self.instance_id,
            locking_strategy = ?strategy,
            retain_completed_triggers = self.retain_completed_triggers,
            "Job store initialized with host-managed connections"
        );

        Ok(())
    }

    /// Trigger-completion hook. When retention is on, the delete instruction
    /// for a finished trigger is suppressed so the record survives for
    /// auditing; every other instruction passes through to the engine.
    pub async fn triggered_job_complete(
        &mut self,
        trigger: &TriggerKey,
        instruction: CompletionInstruction,
    ) -> Result<()> {
        if self.retain_completed_triggers && instruction == CompletionInstruction::DeleteTrigger {
            debug!(trigger = %trigger, "Retaining completed trigger instead of deleting");
            return Ok(());
        }
        self.core.triggered_job_complete(trigger, instruction).await
    }

    /// Release a connection the store is done with. The connection goes back
    /// through the host pool's accounting (drop of the pooled handle), never
    /// a hard close.
    pub fn close_connection(&self, connection: PoolConnection<Postgres>) {
        debug!(instance_id = %self.instance_id, "Releasing connection to host pool");
        drop(connection);
    }

    /// The borrowed host pool, available once initialized.
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }
}

/// Probe the database product string through the primary pool.
async fn database_product(pool: &PgPool) -> std::result::Result<String, sqlx::Error> {
    let row = sqlx::query("SELECT version()").fetch_one(pool).await?;
    row.try_get::<String, _>(0)
}

/// Pick the locking strategy for a reported database product. Embedded
/// engines without reliable row-level locking get the in-memory semaphore.
pub fn locking_strategy_for_product(product: &str) -> LockingStrategy {
    let normalized = product.to_lowercase();
    if EMBEDDED_PRODUCT_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
    {
        LockingStrategy::InMemorySemaphore
    } else {
        LockingStrategy::DatabaseRowLock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_products_downgrade_to_semaphore() {
        assert_eq!(
            locking_strategy_for_product("HSQL Database Engine"),
            LockingStrategy::InMemorySemaphore
        );
        assert_eq!(
            locking_strategy_for_product("H2"),
            LockingStrategy::InMemorySemaphore
        );
        assert_eq!(
            locking_strategy_for_product("SQLite 3.45"),
            LockingStrategy::InMemorySemaphore
        );
    }

    #[test]
    fn server_products_keep_row_locking() {
        assert_eq!(
            locking_strategy_for_product("PostgreSQL 16.2 on x86_64-pc-linux-gnu"),
            LockingStrategy::DatabaseRowLock
        );
        assert_eq!(
            locking_strategy_for_product("Oracle"),
            LockingStrategy::DatabaseRowLock
        );
    }
}
