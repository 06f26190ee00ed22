//! # Scheduler Configuration Tree
//!
//! Typed configuration for the external scheduling engine, mirroring the
//! engine's own property namespace. The tree is loaded once at startup
//! (see [`loader`]), validated, and then flattened (see [`flatten`]) into the
//! single-level `org.quartz.*` key/value set the engine's bootstrap consumes.
//!
//! Every leaf is optional: an absent field contributes no key to the
//! flattened output. Field spellings matter — serde renames reproduce the
//! engine's exact key names (`userTransactionURL`, `selectWithLockSQL`),
//! so the dotted path of any field here is also its bootstrap key.

pub mod flatten;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{BridgeError, Result};

pub use flatten::{flatten, FlatPropertyMap};
pub use loader::BridgeConfigLoader;

/// Root configuration consumed by the bridge: the engine property tree, the
/// flat class-selection extras, and the bridge's own behavior switches.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Engine property tree flattened into `org.quartz.*` keys
    #[serde(default)]
    pub quartz: QuartzProperties,

    /// Flat class-selection keys merged in after the tree walk
    #[serde(default)]
    pub extra: ExtraProperties,

    /// Keep trigger records that the engine would delete after their final
    /// firing. Hosts wanting auditable trigger history leave this on.
    #[serde(default = "default_retain")]
    pub retain_completed_triggers: bool,
}

fn default_retain() -> bool {
    true
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            quartz: QuartzProperties::default(),
            extra: ExtraProperties::default(),
            retain_completed_triggers: true,
        }
    }
}

/// Engine property tree under the `org.quartz` namespace
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuartzProperties {
    pub scheduler: Option<SchedulerProperties>,
    pub job_store: Option<JobStoreProperties>,
    pub thread_pool: Option<ThreadPoolProperties>,

    /// Named data-source definitions, one flattened key per name
    #[serde(default)]
    pub data_source: HashMap<String, BTreeMap<String, String>>,

    /// Job listener definitions, keyed `NAME.property`
    #[serde(default)]
    pub job_listener: HashMap<String, String>,

    /// Trigger listener definitions, keyed `NAME.property`
    #[serde(default)]
    pub trigger_listener: HashMap<String, String>,

    pub plugin: Option<PluginProperties>,
    pub context: Option<ContextProperties>,
}

/// `org.quartz.scheduler.*` settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerProperties {
    pub instance_name: Option<String>,
    pub instance_id: Option<String>,
    pub thread_name: Option<String>,
    pub make_scheduler_thread_daemon: Option<bool>,
    pub threads_inherit_context_class_loader_of_initializer: Option<bool>,
    pub idle_wait_time: Option<u64>,
    pub db_failure_retry_interval: Option<u64>,
    #[serde(rename = "userTransactionURL")]
    pub user_transaction_url: Option<String>,
    pub wrap_job_execution_in_user_transaction: Option<bool>,
    pub skip_update_check: Option<bool>,
    pub batch_trigger_acquisition_max_count: Option<u32>,
    pub batch_trigger_acquisition_fire_ahead_time_window: Option<u64>,

    /// Excluded from the generic walk and reinserted only when present, so an
    /// absent group never publishes spurious RMI keys the engine would choke
    /// on at parse time.
    pub rmi: Option<RmiProperties>,
}

/// `org.quartz.scheduler.rmi.*` settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RmiProperties {
    pub export: Option<bool>,
    pub registry_host: Option<String>,
    pub registry_port: Option<u16>,
    pub create_registry: Option<String>,
    pub server_port: Option<u16>,
    pub proxy: Option<bool>,
}

/// `org.quartz.jobStore.*` settings for the engine's JDBC-backed store
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStoreProperties {
    pub misfire_threshold: Option<u64>,
    pub driver_delegate_class: Option<String>,
    pub driver_delegate_init_string: Option<String>,
    pub data_source: Option<String>,
    #[serde(rename = "nonManagedTXDataSource")]
    pub non_managed_tx_data_source: Option<String>,
    pub table_prefix: Option<String>,
    pub use_properties: Option<bool>,
    pub is_clustered: Option<bool>,
    pub cluster_checkin_interval: Option<u64>,
    pub max_misfires_to_handle_at_a_time: Option<u32>,
    pub dont_set_auto_commit_false: Option<bool>,
    #[serde(rename = "dontSetNonManagedTXConnectionAutoCommitFalse")]
    pub dont_set_non_managed_tx_connection_auto_commit_false: Option<bool>,
    #[serde(rename = "selectWithLockSQL")]
    pub select_with_lock_sql: Option<String>,
    pub tx_isolation_level_serializable: Option<bool>,
    pub tx_isolation_level_read_committed: Option<bool>,
    pub acquire_triggers_within_lock: Option<bool>,
}

/// `org.quartz.threadPool.*` settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPoolProperties {
    pub thread_count: Option<u32>,
    pub thread_priority: Option<u32>,
    pub make_threads_daemons: Option<bool>,
    pub threads_inherit_group_of_initializing_thread: Option<bool>,
    pub threads_inherit_context_class_loader_of_initializing_thread: Option<bool>,
    pub thread_name_prefix: Option<String>,
}

/// `org.quartz.plugin.*` groups. Each group is independently optional; an
/// absent group contributes no keys and the engine treats the missing plugin
/// class key as "plugin disabled".
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginProperties {
    pub job_history: Option<JobHistoryPluginProperties>,
    pub trigger_history: Option<TriggerHistoryPluginProperties>,
    pub job_initializer: Option<JobInitializerPluginProperties>,
    pub shutdownhook: Option<ShutdownHookPluginProperties>,
    pub job_interrupt_monitor: Option<JobInterruptMonitorPluginProperties>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHistoryPluginProperties {
    pub job_to_be_fired_message: Option<String>,
    pub job_success_message: Option<String>,
    pub job_failed_message: Option<String>,
    pub job_was_vetoed_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerHistoryPluginProperties {
    pub trigger_fired_message: Option<String>,
    pub trigger_complete_message: Option<String>,
    pub trigger_misfired_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInitializerPluginProperties {
    pub file_names: Option<String>,
    pub scan_interval: Option<u64>,
    pub fail_on_file_not_found: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutdownHookPluginProperties {
    pub clean_shutdown: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInterruptMonitorPluginProperties {
    pub default_max_run_time: Option<u64>,
}

/// Scheduler-context key/value pairs published under `org.quartz.context.key`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextProperties {
    #[serde(default)]
    pub key: HashMap<String, String>,
}

/// Flat class-selection properties. Each value, when non-empty, picks the
/// concrete engine extension class loaded at bootstrap and is merged into the
/// flattened map after the tree walk, overwriting walk-produced keys.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraProperties {
    pub instance_id_generator_class: Option<String>,
    pub class_load_helper_class: Option<String>,
    pub job_factory_class: Option<String>,
    pub lock_handler_class: Option<String>,
    pub thread_pool_class: Option<String>,
    pub job_store_class: Option<String>,
    pub job_history_class: Option<String>,
    pub trigger_history_class: Option<String>,
    pub job_initializer_class: Option<String>,
    pub shutdownhook_class: Option<String>,
    pub job_interrupt_monitor_class: Option<String>,
}

impl BridgeConfig {
    /// Validate the loaded configuration before it is handed to the engine.
    ///
    /// Flattening itself never fails for well-typed input, so the checks here
    /// catch the combinations the engine would reject at bootstrap instead.
    pub fn validate(&self) -> Result<()> {
        if let Some(thread_pool) = &self.quartz.thread_pool {
            if thread_pool.thread_count == Some(0) {
                return Err(BridgeError::configuration(
                    "threadPool.threadCount",
                    "thread count must be greater than 0",
                ));
            }
        }

        for (name, value) in &self.quartz.job_listener {
            if value.is_empty() {
                return Err(BridgeError::configuration(
                    "jobListener",
                    format!("listener entry '{name}' has an empty value"),
                ));
            }
        }

        for (name, value) in &self.quartz.trigger_listener {
            if value.is_empty() {
                return Err(BridgeError::configuration(
                    "triggerListener",
                    format!("listener entry '{name}' has an empty value"),
                ));
            }
        }

        for (name, entries) in &self.quartz.data_source {
            if entries.is_empty() {
                return Err(BridgeError::configuration(
                    "dataSource",
                    format!("data source '{name}' has no properties"),
                ));
            }
        }

        let plugin = self.quartz.plugin.as_ref();
        let plugin_class_bindings = [
            (
                "plugin.jobHistory",
                &self.extra.job_history_class,
                plugin.is_some_and(|p| p.job_history.is_some()),
            ),
            (
                "plugin.triggerHistory",
                &self.extra.trigger_history_class,
                plugin.is_some_and(|p| p.trigger_history.is_some()),
            ),
            (
                "plugin.jobInitializer",
                &self.extra.job_initializer_class,
                plugin.is_some_and(|p| p.job_initializer.is_some()),
            ),
            (
                "plugin.shutdownhook",
                &self.extra.shutdownhook_class,
                plugin.is_some_and(|p| p.shutdownhook.is_some()),
            ),
            (
                "plugin.jobInterruptMonitor",
                &self.extra.job_interrupt_monitor_class,
                plugin.is_some_and(|p| p.job_interrupt_monitor.is_some()),
            ),
        ];
        for (section, class, group_present) in plugin_class_bindings {
            if matches!(class, Some(c) if !c.is_empty()) && !group_present {
                return Err(BridgeError::configuration(
                    section,
                    "plugin class is set but the plugin group is not configured",
                ));
            }
        }

        if let Some(job_store) = &self.quartz.job_store {
            if let Some(interval) = job_store.cluster_checkin_interval {
                if job_store.is_clustered == Some(true) && interval == 0 {
                    return Err(BridgeError::configuration(
                        "jobStore.clusterCheckinInterval",
                        "check-in interval must be greater than 0 for clustered stores",
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates_and_retains_triggers() {
        let config = BridgeConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.retain_completed_triggers);
    }

    #[test]
    fn retention_defaults_to_true_when_absent_from_document() {
        let config: BridgeConfig = serde_yaml::from_str("quartz: {}\n").unwrap();
        assert!(config.retain_completed_triggers);
    }

    #[test]
    fn zero_thread_count_is_rejected() {
        let mut config = BridgeConfig::default();
        config.quartz.thread_pool = Some(ThreadPoolProperties {
            thread_count: Some(0),
            ..Default::default()
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("threadPool.threadCount"));
    }

    #[test]
    fn empty_listener_value_is_rejected() {
        let mut config = BridgeConfig::default();
        config
            .quartz
            .job_listener
            .insert("audit.class".to_string(), String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn plugin_class_without_its_group_is_rejected() {
        let mut config = BridgeConfig::default();
        config.extra.job_history_class = Some("com.acme.HistoryPlugin".to_string());

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("plugin.jobHistory"));

        // Configuring the group makes the same class selection valid.
        config.quartz.plugin = Some(PluginProperties {
            job_history: Some(JobHistoryPluginProperties::default()),
            ..Default::default()
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_plugin_class_does_not_require_a_group() {
        let mut config = BridgeConfig::default();
        config.extra.shutdownhook_class = Some(String::new());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn clustered_store_needs_nonzero_checkin_interval() {
        let mut config = BridgeConfig::default();
        config.quartz.job_store = Some(JobStoreProperties {
            is_clustered: Some(true),
            cluster_checkin_interval: Some(0),
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn serde_renames_match_engine_spellings() {
        let job_store = JobStoreProperties {
            select_with_lock_sql: Some("SELECT * FROM {0}LOCKS WHERE LOCK_NAME = ?".to_string()),
            non_managed_tx_data_source: Some("reporting".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&job_store).unwrap();
        assert!(value.get("selectWithLockSQL").is_some());
        assert!(value.get("nonManagedTXDataSource").is_some());
        assert!(value.get("dontSetNonManagedTXConnectionAutoCommitFalse").is_some());
    }
}
