//! # Engine Property Keys
//!
//! The flat property names understood by the scheduling engine's string-keyed
//! bootstrap. Everything the bridge emits lives under the `org.quartz`
//! namespace; the class-selection keys below govern which concrete engine
//! extension classes get loaded and are merged in after the tree walk.

/// Namespace prefix for every key produced by the configuration walk
pub const ROOT_NAMESPACE: &str = "org.quartz";

/// Class-selection keys recognized by the engine factory
pub mod extra_keys {
    pub const SCHED_INSTANCE_ID_GENERATOR_CLASS: &str =
        "org.quartz.scheduler.instanceIdGenerator.class";
    pub const SCHED_CLASS_LOAD_HELPER_CLASS: &str = "org.quartz.scheduler.classLoadHelper.class";
    pub const SCHED_JOB_FACTORY_CLASS: &str = "org.quartz.scheduler.jobFactory.class";
    pub const JOB_STORE_LOCK_HANDLER_CLASS: &str = "org.quartz.jobStore.lockHandler.class";
    pub const THREAD_POOL_CLASS: &str = "org.quartz.threadPool.class";
    pub const JOB_STORE_CLASS: &str = "org.quartz.jobStore.class";

    pub const PLUGIN_JOB_HISTORY_CLASS: &str = "org.quartz.plugin.jobHistory.class";
    pub const PLUGIN_TRIGGER_HISTORY_CLASS: &str = "org.quartz.plugin.triggerHistory.class";
    pub const PLUGIN_JOB_INITIALIZER_CLASS: &str = "org.quartz.plugin.jobInitializer.class";
    pub const PLUGIN_SHUTDOWNHOOK_CLASS: &str = "org.quartz.plugin.shutdownhook.class";
    pub const PLUGIN_JOB_INTERRUPT_MONITOR_CLASS: &str =
        "org.quartz.plugin.jobInterruptMonitor.class";
}

/// Section names as they appear in emitted keys
pub mod sections {
    pub const SCHEDULER: &str = "scheduler";
    pub const SCHEDULER_RMI: &str = "scheduler.rmi";
    pub const JOB_STORE: &str = "jobStore";
    pub const THREAD_POOL: &str = "threadPool";
    pub const DATA_SOURCE: &str = "dataSource";
    pub const JOB_LISTENER: &str = "jobListener";
    pub const TRIGGER_LISTENER: &str = "triggerListener";
    pub const PLUGIN_JOB_HISTORY: &str = "plugin.jobHistory";
    pub const PLUGIN_TRIGGER_HISTORY: &str = "plugin.triggerHistory";
    pub const PLUGIN_JOB_INITIALIZER: &str = "plugin.jobInitializer";
    pub const PLUGIN_SHUTDOWNHOOK: &str = "plugin.shutdownhook";
    pub const PLUGIN_JOB_INTERRUPT_MONITOR: &str = "plugin.jobInterruptMonitor";
    pub const CONTEXT_KEY: &str = "context.key";
}

/// Prefixes for the named connection providers each job store adapter
/// registers with the engine's connection registry. The scheduler instance id
/// is appended so two adapters in one process never collide.
pub const TX_DATA_SOURCE_PREFIX: &str = "bridgeTxDataSource";
pub const NON_TX_DATA_SOURCE_PREFIX: &str = "bridgeNonTxDataSource";
