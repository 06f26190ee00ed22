//! # Configuration Flattening
//!
//! Turns the typed [`QuartzProperties`](super::QuartzProperties) tree into the
//! single-level property set the engine's string-keyed bootstrap understands.
//!
//! The walk is schema-driven rather than hand-enumerated: every section is
//! serialized through `serde_json::to_value` and the resulting JSON object is
//! walked generically, so adding a field to a section struct is all it takes
//! to publish a new key. Guarantees:
//!
//! - one key per populated leaf, dotted under `org.quartz`
//! - absent (`null`) and empty-string leaves are omitted, never emitted
//! - map-typed sections emit exactly one key per top-level entry
//! - the flat class-selection extras merge last and may overwrite walk output
//!
//! Flattening never fails for well-typed input; a section that cannot be
//! decomposed into name/value pairs is a schema bug surfaced as a fatal
//! [`BridgeError::Serialization`].

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::{extra_keys, sections, ROOT_NAMESPACE};
use crate::error::{BridgeError, Result};

use super::{ExtraProperties, QuartzProperties};

/// Flat, namespaced property set consumed by the engine bootstrap.
/// `BTreeMap` keeps output deterministic for logging and tests.
pub type FlatPropertyMap = BTreeMap<String, String>;

/// Flatten the configuration tree and merge the class-selection extras.
pub fn flatten(quartz: &QuartzProperties, extra: &ExtraProperties) -> Result<FlatPropertyMap> {
    let mut map = FlatPropertyMap::new();

    if let Some(scheduler) = &quartz.scheduler {
        let mut value = section_value(scheduler, sections::SCHEDULER)?;
        if let Value::Object(fields) = &mut value {
            // rmi is reinserted under its own null-check below so an absent
            // group cannot surface as an empty stub.
            fields.remove("rmi");
        }
        walk_object(&mut map, sections::SCHEDULER, &value);

        if let Some(rmi) = &scheduler.rmi {
            let rmi_value = section_value(rmi, sections::SCHEDULER_RMI)?;
            walk_object(&mut map, sections::SCHEDULER_RMI, &rmi_value);
        }
    }

    if let Some(job_store) = &quartz.job_store {
        let value = section_value(job_store, sections::JOB_STORE)?;
        walk_object(&mut map, sections::JOB_STORE, &value);
    }

    if let Some(thread_pool) = &quartz.thread_pool {
        let value = section_value(thread_pool, sections::THREAD_POOL)?;
        walk_object(&mut map, sections::THREAD_POOL, &value);
    }

    for (name, entries) in &quartz.data_source {
        put_scalar(
            &mut map,
            key_for(sections::DATA_SOURCE, name),
            render_entry_map(entries),
        );
    }

    put_string_entries(&mut map, sections::JOB_LISTENER, &quartz.job_listener);
    put_string_entries(&mut map, sections::TRIGGER_LISTENER, &quartz.trigger_listener);

    if let Some(plugin) = &quartz.plugin {
        if let Some(job_history) = &plugin.job_history {
            let value = section_value(job_history, sections::PLUGIN_JOB_HISTORY)?;
            walk_object(&mut map, sections::PLUGIN_JOB_HISTORY, &value);
        }
        if let Some(trigger_history) = &plugin.trigger_history {
            let value = section_value(trigger_history, sections::PLUGIN_TRIGGER_HISTORY)?;
            walk_object(&mut map, sections::PLUGIN_TRIGGER_HISTORY, &value);
        }
        if let Some(job_initializer) = &plugin.job_initializer {
            let value = section_value(job_initializer, sections::PLUGIN_JOB_INITIALIZER)?;
            walk_object(&mut map, sections::PLUGIN_JOB_INITIALIZER, &value);
        }
        if let Some(shutdownhook) = &plugin.shutdownhook {
            let value = section_value(shutdownhook, sections::PLUGIN_SHUTDOWNHOOK)?;
            walk_object(&mut map, sections::PLUGIN_SHUTDOWNHOOK, &value);
        }
        if let Some(monitor) = &plugin.job_interrupt_monitor {
            let value = section_value(monitor, sections::PLUGIN_JOB_INTERRUPT_MONITOR)?;
            walk_object(&mut map, sections::PLUGIN_JOB_INTERRUPT_MONITOR, &value);
        }
    }

    if let Some(context) = &quartz.context {
        put_string_entries(&mut map, sections::CONTEXT_KEY, &context.key);
    }

    merge_extra_properties(&mut map, extra);

    Ok(map)
}

/// Merge the flat class-selection properties. Each value lands only when
/// non-empty; re-running the merge over the same map is a no-op.
pub fn merge_extra_properties(map: &mut FlatPropertyMap, extra: &ExtraProperties) {
    put_optional(map, extra_keys::SCHED_INSTANCE_ID_GENERATOR_CLASS, &extra.instance_id_generator_class);
    put_optional(map, extra_keys::SCHED_CLASS_LOAD_HELPER_CLASS, &extra.class_load_helper_class);
    put_optional(map, extra_keys::SCHED_JOB_FACTORY_CLASS, &extra.job_factory_class);
    put_optional(map, extra_keys::JOB_STORE_LOCK_HANDLER_CLASS, &extra.lock_handler_class);
    put_optional(map, extra_keys::THREAD_POOL_CLASS, &extra.thread_pool_class);
    put_optional(map, extra_keys::JOB_STORE_CLASS, &extra.job_store_class);

    put_optional(map, extra_keys::PLUGIN_JOB_HISTORY_CLASS, &extra.job_history_class);
    put_optional(map, extra_keys::PLUGIN_TRIGGER_HISTORY_CLASS, &extra.trigger_history_class);
    put_optional(map, extra_keys::PLUGIN_JOB_INITIALIZER_CLASS, &extra.job_initializer_class);
    put_optional(map, extra_keys::PLUGIN_SHUTDOWNHOOK_CLASS, &extra.shutdownhook_class);
    put_optional(map, extra_keys::PLUGIN_JOB_INTERRUPT_MONITOR_CLASS, &extra.job_interrupt_monitor_class);
}

fn section_value<T: Serialize>(section: &T, name: &str) -> Result<Value> {
    serde_json::to_value(section).map_err(|e| BridgeError::serialization(name, e.to_string()))
}

/// Recursively walk a serialized section, emitting one key per scalar leaf.
/// Nested objects extend the dotted path.
fn walk_object(map: &mut FlatPropertyMap, path: &str, value: &Value) {
    let Value::Object(fields) = value else {
        return;
    };

    for (field, field_value) in fields {
        match field_value {
            Value::Null => {}
            Value::Object(_) => {
                walk_object(map, &format!("{path}.{field}"), field_value);
            }
            scalar => {
                if let Some(rendered) = render_scalar(scalar) {
                    put_scalar(map, key_for(path, field), rendered);
                }
            }
        }
    }
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Render a data-source definition as a single value, sorted by key:
/// `{driver=org.x.Driver, url=jdbc:...}`. Map sections flatten one key per
/// top-level entry, not one per nested field. Empty-valued fields are
/// omitted, like empty scalar leaves everywhere else.
fn render_entry_map(entries: &BTreeMap<String, String>) -> String {
    let body = entries
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}

fn put_string_entries(
    map: &mut FlatPropertyMap,
    section: &str,
    entries: &std::collections::HashMap<String, String>,
) {
    for (name, value) in entries {
        if !value.is_empty() {
            put_scalar(map, key_for(section, name), value.clone());
        }
    }
}

fn put_optional(map: &mut FlatPropertyMap, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            map.insert(key.to_string(), value.clone());
        }
    }
}

fn put_scalar(map: &mut FlatPropertyMap, key: String, value: String) {
    map.insert(key, value);
}

fn key_for(section: &str, field: &str) -> String {
    format!("{ROOT_NAMESPACE}.{section}.{field}")
}
