//! Key-value persistence adapter
//!
//! Stores serialized configuration documents under a (namespace, key) pair.
//! Implementations must make each `put` durable before returning.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;
use crate::value::Value;

/// Namespace holding one document per plugin module, keyed by module name
pub const NS_PLUGINS: &str = "plugins";
/// Namespace for host-level configuration such as the command table
pub const NS_CONFIG: &str = "config";
/// Key of the command table inside `NS_CONFIG`
pub const KEY_COMMANDS: &str = "commands";

#[async_trait]
pub trait KvAdapter: Debug + Send + Sync {
	/// Store `value` under (namespace, key), replacing any previous document
	async fn put(&self, namespace: &str, key: &str, value: &Value) -> ClResult<()>;

	/// Read the document stored under (namespace, key)
	async fn get(&self, namespace: &str, key: &str) -> ClResult<Option<Value>>;

	/// Remove a document. Returns whether anything was removed.
	async fn delete(&self, namespace: &str, key: &str) -> ClResult<bool>;

	/// List all keys of a namespace in ascending order
	async fn list_keys(&self, namespace: &str) -> ClResult<Vec<Box<str>>>;
}

// vim: ts=4
