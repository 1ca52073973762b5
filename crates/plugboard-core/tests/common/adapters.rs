//! In-memory storage adapter with a write log and failure injection

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use plugboard_types::error::{ClResult, Error};
use plugboard_types::kv_adapter::KvAdapter;
use plugboard_types::value::Value;

#[derive(Debug, Default)]
pub struct MemoryKvAdapter {
	data: Mutex<BTreeMap<(String, String), Value>>,
	puts: Mutex<Vec<String>>,
	fail_puts: AtomicBool,
}

impl MemoryKvAdapter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store a document directly, bypassing the write log
	pub fn seed(&self, namespace: &str, key: &str, value: impl Into<Value>) {
		self.data.lock().insert((namespace.into(), key.into()), value.into());
	}

	pub fn stored(&self, namespace: &str, key: &str) -> Option<Value> {
		self.data.lock().get(&(namespace.to_string(), key.to_string())).cloned()
	}

	/// Successful puts as "namespace/key", in order
	pub fn put_log(&self) -> Vec<String> {
		self.puts.lock().clone()
	}

	pub fn fail_puts(&self, fail: bool) {
		self.fail_puts.store(fail, Ordering::SeqCst);
	}
}

#[async_trait]
impl KvAdapter for MemoryKvAdapter {
	async fn put(&self, namespace: &str, key: &str, value: &Value) -> ClResult<()> {
		if self.fail_puts.load(Ordering::SeqCst) {
			return Err(Error::Persistence("disk full".into()));
		}
		self.data.lock().insert((namespace.into(), key.into()), value.clone());
		self.puts.lock().push(format!("{}/{}", namespace, key));
		Ok(())
	}

	async fn get(&self, namespace: &str, key: &str) -> ClResult<Option<Value>> {
		Ok(self.stored(namespace, key))
	}

	async fn delete(&self, namespace: &str, key: &str) -> ClResult<bool> {
		Ok(self.data.lock().remove(&(namespace.to_string(), key.to_string())).is_some())
	}

	async fn list_keys(&self, namespace: &str) -> ClResult<Vec<Box<str>>> {
		Ok(self
			.data
			.lock()
			.keys()
			.filter(|(ns, _)| ns == namespace)
			.map(|(_, key)| Box::from(key.as_str()))
			.collect())
	}
}

// vim: ts=4
