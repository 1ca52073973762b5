//! redb-backed implementation of [`KvAdapter`].
//!
//! All namespaces share one table. Keys are stored as `namespace:key`, values
//! as JSON text.

#![forbid(unsafe_code)]

mod error;

use async_trait::async_trait;
use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

pub use error::Error;

use error::db_error;
use plugboard_types::error::ClResult;
use plugboard_types::kv_adapter::KvAdapter;
use plugboard_types::value::Value;

const TABLE_KV: TableDefinition<&str, &str> = TableDefinition::new("kv");

const SEPARATOR: char = ':';

/// Database file name inside the storage directory
pub const DB_FILE: &str = "plugboard.redb";

pub struct KvAdapterRedb {
	db_path: PathBuf,
	db: redb::Database,
}

impl KvAdapterRedb {
	/// Open (or create) the database in `storage_dir`
	pub async fn new(storage_dir: impl AsRef<Path>) -> ClResult<Self> {
		let storage_dir = storage_dir.as_ref();
		tokio::fs::create_dir_all(storage_dir).await?;

		let db_path = storage_dir.join(DB_FILE);
		let db = redb::Database::create(&db_path).map_err(db_error("Failed to open database"))?;

		// Create the table if it doesn't exist
		let tx = db.begin_write().map_err(db_error("Failed to begin write transaction"))?;
		tx.open_table(TABLE_KV).map_err(db_error("Failed to create table"))?;
		tx.commit().map_err(db_error("Failed to commit table creation"))?;

		info!("Opened KV store at {}", db_path.display());
		Ok(Self { db_path, db })
	}

	fn make_key(namespace: &str, key: &str) -> Result<String, Error> {
		if namespace.is_empty() || namespace.contains(SEPARATOR) {
			return Err(Error::InvalidNamespace(namespace.into()));
		}
		Ok(format!("{}{}{}", namespace, SEPARATOR, key))
	}
}

impl std::fmt::Debug for KvAdapterRedb {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("KvAdapterRedb").field("db_path", &self.db_path).finish_non_exhaustive()
	}
}

#[async_trait]
impl KvAdapter for KvAdapterRedb {
	async fn put(&self, namespace: &str, key: &str, value: &Value) -> ClResult<()> {
		let full_key = Self::make_key(namespace, key)?;
		let json = serde_json::to_string(value).map_err(Error::from)?;

		let tx = self.db.begin_write().map_err(db_error("Failed to begin write transaction"))?;
		{
			let mut table = tx.open_table(TABLE_KV).map_err(db_error("Failed to open table"))?;
			table
				.insert(full_key.as_str(), json.as_str())
				.map_err(db_error("Failed to insert value"))?;
		}
		tx.commit().map_err(db_error("Failed to commit value"))?;

		debug!("Stored {} ({} bytes)", full_key, json.len());
		Ok(())
	}

	async fn get(&self, namespace: &str, key: &str) -> ClResult<Option<Value>> {
		let full_key = Self::make_key(namespace, key)?;

		let tx = self.db.begin_read().map_err(db_error("Failed to begin read transaction"))?;
		let table = tx.open_table(TABLE_KV).map_err(db_error("Failed to open table"))?;

		let Some(json) = table.get(full_key.as_str()).map_err(db_error("Failed to read value"))?
		else {
			trace!("No value for {}", full_key);
			return Ok(None);
		};

		let value: Value = serde_json::from_str(json.value()).map_err(Error::from)?;
		Ok(Some(value))
	}

	async fn delete(&self, namespace: &str, key: &str) -> ClResult<bool> {
		let full_key = Self::make_key(namespace, key)?;

		let tx = self.db.begin_write().map_err(db_error("Failed to begin write transaction"))?;
		let removed = {
			let mut table = tx.open_table(TABLE_KV).map_err(db_error("Failed to open table"))?;
			let removed =
				table.remove(full_key.as_str()).map_err(db_error("Failed to remove value"))?;
			removed.is_some()
		};
		tx.commit().map_err(db_error("Failed to commit removal"))?;

		debug!("Deleted {}: {}", full_key, removed);
		Ok(removed)
	}

	async fn list_keys(&self, namespace: &str) -> ClResult<Vec<Box<str>>> {
		let prefix = Self::make_key(namespace, "")?;

		let tx = self.db.begin_read().map_err(db_error("Failed to begin read transaction"))?;
		let table = tx.open_table(TABLE_KV).map_err(db_error("Failed to open table"))?;
		let range = table.range(prefix.as_str()..).map_err(db_error("Failed to read keys"))?;

		let mut keys = Vec::new();
		for item in range {
			let (key, _) = item.map_err(db_error("Failed to iterate keys"))?;
			let Some(key) = key.value().strip_prefix(prefix.as_str()) else {
				break;
			};
			keys.push(Box::from(key));
		}

		Ok(keys)
	}
}

// vim: ts=4
