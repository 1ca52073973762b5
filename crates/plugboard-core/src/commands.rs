//! Command table service
//!
//! The command table is read and replaced as a whole; there is no field-level merge.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::prelude::*;
use crate::service::{check_admin, parse_body};
use plugboard_types::kv_adapter::{KvAdapter, KEY_COMMANDS, NS_CONFIG};
use plugboard_types::types::{AuthCtx, CommandTable};

pub struct CommandService {
	table: RwLock<CommandTable>,
	kv: Arc<dyn KvAdapter>,
	write_lock: tokio::sync::Mutex<()>,
}

impl CommandService {
	pub fn new(initial: CommandTable, kv: Arc<dyn KvAdapter>) -> Self {
		Self { table: RwLock::new(initial), kv, write_lock: tokio::sync::Mutex::new(()) }
	}

	/// Current table, for hosts running the commands
	pub fn current(&self) -> CommandTable {
		self.table.read().clone()
	}

	pub fn get(&self, auth: &AuthCtx) -> ClResult<CommandTable> {
		check_admin(auth, "Command table read")?;
		Ok(self.current())
	}

	/// Replace the whole table from a JSON document `{category: [command, ...]}`
	pub async fn put(&self, auth: &AuthCtx, body: &[u8]) -> ClResult<CommandTable> {
		check_admin(auth, "Command table update")?;
		let table = CommandTable(parse_body::<BTreeMap<String, Vec<String>>>(body)?);

		let _guard = self.write_lock.lock().await;
		self.kv.put(NS_CONFIG, KEY_COMMANDS, &table.to_value()).await.map_err(|e| {
			error!(error = %e, "Failed to persist command table");
			Error::Persistence(format!("{}/{}: {}", NS_CONFIG, KEY_COMMANDS, e))
		})?;

		*self.table.write() = table.clone();
		info!(subject = %auth.id_tag, categories = table.len(), "Command table replaced");
		Ok(table)
	}

	/// Replace the in-memory table with the stored one, if any.
	///
	/// Returns whether a stored table was loaded.
	pub async fn load_persisted(&self) -> ClResult<bool> {
		let Some(stored) = self.kv.get(NS_CONFIG, KEY_COMMANDS).await? else {
			return Ok(false);
		};
		match CommandTable::from_value(&stored) {
			Some(table) => {
				debug!("Loaded command table with {} categories", table.len());
				*self.table.write() = table;
				Ok(true)
			}
			None => {
				warn!("Ignoring stored command table: not a mapping of command lists");
				Ok(false)
			}
		}
	}
}

impl std::fmt::Debug for CommandService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CommandService").field("table", &*self.table.read()).finish_non_exhaustive()
	}
}

// vim: ts=4
