//! Plugin configuration service: read-all and write-batch orchestration
//!
//! Both operations consult the administrative gate before anything else.
//!
//! Write-batch policy:
//! - every module name is checked before any module is touched
//! - modules are processed in name order, each one all-or-nothing:
//!   stage merge, persist, then commit into the live object
//! - the first failure aborts the batch; modules processed before it stay
//!   committed and persisted

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::describe::FieldDescriptor;
use crate::field::MergeError;
use crate::prelude::*;
use crate::registry::FrozenPluginRegistry;
use plugboard_types::kv_adapter::{KvAdapter, NS_PLUGINS};
use plugboard_types::types::AuthCtx;
use plugboard_types::value::ValueMap;

/// Module name → (field identifier → untyped value)
pub type RawUpdate = BTreeMap<String, ValueMap>;

/// Module name → field descriptors
pub type PluginSnapshot = BTreeMap<String, Vec<FieldDescriptor>>;

pub(crate) fn check_admin(auth: &AuthCtx, operation: &str) -> ClResult<()> {
	if !auth.is_admin() {
		warn!(
			subject = %auth.id_tag,
			roles = ?auth.roles,
			"{} denied - SADM role required",
			operation
		);
		return Err(Error::PermissionDenied);
	}
	Ok(())
}

/// Decode a JSON request body into `T`, mapping every failure to `MalformedInput`
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> ClResult<T> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Err(Error::MalformedInput("empty request body".into()));
	}
	serde_json::from_slice(body).map_err(|e| Error::MalformedInput(e.to_string()))
}

fn lift_merge_error(module: &str, err: MergeError) -> Error {
	match err {
		MergeError::UnknownField { field } => Error::UnknownField { module: module.into(), field },
		MergeError::TypeMismatch { field, expected, received } => {
			Error::TypeMismatch { module: module.into(), field, expected, received }
		}
	}
}

pub struct PluginConfigService {
	registry: Arc<FrozenPluginRegistry>,
	kv: Arc<dyn KvAdapter>,
	write_lock: tokio::sync::Mutex<()>,
}

impl PluginConfigService {
	pub fn new(registry: Arc<FrozenPluginRegistry>, kv: Arc<dyn KvAdapter>) -> Self {
		Self { registry, kv, write_lock: tokio::sync::Mutex::new(()) }
	}

	pub fn registry(&self) -> &Arc<FrozenPluginRegistry> {
		&self.registry
	}

	/// Describe every registered module
	pub fn read_all(&self, auth: &AuthCtx) -> ClResult<PluginSnapshot> {
		check_admin(auth, "Plugin configuration read")?;

		Ok(self
			.registry
			.list()
			.map(|(name, entry)| (name.to_string(), entry.describe()))
			.collect())
	}

	/// Describe a single module
	pub fn read_one(&self, auth: &AuthCtx, name: &str) -> ClResult<Vec<FieldDescriptor>> {
		check_admin(auth, "Plugin configuration read")?;

		let entry = self.registry.get(name).ok_or(Error::NotFound)?;
		Ok(entry.describe())
	}

	/// Apply a JSON write-batch document. Returns the names of the updated modules.
	pub async fn write_batch(&self, auth: &AuthCtx, body: &[u8]) -> ClResult<Vec<String>> {
		check_admin(auth, "Plugin configuration update")?;
		let update: RawUpdate = parse_body(body)?;
		self.apply_batch(auth, &update).await
	}

	/// Apply an already decoded write-batch
	pub async fn apply_update(&self, auth: &AuthCtx, update: &RawUpdate) -> ClResult<Vec<String>> {
		check_admin(auth, "Plugin configuration update")?;
		self.apply_batch(auth, update).await
	}

	async fn apply_batch(&self, auth: &AuthCtx, update: &RawUpdate) -> ClResult<Vec<String>> {
		if let Some(name) = update.keys().find(|name| !self.registry.contains(name)) {
			warn!(subject = %auth.id_tag, module = %name, "Update references unknown plugin");
			return Err(Error::UnknownModule(name.clone()));
		}

		let _guard = self.write_lock.lock().await;
		let mut updated = Vec::with_capacity(update.len());

		for (name, fields) in update {
			let entry = self.registry.get(name).ok_or_else(|| Error::UnknownModule(name.clone()))?;

			let staged = entry.stage(fields).map_err(|e| {
				warn!(module = %name, error = %e, "Rejected plugin configuration update");
				lift_merge_error(name, e)
			})?;

			self.kv.put(NS_PLUGINS, name, staged.document()).await.map_err(|e| {
				error!(module = %name, error = %e, "Failed to persist plugin configuration");
				Error::Persistence(format!("{}/{}: {}", NS_PLUGINS, name, e))
			})?;

			staged.commit();
			info!(
				subject = %auth.id_tag,
				module = %name,
				fields = fields.len(),
				"Plugin configuration updated"
			);
			updated.push(name.clone());
		}

		Ok(updated)
	}

	/// Merge stored documents onto the registered defaults.
	///
	/// Documents that no longer fit their module are skipped with a warning.
	/// Returns the number of modules loaded.
	pub async fn load_persisted(&self) -> ClResult<usize> {
		let mut loaded = 0;
		for (name, entry) in self.registry.list() {
			let Some(stored) = self.kv.get(NS_PLUGINS, name).await? else {
				debug!("No stored configuration for plugin '{}'", name);
				continue;
			};
			match entry.load(&stored) {
				Ok(()) => {
					debug!("Loaded stored configuration for plugin '{}'", name);
					loaded += 1;
				}
				Err(e) => {
					warn!("Ignoring stored configuration for plugin '{}': {}", name, e);
				}
			}
		}
		Ok(loaded)
	}
}

impl std::fmt::Debug for PluginConfigService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PluginConfigService")
			.field("registry", &self.registry)
			.field("kv", &self.kv)
			.finish_non_exhaustive()
	}
}

// vim: ts=4
