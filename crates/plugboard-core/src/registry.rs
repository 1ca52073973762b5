//! Plugin registry
//!
//! Modules register their configuration objects while the application is built;
//! the registry is then frozen and shared read-only. All mutation goes through
//! the slots it hands out.

use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::describe::{self, FieldDescriptor};
use crate::field::{Configurable, MergeError};
use crate::merge;
use crate::prelude::*;
use plugboard_types::value::{Value, ValueMap};

/// A merged copy of a module's configuration, not yet visible to readers
pub struct Staged<'a> {
	document: Value,
	commit: Box<dyn FnOnce() + Send + 'a>,
}

impl Staged<'_> {
	/// Serialized form of the staged object, as it should be persisted
	pub fn document(&self) -> &Value {
		&self.document
	}

	/// Replace the live object with the staged one
	pub fn commit(self) {
		(self.commit)();
	}
}

/// Type-erased view of one registered module
pub trait PluginEntry: Send + Sync {
	fn describe(&self) -> Vec<FieldDescriptor>;

	/// Whole-object document of the live configuration
	fn snapshot(&self) -> Value;

	/// Merge `update` onto a copy of the live object
	fn stage(&self, update: &ValueMap) -> Result<Staged<'_>, MergeError>;

	/// Merge a stored document onto the live object (all-or-nothing)
	fn load(&self, stored: &Value) -> Result<(), MergeError>;
}

/// Shared handle a module keeps to read its live configuration
pub struct PluginHandle<T>(Arc<RwLock<T>>);

impl<T> PluginHandle<T> {
	pub fn read(&self) -> RwLockReadGuard<'_, T> {
		self.0.read()
	}
}

impl<T: Clone> PluginHandle<T> {
	/// Copy of the current configuration
	pub fn get(&self) -> T {
		self.0.read().clone()
	}
}

impl<T> Clone for PluginHandle<T> {
	fn clone(&self) -> Self {
		Self(Arc::clone(&self.0))
	}
}

impl<T: std::fmt::Debug> std::fmt::Debug for PluginHandle<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("PluginHandle").field(&*self.0.read()).finish()
	}
}

struct Slot<T> {
	config: Arc<RwLock<T>>,
}

impl<T: Configurable> PluginEntry for Slot<T> {
	fn describe(&self) -> Vec<FieldDescriptor> {
		describe::describe(Some(&*self.config.read()))
	}

	fn snapshot(&self) -> Value {
		describe::snapshot(&*self.config.read())
	}

	fn stage(&self, update: &ValueMap) -> Result<Staged<'_>, MergeError> {
		let staged = merge::stage(&*self.config.read(), update)?;
		let document = describe::snapshot(&staged);
		Ok(Staged { document, commit: Box::new(move || *self.config.write() = staged) })
	}

	fn load(&self, stored: &Value) -> Result<(), MergeError> {
		let Some(update) = stored.as_map() else {
			return Err(MergeError::TypeMismatch {
				field: "<root>".to_string(),
				expected: "object".to_string(),
				received: stored.shape_name(),
			});
		};
		merge::merge(&mut *self.config.write(), update)
	}
}

/// Mutable registry used during app initialization
#[derive(Default)]
pub struct PluginRegistry {
	plugins: BTreeMap<String, Box<dyn PluginEntry>>,
}

impl PluginRegistry {
	pub fn new() -> Self {
		Self { plugins: BTreeMap::new() }
	}

	/// Register a module's configuration object under `name`
	pub fn register<T: Configurable>(
		&mut self,
		name: impl Into<String>,
		config: T,
	) -> ClResult<PluginHandle<T>> {
		let name = name.into();
		if name.is_empty() {
			return Err(Error::ConfigError("Plugin name must not be empty".into()));
		}
		if self.plugins.contains_key(&name) {
			return Err(Error::ConfigError(format!("Plugin '{}' is already registered", name)));
		}
		// A NaN or infinite field would be persisted as null and fail to load back
		if describe::snapshot(&config).has_non_finite() {
			return Err(Error::ConfigError(format!("Plugin '{}' has a non-finite float field", name)));
		}

		debug!("Registering plugin: {} ({} fields)", name, T::fields().len());
		let config = Arc::new(RwLock::new(config));
		self.plugins.insert(name, Box::new(Slot { config: Arc::clone(&config) }));
		Ok(PluginHandle(config))
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenPluginRegistry {
		info!("Freezing plugin registry with {} plugins", self.plugins.len());
		FrozenPluginRegistry { plugins: self.plugins }
	}

	pub fn len(&self) -> usize {
		self.plugins.len()
	}

	pub fn is_empty(&self) -> bool {
		self.plugins.is_empty()
	}
}

/// Immutable registry stored in AppState
pub struct FrozenPluginRegistry {
	plugins: BTreeMap<String, Box<dyn PluginEntry>>,
}

impl FrozenPluginRegistry {
	pub fn get(&self, name: &str) -> Option<&dyn PluginEntry> {
		self.plugins.get(name).map(|entry| &**entry)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.plugins.contains_key(name)
	}

	/// All modules in name order
	pub fn list(&self) -> impl Iterator<Item = (&str, &dyn PluginEntry)> {
		self.plugins.iter().map(|(name, entry)| (name.as_str(), &**entry))
	}

	pub fn len(&self) -> usize {
		self.plugins.len()
	}

	pub fn is_empty(&self) -> bool {
		self.plugins.is_empty()
	}
}

impl std::fmt::Debug for FrozenPluginRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FrozenPluginRegistry")
			.field("plugins", &self.plugins.keys().collect::<Vec<_>>())
			.finish()
	}
}


// vim: ts=4
