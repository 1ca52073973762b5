//! Structural merge of untyped updates onto typed configuration objects
//!
//! Semantics:
//! - Keys match field identifiers exactly (case-sensitive)
//! - Fields absent from the update are left unchanged
//! - Nested configuration objects merge field-by-field; sequences and maps are
//!   replaced as a whole
//! - A merge is all-or-nothing: it runs on a copy which replaces the object only
//!   when every key applied

use crate::field::{join_path, Configurable, MergeError};
use plugboard_types::value::{Value, ValueMap};

/// Apply a mapping onto `config` in place, field by field.
///
/// `path` is the dotted location of `config` inside its module ("" at the root).
/// On error, fields before the offending key may already be applied; use
/// [`stage`] or [`merge`] for all-or-nothing behaviour.
pub fn apply<T: Configurable>(config: &mut T, value: &Value, path: &str) -> Result<(), MergeError> {
	let Some(update) = value.as_map() else {
		return Err(MergeError::TypeMismatch {
			field: if path.is_empty() { "<root>".to_string() } else { path.to_string() },
			expected: "object".to_string(),
			received: value.shape_name(),
		});
	};
	apply_map(config, update, path)
}

fn apply_map<T: Configurable>(
	config: &mut T,
	update: &ValueMap,
	path: &str,
) -> Result<(), MergeError> {
	for (key, value) in update {
		let field_path = join_path(path, key);
		let Some(field) = T::field(key) else {
			return Err(MergeError::UnknownField { field: field_path });
		};
		(field.merge)(config, value, &field_path)?;
	}
	Ok(())
}

/// Merge `update` onto a copy of `config` and return the copy
pub fn stage<T: Configurable>(config: &T, update: &ValueMap) -> Result<T, MergeError> {
	let mut staged = config.clone();
	apply_map(&mut staged, update, "")?;
	Ok(staged)
}

/// Merge `update` onto `config`. On error `config` is left untouched.
pub fn merge<T: Configurable>(config: &mut T, update: &ValueMap) -> Result<(), MergeError> {
	*config = stage(config, update)?;
	Ok(())
}


// vim: ts=4
