//! Field descriptor extraction
//!
//! Turns a live configuration object into the labeled, typed snapshot shown to
//! administrators. Extraction only reads through the field table.

use serde::Serialize;

use crate::field::Configurable;
use plugboard_types::value::{Value, ValueMap};

/// Presentation snapshot of one configuration field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
	pub identifier: &'static str,
	pub label: &'static str,
	pub kind: String,
	pub value: Value,
}

/// Describe every field of `config` in declaration order.
///
/// An absent object yields an empty list.
pub fn describe<T: Configurable>(config: Option<&T>) -> Vec<FieldDescriptor> {
	let Some(config) = config else {
		return Vec::new();
	};

	T::fields()
		.iter()
		.map(|field| FieldDescriptor {
			identifier: field.identifier,
			label: field.label,
			kind: (field.kind)().into_owned(),
			value: (field.get)(config),
		})
		.collect()
}

/// Whole-object snapshot as an identifier → value mapping.
///
/// This is the document persisted for a module and the value reported for nested
/// configuration fields.
pub fn snapshot<T: Configurable>(config: &T) -> Value {
	Value::Map(
		T::fields()
			.iter()
			.map(|field| (field.identifier.to_string(), (field.get)(config)))
			.collect::<ValueMap>(),
	)
}


// vim: ts=4
