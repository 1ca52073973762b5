//! Common types used throughout Plugboard.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;

use crate::value::Value;

/// Role granting administrative privilege
pub const ROLE_ADMIN: &str = "SADM";

// AuthCtx //
//*********//
/// Authenticated caller, attached to the request by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthCtx {
	pub id_tag: Box<str>,
	pub roles: Box<[Box<str>]>,
}

impl AuthCtx {
	pub fn new(id_tag: impl Into<Box<str>>, roles: &[&str]) -> Self {
		Self { id_tag: id_tag.into(), roles: roles.iter().map(|r| Box::from(*r)).collect() }
	}

	pub fn has_role(&self, role: &str) -> bool {
		self.roles.iter().any(|r| r.as_ref() == role)
	}

	/// The administrative gate consulted by every configuration operation
	pub fn is_admin(&self) -> bool {
		self.has_role(ROLE_ADMIN)
	}
}

// CommandTable //
//**************//
/// Command category (e.g. "before_save") to the shell invocations run for it, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandTable(pub BTreeMap<String, Vec<String>>);

impl CommandTable {
	pub fn commands(&self, category: &str) -> &[String] {
		self.0.get(category).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn categories(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn to_value(&self) -> Value {
		Value::Map(
			self.0
				.iter()
				.map(|(category, cmds)| {
					let seq = cmds.iter().map(|c| Value::String(c.clone())).collect();
					(category.clone(), Value::Seq(seq))
				})
				.collect(),
		)
	}

	/// Decode a stored document. Returns None if it is not a mapping of string lists.
	pub fn from_value(value: &Value) -> Option<Self> {
		let map = value.as_map()?;
		let mut table = BTreeMap::new();
		for (category, cmds) in map {
			let Value::Seq(cmds) = cmds else {
				return None;
			};
			let cmds = cmds.iter().map(|c| c.as_str().map(str::to_string)).collect::<Option<_>>()?;
			table.insert(category.clone(), cmds);
		}
		Some(CommandTable(table))
	}
}

// ApiResponse //
//*************//
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
	pub req_id: Option<String>,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, req_id: None }
	}

	pub fn with_req_id(mut self, req_id: impl Into<String>) -> Self {
		self.req_id = Some(req_id.into());
		self
	}
}


// vim: ts=4
