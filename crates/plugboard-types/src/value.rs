//! Untyped value model
//!
//! `Value` is what clients send and what field descriptors report. It keeps integers
//! and floats apart so coercion onto typed fields can reject lossy conversions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ValueMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)] // Variant order matters: bool before numbers, integers before floats
pub enum Value {
	Null,
	Bool(bool),
	Int(i64),
	UInt(u64),
	Float(f64),
	String(String),
	Seq(Vec<Value>),
	Map(ValueMap),
}

impl Value {
	/// Shape name used in type mismatch errors
	pub fn shape_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Int(_) | Value::UInt(_) => "integer",
			Value::Float(_) => "float",
			Value::String(_) => "string",
			Value::Seq(_) => "sequence",
			Value::Map(_) => "mapping",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn as_map(&self) -> Option<&ValueMap> {
		match self {
			Value::Map(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Exact integral value of a numeric variant, if it has one
	pub fn as_integral(&self) -> Option<i128> {
		match self {
			Value::Int(i) => Some(i128::from(*i)),
			Value::UInt(u) => Some(i128::from(*u)),
			// 2^64 bounds every integer type a field can declare
			Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 18_446_744_073_709_551_616.0 => {
				Some(*f as i128)
			}
			_ => None,
		}
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.as_map().and_then(|map| map.get(key))
	}

	/// Whether the value, or anything nested in it, is a NaN or infinite float.
	/// JSON has no encoding for these.
	pub fn has_non_finite(&self) -> bool {
		match self {
			Value::Float(f) => !f.is_finite(),
			Value::Seq(items) => items.iter().any(Value::has_non_finite),
			Value::Map(map) => map.values().any(Value::has_non_finite),
			_ => false,
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Value::Int(i)
	}
}

impl From<u64> for Value {
	fn from(u: u64) -> Self {
		// Keep the canonical form: non-negative values that fit stay Int
		i64::try_from(u).map_or(Value::UInt(u), Value::Int)
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Value::Float(f)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::String(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::String(s)
	}
}

impl From<Vec<Value>> for Value {
	fn from(seq: Vec<Value>) -> Self {
		Value::Seq(seq)
	}
}

impl From<ValueMap> for Value {
	fn from(map: ValueMap) -> Self {
		Value::Map(map)
	}
}

impl From<serde_json::Value> for Value {
	fn from(json: serde_json::Value) -> Self {
		match json {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::Number(n) => {
				if let Some(i) = n.as_i64() {
					Value::Int(i)
				} else if let Some(u) = n.as_u64() {
					Value::UInt(u)
				} else {
					Value::Float(n.as_f64().unwrap_or(f64::NAN))
				}
			}
			serde_json::Value::String(s) => Value::String(s),
			serde_json::Value::Array(arr) => Value::Seq(arr.into_iter().map(Value::from).collect()),
			serde_json::Value::Object(obj) => {
				Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
			}
		}
	}
}


// vim: ts=4
