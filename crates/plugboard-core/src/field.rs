//! Field tables and type coercion
//!
//! A configuration type exposes its fields through a static table of
//! (identifier, label, kind, accessor, mutator) entries, usually generated by the
//! [`configurable!`](crate::configurable) macro. Every field type implements
//! [`FieldValue`], which converts to the untyped [`Value`] for presentation and
//! coerces an untyped value back onto the declared type.
//!
//! # Coercion rules
//!
//! | Declared type | Accepted shapes |
//! |---|---|
//! | integers | integral numbers within range (`10`, `10.0`) |
//! | `f64` | numbers with an exact `f64` (`10`, `0.25`) |
//! | `f32` | numbers that convert to `f32` and read back unchanged (`0.1`, not `16777217`) |
//! | `bool` | booleans |
//! | `String` | strings |
//! | `Option<T>` | `null` (clears) or whatever `T` accepts |
//! | `Vec<T>` | sequences, element-wise |
//! | `BTreeMap<String, T>`, `HashMap<String, T>` | mappings, entry-wise |
//! | nested configuration | mappings, applied field-by-field |
//! | `Value` | anything |

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use plugboard_types::value::{Value, ValueMap};

/// Failure while applying an untyped update onto a typed object.
///
/// `field` is the dotted path of the offending field relative to the module root,
/// e.g. `thumbnail.width` or `formats[2]`.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeError {
	UnknownField { field: String },
	TypeMismatch { field: String, expected: String, received: &'static str },
}

impl MergeError {
	pub fn field(&self) -> &str {
		match self {
			MergeError::UnknownField { field } | MergeError::TypeMismatch { field, .. } => field,
		}
	}
}

impl std::fmt::Display for MergeError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			MergeError::UnknownField { field } => write!(f, "unknown field '{}'", field),
			MergeError::TypeMismatch { field, expected, received } => {
				write!(f, "field '{}': expected {}, got {}", field, expected, received)
			}
		}
	}
}

impl std::error::Error for MergeError {}

/// Build the path of a child field
pub fn join_path(parent: &str, child: &str) -> String {
	if parent.is_empty() { child.to_string() } else { format!("{}.{}", parent, child) }
}

/// A type that can be shown as, and updated from, an untyped [`Value`]
pub trait FieldValue: Sized {
	/// Declared type name, reported in descriptors and mismatch errors
	fn type_name() -> Cow<'static, str>;

	fn to_value(&self) -> Value;

	/// Build a fresh value, rejecting shapes that do not convert without loss
	fn from_value(value: &Value, path: &str) -> Result<Self, MergeError>;

	/// Apply `value` onto the current one. Scalars are replaced; aggregates merge
	/// field-by-field.
	fn merge_value(&mut self, value: &Value, path: &str) -> Result<(), MergeError> {
		*self = Self::from_value(value, path)?;
		Ok(())
	}
}

pub fn mismatch<T: FieldValue>(value: &Value, path: &str) -> MergeError {
	MergeError::TypeMismatch {
		field: path.to_string(),
		expected: T::type_name().into_owned(),
		received: value.shape_name(),
	}
}

// Integers //
//**********//
macro_rules! impl_int {
	($($t:ty => |$v:ident| $to:expr),+ $(,)?) => {
		$(
			impl FieldValue for $t {
				fn type_name() -> Cow<'static, str> {
					Cow::Borrowed("integer")
				}

				fn to_value(&self) -> Value {
					let $v = *self;
					$to
				}

				fn from_value(value: &Value, path: &str) -> Result<Self, MergeError> {
					value
						.as_integral()
						.and_then(|i| <$t>::try_from(i).ok())
						.ok_or_else(|| mismatch::<Self>(value, path))
				}
			}
		)+
	};
}

impl_int!(
	i8 => |v| Value::Int(i64::from(v)),
	i16 => |v| Value::Int(i64::from(v)),
	i32 => |v| Value::Int(i64::from(v)),
	i64 => |v| Value::Int(v),
	isize => |v| Value::Int(v as i64),
	u8 => |v| Value::from(u64::from(v)),
	u16 => |v| Value::from(u64::from(v)),
	u32 => |v| Value::from(u64::from(v)),
	u64 => |v| Value::from(v),
	usize => |v| Value::from(v as u64),
);

// Floats //
//********//
fn exact_f64(value: &Value) -> Option<f64> {
	match value {
		Value::Float(f) => Some(*f),
		Value::Int(i) => {
			let f = *i as f64;
			(f as i128 == i128::from(*i)).then_some(f)
		}
		Value::UInt(u) => {
			let f = *u as f64;
			(f as i128 == i128::from(*u)).then_some(f)
		}
		_ => None,
	}
}

impl FieldValue for f64 {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("float")
	}

	fn to_value(&self) -> Value {
		Value::Float(*self)
	}

	fn from_value(value: &Value, path: &str) -> Result<Self, MergeError> {
		exact_f64(value).ok_or_else(|| mismatch::<Self>(value, path))
	}
}

impl FieldValue for f32 {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("float")
	}

	/// Reported as the shortest decimal that reads back as the same `f32`, so a
	/// stored `0.8` is `0.8` and not `0.800000011920929`.
	fn to_value(&self) -> Value {
		Value::Float(self.to_string().parse().unwrap_or_else(|_| f64::from(*self)))
	}

	/// Integers must survive the round trip through `f32`; decimals must read back
	/// as the same shortest decimal, so `0.1` is accepted but `16777217.0` is not.
	fn from_value(value: &Value, path: &str) -> Result<Self, MergeError> {
		let Some(f) = exact_f64(value) else {
			return Err(mismatch::<Self>(value, path));
		};
		let narrowed = f as f32;
		let lossless = match value {
			Value::Float(_) => {
				narrowed.to_string().parse::<f64>().is_ok_and(|back| back.to_bits() == f.to_bits())
			}
			_ => f64::from(narrowed).to_bits() == f.to_bits(),
		};
		if lossless { Ok(narrowed) } else { Err(mismatch::<Self>(value, path)) }
	}
}

// Scalars //
//*********//
impl FieldValue for bool {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("bool")
	}

	fn to_value(&self) -> Value {
		Value::Bool(*self)
	}

	fn from_value(value: &Value, path: &str) -> Result<Self, MergeError> {
		value.as_bool().ok_or_else(|| mismatch::<Self>(value, path))
	}
}

impl FieldValue for String {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("string")
	}

	fn to_value(&self) -> Value {
		Value::String(self.clone())
	}

	fn from_value(value: &Value, path: &str) -> Result<Self, MergeError> {
		value.as_str().map(str::to_string).ok_or_else(|| mismatch::<Self>(value, path))
	}
}

/// Free-form field: any shape is accepted as is
impl FieldValue for Value {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("any")
	}

	fn to_value(&self) -> Value {
		self.clone()
	}

	fn from_value(value: &Value, _path: &str) -> Result<Self, MergeError> {
		Ok(value.clone())
	}
}

// Containers //
//************//
impl<T: FieldValue> FieldValue for Option<T> {
	fn type_name() -> Cow<'static, str> {
		Cow::Owned(format!("optional<{}>", T::type_name()))
	}

	fn to_value(&self) -> Value {
		self.as_ref().map_or(Value::Null, FieldValue::to_value)
	}

	fn from_value(value: &Value, path: &str) -> Result<Self, MergeError> {
		if value.is_null() { Ok(None) } else { T::from_value(value, path).map(Some) }
	}

	fn merge_value(&mut self, value: &Value, path: &str) -> Result<(), MergeError> {
		if value.is_null() {
			*self = None;
			return Ok(());
		}
		match self {
			Some(inner) => inner.merge_value(value, path)?,
			None => *self = Some(T::from_value(value, path)?),
		}
		Ok(())
	}
}

impl<T: FieldValue> FieldValue for Vec<T> {
	fn type_name() -> Cow<'static, str> {
		Cow::Owned(format!("list<{}>", T::type_name()))
	}

	fn to_value(&self) -> Value {
		Value::Seq(self.iter().map(FieldValue::to_value).collect())
	}

	fn from_value(value: &Value, path: &str) -> Result<Self, MergeError> {
		let Value::Seq(items) = value else {
			return Err(mismatch::<Self>(value, path));
		};
		items
			.iter()
			.enumerate()
			.map(|(idx, item)| T::from_value(item, &format!("{}[{}]", path, idx)))
			.collect()
	}
}

fn map_entries<T: FieldValue>(
	value: &Value,
	path: &str,
) -> Result<impl Iterator<Item = Result<(String, T), MergeError>>, MergeError> {
	let Some(map) = value.as_map() else {
		return Err(MergeError::TypeMismatch {
			field: path.to_string(),
			expected: format!("map<{}>", T::type_name()),
			received: value.shape_name(),
		});
	};
	Ok(map.iter().map(move |(key, item)| {
		T::from_value(item, &join_path(path, key)).map(|v| (key.clone(), v))
	}))
}

impl<T: FieldValue> FieldValue for BTreeMap<String, T> {
	fn type_name() -> Cow<'static, str> {
		Cow::Owned(format!("map<{}>", T::type_name()))
	}

	fn to_value(&self) -> Value {
		Value::Map(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect())
	}

	fn from_value(value: &Value, path: &str) -> Result<Self, MergeError> {
		map_entries(value, path)?.collect()
	}
}

impl<T: FieldValue, S: std::hash::BuildHasher + Default> FieldValue for HashMap<String, T, S> {
	fn type_name() -> Cow<'static, str> {
		Cow::Owned(format!("map<{}>", T::type_name()))
	}

	fn to_value(&self) -> Value {
		Value::Map(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect::<ValueMap>())
	}

	fn from_value(value: &Value, path: &str) -> Result<Self, MergeError> {
		map_entries(value, path)?.collect()
	}
}

// Field tables //
//**************//
/// One entry of a configuration type's field table
pub struct Field<T> {
	/// Declared field name, matched exactly against update keys
	pub identifier: &'static str,
	/// Display label; empty when none was declared
	pub label: &'static str,
	pub kind: fn() -> Cow<'static, str>,
	pub get: fn(&T) -> Value,
	/// Applies a value onto the field. The third argument is the field's full path.
	pub merge: fn(&mut T, &Value, &str) -> Result<(), MergeError>,
}

impl<T> std::fmt::Debug for Field<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("identifier", &self.identifier)
			.field("label", &self.label)
			.field("kind", &(self.kind)())
			.finish_non_exhaustive()
	}
}

/// A configuration object with a static field table, listed in declaration order
pub trait Configurable: Clone + Send + Sync + 'static {
	fn fields() -> &'static [Field<Self>];

	fn field(identifier: &str) -> Option<&'static Field<Self>> {
		Self::fields().iter().find(|f| f.identifier == identifier)
	}
}

/// Declare the field table of a configuration struct.
///
/// Lists each exposed field with its type and an optional display label. The
/// struct must implement `Clone` and `Default`. Also implements [`FieldValue`] so
/// the struct can nest inside another configuration.
///
/// ```ignore
/// #[derive(Debug, Clone, Default)]
/// pub struct Retention {
/// 	pub days: u32,
/// 	pub enabled: bool,
/// }
///
/// plugboard_core::configurable!(Retention {
/// 	days: u32 => "Days to keep",
/// 	enabled: bool,
/// });
/// ```
#[macro_export]
macro_rules! configurable {
	(@label $label:literal) => { $label };
	(@label) => { "" };
	($ty:ty { $($field:ident : $fty:ty $(=> $label:literal)?),* $(,)? }) => {
		impl $crate::field::Configurable for $ty {
			fn fields() -> &'static [$crate::field::Field<Self>] {
				static FIELDS: &[$crate::field::Field<$ty>] = &[
					$(
						$crate::field::Field {
							identifier: stringify!($field),
							label: $crate::configurable!(@label $($label)?),
							kind: <$fty as $crate::field::FieldValue>::type_name,
							get: |c: &$ty| $crate::field::FieldValue::to_value(&c.$field),
							merge: |c: &mut $ty, v: &$crate::Value, path: &str| {
								$crate::field::FieldValue::merge_value(&mut c.$field, v, path)
							},
						},
					)*
				];
				FIELDS
			}
		}

		impl $crate::field::FieldValue for $ty {
			fn type_name() -> ::std::borrow::Cow<'static, str> {
				::std::borrow::Cow::Borrowed("object")
			}

			fn to_value(&self) -> $crate::Value {
				$crate::describe::snapshot(self)
			}

			fn from_value(
				value: &$crate::Value,
				path: &str,
			) -> ::std::result::Result<Self, $crate::field::MergeError> {
				let mut fresh = <$ty as ::std::default::Default>::default();
				$crate::merge::apply(&mut fresh, value, path)?;
				Ok(fresh)
			}

			fn merge_value(
				&mut self,
				value: &$crate::Value,
				path: &str,
			) -> ::std::result::Result<(), $crate::field::MergeError> {
				$crate::merge::apply(self, value, path)
			}
		}
	};
}

#[cfg(test)]
mod tests {
	use super::*;

	fn json(v: serde_json::Value) -> Value {
		Value::from(v)
	}

	#[test]
	fn test_integer_coercion() {
		assert_eq!(u32::from_value(&json(serde_json::json!(10)), "days"), Ok(10));
		assert_eq!(u32::from_value(&json(serde_json::json!(10.0)), "days"), Ok(10));
		assert_eq!(i8::from_value(&json(serde_json::json!(-128)), "n"), Ok(-128));

		let err = u32::from_value(&json(serde_json::json!(10.5)), "days").unwrap_err();
		assert_eq!(
			err,
			MergeError::TypeMismatch {
				field: "days".into(),
				expected: "integer".into(),
				received: "float"
			}
		);
		assert!(u8::from_value(&json(serde_json::json!(256)), "n").is_err());
		assert!(u32::from_value(&json(serde_json::json!(-1)), "n").is_err());
		assert!(u64::from_value(&Value::UInt(u64::MAX), "n").is_ok());
		assert!(i64::from_value(&Value::UInt(u64::MAX), "n").is_err());
	}

	#[test]
	fn test_string_into_integer_is_rejected() {
		let err = u32::from_value(&Value::from("soon"), "days").unwrap_err();
		assert_eq!(err.field(), "days");
		assert!(err.to_string().contains("expected integer, got string"));
	}

	#[test]
	fn test_float_coercion() {
		assert_eq!(f64::from_value(&Value::Int(3), "ratio"), Ok(3.0));
		assert_eq!(f64::from_value(&Value::Float(0.25), "ratio"), Ok(0.25));
		// 2^53 + 1 has no exact f64
		assert!(f64::from_value(&Value::Int(9_007_199_254_740_993), "ratio").is_err());
		assert_eq!(f32::from_value(&Value::Float(0.5), "q"), Ok(0.5));
		assert!(f32::from_value(&Value::Float(1e300), "q").is_err());
		assert!(f64::from_value(&Value::Bool(true), "ratio").is_err());
	}

	#[test]
	fn test_f32_rejects_lossy_numbers() {
		// 2^24 + 1 has no exact f32
		assert_eq!(f64::from_value(&Value::Int(16_777_217), "q"), Ok(16_777_217.0));
		assert!(f32::from_value(&Value::Int(16_777_217), "q").is_err());
		assert!(f32::from_value(&Value::UInt(16_777_217), "q").is_err());
		assert!(f32::from_value(&Value::Float(16_777_217.0), "q").is_err());
		assert!(f32::from_value(&Value::Float(1e-50), "q").is_err());
		assert!(f32::from_value(&Value::Float(0.123_456_789_012_345), "q").is_err());

		assert_eq!(f32::from_value(&Value::Int(16_777_216), "q"), Ok(16_777_216.0));
		assert_eq!(f32::from_value(&Value::Float(0.1), "q"), Ok(0.1));
		assert_eq!(f32::from_value(&Value::Float(0.8), "q"), Ok(0.8));
		assert_eq!(f32::from_value(&Value::Float(-0.0), "q").map(f32::to_bits), Ok((-0.0f32).to_bits()));

		// Reported values load back unchanged
		assert_eq!(0.8f32.to_value(), Value::Float(0.8));
		assert_eq!(f32::from_value(&0.8f32.to_value(), "q"), Ok(0.8));
		assert_eq!(f32::from_value(&16_777_216f32.to_value(), "q"), Ok(16_777_216.0));

		let err = f32::from_value(&Value::Int(16_777_217), "quality").unwrap_err();
		assert_eq!(
			err,
			MergeError::TypeMismatch {
				field: "quality".into(),
				expected: "float".into(),
				received: "integer"
			}
		);
	}

	#[test]
	fn test_integer_to_value() {
		assert_eq!(i8::MIN.to_value(), Value::Int(-128));
		assert_eq!(i64::MAX.to_value(), Value::Int(i64::MAX));
		assert_eq!((-5isize).to_value(), Value::Int(-5));
		assert_eq!(u64::MAX.to_value(), Value::UInt(u64::MAX));
		assert_eq!(7usize.to_value(), Value::from(7u64));
	}

	#[test]
	fn test_scalar_identity() {
		assert_eq!(bool::from_value(&Value::Bool(false), "b"), Ok(false));
		assert!(bool::from_value(&Value::Int(1), "b").is_err());
		assert_eq!(String::from_value(&Value::from("x"), "s"), Ok("x".to_string()));
		assert!(String::from_value(&Value::Int(1), "s").is_err());
	}

	#[test]
	fn test_option_null_clears() {
		let mut v: Option<u32> = Some(5);
		v.merge_value(&Value::Null, "limit").unwrap();
		assert_eq!(v, None);
		v.merge_value(&Value::Int(7), "limit").unwrap();
		assert_eq!(v, Some(7));
		assert_eq!(Option::<u32>::type_name(), "optional<integer>");
	}

	#[test]
	fn test_vec_reports_element_path() {
		let value = json(serde_json::json!(["png", 3]));
		let err = Vec::<String>::from_value(&value, "formats").unwrap_err();
		assert_eq!(err.field(), "formats[1]");
		assert_eq!(Vec::<String>::type_name(), "list<string>");
	}

	#[test]
	fn test_map_coercion() {
		let value = json(serde_json::json!({"a": 1, "b": 2}));
		let map = BTreeMap::<String, u16>::from_value(&value, "limits").unwrap();
		assert_eq!(map.get("b"), Some(&2));
		let map = HashMap::<String, u16>::from_value(&value, "limits").unwrap();
		assert_eq!(map.len(), 2);

		let err = BTreeMap::<String, u16>::from_value(&json(serde_json::json!({"a": "x"})), "limits")
			.unwrap_err();
		assert_eq!(err.field(), "limits.a");
		let err = BTreeMap::<String, u16>::from_value(&Value::Int(1), "limits").unwrap_err();
		assert!(matches!(err, MergeError::TypeMismatch { received: "integer", .. }));
	}

	#[test]
	fn test_to_value_round_trip() {
		assert_eq!(30u32.to_value(), Value::Int(30));
		assert_eq!(u64::MAX.to_value(), Value::UInt(u64::MAX));
		assert_eq!((-4i16).to_value(), Value::Int(-4));
		assert_eq!(u64::from_value(&u64::MAX.to_value(), "n"), Ok(u64::MAX));
		assert_eq!(f64::from_value(&0.1f64.to_value(), "f"), Ok(0.1));
		let v = vec!["a".to_string()];
		assert_eq!(Vec::<String>::from_value(&v.to_value(), "v"), Ok(v));
	}

	#[test]
	fn test_join_path() {
		assert_eq!(join_path("", "days"), "days");
		assert_eq!(join_path("thumbnail", "width"), "thumbnail.width");
	}
}

// vim: ts=4
