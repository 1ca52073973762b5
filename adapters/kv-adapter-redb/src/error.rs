//! Error types for the KV adapter

use std::fmt;

/// KV adapter-specific errors
#[derive(Debug)]
pub enum Error {
	/// Database operation error
	DbError(String),

	/// Stored document could not be encoded or decoded
	SerializationError(String),

	/// Namespace contains the key separator
	InvalidNamespace(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::DbError(msg) => write!(f, "Database error: {}", msg),
			Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
			Error::InvalidNamespace(ns) => write!(f, "Invalid namespace: {:?}", ns),
		}
	}
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::SerializationError(err.to_string())
	}
}

impl From<Error> for plugboard_types::error::Error {
	fn from(err: Error) -> Self {
		plugboard_types::error::Error::Persistence(err.to_string())
	}
}

/// Helper to convert redb errors
pub fn db_error<E: fmt::Display>(context: &'static str) -> impl FnOnce(E) -> Error {
	move |e| Error::DbError(format!("{}: {}", context, e))
}

// vim: ts=4
