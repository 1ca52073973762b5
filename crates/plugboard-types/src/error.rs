//! Error type shared by every Plugboard crate
//!
//! Each variant maps to one HTTP status and a stable error code. Everything except
//! `PermissionDenied` carries enough detail to identify the offending module or field.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Caller lacks administrative privilege
	PermissionDenied,
	/// No or unknown credentials
	Unauthorized,
	NotFound,
	/// Request document could not be parsed into the expected shape
	MalformedInput(String),
	/// Update references a module that is not registered
	UnknownModule(String),
	/// Update references a field the module's configuration does not declare
	UnknownField { module: String, field: String },
	/// Value shape is incompatible with the declared field type
	TypeMismatch { module: String, field: String, expected: String, received: &'static str },
	/// The key-value store rejected or failed a write
	Persistence(String),
	ConfigError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::NotFound | Error::UnknownModule(_) => StatusCode::NOT_FOUND,
			Error::MalformedInput(_) => StatusCode::BAD_REQUEST,
			Error::UnknownField { .. } | Error::TypeMismatch { .. } => {
				StatusCode::UNPROCESSABLE_ENTITY
			}
			Error::Persistence(_) | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	pub fn code(&self) -> &'static str {
		match self {
			Error::PermissionDenied => "E-FORBIDDEN",
			Error::Unauthorized => "E-UNAUTHORIZED",
			Error::NotFound => "E-NOT-FOUND",
			Error::MalformedInput(_) => "E-MALFORMED",
			Error::UnknownModule(_) => "E-UNKNOWN-MODULE",
			Error::UnknownField { .. } => "E-UNKNOWN-FIELD",
			Error::TypeMismatch { .. } => "E-TYPE-MISMATCH",
			Error::Persistence(_) => "E-PERSISTENCE",
			Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => "E-INTERNAL",
		}
	}

	fn details(&self) -> Option<serde_json::Value> {
		match self {
			Error::UnknownModule(module) => Some(serde_json::json!({ "module": module })),
			Error::UnknownField { module, field } => {
				Some(serde_json::json!({ "module": module, "field": field }))
			}
			Error::TypeMismatch { module, field, expected, received } => Some(serde_json::json!({
				"module": module,
				"field": field,
				"expected": expected,
				"received": received,
			})),
			_ => None,
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::NotFound => write!(f, "not found"),
			Error::MalformedInput(msg) => write!(f, "malformed input: {}", msg),
			Error::UnknownModule(module) => write!(f, "unknown module '{}'", module),
			Error::UnknownField { module, field } => {
				write!(f, "unknown field '{}' in module '{}'", field, module)
			}
			Error::TypeMismatch { module, field, expected, received } => write!(
				f,
				"type mismatch for field '{}' in module '{}': expected {}, got {}",
				field, module, expected, received
			),
			Error::Persistence(msg) => write!(f, "persistence error: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		} else {
			tracing::debug!(error = %self, "request rejected");
		}

		// Forbidden short-circuits before any processing, so it reveals nothing
		let body = match (&self, self.details()) {
			(Error::PermissionDenied, _) => serde_json::json!({
				"error": { "code": self.code(), "message": "Forbidden" }
			}),
			(_, Some(details)) => serde_json::json!({
				"error": { "code": self.code(), "message": self.to_string(), "details": details }
			}),
			(_, None) => serde_json::json!({
				"error": { "code": self.code(), "message": self.to_string() }
			}),
		};

		(status, Json(body)).into_response()
	}
}


// vim: ts=4
