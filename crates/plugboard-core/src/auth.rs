//! Bearer token authentication
//!
//! Tokens are configured when the application is built and map to a fixed
//! caller identity. Validating a token only establishes who the caller is.
//! The administrative gate is enforced by the services, and by `require_admin`
//! on admin routes so that it runs before the request body is read.

use axum::{
	extract::{Request, State},
	http::header,
	middleware::Next,
	response::Response,
};
use std::collections::HashMap;

use crate::extract::Auth;
use crate::prelude::*;
use plugboard_types::types::AuthCtx;

#[derive(Debug, Clone, Default)]
pub struct TokenTable {
	tokens: HashMap<Box<str>, AuthCtx>,
}

impl TokenTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Grant `ctx` to every request presenting `token`. Empty tokens are ignored.
	pub fn insert(&mut self, token: impl Into<Box<str>>, ctx: AuthCtx) {
		let token = token.into();
		if token.is_empty() {
			warn!("Ignoring empty token for {}", ctx.id_tag);
			return;
		}
		self.tokens.insert(token, ctx);
	}

	pub fn verify(&self, token: &str) -> Option<&AuthCtx> {
		self.tokens.get(token)
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}
}

fn bearer_token(req: &Request) -> Option<&str> {
	let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
	value.strip_prefix("Bearer ").map(str::trim)
}

pub async fn require_auth(State(app): State<App>, mut req: Request, next: Next) -> ClResult<Response> {
	let token = bearer_token(&req).ok_or(Error::Unauthorized)?;

	let Some(ctx) = app.tokens.verify(token).cloned() else {
		warn!(path = %req.uri().path(), "Rejected request with unknown token");
		return Err(Error::Unauthorized);
	};

	debug!(subject = %ctx.id_tag, "Authenticated request");
	req.extensions_mut().insert(Auth(ctx));

	Ok(next.run(req).await)
}

/// Middleware that rejects callers without the admin role (SADM)
pub async fn require_admin(Auth(auth): Auth, req: Request, next: Next) -> ClResult<Response> {
	if !auth.is_admin() {
		warn!(
			subject = %auth.id_tag,
			roles = ?auth.roles,
			path = %req.uri().path(),
			"Admin permission denied - SADM role required"
		);
		return Err(Error::PermissionDenied);
	}

	Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_token_table() {
		let mut tokens = TokenTable::new();
		tokens.insert("secret", AuthCtx::new("admin", &["SADM"]));
		tokens.insert("", AuthCtx::new("nobody", &[]));

		assert_eq!(tokens.len(), 1);
		assert!(tokens.verify("secret").is_some_and(AuthCtx::is_admin));
		assert!(tokens.verify("").is_none());
		assert!(tokens.verify("Secret").is_none());
	}
}

// vim: ts=4
