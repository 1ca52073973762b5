//! Custom middlewares

use axum::{
	extract::Request,
	http::{HeaderName, HeaderValue},
	middleware::Next,
	response::Response,
};
use uuid::Uuid;

use plugboard_core::extract::RequestId;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_REQUEST_ID_LEN: usize = 64;

/// Attach a request ID to every request (the caller's `X-Request-Id`, or a fresh
/// one) and echo it in the response
pub async fn request_id(mut req: Request, next: Next) -> Response {
	let id = req
		.headers()
		.get(&REQUEST_ID_HEADER)
		.and_then(|h| h.to_str().ok())
		.filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
		.map_or_else(|| Uuid::new_v4().simple().to_string(), str::to_string);

	req.extensions_mut().insert(RequestId(id.clone()));
	let mut res = next.run(req).await;

	if let Ok(value) = HeaderValue::from_str(&id) {
		res.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
	}
	res
}

// vim: ts=4
