//! Plugin configuration handlers

use axum::{
	body::Bytes,
	extract::{Path, State},
	http::StatusCode,
	Json,
};
use serde::Serialize;

use crate::prelude::*;
use plugboard_core::describe::FieldDescriptor;
use plugboard_core::extract::{Auth, OptionalRequestId};
use plugboard_core::service::PluginSnapshot;
use plugboard_types::types::ApiResponse;

/// GET /admin/plugins - Describe the configuration of every registered plugin
pub async fn list_plugins(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<PluginSnapshot>>)> {
	let snapshot = app.plugins.read_all(&auth)?;

	let response = ApiResponse::new(snapshot).with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

/// GET /admin/plugins/{name} - Describe a single plugin
pub async fn get_plugin(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(name): Path<String>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<Vec<FieldDescriptor>>>)> {
	let fields = app.plugins.read_one(&auth, &name)?;

	let response = ApiResponse::new(fields).with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

#[derive(Debug, Serialize)]
pub struct UpdatePluginsResponse {
	pub updated: Vec<String>,
}

/// PUT /admin/plugins - Merge `{plugin: {field: value}}` onto the live configuration
///
/// The body is taken raw so that permission is checked before it is parsed.
pub async fn update_plugins(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	body: Bytes,
) -> ClResult<(StatusCode, Json<ApiResponse<UpdatePluginsResponse>>)> {
	let updated = app.plugins.write_batch(&auth, &body).await?;

	let response = ApiResponse::new(UpdatePluginsResponse { updated })
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

// vim: ts=4
