//! Command table handlers

use axum::{body::Bytes, extract::State, http::StatusCode, Json};

use crate::prelude::*;
use plugboard_core::extract::{Auth, OptionalRequestId};
use plugboard_types::types::{ApiResponse, CommandTable};

/// GET /admin/commands
pub async fn get_commands(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<CommandTable>>)> {
	let table = app.commands.get(&auth)?;

	let response = ApiResponse::new(table).with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

/// PUT /admin/commands - Replace the whole command table
pub async fn update_commands(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	body: Bytes,
) -> ClResult<(StatusCode, Json<ApiResponse<CommandTable>>)> {
	let table = app.commands.put(&auth, &body).await?;
	debug!("Command table now has {} categories", table.len());

	let response = ApiResponse::new(table).with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

// vim: ts=4
