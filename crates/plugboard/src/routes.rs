use axum::{
	extract::DefaultBodyLimit,
	middleware,
	routing::get,
	Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id;
use crate::prelude::*;
use plugboard_admin::{commands, plugins};
use plugboard_core::auth::{require_admin, require_auth};

async fn health() -> &'static str {
	"ok"
}

fn init_admin(app: App) -> Router<App> {
	Router::new()
		.route("/api/admin/plugins", get(plugins::list_plugins).put(plugins::update_plugins))
		.route("/api/admin/plugins/{name}", get(plugins::get_plugin))
		.route("/api/admin/commands", get(commands::get_commands).put(commands::update_commands))
		.route_layer(middleware::from_fn(require_admin))
		.route_layer(middleware::from_fn_with_state(app, require_auth))
}

pub fn init(app: App) -> Router {
	let public_router = Router::new().route("/api/health", get(health));

	Router::new()
		.merge(public_router)
		.merge(init_admin(app.clone()))
		.layer(DefaultBodyLimit::max(app.opts.body_limit))
		.layer(middleware::from_fn(request_id))
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
