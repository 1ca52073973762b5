//! App state type

use std::sync::Arc;

use crate::auth::TokenTable;
use crate::commands::CommandService;
use crate::registry::FrozenPluginRegistry;
use crate::service::PluginConfigService;
use plugboard_types::kv_adapter::KvAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub tokens: TokenTable,

	pub kv_adapter: Arc<dyn KvAdapter>,

	pub plugin_registry: Arc<FrozenPluginRegistry>,
	pub plugins: PluginConfigService,
	pub commands: CommandService,
}

pub type App = Arc<AppState>;

#[derive(Debug)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	/// Maximum accepted request body size in bytes
	pub body_limit: usize,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		Self { listen: "127.0.0.1:8080".into(), body_limit: 256 * 1024 }
	}
}

// vim: ts=4
