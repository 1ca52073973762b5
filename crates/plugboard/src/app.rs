//! App builder - constructs and runs the Plugboard application

use std::{future::Future, pin::Pin, sync::Arc};

use crate::prelude::*;
use crate::routes;
use plugboard_core::auth::TokenTable;
use plugboard_core::commands::CommandService;
use plugboard_core::field::Configurable;
use plugboard_core::registry::{PluginHandle, PluginRegistry};
use plugboard_core::service::PluginConfigService;
use plugboard_types::kv_adapter::KvAdapter;
use plugboard_types::types::{AuthCtx, CommandTable};

pub use plugboard_core::app::{App, AppBuilderOpts, AppState, VERSION};

/// Type alias for async initialization callbacks
type InitCallback =
	Box<dyn FnOnce(App) -> Pin<Box<dyn Future<Output = ClResult<()>> + Send>> + Send>;

pub struct AppBuilder {
	opts: AppBuilderOpts,
	kv_adapter: Option<Arc<dyn KvAdapter>>,
	registry: PluginRegistry,
	tokens: TokenTable,
	commands: CommandTable,
	on_init: Vec<InitCallback>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// Tests build several apps per process; keep the first subscriber
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder {
			opts: AppBuilderOpts::default(),
			kv_adapter: None,
			registry: PluginRegistry::new(),
			tokens: TokenTable::new(),
			commands: CommandTable::default(),
			on_init: Vec::new(),
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn body_limit(&mut self, body_limit: usize) -> &mut Self {
		self.opts.body_limit = body_limit;
		self
	}

	// Adapters
	pub fn kv_adapter(&mut self, kv_adapter: Arc<dyn KvAdapter>) -> &mut Self {
		self.kv_adapter = Some(kv_adapter);
		self
	}

	/// Accept `token` as a bearer token authenticating `ctx`
	pub fn token(&mut self, token: impl Into<Box<str>>, ctx: AuthCtx) -> &mut Self {
		self.tokens.insert(token, ctx);
		self
	}

	/// Command table used until a stored one is loaded
	pub fn default_commands(&mut self, commands: CommandTable) -> &mut Self {
		self.commands = commands;
		self
	}

	/// Register a module's configuration object. The returned handle always sees
	/// the live configuration.
	pub fn register_plugin<T: Configurable>(
		&mut self,
		name: impl Into<String>,
		config: T,
	) -> ClResult<PluginHandle<T>> {
		self.registry.register(name, config)
	}

	/// Register an async initialization callback that runs after the App is
	/// created and stored configuration is loaded, but before serving starts.
	pub fn on_init<F, Fut>(&mut self, f: F) -> &mut Self
	where
		F: FnOnce(App) -> Fut + Send + 'static,
		Fut: Future<Output = ClResult<()>> + Send + 'static,
	{
		self.on_init.push(Box::new(move |app| Box::pin(f(app))));
		self
	}

	/// Build the application state without serving it
	pub async fn build(self) -> ClResult<App> {
		let Some(kv_adapter) = self.kv_adapter else {
			error!("FATAL: No KV adapter configured");
			return Err(Error::ConfigError("No KV adapter configured".to_string()));
		};
		if self.tokens.is_empty() {
			warn!("No API tokens configured, the admin API will reject every request");
		}

		info!("Registered {} plugins", self.registry.len());
		let plugin_registry = Arc::new(self.registry.freeze());

		let plugins = PluginConfigService::new(plugin_registry.clone(), kv_adapter.clone());
		let loaded = plugins.load_persisted().await.map_err(|e| {
			error!("FATAL: Cannot load stored plugin configuration: {}", e);
			e
		})?;
		info!("Loaded stored configuration for {} of {} plugins", loaded, plugin_registry.len());

		let commands = CommandService::new(self.commands, kv_adapter.clone());
		if commands.load_persisted().await? {
			info!("Loaded stored command table");
		}

		let app: App = Arc::new(AppState {
			opts: self.opts,
			tokens: self.tokens,
			kv_adapter,
			plugin_registry,
			plugins,
			commands,
		});

		// Run custom init callbacks
		for callback in self.on_init {
			callback(app.clone()).await?;
		}

		Ok(app)
	}

	pub async fn run(self) -> ClResult<()> {
		info!("Plugboard V{}", VERSION);

		let app = self.build().await?;
		let router = routes::init(app.clone());

		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await.map_err(|e| {
			error!("FATAL: Cannot listen on {}: {}", app.opts.listen, e);
			e
		})?;
		info!("Listening on HTTP {}", app.opts.listen);

		axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
		info!("Shut down");
		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		error!("Cannot install Ctrl-C handler: {}", e);
		std::future::pending::<()>().await;
	}
	info!("Shutdown requested");
}

// vim: ts=4
