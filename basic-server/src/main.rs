mod plugins;

use std::{env, path::PathBuf, process::ExitCode, sync::Arc};

use plugboard::prelude::*;
use plugboard::types::{AuthCtx, ROLE_ADMIN};
use plugboard::AppBuilder;
use plugboard_kv_adapter_redb::KvAdapterRedb;

pub struct Config {
	pub listen: String,
	pub db_dir: PathBuf,
	pub admin_token: Option<String>,
	pub reader_token: Option<String>,
}

impl Config {
	fn from_env() -> Self {
		Config {
			listen: env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
			db_dir: PathBuf::from(env::var("DB_DIR").unwrap_or_else(|_| "./data".to_string())),
			admin_token: env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
			reader_token: env::var("READER_TOKEN").ok().filter(|t| !t.is_empty()),
		}
	}
}

async fn run(config: Config) -> ClResult<()> {
	let mut builder = AppBuilder::new();

	let kv_adapter = KvAdapterRedb::new(&config.db_dir).await?;
	builder.listen(config.listen).kv_adapter(Arc::new(kv_adapter));

	match config.admin_token {
		Some(token) => {
			builder.token(token, AuthCtx::new("admin", &[ROLE_ADMIN]));
		}
		None => warn!("ADMIN_TOKEN is not set, configuration cannot be changed over HTTP"),
	}
	if let Some(token) = config.reader_token {
		builder.token(token, AuthCtx::new("reader", &[]));
	}

	let plugins = plugins::register(&mut builder)?;
	builder.on_init(move |_app| async move {
		debug!(
			"Initial configuration: preview={:?} search={:?}",
			plugins.preview.get(),
			plugins.search.get()
		);
		plugins::spawn_retention_sweeper(plugins.retention);
		Ok(())
	});

	builder.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
	match run(Config::from_env()).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("FATAL: {}", e);
			ExitCode::FAILURE
		}
	}
}

// vim: ts=4
