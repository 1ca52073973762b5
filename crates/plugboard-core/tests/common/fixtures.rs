//! Plugin configurations and a pre-wired service pair

use std::sync::Arc;

use plugboard_core::commands::CommandService;
use plugboard_core::configurable;
use plugboard_core::registry::{PluginHandle, PluginRegistry};
use plugboard_core::service::PluginConfigService;
use plugboard_types::types::{AuthCtx, CommandTable};

use super::MemoryKvAdapter;

#[derive(Debug, Clone, PartialEq)]
pub struct Retention {
	pub days: u32,
	pub enabled: bool,
}

impl Default for Retention {
	fn default() -> Self {
		Self { days: 30, enabled: true }
	}
}

configurable!(Retention {
	days: u32 => "Days to keep",
	enabled: bool => "Enabled",
});

#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
	pub width: u32,
	pub quality: f64,
}

impl Default for Thumbnail {
	fn default() -> Self {
		Self { width: 128, quality: 0.8 }
	}
}

configurable!(Thumbnail {
	width: u32 => "Width",
	quality: f64 => "Quality",
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preview {
	pub enabled: bool,
	pub formats: Vec<String>,
	pub thumbnail: Thumbnail,
}

configurable!(Preview {
	enabled: bool => "Enable previews",
	formats: Vec<String> => "Formats",
	thumbnail: Thumbnail => "Thumbnail",
});

pub fn admin() -> AuthCtx {
	AuthCtx::new("root", &["SADM"])
}

pub fn reader() -> AuthCtx {
	AuthCtx::new("guest", &["USER"])
}

pub struct Fixture {
	pub kv: Arc<MemoryKvAdapter>,
	pub plugins: PluginConfigService,
	pub commands: CommandService,
	pub retention: PluginHandle<Retention>,
	pub preview: PluginHandle<Preview>,
}

pub fn fixture() -> Fixture {
	fixture_with(Arc::new(MemoryKvAdapter::new()))
}

/// Build the services on top of an existing adapter (e.g. a pre-seeded one)
pub fn fixture_with(kv: Arc<MemoryKvAdapter>) -> Fixture {
	let mut registry = PluginRegistry::new();
	let retention = registry.register("retention", Retention::default()).expect("register retention");
	let preview = registry.register("preview", Preview::default()).expect("register preview");
	let registry = Arc::new(registry.freeze());

	Fixture {
		plugins: PluginConfigService::new(registry, kv.clone()),
		commands: CommandService::new(CommandTable::default(), kv.clone()),
		kv,
		retention,
		preview,
	}
}

// vim: ts=4
