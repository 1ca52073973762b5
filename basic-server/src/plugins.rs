//! Built-in demo modules and their configuration

use std::collections::BTreeMap;
use std::time::Duration;

use plugboard::prelude::*;
use plugboard::{configurable, AppBuilder, PluginHandle};

const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

// Retention //
//***********//
#[derive(Debug, Clone)]
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
	days: u32 => "Days to keep deleted items",
	enabled: bool => "Enable retention sweep",
});

// Preview //
//*********//
#[derive(Debug, Clone)]
pub struct Thumbnail {
	pub width: u32,
	pub height: u32,
	pub quality: f32,
}

impl Default for Thumbnail {
	fn default() -> Self {
		Self { width: 256, height: 256, quality: 0.8 }
	}
}

configurable!(Thumbnail {
	width: u32 => "Width (px)",
	height: u32 => "Height (px)",
	quality: f32 => "JPEG quality (0-1)",
});

#[derive(Debug, Clone)]
pub struct Preview {
	pub enabled: bool,
	pub max_file_size: u64,
	pub formats: Vec<String>,
	pub thumbnail: Thumbnail,
}

impl Default for Preview {
	fn default() -> Self {
		Self {
			enabled: true,
			max_file_size: 20 * 1024 * 1024,
			formats: ["png", "jpg", "webp"].map(String::from).to_vec(),
			thumbnail: Thumbnail::default(),
		}
	}
}

configurable!(Preview {
	enabled: bool => "Generate previews",
	max_file_size: u64 => "Largest file to preview (bytes)",
	formats: Vec<String> => "Formats",
	thumbnail: Thumbnail => "Thumbnail",
});

// Search //
//********//
#[derive(Debug, Clone, Default)]
pub struct Search {
	pub max_results: u16,
	pub fuzzy: bool,
	pub boost: BTreeMap<String, f64>,
	pub default_scope: Option<String>,
}

configurable!(Search {
	max_results: u16 => "Maximum results",
	fuzzy: bool => "Fuzzy matching",
	boost: BTreeMap<String, f64> => "Per-field score boost",
	default_scope: Option<String>,
});

pub struct Plugins {
	pub retention: PluginHandle<Retention>,
	pub preview: PluginHandle<Preview>,
	pub search: PluginHandle<Search>,
}

pub fn register(builder: &mut AppBuilder) -> ClResult<Plugins> {
	Ok(Plugins {
		retention: builder.register_plugin("retention", Retention::default())?,
		preview: builder.register_plugin("preview", Preview::default())?,
		search: builder
			.register_plugin("search", Search { max_results: 50, ..Search::default() })?,
	})
}

/// Periodic job reading the live retention settings on every run
pub fn spawn_retention_sweeper(retention: PluginHandle<Retention>) {
	tokio::spawn(async move {
		let mut interval = tokio::time::interval(SWEEP_INTERVAL);
		loop {
			interval.tick().await;
			let config = retention.get();
			if config.enabled {
				info!(days = config.days, "Retention sweep");
			} else {
				debug!("Retention sweep disabled");
			}
		}
	});
}

// vim: ts=4
