//! Common test utilities and helpers
//!
//! Builds a complete app on top of a temporary redb store and drives its router
//! in-process.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
	body::Body,
	http::{Method, Request, StatusCode},
	Router,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use plugboard::error::{ClResult, Error};
use plugboard::kv_adapter::KvAdapter;
use plugboard::types::AuthCtx;
use plugboard::{configurable, routes, App, AppBuilder, PluginHandle, Value};
use plugboard_kv_adapter_redb::KvAdapterRedb;

pub const ADMIN_TOKEN: &str = "admin-secret";
pub const READER_TOKEN: &str = "reader-secret";

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

/// Store whose writes always fail
#[derive(Debug)]
pub struct ReadOnlyKvAdapter;

#[async_trait]
impl KvAdapter for ReadOnlyKvAdapter {
	async fn put(&self, _namespace: &str, _key: &str, _value: &Value) -> ClResult<()> {
		Err(Error::Persistence("read-only store".into()))
	}

	async fn get(&self, _namespace: &str, _key: &str) -> ClResult<Option<Value>> {
		Ok(None)
	}

	async fn delete(&self, _namespace: &str, _key: &str) -> ClResult<bool> {
		Ok(false)
	}

	async fn list_keys(&self, _namespace: &str) -> ClResult<Vec<Box<str>>> {
		Ok(Vec::new())
	}
}

pub struct TestApp {
	pub app: App,
	pub router: Router,
	pub retention: PluginHandle<Retention>,
	pub kv: Arc<dyn KvAdapter>,
	_temp: Option<TempDir>,
}

pub async fn build_app(kv: Arc<dyn KvAdapter>, temp: Option<TempDir>) -> TestApp {
	let mut builder = AppBuilder::new();
	builder
		.kv_adapter(kv.clone())
		.token(ADMIN_TOKEN, AuthCtx::new("admin", &["SADM"]))
		.token(READER_TOKEN, AuthCtx::new("reader", &["USER"]))
		.body_limit(1024);
	let retention = builder.register_plugin("retention", Retention::default()).expect("register");

	let app = builder.build().await.expect("Failed to build app");
	let router = routes::init(app.clone());
	TestApp { app, router, retention, kv, _temp: temp }
}

pub async fn test_app() -> TestApp {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let kv = KvAdapterRedb::new(temp_dir.path()).await.expect("Failed to create adapter");
	build_app(Arc::new(kv), Some(temp_dir)).await
}

/// Send a request through the router; returns the status and the JSON body (Null if empty)
pub async fn send(
	router: &Router,
	method: Method,
	uri: &str,
	token: Option<&str>,
	body: &str,
) -> (StatusCode, serde_json::Value) {
	let mut req = Request::builder().method(method).uri(uri);
	if let Some(token) = token {
		req = req.header("Authorization", format!("Bearer {}", token));
	}
	let req = req.body(Body::from(body.to_string())).expect("request");

	let res = router.clone().oneshot(req).await.expect("response");
	let status = res.status();
	let bytes = res.into_body().collect().await.expect("body").to_bytes();
	let json = if bytes.is_empty() {
		serde_json::Value::Null
	} else {
		serde_json::from_slice(&bytes)
			.unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()))
	};
	(status, json)
}

// vim: ts=4
