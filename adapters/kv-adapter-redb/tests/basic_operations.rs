//! Basic KV adapter operation tests

use plugboard_kv_adapter_redb::KvAdapterRedb;
use plugboard_types::error::Error;
use plugboard_types::kv_adapter::KvAdapter;
use plugboard_types::value::Value;
use tempfile::TempDir;

async fn create_test_adapter() -> (KvAdapterRedb, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = KvAdapterRedb::new(temp_dir.path()).await.expect("Failed to create adapter");
	(adapter, temp_dir)
}

fn doc(v: serde_json::Value) -> Value {
	Value::from(v)
}

#[tokio::test]
async fn test_put_and_get() {
	let (adapter, _temp) = create_test_adapter().await;
	let value = doc(serde_json::json!({
		"days": 10,
		"enabled": true,
		"quality": 0.25,
		"formats": ["png", "jpg"],
		"thumbnail": {"width": 64},
		"note": null,
	}));

	adapter.put("plugins", "retention", &value).await.expect("Failed to put");
	let stored = adapter.get("plugins", "retention").await.expect("Failed to get");

	assert_eq!(stored, Some(value));
}

#[tokio::test]
async fn test_missing_key() {
	let (adapter, _temp) = create_test_adapter().await;
	assert_eq!(adapter.get("plugins", "ghost").await.expect("Failed to get"), None);
}

#[tokio::test]
async fn test_put_overwrites() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.put("config", "commands", &doc(serde_json::json!({"a": ["x"]}))).await.expect("put");
	adapter.put("config", "commands", &doc(serde_json::json!({"b": []}))).await.expect("put");

	let stored = adapter.get("config", "commands").await.expect("get");
	assert_eq!(stored, Some(doc(serde_json::json!({"b": []}))));
}

#[tokio::test]
async fn test_large_unsigned_survives() {
	let (adapter, _temp) = create_test_adapter().await;
	let value = doc(serde_json::json!({"max_size": u64::MAX, "offset": -5}));
	adapter.put("plugins", "preview", &value).await.expect("put");

	let stored = adapter.get("plugins", "preview").await.expect("get").expect("stored");
	assert_eq!(stored.get("max_size"), Some(&Value::UInt(u64::MAX)));
	assert_eq!(stored.get("offset"), Some(&Value::Int(-5)));
}

#[tokio::test]
async fn test_namespaces_are_isolated() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.put("plugins", "commands", &Value::from(1_i64)).await.expect("put");
	adapter.put("config", "commands", &Value::from(2_i64)).await.expect("put");
	adapter.put("plugins", "search", &Value::from(3_i64)).await.expect("put");

	assert_eq!(adapter.get("plugins", "commands").await.expect("get"), Some(Value::Int(1)));
	assert_eq!(adapter.get("config", "commands").await.expect("get"), Some(Value::Int(2)));

	let keys = adapter.list_keys("plugins").await.expect("list");
	assert_eq!(keys, vec![Box::from("commands"), Box::from("search")]);
	let keys = adapter.list_keys("config").await.expect("list");
	assert_eq!(keys.len(), 1);
	assert!(adapter.list_keys("other").await.expect("list").is_empty());
}

#[tokio::test]
async fn test_delete() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.put("plugins", "search", &Value::Bool(true)).await.expect("put");

	assert!(adapter.delete("plugins", "search").await.expect("delete"));
	assert!(!adapter.delete("plugins", "search").await.expect("delete"));
	assert_eq!(adapter.get("plugins", "search").await.expect("get"), None);
}

#[tokio::test]
async fn test_invalid_namespace() {
	let (adapter, _temp) = create_test_adapter().await;
	let err = adapter.put("a:b", "key", &Value::Null).await.unwrap_err();
	assert!(matches!(err, Error::Persistence(_)));
	assert!(adapter.get("", "key").await.is_err());
}

#[tokio::test]
async fn test_data_survives_reopen() {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	{
		let adapter = KvAdapterRedb::new(temp_dir.path()).await.expect("open");
		adapter.put("plugins", "retention", &doc(serde_json::json!({"days": 7}))).await.expect("put");
	}

	let adapter = KvAdapterRedb::new(temp_dir.path()).await.expect("reopen");
	let stored = adapter.get("plugins", "retention").await.expect("get");
	assert_eq!(stored, Some(doc(serde_json::json!({"days": 7}))));
}

// vim: ts=4
