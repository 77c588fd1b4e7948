use std::sync::Arc;
use std::thread;

use geochunk_core::{ChunkKey, ChunkState, Payload};
use geochunk_storage::{CacheError, ChunkCache, JsonFileCache};
use geochunk_stream::{ChunkStreamingService, GenerationMode, StreamError};
use tempfile::TempDir;

#[test]
fn test_request_chunk_is_deterministic() {
    let service = ChunkStreamingService::default();
    let key = ChunkKey::new(10, 20, 2);

    let chunk_a = service.request_chunk(key).unwrap();
    let chunk_b = service.request_chunk(key).unwrap();

    assert_eq!(chunk_a.payload, chunk_b.payload);
    assert_eq!(chunk_a.metadata, chunk_b.metadata);
    assert_eq!(chunk_a.state, ChunkState::Loaded);
}

#[test]
fn test_fresh_services_agree() {
    let keys = [
        ChunkKey::new(0, 0, 0),
        ChunkKey::new(-45, 170, 3),
        ChunkKey::new(i32::MAX, i32::MIN, 0),
    ];
    for key in keys {
        let a = ChunkStreamingService::default().request_chunk(key).unwrap();
        let b = ChunkStreamingService::default().request_chunk(key).unwrap();
        let text_a = serde_json::to_string(&a.payload).unwrap();
        let text_b = serde_json::to_string(&b.payload).unwrap();
        assert_eq!(text_a, text_b);
        assert_eq!(a.metadata, b.metadata);
    }
}

#[test]
fn test_chunk_unload_clears_payload() {
    let service = ChunkStreamingService::default();
    let key = ChunkKey::new(1, 2, 0);

    let chunk = service.request_chunk(key).unwrap();
    assert!(!chunk.payload.features.is_empty());

    let chunk = service.unload_chunk(key).unwrap();
    assert_eq!(chunk.payload, Payload::default());
    assert_eq!(serde_json::to_value(&chunk.payload).unwrap(), serde_json::json!({}));
    assert_eq!(chunk.state, ChunkState::Unloaded);
}

#[test]
fn test_unload_missing_chunk_raises() {
    let service = ChunkStreamingService::default();
    let key = ChunkKey::new(0, 0, 0);

    match service.unload_chunk(key) {
        Err(StreamError::Lifecycle { key: missing }) => assert_eq!(missing, key),
        other => panic!("expected lifecycle error, got {:?}", other),
    }
    assert!(service.get_loaded_chunks().is_empty());
}

#[test]
fn test_file_cache_mirrors_lifecycle() {
    let dir = TempDir::new().unwrap();
    let cache = Arc::new(JsonFileCache::open(dir.path()).unwrap());
    let service = ChunkStreamingService::new(GenerationMode::Deterministic, Some(cache.clone()));
    let key = ChunkKey::new(-3, 14, 1);

    let chunk = service.request_chunk(key).unwrap();
    let record = cache.load(&key).unwrap();
    assert_eq!(record.key, key);
    assert_eq!(record.metadata, chunk.metadata);
    assert_eq!(record.payload, chunk.payload);

    service.unload_chunk(key).unwrap();
    assert!(matches!(cache.load(&key), Err(CacheError::NotFound { .. })));
    assert!(!cache.path_for(&key).exists());
}

#[test]
fn test_cache_record_is_readable_by_external_tooling() {
    let dir = TempDir::new().unwrap();
    let cache = Arc::new(JsonFileCache::open(dir.path()).unwrap());
    let service = ChunkStreamingService::new(GenerationMode::Deterministic, Some(cache.clone()));
    let key = ChunkKey::new(10, 20, 2);
    service.request_chunk(key).unwrap();

    let text = std::fs::read_to_string(dir.path().join("lat_10/lon_20/lod_2.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["key"]["level_of_detail"], 2);
    assert_eq!(value["payload"]["features"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["payload"]["seed"], key.seed());
    assert!(value["metadata"]["elevation"].is_f64());
    assert!(value["metadata"]["temperature"].is_f64());
}

#[test]
fn test_concurrent_first_requests_generate_once() {
    let service = Arc::new(ChunkStreamingService::default());
    let key = ChunkKey::new(33, 44, 0);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            thread::spawn(move || service.request_chunk(key).unwrap())
        })
        .collect();
    let chunks: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(chunks.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(service.metrics().chunks_generated(), 1);
    assert_eq!(service.metrics().fast_path_hits(), 7);
}
