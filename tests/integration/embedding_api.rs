use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use jobmatch::config::EmbeddingConfig;
use jobmatch::embeddings::{ApiProvider, EmbeddingProvider, EmbeddingService, local_embedding};

const DIM: usize = 4;

fn config(server: &MockServer) -> EmbeddingConfig {
    EmbeddingConfig {
        provider: "api".to_string(),
        endpoint: Some(server.url("/v1/embeddings")),
        model: "test-embed".to_string(),
        api_key_env: "JOBMATCH_TEST_KEY_THAT_IS_NOT_SET".to_string(),
        timeout_secs: 5,
        ..EmbeddingConfig::default()
    }
}

#[test]
fn api_provider_returns_vectors_in_input_order() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "data": [
                    { "index": 1, "embedding": [0.0, 1.0, 0.0, 0.0] },
                    { "index": 0, "embedding": [1.0, 0.0, 0.0, 0.0] }
                ]
            }));
    });

    let provider = ApiProvider::new(&config(&server), DIM).unwrap();
    let vectors = provider
        .embed_batch(&["first".to_string(), "second".to_string()])
        .unwrap();

    mock.assert();
    assert_eq!(vectors[0], vec![1.0, 0.0, 0.0, 0.0]);
    assert_eq!(vectors[1], vec![0.0, 1.0, 0.0, 0.0]);
}

#[test]
fn server_error_falls_back_to_local_embedding() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings");
        then.status(500).body("upstream exploded");
    });

    let config = config(&server);
    let provider = ApiProvider::new(&config, DIM).unwrap();
    let service = EmbeddingService::with_provider(Arc::new(provider), &config, DIM);

    let vector = service.embed("rust engineer");
    assert_eq!(vector, local_embedding("rust engineer", DIM));
    assert_eq!(service.stats().fallback_chunks, 1);

    // served from the cache under the local key
    let again = service.embed("rust engineer");
    assert_eq!(again, vector);
    assert_eq!(service.stats().fallback_chunks, 1);
}

#[test]
fn slow_provider_times_out_into_local_embedding() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings");
        then.status(200)
            .header("content-type", "application/json")
            .delay(Duration::from_secs(3))
            .json_body(json!({
                "data": [
                    { "index": 0, "embedding": [1.0, 0.0, 0.0, 0.0] },
                    { "index": 1, "embedding": [0.0, 1.0, 0.0, 0.0] }
                ]
            }));
    });

    let config = EmbeddingConfig {
        timeout_secs: 1,
        ..config(&server)
    };
    let provider = ApiProvider::new(&config, DIM).unwrap();
    let service = EmbeddingService::with_provider(Arc::new(provider), &config, DIM);

    let texts = vec!["rust engineer".to_string(), "前端 React".to_string()];
    let vectors = service.embed_many(&texts);
    assert_eq!(vectors[0], local_embedding("rust engineer", DIM));
    assert_eq!(vectors[1], local_embedding("前端 React", DIM));
    assert_eq!(service.stats().fallback_chunks, 1);
}

#[test]
fn wrong_vector_count_is_a_provider_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "data": [ { "index": 0, "embedding": [1.0, 0.0, 0.0, 0.0] } ] }));
    });

    let provider = ApiProvider::new(&config(&server), DIM).unwrap();
    let result = provider.embed_batch(&["a".to_string(), "b".to_string()]);
    assert!(result.is_err());
}

#[test]
fn wrong_dimension_is_a_provider_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "data": [ { "index": 0, "embedding": [1.0, 0.0] } ] }));
    });

    let config = config(&server);
    let provider = ApiProvider::new(&config, DIM).unwrap();
    assert!(provider.embed_batch(&["a".to_string()]).is_err());

    let service = EmbeddingService::with_provider(Arc::new(provider), &config, DIM);
    assert!(service.embed_batch(&["a".to_string()]).is_err());
    assert_eq!(service.embed("a").len(), DIM);
}
