//! Shared helpers for integration tests.
//!
//! Provides [`TestHarness`], which starts a `wiremock` server standing in for
//! the metadata server and builds an [`EnrichmentService`] pointed at it.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wbprovider::config::ShareMapping;
use wbprovider::metadata::{EnrichmentService, PathTranslator, RemoteClient, ServerAddress};
use wiremock::MockServer;

pub struct TestHarness {
    pub server: MockServer,
    pub address: ServerAddress,
    pub service: EnrichmentService,
    pub cancel: CancellationToken,
}

impl TestHarness {
    /// Start a mock metadata server with the default share mapping.
    pub async fn new() -> Self {
        Self::with_shares(vec![ShareMapping::default()]).await
    }

    /// Start a mock metadata server with custom share mappings.
    pub async fn with_shares(shares: Vec<ShareMapping>) -> Self {
        let server = MockServer::start().await;
        let addr = server.address();
        let address = ServerAddress::new(addr.ip().to_string(), addr.port());
        let client = RemoteClient::new(Duration::from_secs(5), PathTranslator::new(shares))
            .expect("failed to build client");

        Self {
            server,
            address,
            service: EnrichmentService::new(client),
            cancel: CancellationToken::new(),
        }
    }

    pub fn client(&self) -> &RemoteClient {
        self.service.client()
    }
}

/// An address nothing is listening on.
pub async fn unreachable_address() -> ServerAddress {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    ServerAddress::new("127.0.0.1", port)
}

/// A full payload in the server's wire format.
pub fn sample_payload() -> Value {
    json!({
        "title": "Foo",
        "comment1": "A summary",
        "create_time": "2020-05-01 00:00:00",
        "tag": "Action,★★★",
        "comment2": "http://images.example/foo.jpg",
        "artist": "Alice Bob",
        "writer": "Studio X",
        "score": 7.5
    })
}
