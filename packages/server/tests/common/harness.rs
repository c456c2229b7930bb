//! Test harness for integration testing.
//!
//! Each test gets a fresh in-memory store and a router built exactly as the
//! server builds it, so requests go through the real middleware stack.

use std::sync::Arc;

use axum::Router;
use directory_core::kernel::{
    test_server_deps, BaseDocumentStore, MemoryDocumentStore, Notification, ServerDeps,
};
use directory_core::server::build_app;
use directory_core::HttpConfig;
use test_context::AsyncTestContext;
use tokio::sync::broadcast;

use super::ApiClient;

/// Test harness that manages test infrastructure.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let client = ctx.client();
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    /// Dependencies shared with the router - use for fixtures and assertions.
    pub deps: ServerDeps,
    router: Router,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {
        // Store is dropped with the harness
    }
}

impl TestHarness {
    /// Harness over a fresh in-memory store
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryDocumentStore::new()))
    }

    /// Harness over the given store (e.g. a fault-injecting one)
    pub fn with_store(store: Arc<dyn BaseDocumentStore>) -> Self {
        Self::build(store, Self::behind_proxy())
    }

    /// Harness with custom HTTP settings over a fresh in-memory store
    pub fn with_http_config(http: HttpConfig) -> Self {
        Self::build(Arc::new(MemoryDocumentStore::new()), http)
    }

    /// Default settings, deployed behind one reverse proxy.
    ///
    /// Requests carry no socket address in tests, so clients are told apart
    /// by the `X-Forwarded-For` hop the proxy would append.
    pub fn behind_proxy() -> HttpConfig {
        HttpConfig {
            trust_proxy: true,
            ..HttpConfig::default()
        }
    }

    fn build(store: Arc<dyn BaseDocumentStore>, http: HttpConfig) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let deps = test_server_deps(store);
        let router = build_app(deps.clone(), &http).expect("valid HTTP config");

        Self { deps, router }
    }

    /// Anonymous HTTP client
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.router.clone())
    }

    /// HTTP client carrying a valid bearer token for `email`
    pub fn client_as(&self, email: &str) -> ApiClient {
        let token = self
            .deps
            .jwt_service
            .create_token(email)
            .expect("token creation");
        self.client().with_token(token)
    }

    /// The router, for requests the client does not cover (streaming)
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Listen to notifications published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.deps.notifier.subscribe()
    }
}
