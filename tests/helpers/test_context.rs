//! Test context for unified test setup
//!
//! Wires a mock backend, a session context, the API client and every
//! service together the way the binary does.

use std::sync::{Arc, Once};

use serde_json::Value;
use siorma::client::ApiClient;
use siorma::config::ApiConfig;
use siorma::models::User;
use siorma::services::ServiceFactory;
use siorma::session::{FileStore, MemoryStore, SessionContext};
use tempfile::TempDir;

use super::backend_mock::BackendMockServer;

static INIT: Once = Once::new();

/// Install a test subscriber once per process
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("siorma=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Unified test context that manages all test components
pub struct TestContext {
    pub backend: BackendMockServer,
    pub session: Arc<SessionContext>,
    pub client: ApiClient,
    pub services: ServiceFactory,
    pub temp_dir: TempDir,
}

impl TestContext {
    /// Context with in-memory session slots
    pub async fn new() -> Self {
        Self::build(|_| SessionContext::in_memory()).await
    }

    /// Context whose persistent slot is a file inside the temp dir
    pub async fn with_file_session() -> Self {
        Self::build(|dir| {
            SessionContext::new(
                Arc::new(FileStore::in_dir(dir.path().join("data"))),
                Arc::new(MemoryStore::new()),
            )
        })
        .await
    }

    async fn build(session: impl FnOnce(&TempDir) -> SessionContext) -> Self {
        init_test_env();

        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let backend = BackendMockServer::new().await;
        let session = Arc::new(session(&temp_dir));
        let client = Self::client_for(&backend.uri(), session.clone());
        let services = ServiceFactory::new(client.clone());

        Self {
            backend,
            session,
            client,
            services,
            temp_dir,
        }
    }

    pub fn client_for(base_url: &str, session: Arc<SessionContext>) -> ApiClient {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            user_agent: "siorma-tests".to_string(),
        };
        ApiClient::new(&config, session).expect("Failed to build API client")
    }

    /// Pretend a login already happened
    pub fn login_as(&self, token: &str, user: &Value, remember: bool) {
        let user: User = serde_json::from_value(user.clone()).expect("valid user fixture");
        self.session.set_token(token, remember).expect("store token");
        self.session.set_user(&user, remember).expect("store user");
    }

    pub fn origin(&self) -> String {
        self.client.origin()
    }
}
