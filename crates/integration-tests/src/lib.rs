//! Integration tests for Customer Hub.
//!
//! Each test spawns the real router on an ephemeral port, backed by the
//! in-memory store, and talks to it over HTTP. No database is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p customer-hub-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::SecretString;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use customer_hub_api::config::{ApiConfig, BasicAuthConfig, StorageConfig};
use customer_hub_api::db::MemoryCustomerStore;
use customer_hub_api::{AppState, app};
use customer_hub_client::{ClientConfig, CustomerApi, CustomerStore};

/// Basic auth username the test server accepts.
pub const API_USERNAME: &str = "integration-user";
/// Basic auth password the test server accepts.
pub const API_PASSWORD: &str = "integration-password";

/// A running API server.
pub struct TestServer {
    pub addr: SocketAddr,
    /// Direct handle on the backing store, for assertions.
    pub store: Arc<MemoryCustomerStore>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Bind `127.0.0.1:0` and serve the API in a background task.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the listener cannot be bound.
    pub async fn spawn() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let config = ApiConfig {
            storage: StorageConfig::Memory,
            host: addr.ip(),
            port: addr.port(),
            base_url: format!("http://{addr}"),
            auth: BasicAuthConfig {
                username: API_USERNAME.to_string(),
                password: SecretString::from(API_PASSWORD),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };
        let store = Arc::new(MemoryCustomerStore::new());
        let router = app(AppState::new(config, store.clone()));

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            addr,
            store,
            handle,
        })
    }

    /// Absolute URL for a server path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// The API root clients are configured with.
    #[must_use]
    pub fn api_root(&self) -> String {
        self.url("/api")
    }

    /// A client store authenticated with the server's credentials.
    ///
    /// # Errors
    ///
    /// Returns the config error if the API root is not a valid URL.
    pub fn client_store(&self) -> Result<CustomerStore, customer_hub_client::config::ConfigError> {
        let config = ClientConfig::new(&self.api_root(), API_USERNAME, API_PASSWORD)?;
        Ok(CustomerStore::new(CustomerApi::new(config)))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
