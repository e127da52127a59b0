//! Infrastructure adapters
//!
//! Concrete implementations of the outbound ports plus configuration
//! loading for the composition root.

pub mod clock;
pub mod config;
pub mod http_client;
pub mod memory;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use clock::SystemClock;
pub use config::{load_dotenv_from_repo_root, BackendConfig, ClientConfig};
pub use http_client::HttpNarrationClient;
pub use memory::{InMemoryDocumentStore, InMemoryIdentityProvider};
