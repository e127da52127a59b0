//! In-process adapters for the identity provider and the document store
//!
//! They keep the hosted services' observable behavior (merge writes,
//! immediate first snapshot, auth observers) without a network, so the
//! headless binary runs offline and tests exercise real sync paths.

mod document_store;
mod identity_provider;

pub use document_store::InMemoryDocumentStore;
pub use identity_provider::InMemoryIdentityProvider;
