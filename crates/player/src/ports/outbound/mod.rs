//! Outbound ports (driven side)

mod clock_port;
mod document_store_port;
mod error;
mod identity_port;
mod narration_port;

pub use clock_port::ClockPort;
pub use document_store_port::{
    Document, DocumentPath, DocumentStorePort, SetOptions, SnapshotCallback, Subscription,
};
pub use error::{IdentityError, NarrationError, StoreError};
pub use identity_port::{AuthStateCallback, IdentityPort};
pub use narration_port::{NarrationPort, NarrationRequest, NarrationResponse};

#[cfg(any(test, feature = "testing"))]
pub use clock_port::MockClockPort;
#[cfg(any(test, feature = "testing"))]
pub use document_store_port::MockDocumentStorePort;
#[cfg(any(test, feature = "testing"))]
pub use identity_port::MockIdentityPort;
#[cfg(any(test, feature = "testing"))]
pub use narration_port::MockNarrationPort;
