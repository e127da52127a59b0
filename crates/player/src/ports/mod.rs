//! Player port definitions.
//!
//! Outbound ports are the seams to the hosted identity provider, the
//! document store and the narration service. Application services depend
//! only on these traits.

pub mod outbound;
