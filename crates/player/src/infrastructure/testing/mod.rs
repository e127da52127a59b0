//! Test fixtures shared by unit tests (and by downstream tests with the
//! `testing` feature).

mod fixtures;

pub use fixtures::*;
