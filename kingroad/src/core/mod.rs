//! Deterministic, pure logic for routes and their history log.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests; the
//! random estimator is the single exception and sits behind a trait.

pub mod destination;
pub mod estimate;
pub mod history;
pub mod invariants;
pub mod types;
