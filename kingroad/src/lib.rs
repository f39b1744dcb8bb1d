//! KingRoad route manager: one active navigation route plus a capped history
//! of past attempts, persisted through a key-value port.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (route records, bounded history,
//!   destination normalization, invariants). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting ports and adapters (storage, configuration,
//!   notifications, clock). Isolated to enable fakes in tests.
//!
//! [`store::RouteStore`] coordinates core logic with I/O; [`render`] turns its
//! read-only snapshots into HTML for whichever host displays them.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod render;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
