//! I/O ports and adapters used by the route store.

pub mod clock;
pub mod config;
pub mod history_store;
pub mod notify;
pub mod storage;
