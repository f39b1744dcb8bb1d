//! Expected, user-facing failures of route operations.

use thiserror::Error;

use crate::core::types::RouteId;

/// Recoverable conditions reported by the store; none of them is fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// `cancel` with no active route.
    #[error("no active route to cancel")]
    NoActiveRoute,

    /// `reactivate` with an id absent from history.
    #[error("route {0} not found in history")]
    RouteNotFound(RouteId),

    /// Destination empty after trimming.
    #[error("destination must not be empty")]
    InvalidDestination,
}
