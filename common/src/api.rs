//! Wire contract between the storefront UI and the drop store service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drop::{Drop, DropId};

/// Per-attempt idempotency token. Replaying a ticket returns the original
/// receipt instead of accumulating a second time, so client retries are safe.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JoinTicket(pub String);

/// Body of `POST /drops/{id}/join`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    pub ticket: JoinTicket,
    /// Cart total in minor units.
    pub amount: u64,
}

/// The server's reply to a join: the committed row plus what was accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinReceipt {
    pub drop: Drop,
    /// Portion of the requested amount actually committed (clamped at target).
    pub accepted: u64,
    pub funded: bool,
    pub ticket: JoinTicket,
}

/// Subset of drop columns returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropSummary {
    pub id: DropId,
    pub raised: u64,
    pub target: u64,
}

/// Error payload shape shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// The two failure kinds the storefront distinguishes, plus missing rows.
/// Both are surfaced to the visitor as a message; neither is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("failed to read drop data: {0}")]
    Read(String),
    #[error("failed to commit join: {0}")]
    Write(String),
    #[error("no drop '{0}'")]
    NotFound(String),
}
