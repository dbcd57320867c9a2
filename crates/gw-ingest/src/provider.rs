//! Fetch boundary for upstream stats payloads.
//!
//! A [`StatsSource`] hands back raw response bodies only. Decoding is the
//! parser's job, so a source never interprets what it fetched.

use std::fmt;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors a [`StatsSource`] implementation may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network, timeout or TLS failure.
    Transport(String),
    /// Upstream answered with a non-success HTTP status.
    Status { status: u16, body: String },
    /// The source could not be built (bad base URL, bad client settings).
    Config(String),
}

impl FetchError {
    /// Upstream answered 404. Some endpoints use this for unknown names.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404, .. })
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport error: {msg}"),
            FetchError::Status { status, body } if body.is_empty() => {
                write!(f, "upstream http status={status}")
            }
            FetchError::Status { status, body } => {
                write!(f, "upstream http status={status}: {body}")
            }
            FetchError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Upstream stats API contract.
///
/// Object-safe and `Send + Sync` so the CLI can hold a `Box<dyn StatsSource>`
/// across await points.
#[async_trait::async_trait]
pub trait StatsSource: Send + Sync {
    /// Short name used in log events (e.g. `"http"`).
    fn source_name(&self) -> &'static str;

    async fn player_stats(&self, username: &str) -> Result<Vec<u8>, FetchError>;

    async fn guild_stats(&self, guild: &str) -> Result<Vec<u8>, FetchError>;

    async fn online_players(&self) -> Result<Vec<u8>, FetchError>;
}
