//! gw-ingest
//!
//! Upstream payload ingestion: the fetch boundary ([`StatsSource`]), numeric
//! normalization of drifting JSON fields, and the snapshot parser that turns
//! raw bodies into `gw-schemas` records.
//!
//! Parsing is pure. The only side effects in this crate are network I/O in
//! [`http`] and `tracing` events.

pub mod error;
pub mod http;
pub mod lookup;
pub mod normalizer;
pub mod parser;
pub mod provider;

pub use error::{IngestError, SchemaError};
pub use http::HttpStatsSource;
pub use lookup::{fetch_guild, fetch_online, fetch_player, LookupError};
pub use parser::{parse_guild, parse_online_feed, parse_player};
pub use provider::{FetchError, StatsSource};
