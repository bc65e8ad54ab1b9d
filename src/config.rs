//! Configuration for the query engine handler.
//!
//! # Example
//!
//! ```
//! use es_query::EsConfig;
//!
//! // Minimal config (uses defaults)
//! let config = EsConfig::default();
//! assert_eq!(config.host, "127.0.0.1:9200");
//!
//! // Full config
//! let config = EsConfig {
//!     host: "search.internal:9200".into(),
//!     retries: 3,
//!     number_of_shards: 3,
//!     number_of_replicas: 1,
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

/// Configuration for a handler and its transport.
///
/// All fields have sensible defaults for a local single-node engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EsConfig {
    /// Engine host (e.g., "127.0.0.1:9200")
    #[serde(default = "default_host")]
    pub host: String,

    /// Transport retry count
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Default shard count for created indexes
    #[serde(default = "default_number_of_shards")]
    pub number_of_shards: u32,

    /// Default replica count for created indexes
    #[serde(default = "default_number_of_replicas")]
    pub number_of_replicas: u32,

    /// Default page size for searches
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_host() -> String {
    "127.0.0.1:9200".to_string()
}
fn default_retries() -> u32 {
    10
}
fn default_number_of_shards() -> u32 {
    1
}
fn default_number_of_replicas() -> u32 {
    1
}
fn default_limit() -> u64 {
    20
}

impl Default for EsConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            retries: default_retries(),
            number_of_shards: default_number_of_shards(),
            number_of_replicas: default_number_of_replicas(),
            limit: default_limit(),
        }
    }
}
