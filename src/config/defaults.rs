/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Output defaults
pub const DEFAULT_OUTPUT_PATH: &str = "output.m3u";
pub const DEFAULT_LOG_PATH: &str = "output.log";

// Network defaults
pub const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 15;
pub const DEFAULT_CHECK_TIMEOUT_SECONDS: u64 = 10;

// Deduplication defaults
pub const DEFAULT_MAX_STREAMS_PER_CHANNEL: usize = 3;

// Plain-list defaults
pub const DEFAULT_PLAIN_LIST_GROUP: &str = "Plain";
