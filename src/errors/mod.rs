//! Centralized error handling for m3u-merge
//!
//! Only two failure kinds are fatal for a run: a configuration file that cannot
//! be loaded, and a sink (output file or run log) that cannot be written. Source
//! fetch failures are contained to the source that produced them, and stream
//! reachability failures are never errors at all; they are recorded in the
//! run summary.
//!
//! # Usage
//!
//! ```rust
//! use m3u_merge::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("no sources configured"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
