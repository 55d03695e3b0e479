//! Run-level services: stream probing and source aggregation

pub mod aggregator;
pub mod stream_checker;

pub use aggregator::PlaylistAggregator;
pub use stream_checker::{HttpStreamChecker, StreamChecker};
