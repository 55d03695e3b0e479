//! Source document retrieval
//!
//! Sources are fetched through the [`PlaylistFetcher`] trait so the run can be
//! driven by the HTTP implementation in production and by in-memory fakes in
//! tests.

pub mod fetcher;

pub use fetcher::{HttpPlaylistFetcher, PlaylistFetcher};
