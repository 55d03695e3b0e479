//! Playlist parsing, filtering and composition
//!
//! The pipeline for one source is:
//!
//! 1. [`plain_list::adapt`] converts one-channel-per-line text into header/stream
//!    pairs when the document is not an extended M3U;
//! 2. [`assembler::ChannelAssembler`] walks the lines, keeps the channels the
//!    [`filter::FilterSet`] accepts and annotates their streams;
//! 3. [`composer::OutputComposer`] concatenates every source's channels,
//!    optionally merging same-named channels via [`dedupe::dedupe`].

pub mod assembler;
pub mod classifier;
pub mod composer;
pub mod dedupe;
pub mod extinf;
pub mod filter;
pub mod plain_list;

pub use assembler::{ChannelAssembler, ScanState, assemble};
pub use classifier::{LineKind, PLAYLIST_MARKER, classify};
pub use composer::{ComposedOutput, OutputComposer, compose, render};
pub use dedupe::{dedupe, extract_resolution};
pub use extinf::{ChannelHeader, parse_header};
pub use filter::{FilterSet, should_keep};
