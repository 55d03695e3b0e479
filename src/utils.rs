//! Utility modules for m3u-merge

pub mod url;
