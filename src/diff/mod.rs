//! Diff sanitization
//!
//! - `filter`: drop ignored files and cap lines per file
//! - `clean`: strip structural noise before prompting
//! - `fetch`: download the diff behind a PR URL

pub mod clean;
pub mod fetch;
pub mod filter;

pub use clean::clean;
pub use fetch::{diff_url, DiffFetcher};
pub use filter::{filter, FileChunk, FilterPolicy};

/// Filter then clean a raw diff
pub fn sanitize(raw: &str, policy: &FilterPolicy) -> String {
    clean(&filter(raw, policy))
}
