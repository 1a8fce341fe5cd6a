//! Per-file diff filtering
//!
//! Splits a unified diff on its `diff --git ` boundaries, replaces ignored
//! files (lockfiles, secrets) with a placeholder and caps the number of lines
//! kept per file. Chunks stay in their original order.

use once_cell::sync::Lazy;
use regex::Regex;

/// Literal marker separating the per-file sections of a unified diff
pub const FILE_SEPARATOR: &str = "diff --git ";

/// Filename used when the header does not look like `a/<path> b/...`
pub const UNKNOWN_FILENAME: &str = "unknown";

/// Default per-file line cap
pub const DEFAULT_MAX_LINES_PER_FILE: usize = 50;

/// Files that never reach the model
pub const DEFAULT_IGNORED_FILES: &[&str] = &["package-lock.json", "yarn.lock", "pnpm-lock.yaml", ".env"];

static FILENAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"a/(.*) b/").expect("Invalid regex pattern for diff filename"));

/// What to drop and how much to keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPolicy {
    /// A file is skipped when its name contains any of these substrings
    pub ignored: Vec<String>,
    /// Maximum lines retained per file chunk, banner excluded
    pub max_lines_per_file: usize,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            ignored: DEFAULT_IGNORED_FILES.iter().map(|s| s.to_string()).collect(),
            max_lines_per_file: DEFAULT_MAX_LINES_PER_FILE,
        }
    }
}

impl FilterPolicy {
    /// Whether `filename` matches the ignore list
    pub fn is_ignored(&self, filename: &str) -> bool {
        self.ignored.iter().any(|ignored| filename.contains(ignored.as_str()))
    }
}

/// One file's section of a diff, without the leading separator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChunk<'a> {
    /// Best-effort filename, [`UNKNOWN_FILENAME`] when the header is unusual
    pub filename: String,
    /// Raw chunk text
    pub text: &'a str,
}

impl<'a> FileChunk<'a> {
    pub fn new(text: &'a str) -> Self {
        let first_line = text.lines().next().unwrap_or("");
        let filename = extract_filename(first_line).unwrap_or_else(|| UNKNOWN_FILENAME.to_string());
        Self { filename, text }
    }

    /// Number of lines in the chunk
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    /// Apply the policy to this chunk
    pub fn process(&self, policy: &FilterPolicy) -> String {
        let trailing_newline = if self.text.ends_with('\n') { "\n" } else { "" };

        if policy.is_ignored(&self.filename) {
            // The placeholder gets its own line so the bare separator line
            // above it is the only thing the cleaner strips.
            return format!("\n{}{}", skipped_placeholder(&self.filename), trailing_newline);
        }

        let total = self.line_count();
        if total <= policy.max_lines_per_file {
            return self.text.to_string();
        }

        let kept: Vec<&str> = self.text.lines().take(policy.max_lines_per_file).collect();
        format!(
            "{}\n{}{}",
            kept.join("\n"),
            truncation_banner(total - policy.max_lines_per_file),
            trailing_newline
        )
    }
}

/// Extract `<path>` from a `a/<path> b/<path>` header line
pub fn extract_filename(header_line: &str) -> Option<String> {
    FILENAME_PATTERN
        .captures(header_line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Placeholder emitted instead of an ignored file's content
pub fn skipped_placeholder(filename: &str) -> String {
    format!("(Skipped {})", filename)
}

/// Banner appended to a truncated chunk. The cleaner strips this exact shape.
pub fn truncation_banner(omitted: usize) -> String {
    format!("... (truncated {} lines)", omitted)
}

/// Split a diff into its per-file fragments, keeping the leading fragment
pub fn split_chunks(diff: &str) -> impl Iterator<Item = &str> {
    diff.split(FILE_SEPARATOR)
}

/// Filter a raw unified diff according to `policy`
///
/// Whitespace-only fragments are dropped together with their separator.
/// Everything else is rejoined with [`FILE_SEPARATOR`] in its original order.
pub fn filter(diff: &str, policy: &FilterPolicy) -> String {
    let mut out = String::with_capacity(diff.len());

    for (index, fragment) in split_chunks(diff).enumerate() {
        if fragment.trim().is_empty() {
            continue;
        }
        if index > 0 {
            out.push_str(FILE_SEPARATOR);
        }
        out.push_str(&FileChunk::new(fragment).process(policy));
    }

    out
}
