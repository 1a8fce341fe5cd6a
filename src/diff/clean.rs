//! Diff noise removal
//!
//! Strips the structural parts of a filtered diff (headers, hunk markers,
//! truncation banners, metadata, `+`/`-` markers) so the prompt carries the
//! code content with as few tokens as possible.

use once_cell::sync::Lazy;
use regex::Regex;

/// A single whole-text cleaning pass
pub struct CleaningStage {
    pub name: &'static str,
    pattern: &'static Lazy<Regex>,
    replacement: &'static str,
}

impl CleaningStage {
    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

static GIT_HEADERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(diff --git |index |--- |\+\+\+ ).*$").expect("Invalid git header pattern")
});

static HUNK_HEADERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^@@.*@@.*$").expect("Invalid hunk header pattern"));

static TRUNCATION_BANNERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\.\.\. \(truncated \d+ lines\).*$").expect("Invalid truncation banner pattern")
});

static FILE_METADATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^(new file mode|deleted file mode|similarity index|rename from|rename to|copy from|copy to).*$",
    )
    .expect("Invalid file metadata pattern")
});

static DIFF_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[+\-]").expect("Invalid diff marker pattern"));

// Lines holding only spaces or tabs count as blank here, otherwise the
// per-line trim below could leave a fresh run of blank lines behind.
static EXCESSIVE_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").expect("Invalid blank line pattern"));

static LINE_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]+|[ \t]+$").expect("Invalid line whitespace pattern"));

/// The cleaning pipeline, in application order
pub static STAGES: &[CleaningStage] = &[
    CleaningStage {
        name: "git_headers",
        pattern: &GIT_HEADERS,
        replacement: "",
    },
    CleaningStage {
        name: "hunk_headers",
        pattern: &HUNK_HEADERS,
        replacement: "",
    },
    CleaningStage {
        name: "truncation_banners",
        pattern: &TRUNCATION_BANNERS,
        replacement: "",
    },
    CleaningStage {
        name: "file_metadata",
        pattern: &FILE_METADATA,
        replacement: "",
    },
    CleaningStage {
        name: "diff_markers",
        pattern: &DIFF_MARKERS,
        replacement: "",
    },
    CleaningStage {
        name: "excessive_newlines",
        pattern: &EXCESSIVE_NEWLINES,
        replacement: "\n\n",
    },
    CleaningStage {
        name: "line_whitespace",
        pattern: &LINE_WHITESPACE,
        replacement: "",
    },
];

/// Run every stage once, in order
fn clean_pass(text: &str) -> String {
    STAGES
        .iter()
        .fold(text.to_string(), |text, stage| stage.apply(&text))
}

/// Clean a filtered diff. Pure: the same input always gives the same output.
///
/// Passes repeat until the text stops changing, so `clean(clean(x)) == clean(x)`.
/// A content line such as `+- item` therefore loses every leading marker.
/// Each stage only deletes text or shortens a blank run, so the loop ends.
pub fn clean(diff: &str) -> String {
    let mut current = clean_pass(diff);
    loop {
        let next = clean_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current.trim().to_string()
}
