//! Prompt template for PR title/description generation
//!
//! Only one description schema ships; bump [`PROMPT_TEMPLATE_VERSION`] when
//! the section set or output rules change.

/// Version of the description schema embedded in the prompt
pub const PROMPT_TEMPLATE_VERSION: &str = "pr-description/v2";

/// Default number of commit messages kept
pub const DEFAULT_MAX_COMMITS: usize = 50;

/// Default number of diff characters kept
pub const DEFAULT_MAX_DIFF_LENGTH: usize = 10_000;

/// Section headings of the description body, in order
pub const DESCRIPTION_SECTIONS: &[&str] = &[
    "Summary",
    "Key Changes",
    "Testing",
    "Notable Implementation Details",
    "Out of Scope",
    "Impact",
    "Related Resources",
];

const INSTRUCTIONS: &str = r##"You are a PR assistant. Analyze the code changes and return a JSON object with "title" and "description" fields.

STRICT OUTPUT RULES:
1. Return ONLY valid JSON.
2. Do NOT include markdown formatting like ```json wrapper.
3. The "description" field must contain the full markdown body.

CONTENT GENERATION RULES:

- **Title**: Follow these standards for a strong PR title:
  - Use Conventional Commits prefixes: `feat`, `fix`, `docs`, `refactor`, `chore`, `test`, `perf`, `ci`, or `style`.
  - Write in imperative mood (e.g., "add", "fix", "remove") — not past tense or progressive tense.
  - Describe *what* the change **does**, not just what area it touches (e.g., "fix: resolve login button unresponsive on Safari" not "fix: update login button").
  - Be concise and specific: aim for under 72 characters, avoid vague phrases like "update files", "fix bug", or "update CSS".
  - If a related issue or ticket number is available in the diff/context, append it (e.g., "feat: add CSV export for reports (closes #123)").
  - Format: `<type>: <short imperative summary> [(closes #issue)]`

- **Summary**: Write a concise 1-2 sentence paragraph summarizing what changed and why. This should let a reviewer immediately grasp the purpose without reading the full diff.

- **Key Changes**: List the main changes as bullet points with bold component/feature names followed by nested sub-bullets for details. Group related changes together.

- **Testing**: Describe how to verify these changes — include specific steps to reproduce, test scenarios considered, or edge cases validated. If automated tests were added, mention them here.

- **Notable Implementation Details**: Highlight important technical decisions, architectural choices, or caveats as bullet points.

- **Out of Scope**: Note anything intentionally not addressed in this PR that may be relevant or planned for a follow-up, to keep the scope of review clear.

- **Impact**: Write a paragraph describing the value and effect of these changes on users or the system.

- **Related Resources**: If any related issues, tickets, documentation links, or prior PRs are referenced or inferable from the diff context, include them. Otherwise, omit this section entirely.

Target Markdown Structure for "description":
## Summary
(Concise 1-2 sentence paragraph summarizing what changed and why)

## Key Changes

- **Component or feature name**: Description of the change
  - Sub-item detail
  - Sub-item detail
- **Another component**: Description of the change

## Testing

- Step or scenario to verify the change
- Edge case or regression considered

## Notable Implementation Details

- Important technical detail or architectural decision
- Any caveats or risks

## Out of Scope

- What was intentionally not addressed and may be followed up later

## Impact

(Paragraph describing the value and effect of these changes on users or the system)

## Related Resources

- [Issue/Ticket/Doc title](url) — brief note on relevance"##;

/// Builds bounded prompts from commits and a cleaned diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptBuilder {
    /// Commits beyond this count are dropped
    pub max_commits: usize,
    /// Diff characters beyond this count are dropped
    pub max_diff_length: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            max_commits: DEFAULT_MAX_COMMITS,
            max_diff_length: DEFAULT_MAX_DIFF_LENGTH,
        }
    }
}

impl PromptBuilder {
    pub fn new(max_commits: usize, max_diff_length: usize) -> Self {
        Self {
            max_commits,
            max_diff_length,
        }
    }

    /// Build the full prompt. Truncation is plain slicing and never fails.
    pub fn build(&self, commits: &[String], diff: &str) -> String {
        let commits = bounded_commits(commits, self.max_commits).join("\n");
        let diff = bounded_diff(diff, self.max_diff_length);

        format!("{INSTRUCTIONS}\n\nCommits:\n{commits}\n\nDiff:\n{diff}\n")
    }
}

/// First `max` commit messages, in their original order
pub fn bounded_commits(commits: &[String], max: usize) -> &[String] {
    &commits[..commits.len().min(max)]
}

/// First `max` characters of `diff`; may cut a line in half
pub fn bounded_diff(diff: &str, max: usize) -> &str {
    match diff.char_indices().nth(max) {
        Some((byte_index, _)) => &diff[..byte_index],
        None => diff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commits(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("chore: commit number {i}")).collect()
    }

    #[test]
    fn test_prompt_contains_commits_and_diff() {
        let prompt = PromptBuilder::default().build(&["fix: null check".to_string()], "if (a != null) {");
        assert!(prompt.contains("Commits:\nfix: null check\n"));
        assert!(prompt.contains("Diff:\nif (a != null) {"));
    }

    #[test]
    fn test_prompt_states_output_contract() {
        let prompt = PromptBuilder::default().build(&[], "");
        assert!(prompt.contains("Return ONLY valid JSON"));
        assert!(prompt.contains(r#""title" and "description""#));
        for section in DESCRIPTION_SECTIONS {
            assert!(prompt.contains(&format!("## {section}")), "missing section {section}");
        }
    }

    #[test]
    fn test_commit_count_is_bounded() {
        let builder = PromptBuilder::new(3, 100);
        let prompt = builder.build(&commits(10), "");
        assert!(prompt.contains("chore: commit number 2"));
        assert!(!prompt.contains("chore: commit number 3"));
        assert_eq!(prompt.matches("chore: commit number").count(), 3);
    }

    #[test]
    fn test_diff_length_is_bounded() {
        let builder = PromptBuilder::new(50, 10);
        let diff = "0123456789ABCDEFGHIJ";
        let prompt = builder.build(&[], diff);
        assert!(prompt.ends_with("Diff:\n0123456789\n"));
        assert!(!prompt.contains("0123456789ABCDEF"));
    }

    #[test]
    fn test_bounded_diff_respects_char_boundaries() {
        assert_eq!(bounded_diff("héllo", 2), "hé");
        assert_eq!(bounded_diff("short", 100), "short");
        assert_eq!(bounded_diff("abc", 0), "");
    }

    #[test]
    fn test_bounded_commits_keeps_order() {
        let all = commits(5);
        assert_eq!(bounded_commits(&all, 2), &all[..2]);
        assert_eq!(bounded_commits(&all, 50).len(), 5);
    }
}
