//! Generate command handler

use std::fs;

use crate::cli::commands::GenerateArgs;
use crate::core::config::Settings;
use crate::core::pipeline::{Pipeline, PrRequest};
use crate::diff::FilterPolicy;
use crate::error::{PrPleaseError, Result};

/// Handle `prplease generate`
pub async fn handle_generate(args: GenerateArgs) -> Result<()> {
    let settings = apply_overrides(Settings::load()?, &args);
    let commits = collect_commits(&args)?;

    let pipeline = Pipeline::from_settings(&settings)?.with_policy(filter_policy(&args));
    let request = PrRequest {
        commits,
        pr_url: args.pr_url.clone(),
    };

    eprintln!("Generating PR content ({} mode)...", settings.mode);
    let result = pipeline.run(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}\n", result.title);
        println!("{}", result.description);
    }
    Ok(())
}

/// Command-line flags win over stored settings
fn apply_overrides(mut settings: Settings, args: &GenerateArgs) -> Settings {
    if let Some(mode) = args.mode {
        settings.mode = mode;
    }
    if let Some(url) = &args.service_url {
        settings.service_url = url.clone();
    }
    if let Some(model) = &args.model {
        settings.model = model.clone();
    }
    if let Some(base_url) = &args.base_url {
        settings.base_url = Some(base_url.clone());
    }
    settings
}

/// Default ignore list plus `--ignore` patterns, with the requested line cap
fn filter_policy(args: &GenerateArgs) -> FilterPolicy {
    let mut policy = FilterPolicy {
        max_lines_per_file: args.max_lines_per_file,
        ..FilterPolicy::default()
    };
    for pattern in args.ignore.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        if !policy.ignored.iter().any(|existing| existing == pattern) {
            policy.ignored.push(pattern.to_string());
        }
    }
    policy
}

/// Commits from `--commit` flags followed by those in `--commits-file`
fn collect_commits(args: &GenerateArgs) -> Result<Vec<String>> {
    let mut commits: Vec<String> = args
        .commits
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    if let Some(path) = &args.commits_file {
        let contents = fs::read_to_string(path).map_err(|e| {
            PrPleaseError::InvalidInput(format!(
                "Cannot read commits file '{}': {}",
                path.display(),
                e
            ))
        })?;
        commits.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    Ok(commits)
}
