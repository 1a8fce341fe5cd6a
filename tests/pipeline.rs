//! End-to-end generation: diff host -> sanitizer -> relay -> model

mod common;

use std::sync::Arc;

use common::{commits, spawn_relay, spawn_static_server, CapturingModel, Recorded, MODEL_REPLY};
use prplease::ai::RelayClient;
use prplease::core::pipeline::{Pipeline, PrRequest};
use prplease::diff::fetch::FETCH_FAILURE_MESSAGE;
use prplease::relay::config::RelayConfig;
use prplease::PrPleaseError;

const LOGIN_DIFF: &str = "diff --git a/src/login.rs b/src/login.rs
index 1111111..2222222 100644
--- a/src/login.rs
+++ b/src/login.rs
@@ -1,3 +1,4 @@ mod auth
 use crate::auth;
-fn login() {}
+fn login(user: &str) {}
+fn logout() {}
diff --git a/package-lock.json b/package-lock.json
index 3333333..4444444 100644
--- a/package-lock.json
+++ b/package-lock.json
@@ -1,2 +1,2 @@
-\"lockfileVersion\": 2
+\"lockfileVersion\": 3
";

struct Harness {
    model: Arc<CapturingModel>,
    pipeline: Pipeline,
    pr_url: String,
    requests: Recorded,
}

async fn harness(status: u16, diff: String) -> Harness {
    let model = Arc::new(CapturingModel::new(MODEL_REPLY));
    let relay = spawn_relay(Some(Arc::clone(&model)), RelayConfig::default()).await;
    let (host, requests) = spawn_static_server(status, "text/plain", diff).await;

    let pipeline = Pipeline::new(Arc::new(RelayClient::new(format!("http://{}", relay))));
    Harness {
        model,
        pipeline,
        pr_url: format!("http://{}/owner/repo/pull/7", host),
        requests,
    }
}

fn diff_section(prompt: &str) -> &str {
    prompt.split("\nDiff:\n").nth(1).unwrap_or("")
}

#[tokio::test]
async fn generates_from_a_sanitized_diff() {
    let h = harness(200, LOGIN_DIFF.to_string()).await;
    let request = PrRequest {
        commits: commits(&["feat: pass user to login", "feat: add logout"]),
        pr_url: h.pr_url.clone(),
    };

    let result = h.pipeline.run(&request).await.unwrap();
    assert_eq!(result.title, "Add login form");
    let paths: Vec<String> = h.requests.lock().unwrap().iter().map(|r| r.path.clone()).collect();
    assert_eq!(paths, ["/owner/repo/pull/7.diff"]);

    let prompt = h.model.last_prompt().unwrap();
    let diff = diff_section(&prompt);
    assert!(diff.contains("fn login(user: &str) {}"));
    assert!(diff.contains("fn logout() {}"));
    assert!(!diff.contains("diff --git"));
    assert!(!diff.contains("@@"));
    assert!(!diff.lines().any(|l| l.starts_with('+') || l.starts_with('-')));
}

#[tokio::test]
async fn ignored_files_become_placeholders() {
    let h = harness(200, LOGIN_DIFF.to_string()).await;
    let request = PrRequest {
        commits: commits(&["chore: bump lockfile"]),
        pr_url: h.pr_url.clone(),
    };

    h.pipeline.run(&request).await.unwrap();

    let prompt = h.model.last_prompt().unwrap();
    let diff = diff_section(&prompt);
    assert!(diff.contains("(Skipped package-lock.json)"));
    assert!(!diff.contains("lockfileVersion"));
}

#[tokio::test]
async fn oversized_files_are_truncated() {
    let mut diff = String::from(
        "diff --git a/src/big.rs b/src/big.rs\nindex 1..2 100644\n--- a/src/big.rs\n+++ b/src/big.rs\n@@ -0,0 +1,120 @@\n",
    );
    for i in 1..=120 {
        diff.push_str(&format!("+let value_{:03} = {};\n", i, i));
    }
    let h = harness(200, diff).await;
    let request = PrRequest {
        commits: commits(&["feat: big table"]),
        pr_url: h.pr_url.clone(),
    };

    h.pipeline.run(&request).await.unwrap();

    // Five header lines plus the first 45 additions fit under the 50 line cap.
    let prompt = h.model.last_prompt().unwrap();
    let diff = diff_section(&prompt);
    assert!(diff.contains("let value_045 = 45;"));
    assert!(!diff.contains("value_046"));
    assert!(!diff.contains("truncated"));
}

#[tokio::test]
async fn unreachable_diff_is_a_fetch_failure() {
    let h = harness(404, "Not Found".to_string()).await;
    let request = PrRequest {
        commits: commits(&["fix: typo"]),
        pr_url: h.pr_url.clone(),
    };

    let err = h.pipeline.run(&request).await.unwrap_err();
    assert!(matches!(err, PrPleaseError::FetchFailure(ref m) if m == FETCH_FAILURE_MESSAGE));
    assert_eq!(h.model.calls(), 0);
}
