//! Serve command handler

use crate::cli::commands::ServeArgs;
use crate::error::Result;
use crate::relay;

/// Handle `prplease serve`
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    let config = args.into_config();
    tracing::info!(
        port = config.port,
        model = %config.model,
        timeout_ms = config.timeout.as_millis() as u64,
        max_commits = config.max_commits,
        max_diff_length = config.max_diff_length,
        origin = %config.allowed_origin(),
        "Starting relay"
    );
    relay::serve(config).await
}
