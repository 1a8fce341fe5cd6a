//! Relay HTTP server
//!
//! Routes:
//! - `GET /ping` liveness probe
//! - `POST /generate` PR content generation
//! - `OPTIONS *` CORS preflight

use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};

use crate::ai::relay_client::{GenerateRequest, PingResponse};
use crate::error::Result;
use crate::relay::config::RelayConfig;
use crate::relay::http::{read_request, HttpRequest, HttpResponse, ReadError};
use crate::relay::rate_limit::{RateDecision, RateLimiter};
use crate::relay::service::{client_message, RelayService};

const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state behind every connection
pub struct RelayState {
    pub service: RelayService,
    pub limiter: RateLimiter,
    pub allowed_origin: String,
}

impl RelayState {
    pub fn new(service: RelayService, config: &RelayConfig) -> Self {
        Self {
            service,
            limiter: RateLimiter::new(config.rate_limit_max, config.rate_limit_window),
            allowed_origin: config.allowed_origin().to_string(),
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(RelayService::from_config(config), config)
    }
}

/// Bind the configured address and serve until the process exits
pub async fn serve(config: RelayConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    if config.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; /generate will fail until it is configured");
    }
    let state = RelayState::from_config(&config);
    tracing::info!(
        address = %listener.local_addr()?,
        rate_limit_max = state.limiter.max_requests(),
        rate_limit_window_secs = state.limiter.window().as_secs(),
        cache_capacity = state.service.cache().capacity(),
        "Relay listening"
    );

    run(listener, Arc::new(state)).await
}

/// Accept connections on `listener`, one task per connection
pub async fn run(listener: TcpListener, state: Arc<RelayState>) -> Result<()> {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to accept connection");
                continue;
            }
        };

        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, &state).await {
                tracing::debug!(%peer, error = %e, "Connection ended with an error");
            }
        });
    }
}

async fn handle_connection(mut stream: TcpStream, state: &RelayState) -> std::io::Result<()> {
    let request = match tokio::time::timeout(READ_TIMEOUT, read_request(&mut stream)).await {
        Ok(Ok(Some(request))) => request,
        Ok(Ok(None)) | Err(_) => return Ok(()),
        Ok(Err(ReadError::Io(e))) => return Err(e),
        Ok(Err(ReadError::BodyTooLarge)) => {
            let response = with_cors(HttpResponse::error(413, "Request body is too large"), state);
            return response.write_to(&mut stream, false).await;
        }
        Ok(Err(ReadError::Malformed)) => {
            let response = with_cors(HttpResponse::error(400, "Malformed request"), state);
            return response.write_to(&mut stream, false).await;
        }
    };

    let head_only = request.method == "HEAD";
    let response = handle_request(state, &request).await;
    response.write_to(&mut stream, head_only).await
}

/// Route one request. Every response carries the CORS origin header.
pub async fn handle_request(state: &RelayState, request: &HttpRequest) -> HttpResponse {
    let response = if request.method == "OPTIONS" {
        preflight(request)
    } else {
        match state.limiter.check() {
            RateDecision::Allowed => route(state, request).await,
            RateDecision::Rejected { retry_after } => {
                tracing::warn!(method = %request.method, path = %request.route(), "Rate limit exceeded");
                rate_limited(retry_after)
            }
        }
    };
    with_cors(response, state)
}

async fn route(state: &RelayState, request: &HttpRequest) -> HttpResponse {
    match (request.method.as_str(), request.route()) {
        ("GET" | "HEAD", "/ping") => HttpResponse::json(
            200,
            &PingResponse {
                status: "ok".to_string(),
                message: "Service is reachable".to_string(),
            },
        ),
        ("POST", "/generate") => generate(state, &request.body).await,
        (method, path) => HttpResponse::error(404, &format!("Route {} {} not found", method, path)),
    }
}

async fn generate(state: &RelayState, body: &[u8]) -> HttpResponse {
    let payload: GenerateRequest = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed generation request");
            return HttpResponse::error(500, "Invalid request body: expected {commits: string[], diff: string}");
        }
    };

    match state.service.generate(&payload.commits, &payload.diff).await {
        Ok(result) => HttpResponse::json(200, &result),
        Err(e) => {
            tracing::error!(error = %e, "Generation failed");
            HttpResponse::error(500, &client_message(&e))
        }
    }
}

fn preflight(request: &HttpRequest) -> HttpResponse {
    let allowed_headers = request
        .header("Access-Control-Request-Headers")
        .unwrap_or("Content-Type")
        .to_string();
    HttpResponse::new(204)
        .with_header("Access-Control-Allow-Methods", "GET, HEAD, POST, OPTIONS")
        .with_header("Access-Control-Allow-Headers", allowed_headers)
        .with_header("Access-Control-Max-Age", "600")
}

fn rate_limited(retry_after: Duration) -> HttpResponse {
    let seconds = retry_after.as_secs().max(1);
    HttpResponse::error(
        429,
        &format!("Rate limit exceeded, retry in {} seconds", seconds),
    )
    .with_header("Retry-After", seconds.to_string())
}

fn with_cors(response: HttpResponse, state: &RelayState) -> HttpResponse {
    let response = response.with_header("Access-Control-Allow-Origin", state.allowed_origin.clone());
    if state.allowed_origin == "*" {
        response
    } else {
        response.with_header("Vary", "Origin")
    }
}
