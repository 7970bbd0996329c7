use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{info, warn};

use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP status {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// One blocking GET, no retries. Non-2xx responses are errors.
pub fn fetch_html(url: &str, settings: &Settings) -> Result<String, FetchError> {
    let timeout = settings.timeout();
    let client = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(timeout)
        .build()?;

    let start = Instant::now();
    let response = client.get(url).send().map_err(|e| classify(e, timeout))?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    let body = response.text().map_err(|e| classify(e, timeout))?;

    info!(
        url,
        status = status.as_u16(),
        bytes = body.len(),
        latency_ms = start.elapsed().as_millis() as u64,
        "fetched"
    );
    Ok(body)
}

/// Course-list HTML, or an HTML comment describing why it could not be fetched.
pub fn fetch_courses_html(url: &str, settings: &Settings) -> String {
    match fetch_html(url, settings) {
        Ok(body) => body,
        Err(e) => {
            warn!(url, error = %e, "course list fetch failed");
            failure_placeholder(&e)
        }
    }
}

pub fn failure_placeholder(err: &FetchError) -> String {
    format!("<!-- failed to fetch courses: {} -->", err)
}

fn classify(err: reqwest::Error, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(timeout)
    } else if let Some(status) = err.status() {
        FetchError::Status(status)
    } else {
        FetchError::Transport(err)
    }
}

// ── Tests ──
