//! Shared plumbing for CLI commands.
//!
//! Each command module defines its clap `Args` struct, its response types,
//! and an `execute` function. JSON output is the default; `--human` switches
//! to formatted text via the [`HumanReadable`] trait.

pub mod counter;
pub mod create;
pub mod data;
pub mod deactivate;
pub mod fees;
pub mod list;
pub mod proceeds;
pub mod purchase;
pub mod rate;
pub mod ratings;
pub mod set_fee;
pub mod show;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Error envelope returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    code: String,
    message: String,
}

/// Build an HTTP client carrying the caller's credentials.
///
/// A JWT bearer token takes priority; otherwise the account id is sent in
/// the X-Account-Id dev header.
pub fn build_client(token: Option<&str>, account: Option<&str>) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();

    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("Invalid characters in token")?;
        headers.insert(AUTHORIZATION, value);
    } else if let Some(account) = account {
        let value = HeaderValue::from_str(account).context("Invalid characters in account id")?;
        headers.insert("x-account-id", value);
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .context("Failed to build HTTP client")
}

/// Send a request and decode the JSON response, mapping server error
/// envelopes to readable messages.
pub async fn make_request<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T> {
    let response = request.send().await.context("Request failed")?;
    let status = response.status();
    let body = response.text().await.context("Failed to read response")?;

    if !status.is_success() {
        if let Ok(envelope) = serde_json::from_str::<ErrorResponse>(&body) {
            return Err(anyhow!(
                "{} ({}): {}",
                envelope.error.code,
                status.as_u16(),
                envelope.error.message
            ));
        }
        return Err(anyhow!("Server returned {}: {}", status, body));
    }

    serde_json::from_str(&body)
        .with_context(|| format!("Failed to decode response: {}", body))
}

/// Types that can render themselves for a human reader.
pub trait HumanReadable {
    fn print_human(&self);
}

/// Print a response as JSON or formatted text.
pub fn output<T: serde::Serialize + HumanReadable>(response: &T, human: bool) -> Result<()> {
    if human {
        response.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(response)?);
    }
    Ok(())
}

/// Format a timestamp for human output.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Shorten a 64-char hex account id for display.
pub fn short_account(hex: &str) -> &str {
    if hex.len() > 16 { &hex[..16] } else { hex }
}
