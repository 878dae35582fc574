//! Upload client for the analysis service.
//!
//! One request per invocation. A failure is reported once and not retried.

use std::path::Path;

use anyhow::{Context, Result, bail};
use reqwest::blocking::{Client, multipart::Form};
use serde_json::Value;
use tracing::{debug, info};

use smellview_core::input::ReportInput;

pub const UPLOAD_FIELD: &str = "file";

/// POST `archive` to `<server>/upload` and return the response body.
pub fn upload_archive(archive: &Path, server: &str) -> Result<ReportInput> {
    if archive.extension().is_none_or(|ext| ext != "zip") {
        debug!(path = %archive.display(), "archive does not have a .zip extension");
    }

    let url = upload_url(server);
    let form = Form::new()
        .file(UPLOAD_FIELD, archive)
        .with_context(|| format!("failed to open archive: {}", archive.display()))?;

    info!(%url, path = %archive.display(), "uploading archive");

    let response = Client::new()
        .post(&url)
        .multipart(form)
        .send()
        .map_err(|e| anyhow::anyhow!("Error uploading file: {e}"))?;

    let status = response.status();
    let body = response
        .bytes()
        .map_err(|e| anyhow::anyhow!("Error uploading file: {e}"))?;

    if !status.is_success() {
        bail!("Error uploading file: {}", error_message(&body));
    }

    debug!(%status, size = body.len(), "received report");
    Ok(ReportInput::from_bytes(Some(url), body.to_vec()))
}

fn upload_url(server: &str) -> String {
    format!("{}/upload", server.trim_end_matches('/'))
}

/// The service's `error` field, or a generic message.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| "Unknown error".to_string())
}
