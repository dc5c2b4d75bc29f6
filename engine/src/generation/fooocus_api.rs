use bytes::Bytes;
use color_eyre::Result;
use log::debug;
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{GenerationRequest, JobStatus};

mod error;
pub use error::FooocusApiError;

pub const TEXT_TO_IMAGE_PATH: &str = "/v1/generation/text-to-image";
pub const QUERY_JOB_PATH: &str = "/v1/generation/query-job";

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// The status URL of a job, as one would pass it to curl
pub fn query_job_url(base_url: &str, job_id: &str) -> String {
    format!("{}?job_id={job_id}", endpoint(base_url, QUERY_JOB_PATH))
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: String) -> Result<T> {
    match serde_json::from_str(&body) {
        Ok(x) => Ok(x),
        Err(source) => Err(FooocusApiError::Decode {
            endpoint: endpoint.into(),
            body,
            source,
        }
        .into()),
    }
}

/// Submits a text-to-image job and returns the server's answer as is.
///
/// The HTTP status isn't checked: whatever JSON comes back is handed to the caller.
pub async fn text_to_image(
    req: &GenerationRequest,
    base_url: &str,
    client: &Client,
) -> Result<Value> {
    let url = endpoint(base_url, TEXT_TO_IMAGE_PATH);
    debug!("Submitting to {url}: {req:#?}");

    let resp = client
        .post(&url)
        .header(header::CONTENT_TYPE, "application/json")
        .json(req)
        .send()
        .await?;

    let status = resp.status();
    let text = resp.text().await?;
    debug!("text-to-image answered {status}: {text}");

    decode(&url, text)
}

/// Fetches the current status of a job, exactly once.
///
/// Like `text_to_image` the HTTP status isn't checked, only a body that isn't JSON fails.
pub async fn query_job(job_id: &str, base_url: &str, client: &Client) -> Result<JobStatus> {
    let url = endpoint(base_url, QUERY_JOB_PATH);

    let resp = client
        .get(&url)
        .query(&[("job_id", job_id)])
        .send()
        .await?;

    let status = resp.status();
    let text = resp.text().await?;
    debug!("query-job answered {status}: {text}");

    decode(&url, text)
}

/// Downloads a generated image. Anything but a 200 yields `None`.
pub async fn fetch_image(url: &str, client: &Client) -> Result<Option<Bytes>> {
    let resp = client.get(url).send().await?;

    if resp.status() != StatusCode::OK {
        debug!("Skipping {url}, got {}", resp.status());
        return Ok(None);
    }

    Ok(Some(resp.bytes().await?))
}
