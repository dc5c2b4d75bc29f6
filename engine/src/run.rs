use std::{io::Write, path::PathBuf};

use color_eyre::{Result, eyre::ensure};
use indoc::writedoc;
use serde_json::Value;

use crate::generation::{
    Fooocus, FooocusApiError, GenerationRequest, JobStage, fooocus_api::query_job_url,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub job_id: Option<String>,
    pub job_stage: Option<JobStage>,
    pub saved: Vec<PathBuf>,
}

/// One pass of submit, a single status query and the downloads.
///
/// Human readable progress goes to `out`. Nothing is retried and the job is not waited
/// for: if it is still running, a curl command to check it later is printed instead.
pub async fn run(
    fooocus: &Fooocus,
    req: &GenerationRequest,
    out: &mut impl Write,
) -> Result<RunSummary> {
    writeln!(
        out,
        "Sending text-to-image request with prompt: '{}'",
        req.prompt
    )?;
    let response = fooocus.submit(req).await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;

    let Some(job_id) = job_id(&response) else {
        return Ok(RunSummary::default());
    };

    writeln!(out, "\nJob ID: {job_id}")?;
    writeln!(out, "Checking job status...")?;
    check_job(fooocus, job_id, out).await
}

/// Queries `job_id` once and downloads whatever results it already has.
pub async fn check_job(
    fooocus: &Fooocus,
    job_id: &str,
    out: &mut impl Write,
) -> Result<RunSummary> {
    ensure!(!job_id.is_empty(), FooocusApiError::MissingJobId);

    let status = fooocus.poll(job_id).await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&status)?)?;

    if status.is_in_progress() {
        writedoc!(
            out,
            "
            Job is still processing. Check status later with:
            curl {}
            ",
            query_job_url(fooocus.base_url(), job_id)
        )?;
    }

    let mut saved = vec![];
    for (idx, result) in status.results().iter().enumerate() {
        let Some(url) = &result.url else {
            continue;
        };

        writeln!(out, "Image URL: {url}")?;
        match &result.seed {
            Some(seed) => writeln!(out, "Seed: {seed}")?,
            None => writeln!(out, "Seed: N/A")?,
        }

        if let Some(path) = fooocus.download(url, idx).await? {
            writeln!(out, "Image saved to {}", path.display())?;
            saved.push(path);
        }
    }

    Ok(RunSummary {
        job_id: Some(job_id.to_string()),
        job_stage: status.job_stage,
        saved,
    })
}

fn job_id(response: &Value) -> Option<&str> {
    response
        .get("job_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}
