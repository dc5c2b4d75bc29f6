use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::{Result, eyre::WrapErr as _};
use log::info;
use serde_json::Value;

use super::{DEFAULT_SAVE_EXTENSION, GenerationRequest, JobStatus, fooocus_api};

pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Client for a running Fooocus API server
#[derive(Clone)]
pub struct Fooocus {
    base_url: String,
    output_dir: PathBuf,
    client: reqwest::Client,
}

impl Fooocus {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            output_dir: DEFAULT_OUTPUT_DIR.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_output_dir(self, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..self
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn submit(&self, req: &GenerationRequest) -> Result<Value> {
        fooocus_api::text_to_image(req, &self.base_url, &self.client).await
    }

    pub async fn poll(&self, job_id: &str) -> Result<JobStatus> {
        fooocus_api::query_job(job_id, &self.base_url, &self.client).await
    }

    /// Downloads one result image into the output directory.
    ///
    /// Returns the path of the written file, or `None` if the server didn't answer with
    /// a 200, in which case nothing is written.
    pub async fn download(&self, url: &str, index: usize) -> Result<Option<PathBuf>> {
        let Some(bytes) = fooocus_api::fetch_image(url, &self.client).await? else {
            return Ok(None);
        };

        fs::create_dir_all(&self.output_dir).wrap_err_with(|| {
            format!("Couldn't create output dir {}", self.output_dir.display())
        })?;

        let path = self.output_dir.join(image_file_name(index));
        fs::write(&path, &bytes).wrap_err_with(|| format!("Couldn't write {}", path.display()))?;
        info!("Saved {} bytes to {}", bytes.len(), path.display());

        Ok(Some(path))
    }
}

fn image_file_name(index: usize) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("image_{timestamp}_{index}.{DEFAULT_SAVE_EXTENSION}")
}
