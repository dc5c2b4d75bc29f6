use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value};

/// Answer of the `query-job` endpoint.
///
/// Any JSON object decodes, error bodies like `{"detail": "Job not found"}` included; the
/// fields the client looks at are then simply absent. Serializing a status writes back
/// exactly what the server sent.
#[derive(Debug, Clone, PartialEq)]
pub struct JobStatus {
    pub job_id: Option<String>,
    pub job_stage: Option<JobStage>,
    pub job_result: Option<Vec<ImageResult>>,
    raw: Value,
}

#[derive(Deserialize, Default)]
struct JobFields {
    #[serde(default)]
    job_id: Option<String>,
    #[serde(default)]
    job_stage: Option<JobStage>,
    #[serde(default)]
    job_result: Option<Vec<ImageResult>>,
}

impl JobStatus {
    pub fn results(&self) -> &[ImageResult] {
        self.job_result.as_deref().unwrap_or_default()
    }

    pub fn is_in_progress(&self) -> bool {
        self.job_stage.as_ref().is_some_and(JobStage::is_in_progress)
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl TryFrom<Value> for JobStatus {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let fields = if raw.is_object() {
            JobFields::deserialize(&raw)?
        } else {
            JobFields::default()
        };

        Ok(Self {
            job_id: fields.job_id,
            job_stage: fields.job_stage,
            job_result: fields.job_result,
            raw,
        })
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        JobStatus::try_from(raw).map_err(de::Error::custom)
    }
}

impl Serialize for JobStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStage {
    Pending,
    Waiting,
    Running,
    Success,
    Error,
    /// stage names this client doesn't know, kept verbatim
    #[serde(untagged)]
    Other(String),
}

impl JobStage {
    /// True while the server hasn't finished the job yet.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Pending | Self::Waiting | Self::Running)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Waiting => "WAITING",
            Self::Running => "RUNNING",
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
            Self::Other(stage) => stage,
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageResult {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub seed: Option<Seed>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The server reports seeds either as JSON numbers or as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Seed {
    Number(i64),
    Text(String),
}

impl Seed {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Seed::Number(n) => Some(*n),
            Seed::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Number(n) => write!(f, "{n}"),
            Seed::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn finished_job() -> Value {
        json!({
            "job_id": "3f9c1a",
            "job_type": "Text to Image",
            "job_stage": "SUCCESS",
            "job_progress": 100,
            "job_status": "Finished",
            "job_step_preview": null,
            "job_result": [{
                "base64": null,
                "url": "http://127.0.0.1:8888/files/2024-05-01/a.png",
                "seed": "1234567",
                "finish_reason": "SUCCESS"
            }]
        })
    }

    #[test]
    fn decode_finished_job() {
        let status: JobStatus = serde_json::from_value(finished_job()).unwrap();

        assert_eq!(status.job_id.as_deref(), Some("3f9c1a"));
        assert_eq!(status.job_stage, Some(JobStage::Success));
        assert!(!status.is_in_progress());
        assert_eq!(status.results().len(), 1);

        let result = &status.results()[0];
        assert_eq!(
            result.url.as_deref(),
            Some("http://127.0.0.1:8888/files/2024-05-01/a.png")
        );
        assert_eq!(result.seed.as_ref().and_then(Seed::as_i64), Some(1234567));
        assert_eq!(result.extra["finish_reason"], "SUCCESS");
    }

    #[test]
    fn reserializing_keeps_unknown_fields() {
        let status: JobStatus = serde_json::from_value(finished_job()).unwrap();
        assert_eq!(serde_json::to_value(&status).unwrap(), finished_job());
    }

    #[test]
    fn seeds_as_number_and_text_agree() {
        let number: Seed = serde_json::from_value(json!(42)).unwrap();
        let text: Seed = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(number.as_i64(), text.as_i64());
        assert_eq!(Seed::Text("not a seed".into()).as_i64(), None);
        assert_eq!(text.to_string(), "42");
    }

    #[test]
    fn in_progress_stages() {
        let pending: JobStatus = serde_json::from_value(json!({
            "job_id": "a",
            "job_stage": "RUNNING",
            "job_result": null,
        }))
        .unwrap();
        assert!(pending.is_in_progress());
        assert!(pending.results().is_empty());

        for stage in [JobStage::Pending, JobStage::Waiting] {
            assert!(stage.is_in_progress());
        }
        assert!(!JobStage::Error.is_in_progress());
    }

    #[test]
    fn error_body_decodes_without_stage() {
        let body = json!({"detail": "Job not found"});
        let status: JobStatus = serde_json::from_value(body.clone()).unwrap();

        assert_eq!(status.job_id, None);
        assert_eq!(status.job_stage, None);
        assert!(!status.is_in_progress());
        assert!(status.results().is_empty());
        assert_eq!(serde_json::to_value(&status).unwrap(), body);
    }

    #[test]
    fn non_object_answer_keeps_raw_value() {
        let status: JobStatus = serde_json::from_value(json!("oops")).unwrap();
        assert_eq!(status.job_stage, None);
        assert_eq!(status.raw(), &json!("oops"));
    }

    #[test]
    fn mistyped_known_field_is_an_error() {
        assert!(serde_json::from_value::<JobStatus>(json!({"job_result": 3})).is_err());
    }

    #[test]
    fn unknown_stage_is_kept_verbatim() {
        let stage: JobStage = serde_json::from_value(json!("CANCELLED")).unwrap();
        assert_eq!(stage, JobStage::Other("CANCELLED".into()));
        assert!(!stage.is_in_progress());
        assert_eq!(serde_json::to_value(&stage).unwrap(), json!("CANCELLED"));
        assert_eq!(stage.to_string(), "CANCELLED");
    }
}
