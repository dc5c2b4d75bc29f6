use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

pub mod fooocus;
pub use fooocus::Fooocus;

pub mod fooocus_api;
pub use fooocus_api::FooocusApiError;

pub mod job;
pub use job::{ImageResult, JobStage, JobStatus, Seed};

pub const DEFAULT_STYLE: &str = "Fooocus V2";
pub const DEFAULT_ASPECT_RATIO: &str = "1152*896";
pub const DEFAULT_SAVE_EXTENSION: &str = "png";

#[derive(
    Debug,
    Clone,
    Copy,
    Display,
    clap::ValueEnum,
    Serialize,
    Deserialize,
    Hash,
    PartialEq,
    Eq,
    EnumIter,
    Default,
)]
pub enum PerformanceSelection {
    Speed,
    #[default]
    Quality,
    #[serde(rename = "Extreme Speed")]
    #[strum(to_string = "Extreme Speed")]
    ExtremeSpeed,
}

/// Body of a `text-to-image` call.
///
/// Only the prompt, negative prompt, styles and the async flag vary between calls, the
/// rest is pinned to the values the client always sends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub style_selections: Vec<String>,
    pub performance_selection: PerformanceSelection,
    pub aspect_ratios_selection: String,
    pub image_number: NonZeroU32,
    /// -1 lets the server pick a random seed
    pub image_seed: i64,
    pub sharpness: f64,
    pub guidance_scale: f64,
    pub async_process: bool,
    pub save_extension: String,
}

impl GenerationRequest {
    pub fn new(
        prompt: impl Into<String>,
        negative_prompt: impl Into<String>,
        style_selections: Option<Vec<String>>,
        async_process: bool,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: negative_prompt.into(),
            style_selections: style_selections.unwrap_or_else(|| vec![DEFAULT_STYLE.into()]),
            performance_selection: PerformanceSelection::default(),
            aspect_ratios_selection: DEFAULT_ASPECT_RATIO.into(),
            image_number: NonZeroU32::MIN,
            image_seed: -1,
            sharpness: 2.0,
            guidance_scale: 4.0,
            async_process,
            save_extension: DEFAULT_SAVE_EXTENSION.into(),
        }
    }

    pub fn with_performance(self, performance_selection: PerformanceSelection) -> Self {
        Self {
            performance_selection,
            ..self
        }
    }
}

#[cfg(test)]
mod test {
    use expect_test::expect;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn request_serialization() {
        let req = GenerationRequest::new("A lighthouse at dusk", "", None, true);

        let expect = expect![[r#"{"prompt":"A lighthouse at dusk","negative_prompt":"","style_selections":["Fooocus V2"],"performance_selection":"Quality","aspect_ratios_selection":"1152*896","image_number":1,"image_seed":-1,"sharpness":2.0,"guidance_scale":4.0,"async_process":true,"save_extension":"png"}"#]];
        expect.assert_eq(&serde_json::to_string(&req).unwrap());
    }

    #[test]
    fn explicit_styles_replace_the_default() {
        let req = GenerationRequest::new(
            "p",
            "blurry",
            Some(vec!["Fooocus Sharp".into(), "Fooocus Masterpiece".into()]),
            false,
        );
        assert_eq!(
            req.style_selections,
            ["Fooocus Sharp", "Fooocus Masterpiece"]
        );
        assert_eq!(req.negative_prompt, "blurry");
        assert!(!req.async_process);
    }

    #[test]
    fn performance_wire_names() {
        let names = PerformanceSelection::iter()
            .map(|p| serde_json::to_string(&p).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(names, [r#""Speed""#, r#""Quality""#, r#""Extreme Speed""#]);

        assert_eq!(PerformanceSelection::ExtremeSpeed.to_string(), "Extreme Speed");
        let req = GenerationRequest::new("p", "", None, true)
            .with_performance(PerformanceSelection::Speed);
        assert_eq!(req.performance_selection, PerformanceSelection::Speed);
    }
}
