use std::path::PathBuf;

use engine::{GenerationRequest, PerformanceSelection};

pub const DEFAULT_PROMPT: &str = "A beautiful landscape with mountains, a lake, and a sunset";
pub const DEFAULT_NEGATIVE_PROMPT: &str = "ugly, blurry, low quality";

/// Generate images with a running Fooocus API server
#[derive(Debug, clap::Parser)]
pub struct Cli {
    /// Base URL of the Fooocus API [default: http://127.0.0.1:8888]
    #[arg(long)]
    pub api_url: Option<String>,

    /// Where downloaded images are written [default: outputs]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub generate: GenerateArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    #[arg(short, long, default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    #[arg(short, long, default_value = DEFAULT_NEGATIVE_PROMPT)]
    pub negative_prompt: String,

    /// Style preset, may be repeated [default: Fooocus V2]
    #[arg(short, long = "style")]
    pub styles: Vec<String>,

    #[arg(long, value_enum, default_value_t)]
    pub performance: PerformanceSelection,

    /// Ask the server to answer with the results instead of a job id
    #[arg(long)]
    pub sync: bool,
}

impl GenerateArgs {
    pub fn to_request(&self) -> GenerationRequest {
        let styles = (!self.styles.is_empty()).then(|| self.styles.clone());
        GenerationRequest::new(&self.prompt, &self.negative_prompt, styles, !self.sync)
            .with_performance(self.performance)
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Query an existing job once and download the images it already has
    Status { job_id: String },
}
