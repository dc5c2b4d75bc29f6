pub mod generation;
pub use generation::{Fooocus, GenerationRequest, PerformanceSelection};

pub mod run;
pub use run::{RunSummary, check_job, run};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8888";
