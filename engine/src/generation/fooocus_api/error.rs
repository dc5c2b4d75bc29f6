use thiserror::Error;

/// Errors raised by the Fooocus API layer itself, as opposed to transport errors
#[derive(Debug, Error)]
pub enum FooocusApiError {
    #[error("Couldn't decode response of {endpoint}: {source}\n{body}")]
    Decode {
        endpoint: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing job id")]
    MissingJobId,
}
