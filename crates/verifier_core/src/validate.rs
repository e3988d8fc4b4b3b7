use thiserror::Error;
use url::Url;

/// Input accepted verbatim so the server can replay a recorded run.
pub const MOCK_SENTINEL: &str = "mock";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a URL.")]
    Empty,
    #[error("Please enter a valid URL.")]
    Malformed,
}

/// Accept any absolute URI, or the mock sentinel. Input is trimmed first.
pub fn validate_url(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if trimmed == MOCK_SENTINEL {
        return Ok(trimmed.to_string());
    }
    Url::parse(trimmed)
        .map(|_| trimmed.to_string())
        .map_err(|_| ValidationError::Malformed)
}
