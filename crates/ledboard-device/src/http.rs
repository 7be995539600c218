//! Blocking HTTP plumbing shared by the API clients.

use std::time::Duration;

use ledboard_core::sources::FetchError;
use log::trace;

const USER_AGENT: &str = concat!("ledboard/", env!("CARGO_PKG_VERSION"));

/// Agent whose connect and read timeouts both equal `timeout`.
pub fn agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Send `request` and return the response body.
pub fn fetch_body(request: ureq::Request) -> Result<String, FetchError> {
    trace!("GET {}", request.url());
    match request.call() {
        Ok(response) => response
            .into_string()
            .map_err(|e| FetchError::Transport(e.to_string())),
        Err(ureq::Error::Status(code, _)) => Err(FetchError::Status(code)),
        Err(ureq::Error::Transport(transport)) => {
            Err(FetchError::Transport(transport.to_string()))
        }
    }
}

pub fn decode_error(e: serde_json::Error) -> FetchError {
    FetchError::Decode(e.to_string())
}
