// Shared HTTP plumbing for the registry query and the artifact download.
// Both are single blocking calls with no retry.

use std::time::Duration;

/// `User-Agent` sent with every request; GitHub rejects requests without one.
const USER_AGENT: &str = concat!("chrysalis-installer/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// Longest silence tolerated on an established connection. Bounds how long a
/// stalled server can keep a recorded Ctrl-C from being acted on.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the blocking HTTP agent.
pub fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .user_agent(USER_AGENT)
        .timeout_connect(CONNECT_TIMEOUT)
        .timeout_read(READ_TIMEOUT)
        .build()
}

/// Turns a `ureq` failure into a one-line reason for the error message.
pub fn describe_error(error: ureq::Error) -> String {
    match error {
        ureq::Error::Status(code, response) => {
            format!("server responded with HTTP {} {}", code, response.status_text())
        }
        ureq::Error::Transport(transport) => format!("transport error: {transport}"),
    }
}
