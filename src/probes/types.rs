// Standard library
use std::time::Duration;

// 3rd party crates
use hickory_proto::op::Message;

/// Result of a single probe against one target.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// Identifier of the probed target
    pub target_id: String,
    /// Whether the server answered at all, regardless of the response code
    pub available: bool,
    /// Wall time of the exchange, truncated to whole milliseconds
    pub response_time: Duration,
    /// The decoded answer, when one was received
    pub response: Option<Message>,
}

impl ProbeOutcome {
    pub fn available(target_id: &str, response_time: Duration, response: Message) -> Self {
        Self {
            target_id: target_id.to_string(),
            available: true,
            response_time,
            response: Some(response),
        }
    }

    pub fn unavailable(target_id: &str, response_time: Duration) -> Self {
        Self {
            target_id: target_id.to_string(),
            available: false,
            response_time,
            response: None,
        }
    }
}
