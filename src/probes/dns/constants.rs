// Standard library
use std::time::Duration;

/// Time allowed to resolve the target address and connect the socket
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Time allowed to hand the query to the socket
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

/// Time allowed for the answer to arrive
pub const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Receive buffer size, large enough for EDNS sized UDP answers
pub const RECV_BUFFER_SIZE: usize = 4096;
