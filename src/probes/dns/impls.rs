// Standard library
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

// 3rd party crates
use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RecordType};
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

// Project imports
use crate::checks::types::Target;
use crate::probes::traits::Prober;
use crate::probes::types::ProbeOutcome;

// Current module imports
use super::constants::{CONNECT_TIMEOUT, READ_TIMEOUT, RECV_BUFFER_SIZE, WRITE_TIMEOUT};
use super::errors::ProbeError;
use super::types::{DnsProber, ProbeTimeouts};

impl Default for ProbeTimeouts {
    fn default() -> Self {
        Self {
            connect: CONNECT_TIMEOUT,
            write: WRITE_TIMEOUT,
            read: READ_TIMEOUT,
        }
    }
}

impl Default for DnsProber {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsProber {
    /// Creates a prober with the standard 1s connect and 2s read/write timeouts.
    pub fn new() -> Self {
        Self::with_timeouts(ProbeTimeouts::default())
    }

    pub fn with_timeouts(timeouts: ProbeTimeouts) -> Self {
        Self { timeouts }
    }

    /// Builds a recursive `A` query for `record`, made fully qualified.
    pub(super) fn build_query(record: &str) -> Result<Message, ProbeError> {
        let fqdn: String = if record.ends_with('.') {
            record.to_string()
        } else {
            format!("{}.", record)
        };
        let name: Name = Name::from_ascii(&fqdn).map_err(|error| ProbeError::InvalidName {
            record: record.to_string(),
            error,
        })?;

        let mut message: Message = Message::new();
        message
            .set_id(rand::random::<u16>())
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true)
            .add_query(Query::query(name, RecordType::A));
        Ok(message)
    }

    /// Performs one query/answer exchange and returns the answer together
    /// with the time spent between sending and receiving.
    async fn exchange(&self, target: &Target) -> Result<(Message, Duration), ProbeError> {
        let query: Message = Self::build_query(&target.record)?;
        let payload: Vec<u8> = query.to_vec()?;

        let socket: UdpSocket = timeout(self.timeouts.connect, self.connect(target))
            .await
            .map_err(|_| ProbeError::Timeout {
                stage: "connect",
                timeout: self.timeouts.connect,
            })??;

        let started: Instant = Instant::now();

        timeout(self.timeouts.write, socket.send(&payload))
            .await
            .map_err(|_| ProbeError::Timeout {
                stage: "write",
                timeout: self.timeouts.write,
            })??;

        let mut buffer: Vec<u8> = vec![0u8; RECV_BUFFER_SIZE];
        let received: usize = timeout(self.timeouts.read, socket.recv(&mut buffer))
            .await
            .map_err(|_| ProbeError::Timeout {
                stage: "read",
                timeout: self.timeouts.read,
            })??;
        let elapsed: Duration = started.elapsed();

        let response: Message = Message::from_vec(&buffer[..received])?;
        if response.message_type() != MessageType::Response {
            return Err(ProbeError::NotAResponse);
        }
        if response.id() != query.id() {
            return Err(ProbeError::IdMismatch {
                expected: query.id(),
                got: response.id(),
            });
        }

        Ok((response, elapsed))
    }

    /// Resolves the target address and returns a UDP socket connected to it.
    async fn connect(&self, target: &Target) -> Result<UdpSocket, ProbeError> {
        let remote: SocketAddr = lookup_host((target.address.as_str(), target.port))
            .await?
            .next()
            .ok_or_else(|| ProbeError::NoAddress(target.address.clone()))?;

        let local: SocketAddr = if remote.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket: UdpSocket = UdpSocket::bind(local).await?;
        socket.connect(remote).await?;
        Ok(socket)
    }
}

fn truncate_to_millis(duration: Duration) -> Duration {
    Duration::from_millis(duration.as_millis() as u64)
}

#[async_trait]
impl Prober for DnsProber {
    async fn probe(&self, target: &Target) -> ProbeOutcome {
        debug!(
            target = %target.id,
            address = %target.address,
            port = target.port,
            record = %target.record,
            "Sending DNS request"
        );

        let started: Instant = Instant::now();
        match self.exchange(target).await {
            Ok((response, elapsed)) => {
                let response_time: Duration = truncate_to_millis(elapsed);
                info!(
                    target = %target.id,
                    address = %target.address,
                    response_code = %response.response_code(),
                    response_time_ms = response_time.as_millis() as u64,
                    "DNS request succeeded"
                );
                ProbeOutcome::available(&target.id, response_time, response)
            }
            Err(e) => {
                warn!(
                    target = %target.id,
                    address = %target.address,
                    error = %e,
                    "DNS request failed"
                );
                ProbeOutcome::unavailable(&target.id, truncate_to_millis(started.elapsed()))
            }
        }
    }

    fn get_name(&self) -> &str {
        "dns"
    }
}
