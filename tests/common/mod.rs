//! Helpers shared by the endpoint tests.
#![allow(dead_code)]

use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;

use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use tokio::net::UdpSocket;

use dns_pulse::checks::types::{Group, Target};
use dns_pulse::probes::dns::types::ProbeTimeouts;
use dns_pulse::settings::types::{Log, Mtls, Probe, Server, Settings};

/// Answers every query it receives with `NOERROR`.
pub async fn spawn_dns_responder() -> SocketAddr {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    tokio::spawn(async move {
        let mut buffer = vec![0u8; 512];
        loop {
            let Ok((n, peer)) = socket.recv_from(&mut buffer).await else {
                return;
            };
            let Ok(query) = Message::from_vec(&buffer[..n]) else {
                continue;
            };

            let mut response = Message::new();
            response
                .set_id(query.id())
                .set_message_type(MessageType::Response)
                .set_op_code(OpCode::Query)
                .set_response_code(ResponseCode::NoError)
                .add_queries(query.queries().to_vec());
            let _ = socket.send_to(&response.to_vec().unwrap(), peer).await;
        }
    });
    addr
}

pub fn short_timeouts() -> ProbeTimeouts {
    ProbeTimeouts {
        connect: Duration::from_millis(200),
        write: Duration::from_millis(200),
        read: Duration::from_millis(300),
    }
}

pub fn target(id: &str, addr: SocketAddr, maintenance: bool) -> Target {
    Target {
        id: id.to_string(),
        address: addr.ip().to_string(),
        port: addr.port(),
        record: "example.com".to_string(),
        maintenance,
        description: String::new(),
    }
}

pub fn group(name: &str, targets: Vec<Target>) -> Group {
    Group {
        name: name.to_string(),
        targets,
    }
}

pub fn settings(groups: Vec<Group>, mtls: Mtls) -> Settings {
    Settings {
        log: Log::default(),
        server: Server::default(),
        probe: Probe { max_in_flight: 4 },
        mtls,
        groups,
    }
}

pub fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}
