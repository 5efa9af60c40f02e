/// Body message returned with 403 responses
pub const FORBIDDEN_MESSAGE: &str = "Incorrect CN of the certificate";

/// ALPN protocols offered on TLS connections
pub const ALPN_PROTOCOLS: [&[u8]; 2] = [b"h2", b"http/1.1"];
