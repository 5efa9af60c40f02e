//! DNS probe client.
//!
//! Sends a single `A` query over UDP to a target and reports whether the
//! server answered within fixed connect, write and read timeouts. The DNS
//! response code is not inspected for availability: a server that answers
//! NXDOMAIN or SERVFAIL is still up.

pub mod constants;
pub mod errors;
pub mod impls;
pub mod types;
