pub mod constants;
pub mod functions;
pub mod impls;
pub mod types;

pub use functions::{dedup_first_seen, render};
pub use types::DnsGroupCollector;
