pub mod dns;
pub mod traits;
pub mod types;

pub use dns::types::DnsProber;
pub use traits::Prober;
pub use types::ProbeOutcome;
