pub mod jitter;
pub mod ping;
pub mod report;
pub mod traceroute;
