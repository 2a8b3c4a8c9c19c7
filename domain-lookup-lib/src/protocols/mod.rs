//! Protocol implementations for domain lookups.
//!
//! This module contains the WHOIS engine (server directory, transport,
//! referral detection, field extraction) and the DNS resolver seam.

/// WHOIS client and query transport
pub mod whois;

/// TLD to WHOIS server directory
pub mod registry;

/// Referral detection in WHOIS responses
pub mod referral;

/// Field extraction from WHOIS responses
pub mod parser;

/// DNS resolver capability and the hickory-backed resolver
pub mod dns;

// Re-export commonly used functions and types
pub use dns::{srv_name, DnsResolver, SystemResolver};
pub use parser::extract_fields;
pub use referral::extract_referral;
pub use registry::{get_whois_server_map, ServerDirectory, ServerDirectoryBuilder};
pub use whois::WhoisClient;
