//! # Domain Lookup Library
//!
//! A WHOIS resolution engine with a pluggable DNS lookup front.
//!
//! Given a domain, the library picks the authoritative WHOIS server from a
//! TLD directory, queries it over TCP port 43, optionally follows a referral
//! to the registrar's server, and extracts the common registration fields
//! (registrar, dates, name servers, status, contact emails).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_lookup_lib::{WhoisClient, WhoisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WhoisClient::new(WhoisConfig::default());
//!     let result = client.lookup("example.com").await.into_result()?;
//!
//!     println!("Registrar: {:?}", result.fields.registrar);
//!     println!("Expires:   {:?}", result.fields.expiry_date);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Server Directory**: Built-in TLD table with compound-TLD awareness and overrides
//! - **Referral Following**: Thin registry answers are upgraded to registrar answers
//! - **Field Extraction**: Declarative rule table over unstandardized free text
//! - **Deadlines**: One deadline bounds connect, send, read and any referral
//! - **DNS Lookups**: Every common record kind plus SRV, through any `DnsResolver`

// Re-export main public API types and functions
pub use config::{load_env_config, parse_nameserver, ConfigManager, EnvConfig, FileConfig};
pub use error::LookupError;
pub use lookup::DomainLookup;
pub use protocols::{
    extract_fields, extract_referral, srv_name, DnsResolver, ServerDirectory, ServerDirectoryBuilder,
    SystemResolver, WhoisClient,
};
pub use types::{
    DnsConfig, DnsLookupResult, DomainReport, RecordKind, WhoisConfig, WhoisFields, WhoisResult,
    WhoisServer, DEFAULT_DNS_TIMEOUT, DEFAULT_WHOIS_TIMEOUT, WHOIS_PORT,
};
pub use utils::{is_valid_email, normalize_domain};

// Public modules
pub mod config;
pub mod protocols;

// Internal modules
mod error;
mod lookup;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, LookupError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
