//! Core data types for WHOIS and DNS lookups.
//!
//! This module defines the main data structures used throughout the library,
//! including server endpoints, lookup results, and client configuration.

use crate::error::LookupError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Well-known WHOIS port (RFC 3912).
pub const WHOIS_PORT: u16 = 43;

/// Default timeout applied to a WHOIS lookup.
pub const DEFAULT_WHOIS_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout applied to a single DNS query.
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(5);

/// A WHOIS endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WhoisServer {
    /// Hostname or IP literal
    pub host: String,

    /// TCP port, 43 unless configured otherwise
    #[serde(default = "default_whois_port")]
    pub port: u16,
}

fn default_whois_port() -> u16 {
    WHOIS_PORT
}

impl WhoisServer {
    /// Create a server on the well-known WHOIS port.
    pub fn new<H: Into<String>>(host: H) -> Self {
        Self {
            host: host.into(),
            port: WHOIS_PORT,
        }
    }

    /// Create a server on an explicit port.
    pub fn with_port<H: Into<String>>(host: H, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Address suitable for `TcpStream::connect`; IPv6 literals get brackets.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for WhoisServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Structured fields extracted from a WHOIS response.
///
/// Scalars are raw strings exactly as the registry printed them; no date
/// parsing is attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,

    /// Lowercased, de-duplicated, in order of appearance
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_servers: Vec<String>,

    /// Every status line in order; repeats are kept
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,

    /// Validated, de-duplicated, first-seen order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
}

impl WhoisFields {
    /// Generic field-name to value view of the extracted fields.
    pub fn to_parsed_data(&self) -> BTreeMap<String, serde_json::Value> {
        let scalar = |v: &Option<String>| serde_json::Value::from(v.clone().unwrap_or_default());
        let list = |v: &Vec<String>| serde_json::Value::from(v.clone());

        BTreeMap::from([
            ("registrar".to_string(), scalar(&self.registrar)),
            ("created_date".to_string(), scalar(&self.created_date)),
            ("expiry_date".to_string(), scalar(&self.expiry_date)),
            ("updated_date".to_string(), scalar(&self.updated_date)),
            ("name_servers".to_string(), list(&self.name_servers)),
            ("status".to_string(), list(&self.status)),
            ("emails".to_string(), list(&self.emails)),
        ])
    }

    /// True when nothing at all was recognised.
    pub fn is_empty(&self) -> bool {
        self.registrar.is_none()
            && self.created_date.is_none()
            && self.expiry_date.is_none()
            && self.updated_date.is_none()
            && self.name_servers.is_empty()
            && self.status.is_empty()
            && self.emails.is_empty()
    }
}

/// Result of a single WHOIS lookup.
///
/// A result is always produced, even on failure; a failed lookup carries
/// `domain`, `timestamp` and `error` with everything else left empty.
#[derive(Debug, Clone, Serialize)]
pub struct WhoisResult {
    /// Normalized domain (lowercased, scheme and `www.` stripped)
    pub domain: String,

    /// Verbatim response of the server whose answer was retained
    pub raw_response: String,

    /// `host:port` of the server whose answer was retained
    pub server: String,

    /// When the lookup began
    pub timestamp: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<LookupError>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parsed_data: BTreeMap<String, serde_json::Value>,

    #[serde(flatten)]
    pub fields: WhoisFields,
}

impl WhoisResult {
    /// Start an empty result for `domain`.
    pub fn new<D: Into<String>>(domain: D, timestamp: DateTime<Utc>) -> Self {
        Self {
            domain: domain.into(),
            raw_response: String::new(),
            server: String::new(),
            timestamp,
            error: None,
            parsed_data: BTreeMap::new(),
            fields: WhoisFields::default(),
        }
    }

    /// Record extracted fields and mirror them into `parsed_data`.
    pub fn set_fields(&mut self, fields: WhoisFields) {
        self.parsed_data = fields.to_parsed_data();
        self.fields = fields;
    }

    /// Mark the lookup as failed. Everything but `domain` and `timestamp`
    /// is cleared so a failed result never carries partial data.
    pub fn fail(&mut self, error: LookupError) {
        self.raw_response.clear();
        self.server.clear();
        self.parsed_data.clear();
        self.fields = WhoisFields::default();
        self.error = Some(error);
    }

    /// Whether the lookup succeeded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a `Result`, for callers that prefer `?`.
    pub fn into_result(self) -> Result<WhoisResult, LookupError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

/// DNS record kinds understood by the resolver seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Txt,
    Ptr,
    Srv,
}

impl RecordKind {
    /// Kinds queried by a full DNS sweep.
    pub fn common() -> [RecordKind; 6] {
        [
            RecordKind::A,
            RecordKind::Aaaa,
            RecordKind::Cname,
            RecordKind::Mx,
            RecordKind::Ns,
            RecordKind::Txt,
        ]
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::A => "A",
            RecordKind::Aaaa => "AAAA",
            RecordKind::Cname => "CNAME",
            RecordKind::Mx => "MX",
            RecordKind::Ns => "NS",
            RecordKind::Txt => "TXT",
            RecordKind::Ptr => "PTR",
            RecordKind::Srv => "SRV",
        };
        f.write_str(name)
    }
}

impl FromStr for RecordKind {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(RecordKind::A),
            "AAAA" => Ok(RecordKind::Aaaa),
            "CNAME" => Ok(RecordKind::Cname),
            "MX" => Ok(RecordKind::Mx),
            "NS" => Ok(RecordKind::Ns),
            "TXT" => Ok(RecordKind::Txt),
            "PTR" => Ok(RecordKind::Ptr),
            "SRV" => Ok(RecordKind::Srv),
            other => Err(LookupError::config(format!(
                "Unsupported record type '{}'",
                other
            ))),
        }
    }
}

/// Result of a single DNS query.
#[derive(Debug, Clone, Serialize)]
pub struct DnsLookupResult {
    pub domain: String,
    pub record_kind: RecordKind,
    pub records: Vec<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<LookupError>,
}

impl DnsLookupResult {
    /// Whether the query succeeded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Merged DNS and WHOIS view of a domain.
#[derive(Debug, Clone, Serialize)]
pub struct DomainReport {
    pub domain: String,
    pub dns: BTreeMap<RecordKind, DnsLookupResult>,
    pub whois: WhoisResult,
    /// Partial-failure note, `; `-joined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Configuration options for the WHOIS client.
#[derive(Debug, Clone)]
pub struct WhoisConfig {
    /// Deadline for a whole lookup (primary plus referral)
    /// Default: 10 seconds
    pub timeout: Duration,

    /// Whether to follow referrals to more specific servers
    /// Default: true
    pub follow_referral: bool,

    /// Port used when re-querying a referred server
    /// Default: 43
    pub referral_port: u16,

    /// Entries merged over the built-in TLD table; these win on collision
    /// Default: empty
    pub custom_servers: HashMap<String, WhoisServer>,
}

impl Default for WhoisConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WHOIS_TIMEOUT,
            follow_referral: true,
            referral_port: WHOIS_PORT,
            custom_servers: HashMap::new(),
        }
    }
}

impl WhoisConfig {
    /// Set the lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable referral following.
    pub fn with_follow_referral(mut self, enabled: bool) -> Self {
        self.follow_referral = enabled;
        self
    }

    /// Set the port used for referral queries.
    pub fn with_referral_port(mut self, port: u16) -> Self {
        self.referral_port = port;
        self
    }

    /// Add or replace a server for a TLD key (e.g. "com", "co.uk", "default").
    pub fn with_server<K: Into<String>>(mut self, key: K, server: WhoisServer) -> Self {
        self.custom_servers.insert(key.into().to_lowercase(), server);
        self
    }
}

/// Configuration options for DNS lookups.
#[derive(Debug, Clone)]
pub struct DnsConfig {
    /// Timeout for each individual query
    /// Default: 5 seconds
    pub timeout: Duration,

    /// Nameserver to query instead of the host configuration
    pub nameserver: Option<SocketAddr>,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_DNS_TIMEOUT,
            nameserver: None,
        }
    }
}

impl DnsConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_nameserver(mut self, nameserver: SocketAddr) -> Self {
        self.nameserver = Some(nameserver);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_address_and_display() {
        let server = WhoisServer::new("whois.verisign-grs.com");
        assert_eq!(server.port, 43);
        assert_eq!(server.to_string(), "whois.verisign-grs.com:43");
        assert_eq!(server.address(), "whois.verisign-grs.com:43");

        let v6 = WhoisServer::with_port("::1", 4343);
        assert_eq!(v6.address(), "[::1]:4343");
    }

    #[test]
    fn test_record_kind_parse_and_display() {
        assert_eq!("mx".parse::<RecordKind>().unwrap(), RecordKind::Mx);
        assert_eq!("AAAA".parse::<RecordKind>().unwrap(), RecordKind::Aaaa);
        assert!("BOGUS".parse::<RecordKind>().is_err());
        assert_eq!(RecordKind::Cname.to_string(), "CNAME");
        assert_eq!(
            serde_json::to_string(&RecordKind::Txt).unwrap(),
            "\"TXT\""
        );
    }

    #[test]
    fn test_parsed_data_mirrors_fields() {
        let fields = WhoisFields {
            registrar: Some("Example Registrar".to_string()),
            name_servers: vec!["ns1.example.com".to_string()],
            ..Default::default()
        };
        let data = fields.to_parsed_data();
        assert_eq!(data["registrar"], "Example Registrar");
        assert_eq!(data["created_date"], "");
        assert_eq!(data["name_servers"], serde_json::json!(["ns1.example.com"]));
        assert_eq!(data.len(), 7);
    }

    #[test]
    fn test_failed_result_clears_partial_data() {
        let mut result = WhoisResult::new("example.com", Utc::now());
        result.raw_response = "Registrar: X\n".to_string();
        result.server = "whois.example.com:43".to_string();
        result.set_fields(WhoisFields {
            registrar: Some("X".to_string()),
            ..Default::default()
        });

        result.fail(LookupError::network("refused"));
        assert!(!result.is_ok());
        assert!(result.raw_response.is_empty());
        assert!(result.server.is_empty());
        assert!(result.fields.is_empty());
        assert!(result.parsed_data.is_empty());
        assert!(result.into_result().is_err());
    }

    #[test]
    fn test_result_serializes_flat() {
        let mut result = WhoisResult::new("example.com", Utc::now());
        result.set_fields(WhoisFields {
            registrar: Some("X".to_string()),
            ..Default::default()
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["registrar"], "X");
        assert_eq!(json["domain"], "example.com");
        assert!(json.get("error").is_none());
        assert!(json.get("name_servers").is_none());
    }

    #[test]
    fn test_whois_config_builder() {
        let config = WhoisConfig::default()
            .with_timeout(Duration::from_secs(3))
            .with_follow_referral(false)
            .with_server("TEST", WhoisServer::new("whois.test.example"));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(!config.follow_referral);
        assert_eq!(config.referral_port, 43);
        assert!(config.custom_servers.contains_key("test"));
    }
}
