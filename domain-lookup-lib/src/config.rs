//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DL_*`
//! environment variables, and merging them with proper precedence rules:
//! command line > environment > local file > home file > XDG file > defaults.

use crate::error::LookupError;
use crate::types::{DnsConfig, WhoisConfig, WhoisServer, WHOIS_PORT};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
///
/// ```toml
/// [whois]
/// timeout = "10s"
/// follow_referral = true
///
/// [servers]
/// com = "whois.verisign-grs.com"
/// test = { host = "127.0.0.1", port = 4343 }
///
/// [dns]
/// timeout = "5s"
/// nameserver = "8.8.8.8:53"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// WHOIS client settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois: Option<WhoisSection>,

    /// TLD key to server overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<HashMap<String, ServerEntry>>,

    /// DNS settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsSection>,
}

/// The `[whois]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WhoisSection {
    /// Lookup timeout (as string, e.g., "10s", "500ms")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_referral: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_port: Option<u16>,
}

/// The `[dns]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DnsSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// `IP[:PORT]` of a nameserver to query instead of the host resolvers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameserver: Option<String>,
}

/// A server entry: either a bare host (port 43) or a `{ host, port }` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerEntry {
    Host(String),
    Server(WhoisServer),
}

impl ServerEntry {
    pub fn to_server(&self) -> WhoisServer {
        match self {
            ServerEntry::Host(host) => WhoisServer::new(host.trim()),
            ServerEntry::Server(server) => server.clone(),
        }
    }
}

impl FileConfig {
    /// Build a WHOIS configuration from this file on top of the defaults.
    ///
    /// Assumes the file has passed validation; unparseable timeouts are
    /// left at their defaults.
    pub fn to_whois_config(&self) -> WhoisConfig {
        let mut config = WhoisConfig::default();

        if let Some(section) = &self.whois {
            if let Some(timeout) = section.timeout.as_deref().and_then(parse_timeout_string) {
                config.timeout = timeout;
            }
            if let Some(follow) = section.follow_referral {
                config.follow_referral = follow;
            }
            if let Some(port) = section.referral_port {
                config.referral_port = port;
            }
        }

        if let Some(servers) = &self.servers {
            for (key, entry) in servers {
                config = config.with_server(key.as_str(), entry.to_server());
            }
        }

        config
    }

    /// Build a DNS configuration from this file on top of the defaults.
    pub fn to_dns_config(&self) -> DnsConfig {
        let mut config = DnsConfig::default();
        if let Some(dns) = &self.dns {
            if let Some(timeout) = dns.timeout.as_deref().and_then(parse_timeout_string) {
                config.timeout = timeout;
            }
            if let Some(ns) = dns.nameserver.as_deref() {
                config.nameserver = parse_nameserver(ns).ok();
            }
        }
        config
    }
}

/// Configuration discovery and loading functionality.
#[derive(Debug, Clone, Default)]
pub struct ConfigManager;

impl ConfigManager {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a specific file.
    ///
    /// A missing or unreadable file is a `FileError`; malformed TOML or
    /// invalid values are a `ConfigError`.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, LookupError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LookupError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            LookupError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;
        self.validate_config(&config)?;

        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Looks in the XDG config directory, then the home directory, then the
    /// current directory; later files override earlier ones.
    pub fn discover_and_load(&self) -> Result<FileConfig, LookupError> {
        let candidates: Vec<PathBuf> = [
            self.get_xdg_config_path(),
            self.get_home_config_path(),
            Some(PathBuf::from("./domain-lookup.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        self.load_paths(&candidates)
    }

    /// Load and merge the files in `paths` that exist, lowest precedence first.
    ///
    /// Files that exist but fail to load are reported, not skipped.
    pub fn load_paths(&self, paths: &[PathBuf]) -> Result<FileConfig, LookupError> {
        let mut merged = FileConfig::default();
        let mut loaded = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            let config = self.load_file(path)?;
            merged = self.merge_configs(merged, config);
            loaded.push(path.display().to_string());
        }

        if loaded.len() > 1 {
            debug!(files = ?loaded, "merged multiple configuration files");
        }

        Ok(merged)
    }

    fn get_home_config_path(&self) -> Option<PathBuf> {
        env::var_os("HOME").map(|home| Path::new(&home).join(".domain-lookup.toml"))
    }

    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        Some(config_dir.join("domain-lookup").join("config.toml"))
    }

    /// Merge two configurations; values from `higher` win.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            whois: match (lower.whois, higher.whois) {
                (Some(mut lower_whois), Some(higher_whois)) => {
                    if higher_whois.timeout.is_some() {
                        lower_whois.timeout = higher_whois.timeout;
                    }
                    if higher_whois.follow_referral.is_some() {
                        lower_whois.follow_referral = higher_whois.follow_referral;
                    }
                    if higher_whois.referral_port.is_some() {
                        lower_whois.referral_port = higher_whois.referral_port;
                    }
                    Some(lower_whois)
                }
                (lower_whois, higher_whois) => higher_whois.or(lower_whois),
            },
            servers: match (lower.servers, higher.servers) {
                (Some(mut lower_servers), Some(higher_servers)) => {
                    lower_servers.extend(higher_servers);
                    Some(lower_servers)
                }
                (lower_servers, higher_servers) => higher_servers.or(lower_servers),
            },
            dns: match (lower.dns, higher.dns) {
                (Some(mut lower_dns), Some(higher_dns)) => {
                    if higher_dns.timeout.is_some() {
                        lower_dns.timeout = higher_dns.timeout;
                    }
                    if higher_dns.nameserver.is_some() {
                        lower_dns.nameserver = higher_dns.nameserver;
                    }
                    Some(lower_dns)
                }
                (lower_dns, higher_dns) => higher_dns.or(lower_dns),
            },
        }
    }

    /// Validate a configuration for common issues.
    pub fn validate_config(&self, config: &FileConfig) -> Result<(), LookupError> {
        if let Some(whois) = &config.whois {
            if let Some(timeout) = &whois.timeout {
                validate_timeout("whois.timeout", timeout)?;
            }
            if whois.referral_port == Some(0) {
                return Err(LookupError::config("whois.referral_port must be non-zero"));
            }
        }

        if let Some(dns) = &config.dns {
            if let Some(timeout) = &dns.timeout {
                validate_timeout("dns.timeout", timeout)?;
            }
            if let Some(nameserver) = &dns.nameserver {
                parse_nameserver(nameserver)?;
            }
        }

        if let Some(servers) = &config.servers {
            for (key, entry) in servers {
                if key.trim().is_empty() {
                    return Err(LookupError::config("Server keys cannot be empty"));
                }
                let server = entry.to_server();
                if server.host.trim().is_empty() {
                    return Err(LookupError::config(format!(
                        "Server '{}' has an empty host",
                        key
                    )));
                }
                if server.port == 0 {
                    return Err(LookupError::config(format!(
                        "Server '{}' has an invalid port 0",
                        key
                    )));
                }
            }
        }

        Ok(())
    }
}

fn validate_timeout(field: &str, value: &str) -> Result<(), LookupError> {
    match parse_timeout_string(value) {
        Some(timeout) if !timeout.is_zero() => Ok(()),
        _ => Err(LookupError::config(format!(
            "Invalid {} '{}'. Use format like '5s', '500ms', '2m'",
            field, value
        ))),
    }
}

/// Environment variable configuration.
///
/// Mirrors the `DL_*` variables; each field is `None` when the variable is
/// unset or invalid.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub timeout: Option<Duration>,
    pub follow_referral: Option<bool>,
    pub referral_port: Option<u16>,
    pub servers: Vec<(String, WhoisServer)>,
    pub nameserver: Option<SocketAddr>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Layer these values over `config`.
    pub fn apply(&self, mut config: WhoisConfig) -> WhoisConfig {
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(follow) = self.follow_referral {
            config.follow_referral = follow;
        }
        if let Some(port) = self.referral_port {
            config.referral_port = port;
        }
        for (key, server) in &self.servers {
            config = config.with_server(key.as_str(), server.clone());
        }
        config
    }

    /// Layer the DNS values over `config`.
    pub fn apply_dns(&self, mut config: DnsConfig) -> DnsConfig {
        if let Some(nameserver) = self.nameserver {
            config.nameserver = Some(nameserver);
        }
        config
    }
}

/// Load configuration from the process environment.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    load_env_config_from(|name| env::var(name).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    // DL_TIMEOUT - WHOIS lookup timeout
    if let Some(value) = lookup("DL_TIMEOUT") {
        match parse_timeout_string(&value) {
            Some(timeout) if !timeout.is_zero() => {
                debug!(timeout = ?timeout, "using DL_TIMEOUT");
                env_config.timeout = Some(timeout);
            }
            _ => warn!(value = %value, "invalid DL_TIMEOUT, use format like '5s', '500ms', '2m'"),
        }
    }

    // DL_FOLLOW_REFERRAL - enable/disable referral following
    if let Some(value) = lookup("DL_FOLLOW_REFERRAL") {
        match parse_bool(&value) {
            Some(follow) => env_config.follow_referral = Some(follow),
            None => warn!(value = %value, "invalid DL_FOLLOW_REFERRAL, use true/false"),
        }
    }

    // DL_REFERRAL_PORT - port for referred registrar servers
    if let Some(value) = lookup("DL_REFERRAL_PORT") {
        match value.trim().parse::<u16>() {
            Ok(port) if port != 0 => env_config.referral_port = Some(port),
            _ => warn!(value = %value, "invalid DL_REFERRAL_PORT, use a port between 1 and 65535"),
        }
    }

    // DL_WHOIS_SERVER - comma-separated tld=host[:port] overrides
    if let Some(value) = lookup("DL_WHOIS_SERVER") {
        for pair in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match parse_server_override(pair) {
                Ok(entry) => env_config.servers.push(entry),
                Err(e) => warn!(value = %pair, error = %e, "ignoring DL_WHOIS_SERVER entry"),
            }
        }
    }

    // DL_RESOLVER - DNS nameserver, IP[:PORT]
    if let Some(value) = lookup("DL_RESOLVER") {
        match parse_nameserver(&value) {
            Ok(addr) => env_config.nameserver = Some(addr),
            Err(e) => warn!(value = %value, error = %e, "invalid DL_RESOLVER"),
        }
    }

    // DL_CONFIG - explicit configuration file
    if let Some(path) = lookup("DL_CONFIG") {
        if !path.trim().is_empty() {
            env_config.config = Some(path);
        }
    }

    env_config
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a server override of the form `tld=host[:port]`.
///
/// ```
/// use domain_lookup_lib::config::parse_server_override;
///
/// let (tld, server) = parse_server_override("test=127.0.0.1:4343").unwrap();
/// assert_eq!(tld, "test");
/// assert_eq!(server.port, 4343);
/// ```
pub fn parse_server_override(value: &str) -> Result<(String, WhoisServer), LookupError> {
    let invalid = |reason: &str| {
        LookupError::config(format!(
            "Invalid server override '{}': {}. Use TLD=HOST[:PORT]",
            value, reason
        ))
    };

    let (key, target) = value.split_once('=').ok_or_else(|| invalid("missing '='"))?;
    let key = key.trim().to_lowercase();
    let target = target.trim();
    if key.is_empty() {
        return Err(invalid("empty TLD"));
    }

    // A single colon separates the port; more than one means a bare IPv6 literal
    let server = match target.split_once(':') {
        Some((host, port)) if !port.contains(':') => {
            let port = port
                .parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| invalid("bad port"))?;
            WhoisServer::with_port(host, port)
        }
        _ => WhoisServer::with_port(target, WHOIS_PORT),
    };

    if server.host.is_empty() {
        return Err(invalid("empty host"));
    }

    Ok((key, server))
}

/// Parse a nameserver address, `IP` or `IP:PORT` (IPv6 as `[IP]:PORT`).
///
/// The port defaults to 53.
///
/// ```
/// use domain_lookup_lib::config::parse_nameserver;
///
/// assert_eq!(parse_nameserver("8.8.8.8").unwrap().to_string(), "8.8.8.8:53");
/// assert_eq!(parse_nameserver("[::1]:5353").unwrap().port(), 5353);
/// ```
pub fn parse_nameserver(value: &str) -> Result<SocketAddr, LookupError> {
    let value = value.trim();
    let addr = match value.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, 53),
        Err(_) => value.parse::<SocketAddr>().map_err(|_| {
            LookupError::config(format!(
                "Invalid resolver address '{}'. Use IP or IP:PORT",
                value
            ))
        })?,
    };

    if addr.port() == 0 {
        return Err(LookupError::config(format!(
            "Invalid resolver address '{}': port must be non-zero",
            value
        )));
    }
    Ok(addr)
}

/// Parse a timeout string like "500ms", "5s", "2m", or bare seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(ms) = timeout_str.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        timeout_str.parse::<u64>().ok().map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_parse_timeout_string() {
        assert_eq!(parse_timeout_string("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_timeout_string("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_timeout_string("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_timeout_string("7"), Some(Duration::from_secs(7)));
        assert_eq!(parse_timeout_string("invalid"), None);
        assert_eq!(parse_timeout_string(""), None);
    }

    #[test]
    fn test_parse_timeout_string_rejects_overflowing_minutes() {
        assert_eq!(parse_timeout_string("307445734561825861m"), None);
        assert_eq!(
            parse_timeout_string("18446744073709551615s"),
            Some(Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn test_parse_nameserver() {
        assert_eq!(
            parse_nameserver("8.8.8.8:53").unwrap(),
            "8.8.8.8:53".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(parse_nameserver(" 1.1.1.1 ").unwrap().port(), 53);
        assert_eq!(parse_nameserver("::1").unwrap().port(), 53);
        assert_eq!(parse_nameserver("[::1]:5353").unwrap().port(), 5353);

        assert!(parse_nameserver("dns.google").is_err());
        assert!(parse_nameserver("8.8.8.8:0").is_err());
        assert!(parse_nameserver("8.8.8.8:99999").is_err());
    }

    #[test]
    fn test_load_valid_config() {
        let temp_file = write_config(
            r#"
[whois]
timeout = "3s"
follow_referral = false

[servers]
com = "whois.example.net"
test = { host = "127.0.0.1", port = 4343 }

[dns]
timeout = "500ms"
nameserver = "127.0.0.1:5353"
"#,
        );

        let config = ConfigManager::new().load_file(temp_file.path()).unwrap();

        let whois = config.to_whois_config();
        assert_eq!(whois.timeout, Duration::from_secs(3));
        assert!(!whois.follow_referral);
        assert_eq!(whois.custom_servers["com"], WhoisServer::new("whois.example.net"));
        assert_eq!(
            whois.custom_servers["test"],
            WhoisServer::with_port("127.0.0.1", 4343)
        );

        let dns = config.to_dns_config();
        assert_eq!(dns.timeout, Duration::from_millis(500));
        assert_eq!(dns.nameserver, Some("127.0.0.1:5353".parse().unwrap()));
    }

    #[test]
    fn test_table_entry_without_port_defaults_to_43() {
        let temp_file = write_config("[servers]\nio = { host = \"whois.nic.io\" }\n");
        let config = ConfigManager::new().load_file(temp_file.path()).unwrap();
        assert_eq!(config.to_whois_config().custom_servers["io"].port, 43);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let manager = ConfigManager::new();

        for content in [
            "[whois]\ntimeout = \"0s\"\n",
            "[whois]\ntimeout = \"soon\"\n",
            "[whois]\nreferral_port = 0\n",
            "[servers]\ncom = \"\"\n",
            "[servers]\ncom = { host = \"whois.example.net\", port = 0 }\n",
            "[dns]\ntimeout = \"-1\"\n",
            "[dns]\nnameserver = \"resolver.example\"\n",
        ] {
            let temp_file = write_config(content);
            let err = manager.load_file(temp_file.path()).unwrap_err();
            assert!(matches!(err, LookupError::ConfigError { .. }), "{}", content);
        }
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let temp_file = write_config("[whois\ntimeout = ");
        let err = ConfigManager::new().load_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, LookupError::ConfigError { .. }));
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = ConfigManager::new()
            .load_file("/nonexistent/domain-lookup.toml")
            .unwrap_err();
        assert!(matches!(err, LookupError::FileError { .. }));
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::new();

        let lower = FileConfig {
            whois: Some(WhoisSection {
                timeout: Some("10s".to_string()),
                follow_referral: Some(false),
                referral_port: None,
            }),
            servers: Some(HashMap::from([
                ("com".to_string(), ServerEntry::Host("a.example".to_string())),
                ("net".to_string(), ServerEntry::Host("b.example".to_string())),
            ])),
            dns: None,
        };
        let higher = FileConfig {
            whois: Some(WhoisSection {
                timeout: Some("2s".to_string()),
                ..Default::default()
            }),
            servers: Some(HashMap::from([(
                "com".to_string(),
                ServerEntry::Host("c.example".to_string()),
            )])),
            dns: Some(DnsSection {
                timeout: Some("1s".to_string()),
                ..Default::default()
            }),
        };

        let merged = manager.merge_configs(lower, higher);
        let whois = merged.whois.as_ref().unwrap();
        assert_eq!(whois.timeout.as_deref(), Some("2s"));
        assert_eq!(whois.follow_referral, Some(false));

        let servers = merged.servers.as_ref().unwrap();
        assert_eq!(servers["com"], ServerEntry::Host("c.example".to_string()));
        assert_eq!(servers["net"], ServerEntry::Host("b.example".to_string()));

        assert_eq!(merged.to_dns_config().timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_load_paths_precedence() {
        let xdg = write_config("[whois]\ntimeout = \"9s\"\nfollow_referral = false\n");
        let local = write_config("[whois]\ntimeout = \"4s\"\n");

        let config = ConfigManager::new()
            .load_paths(&[
                xdg.path().to_path_buf(),
                PathBuf::from("/nonexistent/domain-lookup.toml"),
                local.path().to_path_buf(),
            ])
            .unwrap();

        let whois = config.to_whois_config();
        assert_eq!(whois.timeout, Duration::from_secs(4));
        assert!(!whois.follow_referral);
    }

    #[test]
    fn test_parse_server_override() {
        let (key, server) = parse_server_override("CO.UK=whois.nic.uk").unwrap();
        assert_eq!(key, "co.uk");
        assert_eq!(server, WhoisServer::new("whois.nic.uk"));

        let (_, server) = parse_server_override("test=127.0.0.1:4343").unwrap();
        assert_eq!(server, WhoisServer::with_port("127.0.0.1", 4343));

        let (_, server) = parse_server_override("v6=::1").unwrap();
        assert_eq!(server.host, "::1");
        assert_eq!(server.port, 43);

        assert!(parse_server_override("no-equals").is_err());
        assert!(parse_server_override("=host").is_err());
        assert!(parse_server_override("com=").is_err());
        assert!(parse_server_override("com=host:notaport").is_err());
    }

    #[test]
    fn test_env_config() {
        let vars = HashMap::from([
            ("DL_TIMEOUT", "3s"),
            ("DL_FOLLOW_REFERRAL", "no"),
            ("DL_REFERRAL_PORT", "4344"),
            ("DL_WHOIS_SERVER", "com=whois.example.net, test=127.0.0.1:4343,broken"),
            ("DL_RESOLVER", "9.9.9.9"),
            ("DL_CONFIG", "/tmp/custom.toml"),
        ]);
        let env_config = load_env_config_from(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(env_config.timeout, Some(Duration::from_secs(3)));
        assert_eq!(env_config.follow_referral, Some(false));
        assert_eq!(env_config.referral_port, Some(4344));
        assert_eq!(env_config.servers.len(), 2);
        assert_eq!(env_config.config.as_deref(), Some("/tmp/custom.toml"));

        let whois = env_config.apply(WhoisConfig::default());
        assert_eq!(whois.timeout, Duration::from_secs(3));
        assert!(!whois.follow_referral);
        assert_eq!(whois.referral_port, 4344);
        assert_eq!(whois.custom_servers["test"].port, 4343);

        let dns = env_config.apply_dns(DnsConfig::default());
        assert_eq!(dns.nameserver, Some("9.9.9.9:53".parse().unwrap()));
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let vars = HashMap::from([
            ("DL_TIMEOUT", "forever"),
            ("DL_FOLLOW_REFERRAL", "maybe"),
            ("DL_REFERRAL_PORT", "0"),
            ("DL_RESOLVER", "not-an-ip"),
        ]);
        let env_config = load_env_config_from(|name| vars.get(name).map(|v| v.to_string()));

        assert!(env_config.timeout.is_none());
        assert!(env_config.follow_referral.is_none());
        assert!(env_config.referral_port.is_none());
        assert!(env_config.nameserver.is_none());

        let whois = env_config.apply(WhoisConfig::default());
        assert_eq!(whois.timeout, Duration::from_secs(10));
        assert!(whois.follow_referral);
        assert_eq!(whois.referral_port, 43);

        let ports = HashMap::from([("DL_REFERRAL_PORT", "70000")]);
        assert!(load_env_config_from(|name| ports.get(name).map(|v| v.to_string()))
            .referral_port
            .is_none());
    }
}
