//! TLD to WHOIS server mappings.
//!
//! The directory is built once from the built-in table plus caller overrides
//! and is read-only afterwards, so any number of concurrent lookups can share
//! it by reference without synchronization.

use crate::error::LookupError;
use crate::types::WhoisServer;
use crate::utils::domain_labels;
use std::collections::HashMap;
use tracing::debug;

/// Sentinel key for the fallback server.
pub const DEFAULT_KEY: &str = "default";

/// Root WHOIS server used when no TLD-specific entry exists.
pub const ROOT_WHOIS_HOST: &str = "whois.iana.org";

/// Get the built-in WHOIS server mappings.
///
/// Keys are lowercase TLDs, compound TLDs such as `co.uk`, and the
/// `default` sentinel. Every entry uses the well-known port.
pub fn get_whois_server_map() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        // Generic TLDs
        ("com", "whois.verisign-grs.com"),
        ("net", "whois.verisign-grs.com"),
        ("org", "whois.pir.org"),
        ("info", "whois.afilias.net"),
        ("biz", "whois.biz"),
        ("asia", "whois.nic.asia"),
        ("mobi", "whois.nic.mobi"),
        ("xxx", "whois.nic.xxx"),
        ("tel", "whois.nic.tel"),
        // Google TLDs
        ("app", "whois.nic.google"),
        ("dev", "whois.nic.google"),
        // Country code TLDs
        ("us", "whois.nic.us"),
        ("uk", "whois.nic.uk"),
        ("co.uk", "whois.nic.uk"),
        ("ca", "whois.cira.ca"),
        ("de", "whois.denic.de"),
        ("jp", "whois.jprs.jp"),
        ("fr", "whois.nic.fr"),
        ("au", "whois.auda.org.au"),
        ("ru", "whois.tcinet.ru"),
        ("ch", "whois.nic.ch"),
        ("it", "whois.nic.it"),
        ("nl", "whois.domain-registry.nl"),
        ("eu", "whois.eu"),
        ("nz", "whois.irs.net.nz"),
        ("io", "whois.nic.io"),
        ("me", "whois.nic.me"),
        ("tv", "whois.nic.tv"),
        ("cc", "whois.nic.cc"),
        ("ai", "whois.nic.ai"),
        ("co", "whois.nic.co"),
        ("in", "whois.registry.in"),
        ("cn", "whois.cnnic.cn"),
        ("br", "whois.registro.br"),
        ("mx", "whois.mx"),
        ("se", "whois.iis.se"),
        ("be", "whois.dns.be"),
        ("at", "whois.nic.at"),
        ("dk", "whois.dk-hostmaster.dk"),
        ("fi", "whois.fi"),
        ("is", "whois.isnic.is"),
        ("cz", "whois.nic.cz"),
        ("pl", "whois.dns.pl"),
        // Fallback
        (DEFAULT_KEY, ROOT_WHOIS_HOST),
    ])
}

/// Immutable TLD to WHOIS server directory.
#[derive(Debug, Clone)]
pub struct ServerDirectory {
    servers: HashMap<String, WhoisServer>,
    default: WhoisServer,
}

/// Builder that merges caller entries over the built-in table.
#[derive(Debug, Clone)]
pub struct ServerDirectoryBuilder {
    servers: HashMap<String, WhoisServer>,
}

impl ServerDirectoryBuilder {
    /// Add or replace one entry. Keys are lowercased.
    pub fn with_server<K: AsRef<str>>(mut self, key: K, server: WhoisServer) -> Self {
        self.servers.insert(key.as_ref().to_lowercase(), server);
        self
    }

    /// Merge a map of entries; these win over anything already present.
    pub fn extend<I, K>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, WhoisServer)>,
        K: AsRef<str>,
    {
        for (key, server) in entries {
            self.servers.insert(key.as_ref().to_lowercase(), server);
        }
        self
    }

    /// Freeze the directory. A `default` entry is always present.
    pub fn build(mut self) -> ServerDirectory {
        let default = self
            .servers
            .entry(DEFAULT_KEY.to_string())
            .or_insert_with(|| WhoisServer::new(ROOT_WHOIS_HOST))
            .clone();
        ServerDirectory {
            servers: self.servers,
            default,
        }
    }
}

impl ServerDirectory {
    /// Start from the built-in table.
    pub fn builder() -> ServerDirectoryBuilder {
        let servers = get_whois_server_map()
            .into_iter()
            .map(|(tld, host)| (tld.to_string(), WhoisServer::new(host)))
            .collect();
        ServerDirectoryBuilder { servers }
    }

    /// The built-in table with no overrides.
    pub fn builtin() -> Self {
        Self::builder().build()
    }

    /// Resolve the server responsible for `domain`.
    ///
    /// Lookup flow:
    /// 1. With three or more labels, try the last two joined (`co.uk`)
    /// 2. Try the last label alone (`uk`)
    /// 3. Fall back to the `default` entry
    ///
    /// Fails only when the domain has fewer than two labels.
    pub fn resolve(&self, domain: &str) -> Result<&WhoisServer, LookupError> {
        let labels = domain_labels(domain)?;
        let n = labels.len();

        if n >= 3 {
            let compound = labels[n - 2..].join(".").to_lowercase();
            if let Some(server) = self.servers.get(&compound) {
                debug!(domain, tld = %compound, server = %server, "resolved compound TLD server");
                return Ok(server);
            }
        }

        let tld = labels[n - 1].to_lowercase();
        if let Some(server) = self.servers.get(&tld) {
            debug!(domain, tld = %tld, server = %server, "resolved TLD server");
            return Ok(server);
        }

        let server = self.default_server();
        debug!(domain, server = %server, "no TLD entry, using default server");
        Ok(server)
    }

    /// Look up an entry by key.
    pub fn get(&self, key: &str) -> Option<&WhoisServer> {
        self.servers.get(&key.to_lowercase())
    }

    /// The fallback server; the root IANA server unless overridden.
    pub fn default_server(&self) -> &WhoisServer {
        &self.default
    }

    /// Number of entries including the `default` sentinel.
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Whether the directory has no entries.
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// All TLD keys, sorted, excluding the `default` sentinel.
    pub fn tlds(&self) -> Vec<String> {
        let mut tlds: Vec<String> = self
            .servers
            .keys()
            .filter(|k| k.as_str() != DEFAULT_KEY)
            .cloned()
            .collect();
        tlds.sort();
        tlds
    }
}

impl Default for ServerDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}
