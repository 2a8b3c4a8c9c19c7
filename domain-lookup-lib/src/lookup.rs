//! Unified DNS and WHOIS lookups.
//!
//! This module provides the `DomainLookup` struct that fans out to a DNS
//! resolver and the WHOIS client and merges their results into one report.

use crate::protocols::{srv_name, DnsResolver, SystemResolver, WhoisClient};
use crate::types::{
    DnsConfig, DnsLookupResult, DomainReport, RecordKind, WhoisConfig, WhoisResult,
};
use crate::utils::deadline_after;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Coordinates DNS and WHOIS lookups for a domain.
///
/// Failures never abort a report: each DNS kind and the WHOIS lookup carry
/// their own error, and `lookup_all` summarizes them in a note.
///
/// # Example
///
/// ```rust,no_run
/// use domain_lookup_lib::DomainLookup;
///
/// #[tokio::main]
/// async fn main() {
///     let lookup = DomainLookup::new();
///     let report = lookup.lookup_all("example.com").await;
///     println!("{}", serde_json::to_string_pretty(&report).unwrap());
/// }
/// ```
#[derive(Clone)]
pub struct DomainLookup {
    dns_config: DnsConfig,
    resolver: Arc<dyn DnsResolver>,
    whois_client: WhoisClient,
}

impl DomainLookup {
    /// Create a lookup with default settings and the system resolver.
    pub fn new() -> Self {
        Self::with_config(DnsConfig::default(), WhoisConfig::default())
    }

    /// Create a lookup with custom configuration.
    ///
    /// DNS goes to `dns_config.nameserver` when set, otherwise to the
    /// host's configured resolvers.
    pub fn with_config(dns_config: DnsConfig, whois_config: WhoisConfig) -> Self {
        let resolver = Arc::new(SystemResolver::from_nameserver(dns_config.nameserver));
        Self::with_resolver(dns_config, resolver, WhoisClient::new(whois_config))
    }

    /// Create a lookup around a caller-supplied resolver and WHOIS client.
    pub fn with_resolver(
        dns_config: DnsConfig,
        resolver: Arc<dyn DnsResolver>,
        whois_client: WhoisClient,
    ) -> Self {
        Self {
            dns_config,
            resolver,
            whois_client,
        }
    }

    /// The WHOIS client used by this lookup.
    pub fn whois(&self) -> &WhoisClient {
        &self.whois_client
    }

    /// Resolve one record kind.
    pub async fn dns_lookup(&self, domain: &str, kind: RecordKind) -> DnsLookupResult {
        let timestamp = Utc::now();
        let deadline = deadline_after(self.dns_config.timeout);

        let (records, error) = match self.resolver.resolve(domain, kind, deadline).await {
            Ok(records) => (records, None),
            Err(err) => {
                debug!(domain, kind = %kind, error = %err, "DNS lookup failed");
                (Vec::new(), Some(err))
            }
        };

        DnsLookupResult {
            domain: domain.to_string(),
            record_kind: kind,
            records,
            timestamp,
            error,
        }
    }

    /// Resolve the SRV records of `_service._proto.name`.
    pub async fn srv_lookup(&self, service: &str, proto: &str, name: &str) -> DnsLookupResult {
        self.dns_lookup(&srv_name(service, proto, name), RecordKind::Srv).await
    }

    /// Resolve every common record kind, continuing past failures.
    pub async fn dns_lookup_all(&self, domain: &str) -> BTreeMap<RecordKind, DnsLookupResult> {
        let mut results = BTreeMap::new();
        for kind in RecordKind::common() {
            results.insert(kind, self.dns_lookup(domain, kind).await);
        }
        results
    }

    /// WHOIS lookup for `domain`.
    pub async fn whois_lookup(&self, domain: &str) -> WhoisResult {
        self.whois_client.lookup(domain).await
    }

    /// Run the DNS sweep and the WHOIS lookup concurrently and merge them.
    pub async fn lookup_all(&self, domain: &str) -> DomainReport {
        let (dns, whois) = futures_util::join!(self.dns_lookup_all(domain), self.whois_lookup(domain));

        let mut notes = Vec::new();
        if !dns.is_empty() && dns.values().all(|r| !r.is_ok()) {
            notes.push("DNS lookup failed: no record kind resolved".to_string());
        }
        if let Some(err) = &whois.error {
            notes.push(format!("WHOIS lookup failed: {}", err));
        }

        DomainReport {
            domain: domain.to_string(),
            dns,
            whois,
            error: if notes.is_empty() {
                None
            } else {
                Some(notes.join("; "))
            },
        }
    }
}

impl Default for DomainLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Resolver that answers A records only.
    struct StaticResolver;

    #[async_trait]
    impl DnsResolver for StaticResolver {
        async fn resolve(
            &self,
            name: &str,
            kind: RecordKind,
            _deadline: Instant,
        ) -> Result<Vec<String>, LookupError> {
            match kind {
                RecordKind::A => Ok(vec!["192.0.2.10".to_string()]),
                RecordKind::Srv if name == "_xmpp._tcp.example.com" => {
                    Ok(vec!["5 0 5222 xmpp.example.com".to_string()])
                }
                _ => Err(LookupError::dns(name, "no records")),
            }
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl DnsResolver for FailingResolver {
        async fn resolve(
            &self,
            name: &str,
            _kind: RecordKind,
            _deadline: Instant,
        ) -> Result<Vec<String>, LookupError> {
            Err(LookupError::dns(name, "SERVFAIL"))
        }
    }

    fn lookup_with(resolver: Arc<dyn DnsResolver>) -> DomainLookup {
        DomainLookup::with_resolver(DnsConfig::default(), resolver, WhoisClient::default())
    }

    #[tokio::test]
    async fn test_dns_lookup_all_continues_past_failures() {
        let lookup = lookup_with(Arc::new(StaticResolver));
        let results = lookup.dns_lookup_all("example.com").await;

        assert_eq!(results.len(), 6);
        assert_eq!(results[&RecordKind::A].records, vec!["192.0.2.10"]);
        assert!(results[&RecordKind::A].is_ok());
        assert!(!results[&RecordKind::Mx].is_ok());
        assert!(results[&RecordKind::Mx].records.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_all_merges_failures_into_note() {
        let lookup = lookup_with(Arc::new(FailingResolver));
        // Single label fails WHOIS before any network activity
        let report = lookup.lookup_all("localhost").await;

        let note = report.error.unwrap();
        assert!(note.contains("DNS lookup failed"));
        assert!(note.contains("WHOIS lookup failed"));
        assert!(note.contains("; "));
        assert_eq!(report.whois.domain, "localhost");
    }

    #[tokio::test]
    async fn test_srv_lookup_queries_service_name() {
        let lookup = lookup_with(Arc::new(StaticResolver));
        let result = lookup.srv_lookup("xmpp", "tcp", "example.com").await;

        assert!(result.is_ok());
        assert_eq!(result.domain, "_xmpp._tcp.example.com");
        assert_eq!(result.record_kind, RecordKind::Srv);
        assert_eq!(result.records, vec!["5 0 5222 xmpp.example.com"]);
    }

    #[tokio::test]
    async fn test_huge_dns_timeout_does_not_overflow() {
        let config = DnsConfig::default().with_timeout(Duration::from_secs(u64::MAX));
        let lookup =
            DomainLookup::with_resolver(config, Arc::new(StaticResolver), WhoisClient::default());

        let result = lookup.dns_lookup("example.com", RecordKind::A).await;
        assert_eq!(result.records, vec!["192.0.2.10"]);
    }

    #[test]
    fn test_with_config_uses_custom_nameserver() {
        let addr = "192.0.2.53:53".parse().unwrap();
        let lookup = DomainLookup::with_config(
            DnsConfig::default().with_nameserver(addr),
            WhoisConfig::default(),
        );
        assert_eq!(lookup.dns_config.nameserver, Some(addr));
    }
}
