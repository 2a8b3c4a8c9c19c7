//! DNS resolver seam.
//!
//! Record lookups go through the `DnsResolver` capability. `SystemResolver`
//! implements it on hickory, using the host's resolver configuration or a
//! single caller-chosen nameserver.

use crate::error::LookupError;
use crate::types::RecordKind;
use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::{Name, RecordType};
use hickory_resolver::proto::ProtoError;
use hickory_resolver::TokioResolver;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Capability to resolve DNS records.
///
/// Implementations return records rendered as text: addresses, hostnames,
/// `"<pref> <host>"` for MX and `"<priority> <weight> <port> <target>"` for SRV.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(
        &self,
        name: &str,
        kind: RecordKind,
        deadline: Instant,
    ) -> Result<Vec<String>, LookupError>;
}

/// Owner name of an SRV record set: `_service._proto.name`.
///
/// Leading underscores already present on `service` or `proto` are kept once.
pub fn srv_name(service: &str, proto: &str, name: &str) -> String {
    format!(
        "_{}._{}.{}",
        service.trim_start_matches('_'),
        proto.trim_start_matches('_'),
        name.trim_end_matches('.')
    )
}

/// DNS resolver backed by hickory.
///
/// Every `RecordKind` is answered. PTR accepts either an IP address, which
/// is turned into its reverse name, or an `in-addr.arpa`/`ip6.arpa` name.
#[derive(Clone)]
pub struct SystemResolver {
    resolver: TokioResolver,
    nameserver: Option<SocketAddr>,
}

impl SystemResolver {
    /// Resolver using the host configuration (`/etc/resolv.conf` and friends).
    ///
    /// Falls back to hickory's default upstreams when the host configuration
    /// cannot be read.
    pub fn new() -> Self {
        let resolver = match TokioResolver::builder_tokio() {
            Ok(builder) => builder.build(),
            Err(e) => {
                warn!(error = %e, "failed to read system DNS configuration, using defaults");
                TokioResolver::builder_with_config(
                    ResolverConfig::default(),
                    TokioConnectionProvider::default(),
                )
                .with_options(ResolverOpts::default())
                .build()
            }
        };

        Self {
            resolver,
            nameserver: None,
        }
    }

    /// Resolver that sends every query to `addr` over UDP, retrying over TCP.
    pub fn with_nameserver(addr: SocketAddr) -> Self {
        let group = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
        let config = ResolverConfig::from_parts(None, vec![], group);
        let resolver =
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
                .with_options(ResolverOpts::default())
                .build();

        Self {
            resolver,
            nameserver: Some(addr),
        }
    }

    /// Build from an optional nameserver, as carried by `DnsConfig`.
    pub fn from_nameserver(nameserver: Option<SocketAddr>) -> Self {
        match nameserver {
            Some(addr) => Self::with_nameserver(addr),
            None => Self::new(),
        }
    }

    /// The custom nameserver, if one was configured.
    pub fn nameserver(&self) -> Option<SocketAddr> {
        self.nameserver
    }

    async fn query(&self, name: &str, kind: RecordKind) -> Result<Vec<String>, LookupError> {
        let failed = |e: &dyn fmt::Display| LookupError::dns(name, e.to_string());
        let records = match kind {
            RecordKind::A => self
                .resolver
                .ipv4_lookup(name)
                .await
                .map_err(|e| failed(&e))?
                .iter()
                .map(|ip| ip.to_string())
                .collect(),
            RecordKind::Aaaa => self
                .resolver
                .ipv6_lookup(name)
                .await
                .map_err(|e| failed(&e))?
                .iter()
                .map(|ip| ip.to_string())
                .collect(),
            RecordKind::Cname => self
                .resolver
                .lookup(name, RecordType::CNAME)
                .await
                .map_err(|e| failed(&e))?
                .record_iter()
                .filter_map(|record| record.data().as_cname())
                .map(|cname| host(&cname.0))
                .collect(),
            RecordKind::Mx => self
                .resolver
                .mx_lookup(name)
                .await
                .map_err(|e| failed(&e))?
                .iter()
                .map(|mx| format!("{} {}", mx.preference(), host(mx.exchange())))
                .collect(),
            RecordKind::Ns => self
                .resolver
                .ns_lookup(name)
                .await
                .map_err(|e| failed(&e))?
                .iter()
                .map(|ns| host(&ns.0))
                .collect(),
            RecordKind::Txt => self
                .resolver
                .txt_lookup(name)
                .await
                .map_err(|e| failed(&e))?
                .iter()
                .map(|txt| {
                    txt.iter()
                        .map(|chunk| String::from_utf8_lossy(chunk))
                        .collect::<String>()
                })
                .collect(),
            RecordKind::Ptr => {
                let reverse = ptr_query_name(name).map_err(|e| failed(&e))?;
                self.resolver
                    .lookup(reverse, RecordType::PTR)
                    .await
                    .map_err(|e| failed(&e))?
                    .record_iter()
                    .filter_map(|record| record.data().as_ptr())
                    .map(|ptr| host(&ptr.0))
                    .collect()
            }
            RecordKind::Srv => self
                .resolver
                .srv_lookup(name)
                .await
                .map_err(|e| failed(&e))?
                .iter()
                .map(|srv| {
                    format!(
                        "{} {} {} {}",
                        srv.priority(),
                        srv.weight(),
                        srv.port(),
                        host(srv.target())
                    )
                })
                .collect(),
        };
        Ok(records)
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SystemResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemResolver")
            .field("nameserver", &self.nameserver)
            .finish()
    }
}

#[async_trait]
impl DnsResolver for SystemResolver {
    async fn resolve(
        &self,
        name: &str,
        kind: RecordKind,
        deadline: Instant,
    ) -> Result<Vec<String>, LookupError> {
        let started = Instant::now();
        debug!(name, kind = %kind, nameserver = ?self.nameserver, "resolving");

        let records = match timeout_at(deadline, self.query(name, kind)).await {
            Ok(Ok(records)) => records,
            Ok(Err(err)) => return Err(err),
            Err(_) => {
                return Err(LookupError::timeout(
                    format!("resolving {} records for {}", kind, name),
                    deadline.saturating_duration_since(started),
                ))
            }
        };

        if records.is_empty() {
            return Err(LookupError::dns(name, format!("no {} records found", kind)));
        }
        Ok(records)
    }
}

/// Hostname without the trailing root dot.
fn host(name: &Name) -> String {
    name.to_string().trim_end_matches('.').to_string()
}

/// Reverse-lookup name for a PTR query.
fn ptr_query_name(name: &str) -> Result<Name, ProtoError> {
    match name.parse::<IpAddr>() {
        Ok(ip) => Ok(Name::from(ip)),
        Err(_) => Name::from_ascii(name),
    }
}
