//! WHOIS protocol client.
//!
//! WHOIS (RFC 3912) is one request and one response per TCP connection:
//! the client writes the query terminated by CRLF and the server streams
//! free text until it closes the connection. There is no length field, so
//! the read loop runs until EOF or the deadline.

use crate::error::LookupError;
use crate::protocols::parser::extract_fields;
use crate::protocols::referral::extract_referral;
use crate::protocols::registry::ServerDirectory;
use crate::types::{WhoisConfig, WhoisResult, WhoisServer, DEFAULT_WHOIS_TIMEOUT};
use crate::utils::{deadline_after, normalize_domain};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// WHOIS client with an immutable server directory.
///
/// Cloning is cheap; clones share the directory.
///
/// # Example
///
/// ```rust,no_run
/// use domain_lookup_lib::{WhoisClient, WhoisConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let client = WhoisClient::new(WhoisConfig::default());
///     let result = client.lookup("example.com").await;
///     println!("{:?} via {}", result.fields.registrar, result.server);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct WhoisClient {
    /// Budget for a whole lookup, and the cap on a single connect
    timeout: Duration,
    follow_referral: bool,
    referral_port: u16,
    directory: Arc<ServerDirectory>,
}

impl WhoisClient {
    /// Create a client, merging `config.custom_servers` over the built-in table.
    ///
    /// A zero timeout falls back to the 10 second default.
    pub fn new(config: WhoisConfig) -> Self {
        let directory = ServerDirectory::builder()
            .extend(config.custom_servers.clone())
            .build();
        Self::with_directory(config, Arc::new(directory))
    }

    /// Create a client around an already-built directory.
    ///
    /// `config.custom_servers` is ignored here; the directory is taken as is.
    pub fn with_directory(config: WhoisConfig, directory: Arc<ServerDirectory>) -> Self {
        let timeout = if config.timeout.is_zero() {
            DEFAULT_WHOIS_TIMEOUT
        } else {
            config.timeout
        };

        Self {
            timeout,
            follow_referral: config.follow_referral,
            referral_port: config.referral_port,
            directory,
        }
    }

    /// The server directory used by this client.
    pub fn directory(&self) -> &ServerDirectory {
        &self.directory
    }

    /// The configured lookup timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Look up `domain`, bounded by the client timeout.
    ///
    /// Never fails outright: on failure the returned result carries
    /// `domain`, `timestamp` and `error` and nothing else. Dropping the
    /// future cancels any in-flight connect or read.
    pub async fn lookup(&self, domain: &str) -> WhoisResult {
        self.lookup_until(domain, deadline_after(self.timeout)).await
    }

    /// Look up `domain` with an explicit deadline shared by the primary and
    /// referral queries.
    ///
    /// The lookup process:
    /// 1. Normalize the domain and resolve its server (fails fast on bad input)
    /// 2. Query the server; a failure here fails the lookup
    /// 3. If enabled and a referral is present, query the referred server and
    ///    keep its answer only when it is strictly longer
    /// 4. Extract fields from whichever answer was kept
    pub async fn lookup_until(&self, domain: &str, deadline: Instant) -> WhoisResult {
        let domain = normalize_domain(domain);
        let mut result = WhoisResult::new(domain.clone(), Utc::now());

        let server = match self.directory.resolve(&domain) {
            Ok(server) => server.clone(),
            Err(err) => {
                debug!(domain = %domain, error = %err, "rejected malformed domain");
                result.fail(err);
                return result;
            }
        };

        let mut response = match self.query(&domain, &server, deadline).await {
            Ok(response) => response,
            Err(err) => {
                debug!(domain = %domain, server = %server, error = %err, "primary WHOIS query failed");
                result.fail(err);
                return result;
            }
        };
        let mut retained = server;

        if self.follow_referral {
            if let Some(host) = extract_referral(&response, &self.directory.default_server().host) {
                let referral = WhoisServer::with_port(host, self.referral_port);
                debug!(domain = %domain, referral = %referral, "following WHOIS referral");

                let outcome = self.query(&domain, &referral, deadline).await;
                match outcome {
                    Ok(referred) if referred.len() > response.len() => {
                        response = referred;
                        retained = referral;
                    }
                    Ok(referred) => {
                        debug!(
                            domain = %domain,
                            primary_len = response.len(),
                            referral_len = referred.len(),
                            "referral answer not longer, keeping primary"
                        );
                    }
                    Err(err) => {
                        warn!(domain = %domain, referral = %referral, error = %err, "referral query failed, keeping primary");
                    }
                }
            }
        }

        result.server = retained.to_string();
        result.set_fields(extract_fields(&response));
        result.raw_response = response;
        result
    }

    /// Perform one WHOIS exchange with `server`.
    ///
    /// Connect is bounded by both the client timeout and `deadline`; the
    /// write and read are bounded by `deadline`. No retries.
    pub async fn query(
        &self,
        domain: &str,
        server: &WhoisServer,
        deadline: Instant,
    ) -> Result<String, LookupError> {
        let address = server.address();
        let started = Instant::now();
        let connect_deadline = deadline.min(deadline_after(self.timeout));

        let mut stream = match timeout_at(connect_deadline, TcpStream::connect(&address)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(LookupError::network_with_source(
                    format!("failed to connect to WHOIS server {}", address),
                    e.to_string(),
                ))
            }
            Err(_) => {
                return Err(LookupError::timeout(
                    format!("connecting to WHOIS server {}", address),
                    connect_deadline.saturating_duration_since(started),
                ))
            }
        };

        match timeout_at(deadline, exchange(&mut stream, domain)).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::timeout(
                format!("reading from WHOIS server {}", address),
                deadline.saturating_duration_since(started),
            )),
        }
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new(WhoisConfig::default())
    }
}

/// Write the query and read lines until the server closes the stream.
async fn exchange(stream: &mut TcpStream, domain: &str) -> Result<String, LookupError> {
    stream
        .write_all(format!("{}\r\n", domain).as_bytes())
        .await
        .map_err(|e| LookupError::network_with_source("failed to send WHOIS query", e.to_string()))?;

    let mut reader = BufReader::new(stream);
    let mut response = String::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line).await.map_err(|e| {
            LookupError::network_with_source("error reading WHOIS response", e.to_string())
        })?;
        if read == 0 {
            break;
        }

        // Registries are not consistently UTF-8
        let text = String::from_utf8_lossy(&line);
        response.push_str(text.trim_end_matches(&['\r', '\n'][..]));
        response.push('\n');
    }

    Ok(response)
}
