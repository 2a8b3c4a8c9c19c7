//! Domain Lookup CLI Application
//!
//! A command-line interface for WHOIS and DNS lookups.
//! This CLI application provides a user-friendly interface to the domain-lookup-lib library.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_lookup_lib::config::{parse_nameserver, parse_server_override};
use domain_lookup_lib::{load_env_config, ConfigManager, EnvConfig, FileConfig};
use domain_lookup_lib::{normalize_domain, DnsConfig, DomainLookup, RecordKind, WhoisConfig};
use std::process;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-lookup
#[derive(Parser, Debug)]
#[command(name = "domain-lookup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Look up WHOIS registration data and DNS records for a domain")]
#[command(
    long_about = "Look up WHOIS registration data and DNS records for a domain.\n\nWHOIS queries go to the authoritative server for the TLD and follow registrar referrals. DNS lookups use the system resolver configuration unless --resolver names a nameserver."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domain name to look up
    #[arg(value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// DNS record type (A, AAAA, CNAME, MX, NS, TXT, PTR, SRV)
    #[arg(
        short = 't',
        long = "type",
        value_name = "KIND",
        default_value = "A",
        help_heading = "Lookup Mode"
    )]
    pub record_type: String,

    /// Perform a WHOIS lookup instead of DNS
    #[arg(short = 'w', long = "whois", help_heading = "Lookup Mode")]
    pub whois: bool,

    /// Perform DNS (all common kinds) and WHOIS lookups together
    #[arg(short = 'a', long = "all", help_heading = "Lookup Mode")]
    pub all: bool,

    /// Look up SRV records of _SERVICE._PROTO.NAME (no DOMAIN needed)
    #[arg(long = "srv", value_name = "SERVICE,PROTO,NAME", help_heading = "Lookup Mode")]
    pub srv: Option<String>,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Print the raw WHOIS response after the extracted fields
    #[arg(short = 'r', long = "raw", help_heading = "Output Format")]
    pub raw: bool,

    /// Lookup timeout in seconds
    #[arg(long = "timeout", value_name = "SECS", help_heading = "WHOIS")]
    pub timeout: Option<u64>,

    /// Do not follow WHOIS referrals
    #[arg(long = "no-follow", help_heading = "WHOIS")]
    pub no_follow: bool,

    /// Override the WHOIS server for a TLD (repeatable)
    #[arg(
        long = "server",
        value_name = "TLD=HOST[:PORT]",
        action = clap::ArgAction::Append,
        help_heading = "WHOIS"
    )]
    pub servers: Vec<String>,

    /// DNS nameserver to query instead of the system configuration
    #[arg(long = "resolver", value_name = "IP[:PORT]", help_heading = "DNS")]
    pub resolver: Option<String>,

    /// Use a specific configuration file
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show debug logs on stderr
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    match run_lookup(args).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Install the stderr log subscriber; `RUST_LOG` wins unless `--verbose`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if let Some(query) = &args.srv {
        parse_srv_query(query)?;
        if args.whois || args.all {
            return Err("Cannot combine --srv with --whois or --all".to_string());
        }
    } else {
        match &args.domain {
            Some(domain) if !domain.trim().is_empty() => {}
            _ => return Err("You must specify a domain name to look up".to_string()),
        }
    }

    if args.whois && args.all {
        return Err("Cannot specify both --whois and --all".to_string());
    }

    args.record_type
        .parse::<RecordKind>()
        .map_err(|e| e.to_string())?;

    if args.timeout == Some(0) {
        return Err("Timeout must be at least 1 second".to_string());
    }

    for server in &args.servers {
        parse_server_override(server).map_err(|e| e.to_string())?;
    }

    if let Some(resolver) = &args.resolver {
        parse_nameserver(resolver).map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Split a `service,proto,name` SRV query.
fn parse_srv_query(query: &str) -> Result<(String, String, String), String> {
    let parts: Vec<&str> = query.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [service, proto, name]
            if !service.is_empty() && !proto.is_empty() && !name.is_empty() =>
        {
            Ok((service.to_string(), proto.to_string(), normalize_domain(name)))
        }
        _ => Err("SRV format must be: service,proto,name".to_string()),
    }
}

/// Run the selected lookup mode. Returns whether the lookup succeeded.
async fn run_lookup(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let domain = normalize_domain(args.domain.as_deref().unwrap_or_default());
    let (dns_config, whois_config) = build_config(&args)?;
    let lookup = DomainLookup::with_config(dns_config, whois_config);

    if let Some(query) = &args.srv {
        let (service, proto, name) = parse_srv_query(query)?;
        let result = lookup.srv_lookup(&service, &proto, &name).await;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            ui::print_dns_result(&result);
        }
        return Ok(result.is_ok());
    }

    if args.all {
        let report = lookup.lookup_all(&domain).await;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            ui::print_report(&report, args.raw);
        }
        // Partial failures are part of the report
        return Ok(true);
    }

    if args.whois {
        let result = lookup.whois_lookup(&domain).await;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            ui::print_whois_result(&result, args.raw);
        }
        return Ok(result.is_ok());
    }

    let kind: RecordKind = args.record_type.parse()?;
    let result = lookup.dns_lookup(&domain, kind).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        ui::print_dns_result(&result);
    }
    Ok(result.is_ok())
}

/// Build lookup configuration: CLI > environment > config files > defaults.
fn build_config(args: &Args) -> Result<(DnsConfig, WhoisConfig), Box<dyn std::error::Error>> {
    let env_config = load_env_config();
    let file_config = load_file_config(args, &env_config)?;

    let dns_config = env_config.apply_dns(file_config.to_dns_config());
    let whois_config = env_config.apply(file_config.to_whois_config());

    Ok(apply_cli_args_to_config(dns_config, whois_config, args)?)
}

/// Load the explicit config file (`--config`, then `DL_CONFIG`) or discover one.
fn load_file_config(
    args: &Args,
    env_config: &EnvConfig,
) -> Result<FileConfig, Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new();

    let explicit = args.config.as_ref().or(env_config.config.as_ref());
    if let Some(path) = explicit {
        debug!(path = %path, "using explicit config file");
        let file_config = config_manager
            .load_file(path)
            .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?;
        return Ok(file_config);
    }

    match config_manager.discover_and_load() {
        Ok(file_config) => Ok(file_config),
        Err(e) => {
            warn!(error = %e, "ignoring invalid config file");
            Ok(FileConfig::default())
        }
    }
}

/// Apply CLI flags over the file and environment configuration.
fn apply_cli_args_to_config(
    mut dns_config: DnsConfig,
    mut whois_config: WhoisConfig,
    args: &Args,
) -> Result<(DnsConfig, WhoisConfig), String> {
    if let Some(secs) = args.timeout {
        let timeout = Duration::from_secs(secs);
        whois_config.timeout = timeout;
        dns_config.timeout = timeout;
    }

    if args.no_follow {
        whois_config.follow_referral = false;
    }

    if let Some(resolver) = &args.resolver {
        let nameserver = parse_nameserver(resolver).map_err(|e| e.to_string())?;
        dns_config = dns_config.with_nameserver(nameserver);
    }

    for server in &args.servers {
        let (tld, server) = parse_server_override(server).map_err(|e| e.to_string())?;
        whois_config = whois_config.with_server(tld, server);
    }

    Ok((dns_config, whois_config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_lookup_lib::WhoisServer;

    fn create_test_args() -> Args {
        Args {
            domain: Some("example.com".to_string()),
            record_type: "A".to_string(),
            whois: false,
            all: false,
            srv: None,
            json: false,
            raw: false,
            timeout: None,
            no_follow: false,
            servers: vec![],
            resolver: None,
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn test_validate_args_default_is_valid() {
        assert!(validate_args(&create_test_args()).is_ok());
    }

    #[test]
    fn test_validate_args_requires_domain() {
        let mut args = create_test_args();
        args.domain = None;
        assert!(validate_args(&args).is_err());

        args.domain = Some("   ".to_string());
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_conflicting_modes() {
        let mut args = create_test_args();
        args.whois = true;
        args.all = true;
        let err = validate_args(&args).unwrap_err();
        assert!(err.contains("--whois and --all"));
    }

    #[test]
    fn test_validate_args_record_type() {
        let mut args = create_test_args();
        args.record_type = "mx".to_string();
        assert!(validate_args(&args).is_ok());

        args.record_type = "BOGUS".to_string();
        assert!(validate_args(&args).unwrap_err().contains("BOGUS"));
    }

    #[test]
    fn test_validate_args_zero_timeout_rejected() {
        let mut args = create_test_args();
        args.timeout = Some(0);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_bad_server_override() {
        let mut args = create_test_args();
        args.servers = vec!["com".to_string()];
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_cli_args_override_config() {
        let mut args = create_test_args();
        args.timeout = Some(3);
        args.no_follow = true;
        args.servers = vec!["test=127.0.0.1:4343".to_string()];

        let whois = WhoisConfig::default().with_server("test", WhoisServer::new("whois.old.example"));
        let (dns, whois) = apply_cli_args_to_config(DnsConfig::default(), whois, &args).unwrap();

        assert_eq!(dns.timeout, Duration::from_secs(3));
        assert_eq!(whois.timeout, Duration::from_secs(3));
        assert!(!whois.follow_referral);
        assert_eq!(
            whois.custom_servers["test"],
            WhoisServer::with_port("127.0.0.1", 4343)
        );
    }

    #[test]
    fn test_cli_args_leave_config_alone_when_unset() {
        let args = create_test_args();
        let whois = WhoisConfig::default().with_timeout(Duration::from_secs(7));
        let (dns, whois) = apply_cli_args_to_config(DnsConfig::default(), whois, &args).unwrap();

        assert_eq!(dns.timeout, Duration::from_secs(5));
        assert_eq!(whois.timeout, Duration::from_secs(7));
        assert!(whois.follow_referral);
    }

    #[test]
    fn test_parse_srv_query() {
        assert_eq!(
            parse_srv_query("xmpp, tcp, Example.COM").unwrap(),
            ("xmpp".to_string(), "tcp".to_string(), "example.com".to_string())
        );
        assert!(parse_srv_query("xmpp,tcp").is_err());
        assert!(parse_srv_query("xmpp,,example.com").is_err());
        assert!(parse_srv_query("a,b,c,d").is_err());
    }

    #[test]
    fn test_validate_args_srv_mode() {
        let mut args = create_test_args();
        args.domain = None;
        args.srv = Some("sip,udp,example.com".to_string());
        assert!(validate_args(&args).is_ok());

        args.whois = true;
        assert!(validate_args(&args).unwrap_err().contains("--srv"));

        args.whois = false;
        args.srv = Some("sip".to_string());
        assert!(validate_args(&args).unwrap_err().contains("service,proto,name"));
    }

    #[test]
    fn test_resolver_flag() {
        let mut args = create_test_args();
        args.resolver = Some("not-an-address".to_string());
        assert!(validate_args(&args).is_err());

        args.resolver = Some("8.8.8.8".to_string());
        assert!(validate_args(&args).is_ok());
        let (dns, _) =
            apply_cli_args_to_config(DnsConfig::default(), WhoisConfig::default(), &args).unwrap();
        assert_eq!(dns.nameserver, Some("8.8.8.8:53".parse().unwrap()));
    }
}
