//! Text-mode display logic for domain-lookup CLI.
//!
//! Results go to stdout; lookup failures go to stderr so scripted callers
//! can tell them apart. Uses only the `console` crate.

use console::{pad_str, style, Alignment};
use domain_lookup_lib::{DnsLookupResult, DomainReport, WhoisResult};

const LABEL_WIDTH: usize = 14;

// ── Sections ─────────────────────────────────────────────────────────────────

fn print_section(title: &str) {
    let rule_len = 50usize.saturating_sub(title.len());
    println!(
        "{} {}",
        style(format!("── {} ", title)).yellow().bold(),
        style("─".repeat(rule_len)).yellow().dim(),
    );
}

fn print_field(label: &str, value: &str) {
    let padded = pad_str(label, LABEL_WIDTH, Alignment::Left, None);
    println!("  {}{}", style(padded).dim(), value);
}

fn print_list(label: &str, values: &[String]) {
    for (i, value) in values.iter().enumerate() {
        print_field(if i == 0 { label } else { "" }, value);
    }
}

// ── DNS ──────────────────────────────────────────────────────────────────────

/// Print one DNS lookup. Failures go to stderr.
pub fn print_dns_result(result: &DnsLookupResult) {
    match &result.error {
        None => {
            for record in &result.records {
                println!(
                    "{}  {}  {}",
                    style(&result.domain).white(),
                    style(result.record_kind).cyan(),
                    record
                );
            }
        }
        Some(err) => {
            eprintln!(
                "{} {} {}: {}",
                style("✗").red().for_stderr(),
                result.domain,
                result.record_kind,
                err
            );
        }
    }
}

fn print_dns_line(result: &DnsLookupResult) {
    let kind = pad_str(&result.record_kind.to_string(), 6, Alignment::Left, None).to_string();
    match &result.error {
        None => println!("  {}{}", style(kind).cyan(), result.records.join(", ")),
        Some(err) => println!("  {}{}", style(kind).cyan(), style(err).dim()),
    }
}

// ── WHOIS ────────────────────────────────────────────────────────────────────

/// Print one WHOIS lookup. Failures go to stderr.
pub fn print_whois_result(result: &WhoisResult, raw: bool) {
    if let Some(err) = &result.error {
        eprintln!("{} {}: {}", style("✗").red().for_stderr(), result.domain, err);
        return;
    }

    print_section(&format!("WHOIS {}", result.domain));
    print_whois_fields(result);

    if raw {
        println!();
        print_section("Raw response");
        print!("{}", result.raw_response);
    }
}

fn print_whois_fields(result: &WhoisResult) {
    let fields = &result.fields;
    let dash = || "-".to_string();

    print_field("Server", &result.server);
    print_field("Registrar", &fields.registrar.clone().unwrap_or_else(dash));
    print_field("Created", &fields.created_date.clone().unwrap_or_else(dash));
    print_field("Expires", &fields.expiry_date.clone().unwrap_or_else(dash));
    print_field("Updated", &fields.updated_date.clone().unwrap_or_else(dash));
    print_list("Name servers", &fields.name_servers);
    print_list("Status", &fields.status);
    print_list("Emails", &fields.emails);

    if fields.is_empty() {
        println!(
            "  {}",
            style("No recognised fields; use --raw to see the response").dim()
        );
    }
}

// ── Combined report ──────────────────────────────────────────────────────────

/// Print a merged DNS and WHOIS report, including any partial-failure note.
pub fn print_report(report: &DomainReport, raw: bool) {
    print_section(&format!("DNS {}", report.domain));
    for result in report.dns.values() {
        print_dns_line(result);
    }
    println!();

    match &report.whois.error {
        None => {
            print_section(&format!("WHOIS {}", report.whois.domain));
            print_whois_fields(&report.whois);
            if raw {
                println!();
                print_section("Raw response");
                print!("{}", report.whois.raw_response);
            }
        }
        Some(err) => {
            print_section(&format!("WHOIS {}", report.whois.domain));
            println!("  {}", style(err).red());
        }
    }

    if let Some(note) = &report.error {
        println!();
        println!("{} {}", style("Note:").yellow().bold(), note);
    }
}
