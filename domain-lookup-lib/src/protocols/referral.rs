//! Referral detection in WHOIS responses.
//!
//! Thin registries answer with a pointer to the registrar's own WHOIS
//! server. This module finds that pointer; the client decides whether to
//! follow it and whether the referred answer replaces the primary one.

/// Line prefixes that introduce a referral, lowercase.
const REFERRAL_LABELS: &[&str] = &[
    "whois server:",
    "registrar whois server:",
    "referral url:",
    "refer:",
];

/// Scheme prefixes stripped from a referral value.
const REFERRAL_SCHEMES: &[&str] = &["whois://", "http://", "https://"];

/// Find the first referral server named in `response`.
///
/// A referral equal to `root_host` (the directory's fallback server) is
/// ignored because following it would re-query the root.
///
/// ```text
/// Registrar WHOIS Server: whois.markmonitor.com
/// refer:        whois.verisign-grs.com
/// Referral URL: whois://whois.example.com
/// ```
pub fn extract_referral(response: &str, root_host: &str) -> Option<String> {
    for line in response.lines() {
        let line = line.trim();
        let lower = line.to_lowercase();

        if !REFERRAL_LABELS.iter().any(|label| lower.starts_with(label)) {
            continue;
        }

        let Some((_, value)) = line.split_once(':') else {
            continue;
        };

        let mut server = value.trim();
        for scheme in REFERRAL_SCHEMES {
            if let Some(rest) = server.strip_prefix(scheme) {
                server = rest;
                break;
            }
        }
        let server = server.trim();

        if !server.is_empty() && !server.eq_ignore_ascii_case(root_host) {
            return Some(server.to_string());
        }
    }

    None
}
