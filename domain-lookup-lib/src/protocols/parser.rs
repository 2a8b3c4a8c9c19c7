//! Heuristic field extraction from free-form WHOIS responses.
//!
//! Registries do not share a grammar, so extraction is a table of label
//! rules evaluated against every line. Supporting a new registry format
//! means adding labels to [`FIELD_RULES`], not new control flow.

use crate::types::WhoisFields;
use crate::utils::is_valid_email;
use std::collections::HashSet;

/// Field a rule populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Registrar,
    CreatedDate,
    ExpiryDate,
    UpdatedDate,
    NameServer,
    Status,
}

/// A set of lowercase labels that feed one field.
struct FieldRule {
    labels: &'static [&'static str],
    field: Field,
}

/// Label rules, matched case-insensitively anywhere in the line.
const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        labels: &["registrar:", "registrar name:"],
        field: Field::Registrar,
    },
    FieldRule {
        labels: &["creation date:", "created:", "registered:"],
        field: Field::CreatedDate,
    },
    FieldRule {
        labels: &["expiry date:", "expiration date:", "expires:"],
        field: Field::ExpiryDate,
    },
    FieldRule {
        labels: &["updated date:", "last updated:", "modified:"],
        field: Field::UpdatedDate,
    },
    FieldRule {
        labels: &["name server:", "nserver:", "nameserver:"],
        field: Field::NameServer,
    },
    FieldRule {
        labels: &["status:", "domain status:"],
        field: Field::Status,
    },
];

/// Punctuation stripped from both ends of an email candidate.
const EMAIL_TRIM: &[char] = &[',', ':', ';', '(', ')', '<', '>', '[', ']'];

/// Accumulates fields while keeping the de-duplication sets alongside.
#[derive(Default)]
struct Extraction {
    fields: WhoisFields,
    seen_name_servers: HashSet<String>,
    seen_emails: HashSet<String>,
}

impl Extraction {
    fn apply(&mut self, field: Field, value: &str) {
        match field {
            Field::Registrar => set_once(&mut self.fields.registrar, value),
            Field::CreatedDate => set_once(&mut self.fields.created_date, value),
            Field::ExpiryDate => set_once(&mut self.fields.expiry_date, value),
            Field::UpdatedDate => set_once(&mut self.fields.updated_date, value),
            Field::NameServer => {
                // Registries sometimes append glue addresses after the host
                let host = value
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_lowercase();
                if !host.is_empty() && self.seen_name_servers.insert(host.clone()) {
                    self.fields.name_servers.push(host);
                }
            }
            Field::Status => {
                if !value.is_empty() {
                    self.fields.status.push(value.to_string());
                }
            }
        }
    }

    fn scan_emails(&mut self, line: &str) {
        for word in line.split_whitespace() {
            let candidate = word.trim_matches(EMAIL_TRIM);
            if !candidate.contains('@') || !candidate.contains('.') {
                continue;
            }
            if is_valid_email(candidate) && self.seen_emails.insert(candidate.to_string()) {
                self.fields.emails.push(candidate.to_string());
            }
        }
    }
}

/// First match wins for scalar fields.
fn set_once(slot: &mut Option<String>, value: &str) {
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

/// Value after the first colon, trimmed.
fn value_after_colon(line: &str) -> Option<&str> {
    line.split_once(':').map(|(_, value)| value.trim())
}

/// Extract structured fields from a WHOIS response.
///
/// Blank lines and comment lines (starting with `%` or `#`) are skipped.
/// This never fails: unrecognised text simply leaves fields empty.
///
/// # Examples
///
/// ```rust
/// use domain_lookup_lib::extract_fields;
///
/// let fields = extract_fields("Registrar: Example Registrar, Inc.\nName Server: NS1.EXAMPLE.COM\n");
/// assert_eq!(fields.registrar.as_deref(), Some("Example Registrar, Inc."));
/// assert_eq!(fields.name_servers, vec!["ns1.example.com"]);
/// ```
pub fn extract_fields(response: &str) -> WhoisFields {
    let mut extraction = Extraction::default();

    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') || line.starts_with('#') {
            continue;
        }

        let lower = line.to_lowercase();
        for rule in FIELD_RULES {
            if !rule.labels.iter().any(|label| lower.contains(label)) {
                continue;
            }
            if let Some(value) = value_after_colon(line) {
                extraction.apply(rule.field, value);
            }
        }

        if line.contains('@') {
            extraction.scan_emails(line);
        }
    }

    extraction.fields
}
