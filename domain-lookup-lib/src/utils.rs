//! Utility functions for domain normalization and validation.

use crate::error::LookupError;
use std::time::Duration;
use tokio::time::Instant;

/// Roughly thirty years, the same horizon tokio uses for "never".
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Normalize user input into the form used for lookups.
///
/// Trims, lowercases, then strips one leading `http://`/`https://` scheme and
/// one leading `www.` label. No IDNA conversion is performed.
///
/// # Examples
///
/// ```rust
/// use domain_lookup_lib::normalize_domain;
///
/// assert_eq!(normalize_domain("  https://WWW.Example.COM "), "example.com");
/// ```
pub fn normalize_domain(input: &str) -> String {
    let domain = input.trim().to_lowercase();
    let domain = domain
        .strip_prefix("http://")
        .or_else(|| domain.strip_prefix("https://"))
        .unwrap_or(domain.as_str());
    let domain = domain.strip_prefix("www.").unwrap_or(domain);
    domain.to_string()
}

/// Split a domain into labels, failing when it has fewer than two.
pub fn domain_labels(domain: &str) -> Result<Vec<&str>, LookupError> {
    let labels: Vec<&str> = domain.split('.').collect();

    if labels.len() < 2 {
        return Err(LookupError::invalid_domain(
            domain,
            "Domain must contain at least one dot",
        ));
    }

    Ok(labels)
}

/// Minimal email sanity check used by the field extractor.
///
/// Accepts 3 to 254 characters with exactly one `@`, non-empty local and
/// domain parts, and at least one `.` in the domain part.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 254 {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty() && !domain.is_empty() && domain.contains('.')
}

/// Deadline `timeout` from now, saturating to a far-future instant.
pub(crate) fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout.min(FAR_FUTURE)).unwrap_or(now)
}
