//! Email address utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Pragmatic address check: one `@`, no whitespace, a dotted domain
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Maximum length of an address per RFC 5321
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Trim and lower-case an email address so that one mailbox maps to one key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check if an email address is syntactically valid
pub fn is_valid_email(email: &str) -> bool {
    let normalized = normalize_email(email);
    normalized.len() <= MAX_EMAIL_LENGTH && EMAIL_REGEX.is_match(&normalized)
}

/// Mask an email address for logs (e.g. `j***@example.com`)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("jane.doe+alerts@mail.example.co.uk"));
        assert!(is_valid_email(" Jane@Example.com "));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email("jane@@example.com"));
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("jane@example.com"), "j***@example.com");
        assert_eq!(mask_email("@example.com"), "***");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
