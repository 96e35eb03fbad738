//! Unit tests for the verification record and channel entities

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::{Channel, VerificationRecord, CODE_LENGTH};

fn record_issued_at_epoch(ttl_seconds: i64) -> VerificationRecord {
    let issued_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    VerificationRecord::new(
        "+15551234567",
        "042917",
        Channel::Sms,
        issued_at,
        issued_at + Duration::seconds(ttl_seconds),
    )
}

#[test]
fn test_expiry_boundary_is_inclusive() {
    let record = record_issued_at_epoch(600);

    assert!(!record.is_expired_at(record.issued_at + Duration::seconds(599)));
    assert!(record.is_expired_at(record.expires_at));
    assert!(record.is_expired_at(record.issued_at + Duration::seconds(601)));
}

#[test]
fn test_matches_exact_code_only() {
    let record = record_issued_at_epoch(600);

    assert_eq!(record.code.len(), CODE_LENGTH);
    assert!(record.matches("042917"));
    assert!(!record.matches("042918"));
    assert!(!record.matches("42917"));
    assert!(!record.matches(""));
}

#[test]
fn test_remaining_time() {
    let record = record_issued_at_epoch(600);

    let remaining = record
        .remaining_at(record.issued_at + Duration::seconds(200))
        .unwrap();
    assert_eq!(remaining.as_secs(), 400);
    assert!(record.remaining_at(record.expires_at).is_none());
}

#[test]
fn test_debug_output_redacts_code() {
    let record = record_issued_at_epoch(600);
    let rendered = format!("{:?}", record);

    assert!(!rendered.contains("042917"));
    assert!(rendered.contains("******"));
    assert!(rendered.contains("+15551234567"));
}

#[test]
fn test_channel_parsing_and_serde() {
    assert_eq!("SMS".parse::<Channel>().unwrap(), Channel::Sms);
    assert_eq!(" email ".parse::<Channel>().unwrap(), Channel::Email);
    assert!("fax".parse::<Channel>().is_err());

    assert_eq!(serde_json::to_string(&Channel::Email).unwrap(), "\"email\"");
    let parsed: Channel = serde_json::from_str("\"sms\"").unwrap();
    assert_eq!(parsed, Channel::Sms);
    assert_eq!(Channel::Sms.to_string(), "sms");
}
