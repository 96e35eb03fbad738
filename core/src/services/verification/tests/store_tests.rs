//! Unit tests for the code store

use std::sync::Arc;
use std::time::Duration;

use super::mocks::test_clock;
use crate::domain::entities::Channel;
use crate::errors::CodeError;
use crate::services::verification::{Clock, CodeStore, ManualClock};

const TTL: Duration = Duration::from_secs(600);

fn store_with_clock() -> (CodeStore, ManualClock) {
    let clock = test_clock();
    (CodeStore::new(Arc::new(clock.clone())), clock)
}

#[test]
fn test_consume_outcomes() {
    let (store, clock) = store_with_clock();

    assert_eq!(store.consume("+15551234567", "123456"), Err(CodeError::NotFound));

    let expires_at = store.put("+15551234567", "123456", Channel::Sms, TTL);
    assert_eq!(expires_at, clock.now() + chrono::Duration::seconds(600));

    assert_eq!(store.consume("+15551234567", "654321"), Err(CodeError::Mismatch));
    assert_eq!(store.len(), 1);

    assert_eq!(store.consume("+15551234567", "123456"), Ok(()));
    assert!(store.is_empty());
    assert_eq!(store.consume("+15551234567", "123456"), Err(CodeError::NotFound));
}

#[test]
fn test_expired_record_is_removed_on_consume() {
    let (store, clock) = store_with_clock();
    store.put("jane@example.com", "123456", Channel::Email, TTL);

    clock.advance(TTL);
    assert_eq!(store.len(), 1);
    assert_eq!(store.consume("jane@example.com", "123456"), Err(CodeError::Expired));
    assert_eq!(store.len(), 0);
    assert_eq!(store.consume("jane@example.com", "123456"), Err(CodeError::NotFound));
}

#[test]
fn test_expired_record_with_wrong_code_reports_expired() {
    let (store, clock) = store_with_clock();
    store.put("+15551234567", "123456", Channel::Sms, TTL);

    clock.advance(TTL + Duration::from_secs(1));
    assert_eq!(store.consume("+15551234567", "000000"), Err(CodeError::Expired));
}

#[test]
fn test_put_overwrites_previous_code() {
    let (store, _clock) = store_with_clock();
    store.put("+15551234567", "111111", Channel::Sms, TTL);
    store.put("+15551234567", "222222", Channel::Sms, TTL);

    assert_eq!(store.len(), 1);
    assert_eq!(store.consume("+15551234567", "111111"), Err(CodeError::Mismatch));
    assert_eq!(store.consume("+15551234567", "222222"), Ok(()));
}

#[test]
fn test_sweep_removes_only_expired() {
    let (store, clock) = store_with_clock();
    store.put("a@example.com", "111111", Channel::Email, Duration::from_secs(60));
    store.put("b@example.com", "222222", Channel::Email, Duration::from_secs(120));
    store.put("c@example.com", "333333", Channel::Email, Duration::from_secs(600));

    clock.advance(Duration::from_secs(60));
    assert_eq!(store.sweep_expired(), 1);

    clock.advance(Duration::from_secs(100));
    assert_eq!(store.sweep_expired(), 1);
    assert_eq!(store.len(), 1);
    assert_eq!(store.consume("c@example.com", "333333"), Ok(()));
    assert_eq!(store.sweep_expired(), 0);
}

#[test]
fn test_expires_in_and_invalidate() {
    let (store, clock) = store_with_clock();
    store.put("+15551234567", "123456", Channel::Sms, TTL);

    clock.advance(Duration::from_secs(100));
    assert_eq!(store.expires_in("+15551234567"), Some(Duration::from_secs(500)));
    assert_eq!(store.expires_in("+15550000000"), None);

    assert!(store.invalidate("+15551234567"));
    assert!(!store.invalidate("+15551234567"));
    assert_eq!(store.expires_in("+15551234567"), None);
}

#[test]
fn test_concurrent_consume_succeeds_once() {
    let (store, _clock) = store_with_clock();
    let store = Arc::new(store);
    store.put("+15551234567", "123456", Channel::Sms, TTL);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || store.consume("+15551234567", "123456"))
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = outcomes.iter().filter(|o| o.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(outcomes
        .iter()
        .filter(|o| o.is_err())
        .all(|o| *o == Err(CodeError::NotFound)));
}
