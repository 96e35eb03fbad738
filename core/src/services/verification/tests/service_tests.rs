//! Unit tests for the verification service

use std::sync::Arc;
use std::time::Duration;

use super::mocks::{build_service, test_clock, MockNotificationChannel};
use crate::domain::entities::Channel;
use crate::errors::{CodeError, IssueError, SendError};
use crate::services::verification::{Clock, VerificationService, VerificationServiceConfig};

const PHONE: &str = "+15551234567";
const EMAIL: &str = "jane@example.com";

#[tokio::test]
async fn test_issue_then_verify_consumes_code() {
    let notifier = Arc::new(MockNotificationChannel::new(false));
    let service = VerificationService::new(notifier.clone(), VerificationServiceConfig::default());

    let receipt = service.issue(PHONE, PHONE, Channel::Sms).await.unwrap();
    assert_eq!(receipt.channel, Channel::Sms);
    assert!(receipt.message_id.starts_with("mock-msg-"));

    let code = notifier.get_sent_code(PHONE).unwrap();
    assert_eq!(code.len(), 6);

    assert_eq!(service.verify(PHONE, &code).await, Ok(()));
    assert_eq!(service.verify(PHONE, &code).await, Err(CodeError::NotFound));
    assert_eq!(service.active_codes(), 0);
}

#[tokio::test]
async fn test_mismatch_keeps_code_usable() {
    let clock = test_clock();
    let notifier = Arc::new(MockNotificationChannel::new(false));
    let service = build_service(notifier, VerificationServiceConfig::default(), &clock, &["482913"]);

    service.issue(PHONE, PHONE, Channel::Sms).await.unwrap();

    assert_eq!(service.verify(PHONE, "000000").await, Err(CodeError::Mismatch));
    assert_eq!(service.verify(PHONE, "48291").await, Err(CodeError::Mismatch));
    assert_eq!(service.verify(PHONE, "abcdef").await, Err(CodeError::Mismatch));
    assert_eq!(service.verify(PHONE, "482913").await, Ok(()));
}

#[tokio::test]
async fn test_expiry_boundary() {
    let clock = test_clock();
    let notifier = Arc::new(MockNotificationChannel::new(false));
    let service = build_service(
        notifier,
        VerificationServiceConfig::default(),
        &clock,
        &["111111", "222222"],
    );

    service.issue(PHONE, PHONE, Channel::Sms).await.unwrap();
    clock.advance(Duration::from_secs(599));
    assert_eq!(service.verify(PHONE, "111111").await, Ok(()));

    service.issue(EMAIL, EMAIL, Channel::Email).await.unwrap();
    clock.advance(Duration::from_secs(601));
    assert_eq!(service.verify(EMAIL, "222222").await, Err(CodeError::Expired));
    assert_eq!(service.verify(EMAIL, "222222").await, Err(CodeError::NotFound));
}

#[tokio::test]
async fn test_reissue_replaces_previous_code() {
    let clock = test_clock();
    let notifier = Arc::new(MockNotificationChannel::new(false));
    let service = build_service(
        notifier,
        VerificationServiceConfig::default(),
        &clock,
        &["111111", "222222"],
    );

    service.issue(PHONE, PHONE, Channel::Sms).await.unwrap();
    clock.advance(Duration::from_secs(61));
    service.issue(PHONE, PHONE, Channel::Sms).await.unwrap();

    assert_eq!(service.verify(PHONE, "111111").await, Err(CodeError::Mismatch));
    assert_eq!(service.verify(PHONE, "222222").await, Ok(()));
}

#[tokio::test]
async fn test_resend_inside_cooldown_is_throttled() {
    let clock = test_clock();
    let notifier = Arc::new(MockNotificationChannel::new(false));
    let service = build_service(
        notifier.clone(),
        VerificationServiceConfig::default(),
        &clock,
        &["111111", "222222"],
    );

    service.issue(PHONE, PHONE, Channel::Sms).await.unwrap();
    clock.advance(Duration::from_secs(45));

    let err = service.issue(PHONE, PHONE, Channel::Sms).await.unwrap_err();
    assert_eq!(
        err,
        IssueError::Throttled {
            retry_after: Duration::from_secs(15)
        }
    );
    // The first code is untouched by the rejected request
    assert_eq!(notifier.sends(), 1);
    assert_eq!(service.verify(PHONE, "111111").await, Ok(()));

    clock.advance(Duration::from_secs(15));
    assert!(service.issue(PHONE, PHONE, Channel::Sms).await.is_ok());
}

#[tokio::test]
async fn test_cooldown_is_per_identifier() {
    let notifier = Arc::new(MockNotificationChannel::new(false));
    let service = VerificationService::new(notifier, VerificationServiceConfig::default());

    assert!(service.issue(PHONE, PHONE, Channel::Sms).await.is_ok());
    assert!(service.issue(EMAIL, EMAIL, Channel::Email).await.is_ok());
    assert_eq!(service.active_codes(), 2);
}

#[tokio::test]
async fn test_send_failure_keeps_record_and_allows_resend() {
    let clock = test_clock();
    let notifier = Arc::new(MockNotificationChannel::new(true));
    let service = build_service(
        notifier.clone(),
        VerificationServiceConfig::default(),
        &clock,
        &["111111", "222222"],
    );

    let err = service.issue(PHONE, PHONE, Channel::Sms).await.unwrap_err();
    assert!(matches!(err, IssueError::Delivery(SendError::Transport { .. })));
    assert_eq!(service.active_codes(), 1);

    // Not throttled: the failed dispatch cancelled its reservation
    let err = service.issue(PHONE, PHONE, Channel::Sms).await.unwrap_err();
    assert!(matches!(err, IssueError::Delivery(_)));
    assert_eq!(notifier.sends(), 2);

    // The undelivered code is still the live one
    assert_eq!(service.verify(PHONE, "222222").await, Ok(()));
}

#[tokio::test(start_paused = true)]
async fn test_slow_failure_keeps_newer_cooldown() {
    let clock = test_clock();
    let notifier = Arc::new(MockNotificationChannel::first_send_fails_after(
        Duration::from_secs(5),
    ));
    let config = VerificationServiceConfig::default()
        .with_resend_cooldown(Duration::from_secs(3))
        .with_dispatch_timeout(Duration::from_secs(10));
    let service = build_service(notifier.clone(), config, &clock, &["111111", "222222"]);

    let (first, second) = tokio::join!(service.issue(PHONE, PHONE, Channel::Sms), async {
        tokio::time::sleep(Duration::from_secs(4)).await;
        clock.advance(Duration::from_secs(4));
        let second = service.issue(PHONE, PHONE, Channel::Sms).await;
        clock.advance(Duration::from_millis(500));
        second
    });

    // The first dispatch fails only after the second one was granted and sent
    assert!(matches!(first, Err(IssueError::Delivery(SendError::Transport { .. }))));
    assert!(second.is_ok());
    assert_eq!(notifier.sends(), 2);

    let err = service.issue(PHONE, PHONE, Channel::Sms).await.unwrap_err();
    assert_eq!(
        err,
        IssueError::Throttled {
            retry_after: Duration::from_secs(3)
        }
    );
    assert_eq!(service.verify(PHONE, "222222").await, Ok(()));
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_timeout() {
    let notifier = Arc::new(MockNotificationChannel::slow(Duration::from_secs(30)));
    let config = VerificationServiceConfig::default().with_dispatch_timeout(Duration::from_secs(2));
    let service = VerificationService::new(notifier, config);

    let err = service.issue(PHONE, PHONE, Channel::Sms).await.unwrap_err();
    assert_eq!(
        err,
        IssueError::Delivery(SendError::Timeout {
            after: Duration::from_secs(2)
        })
    );
    assert_eq!(service.active_codes(), 1);
}

#[tokio::test]
async fn test_unsupported_channel_stores_nothing() {
    let notifier = Arc::new(MockNotificationChannel::sms_only());
    let service = VerificationService::new(notifier.clone(), VerificationServiceConfig::default());

    let err = service.issue(EMAIL, EMAIL, Channel::Email).await.unwrap_err();
    assert_eq!(
        err,
        IssueError::Delivery(SendError::ChannelUnavailable {
            channel: Channel::Email
        })
    );
    assert_eq!(service.active_codes(), 0);
    assert_eq!(notifier.sends(), 0);
}

#[tokio::test]
async fn test_receipt_never_carries_code() {
    let clock = test_clock();
    let notifier = Arc::new(MockNotificationChannel::new(false));
    let service = build_service(notifier, VerificationServiceConfig::default(), &clock, &["730519"]);

    let receipt = service.issue(PHONE, PHONE, Channel::Sms).await.unwrap();
    let rendered = serde_json::to_string(&receipt).unwrap();
    assert!(!rendered.contains("730519"));
    assert!(!format!("{:?}", receipt).contains("730519"));

    assert_eq!(receipt.expires_at, clock.now() + chrono::Duration::seconds(600));
    assert_eq!(receipt.next_resend_at, clock.now() + chrono::Duration::seconds(60));
}

#[tokio::test]
async fn test_channel_specific_ttl() {
    let clock = test_clock();
    let notifier = Arc::new(MockNotificationChannel::new(false));
    let config = VerificationServiceConfig {
        email_code_ttl: Duration::from_secs(900),
        ..Default::default()
    };
    let service = build_service(notifier, config, &clock, &["111111"]);

    service.issue(PHONE, PHONE, Channel::Sms).await.unwrap();
    service.issue(EMAIL, EMAIL, Channel::Email).await.unwrap();

    assert_eq!(service.expires_in(PHONE), Some(Duration::from_secs(600)));
    assert_eq!(service.expires_in(EMAIL), Some(Duration::from_secs(900)));

    clock.advance(Duration::from_secs(700));
    assert_eq!(service.verify(PHONE, "111111").await, Err(CodeError::Expired));
    assert_eq!(service.verify(EMAIL, "111111").await, Ok(()));
}

#[tokio::test]
async fn test_invalidate_clears_code_and_cooldown() {
    let clock = test_clock();
    let notifier = Arc::new(MockNotificationChannel::new(false));
    let service = build_service(
        notifier,
        VerificationServiceConfig::default(),
        &clock,
        &["111111", "222222"],
    );

    service.issue(PHONE, PHONE, Channel::Sms).await.unwrap();
    assert!(service.invalidate(PHONE));
    assert!(!service.invalidate(PHONE));
    assert_eq!(service.verify(PHONE, "111111").await, Err(CodeError::NotFound));

    assert!(service.issue(PHONE, PHONE, Channel::Sms).await.is_ok());
}

#[tokio::test]
async fn test_sweep_expired_through_service() {
    let clock = test_clock();
    let notifier = Arc::new(MockNotificationChannel::new(false));
    let config = VerificationServiceConfig::default().with_code_ttl(Duration::from_secs(30));
    let service = build_service(notifier, config, &clock, &["111111"]);

    service.issue(PHONE, PHONE, Channel::Sms).await.unwrap();
    service.issue(EMAIL, EMAIL, Channel::Email).await.unwrap();
    assert_eq!(service.active_codes(), 2);

    clock.advance(Duration::from_secs(30));
    assert_eq!(service.sweep_expired(), 2);
    assert_eq!(service.active_codes(), 0);
    assert_eq!(service.verify(PHONE, "111111").await, Err(CodeError::NotFound));
}

#[tokio::test]
async fn test_disabled_sweeper_returns_idle_handle() {
    let notifier = Arc::new(MockNotificationChannel::new(false));
    let config = VerificationServiceConfig {
        sweeper_enabled: false,
        ..Default::default()
    };
    let service = VerificationService::new(notifier, config);

    let handle = service.start_sweeper();
    assert!(!handle.is_running());
}
