//! Unit tests for the mock SMS service

use std::time::Duration;

use crate::notify::message::VerificationMessage;
use crate::sms::{MockSmsService, SmsService};
use crate::InfrastructureError;

fn message() -> VerificationMessage {
    VerificationMessage::new("123456", Duration::from_secs(600))
}

#[tokio::test]
async fn test_mock_sms_send_success() {
    let service = MockSmsService::with_options(false, false);
    let result = service.send_verification_code("+14155552671", &message()).await;

    let message_id = result.unwrap();
    assert!(message_id.starts_with("mock_"));
    assert_eq!(service.get_message_count(), 1);
}

#[tokio::test]
async fn test_mock_sms_invalid_phone() {
    let service = MockSmsService::with_options(false, false);
    let result = service.send_verification_code("4155552671", &message()).await;

    match result {
        Err(InfrastructureError::InvalidDestination(msg)) => {
            assert!(msg.contains("Invalid phone number"))
        }
        other => panic!("Expected invalid destination, got {:?}", other),
    }
    assert_eq!(service.get_message_count(), 0);
}

#[tokio::test]
async fn test_mock_sms_simulate_failure() {
    let service = MockSmsService::with_options(false, true);

    let result = service.send_verification_code("+14155552671", &message()).await;
    assert!(matches!(result, Err(InfrastructureError::Sms(_))));

    // Failures are not counted
    assert_eq!(service.get_message_count(), 0);
}

#[tokio::test]
async fn test_mock_sms_counter_is_shared_by_clones() {
    let service = MockSmsService::with_options(false, false);
    let clone = service.clone();

    for _ in 0..3 {
        clone.send_verification_code("+14155552671", &message()).await.unwrap();
    }
    assert_eq!(service.get_message_count(), 3);
}
