//! Mock implementations for testing verification service

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::entities::Channel;
use crate::errors::SendError;
use crate::services::verification::{
    CodeGenerator, ManualClock, NotificationChannel, VerificationService,
    VerificationServiceConfig,
};

// Mock notification channel for testing
pub struct MockNotificationChannel {
    pub sent_messages: Arc<Mutex<HashMap<String, String>>>,
    pub send_count: AtomicUsize,
    pub should_fail: bool,
    pub delay: Option<Duration>,
    pub email_enabled: bool,
    // First send waits this long and then fails; later sends succeed
    pub first_send_fails_after: Option<Duration>,
}

impl MockNotificationChannel {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent_messages: Arc::new(Mutex::new(HashMap::new())),
            send_count: AtomicUsize::new(0),
            should_fail,
            delay: None,
            email_enabled: true,
            first_send_fails_after: None,
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(false)
        }
    }

    pub fn first_send_fails_after(delay: Duration) -> Self {
        Self {
            first_send_fails_after: Some(delay),
            ..Self::new(false)
        }
    }

    pub fn sms_only() -> Self {
        Self {
            email_enabled: false,
            ..Self::new(false)
        }
    }

    pub fn get_sent_code(&self, destination: &str) -> Option<String> {
        self.sent_messages.lock().unwrap().get(destination).cloned()
    }

    pub fn sends(&self) -> usize {
        self.send_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationChannel for MockNotificationChannel {
    async fn send(
        &self,
        destination: &str,
        code: &str,
        _channel: Channel,
    ) -> Result<String, SendError> {
        let attempt = self.send_count.fetch_add(1, Ordering::SeqCst);
        if let (0, Some(delay)) = (attempt, self.first_send_fails_after) {
            tokio::time::sleep(delay).await;
            return Err(SendError::transport("mock", "gateway unreachable"));
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail {
            return Err(SendError::transport("mock", "gateway unreachable"));
        }
        self.sent_messages
            .lock()
            .unwrap()
            .insert(destination.to_string(), code.to_string());
        Ok(format!("mock-msg-{}", uuid::Uuid::new_v4()))
    }

    fn supports(&self, channel: Channel) -> bool {
        channel == Channel::Sms || self.email_enabled
    }
}

// Hands out a fixed sequence of codes, then repeats the last one
pub struct SequenceCodeGenerator {
    codes: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl SequenceCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            last: Mutex::new(codes.last().map(|c| c.to_string()).unwrap_or_default()),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> String {
        match self.codes.lock().unwrap().pop_front() {
            Some(code) => {
                *self.last.lock().unwrap() = code.clone();
                code
            }
            None => self.last.lock().unwrap().clone(),
        }
    }
}

pub fn test_clock() -> ManualClock {
    ManualClock::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
}

pub fn build_service(
    notifier: Arc<MockNotificationChannel>,
    config: VerificationServiceConfig,
    clock: &ManualClock,
    codes: &[&str],
) -> VerificationService<MockNotificationChannel> {
    VerificationService::with_components(
        notifier,
        config,
        Arc::new(clock.clone()),
        Arc::new(SequenceCodeGenerator::new(codes)),
    )
}
