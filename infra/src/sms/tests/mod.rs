//! Unit tests for SMS module

#[cfg(test)]
pub mod mock_sms_tests;
