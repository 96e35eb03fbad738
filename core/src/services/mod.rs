//! Business services containing domain logic and use cases.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    Clock, CodeGenerator, CodeStore, ExpirySweeper, IssueReceipt, ManualClock,
    NotificationChannel, Reservation, ResendThrottle, SecureCodeGenerator, SweepReport,
    SweeperHandle, SystemClock, VerificationService, VerificationServiceConfig,
};
