mod notification;
mod outcome;

pub use notification::{ApiToken, NotificationConfig};
pub use outcome::{BuildOutcome, BuildResult, ChangeEntry, Culprit};
