//! Service layer: message rendering and ChatWork delivery.

mod build_notifier;
pub mod notifications;
pub mod template;

pub use build_notifier::BuildNotifier;
pub use notifications::{ChatWorkNotifier, DeliveryReceipt, NotifyError};
