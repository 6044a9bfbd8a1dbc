//! Best-effort build notifications.
//!
//! `ChatWorkNotifier` owns the delivery algorithm. The network itself sits
//! behind the `Transport` trait so the real `reqwest` client and test fakes
//! share one code path.

mod chatwork_provider;
mod error;
mod transport;


pub use chatwork_provider::{ChatWorkNotifier, DEFAULT_API_BASE_URL, DeliveryReceipt, TOKEN_HEADER};
pub use error::{BoxError, NotifyError, NotifyResult, Stage};
pub use transport::{Connection, OutboundRequest, Transport};
