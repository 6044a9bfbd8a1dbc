use std::fmt;
use thiserror::Error;

/// Boxed cause carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Step of the delivery at which a transport failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connect,
    Request,
    Response,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Connect => f.write_str("connect"),
            Stage::Request => f.write_str("request"),
            Stage::Response => f.write_str("response"),
        }
    }
}

/// Why a notification was not delivered.
///
/// Never escapes `ChatWorkNotifier::notify`; it exists so the failure can be
/// logged with its cause.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Missing notifier setting: {field}")]
    MissingSetting { field: &'static str },

    #[error("Cannot build endpoint for room '{room_id}': {reason}")]
    Endpoint { room_id: String, reason: String },

    #[error("Timed out during {stage}")]
    Timeout { stage: Stage },

    #[error("Transport error during {stage}")]
    Transport {
        stage: Stage,
        #[source]
        source: BoxError,
    },

    #[error("ChatWork rejected the message with HTTP {status}")]
    Rejected { status: u16 },
}

impl NotifyError {
    pub fn transport(stage: Stage, source: impl Into<BoxError>) -> Self {
        NotifyError::Transport {
            stage,
            source: source.into(),
        }
    }

    /// The error followed by every underlying cause, joined with `": "`.
    ///
    /// HTTP client errors keep the OS-level reason (refused, DNS, TLS) in
    /// their source chain rather than in `Display`.
    pub fn report(&self) -> String {
        std::iter::successors(Some(self as &dyn std::error::Error), |e| e.source())
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(": ")
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            NotifyError::Timeout { stage } | NotifyError::Transport { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type NotifyResult<T> = Result<T, NotifyError>;
