// In: src/push/status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result code of a batch submission.
///
/// Codes are opaque: callers compare them for equality and never inspect their
/// numeric value. `Other` carries any code this crate has no name for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Ok,
    OkCreated,
    /// The server-side async pipeline is saturated; the push may be retried later.
    AsyncPipeFull,
    TryAgain,
    Timeout,
    ConnectionRefused,
    InvalidArgument,
    Other(u32),
}

impl Status {
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok | Status::OkCreated)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "ok"),
            Status::OkCreated => write!(f, "ok (created)"),
            Status::AsyncPipeFull => write!(f, "async pipe full"),
            Status::TryAgain => write!(f, "try again"),
            Status::Timeout => write!(f, "timeout"),
            Status::ConnectionRefused => write!(f, "connection refused"),
            Status::InvalidArgument => write!(f, "invalid argument"),
            Status::Other(code) => write!(f, "status {:#x}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ok() {
        assert!(Status::Ok.is_ok());
        assert!(Status::OkCreated.is_ok());
        assert!(!Status::AsyncPipeFull.is_ok());
        assert!(!Status::Other(0).is_ok());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Status::AsyncPipeFull).unwrap();
        assert_eq!(json, "\"async_pipe_full\"");
        let other: Status = serde_json::from_str(r#"{"other":42}"#).unwrap();
        assert_eq!(other, Status::Other(42));
        assert_eq!(other.to_string(), "status 0x2a");
    }
}
