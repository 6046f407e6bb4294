use crate::session::BreakpointId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Short user-facing feedback message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Side effects that should be executed by the host outside the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Rewrite the address bar without adding a history entry
    ReplaceLocator(String),
    Notify(Notice),
    /// Re-create the embedded frame so it loads again
    RemountFrame {
        id: BreakpointId,
        key: String,
    },
    OpenExternal(String),
    CopyToClipboard(String),
    /// Start the status clock; some load is pending
    StartClock,
    /// Stop the status clock; nothing is pending
    StopClock,
}
