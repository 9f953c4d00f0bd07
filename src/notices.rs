//! Notices
//!
//! Short user-facing messages produced by storefront operations. The UI layer drains and renders
//! them; the engine only queues them.

use std::{collections::VecDeque, fmt};

use tracing::{info, warn};

/// Whether a notice reports success or a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Operation succeeded
    Success,

    /// Operation failed or was refused
    Error,
}

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Success or error
    pub kind: NoticeKind,

    /// Message text
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// FIFO queue of pending notices.
#[derive(Debug, Default, Clone)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    /// Queue a success notice.
    pub fn success(&mut self, message: impl Into<String>) {
        let message = message.into();

        info!(notice = %message, "notice");

        self.queue.push_back(Notice {
            kind: NoticeKind::Success,
            message,
        });
    }

    /// Queue an error notice.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();

        warn!(notice = %message, "notice");

        self.queue.push_back(Notice {
            kind: NoticeKind::Error,
            message,
        });
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }

    /// Most recent notice, if any.
    pub fn last(&self) -> Option<&Notice> {
        self.queue.back()
    }

    /// Check if there are no pending notices.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
