use std::time::Duration;

/// How long a notice stays on screen before it expires on its own.
pub const NOTICE_TTL: Duration = Duration::from_millis(3000);

/// Severity tag of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A transient user-facing status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

/// Holder of the single live notice.
///
/// A new notice pre-empts the current one immediately; there is no queue.
/// Expiries are sequenced by a generation counter so the timer scheduled for
/// a replaced notice cannot clear its successor.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
    generation: u64,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Displays a notice and returns the generation its expiry must present.
    pub fn show(&mut self, message: impl Into<String>, severity: Severity) -> u64 {
        self.current = Some(Notice {
            message: message.into(),
            severity,
        });
        self.generation += 1;
        self.generation
    }

    /// Expiry callback: clears the notice only if it is still the one the
    /// timer was scheduled for.
    pub fn expire(&mut self, generation: u64) {
        if generation == self.generation {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}
