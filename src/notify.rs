//! Notification plumbing. Page controllers receive a `Notifier` by
//! reference instead of reaching for a process-wide singleton, so tests
//! can observe what a page would have surfaced.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
            NoticeKind::Warning => "warning",
            NoticeKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Single-slot toast queue: one notice visible at a time, last write wins.
#[derive(Default)]
pub struct ToastQueue {
    current: Mutex<Option<Notice>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notice currently on screen, if any.
    pub fn current(&self) -> Option<Notice> {
        self.current.lock().ok().and_then(|g| g.clone())
    }

    /// Dismiss and return the visible notice.
    pub fn dismiss(&self) -> Option<Notice> {
        self.current.lock().ok().and_then(|mut g| g.take())
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, kind: NoticeKind, message: &str) {
        if let Ok(mut slot) = self.current.lock() {
            *slot = Some(Notice {
                kind,
                message: message.to_string(),
            });
        }
    }
}

/// Fallback notifier for headless runs: notices go to the structured log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        crate::logging::log(
            crate::logging::Level::Info,
            crate::logging::Domain::Page,
            "notice",
            crate::logging::obj(&[
                ("kind", crate::logging::v_str(kind.as_str())),
                ("msg", crate::logging::v_str(message)),
            ]),
        );
    }
}
