use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// Transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: Duration,
}

/// Short-lived messages shown over the view. Newest last.
#[derive(Debug, Clone)]
pub struct Notices {
    lifetime: Duration,
    items: VecDeque<Notice>,
}

/// Older notices are dropped beyond this many.
const MAX_NOTICES: usize = 8;

impl Notices {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            items: VecDeque::new(),
        }
    }

    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>, now: Duration) {
        let message = message.into();
        match kind {
            NoticeKind::Info => tracing::info!(%message, "Notice"),
            NoticeKind::Warning => tracing::warn!(%message, "Notice"),
            NoticeKind::Error => tracing::error!(%message, "Notice"),
        }
        if self.items.len() == MAX_NOTICES {
            self.items.pop_front();
        }
        self.items.push_back(Notice {
            kind,
            message,
            expires_at: now + self.lifetime,
        });
    }

    pub fn prune(&mut self, now: Duration) {
        self.items.retain(|n| n.expires_at > now);
    }

    /// Most recent notice still on screen.
    pub fn current(&self, now: Duration) -> Option<&Notice> {
        self.items.iter().rev().find(|n| n.expires_at > now)
    }

    pub fn active(&self, now: Duration) -> impl Iterator<Item = &Notice> {
        self.items.iter().filter(move |n| n.expires_at > now)
    }
}
