// Transient notifications

use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    created_at: Instant,
}

#[derive(Debug)]
pub struct Toasts {
    items: Vec<Toast>,
    ttl: Duration,
}

impl Toasts {
    pub const fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            ToastKind::Error => tracing::warn!("{message}"),
            ToastKind::Success | ToastKind::Info => tracing::info!("{message}"),
        }
        self.items.push(Toast {
            kind,
            message,
            created_at: Instant::now(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|toast| now.saturating_duration_since(toast.created_at) < ttl);
    }

    pub fn visible(&self) -> &[Toast] {
        &self.items
    }

    pub fn last(&self) -> Option<&Toast> {
        self.items.last()
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
