//! Toast notifications.
//!
//! Handlers queue toasts in the session; the next rendered page drains the
//! queue and shows them. Each toast removes itself client-side after its
//! duration.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

/// Session key for queued toasts.
pub const SESSION_KEY: &str = "toasts";

/// How long a toast stays on screen unless given another duration.
pub const DEFAULT_DURATION_MS: u64 = 3000;

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastKind {
    /// Lowercase name, used as a CSS modifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }

    /// Glyph shown next to the message.
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Success => "\u{2713}",
            Self::Error => "\u{2715}",
            Self::Info => "\u{2139}",
            Self::Warning => "\u{26a0}",
        }
    }
}

/// A queued notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl Toast {
    /// Create a toast with the default duration.
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            duration_ms: DEFAULT_DURATION_MS,
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Success)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Info)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Warning)
    }

    /// Override how long the toast stays visible.
    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Queue `toast` for the next page this client renders.
///
/// Session failures are logged; a lost toast is not worth failing a request.
pub async fn show(session: &Session, toast: Toast) {
    let mut queued = match session.get::<Vec<Toast>>(SESSION_KEY).await {
        Ok(queued) => queued.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Dropping unreadable toast queue");
            Vec::new()
        }
    };
    queued.push(toast);

    if let Err(e) = session.insert(SESSION_KEY, queued).await {
        tracing::error!(error = %e, "Failed to queue toast");
    }
}

/// Remove and return every queued toast, oldest first.
pub async fn drain(session: &Session) -> Vec<Toast> {
    match session.remove::<Vec<Toast>>(SESSION_KEY).await {
        Ok(queued) => queued.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read toast queue");
            Vec::new()
        }
    }
}
