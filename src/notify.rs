//! Transient notification channel: a queue-of-one toast with timed
//! auto-dismiss. A new message replaces whatever is showing; dismissal is
//! idempotent and user-triggerable before the timer elapses.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

struct Showing {
    id: Option<u64>,
    timer: Option<JoinHandle<()>>,
}

struct Inner {
    showing: Mutex<Showing>,
    tx: watch::Sender<Option<Toast>>,
    next_id: AtomicU64,
    duration: Duration,
}

/// Cloneable handle; every clone publishes into the same queue-of-one.
/// `push` must be called from within a tokio runtime so the auto-dismiss
/// timer can be scheduled.
#[derive(Clone)]
pub struct ToastChannel {
    inner: Arc<Inner>,
}

impl ToastChannel {
    pub fn new(duration: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                showing: Mutex::new(Showing {
                    id: None,
                    timer: None,
                }),
                tx,
                next_id: AtomicU64::new(0),
                duration,
            }),
        }
    }

    /// Show a message, replacing any current toast and cancelling its
    /// pending auto-dismiss. Returns the new toast's id.
    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let toast = Toast {
            id,
            kind,
            message: message.into(),
        };
        debug!(id, ?kind, "toast shown");

        let mut showing = self.inner.showing.lock().unwrap();
        if let Some(timer) = showing.timer.take() {
            timer.abort();
        }
        showing.id = Some(id);
        self.inner.tx.send_replace(Some(toast));

        let channel = self.clone();
        showing.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(channel.inner.duration).await;
            channel.dismiss(id);
        }));
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    /// Dismiss the toast with the given id. A no-op when it was already
    /// dismissed or has been superseded by a newer message.
    pub fn dismiss(&self, id: u64) {
        let mut showing = self.inner.showing.lock().unwrap();
        if showing.id != Some(id) {
            return;
        }
        showing.id = None;
        if let Some(timer) = showing.timer.take() {
            timer.abort();
        }
        debug!(id, "toast dismissed");
        self.inner.tx.send_replace(None);
    }

    /// The currently visible toast, if any.
    pub fn current(&self) -> Option<Toast> {
        self.inner.tx.borrow().clone()
    }

    /// Observe toast changes; the receiver sees `None` between messages.
    pub fn subscribe(&self) -> watch::Receiver<Option<Toast>> {
        self.inner.tx.subscribe()
    }
}

impl Default for ToastChannel {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn auto_dismisses_after_the_configured_duration() {
        let channel = ToastChannel::default();
        channel.success("Product created");
        assert!(channel.current().is_some());

        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(channel.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_is_idempotent() {
        let channel = ToastChannel::default();
        let id = channel.error("boom");

        channel.dismiss(id);
        assert_eq!(channel.current(), None);

        // Second dismissal of the same id changes nothing and does not panic.
        channel.dismiss(id);
        assert_eq!(channel.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn new_message_replaces_the_current_one() {
        let channel = ToastChannel::default();
        let first = channel.success("first");
        let second = channel.success("second");

        let current = channel.current().unwrap();
        assert_eq!(current.id, second);
        assert_eq!(current.message, "second");

        // Dismissing the superseded toast must not clear the newer one.
        channel.dismiss(first);
        assert_eq!(channel.current().unwrap().id, second);
    }

    #[tokio::test(start_paused = true)]
    async fn replacement_restarts_the_timer() {
        let channel = ToastChannel::default();
        channel.success("first");

        tokio::time::sleep(Duration::from_millis(2000)).await;
        channel.success("second");

        // 2s into the second toast's window the first timer would have
        // fired; the replacement must have cancelled it.
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(channel.current().unwrap().message, "second");

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(channel.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_dismiss_cancels_the_pending_timer() {
        let channel = ToastChannel::default();
        let first = channel.success("first");
        channel.dismiss(first);

        let second = channel.success("second");
        // Were the first timer still pending it would fire inside this
        // window and wrongly dismiss nothing or race; the second toast
        // must survive its own full duration minus a margin.
        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(channel.current().unwrap().id, second);
    }
}
