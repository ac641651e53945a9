use std::time::{Duration, Instant};

pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(6);
/// Longest visibility window a channel accepts; longer requests are clamped.
pub const MAX_NOTIFICATION_DURATION: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub shown_at: Instant,
    pub expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Single-slot notification channel: the latest `show` wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationChannel {
    active: Option<Notification>,
    duration: Duration,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::with_duration(DEFAULT_NOTIFICATION_DURATION)
    }
}

impl NotificationChannel {
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            active: None,
            duration: duration.min(MAX_NOTIFICATION_DURATION),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn active(&self) -> Option<&Notification> {
        self.active.as_ref()
    }

    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        self.show_at(message, severity, Instant::now());
    }

    /// Replaces whatever is currently displayed.
    pub fn show_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        self.active = Some(Notification {
            message: message.into(),
            severity,
            shown_at: now,
            expires_at: now.checked_add(self.duration).unwrap_or(now),
        });
    }

    pub fn dismiss(&mut self) -> Option<Notification> {
        self.active.take()
    }

    /// Drops the active notification once its visibility window has passed.
    /// Returns true when something was dismissed.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.active.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.active = None;
            true
        } else {
            false
        }
    }
}
