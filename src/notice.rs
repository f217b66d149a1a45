//! Transient success/error banners.
//!
//! A banner is shown for a fixed duration and then disappears on its own. The
//! host event loop calls [`NoticeBoard::tick`] (or just reads
//! [`NoticeBoard::current`]) to drop expired banners.

use std::time::Duration;
use web_time::Instant;

use crate::constants::{MAX_NOTICE_MILLIS, MIN_NOTICE_MILLIS};

/// Banner flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Operation completed
    Success,
    /// Operation failed; the user can retry
    Error,
}

/// A banner message with its display deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Banner flavour
    pub kind: NoticeKind,
    /// Text shown to the user
    pub message: String,
    shown_at: Instant,
    lifetime: Duration,
}

impl Notice {
    /// Check if the banner should no longer be shown at `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.lifetime
    }

    /// Time the banner went up.
    pub fn shown_at(&self) -> Instant {
        self.shown_at
    }
}

/// Holds at most one banner; a new banner replaces the old one.
#[derive(Debug)]
pub struct NoticeBoard {
    lifetime: Duration,
    current: Option<Notice>,
}

impl NoticeBoard {
    /// Shortest allowed banner lifetime.
    pub const MIN_LIFETIME: Duration = Duration::from_millis(MIN_NOTICE_MILLIS);

    /// Longest allowed banner lifetime.
    pub const MAX_LIFETIME: Duration = Duration::from_millis(MAX_NOTICE_MILLIS);

    /// Create a board; `lifetime` is clamped to 3..=5 seconds.
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime: lifetime.clamp(Self::MIN_LIFETIME, Self::MAX_LIFETIME),
            current: None,
        }
    }

    /// Banner lifetime in use.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Show a success banner.
    pub fn success(&mut self, message: impl Into<String>) {
        self.show(NoticeKind::Success, message.into(), Instant::now());
    }

    /// Show an error banner.
    pub fn error(&mut self, message: impl Into<String>) {
        self.show(NoticeKind::Error, message.into(), Instant::now());
    }

    /// Show a banner as of `now`.
    pub fn show(&mut self, kind: NoticeKind, message: String, now: Instant) {
        log::debug!("Notice ({:?}): {}", kind, message);
        self.current = Some(Notice {
            kind,
            message,
            shown_at: now,
            lifetime: self.lifetime,
        });
    }

    /// The live banner, if any.
    pub fn current(&self) -> Option<&Notice> {
        self.current_at(Instant::now())
    }

    /// The banner live at `now`, if any.
    pub fn current_at(&self, now: Instant) -> Option<&Notice> {
        self.current.as_ref().filter(|n| !n.is_expired_at(now))
    }

    /// Drop the banner if it has expired.
    ///
    /// Returns true if a banner was removed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// Drop the banner if it has expired at `now`.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if self.current.as_ref().is_some_and(|n| n.is_expired_at(now)) {
            self.current = None;
            log::trace!("Notice expired");
            return true;
        }
        false
    }

    /// Dismiss the banner immediately.
    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(Self::MIN_LIFETIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_clamped() {
        assert_eq!(NoticeBoard::new(Duration::ZERO).lifetime(), Duration::from_secs(3));
        assert_eq!(
            NoticeBoard::new(Duration::from_secs(60)).lifetime(),
            Duration::from_secs(5)
        );
        assert_eq!(
            NoticeBoard::new(Duration::from_secs(4)).lifetime(),
            Duration::from_secs(4)
        );
    }

    #[test]
    fn test_notice_visible_then_expires() {
        let mut board = NoticeBoard::default();
        let start = Instant::now();
        board.show(NoticeKind::Success, "Saved".to_string(), start);

        let visible = board.current_at(start + Duration::from_secs(2)).unwrap();
        assert_eq!(visible.message, "Saved");
        assert!(board.current_at(start + Duration::from_secs(3)).is_none());

        assert!(!board.tick_at(start + Duration::from_secs(1)));
        assert!(board.tick_at(start + Duration::from_secs(4)));
        assert!(board.current_at(start).is_none());
    }

    #[test]
    fn test_new_notice_replaces_old() {
        let mut board = NoticeBoard::default();
        board.success("first");
        board.error("second");

        let notice = board.current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "second");
    }

    #[test]
    fn test_dismiss() {
        let mut board = NoticeBoard::default();
        board.success("done");
        board.dismiss();
        assert!(board.current().is_none());
    }
}
