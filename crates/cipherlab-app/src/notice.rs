//! Transient banners.

use std::time::Duration;

use crate::{ViewError, time::Moment};

/// Banner colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Something failed.
    Error,
    /// Something worked.
    Success,
    /// Neutral outcome.
    Info,
}

impl Tone {
    /// CSS modifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Success => "success",
            Self::Info => "info",
        }
    }
}

/// One banner message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice<I> {
    /// Colouring.
    pub tone: Tone,
    /// Error class when `tone` is [`Tone::Error`].
    pub kind: Option<&'static str>,
    /// Text, unescaped.
    pub text: String,
    /// Removal deadline. `None` keeps it until replaced.
    pub until: Option<I>,
}

/// Banner slot owned by a view.
///
/// Holds at most one notice. Errors clear themselves after the configured
/// delay; success and info notices stay until replaced.
#[derive(Debug, Clone)]
pub struct Banner<I> {
    current: Option<Notice<I>>,
    clear_after: Duration,
}

impl<I: Moment> Banner<I> {
    /// Empty banner whose errors last `clear_after`.
    pub fn new(clear_after: Duration) -> Self {
        Self { current: None, clear_after }
    }

    /// Show `err` until `now + clear_after`.
    pub fn error(&mut self, err: &ViewError, now: I) {
        self.current = Some(Notice {
            tone: Tone::Error,
            kind: Some(err.kind()),
            text: err.to_string(),
            until: Some(now + self.clear_after),
        });
    }

    /// Show a success message.
    pub fn success(&mut self, text: impl Into<String>) {
        self.current = Some(Notice { tone: Tone::Success, kind: None, text: text.into(), until: None });
    }

    /// Show a neutral message.
    pub fn info(&mut self, text: impl Into<String>) {
        self.current = Some(Notice { tone: Tone::Info, kind: None, text: text.into(), until: None });
    }

    /// Remove the current notice.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Drop the notice if its deadline has passed. Returns whether anything
    /// changed.
    pub fn expire(&mut self, now: I) -> bool {
        let due = self.current.as_ref().and_then(|n| n.until).is_some_and(|until| until <= now);
        if due {
            self.current = None;
        }
        due
    }

    /// Current notice.
    pub fn current(&self) -> Option<&Notice<I>> {
        self.current.as_ref()
    }

    /// Text of the current error, if one is showing.
    pub fn error_text(&self) -> Option<&str> {
        self.current.as_ref().filter(|n| n.tone == Tone::Error).map(|n| n.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn error_clears_at_deadline() {
        let mut banner = Banner::new(ms(5_000));
        banner.error(&ViewError::Validation("Please enter a username".into()), ms(1_000));

        assert!(!banner.expire(ms(5_999)));
        assert_eq!(banner.error_text(), Some("Please enter a username"));
        assert!(banner.expire(ms(6_000)));
        assert!(banner.current().is_none());
    }

    #[test]
    fn success_persists() {
        let mut banner = Banner::new(ms(5_000));
        banner.success("Password found: 234");

        assert!(!banner.expire(ms(60_000)));
        assert_eq!(banner.current().map(|n| n.tone), Some(Tone::Success));
        assert_eq!(banner.error_text(), None);
    }

    #[test]
    fn newer_notice_replaces_deadline() {
        let mut banner = Banner::new(ms(5_000));
        banner.error(&ViewError::Transport("retry".into()), ms(0));
        banner.info("No password found. Try another method.");

        assert!(!banner.expire(ms(5_000)));
    }
}
