//! Application timing configuration.

use std::time::Duration;

/// Delays and display windows used by the views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// How long an error banner stays up.
    pub error_clear: Duration,
    /// Delay between a found password and the automatic sign-in.
    pub auto_login_delay: Duration,
    /// Delay between a successful automatic sign-in and leaving the page.
    pub redirect_delay: Duration,
    /// Plaintext window after decrypting a conversation message.
    pub conversation_reveal: Duration,
    /// Plaintext window after extracting an audio message.
    pub stego_reveal: Duration,
    /// Plaintext window on the cipher workbench.
    pub workbench_reveal: Duration,
    /// Conversation reload interval. `None` disables polling.
    pub poll_interval: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            error_clear: Duration::from_millis(5_000),
            auto_login_delay: Duration::from_millis(3_000),
            redirect_delay: Duration::from_millis(1_000),
            conversation_reveal: Duration::from_millis(60_000),
            stego_reveal: Duration::from_millis(60_000),
            workbench_reveal: Duration::from_millis(300_000),
            poll_interval: None,
        }
    }
}
