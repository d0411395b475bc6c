//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from where input
//! comes from and where pages go. The command-line front end replays a
//! script and writes HTML; tests feed intents by hand and record frames.

use std::future::Future;

use crate::{App, AppEvent, time::Moment};

/// Abstracts input, output and time for the [`crate::Runtime`].
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables paused or virtual time in tests.
    type Instant: Moment;

    /// Wait for the next input event.
    ///
    /// The app is passed so a scripted driver can hold back input until the
    /// previous step has settled. The future may stay pending forever; the
    /// runtime keeps serving replies and ticks meanwhile. `None` means the
    /// input is closed and the runtime stops.
    ///
    /// The runtime drops this future whenever a reply or tick arrives first
    /// and asks again on the next turn. Input must therefore be consumed
    /// only in the poll that returns it.
    fn poll_event(
        &mut self,
        app: &App<Self::Instant>,
    ) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be written.
    fn render(&mut self, app: &App<Self::Instant>) -> Result<(), Self::Error>;

    /// Flush output and release resources.
    ///
    /// # Errors
    ///
    /// Returns an error if final output cannot be written.
    fn stop(&mut self) -> Result<(), Self::Error>;
}
