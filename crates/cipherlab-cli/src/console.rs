//! Console driver.
//!
//! Implements [`Driver`] by replaying a fixed list of intents. The next
//! intent is released only when the app has settled, so every step sees
//! the outcome of the previous one. Nothing is taken from the script until
//! the poll that hands it to the runtime. The last rendered page is written
//! out when the run stops.

use std::{
    collections::VecDeque,
    io::{self, Write},
    path::PathBuf,
};

use cipherlab_app::{App, AppEvent, Banner, Driver, Intent, Page};
use thiserror::Error;
use tokio::time::Instant;

/// Console driver errors.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Writing the page to stdout failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Writing the page to `--html` failed.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        /// Destination.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// A step ended with an error banner; the rest of the script was skipped.
    #[error("{0}")]
    Flow(String),
}

/// Scripted driver for the command line.
pub struct ConsoleDriver {
    script: VecDeque<Intent>,
    output: Option<PathBuf>,
    keep: Option<Page>,
    page: Option<(Page, String)>,
    failure: Option<String>,
}

impl ConsoleDriver {
    /// Driver replaying `script`, writing the final page to `output` or
    /// stdout.
    pub fn new(script: impl IntoIterator<Item = Intent>, output: Option<PathBuf>) -> Self {
        Self { script: script.into_iter().collect(), output, keep: None, page: None, failure: None }
    }

    /// Once `page` has rendered, frames of other pages no longer replace it.
    #[must_use]
    pub fn keeping(mut self, page: Option<Page>) -> Self {
        self.keep = page;
        self
    }

    /// Next event to feed, or `None` while the app is still busy.
    fn next_step(&mut self, app: &App<Instant>) -> Option<AppEvent> {
        if !app.is_settled() {
            return None;
        }
        if let Some(error) = app.view().banner().and_then(Banner::error_text) {
            tracing::warn!(page = %app.page(), %error, skipped = self.script.len(), "flow stopped");
            self.failure = Some(error.to_string());
            self.script.clear();
            return Some(AppEvent::Intent(Intent::Quit));
        }
        let intent = self.script.pop_front().unwrap_or(Intent::Quit);
        tracing::debug!(?intent, "next step");
        Some(AppEvent::Intent(intent))
    }

    fn write_page(&self, page: &str) -> Result<(), ConsoleError> {
        match &self.output {
            Some(path) => std::fs::write(path, page)
                .map_err(|source| ConsoleError::Write { path: path.clone(), source }),
            None => {
                let mut out = io::stdout().lock();
                writeln!(out, "{page}")?;
                Ok(())
            },
        }
    }
}

impl Driver for ConsoleDriver {
    type Error = ConsoleError;
    type Instant = Instant;

    async fn poll_event(&mut self, app: &App<Instant>) -> Result<Option<AppEvent>, ConsoleError> {
        // The step is taken in the poll that returns it, so a dropped future
        // never loses one.
        match self.next_step(app) {
            Some(event) => Ok(Some(event)),
            None => std::future::pending().await,
        }
    }

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn render(&mut self, app: &App<Instant>) -> Result<(), ConsoleError> {
        let page = app.page();
        if let (Some(kept), Some((shown, _))) = (self.keep, &self.page)
            && *shown == kept
            && page != kept
        {
            tracing::debug!(%page, %kept, "frame not kept");
            return Ok(());
        }
        self.page = Some((page, app.render()));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ConsoleError> {
        if let Some((_, page)) = self.page.take() {
            self.write_page(&page)?;
        }
        match self.failure.take() {
            Some(message) => Err(ConsoleError::Flow(message)),
            None => Ok(()),
        }
    }
}
