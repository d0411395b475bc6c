//! Generic runtime for application orchestration.
//!
//! The Runtime drives the event loop, coordinating between:
//! - [`App`]: page state machines
//! - [`Bridge`]: API calls
//! - [`Driver`]: input, output and time
//!
//! One task multiplexes driver input, completed calls and a periodic tick.
//! State machines never block; suspension happens only while waiting for
//! one of those three sources.

use std::time::Duration;

use cipherlab_client::Api;
use futures::{StreamExt, future::BoxFuture, stream::FuturesUnordered};
use tokio::time::MissedTickBehavior;

use crate::{App, AppAction, AppConfig, AppEvent, Bridge, Driver};

/// Default tick period.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `A`: API implementation
pub struct Runtime<D: Driver, A> {
    driver: D,
    app: App<D::Instant>,
    bridge: Bridge<A>,
    in_flight: FuturesUnordered<BoxFuture<'static, AppEvent>>,
    tick: Duration,
}

impl<D: Driver, A: Api> Runtime<D, A> {
    /// Create a runtime with the given driver, API and timing.
    pub fn new(driver: D, api: A, config: AppConfig) -> Self {
        Self {
            driver,
            app: App::new(config),
            bridge: Bridge::new(api),
            in_flight: FuturesUnordered::new(),
            tick: DEFAULT_TICK,
        }
    }

    /// Override the tick period.
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Run the main event loop until the app quits or input closes.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to read input or write output.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // Losing branches are dropped; driver input is only taken by the
            // poll that returns it.
            let event = tokio::select! {
                polled = self.driver.poll_event(&self.app) => match polled? {
                    Some(event) => event,
                    None => break,
                },
                Some(event) = self.in_flight.next(), if !self.in_flight.is_empty() => event,
                _ = ticker.tick() => AppEvent::Tick,
            };

            if self.dispatch(event)? {
                break;
            }
        }

        if !self.in_flight.is_empty() {
            tracing::debug!(abandoned = self.in_flight.len(), "stopping with calls in flight");
        }
        self.driver.stop()
    }

    /// Feed one event to the app and execute the resulting actions.
    ///
    /// Returns `true` if the app asked to quit.
    fn dispatch(&mut self, event: AppEvent) -> Result<bool, D::Error> {
        let now = self.driver.now();
        let mut pending = self.app.handle(event, now);

        while !pending.is_empty() {
            let actions = std::mem::take(&mut pending);
            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Navigate(page) => pending.extend(self.app.navigate(page, now)),
                    AppAction::Call { ticket, call } => {
                        self.in_flight.push(self.bridge.dispatch(ticket, call));
                    },
                }
            }
        }
        Ok(false)
    }

    /// Get a reference to the App.
    pub fn app(&self) -> &App<D::Instant> {
        &self.app
    }

    /// Get a mutable reference to the App.
    pub fn app_mut(&mut self) -> &mut App<D::Instant> {
        &mut self.app
    }
}
