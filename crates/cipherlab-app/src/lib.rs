//! Application layer for cipherlab
//!
//! Pure per-page state machines, an HTML renderer and a generic runtime.
//! Every page is a sans-IO state machine driven by the same code in tests
//! and in the command-line front end.
//!
//! # Components
//!
//! - [`App`]: page navigation and event routing
//! - [`views`]: per-page state (attack session, crack panels, conversation)
//! - [`render`]: escaped HTML for every page
//! - [`Bridge`]: translates [`ApiCall`]s into API futures
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: orchestration loop over driver input, replies and ticks
//!
//! # Tickets
//!
//! Every outgoing call carries a [`Ticket`]. A view remembers the tickets it
//! is waiting for and ignores any reply it does not recognise, so a reply
//! that outlives its page or its run changes nothing.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod config;
mod driver;
mod error;
mod event;
mod notice;
mod page;
pub mod render;
mod reveal;
mod runtime;
mod ticket;
mod time;
pub mod views;

pub use action::{ApiCall, AppAction};
pub use app::App;
pub use bridge::Bridge;
pub use config::AppConfig;
pub use driver::Driver;
pub use error::ViewError;
pub use event::{ApiReply, AppEvent, Attachment, FromReply, Intent, payload};
pub use notice::{Banner, Notice, Tone};
pub use page::Page;
pub use reveal::RevealBoard;
pub use runtime::{DEFAULT_TICK, Runtime};
pub use ticket::{Ticket, Tickets};
pub use time::{Moment, Timers};
