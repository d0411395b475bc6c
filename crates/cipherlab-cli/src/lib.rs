//! Cipherlab command-line front end
//!
//! Each subcommand expands to a script of user intents that a
//! [`ConsoleDriver`] replays through the same [`cipherlab_app::Runtime`]
//! and [`cipherlab_app::App`] the tests use. The final page is printed as
//! HTML.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod console;

pub use cli::{Cli, CliError, Command, Flow};
pub use console::{ConsoleDriver, ConsoleError};
