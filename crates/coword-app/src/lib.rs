//! Application layer for CoWord
//!
//! Line command parsing and a generic runtime that drives the
//! [`coword_client::Client`] state machine over any I/O backend, so the same
//! orchestration runs in the CLI and in tests.
//!
//! # Components
//!
//! - [`Command`]: parsed input line
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod command;
mod driver;
mod event;
mod runtime;

pub use command::Command;
pub use driver::Driver;
pub use event::AppEvent;
pub use runtime::Runtime;
