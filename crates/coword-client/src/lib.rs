//! Client
//!
//! Action-based client state machines for the CoWord protocol. Tracks the
//! connection lifecycle, mirrors the server's match state, buffers guess input,
//! and queues user-facing notifications.
//!
//! # Architecture
//!
//! Nothing in this crate performs I/O. The [`Client`] receives events
//! ([`ClientEvent`]), processes each one to completion through pure state
//! machine logic, and returns actions ([`ClientAction`]) for the caller to
//! execute: open or close a socket, send a frame, schedule or cancel a timer,
//! re-render.
//!
//! # Components
//!
//! - [`ConnectionManager`]: socket lifecycle and bounded reconnect policy
//! - [`GameStateStore`]: sole owner of session and match state
//! - [`GuessInputController`]: gated typing and guess submission
//! - [`NotificationQueue`]: bounded queue of user-facing messages
//! - [`Client`]: facade routing events to the components above

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
pub mod config;
pub mod connection;
mod error;
mod event;
pub mod input;
pub mod notification;
pub mod store;

pub use client::{Client, ClientView, INVALID_GAME_CODE_MESSAGE};
pub use config::{ClientConfig, ConnectionConfig};
pub use connection::{ConnectionAction, ConnectionManager, ConnectionState, SocketId, TimerId};
pub use error::{ClientError, ConfigError, ConnectionError};
pub use event::{ClientAction, ClientEvent, Timer};
pub use input::{Gate, GuessInputController, KeyInput, PendingInput};
pub use notification::{Notification, NotificationId, NotificationPayload, NotificationQueue};
pub use store::{
    ChangeCause, GameStateStore, ListenerId, MatchState, Session, StoreChange, StoreSnapshot,
};
