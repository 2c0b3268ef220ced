//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, time::Duration};

use coword_client::{ClientView, SocketId, Timer};

use crate::AppEvent;

/// Abstracts I/O operations for the runtime.
///
/// Socket and timer operations only start work. Their outcomes come back
/// later through [`Driver::next_event`] as
/// [`ClientEvent`](coword_client::ClientEvent)s tagged with the same
/// [`SocketId`] or [`Timer`].
///
/// # Implementations
///
/// - **CLI**: tokio-tungstenite sockets, tokio timers, stdin lines
/// - **Tests**: scripted events, recorded actions
pub trait Driver {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next event.
    ///
    /// Returns `None` once input is exhausted.
    fn next_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>>;

    /// Start opening a socket to `endpoint`.
    ///
    /// Must eventually report `SocketOpened` or `SocketClosed` for `socket`.
    fn open(&mut self, socket: SocketId, endpoint: &str);

    /// Send a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket is gone or the send fails.
    fn send(
        &mut self,
        socket: SocketId,
        text: String,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Start closing a socket.
    fn close(&mut self, socket: SocketId);

    /// Fire `timer` once after `after`.
    fn schedule(&mut self, timer: Timer, after: Duration);

    /// Discard `timer` if it has not fired.
    fn cancel(&mut self, timer: Timer);

    /// Render the client state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, view: &ClientView) -> Result<(), Self::Error>;

    /// Release all resources.
    fn stop(&mut self);
}
