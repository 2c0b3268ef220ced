//! Connection lifecycle state machine.
//!
//! Owns the single socket handle, the readiness state, and the bounded
//! reconnect policy. Uses the action pattern: methods consume lifecycle events
//! and return [`ConnectionAction`]s for the driver to execute. No I/O happens
//! here, and socket and timer handles are plain ids allocated by the state
//! machine, so events from a superseded socket or a cancelled timer can be
//! recognised and ignored.
//!
//! # State Machine
//!
//! ```text
//!               connect()            open
//!  ┌────────────┐───────────>┌─────────┐
//!  │ Connecting │            │  Open   │
//!  └────────────┘<──┐        └─────────┘
//!        │          │ retry       │ close (unexpected)
//!        │ close    │ timer       ↓
//!        │          │       ┌──────────────┐
//!        └──────────┴──────>│ Reconnecting │
//!                           └──────────────┘
//!                                  │ retries exhausted
//!   disconnect() ┌─────────┐       ↓      ┌────────┐
//!   ────────────>│ Closing │─────────────>│ Closed │
//!                └─────────┘   close      └────────┘
//! ```

use std::{fmt, time::Duration};

use coword_proto::{ClientMessage, ServerMessage};

use crate::{
    config::ConnectionConfig,
    error::ConnectionError,
    notification::{NotificationPayload, NotificationQueue},
    store::Session,
};

/// Shown once the retry budget is exhausted.
pub const CONNECTION_LOST_MESSAGE: &str = "Connection to server lost";

/// Shown when a message is dropped because the socket is not open.
pub const NOT_CONNECTED_MESSAGE: &str = "Not connected to server";

/// Handle of one socket opened by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SocketId(u64);

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "socket-{}", self.0)
    }
}

/// Handle of one scheduled reconnect timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Actions returned by the connection state machine.
///
/// The driver executes these in order:
/// - `Open`: start connecting a new socket to `endpoint`
/// - `Send`: write one text frame on `socket`
/// - `Close`: close `socket`
/// - `ScheduleRetry`: fire `timer` once after `after`
/// - `CancelRetry`: discard `timer` if it has not fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Open a new socket.
    Open {
        /// Handle the driver reports events under
        socket: SocketId,
        /// Address to connect to
        endpoint: String,
    },
    /// Send a text frame.
    Send {
        /// Target socket
        socket: SocketId,
        /// Encoded JSON frame
        text: String,
    },
    /// Close a socket.
    Close {
        /// Socket to close
        socket: SocketId,
    },
    /// Schedule the reconnect timer.
    ScheduleRetry {
        /// Handle reported back when the timer fires
        timer: TimerId,
        /// Delay before firing
        after: Duration,
    },
    /// Cancel a previously scheduled reconnect timer.
    CancelRetry {
        /// Timer to cancel
        timer: TimerId,
    },
}

/// Readiness of the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket opening (initial state).
    Connecting,
    /// Socket open, messages flow.
    Open,
    /// Socket dropped, a retry is scheduled.
    Reconnecting,
    /// Manual disconnect in progress.
    Closing,
    /// No socket and no retry pending.
    Closed,
}

/// Connection state machine.
///
/// Invariants:
/// - at most one live socket handle
/// - at most one pending retry timer
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    state: ConnectionState,
    config: ConnectionConfig,
    /// Live socket. `None` between a close and the next `connect`.
    socket: Option<SocketId>,
    /// Reconnect attempts since the last successful open.
    retries: u32,
    /// Scheduled reconnect timer, if any.
    pending_retry: Option<TimerId>,
    /// Set by `disconnect`, suppresses auto-reconnect.
    manual_close: bool,
    next_socket: u64,
    next_timer: u64,
}

impl ConnectionManager {
    /// Create a connection in [`ConnectionState::Connecting`] with no socket.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            state: ConnectionState::Connecting,
            config,
            socket: None,
            retries: 0,
            pending_retry: None,
            manual_close: false,
            next_socket: 0,
            next_timer: 0,
        }
    }

    /// Current readiness state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Live socket handle. `None` if no socket is open or opening.
    pub fn socket(&self) -> Option<SocketId> {
        self.socket
    }

    /// Reconnect attempts since the last successful open.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Scheduled reconnect timer. `None` if no retry is pending.
    pub fn pending_retry(&self) -> Option<TimerId> {
        self.pending_retry
    }

    /// Whether `disconnect` was called since the last `connect`.
    pub fn is_manually_closed(&self) -> bool {
        self.manual_close
    }

    /// Connection configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Open a new socket.
    ///
    /// No-op if a socket is already open or opening. Otherwise restores the
    /// full retry budget, clears the manual-close flag, cancels any pending
    /// retry, and supersedes any previous socket handle.
    pub fn connect(&mut self) -> Vec<ConnectionAction> {
        if let Some(socket) = self.socket
            && matches!(self.state, ConnectionState::Connecting | ConnectionState::Open)
        {
            tracing::debug!(%socket, state = ?self.state, "connect ignored, socket already live");
            return vec![];
        }

        self.retries = 0;
        self.open_socket()
    }

    fn open_socket(&mut self) -> Vec<ConnectionAction> {
        self.manual_close = false;

        let mut actions = Vec::new();
        self.cancel_retry(&mut actions);
        if let Some(old) = self.socket.take() {
            actions.push(ConnectionAction::Close { socket: old });
        }

        self.next_socket += 1;
        let socket = SocketId(self.next_socket);
        self.socket = Some(socket);
        self.state = ConnectionState::Connecting;

        tracing::info!(%socket, endpoint = %self.config.endpoint, "connecting");
        actions.push(ConnectionAction::Open { socket, endpoint: self.config.endpoint.clone() });
        actions
    }

    /// Socket finished opening.
    ///
    /// Resets the retry budget and sends `connect` carrying the known session
    /// ids so the server can resume the match.
    pub fn on_open(&mut self, socket: SocketId, session: &Session) -> Vec<ConnectionAction> {
        if self.socket != Some(socket) {
            tracing::debug!(%socket, "ignoring open for superseded socket");
            return vec![];
        }

        self.retries = 0;
        self.state = ConnectionState::Open;
        tracing::info!(%socket, "connection open");

        let hello = ClientMessage::Connect {
            game_id: session.game_id.clone(),
            player_id: session.player_id.clone(),
        };
        match hello.encode() {
            Ok(text) => vec![ConnectionAction::Send { socket, text }],
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode connect message");
                vec![]
            },
        }
    }

    /// Decode an inbound text frame.
    ///
    /// Returns `None` for frames from a superseded socket and for frames that
    /// fail to decode. Decode failures are logged, never surfaced.
    pub fn on_frame(&mut self, socket: SocketId, raw: &str) -> Option<ServerMessage> {
        if self.socket != Some(socket) {
            tracing::debug!(%socket, "dropping frame from superseded socket");
            return None;
        }

        match ServerMessage::decode(raw) {
            Ok(message) => {
                tracing::debug!(%socket, kind = message.kind().as_str(), "frame received");
                Some(message)
            },
            Err(e) => {
                tracing::warn!(%socket, error = %e, "dropping undecodable frame");
                None
            },
        }
    }

    /// Socket closed.
    ///
    /// After a manual disconnect this settles in `Closed`. Otherwise it either
    /// schedules exactly one retry or, once the retry budget is spent, moves
    /// to `Closed` and raises a single connectivity-lost notification.
    pub fn on_close(
        &mut self,
        socket: SocketId,
        notifications: &mut NotificationQueue,
    ) -> Vec<ConnectionAction> {
        if let Some(live) = self.socket
            && live != socket
        {
            tracing::debug!(%socket, %live, "ignoring close for superseded socket");
            return vec![];
        }

        self.socket = None;
        let mut actions = Vec::new();

        if self.manual_close {
            self.state = ConnectionState::Closed;
            tracing::info!(%socket, "connection closed");
            return actions;
        }

        if self.retries >= self.config.max_reconnect_attempts {
            self.cancel_retry(&mut actions);
            if self.state != ConnectionState::Closed {
                tracing::warn!(retries = self.retries, "reconnect attempts exhausted");
                notifications.enqueue(NotificationPayload::message(CONNECTION_LOST_MESSAGE));
            }
            self.state = ConnectionState::Closed;
            return actions;
        }

        self.state = ConnectionState::Reconnecting;
        self.retries += 1;
        self.cancel_retry(&mut actions);

        self.next_timer += 1;
        let timer = TimerId(self.next_timer);
        self.pending_retry = Some(timer);

        tracing::info!(
            %socket,
            attempt = self.retries,
            max = self.config.max_reconnect_attempts,
            "connection dropped, scheduling reconnect"
        );
        actions.push(ConnectionAction::ScheduleRetry { timer, after: self.config.retry_interval });
        actions
    }

    /// Reconnect timer fired.
    pub fn on_retry_timer(&mut self, timer: TimerId) -> Vec<ConnectionAction> {
        if self.pending_retry != Some(timer) {
            tracing::debug!(%timer, "ignoring stale retry timer");
            return vec![];
        }

        self.pending_retry = None;
        if self.manual_close {
            return vec![];
        }
        self.open_socket()
    }

    /// Send a message if the socket is open.
    ///
    /// Otherwise the message is dropped and a notification raised. There is
    /// no buffering and no redelivery.
    pub fn send(
        &mut self,
        message: &ClientMessage,
        notifications: &mut NotificationQueue,
    ) -> Vec<ConnectionAction> {
        match self.try_send(message) {
            Ok(action) => vec![action],
            Err(e) => {
                tracing::debug!(action = message.action(), error = %e, "message dropped");
                let text = match e {
                    ConnectionError::NotConnected { .. } => NOT_CONNECTED_MESSAGE,
                    ConnectionError::Protocol(_) => "Failed to send message",
                };
                notifications.enqueue(NotificationPayload::message(text));
                vec![]
            },
        }
    }

    /// Build the send action for `message`.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::NotConnected` if the state is not `Open`
    /// - `ConnectionError::Protocol` if the message fails to encode
    pub fn try_send(&self, message: &ClientMessage) -> Result<ConnectionAction, ConnectionError> {
        let socket = match (self.state, self.socket) {
            (ConnectionState::Open, Some(socket)) => socket,
            (state, _) => return Err(ConnectionError::NotConnected { state }),
        };

        let text = message.encode()?;
        Ok(ConnectionAction::Send { socket, text })
    }

    /// Close the connection and suppress all future auto-reconnect.
    pub fn disconnect(&mut self) -> Vec<ConnectionAction> {
        self.manual_close = true;

        let mut actions = Vec::new();
        self.cancel_retry(&mut actions);

        match self.socket.take() {
            Some(socket) => {
                self.state = ConnectionState::Closing;
                tracing::info!(%socket, "disconnecting");
                actions.push(ConnectionAction::Close { socket });
            },
            None => self.state = ConnectionState::Closed,
        }

        actions
    }

    fn cancel_retry(&mut self, actions: &mut Vec<ConnectionAction>) {
        if let Some(timer) = self.pending_retry.take() {
            actions.push(ConnectionAction::CancelRetry { timer });
        }
    }
}
