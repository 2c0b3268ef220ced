//! Client events and actions.

use std::time::Duration;

use coword_proto::GameId;

use crate::{
    connection::{ConnectionAction, SocketId, TimerId},
    input::KeyInput,
    notification::NotificationId,
};

/// Timers the client asks the caller to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Reconnect after an unexpected close.
    Retry(TimerId),
    /// Expire a notification.
    Dismiss(NotificationId),
}

/// Events the caller feeds into the client.
///
/// The caller is responsible for:
/// - Reporting socket lifecycle and inbound frames
/// - Firing the timers it was asked to schedule
/// - Forwarding user intents (keys, create, join, leave)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Open the connection.
    Connect,

    /// Leave any match and close the connection for good.
    Disconnect,

    /// Socket finished opening.
    SocketOpened(SocketId),

    /// Text frame received.
    FrameReceived {
        /// Socket the frame arrived on.
        socket: SocketId,
        /// Raw frame text.
        text: String,
    },

    /// Socket closed or failed.
    SocketClosed(SocketId),

    /// A scheduled timer fired.
    TimerFired(Timer),

    /// Key pressed.
    Key(KeyInput),

    /// Ask the server for a new match.
    CreateGame,

    /// Join an existing match by code.
    JoinGame {
        /// Code shared by the other player.
        game_id: GameId,
    },

    /// Start another match with the same opponent.
    NewGame,

    /// Leave the current match but stay connected.
    LeaveGame,

    /// User dismissed a notification.
    Dismiss(NotificationId),
}

/// Actions the client produces for the caller to execute, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Open a socket.
    Open {
        /// Handle to report events under.
        socket: SocketId,
        /// Address to connect to.
        endpoint: String,
    },

    /// Send a text frame.
    Send {
        /// Target socket.
        socket: SocketId,
        /// Encoded JSON frame.
        text: String,
    },

    /// Close a socket.
    Close {
        /// Socket to close.
        socket: SocketId,
    },

    /// Fire `timer` once after `after`.
    ScheduleTimer {
        /// Timer to report back via [`ClientEvent::TimerFired`].
        timer: Timer,
        /// Delay before firing.
        after: Duration,
    },

    /// Discard a scheduled timer.
    CancelTimer(Timer),

    /// Visible state may have changed.
    Render,
}

impl From<ConnectionAction> for ClientAction {
    fn from(action: ConnectionAction) -> Self {
        match action {
            ConnectionAction::Open { socket, endpoint } => Self::Open { socket, endpoint },
            ConnectionAction::Send { socket, text } => Self::Send { socket, text },
            ConnectionAction::Close { socket } => Self::Close { socket },
            ConnectionAction::ScheduleRetry { timer, after } => {
                Self::ScheduleTimer { timer: Timer::Retry(timer), after }
            },
            ConnectionAction::CancelRetry { timer } => Self::CancelTimer(Timer::Retry(timer)),
        }
    }
}
