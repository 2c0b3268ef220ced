//! Runtime tests against a scripted driver.
//!
//! The mock driver replays a fixed list of events and records every I/O
//! request, so each test reads as "user and server did X, runtime asked for
//! Y".
//!
//! Socket ids are allocated by the client, so scripted events that refer to
//! the first socket are built by draining a scratch client through the same
//! `Connect` event.

#![allow(clippy::expect_used)]

use std::{collections::VecDeque, convert::Infallible, time::Duration};

use coword_app::{AppEvent, Driver, Runtime};
use coword_client::{Client, ClientAction, ClientConfig, ClientEvent, ClientView, SocketId, Timer};
use coword_proto::{GameId, GameStatus, PlayerId, ServerMessage};

/// Driver that replays scripted events and records requests.
#[derive(Debug, Default)]
struct MockDriver {
    script: VecDeque<AppEvent>,
    opened: Vec<(SocketId, String)>,
    sent: Vec<String>,
    closed: Vec<SocketId>,
    scheduled: Vec<(Timer, Duration)>,
    cancelled: Vec<Timer>,
    renders: Vec<ClientView>,
    stopped: bool,
}

impl MockDriver {
    fn new(script: impl IntoIterator<Item = AppEvent>) -> Self {
        Self { script: script.into_iter().collect(), ..Self::default() }
    }
}

impl Driver for MockDriver {
    type Error = Infallible;

    async fn next_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        Ok(self.script.pop_front())
    }

    fn open(&mut self, socket: SocketId, endpoint: &str) {
        self.opened.push((socket, endpoint.to_string()));
    }

    async fn send(&mut self, _socket: SocketId, text: String) -> Result<(), Self::Error> {
        self.sent.push(text);
        Ok(())
    }

    fn close(&mut self, socket: SocketId) {
        self.closed.push(socket);
    }

    fn schedule(&mut self, timer: Timer, after: Duration) {
        self.scheduled.push((timer, after));
    }

    fn cancel(&mut self, timer: Timer) {
        self.cancelled.push(timer);
    }

    fn render(&mut self, view: &ClientView) -> Result<(), Self::Error> {
        self.renders.push(view.clone());
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Socket id the runtime's client will allocate on its first connect.
fn first_socket() -> SocketId {
    let mut scratch = Client::new(ClientConfig::default()).expect("valid config");
    scratch
        .handle(ClientEvent::Connect)
        .into_iter()
        .find_map(|a| match a {
            ClientAction::Open { socket, .. } => Some(socket),
            _ => None,
        })
        .expect("connect opens a socket")
}

fn frame(socket: SocketId, message: &ServerMessage) -> AppEvent {
    AppEvent::Client(ClientEvent::FrameReceived {
        socket,
        text: message.encode().expect("server message encodes"),
    })
}

fn line(text: &str) -> AppEvent {
    AppEvent::Line(text.to_string())
}

async fn run(script: Vec<AppEvent>) -> MockDriver {
    let client = Client::new(ClientConfig::default()).expect("valid config");
    let mut runtime = Runtime::new(MockDriver::new(script), client);
    let Ok(()) = runtime.run().await;
    runtime.into_driver()
}

#[tokio::test]
async fn connects_on_start_and_stops_at_end_of_input() {
    let driver = run(vec![]).await;

    assert_eq!(driver.opened.len(), 1);
    assert_eq!(driver.opened[0].1, "ws://localhost:5905/ws");
    assert!(driver.stopped);
}

#[tokio::test]
async fn create_game_round_trip() {
    let socket = first_socket();
    let driver = run(vec![
        AppEvent::Client(ClientEvent::SocketOpened(socket)),
        frame(socket, &ServerMessage::Welcome { player_id: PlayerId::new("P1"), message: None }),
        line("/create"),
        frame(socket, &ServerMessage::Created {
            game_id: GameId::new("ABCDE"),
            game_status: GameStatus::Waiting,
        }),
    ])
    .await;

    assert_eq!(driver.sent, vec![
        r#"{"action":"connect"}"#.to_string(),
        r#"{"action":"createGame"}"#.to_string(),
        r#"{"action":"disconnectPlayer"}"#.to_string(),
    ]);
    assert_eq!(driver.closed, vec![socket]);

    let last_in_game = driver
        .renders
        .iter()
        .rev()
        .find(|v| v.session.game_id.is_some())
        .expect("a render showed the match");
    assert_eq!(last_in_game.session.game_id, Some(GameId::new("ABCDE")));
    assert_eq!(last_in_game.game.as_ref().map(|g| g.game_status), Some(GameStatus::Waiting));
}

#[tokio::test]
async fn unknown_command_raises_notification_with_timer() {
    let driver = run(vec![line("/shout")]).await;

    let last = driver.renders.last().expect("rendered");
    assert_eq!(last.notifications.len(), 1);
    assert_eq!(last.notifications[0].payload.text(), "Unknown command: /shout");
    assert!(driver.scheduled.iter().any(|(t, _)| matches!(t, Timer::Dismiss(_))));
}

#[tokio::test]
async fn quit_stops_before_remaining_script() {
    let socket = first_socket();
    let driver = run(vec![
        AppEvent::Client(ClientEvent::SocketOpened(socket)),
        line("/quit"),
        line("/create"),
    ])
    .await;

    assert_eq!(driver.sent, vec![r#"{"action":"connect"}"#.to_string()]);
    assert_eq!(driver.closed, vec![socket]);
    assert!(driver.stopped);
}

#[tokio::test]
async fn unexpected_close_schedules_retry() {
    let socket = first_socket();
    let driver = run(vec![
        AppEvent::Client(ClientEvent::SocketOpened(socket)),
        AppEvent::Client(ClientEvent::SocketClosed(socket)),
    ])
    .await;

    let retries: Vec<_> =
        driver.scheduled.iter().filter(|(t, _)| matches!(t, Timer::Retry(_))).collect();
    assert_eq!(retries.len(), 1);
    assert_eq!(retries[0].1, Duration::from_millis(500));
    // The final disconnect cancels the pending retry.
    assert!(driver.cancelled.iter().any(|t| matches!(t, Timer::Retry(_))));
}
