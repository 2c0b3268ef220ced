//! Fuzz target for the client state machine
//!
//! Drives [`Client::handle`] with arbitrary interleavings of socket lifecycle
//! events, timer firings, server frames, and user input, replaying the
//! returned actions the way a driver would.
//!
//! # Invariants
//!
//! - At most one socket is open or opening
//! - At most one reconnect timer is pending
//! - Every notification gets exactly one dismiss timer
//! - The queue never holds more than three notifications
//! - The input buffer never holds more than five letters
//! - NEVER panic

#![no_main]

use std::collections::{HashMap, HashSet};

use arbitrary::Arbitrary;
use coword_client::{
    Client, ClientAction, ClientConfig, ClientEvent, KeyInput, NotificationId, SocketId, Timer,
};
use coword_proto::GameId;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Connect,
    Disconnect,
    OpenLive,
    CloseLive,
    CloseOldest,
    Frame { template: u8, turn_is_mine: bool, guesses: u8 },
    FireRetry,
    FireDismiss { index: u8 },
    Key(Key),
    CreateGame,
    JoinGame { code: String },
    NewGame,
    LeaveGame,
    Dismiss { index: u8 },
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Key {
    Char(char),
    Backspace,
    Enter,
}

const WORDS: [&str; 6] = ["CRANE", "SLATE", "PIOUS", "MOUNT", "LIGHT", "BRICK"];

fn frame(template: u8, turn_is_mine: bool, guesses: u8) -> String {
    let turn = if turn_is_mine { "P1" } else { "P2" };
    let guesses: Vec<String> = WORDS
        .iter()
        .take(usize::from(guesses % 7))
        .map(|w| format!(r#"{{"word":"{w}","status":["gray","yellow","green","gray","gray"]}}"#))
        .collect();
    let board = format!(
        r#"{{"currentTurn":"{turn}","guesses":[{}],"gameStatus":"inProgress","keyboardStatus":{{"C":"green"}},"players":["P1","P2"]}}"#,
        guesses.join(",")
    );

    match template % 8 {
        0 => r#"{"status":"welcome","playerId":"P1"}"#.to_string(),
        1 => r#"{"status":"created","gameId":"ABCDE","gameStatus":"waiting"}"#.to_string(),
        2 => format!(r#"{{"status":"joined","gameId":"ABCDE","boardState":{board}}}"#),
        3 => format!(r#"{{"status":"gameUpdate","boardState":{board}}}"#),
        4 => format!(r#"{{"status":"newGame","boardState":{board}}}"#),
        5 => format!(r#"{{"status":"exited","boardState":{board}}}"#),
        6 => r#"{"status":"error","error":{"type":"notYourTurn","message":"Wait"}}"#.to_string(),
        _ => "not json".to_string(),
    }
}

/// Driver-side view of outstanding sockets and timers.
#[derive(Default)]
struct World {
    sockets: Vec<SocketId>,
    retry: HashSet<Timer>,
    dismiss: HashMap<NotificationId, usize>,
    dismiss_order: Vec<NotificationId>,
}

impl World {
    fn apply(&mut self, actions: Vec<ClientAction>) {
        for action in actions {
            match action {
                ClientAction::Open { socket, .. } => self.sockets.push(socket),
                ClientAction::Close { socket } => self.sockets.retain(|s| *s != socket),
                ClientAction::ScheduleTimer { timer: timer @ Timer::Retry(_), .. } => {
                    self.retry.insert(timer);
                },
                ClientAction::CancelTimer(timer @ Timer::Retry(_)) => {
                    self.retry.remove(&timer);
                },
                ClientAction::ScheduleTimer { timer: Timer::Dismiss(id), .. } => {
                    *self.dismiss.entry(id).or_default() += 1;
                    self.dismiss_order.push(id);
                },
                ClientAction::CancelTimer(Timer::Dismiss(id)) => {
                    self.dismiss_order.retain(|d| *d != id);
                },
                ClientAction::Send { .. } | ClientAction::Render => {},
            }
        }
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let Ok(mut client) = Client::new(ClientConfig::default()) else {
        return;
    };
    let mut world = World::default();

    for op in ops.into_iter().take(200) {
        let live = client.connection().socket();
        let event = match op {
            Op::Connect => Some(ClientEvent::Connect),
            Op::Disconnect => Some(ClientEvent::Disconnect),
            Op::OpenLive => live.map(ClientEvent::SocketOpened),
            Op::CloseLive => live.map(|s| {
                world.sockets.retain(|x| *x != s);
                ClientEvent::SocketClosed(s)
            }),
            Op::CloseOldest => world.sockets.first().copied().map(|s| {
                world.sockets.retain(|x| *x != s);
                ClientEvent::SocketClosed(s)
            }),
            Op::Frame { template, turn_is_mine, guesses } => live.map(|socket| {
                ClientEvent::FrameReceived { socket, text: frame(template, turn_is_mine, guesses) }
            }),
            Op::FireRetry => {
                let timer = world.retry.iter().next().copied();
                timer.map(|t| {
                    world.retry.remove(&t);
                    ClientEvent::TimerFired(t)
                })
            },
            Op::FireDismiss { index } => {
                if world.dismiss_order.is_empty() {
                    None
                } else {
                    let id = world.dismiss_order.remove(usize::from(index) % world.dismiss_order.len());
                    Some(ClientEvent::TimerFired(Timer::Dismiss(id)))
                }
            },
            Op::Key(Key::Char(c)) => Some(ClientEvent::Key(KeyInput::Char(c))),
            Op::Key(Key::Backspace) => Some(ClientEvent::Key(KeyInput::Backspace)),
            Op::Key(Key::Enter) => Some(ClientEvent::Key(KeyInput::Enter)),
            Op::CreateGame => Some(ClientEvent::CreateGame),
            Op::JoinGame { code } => Some(ClientEvent::JoinGame { game_id: GameId::new(code) }),
            Op::NewGame => Some(ClientEvent::NewGame),
            Op::LeaveGame => Some(ClientEvent::LeaveGame),
            Op::Dismiss { index } => {
                let ids: Vec<_> = client.notifications().iter().map(|n| n.id).collect();
                if ids.is_empty() {
                    None
                } else {
                    Some(ClientEvent::Dismiss(ids[usize::from(index) % ids.len()]))
                }
            },
        };

        let Some(event) = event else { continue };
        world.apply(client.handle(event));

        assert!(world.sockets.len() <= 1, "multiple live sockets: {:?}", world.sockets);
        assert!(world.retry.len() <= 1, "multiple retry timers: {:?}", world.retry);
        assert!(world.dismiss.values().all(|n| *n == 1), "duplicate dismiss timers");
        assert!(client.notifications().len() <= 3);
        assert!(client.buffer().len() <= 5);
    }
});
