//! Fuzz target for inbound server frame decoding
//!
//! # Strategy
//!
//! - Random text: completely arbitrary frame contents
//! - Deeply nested: JSON arrays/objects nested to arbitrary depth
//! - Wrong discriminant: arbitrary `status` values over a valid body
//! - Shaped board: well-formed JSON with arbitrary board field values
//!
//! # Invariants
//!
//! - NEVER panic on malformed input
//! - A decoded message always carries a board that passes validation
//! - Unknown discriminants are rejected before the body is read

#![no_main]

use arbitrary::Arbitrary;
use coword_proto::{ProtocolError, ServerMessage, ServerMessageKind};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum FrameAttack {
    RandomText { text: String },
    DeeplyNested { depth: u8, object: bool },
    WrongDiscriminant { status: String },
    ShapedBoard { board: BoardShape },
}

#[derive(Debug, Clone, Arbitrary)]
struct BoardShape {
    kind: u8,
    current_turn: String,
    words: Vec<String>,
    colors: Vec<u8>,
    game_status: u8,
    keys: Vec<(char, u8)>,
    players: Vec<String>,
}

const COLORS: [&str; 4] = ["gray", "yellow", "green", "purple"];
const STATUSES: [&str; 6] = ["pending", "waiting", "inProgress", "won", "lost", "paused"];
const BOARD_KINDS: [&str; 4] = ["joined", "gameUpdate", "newGame", "exited"];

fuzz_target!(|attack: FrameAttack| {
    match attack {
        FrameAttack::RandomText { text } => check(&text),

        FrameAttack::DeeplyNested { depth, object } => {
            let depth = usize::from(depth);
            let (open, close) = if object { (r#"{"a":"#, "}") } else { ("[", "]") };
            let body = format!("{}1{}", open.repeat(depth), close.repeat(depth));
            check(&format!(r#"{{"status":"gameUpdate","boardState":{body}}}"#));
            check(&body);
        },

        FrameAttack::WrongDiscriminant { status } => {
            let escaped = status.replace('\\', "\\\\").replace('"', "\\\"");
            let raw = format!(r#"{{"status":"{escaped}","playerId":"P1"}}"#);
            let result = ServerMessage::decode(&raw);
            if ServerMessageKind::from_tag(&status).is_none() {
                assert!(result.is_err(), "unknown status {status:?} decoded");
            }
        },

        FrameAttack::ShapedBoard { board } => check(&shaped(&board)),
    }
});

fn check(raw: &str) {
    match ServerMessage::decode(raw) {
        Ok(message) => {
            if let Some(board) = message.board_state() {
                assert!(board.validate().is_ok(), "decoded an invalid board: {board:?}");
            }
        },
        Err(
            ProtocolError::Json(_)
            | ProtocolError::MissingDiscriminant
            | ProtocolError::UnknownKind(_)
            | ProtocolError::Malformed { .. }
            | ProtocolError::InvalidBoard(_)
            | ProtocolError::Encode(_),
        ) => {},
    }
}

fn quote(s: &str) -> String {
    format!("{s:?}")
}

fn shaped(board: &BoardShape) -> String {
    let color = |n: u8| quote(COLORS[usize::from(n) % COLORS.len()]);

    let guesses: Vec<String> = board
        .words
        .iter()
        .take(10)
        .enumerate()
        .map(|(i, word)| {
            let status: Vec<String> = (0..5)
                .map(|j| color(board.colors.get(i * 5 + j).copied().unwrap_or_default()))
                .collect();
            format!(r#"{{"word":{},"status":[{}]}}"#, quote(word), status.join(","))
        })
        .collect();

    let keys: Vec<String> = board
        .keys
        .iter()
        .take(30)
        .map(|(k, c)| format!("{}:{}", quote(&k.to_string()), color(*c)))
        .collect();

    let players: Vec<String> = board.players.iter().take(4).map(|p| quote(p)).collect();

    format!(
        r#"{{"status":{},"gameId":"ABCDE","boardState":{{"currentTurn":{},"guesses":[{}],"gameStatus":{},"keyboardStatus":{{{}}},"players":[{}]}}}}"#,
        quote(BOARD_KINDS[usize::from(board.kind) % BOARD_KINDS.len()]),
        quote(&board.current_turn),
        guesses.join(","),
        quote(STATUSES[usize::from(board.game_status) % STATUSES.len()]),
        keys.join(","),
        players.join(","),
    )
}
