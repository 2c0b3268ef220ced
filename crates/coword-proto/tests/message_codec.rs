//! Wire format tests for client and server messages.
//!
//! Client frames are pinned with inline snapshots so that any change to the
//! JSON the server sees is a deliberate one. Server frames are decoded from
//! literal JSON the way the server emits it.

#![allow(clippy::expect_used)]

use coword_proto::{
    BoardState, ClientMessage, GameId, GameStatus, Guess, KeyboardStatus, LetterColor, PlayerId,
    ProtocolError, ServerError, ServerMessage, ServerMessageKind,
};
use proptest::prelude::*;

fn encode(msg: &ClientMessage) -> String {
    msg.encode().expect("client messages always encode")
}

#[test]
fn connect_carries_known_session() {
    let msg = ClientMessage::Connect {
        game_id: Some(GameId::new("ABCDE")),
        player_id: Some(PlayerId::new("P1")),
    };
    insta::assert_snapshot!(encode(&msg), @r#"{"action":"connect","gameId":"ABCDE","playerId":"P1"}"#);
}

#[test]
fn connect_without_session_omits_ids() {
    let msg = ClientMessage::Connect { game_id: None, player_id: None };
    insta::assert_snapshot!(encode(&msg), @r#"{"action":"connect"}"#);
}

#[test]
fn intent_frames() {
    insta::assert_snapshot!(encode(&ClientMessage::CreateGame), @r#"{"action":"createGame"}"#);
    insta::assert_snapshot!(
        encode(&ClientMessage::JoinGame { game_id: GameId::new("ABCDE") }),
        @r#"{"action":"joinGame","gameId":"ABCDE"}"#
    );
    insta::assert_snapshot!(
        encode(&ClientMessage::GuessWord { word: "CRANE".into() }),
        @r#"{"action":"guessWord","word":"CRANE"}"#
    );
    insta::assert_snapshot!(encode(&ClientMessage::NewGame), @r#"{"action":"newGame"}"#);
    insta::assert_snapshot!(
        encode(&ClientMessage::DisconnectPlayer),
        @r#"{"action":"disconnectPlayer"}"#
    );
}

#[test]
fn encoded_frames_are_single_line() {
    let msg = ClientMessage::GuessWord { word: "CRANE".into() };
    assert!(!encode(&msg).contains('\n'));
}

#[test]
fn decode_welcome() {
    let msg = ServerMessage::decode(r#"{"status":"welcome","playerId":"P1","message":"hi"}"#)
        .expect("valid welcome");

    assert_eq!(msg, ServerMessage::Welcome {
        player_id: PlayerId::new("P1"),
        message: Some("hi".into()),
    });
}

#[test]
fn decode_created() {
    let msg = ServerMessage::decode(r#"{"status":"created","gameId":"ABCDE","gameStatus":"waiting"}"#)
        .expect("valid created");

    assert_eq!(msg, ServerMessage::Created {
        game_id: GameId::new("ABCDE"),
        game_status: GameStatus::Waiting,
    });
}

#[test]
fn decode_joined_with_board() {
    let raw = r#"{
        "status": "joined",
        "gameId": "ABCDE",
        "solution": null,
        "boardState": {
            "currentTurn": "P2",
            "guesses": [{"word": "CRANE", "status": ["gray", "yellow", "green", "gray", "gray"]}],
            "gameStatus": "inProgress",
            "keyboardStatus": {"C": "gray", "R": "yellow", "A": "green"},
            "players": ["P1", "P2"]
        }
    }"#;

    let msg = ServerMessage::decode(raw).expect("valid joined");
    let expected_board = BoardState {
        current_turn: PlayerId::new("P2"),
        guesses: vec![Guess {
            word: "CRANE".into(),
            status: [
                LetterColor::Gray,
                LetterColor::Yellow,
                LetterColor::Green,
                LetterColor::Gray,
                LetterColor::Gray,
            ],
        }],
        game_status: GameStatus::InProgress,
        keyboard_status: KeyboardStatus::from([
            ('A', LetterColor::Green),
            ('C', LetterColor::Gray),
            ('R', LetterColor::Yellow),
        ]),
        players: vec![PlayerId::new("P1"), PlayerId::new("P2")],
    };

    assert_eq!(msg, ServerMessage::Joined {
        game_id: GameId::new("ABCDE"),
        solution: None,
        board_state: expected_board,
    });
    assert_eq!(msg.kind(), ServerMessageKind::Joined);
}

#[test]
fn decode_error_event() {
    let raw = r#"{"status":"error","error":{"type":"notYourTurn","message":"Wait for your turn"}}"#;
    let msg = ServerMessage::decode(raw).expect("valid error");

    assert_eq!(msg, ServerMessage::Error {
        error: ServerError { kind: "notYourTurn".into(), message: "Wait for your turn".into() },
    });
}

#[test]
fn guess_with_four_colors_is_malformed() {
    let raw = r#"{
        "status": "gameUpdate",
        "boardState": {
            "currentTurn": "P1",
            "guesses": [{"word": "CRANE", "status": ["gray", "gray", "gray", "gray"]}],
            "gameStatus": "inProgress",
            "keyboardStatus": {},
            "players": ["P1", "P2"]
        }
    }"#;

    assert!(matches!(
        ServerMessage::decode(raw),
        Err(ProtocolError::Malformed { kind: "gameUpdate", .. })
    ));
}

#[test]
fn seven_guesses_is_invalid_board() {
    let guess = r#"{"word":"CRANE","status":["gray","gray","gray","gray","gray"]}"#;
    let guesses = vec![guess; 7].join(",");
    let raw = format!(
        r#"{{"status":"gameUpdate","boardState":{{"currentTurn":"P1","guesses":[{guesses}],"gameStatus":"lost","keyboardStatus":{{}},"players":["P1","P2"]}}}}"#
    );

    assert!(matches!(ServerMessage::decode(&raw), Err(ProtocolError::InvalidBoard(_))));
}

#[test]
fn unknown_color_is_malformed() {
    let raw = r#"{
        "status": "newGame",
        "boardState": {
            "currentTurn": "P1",
            "guesses": [],
            "gameStatus": "inProgress",
            "keyboardStatus": {"Q": "purple"},
            "players": ["P1", "P2"]
        }
    }"#;

    assert!(matches!(
        ServerMessage::decode(raw),
        Err(ProtocolError::Malformed { kind: "newGame", .. })
    ));
}

proptest! {
    /// Arbitrary text never panics the decoder.
    #[test]
    fn prop_decode_never_panics(raw in ".*") {
        let _ = ServerMessage::decode(&raw);
    }

    /// Frames with an arbitrary discriminant decode only if the kind is known.
    #[test]
    fn prop_unknown_discriminant_rejected(tag in "[a-zA-Z]{1,12}") {
        prop_assume!(ServerMessageKind::from_tag(&tag).is_none());
        let raw = format!(r#"{{"status":"{tag}"}}"#);
        prop_assert_eq!(ServerMessage::decode(&raw), Err(ProtocolError::UnknownKind(tag)));
    }
}
