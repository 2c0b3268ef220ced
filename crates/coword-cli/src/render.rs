//! Log-based renderer.
//!
//! Every render emits one structured `tracing` event summarising the view,
//! followed by one line per guess.

use coword_client::ClientView;
use coword_proto::{Guess, LetterColor};

/// Feedback marks for a guess: `G` green, `Y` yellow, `.` gray.
pub fn marks(guess: &Guess) -> String {
    guess
        .status
        .iter()
        .map(|color| match color {
            LetterColor::Green => 'G',
            LetterColor::Yellow => 'Y',
            LetterColor::Gray => '.',
        })
        .collect()
}

/// One board row, e.g. `CRANE ..G.Y`.
pub fn guess_row(guess: &Guess) -> String {
    format!("{} {}", guess.word, marks(guess))
}

/// Letters learned so far, best color first.
pub fn keyboard_line(view: &ClientView) -> String {
    let Some(game) = &view.game else {
        return String::new();
    };

    let by_color = |wanted: LetterColor| -> String {
        game.keyboard_status.iter().filter(|(_, c)| **c == wanted).map(|(k, _)| *k).collect()
    };

    format!(
        "green:{} yellow:{} gray:{}",
        by_color(LetterColor::Green),
        by_color(LetterColor::Yellow),
        by_color(LetterColor::Gray)
    )
}

/// Whose turn it is, from this player's point of view.
pub fn turn_label(view: &ClientView) -> &'static str {
    let Some(game) = &view.game else {
        return "-";
    };
    match &view.session.player_id {
        Some(me) if game.is_turn_of(me) => "yours",
        _ if game.current_turn.is_some() => "opponent",
        _ => "-",
    }
}

/// Emit the view as log lines.
pub fn render(view: &ClientView) {
    let game_id = view.session.game_id.as_ref().map_or("-", |id| id.as_str());
    let status = view.game.as_ref().map(|g| g.game_status);
    let guesses = view.game.as_ref().map_or(0, |g| g.guesses.len());
    let notes: Vec<&str> = view.notifications.iter().map(|n| n.payload.text()).collect();

    tracing::info!(
        connection = ?view.connection,
        game = game_id,
        ?status,
        turn = turn_label(view),
        guesses,
        input = %view.buffer,
        keyboard = %keyboard_line(view),
        ?notes,
        "view"
    );

    if let Some(game) = &view.game {
        for (n, guess) in game.guesses.iter().enumerate() {
            tracing::info!(row = n + 1, "{}", guess_row(guess));
        }
        if let Some(solution) = &game.solution {
            tracing::info!(%solution, "solution");
        }
    }
}
