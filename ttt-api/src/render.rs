//! Text rendering of boards and results for chat replies.

use ttt_core::{Board, GameState, Player};

/// Emoji shown for each cell occupant.
pub fn glyph(player: Player) -> &'static str {
    match player {
        Player::One => "❌",
        Player::Two => "⚫",
        Player::None => "⬜",
    }
}

/// Render the board as three lines of emoji followed by the legend.
/// A non-empty prefix goes on top, separated by a blank line.
pub fn board_message(prefix: &str, board: &Board) -> String {
    let mut s = String::new();
    if !prefix.is_empty() {
        s.push_str(prefix);
        s.push_str("\n\n");
    }
    for row in board.cells().chunks(3) {
        for &cell in row {
            s.push_str(glyph(cell));
        }
        s.push('\n');
    }
    s.push_str(&format!("{} is your piece.\n", glyph(Player::One)));
    s.push_str(&format!("{} is the AI's piece.", glyph(Player::Two)));
    s
}

/// Announcement for a finished game, `None` while it is still going.
pub fn game_over_message(state: GameState) -> Option<String> {
    if !state.ended {
        return None;
    }
    Some(match state.winner {
        Player::None => "The game is over. It's a draw!".to_string(),
        winner => format!("The game is over. {} wins!", glyph(winner)),
    })
}
