//! WASM bindings for ttt-core
//!
//! Provides a JavaScript-friendly API for the game logic and the AI.

use wasm_bindgen::prelude::*;

use crate::{ai, Game, Player};

fn player_from_u8(player: u8) -> Player {
    match player {
        1 => Player::One,
        2 => Player::Two,
        _ => Player::None,
    }
}

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game with an empty board
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { inner: Game::new() }
    }

    /// Player to move (1 or 2)
    pub fn turn(&self) -> u8 {
        self.inner.turn() as u8
    }

    /// Number of moves played
    pub fn turns(&self) -> u32 {
        self.inner.turns()
    }

    /// Cells in row-major order: 0 (empty), 1 (P1), 2 (P2)
    pub fn cells(&self) -> Vec<u8> {
        self.inner.board().cells().iter().map(|&p| p as u8).collect()
    }

    /// Winner: 0 (none or draw), 1 (P1), or 2 (P2)
    pub fn winner(&self) -> u8 {
        self.inner.state().winner as u8
    }

    /// Check if the game is over (a line is complete or the board is full)
    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.state().ended
    }

    /// Winning line as cell indices, empty if no line is complete
    #[wasm_bindgen(js_name = winningLine)]
    pub fn winning_line(&self) -> Vec<u8> {
        self.inner
            .board()
            .winning_line()
            .map(|line| line.iter().map(|pos| pos.index() as u8).collect())
            .unwrap_or_default()
    }

    /// Play the current player's piece at a 0-based index.
    /// Returns true if the move was applied.
    #[wasm_bindgen(js_name = makeMove)]
    pub fn make_move(&mut self, index: i32) -> bool {
        self.inner.make_move_at_index(index).unwrap_or(false)
    }

    /// Let the AI play for `player`. Returns the index played, or -1 if
    /// it isn't that player's turn or the game is over.
    #[wasm_bindgen(js_name = aiMove)]
    pub fn ai_move(&mut self, player: u8) -> i32 {
        match ai::next_move(&self.inner, player_from_u8(player)) {
            Some(pos) if self.inner.make_move(pos) => pos.index() as i32,
            _ => -1,
        }
    }

    /// Minimax value of each legal move for `player` as JSON
    /// Each entry is { position: { row, col }, value: -1 | 0 | 1 }
    #[wasm_bindgen(js_name = moveEvaluations)]
    pub fn move_evaluations(&self, player: u8) -> Result<JsValue, JsError> {
        let evals = ai::evaluate_moves(&self.inner, player_from_u8(player));
        Ok(serde_wasm_bindgen::to_value(&evals)?)
    }

    /// Clone the game
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_game(&self) -> WasmGame {
        WasmGame { inner: self.inner }
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasm_game_flow() {
        let mut game = WasmGame::new();
        assert_eq!(game.turn(), 1);
        assert!(game.make_move(4));
        assert!(!game.make_move(4));
        assert!(!game.make_move(42));
        assert_eq!(game.ai_move(1), -1);
        assert_eq!(game.ai_move(2), 0);
        assert_eq!(game.cells(), vec![2, 0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(game.turns(), 2);
        assert!(!game.is_game_over());
        assert!(game.winning_line().is_empty());
    }

    #[test]
    fn test_wasm_clone_is_independent() {
        let game = WasmGame::new();
        let mut copy = game.clone_game();
        assert!(copy.make_move(0));
        assert_eq!(game.turns(), 0);
        assert_eq!(copy.turns(), 1);
    }

    #[test]
    fn test_wasm_winner() {
        let mut game = WasmGame::default();
        for i in [0, 3, 1, 4, 2] {
            assert!(game.make_move(i));
        }
        assert_eq!(game.winner(), 1);
        assert!(game.is_game_over());
        assert_eq!(game.winning_line(), vec![0, 1, 2]);
    }
}
