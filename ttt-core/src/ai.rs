//! Exhaustive minimax opponent.
//!
//! Every position is searched to the end of the game: no pruning, no
//! transposition table. Values are from a fixed player's point of view
//! (+1 win, 0 draw, -1 loss). Among equally good moves the first one in
//! row-major order is kept, so the chosen move is deterministic.

use serde::Serialize;
use tracing::debug;

use crate::{Game, Player, Position};

/// Outcome values
pub const WIN: i8 = 1;
pub const DRAW: i8 = 0;
pub const LOSS: i8 = -1;

/// A legal move and its minimax value.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct MoveEvaluation {
    pub position: Position,
    pub value: i8,
}

/// Minimax search from one player's perspective.
///
/// The player never changes during a search; the side to move at each node
/// decides whether that node maximizes or minimizes.
#[derive(Debug)]
pub struct Search {
    player: Player,
    /// Positions visited so far
    nodes: u64,
}

impl Search {
    pub fn new(player: Player) -> Self {
        Self { player, nodes: 0 }
    }

    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }

    /// Number of positions visited, terminal ones included.
    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Leaf value of a finished game.
    fn utility(&self, winner: Player) -> i8 {
        if winner == self.player {
            WIN
        } else if winner == self.player.opponent() {
            LOSS
        } else {
            DRAW
        }
    }

    /// Value of `game` and the move that achieves it.
    ///
    /// The move is `None` only when the game is already over. Each candidate
    /// is played on a copy of `game`.
    pub fn minimax(&mut self, game: &Game) -> (i8, Option<Position>) {
        self.nodes += 1;

        let state = game.state();
        if state.ended {
            return (self.utility(state.winner), None);
        }

        let is_maximizing = game.turn() == self.player;
        let mut best_value = if is_maximizing { i8::MIN } else { i8::MAX };
        let mut best_move = None;

        for pos in game.board().empty_cells() {
            let mut child = *game;
            child.make_move(pos);

            let (value, _) = self.minimax(&child);
            let improves = if is_maximizing {
                value > best_value
            } else {
                value < best_value
            };
            if improves {
                best_value = value;
                best_move = Some(pos);
            }
        }

        (best_value, best_move)
    }
}

/// Best move for `player`, or `None` if it isn't their turn or the game is over.
pub fn next_move(game: &Game, player: Player) -> Option<Position> {
    if game.turn() != player {
        return None;
    }

    let mut search = Search::new(player);
    let (value, best) = search.minimax(game);
    debug!(
        player = %player,
        turns = game.turns(),
        ?best,
        value,
        nodes = search.nodes(),
        "minimax search finished"
    );
    best
}

/// Play the best move for `player` on `game`.
/// Returns false, leaving `game` untouched, when there is no move to make.
pub fn make_move(game: &mut Game, player: Player) -> bool {
    match next_move(game, player) {
        Some(pos) => game.make_move(pos),
        None => false,
    }
}

/// Minimax value of every legal move in row-major order, regardless of whose
/// turn it is. Empty once the game is over.
pub fn evaluate_moves(game: &Game, player: Player) -> Vec<MoveEvaluation> {
    if game.state().ended {
        return Vec::new();
    }

    let mut search = Search::new(player);
    game.board()
        .empty_cells()
        .map(|position| {
            let mut child = *game;
            child.make_move(position);
            let (value, _) = search.minimax(&child);
            MoveEvaluation { position, value }
        })
        .collect()
}

/// Computer opponent bound to one side of the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Ai {
    player: Player,
}

impl Ai {
    pub fn new(player: Player) -> Self {
        Self { player }
    }

    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }

    pub fn next_move(&self, game: &Game) -> Option<Position> {
        next_move(game, self.player)
    }

    pub fn make_move(&self, game: &mut Game) -> bool {
        make_move(game, self.player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(indices: &[i32]) -> Game {
        let mut game = Game::new();
        for &i in indices {
            assert_eq!(game.make_move_at_index(i), Ok(true));
        }
        game
    }

    fn pos(index: i32) -> Position {
        Position::from_index(index).unwrap()
    }

    #[test]
    fn test_refuses_when_not_its_turn() {
        let game = Game::new();
        assert_eq!(next_move(&game, Player::Two), None);
        assert_eq!(next_move(&game, Player::None), None);

        let mut live = game;
        assert!(!make_move(&mut live, Player::Two));
        assert_eq!(live, game);
    }

    #[test]
    fn test_no_move_on_finished_game() {
        // X X X / O O . / . . .  with O to move
        let game = play(&[0, 3, 1, 4, 2]);
        assert!(game.state().ended);
        assert_eq!(game.turn(), Player::Two);
        assert_eq!(next_move(&game, Player::Two), None);

        let mut live = game;
        assert!(!Ai::new(Player::Two).make_move(&mut live));
        assert_eq!(live, game);
    }

    #[test]
    fn test_no_move_on_draw() {
        let game = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert!(game.state().is_draw());
        assert!(evaluate_moves(&game, Player::One).is_empty());
        assert_eq!(next_move(&game, game.turn()), None);
    }

    #[test]
    fn test_takes_immediate_win() {
        // X X . / O O . / . . .  X to move
        let game = play(&[0, 3, 1, 4]);
        assert_eq!(next_move(&game, Player::One), Some(pos(2)));
    }

    #[test]
    fn test_blocks_immediate_loss() {
        // X X . / . O . / . . .  O to move must block at 2
        let game = play(&[0, 4, 1]);
        assert_eq!(next_move(&game, Player::Two), Some(pos(2)));
    }

    #[test]
    fn test_tie_break_prefers_lowest_index() {
        // X X . / . O O / X O .  X to move
        // Both 2 (row 0) and 3 (col 0) win immediately; 2 comes first.
        let game = play(&[0, 4, 1, 5, 6, 7]);
        let evals = evaluate_moves(&game, Player::One);
        let winners: Vec<usize> = evals
            .iter()
            .filter(|e| e.value == WIN)
            .map(|e| e.position.index())
            .collect();
        assert_eq!(winners, vec![2, 3]);

        for _ in 0..5 {
            assert_eq!(next_move(&game, Player::One), Some(pos(2)));
        }
    }

    #[test]
    fn test_tie_break_among_draws() {
        // X takes the center; every O reply in a corner draws, edges lose.
        let game = play(&[4]);
        let evals = evaluate_moves(&game, Player::Two);
        let values: Vec<i8> = evals.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![0, -1, 0, -1, -1, 0, -1, 0]);
        assert_eq!(next_move(&game, Player::Two), Some(pos(0)));
    }

    #[test]
    fn test_value_from_fixed_perspective() {
        // X X . / O O . / . . .  X to move: a win for X, a loss for O.
        let game = play(&[0, 3, 1, 4]);
        assert_eq!(Search::new(Player::One).minimax(&game).0, WIN);
        assert_eq!(Search::new(Player::Two).minimax(&game).0, LOSS);
    }

    #[test]
    fn test_terminal_utility() {
        let won = play(&[0, 3, 1, 4, 2]);
        let mut search = Search::new(Player::Two);
        assert_eq!(search.minimax(&won), (LOSS, None));
        assert_eq!(search.nodes(), 1);

        let drawn = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(Search::new(Player::One).minimax(&drawn), (DRAW, None));
    }

    #[test]
    fn test_search_leaves_game_untouched() {
        let game = play(&[4, 0]);
        let before = game;
        let _ = next_move(&game, Player::One);
        let _ = evaluate_moves(&game, Player::Two);
        assert_eq!(game, before);
    }

    #[test]
    fn test_node_count_last_move() {
        // One empty cell left: root plus one child.
        let game = play(&[0, 1, 2, 4, 3, 5, 7, 6]);
        let mut search = Search::new(Player::One);
        let (_, best) = search.minimax(&game);
        assert_eq!(best, Some(pos(8)));
        assert_eq!(search.nodes(), 2);
    }

    #[test]
    fn test_ai_make_move_applies() {
        let mut game = play(&[0, 3, 1, 4]);
        let ai = Ai::new(Player::One);
        assert_eq!(ai.player(), Player::One);
        assert!(ai.make_move(&mut game));
        assert_eq!(game.turns(), 5);
        assert_eq!(game.state().winner, Player::One);
    }
}
