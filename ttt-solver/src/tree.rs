//! Count the full game tree.
//!
//! Every path is a distinct node: transpositions are not merged. A node is
//! terminal as soon as a line is complete or the board is full.

use ttt_core::{Game, Player};

/// Node and terminal counts for a subtree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeCounts {
    /// Total nodes visited, root included
    pub nodes: u64,
    /// Terminal nodes won by the first mover
    pub wins_p1: u64,
    /// Terminal nodes won by the second mover
    pub wins_p2: u64,
    /// Terminal nodes with a full board and no line
    pub draws: u64,
    /// Deepest ply reached below the root
    pub max_depth: u32,
}

impl TreeCounts {
    /// Number of complete games (terminal nodes).
    pub fn games(&self) -> u64 {
        self.wins_p1 + self.wins_p2 + self.draws
    }

    fn visit(&mut self, game: &Game, depth: u32) {
        self.nodes += 1;
        self.max_depth = self.max_depth.max(depth);

        let state = game.state();
        if state.ended {
            match state.winner {
                Player::One => self.wins_p1 += 1,
                Player::Two => self.wins_p2 += 1,
                Player::None => self.draws += 1,
            }
            return;
        }

        for pos in game.board().empty_cells() {
            let mut child = *game;
            child.make_move(pos);
            self.visit(&child, depth + 1);
        }
    }
}

/// Count every node reachable from `game`.
pub fn count_tree(game: &Game) -> TreeCounts {
    let mut counts = TreeCounts::default();
    counts.visit(game, 0);
    counts
}
