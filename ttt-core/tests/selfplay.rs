//! Optimal-play properties of the minimax AI.
//!
//! - AI against AI from every opening ends in a draw
//! - The AI as second mover never loses, whatever the first mover does
//! - Random opponents never beat the AI on either side

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use ttt_core::{Ai, Game, Player, Position};

/// Play the game out with `ai` moving whenever it is its turn and
/// `opponent` choosing the other side's moves.
fn play_out(mut game: Game, ai: Ai, mut opponent: impl FnMut(&Game) -> Position) -> Game {
    while !game.state().ended {
        if game.turn() == ai.player() {
            assert!(ai.make_move(&mut game), "AI had no move in {}", game);
        } else {
            let pos = opponent(&game);
            assert!(game.make_move(pos), "opponent move {} rejected", pos);
        }
    }
    game
}

fn empty_cells(game: &Game) -> Vec<Position> {
    game.board().empty_cells().collect()
}

#[test]
fn test_ai_vs_ai_from_every_opening_is_draw() {
    for opening in Position::all() {
        let mut game = Game::new();
        assert!(game.make_move(opening));

        let ais = [Ai::new(Player::One), Ai::new(Player::Two)];
        while ais[(game.turns() % 2) as usize].make_move(&mut game) {}

        let state = game.state();
        assert!(state.ended, "opening {}: game stopped early\n{}", opening, game);
        assert_eq!(
            state.winner,
            Player::None,
            "opening {}: expected draw\n{}",
            opening,
            game
        );
        assert_eq!(game.turns(), 9);
    }
}

/// Explore every first-mover choice against the AI; returns games played.
fn explore(game: Game, ai: Ai, losses: &mut Vec<Game>) -> usize {
    let state = game.state();
    if state.ended {
        if state.winner == ai.player().opponent() {
            losses.push(game);
        }
        return 1;
    }

    if game.turn() == ai.player() {
        let mut next = game;
        assert!(ai.make_move(&mut next));
        return explore(next, ai, losses);
    }

    empty_cells(&game)
        .into_iter()
        .map(|pos| {
            let mut next = game;
            assert!(next.make_move(pos));
            explore(next, ai, losses)
        })
        .sum()
}

#[test]
fn test_second_mover_ai_never_loses() {
    let ai = Ai::new(Player::Two);
    let mut losses = Vec::new();
    let games = explore(Game::new(), ai, &mut losses);

    assert!(games > 9);
    assert!(
        losses.is_empty(),
        "AI lost {} of {} games, first:\n{}",
        losses.len(),
        games,
        losses[0]
    );
}

#[test]
fn test_random_first_mover_never_beats_ai() {
    let mut rng = StdRng::seed_from_u64(0x7717);
    let ai = Ai::new(Player::Two);

    for _ in 0..50 {
        let game = play_out(Game::new(), ai, |g| {
            *empty_cells(g).choose(&mut rng).expect("game not over")
        });
        assert_ne!(game.state().winner, Player::One, "\n{}", game);
    }
}

#[test]
fn test_random_second_mover_never_beats_ai() {
    let mut rng = StdRng::seed_from_u64(42);
    let ai = Ai::new(Player::One);

    // Skip the full-board search: start from each corner and the center.
    for opening in [0, 2, 4, 6, 8] {
        let mut start = Game::new();
        assert_eq!(start.make_move_at_index(opening), Ok(true));

        for _ in 0..5 {
            let game = play_out(start, ai, |g| {
                *empty_cells(g).choose(&mut rng).expect("game not over")
            });
            assert_ne!(game.state().winner, Player::Two, "\n{}", game);
        }
    }
}

#[test]
fn test_ai_move_is_deterministic() {
    let mut game = Game::new();
    assert!(game.make_move(Position::at(1, 1).unwrap()));

    let ai = Ai::new(Player::Two);
    let first = ai.next_move(&game);
    for _ in 0..3 {
        assert_eq!(ai.next_move(&game), first);
    }
    assert_eq!(first, Some(Position::at(0, 0).unwrap()));
}

#[test]
fn test_game_serializes_board_and_turns() {
    let mut game = Game::new();
    assert_eq!(game.make_move_at_index(0), Ok(true));

    let json = serde_json::to_value(game).unwrap();
    assert_eq!(json["turns"], 1);
    assert_eq!(json["board"][0][0], "one");
    assert_eq!(json["board"][2][2], "none");
}
