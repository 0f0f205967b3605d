//! In-memory game sessions, one per sender.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, info};

use ttt_core::{Ai, Game, Player};

use crate::AppState;

/// Side played by the person sending commands.
pub const HUMAN: Player = Player::One;
/// Side played by the minimax AI.
pub const AI: Player = Player::Two;

/// A game in progress and the AI playing it.
#[derive(Clone, Copy, Debug)]
pub struct RunningGame {
    pub game: Game,
    pub ai: Ai,
    pub started_at: Instant,
}

impl RunningGame {
    pub fn new(started_at: Instant) -> Self {
        Self {
            game: Game::new(),
            ai: Ai::new(AI),
            started_at,
        }
    }

    fn is_expired(&self, now: Instant, expiry: Duration) -> bool {
        now.saturating_duration_since(self.started_at) > expiry
    }
}

/// All running games keyed by sender.
///
/// A single lock serializes every command, so one sender's game is never
/// mutated by two requests at once.
#[derive(Debug, Default)]
pub struct Sessions {
    games: Mutex<HashMap<String, RunningGame>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh game for `from`. Returns true if an existing game was replaced.
    pub async fn start(&self, from: &str, now: Instant) -> (RunningGame, bool) {
        let running = RunningGame::new(now);
        let replaced = self
            .games
            .lock()
            .await
            .insert(from.to_string(), running)
            .is_some();
        (running, replaced)
    }

    /// Copy of the game for `from`, if any.
    pub async fn get(&self, from: &str) -> Option<RunningGame> {
        self.games.lock().await.get(from).copied()
    }

    /// Run `f` on the game for `from` while holding the lock.
    pub async fn with_game<R>(&self, from: &str, f: impl FnOnce(&mut RunningGame) -> R) -> Option<R> {
        self.games.lock().await.get_mut(from).map(f)
    }

    pub async fn len(&self) -> usize {
        self.games.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop games started more than `expiry` before `now`.
    /// Returns the number removed.
    pub async fn sweep_expired(&self, now: Instant, expiry: Duration) -> usize {
        let mut games = self.games.lock().await;
        let before = games.len();
        games.retain(|from, running| {
            let expired = running.is_expired(now, expiry);
            if expired {
                debug!(from = %from, turns = running.game.turns(), "game expired, deleting");
            }
            !expired
        });
        before - games.len()
    }
}

/// Periodically delete expired games. Runs until the task is aborted.
pub async fn run_sweeper(state: AppState, every: Duration, expiry: Duration) {
    let mut ticker = tokio::time::interval(every);
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let removed = state.sessions.sweep_expired(Instant::now(), expiry).await;
        if removed > 0 {
            info!(removed, "swept expired games");
        }
    }
}
