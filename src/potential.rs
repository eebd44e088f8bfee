//! Derivation of the basic score and the per-game potential of a player.
//!
//! Attacking contributions are normalised per game played, so that a player is not favoured merely
//! for having appeared more often.

use crate::domain::{Position, Stats};

pub const GOAL_POINTS: f64 = 8.0;
pub const ASSIST_POINTS: f64 = 5.0;
pub const TACKLE_POINTS: f64 = 1.0;
pub const CLEAN_SHEET_POINTS: f64 = 5.0;
pub const BASIC_WEIGHT: f64 = 1.2;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs {
    pub average: f64,
    pub basic: f64,
    pub games: u32,
    pub goals: u32,
    pub assists: u32,
    pub tackles: u32,
}

/// Average points per game with the goal, assist and (for defensive positions) clean-sheet
/// bonuses stripped out.
pub fn basic_score(position: Position, average: f64, games: u32, stats: &Stats) -> f64 {
    if games == 0 {
        return 0.0;
    }
    let total = average * games as f64;
    let goal_points = stats.goals as f64 * GOAL_POINTS;
    let assist_points = stats.assists as f64 * ASSIST_POINTS;
    let clean_sheet_points = if position.is_defensive() {
        stats.clean_sheets as f64 * CLEAN_SHEET_POINTS
    } else {
        0.0
    };
    (total - goal_points - assist_points - clean_sheet_points) / games as f64
}

/// A non-negative projection score. Players without games fall back to half their average.
pub fn potential(inputs: &Inputs) -> f64 {
    if inputs.games == 0 {
        return if inputs.average > 0.0 {
            inputs.average / 2.0
        } else {
            0.0
        };
    }
    let games = inputs.games as f64;
    let per_game = |count: u32, points: f64| count as f64 / games * points;
    let potential = inputs.basic * BASIC_WEIGHT
        + per_game(inputs.goals, GOAL_POINTS)
        + per_game(inputs.assists, ASSIST_POINTS)
        + per_game(inputs.tackles, TACKLE_POINTS);
    round_cents(potential.max(0.0))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
