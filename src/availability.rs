//! Fills a position group from a club's roster, preferring confirmed players and falling back to
//! the best doubtful ones when the confirmed tier is short.

use rustc_hash::FxHashSet;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{Player, Position, Status};

/// A player chosen for a lineup. This is an owned copy of the roster record; `from_doubt` marks a
/// player taken from the doubtful tier and never exists on the roster itself.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pick {
    #[serde(flatten)]
    pub player: Player,
    pub from_doubt: bool,
}
impl Pick {
    pub fn confirmed(player: &Player) -> Self {
        Self {
            player: player.clone(),
            from_doubt: false,
        }
    }

    pub fn doubtful(player: &Player) -> Self {
        Self {
            player: player.clone(),
            from_doubt: true,
        }
    }
}

impl From<&Player> for Pick {
    fn from(player: &Player) -> Self {
        Pick::confirmed(player)
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("needed {required} of {positions:?}, found {found}")]
pub struct Shortfall {
    pub positions: Vec<Position>,
    pub required: usize,
    pub found: usize,
}

/// Selects up to `count` players from `players` whose position is one of `positions`. All confirmed
/// players are taken in roster order; any remaining places go to doubtful players in descending
/// order of average. The result is truncated to `count` and never repeats a player.
pub fn resolve<'a>(
    players: impl IntoIterator<Item = &'a Player>,
    positions: &[Position],
    count: usize,
) -> Vec<Pick> {
    let mut seen = FxHashSet::default();
    let eligible = players
        .into_iter()
        .filter(|player| positions.contains(&player.position))
        .filter(|player| seen.insert(player.id))
        .collect::<Vec<_>>();

    let mut picks = eligible
        .iter()
        .filter(|player| player.status == Status::Confirmed)
        .map(|&player| Pick::confirmed(player))
        .collect::<Vec<_>>();

    if picks.len() < count {
        let mut doubtful = eligible
            .iter()
            .filter(|player| player.status == Status::Doubtful)
            .collect::<Vec<_>>();
        doubtful.sort_by(|a, b| b.average.total_cmp(&a.average));
        let needed = count - picks.len();
        picks.extend(doubtful.into_iter().take(needed).map(|&player| Pick::doubtful(player)));
    }

    picks.truncate(count);
    picks
}

/// As [resolve], but a result with fewer than `count` players is a [Shortfall].
pub fn require<'a>(
    players: impl IntoIterator<Item = &'a Player>,
    positions: &[Position],
    count: usize,
) -> Result<Vec<Pick>, Shortfall> {
    let picks = resolve(players, positions, count);
    if picks.len() < count {
        Err(Shortfall {
            positions: positions.to_vec(),
            required: count,
            found: picks.len(),
        })
    } else {
        Ok(picks)
    }
}
