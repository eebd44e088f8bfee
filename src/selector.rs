//! Ranks offensive candidates by a chosen statistic and returns a window of the ranking.

use rustc_hash::FxHashSet;

use crate::domain::{Player, PlayerId, RankingKey};

/// A slice of a ranking: `count` entries starting at `offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub count: usize,
}
impl Window {
    pub fn top(count: usize) -> Self {
        Self { offset: 0, count }
    }

    pub fn skip(offset: usize, count: usize) -> Self {
        Self { offset, count }
    }
}

/// Ids that may not be drawn: players used earlier in the session and players already in the
/// lineup being assembled.
#[derive(Clone, Copy, Debug)]
pub struct Exclusions<'a> {
    pub used: &'a FxHashSet<PlayerId>,
    pub lineup: &'a FxHashSet<PlayerId>,
}
impl Exclusions<'_> {
    pub fn excludes(&self, id: &PlayerId) -> bool {
        self.used.contains(id) || self.lineup.contains(id)
    }
}

/// Filters out excluded candidates, ranks the rest in descending order of `key` and returns the
/// requested window. Ties keep the candidates' input order.
pub fn select<'a>(
    candidates: &[&'a Player],
    exclusions: Exclusions,
    key: RankingKey,
    window: Window,
) -> Vec<&'a Player> {
    let mut ranked = candidates
        .iter()
        .copied()
        .filter(|player| !exclusions.excludes(&player.id))
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| key.value(b).total_cmp(&key.value(a)));
    ranked
        .into_iter()
        .skip(window.offset)
        .take(window.count)
        .collect()
}
