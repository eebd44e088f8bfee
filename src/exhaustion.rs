//! Decides whether the unused offensive pool can still feed another generation pass.

use rustc_hash::FxHashSet;

use crate::domain::{Formation, Player, PlayerId, Position};

/// A number of midfielders and attackers, either required or available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Demand {
    pub midfielders: usize,
    pub attackers: usize,
}
impl Demand {
    pub fn of(formation: Formation) -> Self {
        Self {
            midfielders: formation.midfielders(),
            attackers: formation.attackers(),
        }
    }

    /// The smallest midfield and the smallest attack requirement across `formations`, taken
    /// independently. `None` if there are no formations.
    pub fn minimum(formations: impl IntoIterator<Item = Formation>) -> Option<Self> {
        formations
            .into_iter()
            .map(Demand::of)
            .reduce(|min, demand| Demand {
                midfielders: min.midfielders.min(demand.midfielders),
                attackers: min.attackers.min(demand.attackers),
            })
    }

    /// Counts the midfielders and attackers among `players`.
    pub fn count<'a>(players: impl IntoIterator<Item = &'a Player>) -> Self {
        players.into_iter().fold(Demand::default(), |mut demand, player| {
            match player.position {
                Position::Midfielder => demand.midfielders += 1,
                Position::Attacker => demand.attackers += 1,
                _ => {}
            }
            demand
        })
    }

    pub fn saturating_sub(&self, other: &Demand) -> Demand {
        Demand {
            midfielders: self.midfielders.saturating_sub(other.midfielders),
            attackers: self.attackers.saturating_sub(other.attackers),
        }
    }

    pub fn covers(&self, required: &Demand) -> bool {
        self.midfielders >= required.midfielders && self.attackers >= required.attackers
    }
}

/// Midfielders and attackers in `universe` that have not been used.
pub fn remaining<'a>(universe: impl IntoIterator<Item = &'a Player>, used: &FxHashSet<PlayerId>) -> Demand {
    Demand::count(universe.into_iter().filter(|player| !used.contains(&player.id)))
}

/// Whether another pass is out of reach. The gate is global: the remaining pool is compared against
/// the least demanding midfield and attack among the selected formations, less what the locked
/// players already supply. With nothing selected, nothing more can be generated.
pub fn is_exhausted(
    formations: impl IntoIterator<Item = Formation>,
    remaining: &Demand,
    locked: &Demand,
) -> bool {
    match Demand::minimum(formations) {
        None => true,
        Some(minimum) => !remaining.covers(&minimum.saturating_sub(locked)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;
    use crate::testing::player;

    #[test]
    fn minimum_taken_per_line() {
        let minimum = Demand::minimum([Formation::F352, Formation::F433, Formation::F451]).unwrap();
        assert_eq!(
            Demand {
                midfielders: 3,
                attackers: 1
            },
            minimum
        );
        assert_eq!(None, Demand::minimum(std::iter::empty()));
    }

    #[test]
    fn remaining_excludes_used() {
        let universe = vec![
            player(1, 1, Position::Midfielder, Status::Confirmed, 5.0, 0),
            player(2, 1, Position::Midfielder, Status::Confirmed, 5.0, 0),
            player(3, 1, Position::Attacker, Status::Confirmed, 5.0, 0),
            player(4, 1, Position::Goalkeeper, Status::Confirmed, 5.0, 0),
        ];
        let used = FxHashSet::from_iter([PlayerId(2)]);
        assert_eq!(
            Demand {
                midfielders: 1,
                attackers: 1
            },
            remaining(&universe, &used)
        );
    }

    #[test]
    fn not_exhausted_when_covered() {
        let remaining = Demand {
            midfielders: 3,
            attackers: 3,
        };
        assert!(!is_exhausted([Formation::F433], &remaining, &Demand::default()));
    }

    #[test]
    fn exhausted_when_short_of_attackers() {
        let remaining = Demand {
            midfielders: 10,
            attackers: 2,
        };
        assert!(is_exhausted([Formation::F433], &remaining, &Demand::default()));
        assert!(!is_exhausted([Formation::F433, Formation::F442], &remaining, &Demand::default()));
    }

    #[test]
    fn locked_players_reduce_requirement() {
        let remaining = Demand {
            midfielders: 1,
            attackers: 1,
        };
        let locked = Demand {
            midfielders: 2,
            attackers: 5,
        };
        assert!(!is_exhausted([Formation::F433], &remaining, &locked));
        assert!(is_exhausted([Formation::F433], &remaining, &Demand::default()));
    }

    #[test]
    fn nothing_selected() {
        assert!(is_exhausted(std::iter::empty(), &Demand::default(), &Demand::default()));
    }
}
