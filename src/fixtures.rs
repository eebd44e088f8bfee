//! Opponent lookup and detection of locked players lined up against a selected defense.

use thiserror::Error;

use crate::domain::{ClubId, Match, Player};

/// The club that `club` faces this round, or `None` if it has no match.
pub fn opponent_of(club: ClubId, matches: &[Match]) -> Option<ClubId> {
    matches.iter().find_map(|fixture| fixture.opponent_of(club))
}

#[derive(Debug, Error, PartialEq)]
#[error(
    "locked {} against the defense of {defense} (opponent {opponent}); adjust the selection",
    describe(.players)
)]
pub struct ConflictError {
    pub players: Vec<String>,
    pub defense: String,
    pub opponent: String,
}

fn describe(players: &[String]) -> String {
    match players {
        [player] => format!("{player}, who plays"),
        _ => format!("{}, who play", players.join(", ")),
    }
}

/// Locked players belonging to `opponent`, in the order given.
pub fn conflicting<'a>(
    opponent: Option<ClubId>,
    locked: impl IntoIterator<Item = &'a Player>,
) -> Vec<&'a Player> {
    match opponent {
        None => vec![],
        Some(opponent) => locked
            .into_iter()
            .filter(|player| player.club == opponent)
            .collect(),
    }
}

/// Fails when any locked player belongs to the opponent of `defense`. Club names are resolved
/// through `club_name`.
pub fn check_locks<'a>(
    defense: ClubId,
    matches: &[Match],
    locked: impl IntoIterator<Item = &'a Player>,
    club_name: impl Fn(ClubId) -> String,
) -> Result<(), ConflictError> {
    let opponent = opponent_of(defense, matches);
    let conflicts = conflicting(opponent, locked);
    match (opponent, conflicts.is_empty()) {
        (Some(opponent), false) => Err(ConflictError {
            players: conflicts.iter().map(|player| player.name.clone()).collect(),
            defense: club_name(defense),
            opponent: club_name(opponent),
        }),
        _ => Ok(()),
    }
}
