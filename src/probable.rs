//! The probable starting eleven of a club and the alternatives for each position.

use serde::Serialize;

use crate::availability::{self, Pick};
use crate::domain::{ClubId, Player, Position, Round, Status};

pub const FIELD_PLAYERS: usize = 11;

const FIELD_POSITIONS: [Position; 5] = [
    Position::Goalkeeper,
    Position::Fullback,
    Position::Centerback,
    Position::Midfielder,
    Position::Attacker,
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProbableLineup {
    pub club: ClubId,
    pub name: String,
    pub badge: String,
    /// Field players then the coach, in team-sheet order.
    pub picks: Vec<Pick>,
}

/// Every confirmed field player, topped up to eleven with the best doubtful ones, plus a coach.
/// `None` if the club is not part of the round.
pub fn probable_lineup(round: &Round, club: ClubId) -> Option<ProbableLineup> {
    let details = round.clubs.get(&club)?;
    let confirmed = round
        .club_players(club)
        .filter(|player| player.is_confirmed() && FIELD_POSITIONS.contains(&player.position))
        .count();
    let mut picks = availability::resolve(
        round.club_players(club),
        &FIELD_POSITIONS,
        FIELD_PLAYERS.max(confirmed),
    );
    picks.extend(availability::resolve(round.club_players(club), &[Position::Coach], 1));
    picks.sort_by_key(|pick| pick.player.position.sheet_order());
    Some(ProbableLineup {
        club,
        name: details.name.clone(),
        badge: details.badges.medium.clone(),
        picks,
    })
}

/// All of the club's players in `position`: confirmed first, then doubtful, then the rest, each
/// tier by descending average.
pub fn alternatives(round: &Round, club: ClubId, position: Position) -> Vec<&Player> {
    let tier = |player: &Player| match player.status {
        Status::Confirmed => 0,
        Status::Doubtful => 1,
        _ => 2,
    };
    let mut players = round
        .club_players(club)
        .filter(|player| player.position == position)
        .collect::<Vec<_>>();
    players.sort_by(|a, b| {
        tier(a)
            .cmp(&tier(b))
            .then_with(|| b.average.total_cmp(&a.average))
    });
    players
}
