//! Testing helpers.

use chrono::NaiveDateTime;
use rustc_hash::FxHashMap;

use crate::domain::{Badges, Club, ClubId, Match, Player, PlayerId, Position, Round, Stats, Status};

/// Builds a player with ten games and no bonus scouts, so that potential is
/// `1.2 × average + tackles / 10`.
pub fn player(id: u32, club: u32, position: Position, status: Status, average: f64, tackles: u32) -> Player {
    Player::new(
        PlayerId(id),
        format!("P{id}"),
        position,
        ClubId(club),
        status,
        average,
        10,
        Stats {
            tackles,
            ..Stats::default()
        },
    )
}

pub fn club(id: u32) -> Club {
    Club {
        id: ClubId(id),
        name: format!("Club {id}"),
        abbreviation: format!("C{id:02}"),
        badges: Badges {
            large: format!("https://badges/{id}/60x60.png"),
            medium: format!("https://badges/{id}/45x45.png"),
            small: format!("https://badges/{id}/30x30.png"),
        },
    }
}

pub fn fixture(home: u32, away: u32) -> Match {
    Match {
        home: ClubId(home),
        away: ClubId(away),
        kickoff: NaiveDateTime::default(),
        venue: "Stadium".into(),
    }
}

/// Accumulates a roster with auto-assigned, club-prefixed player ids.
#[derive(Default)]
pub struct RosterBuilder {
    players: Vec<Player>,
    clubs: FxHashMap<ClubId, Club>,
    matches: Vec<Match>,
}
impl RosterBuilder {
    pub fn fixture(mut self, home: u32, away: u32) -> Self {
        self.clubs.entry(ClubId(home)).or_insert_with(|| club(home));
        self.clubs.entry(ClubId(away)).or_insert_with(|| club(away));
        self.matches.push(fixture(home, away));
        self
    }

    /// A goalkeeper, `defenders` defenders split across fullback and centerback, and a coach, all
    /// confirmed.
    pub fn defense(mut self, club: u32, defenders: usize) -> Self {
        self.push(club, Position::Goalkeeper, Status::Confirmed, 5.0, 0);
        for index in 0..defenders {
            let position = if index % 2 == 0 {
                Position::Centerback
            } else {
                Position::Fullback
            };
            self.push(club, position, Status::Confirmed, 4.0 + index as f64, 0);
        }
        self.push(club, Position::Coach, Status::Confirmed, 3.0, 0);
        self
    }

    /// `count` confirmed players in `position`, with strictly decreasing potential.
    pub fn offense(mut self, club: u32, position: Position, count: usize) -> Self {
        for index in 0..count {
            self.push(club, position, Status::Confirmed, 3.0, 10 * (count - index) as u32);
        }
        self
    }

    pub fn push(&mut self, club: u32, position: Position, status: Status, average: f64, tackles: u32) -> PlayerId {
        let id = club * 1000 + self.players.iter().filter(|p| p.club == ClubId(club)).count() as u32 + 1;
        self.players.push(player(id, club, position, status, average, tackles));
        PlayerId(id)
    }

    pub fn with(mut self, player: Player) -> Self {
        self.players.push(player);
        self
    }

    pub fn build(self) -> Round {
        Round {
            number: 1,
            players: self.players,
            clubs: self.clubs,
            matches: self.matches,
        }
    }
}
