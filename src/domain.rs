//! Core data model: players, clubs, matches, formations and the round snapshot they belong to.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter};
use thiserror::Error;

use crate::potential;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl Display for PlayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClubId(pub u32);

impl Display for ClubId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EnumCount, EnumIter, Display, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Fullback,
    Centerback,
    Midfielder,
    Attacker,
    Coach,
}
impl Position {
    /// Positions that earn the clean-sheet bonus.
    pub fn is_defensive(&self) -> bool {
        matches!(
            self,
            Position::Goalkeeper | Position::Fullback | Position::Centerback | Position::Coach
        )
    }

    pub fn is_offensive(&self) -> bool {
        matches!(self, Position::Midfielder | Position::Attacker)
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Fullback => "FB",
            Position::Centerback => "CB",
            Position::Midfielder => "MID",
            Position::Attacker => "ATK",
            Position::Coach => "COA",
        }
    }

    /// Display order of a team sheet: goalkeeper, centerbacks, fullbacks, midfield, attack, coach.
    pub fn sheet_order(&self) -> u8 {
        match self {
            Position::Goalkeeper => 1,
            Position::Centerback => 2,
            Position::Fullback => 3,
            Position::Midfielder => 4,
            Position::Attacker => 5,
            Position::Coach => 6,
        }
    }
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::iter()
            .find(|position| {
                position.abbreviation().eq_ignore_ascii_case(s)
                    || position.to_string().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| ParsePositionError(s.into()))
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unsupported position '{0}'")]
pub struct ParsePositionError(String);

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EnumCount, EnumIter, Display, Serialize, Deserialize)]
pub enum Status {
    Confirmed,
    Doubtful,
    Suspended,
    Injured,
    Voided,
    Unknown,
}

/// Raw counting statistics accumulated over the season.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Stats {
    pub goals: u32,
    pub assists: u32,
    pub tackles: u32,
    pub clean_sheets: u32,
    pub steals: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub fouls: u32,
}

/// A player on the canonical roster. `basic` and `potential` are derived from the raw figures on
/// construction and cannot be set independently of them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub club: ClubId,
    pub status: Status,
    pub average: f64,
    pub games: u32,
    pub stats: Stats,
    basic: f64,
    potential: f64,
}
impl Player {
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        position: Position,
        club: ClubId,
        status: Status,
        average: f64,
        games: u32,
        stats: Stats,
    ) -> Self {
        let basic = potential::basic_score(position, average, games, &stats);
        let potential = potential::potential(&potential::Inputs {
            average,
            basic,
            games,
            goals: stats.goals,
            assists: stats.assists,
            tackles: stats.tackles,
        });
        Self {
            id,
            name: name.into(),
            position,
            club,
            status,
            average,
            games,
            stats,
            basic,
            potential,
        }
    }

    pub fn basic(&self) -> f64 {
        self.basic
    }

    pub fn potential(&self) -> f64 {
        self.potential
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == Status::Confirmed
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Badges {
    #[serde(rename = "60x60")]
    pub large: String,
    #[serde(rename = "45x45")]
    pub medium: String,
    #[serde(rename = "30x30")]
    pub small: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub abbreviation: String,
    pub badges: Badges,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Match {
    pub home: ClubId,
    pub away: ClubId,
    pub kickoff: NaiveDateTime,
    pub venue: String,
}
impl Match {
    pub fn involves(&self, club: ClubId) -> bool {
        self.home == club || self.away == club
    }

    pub fn opponent_of(&self, club: ClubId) -> Option<ClubId> {
        if self.home == club {
            Some(self.away)
        } else if self.away == club {
            Some(self.home)
        } else {
            None
        }
    }
}

/// The closed set of tactical formations. Goalkeeper and coach are implied; the token only
/// distributes the outfield players.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, EnumCount, EnumIter, Serialize, Deserialize)]
pub enum Formation {
    #[default]
    #[serde(rename = "4-3-3")]
    F433,
    #[serde(rename = "4-4-2")]
    F442,
    #[serde(rename = "3-5-2")]
    F352,
    #[serde(rename = "3-4-3")]
    F343,
    #[serde(rename = "5-3-2")]
    F532,
    #[serde(rename = "4-5-1")]
    F451,
}
impl Formation {
    pub fn token(&self) -> &'static str {
        match self {
            Formation::F433 => "4-3-3",
            Formation::F442 => "4-4-2",
            Formation::F352 => "3-5-2",
            Formation::F343 => "3-4-3",
            Formation::F532 => "5-3-2",
            Formation::F451 => "4-5-1",
        }
    }

    pub fn defenders(&self) -> usize {
        self.counts().0
    }

    pub fn midfielders(&self) -> usize {
        self.counts().1
    }

    pub fn attackers(&self) -> usize {
        self.counts().2
    }

    fn counts(&self) -> (usize, usize, usize) {
        match self {
            Formation::F433 => (4, 3, 3),
            Formation::F442 => (4, 4, 2),
            Formation::F352 => (3, 5, 2),
            Formation::F343 => (3, 4, 3),
            Formation::F532 => (5, 3, 2),
            Formation::F451 => (4, 5, 1),
        }
    }
}

impl Display for Formation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Formation {
    type Err = ParseFormationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formation::iter()
            .find(|formation| formation.token() == s.trim())
            .ok_or_else(|| ParseFormationError(s.into()))
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unsupported formation '{0}'")]
pub struct ParseFormationError(String);

/// The statistic by which offensive candidates are ranked.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EnumIter, Display, Serialize)]
pub enum RankingKey {
    Potential,
    Average,
    Basic,
}
impl RankingKey {
    /// Undefined (`NaN`) statistics rank as zero.
    pub fn value(&self, player: &Player) -> f64 {
        let value = match self {
            RankingKey::Potential => player.potential(),
            RankingKey::Average => player.average,
            RankingKey::Basic => player.basic(),
        };
        if value.is_nan() {
            0.0
        } else {
            value
        }
    }
}

/// Read-only snapshot of a round: the roster, participating clubs and the fixture list.
#[derive(Clone, Debug, Default)]
pub struct Round {
    pub number: u16,
    pub players: Vec<Player>,
    pub clubs: FxHashMap<ClubId, Club>,
    pub matches: Vec<Match>,
}
impl Round {
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn club_players(&self, club: ClubId) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |player| player.club == club)
    }

    /// The club's name, or its id when it is not among the round's clubs.
    pub fn club_name(&self, club: ClubId) -> String {
        self.clubs
            .get(&club)
            .map(|club| club.name.clone())
            .unwrap_or_else(|| format!("club {club}"))
    }
}
