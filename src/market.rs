//! Ingestion of the upstream market payload: raw club, player and match records keyed the way the
//! market publishes them, and their conversion into a [Round].

use chrono::NaiveDateTime;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::{Badges, Club, ClubId, Match, Player, PlayerId, Position, Round, Stats, Status};

pub const KICKOFF_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The four upstream documents a round is built from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Clubs keyed by their stringified id.
    pub clubs: FxHashMap<String, RawClub>,
    #[serde(alias = "atletas", default)]
    pub players: Vec<RawPlayer>,
    #[serde(alias = "partidas", default)]
    pub matches: Vec<RawMatch>,
    pub market: MarketStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawClub {
    pub id: u32,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "abreviacao", default)]
    pub abbreviation: String,
    #[serde(rename = "escudos", default)]
    pub badges: Badges,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPlayer {
    #[serde(rename = "atleta_id")]
    pub id: u32,
    #[serde(rename = "apelido")]
    pub name: String,
    #[serde(rename = "clube_id")]
    pub club: u32,
    #[serde(rename = "posicao_id")]
    pub position: u8,
    #[serde(rename = "media_num", default)]
    pub average: f64,
    #[serde(rename = "jogos_num", default)]
    pub games: u32,
    #[serde(rename = "status_id", default)]
    pub status: u8,
    #[serde(default)]
    pub scout: Option<Scout>,
}

/// Scout counters. Keys absent from the payload count as zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scout {
    #[serde(rename = "G")]
    pub goals: u32,
    #[serde(rename = "A")]
    pub assists: u32,
    #[serde(rename = "DS")]
    pub tackles: u32,
    #[serde(rename = "SG")]
    pub clean_sheets: u32,
    #[serde(rename = "RB")]
    pub steals: u32,
    #[serde(rename = "CA")]
    pub yellow_cards: u32,
    #[serde(rename = "CV")]
    pub red_cards: u32,
    #[serde(rename = "FC")]
    pub fouls: u32,
}
impl From<Scout> for Stats {
    fn from(scout: Scout) -> Self {
        Self {
            goals: scout.goals,
            assists: scout.assists,
            tackles: scout.tackles,
            clean_sheets: scout.clean_sheets,
            steals: scout.steals,
            yellow_cards: scout.yellow_cards,
            red_cards: scout.red_cards,
            fouls: scout.fouls,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMatch {
    #[serde(rename = "clube_casa_id")]
    pub home: u32,
    #[serde(rename = "clube_visitante_id")]
    pub away: u32,
    #[serde(rename = "partida_data")]
    pub kickoff: String,
    #[serde(rename = "local", default)]
    pub venue: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketStatus {
    #[serde(rename = "rodada_atual")]
    pub round: u16,
    #[serde(rename = "status_mercado", default)]
    pub status: u8,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed kickoff '{kickoff}' for match {home} v {away}: {source}")]
    Kickoff {
        kickoff: String,
        home: u32,
        away: u32,
        source: chrono::ParseError,
    },
}

pub fn position_of(id: u8) -> Option<Position> {
    match id {
        1 => Some(Position::Goalkeeper),
        2 => Some(Position::Fullback),
        3 => Some(Position::Centerback),
        4 => Some(Position::Midfielder),
        5 => Some(Position::Attacker),
        6 => Some(Position::Coach),
        _ => None,
    }
}

pub fn status_of(id: u8) -> Status {
    match id {
        7 => Status::Confirmed,
        2 => Status::Doubtful,
        3 => Status::Suspended,
        5 => Status::Injured,
        6 => Status::Voided,
        _ => Status::Unknown,
    }
}

impl TryFrom<RawMatch> for Match {
    type Error = IngestError;

    fn try_from(raw: RawMatch) -> Result<Self, Self::Error> {
        let kickoff = NaiveDateTime::parse_from_str(&raw.kickoff, KICKOFF_FORMAT).map_err(|source| {
            IngestError::Kickoff {
                kickoff: raw.kickoff.clone(),
                home: raw.home,
                away: raw.away,
                source,
            }
        })?;
        Ok(Self {
            home: ClubId(raw.home),
            away: ClubId(raw.away),
            kickoff,
            venue: raw.venue,
        })
    }
}

impl From<RawClub> for Club {
    fn from(raw: RawClub) -> Self {
        Self {
            id: ClubId(raw.id),
            name: raw.name,
            abbreviation: raw.abbreviation,
            badges: raw.badges,
        }
    }
}

impl RawPlayer {
    /// `None` if the position id is not one of the six known positions.
    pub fn into_player(self) -> Option<Player> {
        let position = position_of(self.position)?;
        Some(Player::new(
            PlayerId(self.id),
            self.name,
            position,
            ClubId(self.club),
            status_of(self.status),
            self.average,
            self.games,
            self.scout.unwrap_or_default().into(),
        ))
    }
}

/// Keeps only the clubs playing this round and their players.
impl TryFrom<Snapshot> for Round {
    type Error = IngestError;

    fn try_from(snapshot: Snapshot) -> Result<Self, Self::Error> {
        let matches = snapshot
            .matches
            .into_iter()
            .map(Match::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let active = matches
            .iter()
            .flat_map(|fixture| [fixture.home, fixture.away])
            .collect::<FxHashSet<_>>();
        let clubs = snapshot
            .clubs
            .into_values()
            .map(Club::from)
            .filter(|club| active.contains(&club.id))
            .map(|club| (club.id, club))
            .collect::<FxHashMap<_, _>>();

        let offered = snapshot.players.len();
        let players = snapshot
            .players
            .into_iter()
            .filter(|raw| active.contains(&ClubId(raw.club)))
            .filter_map(RawPlayer::into_player)
            .collect::<Vec<_>>();
        debug!(
            "ingested round {}: {} clubs, {} matches, {} of {offered} players",
            snapshot.market.round,
            clubs.len(),
            matches.len(),
            players.len()
        );
        Ok(Self {
            number: snapshot.market.round,
            players,
            clubs,
            matches,
        })
    }
}
