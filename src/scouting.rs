//! Filtering and sorting of the player table, and the score composition of its leading players.

use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use thiserror::Error;

use crate::domain::{ClubId, Player, PlayerId, Position, Round};

/// How many of the leading players a composition summary covers by default.
pub const COMPOSITION_TOP: usize = 15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    pub position: Option<Position>,
    pub club: Option<ClubId>,
}
impl Filter {
    pub fn admits(&self, player: &Player) -> bool {
        self.position.map_or(true, |position| player.position == position)
            && self.club.map_or(true, |club| player.club == club)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SortKey {
    #[default]
    Potential,
    Average,
    Basic,
    Goals,
    Assists,
    Tackles,
    Name,
}
impl SortKey {
    fn numeric(&self, player: &Player) -> f64 {
        let value = match self {
            SortKey::Potential => player.potential(),
            SortKey::Average => player.average,
            SortKey::Basic => player.basic(),
            SortKey::Goals => player.stats.goals as f64,
            SortKey::Assists => player.stats.assists as f64,
            SortKey::Tackles => player.stats.tackles as f64,
            SortKey::Name => 0.0,
        };
        if value.is_nan() {
            0.0
        } else {
            value
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::iter()
            .find(|key| key.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSortKeyError(s.into()))
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unsupported sort key '{0}'")]
pub struct ParseSortKeyError(String);

/// The players admitted by `filter`, sorted by `key`: names ascending, everything else descending.
pub fn scout<'a>(round: &'a Round, filter: &Filter, key: SortKey) -> Vec<&'a Player> {
    let mut players = round
        .players
        .iter()
        .filter(|player| filter.admits(player))
        .collect::<Vec<_>>();
    match key {
        SortKey::Name => players.sort_by(|a, b| a.name.cmp(&b.name)),
        _ => players.sort_by(|a, b| key.numeric(b).total_cmp(&key.numeric(a))),
    }
    players
}

/// A player's average split into the basic score and the points earned on top of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Breakdown {
    pub id: PlayerId,
    pub name: String,
    pub basic: f64,
    pub extra: f64,
    pub potential: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Composition {
    pub breakdowns: Vec<Breakdown>,
    pub mean_potential: f64,
}

/// Breaks down the first `top` of `players`, in the order given.
pub fn composition(players: &[&Player], top: usize) -> Composition {
    let breakdowns = players
        .iter()
        .take(top)
        .map(|player| Breakdown {
            id: player.id,
            name: player.name.clone(),
            basic: player.basic(),
            extra: (player.average - player.basic()).max(0.0),
            potential: player.potential(),
        })
        .collect::<Vec<_>>();
    let mean_potential = if breakdowns.is_empty() {
        0.0
    } else {
        breakdowns.iter().map(|breakdown| breakdown.potential).sum::<f64>() / breakdowns.len() as f64
    };
    Composition {
        breakdowns,
        mean_potential,
    }
}
