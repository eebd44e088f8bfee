//! Assembles complete lineups around the selected clean-sheet defenses.
//!
//! Each selected defense contributes a fixed block (goalkeeper, back line and coach) resolved from
//! its own roster, completed by up to three offensive variations drawn league-wide. Defenses are
//! processed greedily in selection order; offensive players auto-selected for one variation are
//! recorded in the [Ledger] and are not drawn again, neither later in the same pass nor in any pass
//! resumed from the returned ledger.

use std::fmt::{Display, Formatter};

use rustc_hash::FxHashSet;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter};
use thiserror::Error;
use tracing::{debug, warn};

use crate::availability::{self, Pick, Shortfall};
use crate::domain::{ClubId, Formation, Player, PlayerId, Position, RankingKey, Round, Status};
use crate::exhaustion::{self, Demand};
use crate::fixtures::{self, ConflictError};
use crate::selector::{self, Exclusions, Window};

/// How many of the top-ranked candidates the value picks skip.
pub const VALUE_PICKS_OFFSET: usize = 3;

const BACK_LINE: [Position; 2] = [Position::Fullback, Position::Centerback];

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumCount, EnumIter, Display, Serialize)]
pub enum Strategy {
    MaximumPotential,
    TotalBalance,
    ValuePicks,
}
impl Strategy {
    pub fn title(&self) -> &'static str {
        match self {
            Strategy::MaximumPotential => "Maximum Potential",
            Strategy::TotalBalance => "Total Balance",
            Strategy::ValuePicks => "Value Picks",
        }
    }

    pub fn rationale(&self) -> &'static str {
        match self {
            Strategy::MaximumPotential => "Best players by potential score.",
            Strategy::TotalBalance => "Best players by overall average.",
            Strategy::ValuePicks => "Strong players just outside the top of the list.",
        }
    }

    pub fn ranking(&self) -> RankingKey {
        match self {
            Strategy::MaximumPotential | Strategy::ValuePicks => RankingKey::Potential,
            Strategy::TotalBalance => RankingKey::Average,
        }
    }

    pub fn window(&self, count: usize) -> Window {
        match self {
            Strategy::ValuePicks => Window::skip(VALUE_PICKS_OFFSET, count),
            _ => Window::top(count),
        }
    }
}

/// The selected defenses and their formations. Order is the order of selection, which is also the
/// order in which defenses are served from the shared offensive pool.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection(Vec<(ClubId, Formation)>);
impl Selection {
    /// Selects `club` with the default formation, or deselects it if already selected. Returns
    /// whether the club is selected afterwards.
    pub fn toggle(&mut self, club: ClubId) -> bool {
        if self.deselect(club) {
            false
        } else {
            self.0.push((club, Formation::default()));
            true
        }
    }

    /// Selects `club` with `formation`, replacing the formation of an existing selection.
    pub fn select(&mut self, club: ClubId, formation: Formation) {
        match self.0.iter_mut().find(|(selected, _)| *selected == club) {
            Some((_, existing)) => *existing = formation,
            None => self.0.push((club, formation)),
        }
    }

    pub fn deselect(&mut self, club: ClubId) -> bool {
        let before = self.0.len();
        self.0.retain(|(selected, _)| *selected != club);
        self.0.len() != before
    }

    pub fn formation_of(&self, club: ClubId) -> Option<Formation> {
        self.0
            .iter()
            .find(|(selected, _)| *selected == club)
            .map(|(_, formation)| *formation)
    }

    pub fn clubs(&self) -> impl Iterator<Item = ClubId> + '_ {
        self.0.iter().map(|(club, _)| *club)
    }

    pub fn formations(&self) -> impl Iterator<Item = Formation> + '_ {
        self.0.iter().map(|(_, formation)| *formation)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ClubId, Formation)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ClubId, Formation)> for Selection {
    fn from_iter<T: IntoIterator<Item = (ClubId, Formation)>>(iter: T) -> Self {
        let mut selection = Selection::default();
        for (club, formation) in iter {
            selection.select(club, formation);
        }
        selection
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VariationId(pub u64);

impl Display for VariationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Session state threaded through successive generation passes: the offensive players that may no
/// longer be auto-selected, and the number of variation ids issued so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
    pub used: FxHashSet<PlayerId>,
    pub issued: u64,
}
impl Ledger {
    /// A ledger that continues from previously generated `variations`, excluding every midfielder
    /// and attacker appearing in them.
    pub fn resume(variations: &[Variation]) -> Self {
        Self {
            used: variations.iter().flat_map(Variation::offensive_ids).collect(),
            issued: variations
                .iter()
                .map(|variation| variation.id.0)
                .max()
                .unwrap_or_default(),
        }
    }

    fn issue(&mut self) -> VariationId {
        self.issued += 1;
        VariationId(self.issued)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DefenseTeam {
    pub club: ClubId,
    pub name: String,
    pub badge: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Variation {
    pub id: VariationId,
    pub title: String,
    pub rationale: String,
    pub strategy: Strategy,
    pub formation: Formation,
    pub defense: DefenseTeam,
    pub goalkeeper: Vec<Pick>,
    pub defenders: Vec<Pick>,
    pub midfielders: Vec<Pick>,
    pub attackers: Vec<Pick>,
    pub coach: Vec<Pick>,
}
impl Variation {
    pub fn offensive_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.midfielders
            .iter()
            .chain(self.attackers.iter())
            .map(|pick| pick.player.id)
    }

    /// Every pick in team-sheet order.
    pub fn picks(&self) -> impl Iterator<Item = &Pick> {
        self.goalkeeper
            .iter()
            .chain(self.defenders.iter())
            .chain(self.midfielders.iter())
            .chain(self.attackers.iter())
            .chain(self.coach.iter())
    }
}

/// The inputs of a generation pass besides the round itself.
#[derive(Clone, Copy, Debug)]
pub struct Request<'a> {
    pub selection: &'a Selection,
    pub locked: &'a FxHashSet<PlayerId>,
    /// Restricts auto-selection to these players; empty means no restriction.
    pub pool: &'a FxHashSet<PlayerId>,
}

#[derive(Debug, Clone)]
pub struct Generation {
    pub variations: Vec<Variation>,
    pub ledger: Ledger,
    /// Whether the unused offensive pool can no longer support another pass.
    pub exhausted: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum GenerateError {
    #[error("{0}")]
    Conflict(#[from] ConflictError),

    #[error("{0}")]
    Empty(#[from] EmptyResult),
}

#[derive(Debug, Error, PartialEq)]
pub enum EmptyResult {
    #[error("no lineup could be formed from the selected players; add more options to the pool")]
    PoolTooSmall,

    #[error("the selected defenses lack a complete lineup for the chosen formations, or there are not enough confirmed midfielders and attackers; try other combinations")]
    InsufficientProbable,
}

/// The confirmed midfielders and attackers eligible for auto-selection this pass.
struct Universe<'a> {
    midfielders: Vec<&'a Player>,
    attackers: Vec<&'a Player>,
}
impl<'a> Universe<'a> {
    fn new(round: &'a Round, pool: &FxHashSet<PlayerId>) -> Self {
        let eligible = || {
            round
                .players
                .iter()
                .filter(|player| player.status == Status::Confirmed)
                .filter(|player| pool.is_empty() || pool.contains(&player.id))
        };
        Self {
            midfielders: eligible()
                .filter(|player| player.position == Position::Midfielder)
                .collect(),
            attackers: eligible()
                .filter(|player| player.position == Position::Attacker)
                .collect(),
        }
    }

    fn players(&self) -> impl Iterator<Item = &'a Player> + '_ {
        self.midfielders.iter().chain(self.attackers.iter()).copied()
    }
}

/// The part of a lineup that is fixed for a given defense.
struct DefenseBlock {
    team: DefenseTeam,
    goalkeeper: Vec<Pick>,
    defenders: Vec<Pick>,
    coach: Vec<Pick>,
}
impl DefenseBlock {
    fn ids(&self) -> FxHashSet<PlayerId> {
        self.goalkeeper
            .iter()
            .chain(self.defenders.iter())
            .chain(self.coach.iter())
            .map(|pick| pick.player.id)
            .collect()
    }
}

/// Runs one generation pass. Locked players are validated against every selected defense before
/// anything is assembled; a conflict fails the whole pass. Defenses that cannot be completed and
/// variations that cannot be filled are skipped.
pub fn generate(round: &Round, request: &Request, ledger: Ledger) -> Result<Generation, GenerateError> {
    let locked = round
        .players
        .iter()
        .filter(|player| request.locked.contains(&player.id))
        .collect::<Vec<_>>();
    for club in request.selection.clubs() {
        fixtures::check_locks(club, &round.matches, locked.iter().copied(), |id| {
            round.club_name(id)
        })?;
    }
    let locked_midfielders = locked
        .iter()
        .copied()
        .filter(|player| player.position == Position::Midfielder)
        .collect::<Vec<_>>();
    let locked_attackers = locked
        .iter()
        .copied()
        .filter(|player| player.position == Position::Attacker)
        .collect::<Vec<_>>();

    let universe = Universe::new(round, request.pool);
    let mut ledger = ledger;
    ledger.used.extend(request.locked.iter().copied());
    let mut variations = vec![];

    for &(club, formation) in request.selection.iter() {
        let block = match assemble_defense(round, club, formation) {
            Ok(block) => block,
            Err(err) => {
                warn!(
                    "skipping {} for formation {formation}: {err}",
                    round.club_name(club)
                );
                continue;
            }
        };
        let opponent = fixtures::opponent_of(club, &round.matches);
        let not_opposing = |player: &&Player| Some(player.club) != opponent;
        let midfielders = universe
            .midfielders
            .iter()
            .copied()
            .filter(not_opposing)
            .collect::<Vec<_>>();
        let attackers = universe
            .attackers
            .iter()
            .copied()
            .filter(not_opposing)
            .collect::<Vec<_>>();
        let lineup = block.ids();

        for strategy in Strategy::iter() {
            let exclusions = Exclusions {
                used: &ledger.used,
                lineup: &lineup,
            };
            let auto_midfielders = fill(
                &locked_midfielders,
                &midfielders,
                formation.midfielders(),
                strategy,
                exclusions,
            );
            let auto_attackers = fill(
                &locked_attackers,
                &attackers,
                formation.attackers(),
                strategy,
                exclusions,
            );
            let (Some(auto_midfielders), Some(auto_attackers)) = (auto_midfielders, auto_attackers)
            else {
                debug!(
                    "omitting {} ({formation}) for {}: not enough offensive players",
                    strategy.title(),
                    block.team.name
                );
                continue;
            };

            ledger
                .used
                .extend(auto_midfielders.iter().chain(auto_attackers.iter()).map(|player| player.id));
            variations.push(Variation {
                id: ledger.issue(),
                title: format!("{} ({formation})", strategy.title()),
                rationale: strategy.rationale().into(),
                strategy,
                formation,
                defense: block.team.clone(),
                goalkeeper: block.goalkeeper.clone(),
                defenders: block.defenders.clone(),
                midfielders: merge(&locked_midfielders, &auto_midfielders),
                attackers: merge(&locked_attackers, &auto_attackers),
                coach: block.coach.clone(),
            });
        }
    }

    if !request.selection.is_empty() && variations.is_empty() {
        let empty = if request.pool.is_empty() {
            EmptyResult::InsufficientProbable
        } else {
            EmptyResult::PoolTooSmall
        };
        return Err(empty.into());
    }

    let remaining = exhaustion::remaining(universe.players(), &ledger.used);
    let locked_demand = Demand::count(locked.iter().copied());
    let exhausted = exhaustion::is_exhausted(request.selection.formations(), &remaining, &locked_demand);
    debug!(
        "generated {} variations for {} defenses, {} ids used, exhausted: {exhausted}",
        variations.len(),
        request.selection.len(),
        ledger.used.len()
    );
    Ok(Generation {
        variations,
        ledger,
        exhausted,
    })
}

#[derive(Debug, Error)]
enum DefenseError {
    #[error("club is not part of the round")]
    UnknownClub,

    #[error("incomplete defense, {0}")]
    Shortfall(#[from] Shortfall),
}

fn assemble_defense(round: &Round, club: ClubId, formation: Formation) -> Result<DefenseBlock, DefenseError> {
    let details = round.clubs.get(&club).ok_or(DefenseError::UnknownClub)?;
    let goalkeeper = availability::require(round.club_players(club), &[Position::Goalkeeper], 1)?;
    let mut defenders = availability::require(round.club_players(club), &BACK_LINE, formation.defenders())?;
    defenders.sort_by(|a, b| b.player.average.total_cmp(&a.player.average));
    let coach = availability::require(round.club_players(club), &[Position::Coach], 1)?;
    Ok(DefenseBlock {
        team: DefenseTeam {
            club,
            name: details.name.clone(),
            badge: details.badges.medium.clone(),
        },
        goalkeeper,
        defenders,
        coach,
    })
}

/// The auto-selected players completing a line of `required` players alongside `locked`, or `None`
/// if the line cannot be completed exactly.
fn fill<'a>(
    locked: &[&Player],
    candidates: &[&'a Player],
    required: usize,
    strategy: Strategy,
    exclusions: Exclusions,
) -> Option<Vec<&'a Player>> {
    let needed = required.saturating_sub(locked.len());
    let auto = if needed > 0 {
        selector::select(candidates, exclusions, strategy.ranking(), strategy.window(needed))
    } else {
        vec![]
    };
    if locked.len() + auto.len() == required {
        Some(auto)
    } else {
        None
    }
}

fn merge(locked: &[&Player], auto: &[&Player]) -> Vec<Pick> {
    locked.iter().chain(auto.iter()).map(|&player| Pick::from(player)).collect()
}
