//! A generation session over one round: the selected defenses, the locked and pooled offensive
//! players, and the variations accumulated across passes.

use rustc_hash::FxHashSet;
use strum_macros::Display;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{ClubId, Player, PlayerId, Position, Round};
use crate::fixtures;
use crate::generator::{self, GenerateError, Ledger, Request, Selection, Variation};

/// Advanced mode requires at least this many pooled (or locked) midfielders.
pub const MIN_POOLED_MIDFIELDERS: usize = 3;

/// Advanced mode requires at least this many pooled (or locked) attackers.
pub const MIN_POOLED_ATTACKERS: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Mode {
    /// Offensive players may be locked freely; everything else is auto-selected league-wide.
    Quick,
    /// Auto-selection is restricted to a curated pool, and only pooled players may be locked.
    Advanced,
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("not enough midfielders and attackers selected to generate variations: {midfielders} midfielders (need {MIN_POOLED_MIDFIELDERS}), {attackers} attackers (need {MIN_POOLED_ATTACKERS})")]
    InsufficientPicks { midfielders: usize, attackers: usize },

    #[error("{0}")]
    Generate(#[from] GenerateError),
}

/// The offensive players on offer for locking and pooling: confirmed midfielders and attackers not
/// facing any of the selected defenses, best potential first.
#[derive(Debug, Default)]
pub struct OffenseBoard<'a> {
    pub midfielders: Vec<&'a Player>,
    pub attackers: Vec<&'a Player>,
}
impl OffenseBoard<'_> {
    fn count(players: &[&Player], ids: &FxHashSet<PlayerId>) -> usize {
        players.iter().filter(|player| ids.contains(&player.id)).count()
    }
}

#[derive(Debug)]
pub struct Session<'a> {
    round: &'a Round,
    mode: Mode,
    selection: Selection,
    locked: FxHashSet<PlayerId>,
    pool: FxHashSet<PlayerId>,
    variations: Vec<Variation>,
    issued: u64,
    exhausted: bool,
}
impl<'a> Session<'a> {
    pub fn new(round: &'a Round, mode: Mode) -> Self {
        Self {
            round,
            mode,
            selection: Selection::default(),
            locked: FxHashSet::default(),
            pool: FxHashSet::default(),
            variations: vec![],
            issued: 0,
            exhausted: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn locked(&self) -> &FxHashSet<PlayerId> {
        &self.locked
    }

    pub fn pool(&self) -> &FxHashSet<PlayerId> {
        &self.pool
    }

    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    /// Whether "generate more" should no longer be offered.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Adds `id` to the pool, or removes it along with its lock. Only meaningful in advanced mode;
    /// returns whether the player is pooled afterwards.
    pub fn toggle_pool(&mut self, id: PlayerId) -> bool {
        if self.mode != Mode::Advanced {
            return false;
        }
        if self.pool.remove(&id) {
            self.locked.remove(&id);
            false
        } else {
            self.pool.insert(id)
        }
    }

    /// Locks or unlocks `id`. In advanced mode only pooled players can be locked. Returns whether
    /// the player is locked afterwards.
    pub fn toggle_lock(&mut self, id: PlayerId) -> bool {
        if self.locked.remove(&id) {
            return false;
        }
        if self.mode == Mode::Advanced && !self.pool.contains(&id) {
            return false;
        }
        self.locked.insert(id)
    }

    pub fn offense_board(&self) -> OffenseBoard<'a> {
        let round = self.round;
        let opponents = self
            .selection
            .clubs()
            .filter_map(|club| fixtures::opponent_of(club, &round.matches))
            .collect::<FxHashSet<ClubId>>();
        let ranked = |position: Position| {
            let mut players = round
                .players
                .iter()
                .filter(|player| player.is_confirmed() && player.position == position)
                .filter(|player| !opponents.contains(&player.club))
                .collect::<Vec<_>>();
            players.sort_by(|a, b| b.potential().total_cmp(&a.potential()));
            players
        };
        OffenseBoard {
            midfielders: ranked(Position::Midfielder),
            attackers: ranked(Position::Attacker),
        }
    }

    /// In advanced mode, verifies that the pool and locks supply a minimal midfield and attack
    /// before a pass is attempted.
    pub fn check_picks(&self) -> Result<(), SessionError> {
        if self.mode != Mode::Advanced {
            return Ok(());
        }
        let board = self.offense_board();
        let midfielders = OffenseBoard::count(&board.midfielders, &self.pool)
            + OffenseBoard::count(&board.midfielders, &self.locked);
        let attackers = OffenseBoard::count(&board.attackers, &self.pool)
            + OffenseBoard::count(&board.attackers, &self.locked);
        if midfielders < MIN_POOLED_MIDFIELDERS || attackers < MIN_POOLED_ATTACKERS {
            Err(SessionError::InsufficientPicks {
                midfielders,
                attackers,
            })
        } else {
            Ok(())
        }
    }

    /// Starts over: generates a fresh set of variations, replacing any accumulated ones. On error
    /// the session is left as it was.
    pub fn generate(&mut self) -> Result<&[Variation], SessionError> {
        self.check_picks()?;
        let ledger = Ledger {
            used: FxHashSet::default(),
            issued: self.issued,
        };
        let request = self.request();
        let generation = generator::generate(self.round, &request, ledger)?;
        info!(
            "generated {} variations for {} defenses",
            generation.variations.len(),
            self.selection.len()
        );
        self.variations = generation.variations;
        self.issued = generation.ledger.issued;
        self.exhausted = generation.exhausted;
        Ok(&self.variations)
    }

    /// Generates further variations that repeat none of the midfielders and attackers already
    /// generated, and appends them. Returns only the new variations. A pass that yields nothing
    /// marks the session exhausted rather than failing.
    pub fn generate_more(&mut self) -> Result<&[Variation], SessionError> {
        if self.selection.is_empty() {
            return Ok(&[]);
        }
        let mut ledger = Ledger::resume(&self.variations);
        ledger.issued = ledger.issued.max(self.issued);
        let start = self.variations.len();
        let request = self.request();
        let outcome = generator::generate(self.round, &request, ledger);
        match outcome {
            Ok(generation) => {
                info!("generated {} more variations", generation.variations.len());
                self.exhausted = generation.exhausted || generation.variations.is_empty();
                self.issued = generation.ledger.issued;
                self.variations.extend(generation.variations);
            }
            Err(GenerateError::Empty(empty)) => {
                debug!("no further variations: {empty}");
                self.exhausted = true;
            }
            Err(err) => return Err(err.into()),
        }
        Ok(&self.variations[start..])
    }

    /// The pool stays empty in quick mode, so auto-selection there is league-wide.
    fn request(&self) -> Request<'_> {
        Request {
            selection: &self.selection,
            locked: &self.locked,
            pool: &self.pool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Formation;
    use crate::generator::EmptyResult;
    use crate::testing::RosterBuilder;

    /// Club 1 defends against club 2, club 3 against club 4. Club 2 and club 5 supply offense.
    fn round() -> Round {
        RosterBuilder::default()
            .fixture(1, 2)
            .fixture(3, 4)
            .defense(1, 4)
            .defense(3, 4)
            .offense(2, Position::Midfielder, 2)
            .offense(2, Position::Attacker, 2)
            .offense(5, Position::Midfielder, 12)
            .offense(5, Position::Attacker, 12)
            .build()
    }

    fn offensive_ids(variations: &[Variation]) -> FxHashSet<PlayerId> {
        variations.iter().flat_map(Variation::offensive_ids).collect()
    }

    #[test]
    fn quick_generate_and_more() {
        let round = round();
        let mut session = Session::new(&round, Mode::Quick);
        session.selection_mut().toggle(ClubId(1));
        let first = session.generate().unwrap().to_vec();
        assert_eq!(3, first.len());
        assert!(!session.is_exhausted());

        let more = session.generate_more().unwrap().to_vec();
        assert_eq!(1, more.len());
        assert!(offensive_ids(&first).is_disjoint(&offensive_ids(&more)));
        assert_eq!(4, session.variations().len());
        assert!(session.is_exhausted());

        let ids = session
            .variations()
            .iter()
            .map(|variation| variation.id)
            .collect::<FxHashSet<_>>();
        assert_eq!(4, ids.len());
    }

    #[test]
    fn more_after_exhaustion_adds_nothing() {
        let round = round();
        let mut session = Session::new(&round, Mode::Quick);
        session.selection_mut().toggle(ClubId(1));
        session.generate().unwrap();
        session.generate_more().unwrap();
        assert!(session.generate_more().unwrap().is_empty());
        assert!(session.is_exhausted());
        assert_eq!(4, session.variations().len());
    }

    #[test]
    fn more_without_selection_is_noop() {
        let round = round();
        let mut session = Session::new(&round, Mode::Quick);
        assert!(session.generate_more().unwrap().is_empty());
        assert!(!session.is_exhausted());
    }

    #[test]
    fn generate_replaces_previous_variations() {
        let round = round();
        let mut session = Session::new(&round, Mode::Quick);
        session.selection_mut().toggle(ClubId(1));
        session.generate().unwrap();
        session.generate_more().unwrap();
        let regenerated = session.generate().unwrap().to_vec();
        assert_eq!(3, regenerated.len());
        assert_eq!(3, session.variations().len());
        assert!(!session.is_exhausted());
        assert!(regenerated.iter().all(|variation| variation.id.0 > 4));
    }

    #[test]
    fn conflict_leaves_session_untouched() {
        let round = round();
        let mut session = Session::new(&round, Mode::Quick);
        session.selection_mut().toggle(ClubId(3));
        session.generate().unwrap();
        assert!(session.toggle_lock(PlayerId(2001)));
        session.selection_mut().toggle(ClubId(1));
        let err = session.generate().unwrap_err();
        assert!(matches!(err, SessionError::Generate(GenerateError::Conflict(_))));
        assert!(err.to_string().contains("Club 1"));
        assert_eq!(3, session.variations().len());
    }

    #[test]
    fn board_excludes_opponents() {
        let round = round();
        let mut session = Session::new(&round, Mode::Quick);
        assert_eq!(14, session.offense_board().midfielders.len());
        session.selection_mut().toggle(ClubId(1));
        let board = session.offense_board();
        assert_eq!(12, board.midfielders.len());
        assert_eq!(12, board.attackers.len());
        assert!(board.attackers.iter().all(|player| player.club == ClubId(5)));
        assert!(board
            .midfielders
            .windows(2)
            .all(|pair| pair[0].potential() >= pair[1].potential()));
    }

    #[test]
    fn advanced_locks_require_pool() {
        let round = round();
        let mut session = Session::new(&round, Mode::Advanced);
        assert!(!session.toggle_lock(PlayerId(5001)));
        assert!(session.toggle_pool(PlayerId(5001)));
        assert!(session.toggle_lock(PlayerId(5001)));
        assert!(session.locked().contains(&PlayerId(5001)));
        assert!(!session.toggle_pool(PlayerId(5001)));
        assert!(session.locked().is_empty());
        assert!(session.pool().is_empty());
    }

    #[test]
    fn quick_mode_has_no_pool() {
        let round = round();
        let mut session = Session::new(&round, Mode::Quick);
        assert!(!session.toggle_pool(PlayerId(5001)));
        assert!(session.pool().is_empty());
        assert!(session.toggle_lock(PlayerId(5001)));
        assert!(!session.toggle_lock(PlayerId(5001)));
    }

    #[test]
    fn advanced_requires_minimal_picks() {
        let round = round();
        let mut session = Session::new(&round, Mode::Advanced);
        session.selection_mut().select(ClubId(1), Formation::F451);
        for id in [5001, 5002, 5013] {
            session.toggle_pool(PlayerId(id));
        }
        assert_eq!(
            SessionError::InsufficientPicks {
                midfielders: 2,
                attackers: 1
            },
            session.generate().unwrap_err()
        );
        // a locked pool member counts twice
        session.toggle_lock(PlayerId(5001));
        assert!(session.check_picks().is_ok());
    }

    #[test]
    fn advanced_pool_too_small() {
        let round = round();
        let mut session = Session::new(&round, Mode::Advanced);
        session.selection_mut().toggle(ClubId(1));
        for id in [5001, 5002, 5003, 5013] {
            session.toggle_pool(PlayerId(id));
        }
        assert_eq!(
            SessionError::Generate(GenerateError::Empty(EmptyResult::PoolTooSmall)),
            session.generate().unwrap_err()
        );
    }

    #[test]
    fn advanced_draws_from_pool_only() {
        let round = round();
        let mut session = Session::new(&round, Mode::Advanced);
        session.selection_mut().select(ClubId(1), Formation::F451);
        let pool = [5004, 5005, 5006, 5007, 5008, 5020];
        for id in pool {
            session.toggle_pool(PlayerId(id));
        }
        let variations = session.generate().unwrap().to_vec();
        assert_eq!(1, variations.len());
        let drawn = offensive_ids(&variations);
        assert!(drawn.iter().all(|id| pool.contains(&id.0)));
        assert_eq!(6, drawn.len());
        assert!(session.is_exhausted());
    }
}
