//! Match orchestration: setup validation, the alternating turn loop and the
//! event stream consumed by presentation adapters.

use core::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell};
use crate::common::{AttackOutcome, BoardError, Coord, MatchError, PlayerId};
use crate::config::DEFAULT_BOARD_SIZE;
use crate::placement::place_fleet;
use crate::player::Contender;
use crate::ship::Catalog;

/// Per-match configuration. A `max_turns` of zero selects the default cap of
/// `height * width * 100` total turns, after which the match is a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    pub height: usize,
    pub width: usize,
    pub starting_player: PlayerId,
    pub max_turns: usize,
}

impl MatchConfig {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            starting_player: PlayerId::One,
            max_turns: 0,
        }
    }

    /// Effective turn cap.
    pub fn turn_cap(&self) -> usize {
        if self.max_turns == 0 {
            self.height * self.width * 100
        } else {
            self.max_turns
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE, DEFAULT_BOARD_SIZE)
    }
}

/// One resolved attack, as appended to the per-turn event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    pub turn: usize,
    pub attacker: PlayerId,
    pub coord: Coord,
    pub outcome: AttackOutcome,
}

/// Terminal result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// All of the loser's ships were sunk, or the loser forfeited
    /// (`forfeit` carries the offense).
    Winner {
        player: PlayerId,
        turns: usize,
        forfeit: Option<MatchError>,
    },
    /// Turn cap reached with both fleets afloat.
    Draw { turns: usize },
    /// Setup failed before any attack was processed.
    Aborted {
        offender: PlayerId,
        reason: MatchError,
    },
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::Winner {
                player,
                turns,
                forfeit: None,
            } => write!(f, "{} wins after {} moves", player, turns),
            MatchOutcome::Winner {
                player,
                turns,
                forfeit: Some(err),
            } => write!(f, "{} wins by forfeit after {} moves: {}", player, turns, err),
            MatchOutcome::Draw { turns } => write!(f, "draw after {} moves", turns),
            MatchOutcome::Aborted { reason, .. } => write!(f, "aborted: {}", reason),
        }
    }
}

/// Presentation adapter seam. Implementations render, log or persist the
/// event stream; their failures are reported but never abort a match.
pub trait MatchObserver {
    fn on_setup(&mut self, _player: PlayerId, _board: &Board) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_attack(&mut self, _result: &AttackResult, _defender: &Board) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_finish(&mut self, _outcome: &MatchOutcome) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Observer that ignores every event.
pub struct NullObserver;

impl MatchObserver for NullObserver {}

/// Fan-out composite. Each inner observer failure is logged and swallowed so
/// one broken adapter cannot starve the others.
pub struct Observers(pub Vec<Box<dyn MatchObserver>>);

impl MatchObserver for Observers {
    fn on_setup(&mut self, player: PlayerId, board: &Board) -> anyhow::Result<()> {
        for obs in &mut self.0 {
            if let Err(e) = obs.on_setup(player, board) {
                warn!("observer failed on setup: {:#}", e);
            }
        }
        Ok(())
    }

    fn on_attack(&mut self, result: &AttackResult, defender: &Board) -> anyhow::Result<()> {
        for obs in &mut self.0 {
            if let Err(e) = obs.on_attack(result, defender) {
                warn!("observer failed on attack: {:#}", e);
            }
        }
        Ok(())
    }

    fn on_finish(&mut self, outcome: &MatchOutcome) -> anyhow::Result<()> {
        for obs in &mut self.0 {
            if let Err(e) = obs.on_finish(outcome) {
                warn!("observer failed on finish: {:#}", e);
            }
        }
        Ok(())
    }
}

/// Resolve `coord` against the defending board and package the outcome as an
/// event. Thin by design; the board owns the state transitions.
pub fn resolve_attack(
    board: &mut Board,
    turn: usize,
    attacker: PlayerId,
    coord: Coord,
) -> Result<AttackResult, BoardError> {
    let outcome = board.attack(coord)?;
    Ok(AttackResult {
        turn,
        attacker,
        coord,
        outcome,
    })
}

/// Drives one match between two contenders through `Setup -> InProgress ->
/// Finished`. Exactly one collaborator call is active at a time; all per-match
/// state lives in `run`, so a referee can be reused across matches.
pub struct Referee<'a> {
    catalog: &'a Catalog,
    config: MatchConfig,
}

impl<'a> Referee<'a> {
    pub fn new(catalog: &'a Catalog, config: MatchConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Run one match to completion. Collaborator misbehavior never panics or
    /// escapes; malformed setups and moves become `Aborted` and forfeit
    /// outcomes for the batch runner to record.
    pub fn run(
        &self,
        one: &mut Contender,
        two: &mut Contender,
        observer: &mut dyn MatchObserver,
    ) -> MatchOutcome {
        let outcome = self.play(one, two, observer);
        if let Err(e) = observer.on_finish(&outcome) {
            warn!("observer failed on finish: {:#}", e);
        }
        debug!("match finished: {}", outcome);
        outcome
    }

    fn play(
        &self,
        one: &mut Contender,
        two: &mut Contender,
        observer: &mut dyn MatchObserver,
    ) -> MatchOutcome {
        debug!(
            "match setup: {}x{} grid, {} ship fleet, {} starts",
            self.config.height,
            self.config.width,
            self.catalog.len(),
            self.config.starting_player,
        );

        let mut boards = [
            Board::new(self.config.height, self.config.width),
            Board::new(self.config.height, self.config.width),
        ];
        if let Err(reason) = self.setup_player(PlayerId::One, one, &mut boards[0], observer) {
            return MatchOutcome::Aborted {
                offender: PlayerId::One,
                reason,
            };
        }
        if let Err(reason) = self.setup_player(PlayerId::Two, two, &mut boards[1], observer) {
            return MatchOutcome::Aborted {
                offender: PlayerId::Two,
                reason,
            };
        }

        debug!("match in progress");
        let cap = self.config.turn_cap();
        let mut current = self.config.starting_player;
        let mut turn = 0;
        while turn < cap {
            turn += 1;
            let (attacker, defender) = match current {
                PlayerId::One => (&mut *one, &mut *two),
                PlayerId::Two => (&mut *two, &mut *one),
            };
            let defender_idx = current.opponent().index();

            let coord = match Self::request_attack(current, attacker, &boards[defender_idx]) {
                Ok(coord) => coord,
                Err(err) => {
                    return MatchOutcome::Winner {
                        player: current.opponent(),
                        turns: turn,
                        forfeit: Some(err),
                    };
                }
            };

            let result = match resolve_attack(&mut boards[defender_idx], turn, current, coord) {
                Ok(result) => result,
                Err(reason) => {
                    // the coordinate was validated above, so this cannot
                    // happen for a well-formed board; forfeit rather than
                    // crash the batch
                    return MatchOutcome::Winner {
                        player: current.opponent(),
                        turns: turn,
                        forfeit: Some(MatchError::InvalidMove {
                            player: current,
                            coord,
                            reason,
                        }),
                    };
                }
            };

            attacker.strategy.register_attack(coord, result.outcome);
            defender.strategy.register_opponent_attack(coord, result.outcome);
            if let Err(e) = observer.on_attack(&result, &boards[defender_idx]) {
                warn!("observer failed on attack: {:#}", e);
            }

            // termination check runs after every resolved attack, before the
            // next turn is dispatched
            if boards[defender_idx].is_defeated() {
                return MatchOutcome::Winner {
                    player: current,
                    turns: turn,
                    forfeit: None,
                };
            }
            current = current.opponent();
        }

        MatchOutcome::Draw { turns: cap }
    }

    fn setup_player(
        &self,
        player: PlayerId,
        contender: &mut Contender,
        board: &mut Board,
        observer: &mut dyn MatchObserver,
    ) -> Result<(), MatchError> {
        contender
            .setup
            .initialize(self.config.height, self.config.width, self.catalog);
        contender
            .strategy
            .initialize(self.config.height, self.config.width, self.catalog);
        let placements = contender.setup.produce_placements(&mut contender.rng);
        place_fleet(board, self.catalog, &placements)
            .map_err(|error| MatchError::Setup { player, error })?;
        if let Err(e) = observer.on_setup(player, board) {
            warn!("observer failed on setup: {:#}", e);
        }
        Ok(())
    }

    /// Request a coordinate from the active strategy and validate it against
    /// the defending board. One malformed coordinate earns a re-prompt; a
    /// second in the same turn forfeits the match.
    fn request_attack(
        player: PlayerId,
        attacker: &mut Contender,
        defender_board: &Board,
    ) -> Result<Coord, MatchError> {
        let coord = attacker.strategy.next_attack(&mut attacker.rng);
        match Self::validate_attack(defender_board, coord) {
            Ok(()) => Ok(coord),
            Err(reason) => {
                warn!("{} produced a malformed attack {}: {}", player, coord, reason);
                let retry = attacker.strategy.next_attack(&mut attacker.rng);
                match Self::validate_attack(defender_board, retry) {
                    Ok(()) => Ok(retry),
                    Err(reason) => Err(MatchError::InvalidMove {
                        player,
                        coord: retry,
                        reason,
                    }),
                }
            }
        }
    }

    fn validate_attack(board: &Board, coord: Coord) -> Result<(), BoardError> {
        match board.cell(coord)? {
            Cell::Hit(_) | Cell::Sunk(_) | Cell::Miss => Err(BoardError::AlreadyAttacked(coord)),
            Cell::Empty | Cell::Occupied(_) => Ok(()),
        }
    }
}
