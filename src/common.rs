//! Shared engine types: coordinates, player identity, attack outcomes and
//! errors.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A cell position on a board, row-major from the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// One of the two match participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// The other participant.
    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// 1-based number for logs and summaries.
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    /// 0-based index for per-player arrays.
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}

/// Result of resolving a single attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// Attack landed on open water.
    Miss,
    /// Attack hit a ship segment without sinking it.
    Hit { ship: u8 },
    /// Attack hit the last intact segment; the whole ship is down.
    Sunk { ship: u8 },
}

impl AttackOutcome {
    /// Ship id for hits and sinks, `None` for misses.
    pub fn ship(self) -> Option<u8> {
        match self {
            AttackOutcome::Miss => None,
            AttackOutcome::Hit { ship } | AttackOutcome::Sunk { ship } => Some(ship),
        }
    }

    pub fn is_hit(self) -> bool {
        !matches!(self, AttackOutcome::Miss)
    }

    pub fn is_sunk(self) -> bool {
        matches!(self, AttackOutcome::Sunk { .. })
    }
}

/// Errors returned by catalog and board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Ship id outside the catalog.
    UnknownShipId(u8),
    /// Catalog construction saw the same id twice.
    DuplicateShipId(u8),
    /// Coordinate lies outside the grid.
    OutOfBounds(Coord),
    /// Placement cell is already occupied by another ship.
    Overlap(Coord),
    /// Ship id was already placed on this board.
    ShipAlreadyPlaced(u8),
    /// Cell was attacked before.
    AlreadyAttacked(Coord),
    /// Random placement gave up after too many rejected samples.
    UnableToPlaceShip(u8),
    /// Snapshot cell value outside the 0..=10 encoding.
    InvalidEncoding(u8),
    /// Snapshot cell grid disagrees with its ship records.
    SnapshotMismatch(Coord),
    /// Snapshot cell count does not match its dimensions.
    SnapshotSize { expected: usize, found: usize },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::UnknownShipId(id) => write!(f, "unknown ship id {}", id),
            BoardError::DuplicateShipId(id) => write!(f, "duplicate ship id {}", id),
            BoardError::OutOfBounds(c) => write!(f, "coordinate {} is out of bounds", c),
            BoardError::Overlap(c) => write!(f, "cell {} is already occupied", c),
            BoardError::ShipAlreadyPlaced(id) => write!(f, "ship {} is already placed", id),
            BoardError::AlreadyAttacked(c) => write!(f, "cell {} was already attacked", c),
            BoardError::UnableToPlaceShip(id) => write!(f, "unable to place ship {}", id),
            BoardError::InvalidEncoding(v) => write!(f, "invalid cell encoding {}", v),
            BoardError::SnapshotMismatch(c) => {
                write!(f, "snapshot cells disagree with ship records at {}", c)
            }
            BoardError::SnapshotSize { expected, found } => {
                write!(f, "snapshot has {} cells, expected {}", found, expected)
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// Failure of a whole candidate fleet during setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetError {
    /// A placement was rejected by the board.
    Placement { ship: u8, reason: BoardError },
    /// All placements succeeded but a catalog ship was never placed.
    IncompleteFleet { ship: u8 },
}

impl fmt::Display for FleetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FleetError::Placement { ship, reason } => {
                write!(f, "ship {} could not be placed: {}", ship, reason)
            }
            FleetError::IncompleteFleet { ship } => {
                write!(f, "fleet is incomplete: ship {} was never placed", ship)
            }
        }
    }
}

impl std::error::Error for FleetError {}

/// A match-fatal collaborator failure, attributed to the offending player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// Board setup failed validation.
    Setup { player: PlayerId, error: FleetError },
    /// A strategy produced malformed attack coordinates twice in one turn.
    InvalidMove { player: PlayerId, coord: Coord, reason: BoardError },
}

impl MatchError {
    /// The player at fault.
    pub fn offender(&self) -> PlayerId {
        match self {
            MatchError::Setup { player, .. } | MatchError::InvalidMove { player, .. } => *player,
        }
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::Setup { player, error } => {
                write!(f, "{} failed board setup: {}", player, error)
            }
            MatchError::InvalidMove { player, coord, reason } => {
                write!(f, "{} made an invalid move at {}: {}", player, coord, reason)
            }
        }
    }
}

impl std::error::Error for MatchError {}
