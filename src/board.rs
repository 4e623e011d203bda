//! One player's grid: cell states, ship placement and attack resolution.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{AttackOutcome, BoardError, Coord};
use crate::ship::{Catalog, Rotation};

/// State of a single grid cell. Transitions are forward-only:
/// `Occupied -> Hit -> Sunk` and `Empty -> Miss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Occupied(u8),
    Hit(u8),
    Sunk(u8),
    Miss,
}

impl Cell {
    /// Fixed integer encoding shared with external renderers and log
    /// consumers: 0 empty water, 1-7 ship id, 8 hit, 9 sunk, 10 miss.
    pub fn encode(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(id) => id,
            Cell::Hit(_) => 8,
            Cell::Sunk(_) => 9,
            Cell::Miss => 10,
        }
    }
}

/// A ship resident on the board: its absolute cells and hit tally.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlacedShip {
    id: u8,
    cells: Vec<Coord>,
    hits: usize,
}

impl PlacedShip {
    fn is_sunk(&self) -> bool {
        self.hits == self.cells.len()
    }
}

/// One player's board. The board is the durable record of a validated fleet;
/// per-ship cell sets are fixed at placement time and never re-derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
    ships: Vec<PlacedShip>,
}

impl Board {
    /// Create an empty board, all cells `Empty`.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![Cell::Empty; height * width],
            ships: Vec::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if coord.row < self.height && coord.col < self.width {
            Some(coord.row * self.width + coord.col)
        } else {
            None
        }
    }

    /// State of the cell at `coord`.
    pub fn cell(&self, coord: Coord) -> Result<Cell, BoardError> {
        self.index(coord)
            .map(|i| self.cells[i])
            .ok_or(BoardError::OutOfBounds(coord))
    }

    /// Whether the ship with `id` has been placed here.
    pub fn has_ship(&self, id: u8) -> bool {
        self.ships.iter().any(|s| s.id == id)
    }

    /// Ids of all placed ships, in placement order.
    pub fn placed_ship_ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.ships.iter().map(|s| s.id)
    }

    /// Count of not-yet-hit segments of the ship with `id`.
    pub fn remaining_segments(&self, id: u8) -> Result<usize, BoardError> {
        self.ships
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.cells.len() - s.hits)
            .ok_or(BoardError::UnknownShipId(id))
    }

    /// Place one ship. Fails with `OutOfBounds` if any cell falls outside the
    /// grid, `Overlap` if any cell is taken, `ShipAlreadyPlaced` if the id
    /// was placed before. Each ship id is placed at most once.
    pub fn place_ship(
        &mut self,
        catalog: &Catalog,
        id: u8,
        anchor: Coord,
        rotation: Rotation,
    ) -> Result<(), BoardError> {
        let ship = catalog.get(id)?;
        if self.has_ship(id) {
            return Err(BoardError::ShipAlreadyPlaced(id));
        }
        let mut cells = Vec::with_capacity(ship.size());
        for (dr, dc) in ship.footprint(rotation) {
            let coord = Coord::new(anchor.row + dr, anchor.col + dc);
            let idx = self.index(coord).ok_or(BoardError::OutOfBounds(coord))?;
            if self.cells[idx] != Cell::Empty {
                return Err(BoardError::Overlap(coord));
            }
            cells.push(coord);
        }
        for &coord in &cells {
            // bounds were checked above
            if let Some(idx) = self.index(coord) {
                self.cells[idx] = Cell::Occupied(id);
            }
        }
        self.ships.push(PlacedShip { id, cells, hits: 0 });
        Ok(())
    }

    /// Resolve an attack at `coord`, advancing cell state. An `Empty` cell
    /// becomes `Miss`; an `Occupied` cell becomes `Hit`, and when the last
    /// segment of a ship is hit all of its cells become `Sunk`. Attacking a
    /// `Hit`, `Sunk` or `Miss` cell again fails with `AlreadyAttacked`.
    pub fn attack(&mut self, coord: Coord) -> Result<AttackOutcome, BoardError> {
        let idx = self.index(coord).ok_or(BoardError::OutOfBounds(coord))?;
        match self.cells[idx] {
            Cell::Empty => {
                self.cells[idx] = Cell::Miss;
                Ok(AttackOutcome::Miss)
            }
            Cell::Occupied(id) => {
                self.cells[idx] = Cell::Hit(id);
                let pos = self
                    .ships
                    .iter()
                    .position(|s| s.id == id)
                    .ok_or(BoardError::UnknownShipId(id))?;
                self.ships[pos].hits += 1;
                if self.ships[pos].is_sunk() {
                    let cells = self.ships[pos].cells.clone();
                    for c in cells {
                        if let Some(i) = self.index(c) {
                            self.cells[i] = Cell::Sunk(id);
                        }
                    }
                    Ok(AttackOutcome::Sunk { ship: id })
                } else {
                    Ok(AttackOutcome::Hit { ship: id })
                }
            }
            Cell::Hit(_) | Cell::Sunk(_) | Cell::Miss => Err(BoardError::AlreadyAttacked(coord)),
        }
    }

    /// Returns `true` when every placed ship is fully sunk.
    pub fn is_defeated(&self) -> bool {
        self.ships.iter().all(|s| s.is_sunk())
    }

    /// Returns a random legal (anchor, rotation) for the ship with `id`,
    /// rejection-sampling against current occupancy. Gives up with
    /// `UnableToPlaceShip` after 100 rejected samples.
    pub fn random_placement<R: Rng>(
        &self,
        rng: &mut R,
        catalog: &Catalog,
        id: u8,
    ) -> Result<(Coord, Rotation), BoardError> {
        let ship = catalog.get(id)?;
        let mut attempts = 0;
        while attempts < 100 {
            attempts += 1;
            let rotation = Rotation::ALL[rng.random_range(0..Rotation::ALL.len())];
            let footprint = ship.footprint(rotation);
            let max_dr = footprint.iter().map(|p| p.0).max().unwrap_or(0);
            let max_dc = footprint.iter().map(|p| p.1).max().unwrap_or(0);
            if max_dr >= self.height || max_dc >= self.width {
                continue;
            }
            let anchor = Coord::new(
                rng.random_range(0..self.height - max_dr),
                rng.random_range(0..self.width - max_dc),
            );
            let clear = footprint.iter().all(|&(dr, dc)| {
                let coord = Coord::new(anchor.row + dr, anchor.col + dc);
                matches!(self.cell(coord), Ok(Cell::Empty))
            });
            if clear {
                return Ok((anchor, rotation));
            }
        }
        Err(BoardError::UnableToPlaceShip(id))
    }

    /// Cell states in the fixed integer encoding, row-major.
    pub fn encoded(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.encode()).collect()
    }
}

/// Absolute cells of one placed ship, as recorded in a snapshot. Carries the
/// ship identity the 8/9 cell markers erase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipRecord {
    pub id: u8,
    pub cells: Vec<Coord>,
}

/// Serializable board snapshot. `cells` uses the fixed integer encoding
/// (0 empty, 1-7 ship id, 8 hit, 9 sunk, 10 miss) that external renderers
/// and log consumers depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub height: usize,
    pub width: usize,
    pub cells: Vec<u8>,
    pub ships: Vec<ShipRecord>,
}

impl From<&Board> for BoardSnapshot {
    fn from(board: &Board) -> Self {
        BoardSnapshot {
            height: board.height,
            width: board.width,
            cells: board.encoded(),
            ships: board
                .ships
                .iter()
                .map(|s| ShipRecord {
                    id: s.id,
                    cells: s.cells.clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<&BoardSnapshot> for Board {
    type Error = BoardError;

    /// Rebuild a board from a snapshot, cross-checking the cell grid against
    /// the ship records. Restores an identical cell grid.
    fn try_from(snap: &BoardSnapshot) -> Result<Self, BoardError> {
        let expected = snap.height * snap.width;
        if snap.cells.len() != expected {
            return Err(BoardError::SnapshotSize {
                expected,
                found: snap.cells.len(),
            });
        }

        // Which ship owns each cell, per the records.
        let mut owner: Vec<Option<u8>> = vec![None; expected];
        for rec in &snap.ships {
            if snap.ships.iter().filter(|r| r.id == rec.id).count() > 1 {
                return Err(BoardError::ShipAlreadyPlaced(rec.id));
            }
            for &coord in &rec.cells {
                if coord.row >= snap.height || coord.col >= snap.width {
                    return Err(BoardError::OutOfBounds(coord));
                }
                let idx = coord.row * snap.width + coord.col;
                if owner[idx].is_some() {
                    return Err(BoardError::Overlap(coord));
                }
                owner[idx] = Some(rec.id);
            }
        }

        let mut cells = Vec::with_capacity(expected);
        for (idx, &value) in snap.cells.iter().enumerate() {
            let coord = Coord::new(idx / snap.width, idx % snap.width);
            let cell = match (value, owner[idx]) {
                (0, None) => Cell::Empty,
                (10, None) => Cell::Miss,
                (id @ 1..=7, Some(owner_id)) if id == owner_id => Cell::Occupied(id),
                (8, Some(owner_id)) => Cell::Hit(owner_id),
                (9, Some(owner_id)) => Cell::Sunk(owner_id),
                (v, _) if v > 10 => return Err(BoardError::InvalidEncoding(v)),
                _ => return Err(BoardError::SnapshotMismatch(coord)),
            };
            cells.push(cell);
        }

        let mut ships = Vec::with_capacity(snap.ships.len());
        for rec in &snap.ships {
            let mut hits = 0;
            let mut sunk = 0;
            for &coord in &rec.cells {
                let idx = coord.row * snap.width + coord.col;
                match cells[idx] {
                    Cell::Occupied(_) => {}
                    Cell::Hit(_) => hits += 1,
                    Cell::Sunk(_) => {
                        hits += 1;
                        sunk += 1;
                    }
                    _ => return Err(BoardError::SnapshotMismatch(coord)),
                }
            }
            // a ship is sunk exactly when all segments are hit
            let fully_hit = !rec.cells.is_empty() && hits == rec.cells.len();
            if (sunk > 0 || fully_hit) && sunk != rec.cells.len() {
                return Err(BoardError::SnapshotMismatch(rec.cells[0]));
            }
            ships.push(PlacedShip {
                id: rec.id,
                cells: rec.cells.clone(),
                hits,
            });
        }

        Ok(Board {
            height: snap.height,
            width: snap.width,
            cells,
            ships,
        })
    }
}
