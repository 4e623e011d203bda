//! Candidate fleet placements and the setup-time validator.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::common::{BoardError, Coord, FleetError};
use crate::ship::{Catalog, Rotation};

/// One candidate ship placement: which ship, where, how turned. Produced
/// once per board at game start and discarded after validation; the board is
/// the durable record thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub ship: u8,
    pub anchor: Coord,
    pub rotation: Rotation,
}

impl Placement {
    pub const fn new(ship: u8, anchor: Coord, rotation: Rotation) -> Self {
        Self {
            ship,
            anchor,
            rotation,
        }
    }
}

/// Apply a full candidate fleet to a board in the order given. The first
/// failing placement aborts setup with its ship id and reason; no rollback,
/// callers discard the board. After all placements succeed, every catalog id
/// must have been placed exactly once, else `IncompleteFleet`.
pub fn place_fleet(
    board: &mut Board,
    catalog: &Catalog,
    placements: &[Placement],
) -> Result<(), FleetError> {
    for p in placements {
        board
            .place_ship(catalog, p.ship, p.anchor, p.rotation)
            .map_err(|reason| FleetError::Placement {
                ship: p.ship,
                reason,
            })?;
    }
    for ship in catalog.ships() {
        if !board.has_ship(ship.id()) {
            return Err(FleetError::IncompleteFleet { ship: ship.id() });
        }
    }
    Ok(())
}

/// Generate a random legal fleet for the whole catalog by rejection sampling
/// on a scratch board.
pub fn random_fleet<R: Rng>(
    rng: &mut R,
    catalog: &Catalog,
    height: usize,
    width: usize,
) -> Result<Vec<Placement>, BoardError> {
    let mut board = Board::new(height, width);
    let mut placements = Vec::with_capacity(catalog.len());
    for ship in catalog.ships() {
        let (anchor, rotation) = board.random_placement(rng, catalog, ship.id())?;
        board.place_ship(catalog, ship.id(), anchor, rotation)?;
        placements.push(Placement::new(ship.id(), anchor, rotation));
    }
    Ok(placements)
}
