//! Ship type definitions: shapes, rotations and the catalog capability.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::common::BoardError;
use crate::config::SHIPS;

/// Quarter-turn rotation applied to a shape before placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    /// Rotate a relative offset clockwise in quarter turns.
    fn apply(self, row: i32, col: i32) -> (i32, i32) {
        match self {
            Rotation::R0 => (row, col),
            Rotation::R90 => (col, -row),
            Rotation::R180 => (-row, -col),
            Rotation::R270 => (-col, row),
        }
    }
}

/// Type of ship: id, name and the cells it occupies relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipType {
    id: u8,
    name: &'static str,
    shape: &'static [(i8, i8)],
}

impl ShipType {
    /// Create a new ship type. Shape offsets are (row, col) from the anchor
    /// in the unrotated orientation.
    pub const fn new(id: u8, name: &'static str, shape: &'static [(i8, i8)]) -> Self {
        Self { id, name, shape }
    }

    /// Ship's id, unique within a catalog.
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Ship's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of cells the ship occupies.
    pub fn size(&self) -> usize {
        self.shape.len()
    }

    /// Shape offsets under `rotation`, normalized so the smallest row and
    /// column are zero. The anchor maps to the top-left of the bounding box,
    /// so every absolute cell is `anchor + offset`.
    pub fn footprint(&self, rotation: Rotation) -> Vec<(usize, usize)> {
        let rotated: Vec<(i32, i32)> = self
            .shape
            .iter()
            .map(|&(r, c)| rotation.apply(r as i32, c as i32))
            .collect();
        let min_r = rotated.iter().map(|p| p.0).min().unwrap_or(0);
        let min_c = rotated.iter().map(|p| p.1).min().unwrap_or(0);
        rotated
            .into_iter()
            .map(|(r, c)| ((r - min_r) as usize, (c - min_c) as usize))
            .collect()
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {}, {} cells)", self.name, self.id, self.size())
    }
}

/// Immutable set of ship types for one match. Built once at game start and
/// passed by reference into boards and collaborators, never ambient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    ships: Vec<ShipType>,
}

impl Catalog {
    /// The full standard fleet from the configuration table.
    pub fn standard() -> Self {
        Self {
            ships: SHIPS.to_vec(),
        }
    }

    /// Build a catalog from explicit ship types. Ids must be unique and in
    /// the 1..=7 range the cell encoding reserves for ships.
    pub fn new(ships: Vec<ShipType>) -> Result<Self, BoardError> {
        for (i, ship) in ships.iter().enumerate() {
            if !(1..=7).contains(&ship.id()) {
                return Err(BoardError::UnknownShipId(ship.id()));
            }
            if ships[..i].iter().any(|s| s.id() == ship.id()) {
                return Err(BoardError::DuplicateShipId(ship.id()));
            }
        }
        Ok(Self { ships })
    }

    /// Catalog restricted to the given ids, in the order given.
    pub fn subset(&self, ids: &[u8]) -> Result<Self, BoardError> {
        let mut ships = Vec::with_capacity(ids.len());
        for &id in ids {
            ships.push(*self.get(id)?);
        }
        Self::new(ships)
    }

    /// Look up a ship type by id.
    pub fn get(&self, id: u8) -> Result<&ShipType, BoardError> {
        self.ships
            .iter()
            .find(|s| s.id() == id)
            .ok_or(BoardError::UnknownShipId(id))
    }

    /// Number of cells the ship with `id` occupies.
    pub fn size_of(&self, id: u8) -> Result<usize, BoardError> {
        Ok(self.get(id)?.size())
    }

    /// Normalized shape offsets for `id` under `rotation`.
    pub fn shape_of(&self, id: u8, rotation: Rotation) -> Result<Vec<(usize, usize)>, BoardError> {
        Ok(self.get(id)?.footprint(rotation))
    }

    pub fn ships(&self) -> &[ShipType] {
        &self.ships
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Sum of all ship sizes, the number of cells a full fleet occupies.
    pub fn total_cells(&self) -> usize {
        self.ships.iter().map(|s| s.size()).sum()
    }
}
