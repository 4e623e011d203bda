//! Collaborator capabilities crossing the engine boundary: board setup and
//! attack strategy. Implementations are untrusted; the referee validates
//! every value they produce.

use log::warn;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::common::{AttackOutcome, Coord};
use crate::placement::{random_fleet, Placement};
use crate::ship::Catalog;

/// Produces a full fleet placement for one board at game start.
pub trait BoardSetup {
    /// Called once with the board dimensions and catalog before placements
    /// are requested.
    fn initialize(&mut self, _height: usize, _width: usize, _catalog: &Catalog) {}

    /// Produce the candidate placements for the whole fleet.
    fn produce_placements(&mut self, rng: &mut SmallRng) -> Vec<Placement>;
}

/// Chooses attacks and learns from their results.
pub trait Strategy {
    /// Called once with the board dimensions and catalog before play.
    fn initialize(&mut self, _height: usize, _width: usize, _catalog: &Catalog) {}

    /// Next coordinate to attack on the opponent board.
    fn next_attack(&mut self, rng: &mut SmallRng) -> Coord;

    /// Result of this player's own attack.
    fn register_attack(&mut self, _coord: Coord, _outcome: AttackOutcome) {}

    /// An opponent attack resolved against this player's board.
    fn register_opponent_attack(&mut self, _coord: Coord, _outcome: AttackOutcome) {}
}

/// One participant: its setup and strategy capabilities plus a private RNG.
/// Every random decision a player makes flows through its own RNG, so two
/// contenders with fixed seeds replay identically.
pub struct Contender {
    pub setup: Box<dyn BoardSetup>,
    pub strategy: Box<dyn Strategy>,
    pub rng: SmallRng,
}

impl Contender {
    pub fn new(setup: Box<dyn BoardSetup>, strategy: Box<dyn Strategy>, rng: SmallRng) -> Self {
        Self {
            setup,
            strategy,
            rng,
        }
    }
}

/// Setup collaborator that scatters the fleet uniformly at random.
pub struct RandomSetup {
    height: usize,
    width: usize,
    catalog: Catalog,
}

impl RandomSetup {
    pub fn new() -> Self {
        Self {
            height: 0,
            width: 0,
            catalog: Catalog::standard(),
        }
    }
}

impl BoardSetup for RandomSetup {
    fn initialize(&mut self, height: usize, width: usize, catalog: &Catalog) {
        self.height = height;
        self.width = width;
        self.catalog = catalog.clone();
    }

    fn produce_placements(&mut self, rng: &mut SmallRng) -> Vec<Placement> {
        match random_fleet(rng, &self.catalog, self.height, self.width) {
            Ok(placements) => placements,
            Err(e) => {
                // an empty fleet fails validation and aborts the match
                warn!("random fleet generation failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Strategy that fires at every cell exactly once in random order.
pub struct RandomStrategy {
    untried: Vec<Coord>,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self {
            untried: Vec::new(),
        }
    }
}

impl Strategy for RandomStrategy {
    fn initialize(&mut self, height: usize, width: usize, _catalog: &Catalog) {
        self.untried = (0..height)
            .flat_map(|r| (0..width).map(move |c| Coord::new(r, c)))
            .collect();
    }

    fn next_attack(&mut self, rng: &mut SmallRng) -> Coord {
        if self.untried.is_empty() {
            // exhausted board; the referee treats the repeat as a forfeit
            return Coord::new(0, 0);
        }
        let i = rng.random_range(0..self.untried.len());
        self.untried.swap_remove(i)
    }
}
