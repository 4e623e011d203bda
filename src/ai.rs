//! Probability-density targeting over the opponent grid.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::common::{AttackOutcome, Coord};
use crate::player::Strategy;
use crate::ship::{Catalog, Rotation, ShipType};

/// Placements covering more observed hits receive dramatically more weight
/// so that cells adjacent to confirmed hits stand out against the many other
/// possible placements.
const HIT_BIAS: f64 = 10.0;

/// Distinct normalized footprints of a ship across all rotations. Symmetric
/// shapes repeat footprints under rotation; counting them twice would skew
/// the density toward those orientations.
fn distinct_footprints(ship: &ShipType) -> Vec<Vec<(usize, usize)>> {
    let mut footprints: Vec<Vec<(usize, usize)>> = Vec::with_capacity(4);
    for rotation in Rotation::ALL {
        let mut fp = ship.footprint(rotation);
        fp.sort_unstable();
        if !footprints.contains(&fp) {
            footprints.push(fp);
        }
    }
    footprints
}

/// Compute a probability density over all unattacked cells given the known
/// hits and misses and the remaining enemy ship types. Row-major, sums to 1.
pub fn calc_pdf(
    height: usize,
    width: usize,
    hits: &[bool],
    misses: &[bool],
    remaining: &[ShipType],
) -> Vec<f64> {
    let mut matrix = vec![0.0f64; height * width];

    for ship in remaining {
        for footprint in distinct_footprints(ship) {
            let max_dr = footprint.iter().map(|p| p.0).max().unwrap_or(0);
            let max_dc = footprint.iter().map(|p| p.1).max().unwrap_or(0);
            if max_dr >= height || max_dc >= width {
                continue;
            }
            for r in 0..height - max_dr {
                for c in 0..width - max_dc {
                    // check placement validity against misses and count hits
                    let mut valid = true;
                    let mut n_hits = 0usize;
                    for &(dr, dc) in &footprint {
                        let i = (r + dr) * width + (c + dc);
                        if misses[i] {
                            valid = false;
                            break;
                        }
                        if hits[i] {
                            n_hits += 1;
                        }
                    }
                    if !valid {
                        continue;
                    }

                    let weight = if n_hits == 0 {
                        1.0
                    } else {
                        HIT_BIAS.powi(n_hits as i32)
                    };
                    for &(dr, dc) in &footprint {
                        let i = (r + dr) * width + (c + dc);
                        if !hits[i] && !misses[i] {
                            matrix[i] += weight;
                        }
                    }
                }
            }
        }
    }

    normalize(matrix)
}

fn normalize(mut matrix: Vec<f64>) -> Vec<f64> {
    let total: f64 = matrix.iter().sum();
    if total == 0.0 {
        let uniform = 1.0 / matrix.len() as f64;
        matrix.fill(uniform);
        return matrix;
    }
    for v in matrix.iter_mut() {
        *v /= total;
    }
    matrix
}

/// Sample a coordinate from a probability matrix using a temperature
/// parameter. Lower temperatures bias sampling toward high-density cells.
pub fn sample_pdf<R: Rng + ?Sized>(
    pdf: &[f64],
    width: usize,
    temperature: f64,
    rng: &mut R,
) -> Coord {
    let mut total = 0.0;
    let adjusted: Vec<f64> = pdf
        .iter()
        .map(|v| {
            let v = v.powf(1.0 / temperature);
            total += v;
            v
        })
        .collect();
    if total == 0.0 {
        let i = rng.random_range(0..pdf.len());
        return Coord::new(i / width, i % width);
    }
    let threshold: f64 = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, v) in adjusted.iter().enumerate() {
        cumulative += v;
        if threshold < cumulative {
            return Coord::new(i / width, i % width);
        }
    }
    let last = pdf.len() - 1;
    Coord::new(last / width, last % width)
}

/// Strategy that samples attacks from a placement-density map, honing in on
/// confirmed hits and pruning ship types as they sink.
pub struct ProbabilityStrategy {
    height: usize,
    width: usize,
    hits: Vec<bool>,
    misses: Vec<bool>,
    remaining: Vec<ShipType>,
    temperature: f64,
}

impl ProbabilityStrategy {
    pub fn new() -> Self {
        Self {
            height: 0,
            width: 0,
            hits: Vec::new(),
            misses: Vec::new(),
            remaining: Vec::new(),
            // lower temperature hones suggestions in on likely placements
            temperature: 0.5,
        }
    }

    fn attacked(&self, i: usize) -> bool {
        self.hits[i] || self.misses[i]
    }
}

impl Strategy for ProbabilityStrategy {
    fn initialize(&mut self, height: usize, width: usize, catalog: &Catalog) {
        self.height = height;
        self.width = width;
        self.hits = vec![false; height * width];
        self.misses = vec![false; height * width];
        self.remaining = catalog.ships().to_vec();
    }

    fn next_attack(&mut self, rng: &mut SmallRng) -> Coord {
        let pdf = calc_pdf(
            self.height,
            self.width,
            &self.hits,
            &self.misses,
            &self.remaining,
        );
        let coord = sample_pdf(&pdf, self.width, self.temperature, rng);
        if !self.attacked(coord.row * self.width + coord.col) {
            return coord;
        }
        // the uniform fallback can land on attacked cells; never repeat one
        for i in 0..self.hits.len() {
            if !self.attacked(i) {
                return Coord::new(i / self.width, i % self.width);
            }
        }
        coord
    }

    fn register_attack(&mut self, coord: Coord, outcome: AttackOutcome) {
        let i = coord.row * self.width + coord.col;
        match outcome {
            AttackOutcome::Miss => self.misses[i] = true,
            AttackOutcome::Hit { .. } => self.hits[i] = true,
            AttackOutcome::Sunk { ship } => {
                self.hits[i] = true;
                self.remaining.retain(|s| s.id() != ship);
            }
        }
    }
}
