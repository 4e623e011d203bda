use broadside::{calc_pdf, AttackOutcome, Board, BoardError, BoardSnapshot, Catalog, Coord};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn random_board(seed: u64) -> Board {
    let catalog = Catalog::standard();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = Board::new(10, 10);
    for ship in catalog.ships() {
        let (anchor, rotation) = board.random_placement(&mut rng, &catalog, ship.id()).unwrap();
        board
            .place_ship(&catalog, ship.id(), anchor, rotation)
            .unwrap();
    }
    board
}

fn ship_cells(board: &Board, id: u8) -> Vec<Coord> {
    let width = board.width();
    board
        .encoded()
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == id)
        .map(|(i, _)| Coord::new(i / width, i % width))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A full random fleet occupies exactly the catalog's cell total, with
    /// zero overlaps.
    #[test]
    fn fleet_cell_count_is_conserved(seed in any::<u64>()) {
        let board = random_board(seed);
        let occupied = board.encoded().iter().filter(|&&v| v != 0).count();
        prop_assert_eq!(occupied, Catalog::standard().total_cells());
    }

    /// Attacking every cell of one ship, in any order, hits until the final
    /// cell sinks it; re-attacking afterwards is rejected.
    #[test]
    fn any_attack_order_sinks_on_the_last_cell(
        seed in any::<u64>(),
        ship_idx in 0..7usize,
    ) {
        let catalog = Catalog::standard();
        let id = catalog.ships()[ship_idx].id();
        let mut board = random_board(seed);
        let mut cells = ship_cells(&board, id);

        // shuffle the attack order
        let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(1));
        for i in (1..cells.len()).rev() {
            cells.swap(i, rng.random_range(0..=i));
        }

        for (n, &coord) in cells.iter().enumerate() {
            let outcome = board.attack(coord).unwrap();
            if n + 1 < cells.len() {
                prop_assert_eq!(outcome, AttackOutcome::Hit { ship: id });
            } else {
                prop_assert_eq!(outcome, AttackOutcome::Sunk { ship: id });
            }
        }
        for &coord in &cells {
            prop_assert_eq!(
                board.attack(coord).unwrap_err(),
                BoardError::AlreadyAttacked(coord)
            );
        }
    }

    /// A board survives a snapshot round-trip mid-game.
    #[test]
    fn snapshot_roundtrip(seed in any::<u64>(), shots in 0..60usize) {
        let mut board = random_board(seed);
        let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(2));
        for _ in 0..shots {
            let coord = Coord::new(rng.random_range(0..10), rng.random_range(0..10));
            let _ = board.attack(coord);
        }
        let snapshot = BoardSnapshot::from(&board);
        let restored = Board::try_from(&snapshot).unwrap();
        prop_assert_eq!(&restored, &board);
        prop_assert_eq!(restored.encoded(), board.encoded());
    }

    /// The targeting density is a probability distribution that never
    /// weights an attacked cell.
    #[test]
    fn pdf_is_normalized_and_skips_attacked_cells(
        seed in any::<u64>(),
        misses in 0..20usize,
    ) {
        let catalog = Catalog::standard();
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut miss_grid = vec![false; 100];
        for _ in 0..misses {
            miss_grid[rng.random_range(0..100)] = true;
        }
        let hit_grid = vec![false; 100];

        let pdf = calc_pdf(10, 10, &hit_grid, &miss_grid, catalog.ships());
        let total: f64 = pdf.iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
        for (i, &p) in pdf.iter().enumerate() {
            if miss_grid[i] {
                prop_assert_eq!(p, 0.0);
            }
            prop_assert!(p >= 0.0);
        }
    }
}
