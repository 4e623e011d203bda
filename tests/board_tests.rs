use broadside::{
    AttackOutcome, Board, BoardError, BoardSnapshot, Catalog, Cell, Coord, Rotation,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn place_and_sink_a_destroyer() {
    let catalog = Catalog::standard();
    let mut board = Board::new(10, 10);
    board
        .place_ship(&catalog, 1, Coord::new(0, 0), Rotation::R0)
        .unwrap();

    assert_eq!(
        board.attack(Coord::new(0, 0)).unwrap(),
        AttackOutcome::Hit { ship: 1 }
    );
    assert_eq!(board.remaining_segments(1).unwrap(), 1);
    // final hit should sink
    assert_eq!(
        board.attack(Coord::new(0, 1)).unwrap(),
        AttackOutcome::Sunk { ship: 1 }
    );
    assert_eq!(board.cell(Coord::new(0, 0)).unwrap(), Cell::Sunk(1));
    assert!(board.is_defeated());

    // repeated attack triggers an error
    assert_eq!(
        board.attack(Coord::new(0, 1)).unwrap_err(),
        BoardError::AlreadyAttacked(Coord::new(0, 1))
    );
}

#[test]
fn misses_mark_water_and_cannot_repeat() {
    let catalog = Catalog::standard();
    let mut board = Board::new(10, 10);
    board
        .place_ship(&catalog, 1, Coord::new(0, 0), Rotation::R0)
        .unwrap();

    assert_eq!(board.attack(Coord::new(5, 5)).unwrap(), AttackOutcome::Miss);
    assert_eq!(board.cell(Coord::new(5, 5)).unwrap(), Cell::Miss);
    assert_eq!(
        board.attack(Coord::new(5, 5)).unwrap_err(),
        BoardError::AlreadyAttacked(Coord::new(5, 5))
    );
}

#[test]
fn attacks_outside_the_grid_are_rejected() {
    let mut board = Board::new(10, 10);
    assert_eq!(
        board.attack(Coord::new(10, 0)).unwrap_err(),
        BoardError::OutOfBounds(Coord::new(10, 0))
    );
    assert_eq!(
        board.attack(Coord::new(0, 10)).unwrap_err(),
        BoardError::OutOfBounds(Coord::new(0, 10))
    );
}

#[test]
fn placements_respect_bounds_and_occupancy() {
    let catalog = Catalog::standard();
    let mut board = Board::new(10, 10);

    // Carrier is 2x3; anchored at (9,9) it runs off both edges
    assert!(matches!(
        board
            .place_ship(&catalog, 7, Coord::new(9, 9), Rotation::R0)
            .unwrap_err(),
        BoardError::OutOfBounds(_)
    ));

    board
        .place_ship(&catalog, 2, Coord::new(0, 0), Rotation::R0)
        .unwrap();
    assert!(matches!(
        board
            .place_ship(&catalog, 3, Coord::new(0, 2), Rotation::R0)
            .unwrap_err(),
        BoardError::Overlap(_)
    ));
    assert_eq!(
        board
            .place_ship(&catalog, 2, Coord::new(5, 0), Rotation::R0)
            .unwrap_err(),
        BoardError::ShipAlreadyPlaced(2)
    );
}

#[test]
fn random_fleet_occupies_exactly_the_catalog_cells() {
    let catalog = Catalog::standard();
    let mut board = Board::new(10, 10);
    let mut rng = SmallRng::seed_from_u64(42);
    for ship in catalog.ships() {
        let (anchor, rotation) = board.random_placement(&mut rng, &catalog, ship.id()).unwrap();
        board
            .place_ship(&catalog, ship.id(), anchor, rotation)
            .unwrap();
    }
    let occupied = board.encoded().iter().filter(|&&v| v != 0).count();
    assert_eq!(occupied, catalog.total_cells());
}

#[test]
fn defeat_requires_every_ship_sunk() {
    let catalog = Catalog::standard();
    let mut board = Board::new(10, 10);
    board
        .place_ship(&catalog, 1, Coord::new(0, 0), Rotation::R0)
        .unwrap();
    board
        .place_ship(&catalog, 2, Coord::new(2, 0), Rotation::R0)
        .unwrap();

    board.attack(Coord::new(0, 0)).unwrap();
    board.attack(Coord::new(0, 1)).unwrap();
    assert!(!board.is_defeated());

    board.attack(Coord::new(2, 0)).unwrap();
    board.attack(Coord::new(2, 1)).unwrap();
    assert!(!board.is_defeated());
    assert_eq!(
        board.attack(Coord::new(2, 2)).unwrap(),
        AttackOutcome::Sunk { ship: 2 }
    );
    assert!(board.is_defeated());
}

#[test]
fn snapshot_roundtrip_restores_the_cell_grid() {
    let catalog = Catalog::standard();
    let mut board = Board::new(10, 10);
    board
        .place_ship(&catalog, 1, Coord::new(0, 0), Rotation::R0)
        .unwrap();
    board
        .place_ship(&catalog, 4, Coord::new(3, 3), Rotation::R90)
        .unwrap();

    // a miss, a partial hit and a full sink
    board.attack(Coord::new(9, 9)).unwrap();
    board.attack(Coord::new(0, 0)).unwrap();
    board.attack(Coord::new(0, 1)).unwrap();
    let hit = board
        .encoded()
        .iter()
        .position(|&v| v == 4)
        .map(|i| Coord::new(i / 10, i % 10))
        .unwrap();
    board.attack(hit).unwrap();

    let snapshot = BoardSnapshot::from(&board);
    let restored = Board::try_from(&snapshot).unwrap();
    assert_eq!(restored, board);
    assert_eq!(restored.encoded(), board.encoded());
}

#[test]
fn corrupt_snapshots_are_rejected() {
    let catalog = Catalog::standard();
    let mut board = Board::new(10, 10);
    board
        .place_ship(&catalog, 1, Coord::new(0, 0), Rotation::R0)
        .unwrap();
    let snapshot = BoardSnapshot::from(&board);

    let mut bad = snapshot.clone();
    bad.cells[5] = 11;
    assert_eq!(
        Board::try_from(&bad).unwrap_err(),
        BoardError::InvalidEncoding(11)
    );

    // hit marker on a cell no ship record owns
    let mut bad = snapshot.clone();
    bad.cells[55] = 8;
    assert_eq!(
        Board::try_from(&bad).unwrap_err(),
        BoardError::SnapshotMismatch(Coord::new(5, 5))
    );

    let mut bad = snapshot.clone();
    bad.cells.pop();
    assert_eq!(
        Board::try_from(&bad).unwrap_err(),
        BoardError::SnapshotSize {
            expected: 100,
            found: 99
        }
    );
}
