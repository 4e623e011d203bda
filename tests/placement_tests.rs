use broadside::{
    place_fleet, random_fleet, Board, BoardError, Catalog, Coord, FleetError, Placement, Rotation,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// A hand-laid, non-overlapping standard fleet on a 10x10 grid.
fn full_layout() -> Vec<Placement> {
    vec![
        Placement::new(1, Coord::new(0, 0), Rotation::R0),
        Placement::new(2, Coord::new(2, 0), Rotation::R0),
        Placement::new(3, Coord::new(4, 0), Rotation::R0),
        Placement::new(4, Coord::new(6, 0), Rotation::R0),
        Placement::new(5, Coord::new(0, 4), Rotation::R0),
        Placement::new(6, Coord::new(3, 6), Rotation::R0),
        Placement::new(7, Coord::new(6, 4), Rotation::R0),
    ]
}

#[test]
fn a_full_fleet_validates() {
    let catalog = Catalog::standard();
    let mut board = Board::new(10, 10);
    place_fleet(&mut board, &catalog, &full_layout()).unwrap();
    let occupied = board.encoded().iter().filter(|&&v| v != 0).count();
    assert_eq!(occupied, catalog.total_cells());
    for ship in catalog.ships() {
        assert!(board.has_ship(ship.id()));
    }
}

#[test]
fn first_failing_placement_is_attributed() {
    let catalog = Catalog::standard();
    let mut board = Board::new(10, 10);
    let mut layout = full_layout();
    // push the carrier off the bottom edge
    layout[6] = Placement::new(7, Coord::new(9, 0), Rotation::R0);
    let err = place_fleet(&mut board, &catalog, &layout).unwrap_err();
    match err {
        FleetError::Placement { ship, reason } => {
            assert_eq!(ship, 7);
            assert!(matches!(reason, BoardError::OutOfBounds(_)));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn duplicate_placements_are_rejected() {
    let catalog = Catalog::standard();
    let mut board = Board::new(10, 10);
    let mut layout = full_layout();
    layout.push(Placement::new(1, Coord::new(9, 0), Rotation::R0));
    let err = place_fleet(&mut board, &catalog, &layout).unwrap_err();
    assert_eq!(
        err,
        FleetError::Placement {
            ship: 1,
            reason: BoardError::ShipAlreadyPlaced(1)
        }
    );
}

#[test]
fn missing_ships_fail_as_incomplete_fleet() {
    let catalog = Catalog::standard();
    let mut board = Board::new(10, 10);
    let mut layout = full_layout();
    layout.remove(3); // drop the submarine
    let err = place_fleet(&mut board, &catalog, &layout).unwrap_err();
    assert_eq!(err, FleetError::IncompleteFleet { ship: 4 });
}

#[test]
fn random_fleets_validate_on_a_fresh_board() {
    let catalog = Catalog::standard();
    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let placements = random_fleet(&mut rng, &catalog, 10, 10).unwrap();
        let mut board = Board::new(10, 10);
        place_fleet(&mut board, &catalog, &placements).unwrap();
    }
}

#[test]
fn random_fleet_gives_up_on_an_impossible_grid() {
    let catalog = Catalog::standard();
    let mut rng = SmallRng::seed_from_u64(7);
    // a 3x3 grid cannot hold the battleship at all
    let err = random_fleet(&mut rng, &catalog, 3, 3).unwrap_err();
    assert!(matches!(err, BoardError::UnableToPlaceShip(_)));
}
