use crate::ship::ShipType;

pub const DEFAULT_BOARD_SIZE: usize = 10;
pub const NUM_SHIPS: usize = 7;

/// The standard fleet. Shape offsets are (row, col) from the anchor in the
/// unrotated orientation.
pub const SHIPS: [ShipType; NUM_SHIPS] = [
    ShipType::new(1, "Destroyer", &[(0, 0), (0, 1)]),
    ShipType::new(2, "Cruiser", &[(0, 0), (0, 1), (0, 2)]),
    ShipType::new(3, "Battleship", &[(0, 0), (0, 1), (0, 2), (0, 3)]),
    ShipType::new(4, "Submarine", &[(0, 0), (1, 0), (2, 0), (2, 1)]),
    ShipType::new(5, "Frigate", &[(0, 1), (0, 2), (1, 0), (1, 1)]),
    ShipType::new(6, "Tanker", &[(0, 0), (0, 1), (1, 0), (1, 1)]),
    ShipType::new(
        7,
        "Carrier",
        &[(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)],
    ),
];
