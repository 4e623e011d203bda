//! Presentation adapters: console rendering, per-move battle logs and board
//! snapshot files. All of these consume the referee's event stream; their
//! failures surface as errors for the referee to report and tolerate.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::board::{Board, BoardSnapshot, Cell};
use crate::common::{AttackOutcome, Coord, PlayerId};
use crate::game::{AttackResult, MatchConfig, MatchObserver, MatchOutcome};
use crate::ship::Catalog;

fn glyph(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Occupied(id) => char::from_digit(id as u32, 10).unwrap_or('?'),
        Cell::Hit(_) => 'x',
        Cell::Sunk(_) => 'X',
        Cell::Miss => 'o',
    }
}

/// Print a board with lettered columns and numbered rows.
pub fn print_board(board: &Board) {
    print!("   ");
    for c in 0..board.width() {
        let ch = (b'A' + (c % 26) as u8) as char;
        print!(" {}", ch);
    }
    println!();
    for r in 0..board.height() {
        print!("{:2} ", r + 1);
        for c in 0..board.width() {
            let cell = board.cell(Coord::new(r, c)).unwrap_or(Cell::Empty);
            print!(" {}", glyph(cell));
        }
        println!();
    }
}

fn outcome_text(outcome: AttackOutcome) -> &'static str {
    match outcome {
        AttackOutcome::Miss => "Miss",
        AttackOutcome::Hit { .. } => "Hit",
        AttackOutcome::Sunk { .. } => "Hit and Sunk",
    }
}

/// Observer that prints every move, and optionally the defending board after
/// each attack.
pub struct ConsoleObserver {
    pub show_boards: bool,
}

impl MatchObserver for ConsoleObserver {
    fn on_attack(&mut self, result: &AttackResult, defender: &Board) -> anyhow::Result<()> {
        println!(
            "Move {}: Player {} attacks ({},{}) -> {}",
            result.turn,
            result.attacker.number(),
            result.coord.row,
            result.coord.col,
            outcome_text(result.outcome),
        );
        if self.show_boards {
            print_board(defender);
        }
        Ok(())
    }

    fn on_finish(&mut self, outcome: &MatchOutcome) -> anyhow::Result<()> {
        println!("{}", outcome);
        Ok(())
    }
}

/// Appends one line per move to a battle log file, preceded by a header with
/// the grid dimensions and fleet, and followed by the final outcome.
pub struct MoveLogger {
    path: PathBuf,
}

impl MoveLogger {
    /// Create the log file under `dir`, writing the header line.
    pub fn create(dir: &Path, config: &MatchConfig, catalog: &Catalog) -> anyhow::Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("create log directory {}", dir.display()))?;
        let path = dir.join("battle_log.txt");
        let ships: Vec<u8> = catalog.ships().iter().map(|s| s.id()).collect();
        let mut file =
            File::create(&path).with_context(|| format!("create {}", path.display()))?;
        writeln!(
            file,
            "New battle started: {}x{}, ships: {:?}",
            config.width, config.height, ships
        )?;
        Ok(Self { path })
    }

    fn append(&self, line: &str) -> anyhow::Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

impl MatchObserver for MoveLogger {
    fn on_setup(&mut self, player: PlayerId, board: &Board) -> anyhow::Result<()> {
        let ships: Vec<u8> = board.placed_ship_ids().collect();
        self.append(&format!(
            "Player {} fleet deployed: ships {:?}",
            player.number(),
            ships
        ))
    }

    fn on_attack(&mut self, result: &AttackResult, _defender: &Board) -> anyhow::Result<()> {
        self.append(&format!(
            "Move {}: Player {} attacks ({},{}) -> {}",
            result.turn,
            result.attacker.number(),
            result.coord.row,
            result.coord.col,
            outcome_text(result.outcome),
        ))
    }

    fn on_finish(&mut self, outcome: &MatchOutcome) -> anyhow::Result<()> {
        self.append(&format!("Result: {}", outcome))
    }
}

/// Writes the defending board as a JSON snapshot after every move, plus an
/// initial snapshot per player, in the fixed integer cell encoding.
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn create(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("create snapshot directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn write(&self, name: &str, board: &Board) -> anyhow::Result<()> {
        let path = self.dir.join(name);
        let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        serde_json::to_writer(file, &BoardSnapshot::from(board))
            .with_context(|| format!("write snapshot {}", path.display()))?;
        Ok(())
    }
}

impl MatchObserver for SnapshotWriter {
    fn on_setup(&mut self, player: PlayerId, board: &Board) -> anyhow::Result<()> {
        self.write(&format!("player{}_initial.json", player.number()), board)
    }

    fn on_attack(&mut self, result: &AttackResult, defender: &Board) -> anyhow::Result<()> {
        let name = format!(
            "player{}_move_{}.json",
            result.attacker.opponent().number(),
            result.turn
        );
        self.write(&name, defender)
    }
}
