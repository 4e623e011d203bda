use std::path::PathBuf;

use broadside::{
    init_logging, Catalog, ConsoleObserver, Contender, MatchConfig, MatchObserver, MatchOutcome,
    MoveLogger, Observers, PlayerId, ProbabilityStrategy, RandomSetup, RandomStrategy, Referee,
    SnapshotWriter, Strategy, DEFAULT_BOARD_SIZE,
};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Simulate battles between two pluggable player strategies.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print every move.
    #[arg(short, long)]
    verbose: bool,

    /// Number of battles to simulate.
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Board width.
    #[arg(short = 'W', long, default_value_t = DEFAULT_BOARD_SIZE)]
    width: usize,

    /// Board height.
    #[arg(short = 'H', long, default_value_t = DEFAULT_BOARD_SIZE)]
    height: usize,

    /// Comma-separated ship ids to play with (default: the full catalog).
    #[arg(long, value_delimiter = ',')]
    ships: Option<Vec<u8>>,

    /// Fix RNG seed for reproducible battles (e.g., --seed 12345).
    #[arg(long)]
    seed: Option<u64>,

    /// Strategy for player 1.
    #[arg(long, value_enum, default_value_t = StrategyKind::Probability)]
    strategy_one: StrategyKind,

    /// Strategy for player 2.
    #[arg(long, value_enum, default_value_t = StrategyKind::Probability)]
    strategy_two: StrategyKind,

    /// Directory for per-battle move logs.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Also write per-move board snapshots under the log directory.
    #[arg(long, requires = "log_dir")]
    snapshots: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyKind {
    Random,
    Probability,
}

impl StrategyKind {
    fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Random => Box::new(RandomStrategy::new()),
            StrategyKind::Probability => Box::new(ProbabilityStrategy::new()),
        }
    }
}

fn player_rng(seed: Option<u64>, battle: usize, slot: u64) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s.wrapping_add(battle as u64 * 2 + slot)),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    let catalog = match &cli.ships {
        Some(ids) => Catalog::standard()
            .subset(ids)
            .map_err(|e| anyhow::anyhow!(e))?,
        None => Catalog::standard(),
    };
    if let Some(s) = cli.seed {
        println!("Using fixed seed: {} (battles will be reproducible)", s);
    }

    let mut wins = [0usize; 2];
    let mut draws = 0usize;
    let mut aborts = 0usize;
    let mut total_moves = 0usize;

    for battle in 1..=cli.count {
        // alternate the starting player by battle parity
        let starting_player = if battle % 2 == 1 {
            PlayerId::One
        } else {
            PlayerId::Two
        };
        if cli.verbose {
            println!("\n=== Battle {} ({} starts) ===", battle, starting_player);
        }

        let config = MatchConfig {
            height: cli.height,
            width: cli.width,
            starting_player,
            max_turns: 0,
        };
        let referee = Referee::new(&catalog, config);

        let mut one = Contender::new(
            Box::new(RandomSetup::new()),
            cli.strategy_one.build(),
            player_rng(cli.seed, battle, 0),
        );
        let mut two = Contender::new(
            Box::new(RandomSetup::new()),
            cli.strategy_two.build(),
            player_rng(cli.seed, battle, 1),
        );

        let mut adapters: Vec<Box<dyn MatchObserver>> = Vec::new();
        if cli.verbose {
            adapters.push(Box::new(ConsoleObserver { show_boards: false }));
        }
        if let Some(dir) = &cli.log_dir {
            let battle_dir = dir.join(format!("battle_{}", battle));
            adapters.push(Box::new(MoveLogger::create(&battle_dir, &config, &catalog)?));
            if cli.snapshots {
                adapters.push(Box::new(SnapshotWriter::create(&battle_dir)?));
            }
        }
        let mut observer = Observers(adapters);

        let outcome = referee.run(&mut one, &mut two, &mut observer);
        match outcome {
            MatchOutcome::Winner { player, turns, .. } => {
                wins[player.index()] += 1;
                total_moves += turns;
            }
            MatchOutcome::Draw { turns } => {
                draws += 1;
                total_moves += turns;
            }
            MatchOutcome::Aborted { .. } => aborts += 1,
        }
        if cli.verbose {
            println!("Battle {} finished: {}", battle, outcome);
        }
    }

    println!("\n=== Overall Battle Results ===");
    println!("Total battles: {}", cli.count);
    println!("Player 1 wins: {}", wins[0]);
    println!("Player 2 wins: {}", wins[1]);
    println!("Draws: {}", draws);
    if aborts > 0 {
        println!("Aborted: {}", aborts);
    }
    let completed = cli.count - aborts;
    let avg_moves = if completed > 0 {
        total_moves as f64 / completed as f64
    } else {
        0.0
    };
    println!("Average game length: {:.2} moves", avg_moves);
    Ok(())
}
