use broadside::{
    init_logging, Catalog, Contender, MatchConfig, MatchOutcome, NullObserver,
    ProbabilityStrategy, RandomSetup, Referee,
};
use log::LevelFilter;
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    init_logging(LevelFilter::Warn);

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let catalog = Catalog::standard();
    let referee = Referee::new(&catalog, MatchConfig::default());

    let mut one = Contender::new(
        Box::new(RandomSetup::new()),
        Box::new(ProbabilityStrategy::new()),
        SmallRng::seed_from_u64(seed1),
    );
    let mut two = Contender::new(
        Box::new(RandomSetup::new()),
        Box::new(ProbabilityStrategy::new()),
        SmallRng::seed_from_u64(seed2),
    );

    let outcome = referee.run(&mut one, &mut two, &mut NullObserver);
    let (winner, turns) = match outcome {
        MatchOutcome::Winner { player, turns, .. } => (Some(player.number()), turns),
        MatchOutcome::Draw { turns } => (None, turns),
        MatchOutcome::Aborted { .. } => (None, 0),
    };

    let result = json!({
        "winner": winner.map(|n| format!("player{}", n)),
        "turns": turns,
        "outcome": outcome.to_string(),
    });
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
