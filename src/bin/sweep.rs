use std::error::Error;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use quintet::{BoardSize, Cell, Engine, EngineConfig, Pos};

#[derive(Debug, Parser)]
#[command(name = "sweep", about = "Quintet depth-sweep search benchmark")]
struct Args {
    /// Maximum search depth to sweep up to
    #[arg(long, default_value_t = 6)]
    max_depth: u8,

    /// Seed for the Zobrist schedule (deterministic)
    #[arg(long, default_value_t = 0x00C0_FFEE)]
    seed: u64,

    /// Worker threads (defaults to hardware parallelism - 1)
    #[arg(long)]
    threads: Option<usize>,
}

/// A short scripted opening giving the search a realistic midgame frontier.
const OPENING: [(i32, i32, Cell); 6] = [
    (9, 9, Cell::Cross),
    (9, 10, Cell::Naught),
    (10, 9, Cell::Cross),
    (8, 9, Cell::Naught),
    (10, 10, Cell::Cross),
    (8, 8, Cell::Naught),
];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = EngineConfig {
        board_size: BoardSize::Nineteen,
        max_depth: args.max_depth,
        threads: args.threads,
        seed: args.seed,
        time_ms: None,
    };
    let mut engine = Engine::new(config).map_err(|e| format!("engine init failed: {e}"))?;

    let mut state = engine.create_state();
    for (x, y, side) in OPENING {
        engine.apply_move(&mut state, Pos::new(x, y), side)?;
    }

    println!(
        "sweep: depths 1..={} on a {}-stone midgame, {} worker threads",
        args.max_depth,
        state.stone_count(),
        engine.threads()
    );

    let pb = ProgressBar::new(u64::from(args.max_depth));
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] depths {bar:40.cyan/blue} {pos}/{len}")?
            .progress_chars("=>-"),
    );

    let mut rows = Vec::new();
    for depth in 1..=args.max_depth {
        let start = Instant::now();
        let result = engine.find_best_move(&mut state, Cell::Cross, depth, None)?;
        let elapsed = start.elapsed();
        let rate = result.nodes_evaluated as f64 / elapsed.as_secs_f64().max(1e-9);
        rows.push((depth, result, elapsed, rate));
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!("depth | move      | score    | nodes      | time     | nodes/s");
    for (depth, result, elapsed, rate) in rows {
        println!(
            "{:>5} | ({:>2}, {:>2})  | {:>8} | {:>10} | {:>7.1?} | {:>10.0}",
            depth, result.mv.pos.x, result.mv.pos.y, result.score, result.nodes_evaluated,
            elapsed, rate,
        );
    }

    let pv = engine.principal_variation(&mut state, usize::from(args.max_depth));
    if !pv.is_empty() {
        let line: Vec<String> = pv
            .iter()
            .map(|m| format!("({}, {})", m.pos.x, m.pos.y))
            .collect();
        println!("pv: {}", line.join(" "));
    }

    Ok(())
}
