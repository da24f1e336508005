use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use quintet::{BoardSize, Cell, Difficulty, Engine, EngineConfig, GameState, GameStatus, Move, Pos};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SizeOpt {
    #[value(name = "15")]
    Fifteen,
    #[value(name = "19")]
    Nineteen,
}

impl From<SizeOpt> for BoardSize {
    fn from(opt: SizeOpt) -> Self {
        match opt {
            SizeOpt::Fifteen => BoardSize::Fifteen,
            SizeOpt::Nineteen => BoardSize::Nineteen,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyOpt {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyOpt> for Difficulty {
    fn from(opt: DifficultyOpt) -> Self {
        match opt {
            DifficultyOpt::Easy => Difficulty::Easy,
            DifficultyOpt::Medium => Difficulty::Medium,
            DifficultyOpt::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "selfplay", about = "Quintet engine-vs-engine demo game")]
struct Args {
    /// Board size
    #[arg(long, value_enum, default_value_t = SizeOpt::Nineteen)]
    size: SizeOpt,

    /// Difficulty preset controlling search depth
    #[arg(long, value_enum, default_value_t = DifficultyOpt::Medium)]
    difficulty: DifficultyOpt,

    /// Explicit search depth (overrides --difficulty)
    #[arg(long)]
    depth: Option<u8>,

    /// Maximum number of moves before the game is cut off
    #[arg(long, default_value_t = 60)]
    moves: u32,

    /// Seed for the Zobrist schedule and opening reply (deterministic)
    #[arg(long, default_value_t = 0x00C0_FFEE)]
    seed: u64,

    /// Worker threads (defaults to hardware parallelism - 1)
    #[arg(long)]
    threads: Option<usize>,

    /// Per-move wall-clock budget in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Write a JSON record of the game to this path
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Suppress per-move board rendering
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Serialize)]
struct MoveRecord {
    mv: Move,
    score: i32,
    depth: u8,
    nodes: u64,
    timed_out: bool,
}

#[derive(Debug, Serialize)]
struct GameRecord {
    board_size: i32,
    seed: u64,
    depth: u8,
    status: GameStatus,
    moves: Vec<MoveRecord>,
    total_nodes: u64,
}

fn print_board(state: &GameState) {
    let board = state.board();
    let n = board.side();
    for x in 0..n {
        for y in 0..n {
            let glyph = match board.at(Pos::new(x, y)) {
                Cell::Empty => '.',
                Cell::Cross => 'X',
                Cell::Naught => 'O',
            };
            print!("{glyph} ");
        }
        println!();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let depth = args
        .depth
        .unwrap_or_else(|| Difficulty::from(args.difficulty).depth());

    let config = EngineConfig {
        board_size: args.size.into(),
        max_depth: depth,
        threads: args.threads,
        seed: args.seed,
        time_ms: args.timeout_ms,
    };

    let mut engine = Engine::new(config).map_err(|e| format!("engine init failed: {e}"))?;
    let mut state = engine.create_state();

    println!(
        "selfplay: {0}x{0} board, depth {1}, seed {2:#x}, {3} worker threads",
        config.board_size.side(),
        depth,
        args.seed,
        engine.threads()
    );

    let mut records = Vec::new();
    let mut side = Cell::Cross;
    let mut total_nodes = 0u64;

    for turn in 0..args.moves {
        if engine.game_status(&mut state) != GameStatus::InProgress {
            break;
        }

        let result = engine.find_best_move(&mut state, side, depth, args.timeout_ms)?;
        engine.apply_move(&mut state, result.mv.pos, side)?;
        total_nodes += result.nodes_evaluated;

        let who = match side {
            Cell::Cross => "X",
            _ => "O",
        };
        println!(
            "move {:>3}: {} plays ({}, {})  score {}  depth {}  nodes {}{}",
            turn + 1,
            who,
            result.mv.pos.x,
            result.mv.pos.y,
            result.score,
            result.depth_reached,
            result.nodes_evaluated,
            if result.winning_move { "  (winning)" } else { "" },
        );
        if !args.quiet {
            print_board(&state);
        }

        records.push(MoveRecord {
            mv: result.mv,
            score: result.score,
            depth: result.depth_reached,
            nodes: result.nodes_evaluated,
            timed_out: result.timed_out,
        });

        side = side.other();
    }

    let status = engine.game_status(&mut state);
    match status {
        GameStatus::Win(Cell::Cross) => println!("X wins."),
        GameStatus::Win(_) => println!("O wins."),
        GameStatus::Draw => println!("Draw."),
        GameStatus::InProgress => println!("Move limit reached."),
    }
    println!("total nodes: {total_nodes}");

    if let Some(path) = args.json_out {
        let record = GameRecord {
            board_size: config.board_size.side(),
            seed: args.seed,
            depth,
            status,
            moves: records,
            total_nodes,
        };
        fs::write(&path, serde_json::to_string_pretty(&record)?)?;
        println!("game record written to {}", path.display());
    }

    Ok(())
}
