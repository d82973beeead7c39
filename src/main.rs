//! Snake Cube Solver
//!
//! Folds a chain of straight segments into a solid cube. Every segment turns
//! 90 degrees from the one before it, and the chain must fill each cell of
//! the cube exactly once. The solver enumerates all foldings from a set of
//! starting seeds, saves them to disk and provides an interactive 3D viewer.

mod visualization;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use snake_cube::chain::{self, PRESETS};
use snake_cube::{persistence, seeds, ChainSpec, Error, Puzzle, Result, Seed, SolveOptions};

/// Folds snake cube chains into solid cubes and visualizes the solutions.
#[derive(Parser)]
#[command(name = "snake")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a chain and save solutions to disk.
    Solve(SolveArgs),
    /// Display saved solutions in an interactive 3D viewer.
    Display,
    /// Show the number of saved solutions.
    Count,
    /// List the built-in chains.
    Presets,
}

#[derive(Args, Debug, Default)]
struct SolveArgs {
    /// Preset name or comma separated segment lengths.
    #[arg(long, default_value = "classic")]
    chain: String,

    /// Cube side; inferred from the preset or the chain's cell count.
    #[arg(long)]
    side: Option<usize>,

    /// Starting seed as `x,y,z:orientation`. May be repeated.
    #[arg(long = "seed")]
    seeds: Vec<Seed>,

    /// Search from every cell instead of the symmetry-reduced set.
    #[arg(long, conflicts_with = "seeds")]
    all_seeds: bool,

    /// Stop after this many solutions.
    #[arg(short = 'n', long)]
    max_solutions: Option<usize>,

    /// Report one solution per rotation/reflection class.
    #[arg(short, long)]
    unique: bool,

    /// Search seeds in parallel.
    #[arg(short, long)]
    parallel: bool,

    /// Give up after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Print every solution after solving.
    #[arg(long)]
    print: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Some(Command::Solve(args)) => run_solver(&args).map(|_| ()),
        Some(Command::Display) => run_display(),
        Some(Command::Count) => run_count(),
        Some(Command::Presets) => {
            run_presets();
            Ok(())
        }
        None => {
            // default: solve the classic chain and display
            run_solver(&SolveArgs {
                chain: "classic".into(),
                ..SolveArgs::default()
            })
            .map(|(side, solutions)| {
                if !solutions.is_empty() {
                    println!("Controls: Left/Right navigate, Up/Down explode, R reset");
                    visualization::display(side, solutions);
                }
            })
        }
    };

    if let Err(e) = outcome {
        error!("{e}");
        std::process::exit(1);
    }
}

/// Resolves `--chain` and `--side` into a puzzle.
fn build_puzzle(args: &SolveArgs) -> Result<Puzzle> {
    let (chain, preset_side) = match chain::preset(&args.chain) {
        Some(preset) => (preset.chain(), Some(preset.side)),
        None => (args.chain.parse::<ChainSpec>()?, None),
    };

    let side = args
        .side
        .or(preset_side)
        .or_else(|| chain.cube_side())
        .ok_or_else(|| Error::Parse {
            what: "cube side (pass --side)",
            input: args.chain.clone(),
        })?;

    Puzzle::new(chain, side)
}

fn seeds_for(args: &SolveArgs, puzzle: &Puzzle) -> Vec<Seed> {
    if !args.seeds.is_empty() {
        args.seeds.clone()
    } else if args.all_seeds {
        seeds::all(puzzle.side())
    } else {
        puzzle.default_seeds()
    }
}

/// Raises the returned flag once `seconds` have passed.
fn stop_after(seconds: u64) -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(seconds));
        flag.store(true, Ordering::Relaxed);
    });
    stop
}

/// Solves the puzzle, saves to disk, and returns the side and solutions.
fn run_solver(args: &SolveArgs) -> Result<(usize, Vec<snake_cube::Solution>)> {
    let puzzle = build_puzzle(args)?;
    let seeds = seeds_for(args, &puzzle);
    let options = SolveOptions {
        max_solutions: args.max_solutions,
        unique: args.unique,
        parallel: args.parallel,
        stop: args.timeout.map(stop_after),
    };

    info!(
        segments = puzzle.chain().len(),
        side = puzzle.side(),
        seeds = seeds.len(),
        "solving"
    );
    let report = puzzle.solve(&seeds, &options)?;
    if options.stop.as_ref().is_some_and(|stop| stop.load(Ordering::Relaxed)) {
        println!("Timed out; results are partial");
    }

    persistence::save(Path::new("."), puzzle.side(), &report.solutions)?;
    println!(
        "Found {} solutions ({} positions tried)",
        report.solutions.len(),
        report.positions()
    );
    println!(
        "Wrote {} and {}",
        persistence::SOLUTIONS_TXT,
        persistence::SOLUTIONS_BIN
    );

    if args.print {
        print!(
            "{}",
            persistence::format_report(puzzle.side(), &report.solutions)
        );
    }

    Ok((puzzle.side(), report.solutions))
}

/// Loads and displays saved solutions.
fn run_display() -> Result<()> {
    let saved = persistence::load_all(Path::new(".")).map_err(no_saved_solutions)?;
    println!("Loaded {} solutions", saved.solutions.len());
    println!("Controls: Left/Right navigate, Up/Down explode, R reset");
    visualization::display(saved.side, saved.solutions);
    Ok(())
}

/// Prints the count of saved solutions.
fn run_count() -> Result<()> {
    let count = persistence::count(Path::new(".")).map_err(no_saved_solutions)?;
    println!("{count} solutions");
    Ok(())
}

fn run_presets() {
    for preset in PRESETS {
        println!(
            "{:<10} {} ({} cells)",
            preset.name,
            preset.description,
            preset.chain().cell_count()
        );
    }
}

fn no_saved_solutions(e: Error) -> Error {
    if matches!(&e, Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound) {
        error!(
            "No {} found. Run 'snake solve' first.",
            persistence::SOLUTIONS_BIN
        );
    }
    e
}
