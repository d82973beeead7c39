//! Snake Cube Solver Library
//!
//! Folds a chain of straight segments, each turning 90 degrees from the last,
//! into a solid N x N x N cube and enumerates every folding.
//!
//! ```
//! use snake_cube::{Puzzle, SolveOptions};
//!
//! let puzzle = Puzzle::from_preset("classic").unwrap();
//! let report = puzzle.solve(&puzzle.default_seeds(), &SolveOptions::default()).unwrap();
//! assert_eq!(report.solutions.len(), 6);
//! ```

pub mod chain;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod placement;
pub mod seeds;
pub mod solver;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{info, warn};

pub use chain::{ChainSpec, PlacedSegment, Solution};
pub use error::{Error, Result};
pub use geometry::{Orientation, Point};
pub use seeds::Seed;
pub use solver::SearchRun;

/// Driver-level knobs for a multi-seed search.
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    /// Stop after this many solutions (counted after deduplication).
    pub max_solutions: Option<usize>,
    /// Report one solution per rotation/reflection class.
    pub unique: bool,
    /// Search seeds on the rayon thread pool.
    pub parallel: bool,
    /// Raised externally to end every run early.
    pub stop: Option<Arc<AtomicBool>>,
}

/// Outcome of searching from one seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub seed: Seed,
    pub solutions: usize,
    pub positions: u64,
}

/// Everything a multi-seed search produced, in seed order.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub solutions: Vec<Solution>,
    pub runs: Vec<RunSummary>,
}

impl SolveReport {
    /// Total placements attempted across all runs.
    pub fn positions(&self) -> u64 {
        self.runs.iter().map(|run| run.positions).sum()
    }
}

/// A chain paired with the cube it should fold into.
#[derive(Debug, Clone)]
pub struct Puzzle {
    chain: ChainSpec,
    side: usize,
}

impl Puzzle {
    pub fn new(chain: ChainSpec, side: usize) -> Result<Self> {
        grid::validate_side(side)?;
        if chain.cell_count() != side * side * side {
            warn!(
                cells = chain.cell_count(),
                side, "chain cell count does not match the cube; no folding can fill it"
            );
        }
        Ok(Self { chain, side })
    }

    /// Builds a puzzle from a named preset.
    pub fn from_preset(name: &str) -> Result<Self> {
        let preset = chain::preset(name).ok_or_else(|| Error::parse("preset", name))?;
        Self::new(preset.chain(), preset.side)
    }

    pub fn chain(&self) -> &ChainSpec {
        &self.chain
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Symmetry-reduced seeds for this cube.
    pub fn default_seeds(&self) -> Vec<Seed> {
        seeds::symmetry_reduced(self.side)
    }

    /// Searches from every seed and gathers the solutions in seed order.
    ///
    /// Parallel and sequential searches report the same solutions in the
    /// same order.
    pub fn solve(&self, seeds: &[Seed], options: &SolveOptions) -> Result<SolveReport> {
        let runs = if options.parallel {
            self.solve_parallel(seeds, options)?
        } else {
            self.solve_sequential(seeds, options)?
        };

        let symmetry = options.unique.then(|| grid::Symmetry::new(self.side));
        let mut seen = FxHashSet::default();
        let mut solutions = Vec::new();
        let mut summaries = Vec::with_capacity(runs.len());

        'runs: for (summary, found) in runs {
            summaries.push(summary);
            for solution in found {
                if options.max_solutions.is_some_and(|max| solutions.len() >= max) {
                    break 'runs;
                }
                if let Some(symmetry) = &symmetry {
                    // skip solutions that are rotations or reflections of earlier ones
                    if !seen.insert(symmetry.canonical_key(&solution)) {
                        continue;
                    }
                }
                solutions.push(solution);
            }
        }

        let report = SolveReport {
            solutions,
            runs: summaries,
        };
        info!(
            solutions = report.solutions.len(),
            seeds = report.runs.len(),
            positions = report.positions(),
            "search complete"
        );
        Ok(report)
    }

    fn solve_sequential(
        &self,
        seeds: &[Seed],
        options: &SolveOptions,
    ) -> Result<Vec<(RunSummary, Vec<Solution>)>> {
        let mut run = self.new_run(options)?;
        let mut remaining = per_run_cap(options);
        let mut results = Vec::with_capacity(seeds.len());

        for &seed in seeds {
            if remaining == Some(0) {
                break;
            }
            let (summary, found) = collect_run(&mut run, seed, remaining)?;
            if let Some(remaining) = remaining.as_mut() {
                *remaining -= found.len();
            }
            results.push((summary, found));
        }

        Ok(results)
    }

    fn solve_parallel(
        &self,
        seeds: &[Seed],
        options: &SolveOptions,
    ) -> Result<Vec<(RunSummary, Vec<Solution>)>> {
        let cap = per_run_cap(options);
        seeds
            .par_iter()
            .map(|&seed| {
                let mut run = self.new_run(options)?;
                collect_run(&mut run, seed, cap)
            })
            .collect()
    }

    fn new_run(&self, options: &SolveOptions) -> Result<SearchRun> {
        let run = SearchRun::new(&self.chain, self.side)?;
        Ok(match &options.stop {
            Some(stop) => run.with_stop_signal(Arc::clone(stop)),
            None => run,
        })
    }

    pub fn format_solution(&self, solution: &Solution) -> String {
        grid::format_solution(solution, self.side)
    }
}

/// Caps a single run when no later filtering can drop its solutions.
fn per_run_cap(options: &SolveOptions) -> Option<usize> {
    if options.unique {
        None
    } else {
        options.max_solutions
    }
}

fn collect_run(
    run: &mut SearchRun,
    seed: Seed,
    cap: Option<usize>,
) -> Result<(RunSummary, Vec<Solution>)> {
    let mut solutions = run.solutions(seed)?;
    let found = match cap {
        Some(cap) => solutions.by_ref().take(cap).collect::<Result<Vec<_>>>()?,
        None => solutions.by_ref().collect::<Result<Vec<_>>>()?,
    };
    let summary = RunSummary {
        seed,
        solutions: found.len(),
        positions: solutions.positions(),
    };
    Ok((summary, found))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cube() -> Puzzle {
        Puzzle::new(ChainSpec::new(vec![2; 7]).unwrap(), 2).unwrap()
    }

    #[test]
    fn test_two_cube_solution_count() {
        let puzzle = two_cube();
        let report = puzzle
            .solve(&puzzle.default_seeds(), &SolveOptions::default())
            .unwrap();

        assert_eq!(report.solutions.len(), 18);
        assert_eq!(report.runs.len(), 6);
        let per_seed: Vec<usize> = report.runs.iter().map(|run| run.solutions).collect();
        assert_eq!(per_seed, [0, 6, 6, 0, 0, 6]);
        assert_eq!(report.positions(), 3 * 125 + 3);
    }

    #[test]
    fn test_unique_collapses_symmetric_foldings() {
        let puzzle = two_cube();
        let options = SolveOptions {
            unique: true,
            ..SolveOptions::default()
        };
        let report = puzzle.solve(&puzzle.default_seeds(), &options).unwrap();
        assert_eq!(report.solutions.len(), 3);

        let classic = Puzzle::from_preset("classic").unwrap();
        let report = classic.solve(&classic.default_seeds(), &options).unwrap();
        assert_eq!(report.solutions.len(), 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let puzzle = Puzzle::from_preset("classic").unwrap();
        let seeds = puzzle.default_seeds();
        let sequential = puzzle.solve(&seeds, &SolveOptions::default()).unwrap();
        let parallel = puzzle
            .solve(
                &seeds,
                &SolveOptions {
                    parallel: true,
                    ..SolveOptions::default()
                },
            )
            .unwrap();

        assert_eq!(sequential.solutions.len(), 6);
        assert_eq!(sequential.solutions, parallel.solutions);
        assert_eq!(sequential.runs, parallel.runs);
    }

    #[test]
    fn test_max_solutions_caps_report() {
        let puzzle = two_cube();
        for parallel in [false, true] {
            let options = SolveOptions {
                max_solutions: Some(8),
                parallel,
                ..SolveOptions::default()
            };
            let report = puzzle.solve(&puzzle.default_seeds(), &options).unwrap();
            assert_eq!(report.solutions.len(), 8);
            assert!(report.solutions.iter().all(|s| s.covers_cube(2)));
        }
    }

    #[test]
    fn test_raised_stop_signal_yields_nothing() {
        let puzzle = two_cube();
        let options = SolveOptions {
            stop: Some(Arc::new(AtomicBool::new(true))),
            ..SolveOptions::default()
        };
        let report = puzzle.solve(&puzzle.default_seeds(), &options).unwrap();
        assert!(report.solutions.is_empty());
        assert_eq!(report.positions(), 0);
    }

    #[test]
    fn test_rejects_bad_configuration() {
        let chain = ChainSpec::new(vec![2, 2]).unwrap();
        assert!(matches!(
            Puzzle::new(chain.clone(), 0),
            Err(Error::InvalidSide { .. })
        ));
        assert!(Puzzle::from_preset("missing").is_err());
        assert!(matches!(
            ChainSpec::new(vec![usize::MAX, 2]),
            Err(Error::InvalidChainSpec(_))
        ));

        let puzzle = Puzzle::new(chain, 2).unwrap();
        let outside = [Seed::new(Point::new(0, 5, 0), Orientation::Up)];
        assert!(matches!(
            puzzle.solve(&outside, &SolveOptions::default()),
            Err(Error::SeedOutOfBounds { .. })
        ));
    }
}
