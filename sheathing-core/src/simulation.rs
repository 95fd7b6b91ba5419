//! Simulation driver: trials, rows, stall detection and wall-to-wall carry-over.

use crate::config::SimulationConfig;
use crate::engine::{Engine, StepOutcome, Sweep};
use crate::error::Result;
use crate::model::{Catalog, Wall, WallSpec, WasteLedger};
use crate::report::{SimulationReport, TrialReport, WallOutcome, WallReport};
use crate::validation::ensure_valid;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

/// How a single wall run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallRun {
    /// Rollbacks performed (wall-to-wall mode only).
    pub restarts: u32,
    /// Rows covered in the final attempt. Zero for a vertical sheet.
    pub rows_completed: usize,
    pub outcome: WallOutcome,
}

/// Drives placements over a set of walls.
#[derive(Debug, Clone)]
pub struct Simulation<'a> {
    catalog: &'a Catalog,
    config: SimulationConfig,
}

impl<'a> Simulation<'a> {
    pub fn new(catalog: &'a Catalog, config: SimulationConfig) -> Self {
        Self { catalog, config }
    }

    /// Validate the inputs and run every trial.
    pub fn run(&self, specs: &[WallSpec]) -> Result<SimulationReport> {
        let validation = ensure_valid(self.catalog, specs, &self.config)?;
        for warning in &validation.warnings {
            warn!("{}", warning);
        }

        let walls: Vec<Wall> = specs.iter().map(Wall::new).collect();
        let trials: Vec<TrialReport> = (0..self.config.trials)
            .map(|trial| self.run_trial(trial, &walls))
            .collect();

        info!(
            strategy = %self.config.strategy,
            trials = trials.len(),
            walls = walls.len(),
            "simulation finished"
        );

        Ok(SimulationReport {
            strategy: self.config.strategy,
            base_seed: self.config.seed,
            trials,
        })
    }

    /// Run one trial over fresh copies of `walls`.
    ///
    /// Trial `t` is seeded with `seed + t`. In wall-to-wall mode the pending
    /// waste of each wall seeds the next one; the carried waste is dropped
    /// when the level changes.
    pub fn run_trial(&self, trial: u32, walls: &[Wall]) -> TrialReport {
        let seed = self.config.seed.wrapping_add(u64::from(trial));
        let mut rng = StdRng::seed_from_u64(seed);
        let mut engine = Engine::new(self.config.tolerances.clone());
        let carries = self.config.strategy.carries_waste();

        let mut carried = WasteLedger::new();
        let mut level: Option<&Option<String>> = None;
        let mut reports = Vec::with_capacity(walls.len());

        for template in walls {
            let mut wall = template.clone();

            if carries {
                if level != Some(&template.level) {
                    if !carried.is_empty() {
                        debug!(wall = %wall.name, "new level, dropping carried waste");
                    }
                    carried = WasteLedger::new();
                    level = Some(&template.level);
                }
                wall.set_waste(carried.carry_over());
            }

            let run = self.run_wall(&mut wall, &mut engine, &mut rng);
            if carries {
                carried = wall.waste().carry_over();
            }

            info!(
                trial,
                wall = %wall.name,
                panels = wall.placements().len(),
                waste = wall.recorded_area(),
                restarts = run.restarts,
                outcome = ?run.outcome,
                "wall finished"
            );

            let rows = wall.row_heights(self.config.row_height);
            reports.push(WallReport::collect(
                trial,
                &wall,
                &rows,
                run.restarts,
                run.rows_completed,
                run.outcome,
            ));
        }

        TrialReport {
            trial,
            seed,
            walls: reports,
        }
    }

    /// Cover one wall, row by row.
    ///
    /// A row stalls after more than `stall_budget` consecutive steps without
    /// progress. In wall-to-wall mode the wall is then rolled back to its
    /// state before the first row and restarted, up to `max_restarts` times,
    /// after which it is left empty. Other modes keep what was placed and
    /// skip the remaining rows.
    pub fn run_wall(&self, wall: &mut Wall, engine: &mut Engine, rng: &mut StdRng) -> WallRun {
        if let Some(stock) = self.catalog.vertical_fit(wall.length, wall.height) {
            if engine.place_vertical(wall, stock).is_some() {
                return WallRun {
                    restarts: 0,
                    rows_completed: 0,
                    outcome: WallOutcome::Completed,
                };
            }
        }

        let rows = wall.row_heights(self.config.row_height);
        let snapshot = wall.clone();
        let mut restarts = 0;

        'attempt: loop {
            let mut y = 0.0;
            for (row, &row_height) in rows.iter().enumerate() {
                let mut sweep = Sweep::new(row, y, row_height);
                let finished = self.sweep_row(engine, wall, &mut sweep, rng);
                wall.set_joints(row, std::mem::take(&mut sweep.joints));

                if !finished {
                    if !self.config.strategy.carries_waste() {
                        warn!(wall = %wall.name, row, "row stalled, skipping remaining rows");
                        return WallRun {
                            restarts,
                            rows_completed: row,
                            outcome: WallOutcome::Stalled,
                        };
                    }

                    *wall = snapshot.clone();
                    if restarts >= self.config.max_restarts {
                        warn!(wall = %wall.name, restarts, "restart limit reached, wall abandoned");
                        return WallRun {
                            restarts,
                            rows_completed: 0,
                            outcome: WallOutcome::Abandoned,
                        };
                    }
                    restarts += 1;
                    warn!(wall = %wall.name, row, restarts, "row stalled, rolling wall back");
                    continue 'attempt;
                }

                y += row_height;
            }

            return WallRun {
                restarts,
                rows_completed: rows.len(),
                outcome: WallOutcome::Completed,
            };
        }
    }

    /// Step until the row is done. Returns `false` if the row stalled.
    fn sweep_row(
        &self,
        engine: &mut Engine,
        wall: &mut Wall,
        sweep: &mut Sweep,
        rng: &mut StdRng,
    ) -> bool {
        let mut idle = 0u32;
        loop {
            match self.step(engine, wall, sweep, rng) {
                StepOutcome::RowDone => return true,
                StepOutcome::Placed(_) => idle = 0,
                StepOutcome::Rejected(_) => {
                    idle += 1;
                    if idle > self.config.stall_budget {
                        return false;
                    }
                }
            }
        }
    }

    /// One placement attempt at the cursor: best-fit, then greedy, then a
    /// randomly chosen fresh sheet, as the strategy allows.
    pub fn step(
        &self,
        engine: &mut Engine,
        wall: &mut Wall,
        sweep: &mut Sweep,
        rng: &mut StdRng,
    ) -> StepOutcome {
        if engine.row_done(wall, sweep) || self.catalog.is_empty() {
            return engine.finish_row(wall, sweep);
        }

        let strategy = self.config.strategy;
        let limits = self.config.limits();

        if strategy.uses_best_fit() {
            if let Some(outcome) = engine.reuse_best_fit(wall, sweep, limits) {
                return outcome;
            }
        }
        if strategy.uses_greedy() {
            if let Some(outcome) = engine.reuse_greedy(wall, sweep, limits) {
                return outcome;
            }
        }

        let index = rng.gen_range(0..self.catalog.len());
        match self.catalog.get(index) {
            Some(stock) => engine.place_fresh(wall, sweep, stock),
            None => engine.finish_row(wall, sweep),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReuseStrategy;
    use crate::model::StockPanel;

    fn studs() -> Vec<f64> {
        vec![0.0, 1.33, 2.67, 4.0, 5.33, 6.67, 8.0, 9.33, 10.0]
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            StockPanel::new("4x8", 4.0, 8.0),
            StockPanel::new("2.67x8", 2.67, 8.0),
        ])
    }

    #[test]
    fn test_single_row_wall_completes() {
        let catalog = Catalog::new(vec![StockPanel::new("4x8", 4.0, 8.0)]);
        let sim = Simulation::new(&catalog, SimulationConfig::new(ReuseStrategy::FreshOnly));
        let mut wall = Wall::new(&WallSpec::new("W1", 10.0, 4.0, studs()));
        let mut engine = Engine::new(Default::default());
        let mut rng = StdRng::seed_from_u64(0);

        let run = sim.run_wall(&mut wall, &mut engine, &mut rng);
        assert_eq!(run.outcome, WallOutcome::Completed);
        assert_eq!(run.rows_completed, 1);

        let xs: Vec<f64> = wall.placements().iter().map(|p| p.position.x()).collect();
        assert_eq!(xs, vec![0.0, 4.0, 8.0]);
        assert_eq!(wall.joints(0), &[4.0, 8.0]);
    }

    #[test]
    fn test_fresh_only_stall_keeps_first_row() {
        // Only 4-wide sheets: every seam in row 1 lines up with row 0.
        let catalog = Catalog::new(vec![StockPanel::new("4x8", 4.0, 8.0)]);
        let sim = Simulation::new(&catalog, SimulationConfig::new(ReuseStrategy::FreshOnly));
        let mut wall = Wall::new(&WallSpec::new("W1", 10.0, 8.0, studs()));
        let mut engine = Engine::new(Default::default());
        let mut rng = StdRng::seed_from_u64(0);

        let run = sim.run_wall(&mut wall, &mut engine, &mut rng);
        assert_eq!(run.outcome, WallOutcome::Stalled);
        assert_eq!(run.rows_completed, 1);
        assert_eq!(wall.placements().len(), 3);
    }

    #[test]
    fn test_step_prefers_offcut() {
        let catalog = catalog();
        let sim = Simulation::new(&catalog, SimulationConfig::new(ReuseStrategy::Greedy));
        let mut wall = Wall::new(&WallSpec::new("W1", 10.0, 8.0, studs()));
        let mut engine = Engine::new(Default::default());
        let mut rng = StdRng::seed_from_u64(0);
        let mut sweep = Sweep::new(0, 0.0, 4.0);

        // First step cuts a fresh sheet and leaves a 4-high horizontal offcut.
        assert!(matches!(
            sim.step(&mut engine, &mut wall, &mut sweep, &mut rng),
            StepOutcome::Placed(_)
        ));
        assert!(!wall.waste().is_empty());

        assert!(matches!(
            sim.step(&mut engine, &mut wall, &mut sweep, &mut rng),
            StepOutcome::Placed(_)
        ));
        assert!(wall.placements()[1].reused_from.is_some());
    }

    #[test]
    fn test_vertical_sheet_covers_wall() {
        let catalog = Catalog::new(vec![StockPanel::new("9x12", 9.0, 12.0)]);
        let sim = Simulation::new(&catalog, SimulationConfig::default());
        let mut wall = Wall::new(&WallSpec::new("W1", 10.0, 8.0, studs()));
        let mut engine = Engine::new(Default::default());
        let mut rng = StdRng::seed_from_u64(0);

        let run = sim.run_wall(&mut wall, &mut engine, &mut rng);
        assert_eq!(run.outcome, WallOutcome::Completed);
        assert_eq!(wall.placements().len(), 1);
        assert_eq!(wall.placements()[0].width, 10.0);
        assert!(wall.joint_rows().next().is_none());
    }
}
