//! Integration tests for the sheathing simulation.
//!
//! Scenario tests drive the engine and simulation step by step on small
//! hand-checked walls; property tests run whole simulations over random
//! walls and check the ledger invariants.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sheathing_core::model::{CutKind, WasteStatus};
use sheathing_core::{
    parse_job, Catalog, Cut, CutId, Engine, OpeningSpec, PanelId, Position, Rejection,
    ReuseStrategy, RuleTolerances, Simulation, SimulationConfig, StepOutcome, StockPanel, Sweep,
    Wall, WallOutcome, WallSpec,
};

// ==================== Fixtures ====================

/// Studs at 16 in on center, rounded to two decimals, with one at the wall end.
fn studs_10ft() -> Vec<f64> {
    vec![0.0, 1.33, 2.67, 4.0, 5.33, 6.67, 8.0, 9.33, 10.0]
}

fn plain_wall(name: &str, height: f64) -> WallSpec {
    WallSpec::new(name, 10.0, height, studs_10ft())
}

fn sheet_4x8() -> StockPanel {
    StockPanel::new("4x8", 4.0, 8.0)
}

fn offcut(id: u32, width: f64, height: f64) -> Cut {
    Cut {
        id: CutId(id),
        panel: PanelId(900),
        stock_name: "4x8".to_string(),
        wall: "W0".to_string(),
        kind: CutKind::Vertical,
        position: Position::origin(),
        width,
        height,
        cut_count: 0,
    }
}

fn engine() -> Engine {
    Engine::new(RuleTolerances::default())
}

// ==================== Scenario Tests ====================

#[test]
fn test_scenario_a_last_panel_trimmed_to_wall_end() {
    let mut wall = Wall::new(&plain_wall("A", 8.0));
    let mut engine = engine();
    let mut sweep = Sweep::new(0, 0.0, 4.0);
    let sheet = sheet_4x8();

    let mut outcomes = Vec::new();
    loop {
        let outcome = engine.place_fresh(&mut wall, &mut sweep, &sheet);
        outcomes.push(outcome);
        if outcome == StepOutcome::RowDone {
            break;
        }
    }
    assert_eq!(outcomes.len(), 4);

    let placed: Vec<(f64, f64)> = wall
        .placements()
        .iter()
        .map(|p| (p.position.x(), p.width))
        .collect();
    assert_eq!(placed, vec![(0.0, 4.0), (4.0, 4.0), (8.0, 2.0)]);

    let last = &wall.placements()[2];
    assert_eq!(last.x_max(), 10.0);
    let vc = last
        .cuts
        .iter()
        .find(|c| c.kind == CutKind::Vertical)
        .expect("vertical cut");
    assert_eq!(vc.width, 2.0);
    assert_eq!(vc.position, Position::new(10.0, 0.0));

    assert_eq!(sweep.joints, vec![4.0, 8.0]);
}

#[test]
fn test_scenario_b_door_corner_rejects_candidate() {
    let spec = plain_wall("B", 8.0).with_door(OpeningSpec::new(3.9, 0.0, 5.0, 6.67));
    let mut wall = Wall::new(&spec);
    let mut engine = engine();
    let mut sweep = Sweep::new(0, 0.0, 4.0);

    let outcome = engine.place_fresh(&mut wall, &mut sweep, &sheet_4x8());
    assert_eq!(outcome, StepOutcome::Rejected(Rejection::AroundOpening { x: 4.0 }));
    assert_eq!(sweep.cursor, Position::origin());
    assert!(wall.placements().is_empty());

    // A narrower sheet lands on the 2.67 stud, clear of the door band.
    let narrow = StockPanel::new("2.67x8", 2.67, 8.0);
    let outcome = engine.place_fresh(&mut wall, &mut sweep, &narrow);
    assert!(matches!(outcome, StepOutcome::Placed(_)));
    assert_eq!(sweep.cursor, Position::new(2.67, 0.0));
}

#[test]
fn test_scenario_c_greedy_reuses_before_fresh() {
    let catalog = Catalog::new(vec![sheet_4x8()]);
    let config = SimulationConfig::new(ReuseStrategy::Greedy)
        .with_row_height(8.0)
        .with_limits(10, 1.0);
    let sim = Simulation::new(&catalog, config);

    let mut wall = Wall::new(&plain_wall("C", 8.0));
    assert!(wall.add_offcut(offcut(500, 2.0, 8.0)));

    let mut engine = engine();
    let mut rng = StdRng::seed_from_u64(1);
    let mut sweep = Sweep::new(0, 0.0, 8.0);

    let outcome = sim.step(&mut engine, &mut wall, &mut sweep, &mut rng);
    assert!(matches!(outcome, StepOutcome::Placed(_)));

    let panel = &wall.placements()[0];
    assert_eq!(panel.reused_from, Some(CutId(500)));
    assert_eq!(panel.width, 1.33);
    assert_eq!(panel.cut_count, 1);

    assert!(wall.waste().get(CutId(500)).is_none());
    assert_eq!(wall.waste().consumed()[0].id, CutId(500));

    // The 0.67 strip trimmed back to the stud is the only pending waste.
    let pending: Vec<(f64, f64)> = wall
        .waste()
        .pending()
        .map(|c| (c.width, c.height))
        .collect();
    assert_eq!(pending, vec![(0.67, 8.0)]);
}

#[test]
fn test_scenario_d_best_fit_prefers_stud_aligned_offcut() {
    let catalog = Catalog::new(vec![sheet_4x8()]);
    let mut rng = StdRng::seed_from_u64(0);

    let run = |strategy: ReuseStrategy, rng: &mut StdRng| {
        let sim = Simulation::new(&catalog, SimulationConfig::new(strategy));
        let mut wall = Wall::new(&plain_wall("D", 8.0));
        // The larger offcut would end at 3.0, between studs.
        wall.add_offcut(offcut(500, 3.0, 4.0));
        wall.add_offcut(offcut(501, 2.67, 4.0));

        let mut engine = engine();
        let mut sweep = Sweep::new(0, 0.0, 4.0);
        let outcome = sim.step(&mut engine, &mut wall, &mut sweep, rng);
        assert!(matches!(outcome, StepOutcome::Placed(_)));
        wall.placements()[0].clone()
    };

    let best_fit = run(ReuseStrategy::BestFit, &mut rng);
    assert_eq!(best_fit.reused_from, Some(CutId(501)));
    assert!(best_fit.vertical_cut.is_none());

    let greedy = run(ReuseStrategy::Greedy, &mut rng);
    assert_eq!(greedy.reused_from, Some(CutId(500)));
    assert_eq!(greedy.width, 2.67);
    assert!(greedy.vertical_cut.is_some());
}

#[test]
fn test_scenario_e_wall_to_wall_stall_rolls_back() {
    let catalog = Catalog::new(vec![sheet_4x8()]);
    let config = SimulationConfig::new(ReuseStrategy::WallToWall).with_stall_limits(25, 3);
    let sim = Simulation::new(&catalog, config);

    // No stud between the ends: every candidate is refused.
    let mut wall = Wall::new(&WallSpec::new("E", 10.0, 4.0, vec![0.0, 10.0]));
    wall.add_offcut(offcut(500, 2.0, 8.0));
    wall.add_offcut(offcut(501, 3.0, 4.0));
    let before: Vec<CutId> = wall.waste().pending().map(|c| c.id).collect();

    let mut engine = engine();
    let mut rng = StdRng::seed_from_u64(0);
    let run = sim.run_wall(&mut wall, &mut engine, &mut rng);

    assert_eq!(run.outcome, WallOutcome::Abandoned);
    assert_eq!(run.restarts, 3);
    assert_eq!(run.rows_completed, 0);
    assert!(wall.placements().is_empty());
    assert!(wall.joints(0).is_empty());
    assert_eq!(wall.recorded_area(), 0.0);

    let after: Vec<CutId> = wall.waste().pending().map(|c| c.id).collect();
    assert_eq!(before, after);
    assert!(wall.waste().consumed().is_empty());
}

#[test]
fn test_scenario_e_abandoned_wall_keeps_carried_waste() {
    let catalog = Catalog::new(vec![sheet_4x8()]);
    let config = SimulationConfig::new(ReuseStrategy::WallToWall).with_stall_limits(25, 2);
    let walls = vec![
        WallSpec::new("W1", 10.0, 4.0, studs_10ft()),
        WallSpec::new("W2", 10.0, 4.0, vec![0.0, 10.0]),
    ];

    let report = Simulation::new(&catalog, config).run(&walls).unwrap();
    let trial = &report.trials[0];
    let w1 = &trial.walls[0].summary;
    let w2 = &trial.walls[1].summary;

    assert_eq!(w1.outcome, WallOutcome::Completed);
    assert_eq!(w1.remaining_waste_area, 24.0);

    assert_eq!(w2.outcome, WallOutcome::Abandoned);
    assert_eq!(w2.restarts, 2);
    assert_eq!(w2.panels, 0);
    assert_eq!(w2.total_waste_area, 0.0);
    assert_eq!(w2.remaining_waste_area, w1.remaining_waste_area);
}

// ==================== Driver Tests ====================

#[test]
fn test_level_change_drops_carried_waste() {
    let catalog = Catalog::new(vec![sheet_4x8()]);
    let even_studs = vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0];
    let walls = vec![
        WallSpec::new("W1", 10.0, 4.0, studs_10ft()).with_level("1"),
        WallSpec::new("W2", 10.0, 4.0, even_studs.clone()).with_level("1"),
        WallSpec::new("W3", 10.0, 4.0, even_studs).with_level("2"),
    ];
    let config = SimulationConfig::new(ReuseStrategy::WallToWall);
    let report = Simulation::new(&catalog, config).run(&walls).unwrap();
    let trial = &report.trials[0];

    // Same level: the first panel of W2 is an offcut carried from W1.
    let w2 = &trial.walls[1];
    assert!(w2.placements[0].reused_from.is_some());
    assert!(w2
        .waste
        .iter()
        .any(|w| w.wall == "W1" && w.status == WasteStatus::Consumed));

    // New level: W3 starts from an empty ledger.
    let w3 = &trial.walls[2];
    assert_eq!(w3.placements[0].reused_from, None);
    assert!(w3.waste.iter().all(|w| w.wall == "W3"));
}

#[test]
fn test_determinism_same_seed() {
    let job = parse_job(
        r#"{
            "catalog": [
                {"name": "4x8", "width": 4.0, "height": 8.0},
                {"name": "2.67x8", "width": 2.67, "height": 8.0},
                {"name": "3.5x8", "width": 3.5, "height": 8.0}
            ],
            "walls": [
                {"name": "N", "length": 10.0, "height": 8.0,
                 "studs": [0.0, 1.33, 2.67, 4.0, 5.33, 6.67, 8.0, 9.33, 10.0],
                 "windows": [{"start_x": 5.5, "start_y": 3.0, "end_x": 7.5, "end_y": 6.0}]},
                {"name": "E", "length": 10.0, "height": 9.0,
                 "studs": [0.0, 1.33, 2.67, 4.0, 5.33, 6.67, 8.0, 9.33, 10.0]}
            ]
        }"#,
    )
    .unwrap();

    for strategy in [
        ReuseStrategy::FreshOnly,
        ReuseStrategy::Greedy,
        ReuseStrategy::BestFit,
        ReuseStrategy::WallToWall,
    ] {
        let config = SimulationConfig::new(strategy).with_trials(3).with_seed(42);
        let first = job.run(config.clone()).unwrap();
        let second = job.run(config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.trials[2].seed, 44);
    }
}

#[test]
fn test_conservation_without_reuse() {
    let catalog = Catalog::new(vec![
        sheet_4x8(),
        StockPanel::new("2.67x8", 2.67, 8.0),
        StockPanel::new("3.5x8", 3.5, 8.0),
    ]);
    let walls = vec![plain_wall("W1", 4.0)];

    for seed in 0..10 {
        let config = SimulationConfig::new(ReuseStrategy::FreshOnly).with_seed(seed);
        let report = Simulation::new(&catalog, config).run(&walls).unwrap();
        let wall = &report.trials[0].walls[0];
        assert_eq!(wall.summary.outcome, WallOutcome::Completed);

        let placed: f64 = wall.placements.iter().map(|p| p.width).sum();
        assert!((placed - 10.0).abs() < 1e-3, "seed {}: placed {}", seed, placed);

        for placement in &wall.placements {
            let nominal = catalog
                .iter()
                .find(|s| s.name == placement.name)
                .map(|s| s.width)
                .unwrap();
            let vc: f64 = wall
                .waste
                .iter()
                .filter(|w| w.panel_id == placement.panel_id && w.kind == CutKind::Vertical)
                .map(|w| w.width)
                .sum();
            assert!((placement.width + vc - nominal).abs() < 1e-3);
        }
    }
}

#[test]
fn test_invalid_job_fails_before_placement() {
    let catalog = Catalog::new(vec![sheet_4x8()]);
    let walls = vec![WallSpec::new("Bad", 10.0, 8.0, vec![])];
    let err = Simulation::new(&catalog, SimulationConfig::default())
        .run(&walls)
        .unwrap_err();
    assert_eq!(err.code_value(), 201);
}

#[test]
fn test_report_serializes() {
    let catalog = Catalog::new(vec![sheet_4x8()]);
    let report = Simulation::new(&catalog, SimulationConfig::default())
        .run(&[plain_wall("W1", 4.0)])
        .unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["strategy"], "greedy");
    assert_eq!(value["trials"][0]["walls"][0]["summary"]["outcome"], "completed");
    assert_eq!(report.trials[0].panel_count(), 3);
}

// ==================== Property Tests ====================

fn reuse_strategy() -> impl Strategy<Value = ReuseStrategy> {
    prop_oneof![
        Just(ReuseStrategy::FreshOnly),
        Just(ReuseStrategy::Greedy),
        Just(ReuseStrategy::BestFit),
        Just(ReuseStrategy::WallToWall),
    ]
}

fn studs_for(length: f64) -> Vec<f64> {
    let mut studs: Vec<f64> = (0..)
        .map(|i| (i as f64 * 1.3333 * 1e4).round() / 1e4)
        .take_while(|&x| x < length)
        .collect();
    studs.push(length);
    studs
}

fn random_wall(length: f64, height: f64, door: Option<(f64, f64)>) -> WallSpec {
    let length = (length * 100.0).round() / 100.0;
    let height = (height * 100.0).round() / 100.0;
    let mut spec = WallSpec::new("P", length, height, studs_for(length));
    if let Some((start, width)) = door {
        let start = (start * length * 100.0).round() / 100.0;
        let end = (start + width).min(length);
        if end > start {
            spec = spec.with_door(OpeningSpec::new(start, 0.0, end, 6.67));
        }
    }
    spec
}

fn prop_catalog() -> Catalog {
    Catalog::new(vec![
        sheet_4x8(),
        StockPanel::new("2.67x8", 2.67, 8.0),
        StockPanel::new("3.5x8", 3.5, 8.0),
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_placements_stay_on_wall(
        length in 6.0f64..30.0,
        height in 4.0f64..12.0,
        door in proptest::option::of((0.0f64..0.8, 2.0f64..4.0)),
        seed in any::<u64>(),
        strategy in reuse_strategy(),
    ) {
        let spec = random_wall(length, height, door);
        let catalog = prop_catalog();
        let config = SimulationConfig::new(strategy).with_seed(seed);
        let report = Simulation::new(&catalog, config).run(std::slice::from_ref(&spec)).unwrap();

        for wall in &report.trials[0].walls {
            let mut seen = std::collections::BTreeSet::new();
            for p in &wall.placements {
                prop_assert!(p.x >= 0.0 && p.y >= 0.0);
                prop_assert!(p.x + p.width <= spec.length + 1e-3, "x overrun: {:?}", p);
                prop_assert!(p.y + p.height <= spec.height + 1e-3, "y overrun: {:?}", p);
                prop_assert!(p.width > 0.0 && p.height > 0.0);
                prop_assert!(seen.insert(((p.x * 1e4) as i64, (p.y * 1e4) as i64)));
            }
        }
    }

    #[test]
    fn prop_recorded_waste_has_area(
        length in 6.0f64..30.0,
        height in 4.0f64..12.0,
        door in proptest::option::of((0.0f64..0.8, 2.0f64..4.0)),
        seed in any::<u64>(),
        strategy in reuse_strategy(),
    ) {
        let spec = random_wall(length, height, door);
        let catalog = prop_catalog();
        let config = SimulationConfig::new(strategy).with_seed(seed);
        let report = Simulation::new(&catalog, config).run(&[spec]).unwrap();

        for wall in &report.trials[0].walls {
            for w in &wall.waste {
                prop_assert!(w.width > 0.0 && w.height > 0.0);
                prop_assert!(w.area > 0.0);
                prop_assert!((w.area - w.width * w.height).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn prop_joints_are_staggered(
        length in 6.0f64..30.0,
        height in 8.0f64..16.0,
        seed in any::<u64>(),
        strategy in reuse_strategy(),
    ) {
        let spec = random_wall(length, height, None);
        let catalog = prop_catalog();
        let config = SimulationConfig::new(strategy).with_seed(seed);
        let report = Simulation::new(&catalog, config).run(&[spec]).unwrap();

        for wall in &report.trials[0].walls {
            for joint in wall.joints.iter().filter(|j| j.row > 0) {
                let below = wall.joints.iter().filter(|j| j.row == joint.row - 1);
                for prev in below {
                    prop_assert!(
                        !(joint.x >= prev.x - 0.4 && joint.x <= prev.x + 0.4),
                        "joint {} in row {} lines up with {}",
                        joint.x,
                        joint.row,
                        prev.x
                    );
                }
            }
        }
    }
}
