//! Line World
//!
//! This example filters the moves of an agent walking along a line with a
//! wall at x = 10.
//!
//! Key concepts:
//! - Exhaustive filtering at growing horizons
//! - Policy rollouts versus exhaustive branching
//! - Witness paths for excluded actions
//! - Advisory risk levels and admission rules
//!
//! Run with: cargo run --example line_world

use horizon_guard::action_enum;
use horizon_guard::core::{DistanceFn, ForbiddenRegion, Policy, State, TransitionFn};
use horizon_guard::enforcement::{AdmissionBuilder, AdmissionContext};
use horizon_guard::reach::{Explanation, Memoization, Parallelism};
use horizon_guard::{risk_level, RiskLevel, SafetyFilterBuilder};
use serde::Serialize;

const WALL: i64 = 10;

#[derive(Clone, PartialEq, Debug, Serialize)]
struct Pos {
    x: i64,
}

impl State for Pos {}

action_enum! {
    enum Move {
        Left,
        Right,
        Stop,
    }
}

// Pure dynamics
fn step(s: &Pos, a: &Move) -> Pos {
    match a {
        Move::Left => Pos { x: s.x - 1 },
        Move::Right => Pos { x: s.x + 1 },
        Move::Stop => s.clone(),
    }
}

fn format_moves<'a>(moves: impl IntoIterator<Item = &'a Move>) -> String {
    let names: Vec<String> = moves.into_iter().map(|m| format!("{m:?}")).collect();
    format!("[{}]", names.join(", "))
}

fn main() {
    println!("=== Line World ===\n");

    let start = Pos { x: 8 };
    let moves = Move::all();

    // Scenario 1: the safe set shrinks as the horizon grows
    println!("Scenario 1: Safe moves from x = {} by horizon", start.x);
    for horizon in 1..=4 {
        let filter = SafetyFilterBuilder::new()
            .transition(TransitionFn::new(step))
            .forbidden(ForbiddenRegion::new(|s: &Pos| s.x >= WALL))
            .horizon(horizon)
            .memoization(Memoization::exact())
            .parallelism(Parallelism::Parallel)
            .build()
            .unwrap();

        let report = filter.evaluate(&start, &moves).unwrap();
        println!(
            "  horizon {}: {} ({} expansions, {} memo hits)",
            horizon,
            format_moves(report.safe_set().iter()),
            report.expansions,
            report.memo_hits
        );
    }

    let filter = SafetyFilterBuilder::new()
        .transition(TransitionFn::new(step))
        .forbidden(ForbiddenRegion::new(|s: &Pos| s.x >= WALL))
        .horizon(3)
        .memoization(Memoization::exact())
        .build()
        .unwrap();

    // Scenario 2: why was an action excluded?
    println!("\nScenario 2: Witness for Stop at horizon 3");
    match filter.explain(&start, &Move::Stop, &moves).unwrap() {
        Explanation::Witness(path) => {
            for step in path.steps() {
                println!("  x = {:>2} --{:?}--> x = {:>2}", step.from.x, step.action, step.to.x);
            }
        }
        Explanation::Clear => println!("  Stop is safe"),
        Explanation::Unresolved => println!("  search budget ran out"),
    }

    // Scenario 3: an agent that always retreats after its first move
    println!("\nScenario 3: Policy rollout (always Left after the first move)");
    let retreat = Policy::constant(Move::Left);
    let safe = filter
        .safe_actions_under_policy(&start, &moves, &retreat)
        .unwrap();
    println!("  safe under policy: {}", format_moves(safe.iter()));
    let rollout = filter.rollout(&start, &Move::Right, &retreat).unwrap();
    let path: Vec<i64> = rollout.get_path().iter().map(|p| p.x).collect();
    println!("  rollout after Right: {path:?}");

    // Scenario 4: risk levels and admission
    println!("\nScenario 4: Risk and admission");
    let distance = DistanceFn::new(|s: &Pos| (WALL - s.x) as f64);
    let rules = AdmissionBuilder::new().block_at(RiskLevel::Danger).build();

    for x in [-5, 4, 8, 9] {
        let state = Pos { x };
        let risk = risk_level(&state, &distance, 1.0).unwrap();
        let safe_set = filter.safe_actions(&state, &moves).unwrap();
        let context = AdmissionContext {
            state,
            action: Move::Right,
            safe_set,
            risk: Some(risk),
        };
        println!(
            "  x = {:>2}: risk {:<8} Right -> {:?}",
            x,
            risk.as_str(),
            rules.decide(&context)
        );
    }
}
