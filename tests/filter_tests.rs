//! End-to-end tests for filtering, risk classification and admission.

use horizon_guard::action_enum;
use horizon_guard::core::{DistanceFn, ForbiddenRegion, Policy, State, TransitionFn};
use horizon_guard::enforcement::{Admission, AdmissionBuilder, AdmissionContext, Violation};
use horizon_guard::reach::{Exclusion, Memoization, Parallelism, SearchMode, Verdict};
use horizon_guard::{
    compute_safe_actions, compute_safe_actions_under_policy, risk_level, FilterError,
    FilterSettings, RiskLevel, SafetyFilterBuilder,
};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
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

fn step(s: &Pos, a: &Move) -> Pos {
    match a {
        Move::Left => Pos { x: s.x - 1 },
        Move::Right => Pos { x: s.x + 1 },
        Move::Stop => s.clone(),
    }
}

fn line_transition() -> TransitionFn<Pos, Move, Infallible> {
    TransitionFn::new(step)
}

fn wall_at_ten() -> ForbiddenRegion<Pos, Infallible> {
    ForbiddenRegion::new(|s: &Pos| s.x >= 10)
}

/// Transition that counts its invocations.
fn counting_transition(counter: Arc<AtomicUsize>) -> TransitionFn<Pos, Move, Infallible> {
    TransitionFn::new(move |s: &Pos, a: &Move| {
        counter.fetch_add(1, Ordering::SeqCst);
        step(s, a)
    })
}

#[test]
fn horizon_one_excludes_the_step_into_the_wall() {
    let safe = compute_safe_actions(&Pos { x: 9 }, &Move::all(), &line_transition(), &wall_at_ten(), 1)
        .unwrap();
    assert_eq!(safe.into_vec(), vec![Move::Left, Move::Stop]);
}

#[test]
fn horizon_two_excludes_stop_because_right_may_follow() {
    let safe = compute_safe_actions(&Pos { x: 9 }, &Move::all(), &line_transition(), &wall_at_ten(), 2)
        .unwrap();
    assert_eq!(safe.into_vec(), vec![Move::Left]);
}

#[test]
fn horizon_zero_matches_horizon_one() {
    let transition = line_transition();
    let forbidden = wall_at_ten();
    let zero = compute_safe_actions(&Pos { x: 9 }, &Move::all(), &transition, &forbidden, 0).unwrap();
    let one = compute_safe_actions(&Pos { x: 9 }, &Move::all(), &transition, &forbidden, 1).unwrap();

    assert_eq!(zero.into_vec(), one.into_vec());
}

#[test]
fn forbidden_start_fails() {
    let result = compute_safe_actions(&Pos { x: 10 }, &Move::all(), &line_transition(), &wall_at_ten(), 3);
    assert_eq!(
        result,
        Err(FilterError::AlreadyForbidden {
            state: "Pos { x: 10 }".to_string()
        })
    );
}

#[test]
fn empty_action_space_is_not_an_error() {
    let safe = compute_safe_actions(&Pos { x: 0 }, &[], &line_transition(), &wall_at_ten(), 5).unwrap();
    assert!(safe.is_empty());
    assert_eq!(safe.verified_horizon(), 5);
}

#[test]
fn policy_and_exhaustive_variants_differ() {
    // The agent commits to stopping after its first move.
    let policy = Policy::constant(Move::Stop);
    let start = Pos { x: 9 };

    let exhaustive =
        compute_safe_actions(&start, &Move::all(), &line_transition(), &wall_at_ten(), 2).unwrap();
    let under_policy = compute_safe_actions_under_policy(
        &start,
        &Move::all(),
        &line_transition(),
        &wall_at_ten(),
        &policy,
        2,
    )
    .unwrap();

    assert_eq!(exhaustive.into_vec(), vec![Move::Left]);
    assert_eq!(under_policy.into_vec(), vec![Move::Left, Move::Stop]);
}

#[test]
fn policy_rollout_catches_drift_into_the_wall() {
    let policy = Policy::constant(Move::Right);
    let safe = compute_safe_actions_under_policy(
        &Pos { x: 6 },
        &Move::all(),
        &line_transition(),
        &wall_at_ten(),
        &policy,
        3,
    )
    .unwrap();

    // left: 5, 6, 7   stop: 6, 7, 8   right: 7, 8, 9
    assert_eq!(safe.len(), 3);

    let safe = compute_safe_actions_under_policy(
        &Pos { x: 6 },
        &Move::all(),
        &line_transition(),
        &wall_at_ten(),
        &policy,
        4,
    )
    .unwrap();

    // right: 7, 8, 9, 10
    assert_eq!(safe.into_vec(), vec![Move::Left, Move::Stop]);
}

#[test]
fn memoization_expands_each_state_depth_pair_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let filter = SafetyFilterBuilder::new()
        .transition(counting_transition(Arc::clone(&counter)))
        .forbidden(ForbiddenRegion::new(|s: &Pos| s.x >= 1_000))
        .horizon(5)
        .memoization(Memoization::exact())
        .build()
        .unwrap();

    let report = filter.evaluate(&Pos { x: 0 }, &Move::all()).unwrap();

    // 3 first steps, then 3 + 5 + 7 + 9 distinct (position, depth) nodes
    // with 3 successors each.
    assert_eq!(counter.load(Ordering::SeqCst), 3 + 3 * (3 + 5 + 7 + 9));
    assert_eq!(report.expansions, 3 + 5 + 7 + 9);
    assert!(report.memo_hits > 0);
}

#[test]
fn without_memoization_every_path_is_recomputed() {
    let counter = Arc::new(AtomicUsize::new(0));
    let filter = SafetyFilterBuilder::new()
        .transition(counting_transition(Arc::clone(&counter)))
        .forbidden(ForbiddenRegion::new(|s: &Pos| s.x >= 1_000))
        .horizon(5)
        .build()
        .unwrap();

    let report = filter.evaluate(&Pos { x: 0 }, &Move::all()).unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 3 + 3 * (3 + 9 + 27 + 81));
    assert_eq!(report.memo_hits, 0);
}

#[test]
fn parallel_evaluation_keeps_compute_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let filter = SafetyFilterBuilder::new()
        .transition(counting_transition(Arc::clone(&counter)))
        .forbidden(ForbiddenRegion::new(|s: &Pos| s.x >= 1_000))
        .horizon(5)
        .memoization(Memoization::exact())
        .parallelism(Parallelism::Parallel)
        .build()
        .unwrap();

    filter.evaluate(&Pos { x: 0 }, &Move::all()).unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 3 + 3 * (3 + 5 + 7 + 9));
}

#[test]
fn parallel_and_sequential_agree() {
    let build = |parallelism| {
        SafetyFilterBuilder::new()
            .transition(line_transition())
            .forbidden(wall_at_ten())
            .horizon(4)
            .memoization(Memoization::exact())
            .parallelism(parallelism)
            .build()
            .unwrap()
    };

    for x in -3..10 {
        let start = Pos { x };
        let sequential = build(Parallelism::Sequential)
            .evaluate(&start, &Move::all())
            .unwrap();
        let parallel = build(Parallelism::Parallel)
            .evaluate(&start, &Move::all())
            .unwrap();
        assert_eq!(sequential.verdicts, parallel.verdicts);
    }
}

#[test]
fn exhausted_budget_fails_closed() {
    let filter = SafetyFilterBuilder::new()
        .transition(line_transition())
        .forbidden(wall_at_ten())
        .horizon(3)
        .max_expansions(0)
        .build()
        .unwrap();

    let report = filter.evaluate(&Pos { x: 9 }, &Move::all()).unwrap();

    assert!(report.budget_exhausted);
    assert_eq!(report.expansions, 0);
    assert_eq!(
        report.verdict_for(&Move::Right),
        Some(Verdict::Excluded(Exclusion::ImmediatelyForbidden))
    );
    assert_eq!(
        report.verdict_for(&Move::Left),
        Some(Verdict::Excluded(Exclusion::Unresolved))
    );
    assert!(report.safe_set().is_empty());
}

#[test]
fn one_step_filter_needs_no_budget() {
    let filter = SafetyFilterBuilder::new()
        .transition(line_transition())
        .forbidden(wall_at_ten())
        .horizon(1)
        .max_expansions(0)
        .build()
        .unwrap();

    let report = filter.evaluate(&Pos { x: 9 }, &Move::all()).unwrap();
    assert!(!report.budget_exhausted);
    assert_eq!(report.safe_set().into_vec(), vec![Move::Left, Move::Stop]);
}

#[test]
fn transition_errors_propagate_unmodified() {
    let transition = TransitionFn::try_new(|s: &Pos, a: &Move| {
        if s.x == 5 && *a == Move::Right {
            Err(format!("actuator fault at x={}", s.x))
        } else {
            Ok(step(s, a))
        }
    });
    let forbidden = ForbiddenRegion::try_new(|s: &Pos| Ok(s.x >= 10));

    let result = compute_safe_actions(&Pos { x: 4 }, &Move::all(), &transition, &forbidden, 2);
    assert_eq!(
        result.unwrap_err().into_model(),
        Some("actuator fault at x=5".to_string())
    );
}

#[test]
fn predicate_errors_propagate_unmodified() {
    let forbidden = ForbiddenRegion::try_new(|s: &Pos| {
        if s.x < 0 {
            Err("off the map")
        } else {
            Ok(s.x >= 10)
        }
    });
    let transition = TransitionFn::try_new(|s: &Pos, a: &Move| Ok(step(s, a)));

    let result = compute_safe_actions(&Pos { x: 0 }, &Move::all(), &transition, &forbidden, 1);
    assert_eq!(result, Err(FilterError::Model("off the map")));
}

#[test]
fn policy_errors_propagate_unmodified() {
    // No plan exists once the agent is within three cells of the wall.
    let policy = Policy::try_new(|s: &Pos| {
        if s.x >= 7 {
            Err("no plan near the wall")
        } else {
            Ok(Move::Left)
        }
    });
    let transition = TransitionFn::try_new(|s: &Pos, a: &Move| Ok(step(s, a)));
    let forbidden = ForbiddenRegion::try_new(|s: &Pos| Ok(s.x >= 10));

    let result = compute_safe_actions_under_policy(
        &Pos { x: 6 },
        &Move::all(),
        &transition,
        &forbidden,
        &policy,
        3,
    );
    assert_eq!(result, Err(FilterError::Model("no plan near the wall")));
}

#[test]
fn policy_variant_rejects_forbidden_start() {
    let result = compute_safe_actions_under_policy(
        &Pos { x: 12 },
        &Move::all(),
        &line_transition(),
        &wall_at_ten(),
        &Policy::constant(Move::Left),
        2,
    );
    assert_eq!(
        result,
        Err(FilterError::AlreadyForbidden {
            state: "Pos { x: 12 }".to_string()
        })
    );
}

#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
struct Tank {
    level: u32,
    #[serde(skip)]
    valve_stuck: bool,
}

impl State for Tank {}

action_enum! {
    enum Valve {
        Fill,
        Hold,
    }
}

fn tank_transition() -> TransitionFn<Tank, Valve, Infallible> {
    TransitionFn::new(|t: &Tank, v: &Valve| {
        if t.valve_stuck {
            return Tank {
                level: t.level + 10,
                valve_stuck: true,
            };
        }
        Tank {
            level: t.level + 1,
            valve_stuck: *v == Valve::Hold,
        }
    })
}

fn overflow() -> ForbiddenRegion<Tank, Infallible> {
    ForbiddenRegion::new(|t: &Tank| t.level >= 10)
}

#[test]
fn free_function_memo_uses_state_equality() {
    // `Hold` leaves the valve stuck, so every continuation overflows. The
    // stuck flag is not serialized, so the two successors share their bytes.
    let start = Tank {
        level: 0,
        valve_stuck: false,
    };

    let safe = compute_safe_actions(&start, &Valve::all(), &tank_transition(), &overflow(), 2)
        .unwrap();
    assert_eq!(safe.into_vec(), vec![Valve::Fill]);

    let under_policy = compute_safe_actions_under_policy(
        &start,
        &Valve::all(),
        &tank_transition(),
        &overflow(),
        &Policy::constant(Valve::Fill),
        2,
    )
    .unwrap();
    assert_eq!(under_policy.into_vec(), vec![Valve::Fill]);
}

#[test]
fn eq_memoization_agrees_with_no_memoization() {
    let start = Tank {
        level: 0,
        valve_stuck: false,
    };
    let build = |memoization| {
        SafetyFilterBuilder::new()
            .transition(tank_transition())
            .forbidden(overflow())
            .horizon(2)
            .memoization(memoization)
            .build()
            .unwrap()
    };

    let reference = build(Memoization::disabled())
        .safe_actions(&start, &Valve::all())
        .unwrap();
    let by_eq = build(Memoization::by_eq())
        .safe_actions(&start, &Valve::all())
        .unwrap();

    assert_eq!(reference, by_eq);
    assert_eq!(by_eq.into_vec(), vec![Valve::Fill]);
}

#[test]
fn quantized_memoization_handles_continuous_states() {
    #[derive(Clone, PartialEq, Debug)]
    struct Drone {
        altitude: f64,
    }
    impl State for Drone {}

    action_enum! {
        enum Thrust {
            Up,
            Down,
        }
    }

    let filter = SafetyFilterBuilder::new()
        .transition(TransitionFn::new(|d: &Drone, t: &Thrust| match t {
            Thrust::Up => Drone { altitude: d.altitude + 0.5 },
            Thrust::Down => Drone { altitude: d.altitude - 0.5 },
        }))
        .forbidden(ForbiddenRegion::new(|d: &Drone| d.altitude <= 0.0))
        .horizon(3)
        .memoization(Memoization::quantized(|d: &Drone| (d.altitude * 100.0).round() as i64))
        .build()
        .unwrap();

    let safe = filter.safe_actions(&Drone { altitude: 1.6 }, &Thrust::all()).unwrap();
    assert_eq!(safe.into_vec(), vec![Thrust::Up, Thrust::Down]);

    let safe = filter.safe_actions(&Drone { altitude: 1.4 }, &Thrust::all()).unwrap();
    assert_eq!(safe.into_vec(), vec![Thrust::Up]);
}

#[test]
fn explain_and_rollout_show_the_path() {
    let filter = SafetyFilterBuilder::new()
        .transition(line_transition())
        .forbidden(wall_at_ten())
        .horizon(3)
        .memoization(Memoization::exact())
        .build()
        .unwrap();

    let witness = filter
        .explain(&Pos { x: 8 }, &Move::Stop, &Move::all())
        .unwrap()
        .into_witness()
        .unwrap();
    assert_eq!(witness.actions(), vec![&Move::Stop, &Move::Right, &Move::Right]);

    let rollout = filter
        .rollout(&Pos { x: 8 }, &Move::Stop, &Policy::constant(Move::Left))
        .unwrap();
    assert_eq!(
        rollout.get_path(),
        vec![&Pos { x: 8 }, &Pos { x: 8 }, &Pos { x: 7 }, &Pos { x: 6 }]
    );

    let report = filter
        .evaluate_under_policy(&Pos { x: 8 }, &Move::all(), &Policy::constant(Move::Left))
        .unwrap();
    assert_eq!(report.mode, SearchMode::Policy);
}

#[test]
fn settings_loaded_from_json_configure_the_filter() {
    let settings = FilterSettings::from_json(r#"{ "horizon": 2, "parallel": true }"#).unwrap();
    let filter = SafetyFilterBuilder::new()
        .transition(line_transition())
        .forbidden(wall_at_ten())
        .settings(&settings)
        .build()
        .unwrap();

    let safe = filter.safe_actions(&Pos { x: 9 }, &Move::all()).unwrap();
    assert_eq!(safe.into_vec(), vec![Move::Left]);
}

#[test]
fn risk_levels_follow_margin_buckets() {
    let distance = DistanceFn::new(|s: &Pos| (10 - s.x) as f64);

    assert_eq!(risk_level(&Pos { x: -5 }, &distance, 1.0), Ok(RiskLevel::Safe));
    assert_eq!(risk_level(&Pos { x: 0 }, &distance, 1.0), Ok(RiskLevel::Caution));
    assert_eq!(risk_level(&Pos { x: 7 }, &distance, 1.0), Ok(RiskLevel::Warning));
    assert_eq!(risk_level(&Pos { x: 9 }, &distance, 1.0), Ok(RiskLevel::Danger));
    assert_eq!(risk_level(&Pos { x: 10 }, &distance, 1.0), Ok(RiskLevel::Collapse));
    assert_eq!(
        risk_level(&Pos { x: 11 }, &distance, 1.0),
        Err(FilterError::InvalidDistance { distance: -1.0 })
    );
}

#[test]
fn admission_combines_filter_and_risk() {
    let start = Pos { x: 9 };
    let safe = compute_safe_actions(&start, &Move::all(), &line_transition(), &wall_at_ten(), 2)
        .unwrap();
    let distance = DistanceFn::new(|s: &Pos| (10 - s.x) as f64);
    let risk = risk_level(&start, &distance, 1.0).unwrap();

    let rules = AdmissionBuilder::new().block_at(RiskLevel::Collapse).build();

    let left = AdmissionContext {
        state: start.clone(),
        action: Move::Left,
        safe_set: safe.clone(),
        risk: Some(risk),
    };
    assert_eq!(rules.decide(&left), Admission::Admit);

    let stop = AdmissionContext {
        action: Move::Stop,
        ..left.clone()
    };
    assert_eq!(
        rules.decide(&stop),
        Admission::Reject(vec![Violation::OutsideSafeSet {
            action: "Stop".to_string(),
            horizon: 2,
        }])
    );

    let strict = AdmissionBuilder::new().block_at(RiskLevel::Danger).build();
    assert!(!strict.decide(&left).is_admitted());
}
