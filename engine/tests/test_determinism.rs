//! Property tests: determinism is sacred.
//!
//! Same configuration must produce the same snapshot sequence, tick for
//! tick, on every run. This is what lets widgets replay simulations and
//! lets checkpoints stand in for history.

use proptest::prelude::*;
use sched_sim_core_rs::{
    EngineConfig, FaultConfig, PolicyConfig, Priority, SimulationEngine, TaskKind, TaskSpec,
};

fn build_config(durations: &[u64], tick_size_ms: u64, policy_idx: usize) -> EngineConfig {
    let priorities = [Priority::Critical, Priority::High, Priority::Low];
    let tasks: Vec<TaskSpec> = durations
        .iter()
        .enumerate()
        .map(|(i, d)| {
            TaskSpec::new(format!("t{i}"), TaskKind::Network, *d)
                .with_priority(priorities[i % priorities.len()])
        })
        .collect();

    let policy = match policy_idx % 4 {
        0 => PolicyConfig::Sequential,
        1 => PolicyConfig::Parallel {
            bootstrap_task_id: None,
        },
        2 => PolicyConfig::Priority,
        _ => PolicyConfig::Pipeline,
    };

    EngineConfig::new(tick_size_ms, policy, tasks).with_max_elapsed_ms(10_000)
}

proptest! {
    /// Two engines with the same config produce identical snapshot
    /// sequences (run id aside) and identical state hashes at every tick.
    #[test]
    fn prop_replay_is_exact(
        durations in prop::collection::vec(1u64..200, 1..6),
        tick_size_ms in 5u64..50,
        policy_idx in 0usize..4,
    ) {
        let config = build_config(&durations, tick_size_ms, policy_idx);
        let mut a = SimulationEngine::new(config.clone()).unwrap();
        let mut b = SimulationEngine::new(config).unwrap();

        while !a.is_complete() {
            let snap_a = a.step().unwrap();
            let snap_b = b.step().unwrap();

            prop_assert_eq!(snap_a.tick, snap_b.tick);
            prop_assert_eq!(snap_a.elapsed_ms, snap_b.elapsed_ms);
            prop_assert_eq!(&snap_a.tasks, &snap_b.tasks);
            prop_assert_eq!(&snap_a.metrics, &snap_b.metrics);
            prop_assert_eq!(a.state_hash().unwrap(), b.state_hash().unwrap());
        }
        prop_assert!(b.is_complete());
    }

    /// Elapsed time never decreases across steps, and the safety bound
    /// guarantees every run finishes.
    #[test]
    fn prop_monotonic_and_bounded(
        durations in prop::collection::vec(1u64..200, 1..6),
        tick_size_ms in 5u64..50,
        policy_idx in 0usize..4,
    ) {
        let config = build_config(&durations, tick_size_ms, policy_idx);
        let mut engine = SimulationEngine::new(config).unwrap();

        let mut previous = engine.elapsed_ms();
        while !engine.is_complete() {
            engine.step().unwrap();
            prop_assert!(engine.elapsed_ms() >= previous);
            previous = engine.elapsed_ms();
        }
        prop_assert!(engine.snapshot().metrics.is_complete);
    }

    /// Once a task is terminal its state and timestamps never change.
    #[test]
    fn prop_terminal_stability(
        durations in prop::collection::vec(1u64..200, 1..6),
        tick_size_ms in 5u64..50,
        policy_idx in 0usize..4,
    ) {
        let config = build_config(&durations, tick_size_ms, policy_idx);
        let mut engine = SimulationEngine::new(config).unwrap();

        let mut frozen: Vec<Option<(String, Option<u64>, Option<u64>)>> =
            vec![None; durations.len()];

        for _ in 0..400 {
            let snapshot = engine.step().unwrap();
            for (i, view) in snapshot.tasks.iter().enumerate() {
                let current = (
                    format!("{:?}", view.state),
                    view.started_at_ms,
                    view.completed_at_ms,
                );
                match &frozen[i] {
                    Some(first) => prop_assert_eq!(&current, first),
                    None if view.state.is_terminal() => frozen[i] = Some(current),
                    None => {}
                }
            }
            if engine.is_complete() {
                break;
            }
        }
    }

    /// Isolated fault injection never changes any other task's terminal
    /// state or timing (pipeline excluded: a failed stage legitimately
    /// stalls its successors).
    #[test]
    fn prop_fault_isolation(
        durations in prop::collection::vec(1u64..200, 2..6),
        tick_size_ms in 5u64..50,
        policy_idx in 0usize..3,
        target in 0usize..6,
    ) {
        let target = target % durations.len();
        let base_config = build_config(&durations, tick_size_ms, policy_idx);

        let mut baseline = SimulationEngine::new(base_config.clone()).unwrap();
        baseline.run_to_completion().unwrap();

        let faulted_config = base_config.with_fault(FaultConfig {
            target_task_id: format!("t{target}"),
            cascades: false,
        });
        let mut faulted = SimulationEngine::new(faulted_config).unwrap();
        faulted.run_to_completion().unwrap();

        for i in 0..durations.len() {
            if i == target {
                continue;
            }
            let id = format!("t{i}");
            let before = baseline.state().get(&id).unwrap();
            let after = faulted.state().get(&id).unwrap();
            prop_assert_eq!(after.state(), before.state());
            prop_assert_eq!(after.started_at_ms(), before.started_at_ms());
            prop_assert_eq!(after.completed_at_ms(), before.completed_at_ms());
        }
    }
}
