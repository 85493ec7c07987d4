use pretty_assertions::assert_eq;
use proptest::prelude::*;
use speculate_core::prelude::*;
use speculate_core::{select_branch, RunMode};
use speculate_test_utils::{FixedDecision, PanickingDecision, SlowBranch};
use speculate_workload::{
    CancelSignal, CancellationScope, Decision, MatrixTrace, PrimeSearch, ProofOfWork, Workload,
};
use std::time::{Duration, Instant};

const SETTLE: Duration = Duration::from_secs(2);

fn scenario(
    value: i64,
    threshold: i64,
    a: SlowBranch,
    b: SlowBranch,
) -> Scenario<FixedDecision, SlowBranch, SlowBranch> {
    Scenario::new(FixedDecision::new(value), a, b, threshold)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_selects_a_and_cancels_b() {
    let a = SlowBranch::new("a", 7, 3, Duration::from_millis(2));
    let b = SlowBranch::endless("b");
    let (a_probe, b_probe) = (a.probe(), b.probe());

    let runner = SpeculativeRunner::new(scenario(10, 5, a, b));
    let trial = runner.run().await.unwrap();

    assert_eq!(trial.chosen, Branch::A);
    assert_eq!(trial.branch_name, "a");
    assert_eq!(trial.mode, RunMode::Speculative);
    assert_eq!(trial.value, BranchValue::A(7));
    assert_eq!(trial.decision.value, 10);
    assert!(!a_probe.was_cancelled());

    assert!(b_probe.wait_stopped(SETTLE).await, "losing branch kept running");
    assert!(b_probe.was_cancelled());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_loser_takes_at_most_one_step_after_fire() {
    let a = SlowBranch::new("a", 7, 5, Duration::from_millis(2));
    let b = SlowBranch::new("b", 0, u64::MAX, Duration::from_millis(5));
    let b_probe = b.probe();

    let trial = SpeculativeRunner::new(scenario(10, 5, a, b)).run().await.unwrap();
    // The scope has fired by the time the run returns.
    let steps_at_fire = b_probe.steps();

    assert_eq!(trial.chosen, Branch::A);
    assert!(b_probe.wait_stopped(SETTLE).await);
    assert!(b_probe.was_cancelled());
    assert!(b_probe.steps() <= steps_at_fire + 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_selects_b_when_value_not_above_threshold() {
    let a = SlowBranch::endless("a");
    let b = SlowBranch::instant("b", 3);
    let a_probe = a.probe();

    let trial = SpeculativeRunner::new(scenario(5, 5, a, b)).run().await.unwrap();

    assert_eq!(trial.chosen, Branch::B);
    assert_eq!(trial.value, BranchValue::B(3));
    assert!(a_probe.wait_stopped(SETTLE).await);
    assert!(a_probe.was_cancelled());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_waits_for_slow_chosen_branch() {
    let a = SlowBranch::new("a", 1, 20, Duration::from_millis(5));
    let b = SlowBranch::instant("b", 2);
    let a_probe = a.probe();

    let trial = SpeculativeRunner::new(scenario(1, 0, a, b)).run().await.unwrap();

    assert_eq!(trial.value, BranchValue::A(1));
    assert!(trial.branch_elapsed >= Duration::from_millis(100));
    assert!(trial.total_elapsed >= trial.branch_elapsed);
    assert_eq!(a_probe.steps(), 20);
    assert!(!a_probe.was_cancelled());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_finished_loser_is_discarded() {
    // The loser completes long before the chosen branch.
    let a = SlowBranch::instant("a", 111);
    let b = SlowBranch::new("b", 222, 10, Duration::from_millis(10));
    let a_probe = a.probe();

    let trial = SpeculativeRunner::new(scenario(-1, 0, a, b)).run().await.unwrap();

    assert!(a_probe.wait_stopped(SETTLE).await);
    assert!(!a_probe.was_cancelled());
    assert_eq!(trial.chosen, Branch::B);
    assert_eq!(trial.value, BranchValue::B(222));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_decision_is_awaited_before_any_branch() {
    let decision = FixedDecision::new(9).with_delay(Duration::from_millis(50));
    let a = SlowBranch::instant("a", 1);
    let b = SlowBranch::instant("b", 2);

    let runner = SpeculativeRunner::new(Scenario::new(decision, a, b, 0));
    let trial = runner.run().await.unwrap();

    assert_eq!(trial.chosen, Branch::A);
    assert!(trial.decision.elapsed >= Duration::from_millis(50));
    assert!(trial.total_elapsed >= trial.decision.elapsed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parent_cancellation_surfaces_as_chosen_branch_cancelled() {
    let parent = CancellationScope::new();
    let signal = parent.signal();
    parent.fire();

    let a = SlowBranch::endless("a");
    let b = SlowBranch::endless("b");
    let (a_probe, b_probe) = (a.probe(), b.probe());

    let runner = SpeculativeRunner::new(scenario(4, 0, a, b)).with_parent(signal);
    let err = runner.run().await.unwrap_err();

    assert!(err.is_chosen_branch_cancelled());
    match err {
        SpeculationError::ChosenBranchCancelled { branch, decision } => {
            assert_eq!(branch, Branch::A);
            assert_eq!(decision.value, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(a_probe.wait_stopped(SETTLE).await);
    assert!(b_probe.wait_stopped(SETTLE).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_panicking_decision_fails_trial_and_releases_branches() {
    let a = SlowBranch::endless("a");
    let b = SlowBranch::endless("b");
    let (a_probe, b_probe) = (a.probe(), b.probe());

    let runner = SpeculativeRunner::new(Scenario::new(PanickingDecision, a, b, 0));
    let err = runner.run().await.unwrap_err();

    assert_eq!(
        err,
        SpeculationError::task_failed("decision", "outcome slot closed")
    );
    assert!(a_probe.wait_stopped(SETTLE).await);
    assert!(b_probe.wait_stopped(SETTLE).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sequential_runs_only_the_chosen_branch() {
    let a = SlowBranch::instant("a", 1);
    let b = SlowBranch::instant("b", 2);
    let (a_probe, b_probe) = (a.probe(), b.probe());

    let runner = SequentialRunner::new(scenario(0, 0, a, b));
    let trial = runner.run_trial().await.unwrap();

    assert_eq!(trial.mode, RunMode::Sequential);
    assert_eq!(trial.chosen, Branch::B);
    assert_eq!(trial.value, BranchValue::B(2));
    assert!(b_probe.started());
    assert!(!a_probe.started());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_standard_scenario_end_to_end() {
    let params = SpeculationParams::new(2, 0, 1, 10).unwrap();

    for seed in 0..5 {
        let trace = MatrixTrace::new(2).with_seed(seed).evaluate();
        let expected = if trace > 0 { Branch::A } else { Branch::B };

        let speculative = SpeculativeRunner::new(Scenario::standard(&params, Some(seed)))
            .run()
            .await
            .unwrap();
        let sequential = SequentialRunner::new(Scenario::standard(&params, Some(seed)))
            .run()
            .unwrap();

        assert_eq!(speculative.decision.value, trace);
        assert_eq!(sequential.decision.value, trace);
        assert_eq!(speculative.chosen, expected);
        assert_eq!(sequential.chosen, expected);

        match speculative.value {
            BranchValue::A(solution) => {
                let pow = speculate_workload::ProofOfWork::new(params.block_data.clone(), 1);
                assert!(pow.verify(&solution));
                assert!(solution.hash.starts_with('0'));
            }
            BranchValue::B(primes) => assert_eq!(primes, vec![2, 3, 5, 7]),
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_speculative_run_is_bounded_by_slower_workload() {
    let params = SpeculationParams::new(2, 0, 1, 10).unwrap();
    let slack = Duration::from_millis(100);
    let never = CancelSignal::never();

    for seed in 0..5 {
        let started = Instant::now();
        ProofOfWork::new(params.block_data.clone(), params.difficulty)
            .run(&never)
            .unwrap();
        let pow_alone = started.elapsed();

        let started = Instant::now();
        PrimeSearch::new(params.prime_bound).run(&never).unwrap();
        let primes_alone = started.elapsed();

        let trial = SpeculativeRunner::new(Scenario::standard(&params, Some(seed)))
            .run()
            .await
            .unwrap();

        let bound = pow_alone.max(primes_alone) + trial.decision.elapsed + slack;
        assert!(
            trial.total_elapsed <= bound,
            "seed {seed}: {:?} exceeds {bound:?}",
            trial.total_elapsed
        );
    }
}

#[test]
fn test_empty_matrix_selects_b_for_non_negative_threshold() {
    let params = SpeculationParams::new(0, 0, 1, 10).unwrap();
    let trial = SequentialRunner::new(Scenario::standard(&params, Some(3)))
        .run()
        .unwrap();

    assert_eq!(trial.decision.value, 0);
    assert_eq!(trial.chosen, Branch::B);
    assert_eq!(trial.value, BranchValue::B(vec![2, 3, 5, 7]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_repeated_runs_do_not_leak_failures() {
    let params = SpeculationParams::new(8, 100, 2, 5_000).unwrap();
    let runner = SpeculativeRunner::new(Scenario::standard(&params, None));

    for _ in 0..20 {
        let trial = runner.run().await.unwrap();
        assert_eq!(trial.chosen, select_branch(trial.decision.value, 100));
    }
}

#[test]
fn test_workload_names_are_stable() {
    assert_eq!(SlowBranch::instant("x", 0).name(), "x");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_speculative_matches_sequential_choice(value in -50i64..50, threshold in -50i64..50) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let speculative = rt.block_on(async {
            let s = scenario(value, threshold, SlowBranch::instant("a", 1), SlowBranch::instant("b", 2));
            SpeculativeRunner::new(s).run().await.unwrap()
        });
        let sequential = SequentialRunner::new(scenario(
            value,
            threshold,
            SlowBranch::instant("a", 1),
            SlowBranch::instant("b", 2),
        ))
        .run()
        .unwrap();

        prop_assert_eq!(speculative.chosen, sequential.chosen);
        prop_assert_eq!(speculative.chosen == Branch::A, value > threshold);
        prop_assert_eq!(speculative.value, sequential.value);
    }
}
