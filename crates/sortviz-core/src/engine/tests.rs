use std::sync::Arc;

use web_time::{Duration, Instant};

use super::*;
use crate::step::{StepRecorder, StepSink};

fn control_for(algorithm: Algorithm) -> Arc<RunControl> {
    Arc::new(RunControl::new().with_algorithm(algorithm))
}

fn run_recorded(algorithm: Algorithm, input: &[i32]) -> (EngineReport, Vec<i32>, StepRecorder) {
    let control = control_for(algorithm);
    let mut engine = SortEngine::new(input.to_vec(), control, StepRecorder::new());
    let report = engine.run();
    let (values, recorder) = engine.into_parts();
    (report, values, recorder)
}

/// Records steps and runs a hook on the host side after the `at`-th publish.
struct HookAfter<F: FnMut()> {
    recorder: StepRecorder,
    at: usize,
    hook: F,
}

impl<F: FnMut()> StepSink for HookAfter<F> {
    fn publish(&mut self, values: &[i32], pair: IndexPair) {
        self.recorder.publish(values, pair);
        if self.recorder.len() == self.at {
            (self.hook)();
        }
    }

    fn mark_complete(&mut self) {
        self.recorder.mark_complete();
    }
}

fn sorted(input: &[i32]) -> Vec<i32> {
    let mut out = input.to_vec();
    out.sort_unstable();
    out
}

fn is_permutation(a: &[i32], b: &[i32]) -> bool {
    sorted(a) == sorted(b)
}

#[test]
fn bubble_sorts_reference_input() {
    let (report, values, recorder) = run_recorded(Algorithm::Bubble, &[5, 3, 4, 1, 2]);
    assert_eq!(values, vec![1, 2, 3, 4, 5]);
    assert_eq!(report.outcome, RunOutcome::Sorted);
    assert_eq!(report.comparisons, 10);
    // One step per inversion, then the completion snapshot.
    assert_eq!(report.steps, 9);
    assert_eq!(recorder.pairs()[0], IndexPair::at(0, 1));
    assert_eq!(*recorder.pairs().last().unwrap(), IndexPair::NONE);
    assert!(recorder.is_complete());
}

#[test]
fn every_algorithm_sorts_adversarial_inputs() {
    let inputs: Vec<Vec<i32>> = vec![
        vec![],
        vec![7],
        vec![2, 1],
        vec![1, 2],
        vec![1, 2, 3, 4, 5, 6],
        vec![6, 5, 4, 3, 2, 1],
        vec![4, 4, 4, 4],
        vec![3, -1, 3, 0, -7, 12, 0, 5],
    ];
    for algorithm in Algorithm::ALL {
        for input in &inputs {
            let (report, values, recorder) = run_recorded(algorithm, input);
            assert_eq!(values, sorted(input), "{algorithm} on {input:?}");
            assert_eq!(report.outcome, RunOutcome::Sorted, "{algorithm} on {input:?}");
            assert_eq!(recorder.pairs().len(), recorder.len());
            assert_eq!(report.steps, recorder.len() as u64);
            assert_eq!(recorder.last_values(), Some(&values[..]));
        }
    }
}

#[test]
fn insertion_comparisons_on_reverse_input() {
    for n in 1..=12usize {
        let input: Vec<i32> = (0..n as i32).rev().collect();
        let (report, _, _) = run_recorded(Algorithm::Insertion, &input);
        let n = n as u64;
        assert_eq!(report.comparisons, n * (n - 1) / 2 + (n - 1), "n = {n}");
    }
}

#[test]
fn insertion_records_negative_cursor() {
    let (report, values, recorder) = run_recorded(Algorithm::Insertion, &[2, 1]);
    assert_eq!(values, vec![1, 2]);
    assert_eq!(report.comparisons, 2);
    assert_eq!(recorder.pairs(), &[IndexPair::new(-1, 0), IndexPair::NONE]);
    // The shift snapshot shows the duplicated element before the key lands.
    assert_eq!(&*recorder.snapshots()[0].values, &[2, 2]);
}

#[test]
fn selection_swaps_every_pass() {
    let (report, values, recorder) = run_recorded(Algorithm::Selection, &[1, 2, 3]);
    assert_eq!(values, vec![1, 2, 3]);
    assert_eq!(report.comparisons, 3);
    assert_eq!(
        recorder.pairs(),
        &[IndexPair::at(0, 0), IndexPair::at(1, 1), IndexPair::NONE]
    );
}

#[test]
fn merge_keeps_literal_highlight_formula() {
    let (report, values, recorder) = run_recorded(Algorithm::Merge, &[2, 1]);
    assert_eq!(values, vec![1, 2]);
    assert_eq!(report.comparisons, 1);
    assert_eq!(
        recorder.pairs(),
        &[IndexPair::at(0, 1), IndexPair::at(1, 1), IndexPair::NONE]
    );
}

#[test]
fn quick_records_partition_and_pivot_swaps() {
    let (report, values, recorder) = run_recorded(Algorithm::Quick, &[3, 1, 2]);
    assert_eq!(values, vec![1, 2, 3]);
    assert_eq!(report.comparisons, 2);
    assert_eq!(
        recorder.pairs(),
        &[IndexPair::at(0, 1), IndexPair::at(1, 2), IndexPair::NONE]
    );
}

#[test]
fn completion_is_visible_to_the_host() {
    let control = control_for(Algorithm::Quick);
    let mut engine = SortEngine::new(vec![3, 2, 1], Arc::clone(&control), StepRecorder::new());
    engine.run();
    assert!(control.is_complete());
    assert!(control.started_at().is_some());
}

#[test]
fn pending_stop_takes_reset_path() {
    for algorithm in Algorithm::ALL {
        let control = control_for(algorithm);
        control.request_stop();
        let input = vec![4, 1, 3, 2];
        let mut engine = SortEngine::new(input.clone(), Arc::clone(&control), StepRecorder::new());
        let report = engine.run();
        let (values, recorder) = engine.into_parts();

        assert_eq!(report.outcome, RunOutcome::Reset);
        assert_eq!(values, input, "reset must not sort");
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.pairs(), &[IndexPair::NONE]);
        assert_eq!(&*recorder.snapshots()[0].values, &input[..]);
        assert_eq!(report.comparisons, 0);
        assert!(!recorder.is_complete());
        assert_eq!(control.started_at(), None, "reset runs are not timed");
    }
}

#[test]
fn stop_after_construction_cancels_instead_of_resetting() {
    for algorithm in Algorithm::ALL {
        let control = Arc::new(
            RunControl::new()
                .with_algorithm(algorithm)
                .with_delay(Duration::from_secs(30)),
        );
        let input = vec![4, 1, 3, 2];
        let mut engine = SortEngine::new(input.clone(), Arc::clone(&control), StepRecorder::new());
        assert!(!engine.is_reset());
        control.request_stop();

        let start = Instant::now();
        let report = engine.run();
        assert!(start.elapsed() < Duration::from_secs(5), "{algorithm}");
        let (values, recorder) = engine.into_parts();

        assert_eq!(report.outcome, RunOutcome::Cancelled, "{algorithm}");
        assert!(recorder.is_empty(), "no reset frame for {algorithm}");
        assert_eq!(values, input);
    }
}

#[test]
fn selection_switch_before_run_sorts_with_new_choice() {
    let control = control_for(Algorithm::Bubble);
    let mut engine = SortEngine::new(vec![3, 1, 2], Arc::clone(&control), StepRecorder::new());
    control.select(Algorithm::Merge);
    let report = engine.run();
    assert_eq!(report.algorithm, Some(Algorithm::Merge));
    assert_eq!(report.outcome, RunOutcome::Sorted);
    assert_eq!(engine.values(), &[1, 2, 3]);
}

#[test]
fn missing_selection_is_idle() {
    let control = Arc::new(RunControl::new());
    let mut engine = SortEngine::new(vec![2, 1], control, StepRecorder::new());
    let report = engine.run();
    assert_eq!(report.outcome, RunOutcome::Idle);
    assert_eq!(report.steps, 0);
    assert_eq!(engine.values(), &[2, 1]);
}

#[test]
fn stop_mid_run_halts_emission() {
    let input = vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
    for algorithm in Algorithm::ALL {
        let control = control_for(algorithm);
        let host = Arc::clone(&control);
        let sink = HookAfter {
            recorder: StepRecorder::new(),
            at: 3,
            hook: move || host.request_stop(),
        };
        let mut engine = SortEngine::new(input.clone(), Arc::clone(&control), sink);
        let report = engine.run();
        let (values, sink) = engine.into_parts();

        assert_eq!(report.outcome, RunOutcome::Cancelled, "{algorithm}");
        assert_eq!(sink.recorder.len(), 3, "{algorithm} emitted after stop");
        assert!(!sink.recorder.is_complete());
        assert!(!control.is_complete());
        assert_ne!(values, sorted(&input));
        if algorithm != Algorithm::Merge {
            assert!(is_permutation(&values, &input), "{algorithm}");
        }
    }
}

#[test]
fn switching_algorithm_stops_recursive_sorts() {
    let input = vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
    for algorithm in [Algorithm::Merge, Algorithm::Quick] {
        let control = control_for(algorithm);
        let host = Arc::clone(&control);
        let sink = HookAfter {
            recorder: StepRecorder::new(),
            at: 4,
            hook: move || host.select(Algorithm::Bubble),
        };
        let mut engine = SortEngine::new(input.clone(), Arc::clone(&control), sink);
        let report = engine.run();
        let snapshot_after_switch = engine.values().to_vec();
        let (_, sink) = engine.into_parts();

        assert_eq!(report.outcome, RunOutcome::Superseded, "{algorithm}");
        assert_eq!(sink.recorder.len(), 4, "{algorithm} emitted after switch");
        assert_eq!(
            sink.recorder.last_values(),
            Some(&snapshot_after_switch[..]),
            "{algorithm} mutated after switch"
        );
        assert!(!control.is_stop_requested());
    }
}

#[test]
fn reselecting_same_algorithm_does_not_interrupt() {
    let control = control_for(Algorithm::Merge);
    let host = Arc::clone(&control);
    let sink = HookAfter {
        recorder: StepRecorder::new(),
        at: 2,
        hook: move || host.select(Algorithm::Merge),
    };
    let mut engine = SortEngine::new(vec![4, 3, 2, 1], control, sink);
    assert_eq!(engine.run().outcome, RunOutcome::Sorted);
}

#[test]
fn quadratic_sorts_ignore_selection_changes() {
    let control = control_for(Algorithm::Bubble);
    let host = Arc::clone(&control);
    let sink = HookAfter {
        recorder: StepRecorder::new(),
        at: 1,
        hook: move || host.select(Algorithm::Quick),
    };
    let mut engine = SortEngine::new(vec![3, 2, 1], control, sink);
    let report = engine.run();
    assert_eq!(report.outcome, RunOutcome::Sorted);
    assert_eq!(engine.values(), &[1, 2, 3]);
}

#[test]
fn pacing_sleeps_between_steps() {
    let control = Arc::new(
        RunControl::new()
            .with_algorithm(Algorithm::Bubble)
            .with_delay(Duration::from_millis(10)),
    );
    let mut engine = SortEngine::new(vec![2, 1], control, StepRecorder::new());
    let report = engine.run();
    // Swap step plus completion step, each followed by one delay.
    assert_eq!(report.steps, 2);
    assert!(report.elapsed >= Duration::from_millis(20));
}

#[test]
fn stop_wakes_a_long_pacing_sleep() {
    let control = Arc::new(
        RunControl::new()
            .with_algorithm(Algorithm::Quick)
            .with_delay(Duration::from_secs(30)),
    );
    let host = Arc::clone(&control);
    let sink = HookAfter {
        recorder: StepRecorder::new(),
        at: 1,
        hook: move || host.request_stop(),
    };
    let mut engine = SortEngine::new(vec![5, 4, 3, 2, 1], control, sink);
    let start = Instant::now();
    let report = engine.run();
    assert_eq!(report.outcome, RunOutcome::Cancelled);
    assert!(start.elapsed() < Duration::from_secs(5));
}
