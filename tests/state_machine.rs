// tests/state_machine.rs

use std::time::{Duration, Instant};

use pomobutton::engine::{FsmState, Input, StateMachine};
use pomobutton::exec::Completion;
use pomobutton::types::{ActionKind, ButtonEvent, Generation};
use pomobutton_test_utils::builders::test_actions;
use pomobutton_test_utils::fake_runner::FakeRunner;
use pomobutton_test_utils::init_tracing;

fn machine() -> (StateMachine<FakeRunner>, FakeRunner) {
    init_tracing();
    let runner = FakeRunner::new();
    (StateMachine::new(test_actions(), runner.clone()), runner)
}

fn press(code: u16) -> Input {
    Input::Button(ButtonEvent::press(code))
}

fn release(code: u16) -> Input {
    Input::Button(ButtonEvent::release(code))
}

fn completed(generation: Generation) -> Input {
    Input::Completed(Completion { generation })
}

fn secs(t0: Instant, s: f64) -> Instant {
    t0 + Duration::from_secs_f64(s)
}

/// Drive Idle -> Running with press/release of `code` at `now`.
fn start_cycle(sm: &mut StateMachine<FakeRunner>, code: u16, now: Instant) {
    sm.step(press(code), now);
    sm.step(release(code), now);
    assert_eq!(sm.state(), FsmState::Running);
}

#[test]
fn press_release_from_idle_launches_begin_with_zero() {
    let (mut sm, runner) = machine();
    let t0 = Instant::now();

    let step = sm.step(press(30), t0);
    assert_eq!(
        step.to,
        FsmState::AwaitingRelease {
            press: ButtonEvent::press(30)
        }
    );
    assert!(runner.launches().is_empty());

    let step = sm.step(release(30), t0);
    assert_eq!(step.from.name(), "awaiting-release");
    assert_eq!(step.to, FsmState::Running);

    let launches = runner.launches();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].kind(), ActionKind::Begin);
    assert_eq!(launches[0].command.program.to_str(), Some("/test/begin"));
    assert_eq!(launches[0].command.args, vec!["0".to_string()]);
    assert!(launches[0].generation.is_some());
    assert_eq!(sm.tracked_generation(), launches[0].generation);
    assert_eq!(sm.session().start_time(), Some(t0));
}

#[test]
fn release_of_other_key_does_not_open_segment() {
    let (mut sm, runner) = machine();
    let t0 = Instant::now();

    sm.step(press(30), t0);
    sm.step(release(31), t0);
    sm.step(press(31), t0);
    sm.step(press(30), t0);
    sm.step(Input::Tick, t0);

    assert_eq!(
        sm.state(),
        FsmState::AwaitingRelease {
            press: ButtonEvent::press(30)
        }
    );
    assert!(runner.launches().is_empty());
}

#[test]
fn idle_ignores_releases_ticks_and_completions() {
    let (mut sm, runner) = machine();
    let t0 = Instant::now();

    for input in [release(5), Input::Tick, completed(Generation::new(1))] {
        let step = sm.step(input, t0);
        assert!(!step.changed());
        assert!(!step.heartbeat);
    }

    assert_eq!(sm.state(), FsmState::Idle);
    assert!(runner.launches().is_empty());
}

#[test]
fn press_while_running_pauses_and_accumulates_segment() {
    let (mut sm, runner) = machine();
    let t0 = Instant::now();
    start_cycle(&mut sm, 5, t0);
    let begin_gen = runner.last_generation();

    let step = sm.step(press(5), secs(t0, 2.5));
    assert_eq!(step.to, FsmState::Paused);

    // Tracked begin cancelled, untracked pause launched with no arguments.
    assert_eq!(runner.cancelled(), vec![(ActionKind::Begin, begin_gen)]);
    let pauses = runner.started_of(ActionKind::Pause);
    assert_eq!(pauses.len(), 1);
    assert!(pauses[0].command.args.is_empty());
    assert_eq!(pauses[0].generation, None);

    assert!(!sm.has_tracked_process());
    assert_eq!(sm.side_action(), Some(ActionKind::Pause));
    assert_eq!(sm.session().accumulated(), 2.5);
    assert_eq!(sm.session().elapsed_text(), "2.5");
}

#[test]
fn second_press_cancels_pause_and_waits_for_release() {
    let (mut sm, runner) = machine();
    let t0 = Instant::now();
    start_cycle(&mut sm, 5, t0);
    sm.step(press(5), secs(t0, 2.5));

    // Unpause: re-enters release gating on the same key rather than resuming
    // immediately.
    let step = sm.step(press(5), secs(t0, 4.0));
    assert_eq!(
        step.to,
        FsmState::AwaitingRelease {
            press: ButtonEvent::press(5)
        }
    );
    assert!(runner.cancelled().contains(&(ActionKind::Pause, None)));
    assert_eq!(runner.started_of(ActionKind::Begin).len(), 1);

    // Release of another key is not enough.
    sm.step(release(6), secs(t0, 4.5));
    assert_eq!(runner.started_of(ActionKind::Begin).len(), 1);

    // The matching release resumes with the last segment's elapsed text.
    sm.step(release(5), secs(t0, 5.0));
    assert_eq!(sm.state(), FsmState::Running);
    let begins = runner.started_of(ActionKind::Begin);
    assert_eq!(begins.len(), 2);
    assert_eq!(begins[1].command.args, vec!["2.5".to_string()]);
    assert_eq!(sm.session().start_time(), Some(secs(t0, 5.0)));
}

#[test]
fn unpause_gates_on_the_key_that_unpaused() {
    let (mut sm, runner) = machine();
    let t0 = Instant::now();
    start_cycle(&mut sm, 5, t0);
    sm.step(press(5), secs(t0, 1.0));

    // A different key toggles the pause off; its release is what resumes.
    sm.step(press(9), secs(t0, 2.0));
    sm.step(release(5), secs(t0, 2.1));
    assert_eq!(runner.started_of(ActionKind::Begin).len(), 1);

    sm.step(release(9), secs(t0, 2.2));
    assert_eq!(sm.state(), FsmState::Running);
    assert_eq!(runner.started_of(ActionKind::Begin).len(), 2);
}

#[test]
fn completion_finishes_cycle_with_single_end_launch() {
    let (mut sm, runner) = machine();
    let t0 = Instant::now();
    start_cycle(&mut sm, 30, t0);
    let generation = sm.tracked_generation().unwrap();

    let step = sm.step(completed(generation), secs(t0, 10.0));
    assert_eq!(step.to, FsmState::Idle);

    let ends = runner.started_of(ActionKind::End);
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].command.program.to_str(), Some("/test/end"));
    assert_eq!(ends[0].command.args, vec!["0".to_string()]);
    assert!(!sm.has_tracked_process());
    assert_eq!(sm.tracked_generation(), None);

    // Replaying the same completion does nothing.
    sm.step(completed(generation), secs(t0, 11.0));
    assert_eq!(runner.started_of(ActionKind::End).len(), 1);
}

#[test]
fn end_receives_last_segment_text_after_resume() {
    let (mut sm, runner) = machine();
    let t0 = Instant::now();
    start_cycle(&mut sm, 5, t0);
    sm.step(press(5), secs(t0, 1.5));
    sm.step(press(5), secs(t0, 3.0));
    sm.step(release(5), secs(t0, 3.0));
    let generation = sm.tracked_generation().unwrap();

    sm.step(completed(generation), secs(t0, 20.0));

    let ends = runner.started_of(ActionKind::End);
    assert_eq!(ends[0].command.args, vec!["1.5".to_string()]);
}

#[test]
fn begin_launch_failure_returns_to_idle_without_handle() {
    let (mut sm, runner) = machine();
    runner.fail_launches_of(ActionKind::Begin);
    let t0 = Instant::now();

    sm.step(press(30), t0);
    let step = sm.step(release(30), t0);

    assert_eq!(step.to, FsmState::Idle);
    assert!(!sm.has_tracked_process());
    assert_eq!(runner.launches().len(), 1);
    assert!(runner.launches()[0].failed);

    // The machine is usable again once the script can start.
    runner.allow_launches_of(ActionKind::Begin);
    start_cycle(&mut sm, 30, t0);
}

#[test]
fn pause_launch_failure_returns_to_idle() {
    let (mut sm, runner) = machine();
    runner.fail_launches_of(ActionKind::Pause);
    let t0 = Instant::now();
    start_cycle(&mut sm, 5, t0);

    let step = sm.step(press(5), secs(t0, 1.0));

    assert_eq!(step.to, FsmState::Idle);
    assert!(!sm.has_tracked_process());
    assert_eq!(sm.side_action(), None);
    assert_eq!(runner.live_tracked(), Vec::<Generation>::new());
}

#[test]
fn pause_toggle_survives_failed_pause_into_next_cycle() {
    let (mut sm, runner) = machine();
    runner.fail_launches_of(ActionKind::Pause);
    let t0 = Instant::now();
    start_cycle(&mut sm, 5, t0);
    sm.step(press(5), secs(t0, 1.0));
    assert!(sm.pause_flag());

    // The toggle is still on in the next cycle, so its first press while
    // running switches it off: begin is cancelled and release gating starts
    // again without any pause launch.
    runner.allow_launches_of(ActionKind::Pause);
    start_cycle(&mut sm, 5, secs(t0, 2.0));
    let second = sm.tracked_generation();
    let step = sm.step(press(5), secs(t0, 3.0));

    assert_eq!(
        step.to,
        FsmState::AwaitingRelease {
            press: ButtonEvent::press(5)
        }
    );
    assert!(!sm.pause_flag());
    assert!(runner.started_of(ActionKind::Pause).is_empty());
    assert!(runner.cancelled().contains(&(ActionKind::Begin, second)));
    assert!(!sm.has_tracked_process());

    // From here on pausing works normally.
    sm.step(release(5), secs(t0, 3.0));
    sm.step(press(5), secs(t0, 4.0));
    assert_eq!(sm.state(), FsmState::Paused);
    assert_eq!(runner.started_of(ActionKind::Pause).len(), 1);
}

#[test]
fn end_launch_failure_still_returns_to_idle() {
    let (mut sm, runner) = machine();
    runner.fail_launches_of(ActionKind::End);
    let t0 = Instant::now();
    start_cycle(&mut sm, 30, t0);
    let generation = sm.tracked_generation().unwrap();

    let step = sm.step(completed(generation), secs(t0, 1.0));

    assert_eq!(step.to, FsmState::Idle);
    assert_eq!(sm.side_action(), None);
    assert!(!sm.has_tracked_process());
}

#[test]
fn stale_completion_from_cancelled_begin_is_ignored() {
    let (mut sm, runner) = machine();
    let t0 = Instant::now();
    start_cycle(&mut sm, 5, t0);
    let first = sm.tracked_generation().unwrap();

    // Pause, unpause, resume: a second begin with a newer generation.
    sm.step(press(5), secs(t0, 1.0));
    sm.step(press(5), secs(t0, 2.0));
    sm.step(release(5), secs(t0, 2.0));
    let second = sm.tracked_generation().unwrap();
    assert!(second > first);

    // The cancelled first begin reports late.
    let step = sm.step(completed(first), secs(t0, 3.0));
    assert!(!step.changed());
    assert_eq!(sm.state(), FsmState::Running);
    assert!(runner.started_of(ActionKind::End).is_empty());

    sm.step(completed(second), secs(t0, 4.0));
    assert_eq!(sm.state(), FsmState::Idle);
    assert_eq!(runner.started_of(ActionKind::End).len(), 1);
}

#[test]
fn completion_while_paused_is_ignored() {
    let (mut sm, runner) = machine();
    let t0 = Instant::now();
    start_cycle(&mut sm, 5, t0);
    let generation = sm.tracked_generation().unwrap();
    sm.step(press(5), secs(t0, 1.0));

    sm.step(completed(generation), secs(t0, 1.5));

    assert_eq!(sm.state(), FsmState::Paused);
    assert!(runner.started_of(ActionKind::End).is_empty());
}

#[test]
fn tick_is_a_heartbeat_only_while_timing() {
    let (mut sm, _runner) = machine();
    let t0 = Instant::now();

    assert!(!sm.step(Input::Tick, t0).heartbeat);

    start_cycle(&mut sm, 5, t0);
    let step = sm.step(Input::Tick, secs(t0, 5.0));
    assert!(step.heartbeat);
    assert!(!step.changed());

    sm.step(press(5), secs(t0, 6.0));
    let step = sm.step(Input::Tick, secs(t0, 11.0));
    assert!(step.heartbeat);
    assert_eq!(step.to, FsmState::Paused);
}

#[test]
fn releases_while_running_are_ignored() {
    let (mut sm, runner) = machine();
    let t0 = Instant::now();
    start_cycle(&mut sm, 5, t0);

    sm.step(release(5), secs(t0, 1.0));
    sm.step(release(7), secs(t0, 1.0));

    assert_eq!(sm.state(), FsmState::Running);
    assert_eq!(runner.launches().len(), 1);
}

#[test]
fn new_cycle_resets_elapsed_and_cancels_leftover_end() {
    let (mut sm, runner) = machine();
    let t0 = Instant::now();
    start_cycle(&mut sm, 5, t0);
    sm.step(press(5), secs(t0, 3.0));
    sm.step(press(5), secs(t0, 4.0));
    sm.step(release(5), secs(t0, 4.0));
    let generation = sm.tracked_generation().unwrap();
    sm.step(completed(generation), secs(t0, 8.0));
    assert_eq!(sm.session().accumulated(), 3.0);
    assert_eq!(sm.side_action(), Some(ActionKind::End));

    sm.step(press(5), secs(t0, 9.0));

    assert_eq!(sm.session().accumulated(), 0.0);
    assert_eq!(sm.session().elapsed_text(), "0");
    assert_eq!(sm.side_action(), None);
    assert!(runner.cancelled().contains(&(ActionKind::End, None)));

    sm.step(release(5), secs(t0, 9.0));
    let begins = runner.started_of(ActionKind::Begin);
    assert_eq!(begins.last().unwrap().command.args, vec!["0".to_string()]);
}

#[test]
fn accumulated_elapsed_sums_all_pauses_in_cycle() {
    let (mut sm, _runner) = machine();
    let t0 = Instant::now();
    start_cycle(&mut sm, 5, t0);

    // Segment 1: 0 -> 2, segment 2: 3 -> 3.5, segment 3: 10 -> 14.
    sm.step(press(5), secs(t0, 2.0));
    sm.step(press(5), secs(t0, 3.0));
    sm.step(release(5), secs(t0, 3.0));
    sm.step(press(5), secs(t0, 3.5));
    sm.step(press(5), secs(t0, 10.0));
    sm.step(release(5), secs(t0, 10.0));
    sm.step(press(5), secs(t0, 14.0));

    assert_eq!(sm.session().accumulated(), 6.5);
    assert_eq!(sm.session().elapsed_text(), "4");
}
