//! End-to-end flow across the core components.

use focusloop_core::storage::Config;
use focusloop_core::sync::NullPersister;
use focusloop_core::{Coordinator, Event, InterruptionReason, Task, TaskPriority, TimerPhase};

fn manual_config() -> Config {
    // Auto-start off so the flow under test stays deterministic.
    let mut config = Config::default();
    config.reschedule.auto_start_next_task = false;
    config.reschedule.auto_start_break = false;
    config
}

#[test]
fn test_pomodoro_lifecycle_feeds_progression_and_store() {
    let mut c = Coordinator::new(manual_config(), Box::new(NullPersister));
    let id = c
        .tasks_mut()
        .add(Task::new("integration").with_estimate(2))
        .id
        .clone();

    let started = c.start_pomodoro(Some(&id));
    assert!(matches!(started[0], Event::PomodoroStarted { .. }));
    assert_eq!(c.timer().time_left_secs(), 25 * 60);

    // A few ticks, then finish early by explicit completion.
    for _ in 0..120 {
        assert!(c.tick().is_empty());
    }
    assert_eq!(c.timer().time_left_secs(), 25 * 60 - 120);

    let events = c.complete_pomodoro();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::PomodoroCompleted { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::XpAwarded { amount: 10, .. })));
    // First pomodoro also unlocks the first-focus badge.
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::BadgeUnlocked { .. })));

    assert_eq!(c.tasks().get(&id).unwrap().completed_pomodoros, 1);
    assert_eq!(c.progression().stats().total_pomodoros, 1);
    assert_eq!(c.timer().log().history().len(), 1);
    assert_eq!(c.timer().phase(), TimerPhase::Idle);
}

#[test]
fn test_ticks_while_paused_never_mutate_time_left() {
    let mut c = Coordinator::new(manual_config(), Box::new(NullPersister));
    c.start_pomodoro(None);
    c.tick();
    let frozen = c.timer().time_left_secs();

    c.pause();
    for _ in 0..100 {
        c.tick();
    }
    assert_eq!(c.timer().time_left_secs(), frozen);

    c.resume();
    c.tick();
    assert_eq!(c.timer().time_left_secs(), frozen - 1);
}

#[test]
fn test_abandoned_session_leaves_no_trace() {
    let mut c = Coordinator::new(manual_config(), Box::new(NullPersister));
    c.start_pomodoro(None);
    c.log_interruption(InterruptionReason::Phone, Some("spam call".into()));
    c.stop();

    assert!(c.timer().log().history().is_empty());
    assert_eq!(c.progression().stats().total_pomodoros, 0);
    // The interruption count survives; honesty is part of the stats.
    assert_eq!(c.progression().stats().total_interruptions, 1);
}

#[test]
fn test_interruption_survives_into_history_and_removes_cleanly() {
    let mut c = Coordinator::new(manual_config(), Box::new(NullPersister));
    c.start_pomodoro(None);

    let logged = c.log_interruption(InterruptionReason::Urgent, None);
    let Event::InterruptionLogged {
        session_id,
        interruption_id,
        ..
    } = &logged[0]
    else {
        panic!("expected InterruptionLogged");
    };

    c.complete_pomodoro();
    let session = c
        .timer()
        .log()
        .history()
        .iter()
        .find(|s| &s.id == session_id)
        .unwrap();
    assert_eq!(session.interruptions, 1);

    assert!(c.remove_interruption(interruption_id).is_some());
    let session = c
        .timer()
        .log()
        .history()
        .iter()
        .find(|s| &s.id == session_id)
        .unwrap();
    assert_eq!(session.interruptions, 0);
    assert!(session.interruption_list.is_empty());
}

#[test]
fn test_scheduler_pick_respects_energy_filter_after_priority_sort() {
    use focusloop_core::{EnergyLevel, RescheduleSettings, TaskScheduler};

    let scheduler = TaskScheduler::new(RescheduleSettings::default());
    let tasks = vec![
        Task::new("heavy")
            .with_priority(TaskPriority::High)
            .with_estimate(5),
        Task::new("light")
            .with_priority(TaskPriority::Low)
            .with_estimate(1),
    ];

    // Low energy removes the high-priority pick; the light task wins.
    let picked = scheduler.next_task(&tasks, EnergyLevel::Low).unwrap();
    assert_eq!(picked.title, "light");

    // High energy removes the light task instead.
    let picked = scheduler.next_task(&tasks, EnergyLevel::High).unwrap();
    assert_eq!(picked.title, "heavy");
}

#[test]
fn test_auto_break_after_max_consecutive_pomodoros() {
    let mut config = Config::default();
    config.reschedule.max_consecutive_pomodoros = 2;
    let mut c = Coordinator::new(config, Box::new(NullPersister));

    for _ in 0..2 {
        c.start_pomodoro(None);
        let events = c.complete_pomodoro();
        if c.in_break() {
            assert!(events
                .iter()
                .any(|e| matches!(e, Event::BreakStarted { .. })));
        }
    }
    // Second completion hits the budget; the break pre-empts any next task.
    assert!(c.in_break());

    while c.in_break() {
        c.tick();
    }
    assert_eq!(c.scheduler().consecutive_pomodoros(), 0);
    assert!(c.timer().log().history().iter().any(|s| s.is_break));
}
