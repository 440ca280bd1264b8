//! Composition layer over the core components.
//!
//! Data flow is one-directional: the timer emits completion events, the
//! coordinator folds them into progression and the task store, updates the
//! scheduler counters, recomputes energy and then applies the
//! break-or-next-task policy. Components never call each other directly,
//! so each piece of shared state keeps a single writer.

use chrono::Utc;

use crate::energy::{EnergyModel, EnergySample};
use crate::events::Event;
use crate::progression::{ProgressionEngine, XP_PER_POMODORO, XP_PER_TASK};
use crate::scheduler::TaskScheduler;
use crate::session::{InterruptionReason, PomodoroSession};
use crate::storage::{
    Config, GamificationSnapshot, PomodoroSnapshot, RescheduleSnapshot, StateStore,
};
use crate::sync::Persister;
use crate::task::TaskStore;
use crate::timer::{TimerEngine, TimerPhase};

pub struct Coordinator {
    timer: TimerEngine,
    tasks: TaskStore,
    scheduler: TaskScheduler,
    energy: EnergyModel,
    progression: ProgressionEngine,
    daily_goal: u32,
    /// Break record under construction; appended to history on completion.
    pending_break: Option<PomodoroSession>,
}

impl Coordinator {
    pub fn new(config: Config, persister: Box<dyn Persister>) -> Self {
        Self {
            timer: TimerEngine::new(config.timer),
            tasks: TaskStore::new(persister),
            scheduler: TaskScheduler::new(config.reschedule),
            energy: EnergyModel::new(),
            progression: ProgressionEngine::new(),
            daily_goal: config.goals.daily_goal,
            pending_break: None,
        }
    }

    // ── Component access ─────────────────────────────────────────────

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskStore {
        &mut self.tasks
    }

    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    pub fn progression(&self) -> &ProgressionEngine {
        &self.progression
    }

    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    /// Latest cached energy sample, if one was computed.
    pub fn cached_energy(&self) -> Option<&EnergySample> {
        self.energy.cached()
    }

    /// Recompute the energy estimate from the scheduler-owned counters.
    pub fn energy_sample(&mut self) -> EnergySample {
        self.energy.calculate_energy_level(
            Utc::now(),
            self.scheduler.consecutive_pomodoros(),
            self.scheduler.last_break_time(),
        )
    }

    // ── Timer operations ─────────────────────────────────────────────

    /// Start a pomodoro, optionally attached to a task.
    ///
    /// An id that does not resolve in the store is treated as "no task",
    /// not an error.
    pub fn start_pomodoro(&mut self, task_id: Option<&str>) -> Vec<Event> {
        let resolved = task_id
            .filter(|id| self.tasks.get(id).is_some())
            .map(str::to_string);
        self.timer.start_pomodoro(resolved).into_iter().collect()
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.timer.pause()
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.timer.resume()
    }

    /// Abandon the in-flight pomodoro or break.
    pub fn stop(&mut self) -> Option<Event> {
        self.pending_break = None;
        self.timer.stop()
    }

    /// Advance the timer by one second and react to whatever completed.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        match self.timer.tick() {
            Some(event @ Event::PomodoroCompleted { .. }) => {
                events.push(event.clone());
                events.extend(self.after_pomodoro(&event));
            }
            Some(event @ Event::BreakCompleted { .. }) => {
                events.push(event);
                events.extend(self.after_break());
            }
            Some(event) => events.push(event),
            None => {}
        }
        events
    }

    /// Finish the current pomodoro ahead of the clock.
    pub fn complete_pomodoro(&mut self) -> Vec<Event> {
        let Some(event) = self.timer.complete_pomodoro() else {
            return Vec::new();
        };
        let mut events = vec![event.clone()];
        events.extend(self.after_pomodoro(&event));
        events
    }

    /// Begin a break; long when the long-break cadence is reached.
    pub fn start_break(&mut self) -> Vec<Event> {
        let long = self.scheduler.consecutive_pomodoros()
            >= self.timer.config().pomodoros_before_long_break;
        self.start_break_with(long)
    }

    /// Begin a break of an explicit length.
    pub fn start_break_with(&mut self, long: bool) -> Vec<Event> {
        let Some(event) = self.timer.start_break(long) else {
            return Vec::new();
        };
        let minutes = if long {
            self.timer.config().long_break_min
        } else {
            self.timer.config().short_break_min
        };
        self.pending_break = Some(PomodoroSession::new(None, minutes, true));
        vec![event]
    }

    /// Finish the current break ahead of the clock.
    pub fn complete_break(&mut self) -> Vec<Event> {
        let Some(event) = self.timer.complete_break() else {
            return Vec::new();
        };
        let mut events = vec![event];
        events.extend(self.after_break());
        events
    }

    /// Mark a task done and fold it into progression.
    pub fn complete_task(&mut self, task_id: &str) -> Vec<Event> {
        if !self.tasks.set_completed(task_id, true) {
            return Vec::new();
        }
        self.progression.record_task_completed();
        let mut events = self.progression.add_xp(XP_PER_TASK);
        events.extend(self.progression.check_badges());
        events.extend(self.progression.check_achievements());
        events
    }

    // ── Interruptions ────────────────────────────────────────────────

    /// Log an interruption against the live session.
    pub fn log_interruption(
        &mut self,
        reason: InterruptionReason,
        description: Option<String>,
    ) -> Vec<Event> {
        let Some(session_id) = self.timer.current_session().map(|s| s.id.clone()) else {
            return Vec::new();
        };
        let Some(interruption) =
            self.timer
                .log_mut()
                .add_interruption(&session_id, reason, description)
        else {
            return Vec::new();
        };
        self.progression.record_interruption();
        vec![Event::InterruptionLogged {
            session_id,
            interruption_id: interruption.id,
            reason,
            at: interruption.timestamp,
        }]
    }

    pub fn remove_interruption(&mut self, interruption_id: &str) -> Option<Event> {
        self.timer
            .log_mut()
            .remove_interruption(interruption_id)
            .then(|| Event::InterruptionRemoved {
                interruption_id: interruption_id.to_string(),
                at: Utc::now(),
            })
    }

    // ── Completion handling ──────────────────────────────────────────

    fn after_pomodoro(&mut self, completed: &Event) -> Vec<Event> {
        let Event::PomodoroCompleted {
            task_id,
            duration_min,
            ..
        } = completed
        else {
            return Vec::new();
        };

        if let Some(id) = task_id {
            self.tasks.record_pomodoro(id);
        }
        self.progression.record_pomodoro(*duration_min);
        self.scheduler.record_pomodoro();

        let mut events = self.progression.add_xp(XP_PER_POMODORO);
        events.extend(self.progression.check_badges());
        events.extend(self.progression.check_achievements());

        let sample = self.energy_sample();

        if self.scheduler.should_start_break() {
            events.extend(self.start_break());
        } else if self.scheduler.should_start_next_task() {
            if let Some(next_id) = self
                .scheduler
                .next_task(self.tasks.tasks(), sample.level)
                .map(|t| t.id.clone())
            {
                events.push(Event::TaskSelected {
                    task_id: next_id.clone(),
                    at: Utc::now(),
                });
                events.extend(self.start_pomodoro(Some(&next_id)));
            }
        }
        events
    }

    fn after_break(&mut self) -> Vec<Event> {
        let now = Utc::now();
        self.scheduler.record_break(now);
        if let Some(mut record) = self.pending_break.take() {
            record.end_time = Some(now);
            record.completed = true;
            self.timer.log_mut().append(record);
        }
        self.energy_sample();
        Vec::new()
    }

    // ── Snapshots ────────────────────────────────────────────────────

    pub fn snapshot(&self) -> (PomodoroSnapshot, GamificationSnapshot, RescheduleSnapshot) {
        let stats = self.progression.stats();
        let pomodoro = PomodoroSnapshot {
            tasks: self.tasks.tasks().to_vec(),
            settings: *self.timer.config(),
            sessions: self.timer.log().history().to_vec(),
            daily_goal: self.daily_goal,
            current_streak: stats.current_streak,
            longest_streak: stats.longest_streak,
        };
        let gamification = GamificationSnapshot {
            user_stats: stats.clone(),
        };
        let reschedule = RescheduleSnapshot {
            settings: self.scheduler.settings().clone(),
            energy_level: self.energy.cached().cloned(),
            consecutive_pomodoros: self.scheduler.consecutive_pomodoros(),
            last_break_time: self.scheduler.last_break_time(),
        };
        (pomodoro, gamification, reschedule)
    }

    pub fn restore(
        &mut self,
        pomodoro: PomodoroSnapshot,
        gamification: GamificationSnapshot,
        reschedule: RescheduleSnapshot,
    ) {
        // Settings inside the snapshots are written for the storage
        // contract but not read back: config.toml stays authoritative.
        self.tasks.restore(pomodoro.tasks);
        self.timer.log_mut().restore(pomodoro.sessions);
        self.progression.restore(gamification.user_stats);
        self.scheduler
            .restore_counters(reschedule.consecutive_pomodoros, reschedule.last_break_time);
        self.energy.restore(reschedule.energy_level);
    }

    pub fn save_to(&self, store: &StateStore) -> crate::error::Result<()> {
        let (pomodoro, gamification, reschedule) = self.snapshot();
        store.save(StateStore::POMODORO_KEY, &pomodoro)?;
        store.save(StateStore::GAMIFICATION_KEY, &gamification)?;
        store.save(StateStore::RESCHEDULE_KEY, &reschedule)?;
        Ok(())
    }

    pub fn load_from(&mut self, store: &StateStore) {
        let pomodoro: PomodoroSnapshot = store.load_or_default(StateStore::POMODORO_KEY);
        let gamification: GamificationSnapshot =
            store.load_or_default(StateStore::GAMIFICATION_KEY);
        let reschedule: RescheduleSnapshot = store.load_or_default(StateStore::RESCHEDULE_KEY);
        self.restore(pomodoro, gamification, reschedule);
    }

    /// True while the timer sits in a break phase.
    pub fn in_break(&self) -> bool {
        self.timer.phase() == TimerPhase::Break
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::NullPersister;
    use crate::task::Task;

    fn coordinator() -> Coordinator {
        Coordinator::new(Config::default(), Box::new(NullPersister))
    }

    #[test]
    fn test_unresolved_task_id_falls_back_to_no_task() {
        let mut c = coordinator();
        let events = c.start_pomodoro(Some("no-such-task"));
        assert_eq!(events.len(), 1);
        assert!(c.timer().current_session().unwrap().task_id.is_none());
    }

    #[test]
    fn test_completion_updates_task_progression_and_scheduler() {
        let mut c = coordinator();
        let id = c.tasks_mut().add(Task::new("write")).id.clone();
        c.start_pomodoro(Some(&id));
        let events = c.complete_pomodoro();

        assert!(events
            .iter()
            .any(|e| matches!(e, Event::PomodoroCompleted { .. })));
        assert_eq!(c.tasks().get(&id).unwrap().completed_pomodoros, 1);
        assert_eq!(c.progression().stats().total_pomodoros, 1);
        assert_eq!(c.progression().stats().total_focus_time_min, 25);
        assert_eq!(c.scheduler().consecutive_pomodoros(), 1);
        assert!(c.cached_energy().is_some());
    }

    #[test]
    fn test_complete_task_awards_xp() {
        let mut c = coordinator();
        let id = c.tasks_mut().add(Task::new("done")).id.clone();
        let events = c.complete_task(&id);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::XpAwarded { amount: 50, .. })));
        assert!(c.tasks().get(&id).unwrap().completed);
        assert_eq!(c.progression().stats().total_tasks, 1);
    }

    #[test]
    fn test_interruption_round_trip_through_coordinator() {
        let mut c = coordinator();
        c.start_pomodoro(None);
        let events = c.log_interruption(InterruptionReason::Phone, None);
        assert_eq!(events.len(), 1);
        assert_eq!(c.progression().stats().total_interruptions, 1);

        let Event::InterruptionLogged {
            interruption_id, ..
        } = &events[0]
        else {
            panic!("expected InterruptionLogged");
        };
        assert!(c.remove_interruption(interruption_id).is_some());
        let session = c.timer().current_session().unwrap();
        assert_eq!(session.interruptions, 0);
        assert!(session.interruption_list.is_empty());
    }

    #[test]
    fn test_break_completion_records_session_and_resets_counter() {
        let mut c = coordinator();
        c.start_pomodoro(None);
        c.complete_pomodoro();
        assert_eq!(c.scheduler().consecutive_pomodoros(), 1);

        c.start_break();
        assert!(c.in_break());
        // Drive the break to completion.
        while c.in_break() {
            c.tick();
        }
        assert_eq!(c.scheduler().consecutive_pomodoros(), 0);
        assert!(c.scheduler().last_break_time().is_some());
        let breaks: Vec<_> = c
            .timer()
            .log()
            .history()
            .iter()
            .filter(|s| s.is_break)
            .collect();
        assert_eq!(breaks.len(), 1);
        assert!(breaks[0].completed);
    }

    #[test]
    fn test_break_preempts_next_task_on_completion() {
        let mut config = Config::default();
        config.reschedule.max_consecutive_pomodoros = 1;
        let mut c = Coordinator::new(config, Box::new(NullPersister));
        c.tasks_mut().add(Task::new("queued").with_estimate(1));

        c.start_pomodoro(None);
        let events = c.complete_pomodoro();
        // The break starts instead of the queued task.
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::BreakStarted { .. })));
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::TaskSelected { .. })));
        assert!(c.in_break());
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut c = coordinator();
        let id = c.tasks_mut().add(Task::new("keep me")).id.clone();
        c.start_pomodoro(Some(&id));
        c.complete_pomodoro();

        let (p, g, r) = c.snapshot();
        assert_eq!(p.tasks.len(), 1);
        assert_eq!(p.sessions.len(), 1);
        assert_eq!(g.user_stats.total_pomodoros, 1);

        let mut fresh = coordinator();
        fresh.restore(p, g, r);
        assert_eq!(fresh.tasks().get(&id).unwrap().completed_pomodoros, 1);
        assert_eq!(fresh.progression().stats().total_pomodoros, 1);
        assert_eq!(fresh.scheduler().consecutive_pomodoros(), 1);
        assert_eq!(fresh.timer().log().history().len(), 1);
    }
}
