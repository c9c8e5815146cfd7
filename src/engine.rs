//! Sequential download orchestration
//!
//! An explicit finite state machine: discrete [`Event`]s go in, state
//! mutates, and [`Effect`]s come out for the event loop to execute. The
//! engine performs no I/O itself, which keeps every transition unit-testable.
//!
//! Downloads are strictly sequential: at most one step is ever in flight,
//! and the next is dispatched only when the previous completion event has
//! been consumed. A completion arriving after cancellation (or after the
//! run finished) is discarded.

use crate::types::Outcome;

/// Lifecycle phase of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Before the first step is dispatched
    Idle,
    /// A step has been dispatched for the entry at `current_index`
    AwaitingStep,
    /// All entries processed
    Done,
    /// Terminated early by the user
    Cancelled,
}

/// Discrete input consumed by the engine
#[derive(Clone, Debug)]
pub enum Event {
    /// Program start; dispatches the first step (or finishes an empty run)
    Started,
    /// The in-flight step finished with a classified outcome
    StepCompleted(Outcome),
    /// The user asked to stop (key press or signal)
    CancelRequested,
    /// Spinner animation frame
    Tick,
    /// Terminal width changed
    Resized(u16),
}

/// Side effect requested by a transition, executed by the event loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Dispatch the download step for the entry at this index
    DispatchStep(usize),
    /// Print the inline completion line for a finished entry
    PrintCompletion(Outcome),
    /// Leave the event loop and render the final summary
    Quit,
}

/// Orchestration state machine
///
/// Owns the sequence index and the aggregated outcomes. Mutated only through
/// [`Engine::handle`]; read (never mutated) by the renderer.
pub struct Engine {
    total: usize,
    phase: Phase,
    current_index: usize,
    outcomes: Vec<Outcome>,
    progress: f64,
    spinner_frame: usize,
    width: u16,
}

impl Engine {
    /// Create an engine for a run over `total` manifest entries
    pub fn new(total: usize) -> Self {
        Self {
            total,
            phase: Phase::Idle,
            current_index: 0,
            outcomes: Vec::with_capacity(total),
            // Degenerate lists have nothing to interpolate over.
            progress: if total <= 1 { 1.0 } else { 0.0 },
            spinner_frame: 0,
            width: 80,
        }
    }

    /// Consume one event, returning the effects to execute
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Started => self.on_started(),
            Event::StepCompleted(outcome) => self.on_step_completed(outcome),
            Event::CancelRequested => self.on_cancel(),
            Event::Tick => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                Vec::new()
            }
            Event::Resized(width) => {
                self.width = width;
                Vec::new()
            }
        }
    }

    fn on_started(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Idle {
            return Vec::new();
        }
        if self.total == 0 {
            self.phase = Phase::Done;
            return vec![Effect::Quit];
        }
        self.phase = Phase::AwaitingStep;
        vec![Effect::DispatchStep(0)]
    }

    fn on_step_completed(&mut self, outcome: Outcome) -> Vec<Effect> {
        // A step that outlived cancellation (or a spurious completion after
        // the run finished) is discarded.
        if self.phase != Phase::AwaitingStep {
            return Vec::new();
        }

        self.outcomes.push(outcome.clone());
        self.current_index += 1;
        self.progress = self.fraction();

        if self.current_index < self.total {
            vec![
                Effect::PrintCompletion(outcome),
                Effect::DispatchStep(self.current_index),
            ]
        } else {
            self.phase = Phase::Done;
            vec![Effect::PrintCompletion(outcome), Effect::Quit]
        }
    }

    fn on_cancel(&mut self) -> Vec<Effect> {
        if self.is_terminated() {
            return Vec::new();
        }
        self.phase = Phase::Cancelled;
        vec![Effect::Quit]
    }

    /// Fraction of the run completed, in `[0, 1]`
    ///
    /// The divisor is `total - 1`, so the bar reaches 1.0 while the final
    /// entry downloads; single-entry and empty runs are 1.0 immediately.
    fn fraction(&self) -> f64 {
        if self.total <= 1 {
            return 1.0;
        }
        (self.current_index as f64 / (self.total - 1) as f64).min(1.0)
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once the run reached `Done` or `Cancelled`
    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, Phase::Done | Phase::Cancelled)
    }

    /// True when the run was ended by the user
    pub fn cancelled(&self) -> bool {
        self.phase == Phase::Cancelled
    }

    /// Index of the entry currently (or next) in flight; equals the number
    /// of completed entries
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of entries in the run
    pub fn total(&self) -> usize {
        self.total
    }

    /// Outcomes accumulated so far, in list order
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Number of successful downloads so far
    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failure()).count()
    }

    /// Attempted display names of the failures so far, in list order
    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Failure { display_name, .. } => Some(display_name.as_str()),
            Outcome::Success { .. } => None,
        })
    }

    /// Progress fraction in `[0, 1]`, non-decreasing across transitions
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Spinner animation frame counter
    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    /// Last observed terminal width
    pub fn width(&self) -> u16 {
        self.width
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn success(name: &str) -> Outcome {
        Outcome::Success {
            resolved_name: name.to_string(),
        }
    }

    fn assert_invariant(engine: &Engine) {
        assert_eq!(
            engine.outcomes().len(),
            engine.current_index(),
            "outcomes must track the sequence index"
        );
    }

    #[test]
    fn test_every_entry_dispatched_once_in_list_order() {
        let mut engine = Engine::new(3);
        let mut dispatched = Vec::new();

        let mut effects = engine.handle(Event::Started);
        loop {
            let mut next = Vec::new();
            for effect in effects {
                match effect {
                    Effect::DispatchStep(index) => {
                        dispatched.push(index);
                        // Simulate the step completing; its completion event
                        // drives the next dispatch.
                        next = engine.handle(Event::StepCompleted(success("mod.jar")));
                    }
                    Effect::PrintCompletion(_) | Effect::Quit => {}
                }
                assert_invariant(&engine);
            }
            if next.is_empty() {
                break;
            }
            effects = next;
        }

        assert_eq!(dispatched, vec![0, 1, 2]);
        assert_eq!(engine.phase(), Phase::Done);
    }

    #[test]
    fn test_at_most_one_step_in_flight() {
        let mut engine = Engine::new(5);
        let effects = engine.handle(Event::Started);
        let dispatches = effects
            .iter()
            .filter(|e| matches!(e, Effect::DispatchStep(_)))
            .count();
        assert_eq!(dispatches, 1);

        // Each completion yields at most one further dispatch.
        let effects = engine.handle(Event::StepCompleted(success("a.jar")));
        let dispatches = effects
            .iter()
            .filter(|e| matches!(e, Effect::DispatchStep(_)))
            .count();
        assert_eq!(dispatches, 1);
    }

    #[test]
    fn test_empty_run_finishes_immediately() {
        let mut engine = Engine::new(0);
        let effects = engine.handle(Event::Started);
        assert_eq!(effects, vec![Effect::Quit]);
        assert_eq!(engine.phase(), Phase::Done);
        assert!((engine.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_entry_run_has_full_progress_from_the_start() {
        let mut engine = Engine::new(1);
        engine.handle(Event::Started);
        assert!((engine.progress() - 1.0).abs() < f64::EPSILON);

        let effects = engine.handle(Event::StepCompleted(success("only.jar")));
        assert!(effects.contains(&Effect::Quit));
        assert!((engine.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_is_monotonic_and_hits_one_at_last_entry() {
        let mut engine = Engine::new(4);
        engine.handle(Event::Started);

        let mut last = engine.progress();
        for completed in 1..=4 {
            engine.handle(Event::StepCompleted(success("mod.jar")));
            let progress = engine.progress();
            assert!(progress >= last, "progress must never decrease");
            last = progress;

            if completed == 3 {
                // current_index == total - 1: the bar is full while the
                // final entry downloads.
                assert!((progress - 1.0).abs() < f64::EPSILON);
            }
        }
        assert!((engine.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_outcomes_match_index_after_every_transition() {
        let mut engine = Engine::new(2);
        assert_invariant(&engine);
        engine.handle(Event::Started);
        assert_invariant(&engine);
        engine.handle(Event::StepCompleted(success("a.jar")));
        assert_invariant(&engine);
        engine.handle(Event::StepCompleted(Outcome::not_found("b")));
        assert_invariant(&engine);
        assert_eq!(engine.phase(), Phase::Done);
    }

    #[test]
    fn test_mixed_outcomes_aggregate_for_summary() {
        let mut engine = Engine::new(3);
        engine.handle(Event::Started);
        engine.handle(Event::StepCompleted(Outcome::not_found("Broken Mod")));
        engine.handle(Event::StepCompleted(success("ok-1.jar")));
        engine.handle(Event::StepCompleted(success("ok-2.jar")));

        assert_eq!(engine.successes(), 2);
        let failures: Vec<_> = engine.failures().collect();
        assert_eq!(failures, vec!["Broken Mod"]);
    }

    #[test]
    fn test_cancellation_halts_dispatch_and_keeps_outcomes() {
        let mut engine = Engine::new(3);
        engine.handle(Event::Started);
        engine.handle(Event::StepCompleted(success("first.jar")));

        let effects = engine.handle(Event::CancelRequested);
        assert_eq!(effects, vec![Effect::Quit]);
        assert!(engine.cancelled());
        assert_eq!(engine.outcomes().len(), 1);

        // The step that was in flight finishes later; its result is discarded.
        let effects = engine.handle(Event::StepCompleted(success("late.jar")));
        assert!(effects.is_empty());
        assert_eq!(engine.outcomes().len(), 1);
        assert_invariant(&engine);
    }

    #[test]
    fn test_cancel_after_done_is_ignored() {
        let mut engine = Engine::new(1);
        engine.handle(Event::Started);
        engine.handle(Event::StepCompleted(success("only.jar")));
        assert_eq!(engine.phase(), Phase::Done);

        let effects = engine.handle(Event::CancelRequested);
        assert!(effects.is_empty());
        assert_eq!(engine.phase(), Phase::Done);
    }

    #[test]
    fn test_tick_and_resize_touch_only_presentation_state() {
        let mut engine = Engine::new(2);
        engine.handle(Event::Started);

        assert!(engine.handle(Event::Tick).is_empty());
        assert!(engine.handle(Event::Tick).is_empty());
        assert_eq!(engine.spinner_frame(), 2);

        assert!(engine.handle(Event::Resized(120)).is_empty());
        assert_eq!(engine.width(), 120);
        assert_invariant(&engine);
    }
}
