use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Generation numbers are drawn from one sequence for the whole process, so a
/// pass queued by a discarded input can never match one issued by its
/// replacement.
static GENERATIONS: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    GENERATIONS.fetch_add(1, Ordering::Relaxed)
}

/// Per-variant thresholds for the debounced filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Queries shorter than this (in characters) never produce suggestions.
    pub min_query_len: usize,
    /// Quiet period after the last input before the pass runs.
    pub debounce: Duration,
}

impl EngineConfig {
    pub const fn city() -> Self {
        Self {
            min_query_len: 2,
            debounce: Duration::from_millis(300),
        }
    }

    pub const fn field_of_work() -> Self {
        Self {
            min_query_len: 1,
            debounce: Duration::from_millis(200),
        }
    }
}

/// A pass the caller must run after `delay`, tagged with the generation it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledPass {
    pub generation: u64,
    pub query: String,
    pub delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Below the minimum length; suggestions must be cleared and any pending
    /// timer cancelled.
    Suppressed,
    Scheduled(ScheduledPass),
}

/// Debounce bookkeeping for one input. Timers themselves live in
/// `BackgroundTaskManager::debounce`; this only decides what gets scheduled and which
/// completed passes are still wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEngine {
    config: EngineConfig,
    pending: Option<u64>,
}

impl FilterEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            pending: None,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn meets_minimum(&self, text: &str) -> bool {
        text.chars().count() >= self.config.min_query_len
    }

    /// Every input supersedes whatever was scheduled before it.
    pub fn on_input(&mut self, text: &str) -> InputOutcome {
        if !self.meets_minimum(text) {
            self.pending = None;
            return InputOutcome::Suppressed;
        }

        let generation = next_generation();
        self.pending = Some(generation);
        InputOutcome::Scheduled(ScheduledPass {
            generation,
            query: text.to_string(),
            delay: self.config.debounce,
        })
    }

    /// True while `generation` is the pass still waiting to be applied.
    pub fn is_current(&self, generation: u64) -> bool {
        self.pending == Some(generation)
    }

    /// Claims the result of a finished pass. Returns false for superseded or
    /// cancelled passes, whose results must be dropped.
    pub fn accept(&mut self, generation: u64) -> bool {
        if self.is_current(generation) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_generation(&self) -> Option<u64> {
        self.pending
    }

    /// Teardown: nothing scheduled so far may be applied afterwards.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled(outcome: InputOutcome) -> ScheduledPass {
        match outcome {
            InputOutcome::Scheduled(pass) => pass,
            InputOutcome::Suppressed => panic!("expected a scheduled pass"),
        }
    }

    #[test]
    fn test_short_city_query_is_suppressed() {
        let mut engine = FilterEngine::new(EngineConfig::city());
        assert_eq!(engine.on_input("T"), InputOutcome::Suppressed);
        assert!(!engine.is_pending());
    }

    #[test]
    fn test_empty_field_query_is_suppressed() {
        let mut engine = FilterEngine::new(EngineConfig::field_of_work());
        assert_eq!(engine.on_input(""), InputOutcome::Suppressed);
        assert!(!engine.is_pending());

        let pass = scheduled(engine.on_input("P"));
        assert_eq!(pass.delay, Duration::from_millis(200));
    }

    #[test]
    fn test_minimum_counts_characters_not_bytes() {
        let mut engine = FilterEngine::new(EngineConfig::city());
        assert_eq!(engine.on_input("ח"), InputOutcome::Suppressed);
        let pass = scheduled(engine.on_input("חי"));
        assert_eq!(pass.query, "חי");
        assert_eq!(pass.delay, Duration::from_millis(300));
    }

    #[test]
    fn test_only_latest_input_is_accepted() {
        let mut engine = FilterEngine::new(EngineConfig::city());
        let first = scheduled(engine.on_input("Te"));
        let second = scheduled(engine.on_input("Tel"));
        let third = scheduled(engine.on_input("Tel "));

        assert!(!engine.accept(first.generation));
        assert!(!engine.accept(second.generation));
        assert!(engine.accept(third.generation));
        assert_eq!(third.query, "Tel ");

        // A pass is applied at most once
        assert!(!engine.accept(third.generation));
    }

    #[test]
    fn test_dropping_below_minimum_invalidates_pending_pass() {
        let mut engine = FilterEngine::new(EngineConfig::city());
        let pass = scheduled(engine.on_input("Ha"));
        assert_eq!(engine.on_input("H"), InputOutcome::Suppressed);
        assert!(!engine.accept(pass.generation));
    }

    #[test]
    fn test_fresh_engine_rejects_pass_from_replaced_engine() {
        let mut closed = FilterEngine::new(EngineConfig::city());
        let stale = scheduled(closed.on_input("Haifa"));

        let mut reopened = FilterEngine::new(EngineConfig::city());
        let fresh = scheduled(reopened.on_input("Haifa"));

        assert_ne!(stale.generation, fresh.generation);
        assert!(!reopened.accept(stale.generation));
        assert!(reopened.accept(fresh.generation));
    }

    #[test]
    fn test_cancel_rejects_in_flight_pass() {
        let mut engine = FilterEngine::new(EngineConfig::field_of_work());
        let pass = scheduled(engine.on_input("Elec"));
        engine.cancel();
        assert!(!engine.is_pending());
        assert!(!engine.accept(pass.generation));
    }
}
