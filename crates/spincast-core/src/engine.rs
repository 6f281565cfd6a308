// Spin engine: the single state object behind the wheel.
//
// Owns the pool, history, cumulative rotation, spin counter and the
// Idle/Spinning state machine. Everything here is synchronous; the caller
// owns the settle timer and hands the ticket's generation back through
// `complete_spin` once the animation duration has elapsed.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::WheelConfig;
use crate::error::SpinError;
use crate::history::{History, HistoryEntry};
use crate::planner::{self, RevolutionRange};
use crate::pool::{parse_list, Pool};
use crate::preset;
use crate::selector::{self, RandomSource};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    Spinning,
}

/// Policies and tunables the engine applies to every spin.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Must equal the duration the renderer animates over.
    pub spin_duration: Duration,
    pub revolutions: RevolutionRange,
    pub remove_after_pick: bool,
    pub auto_speak: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings::from(&WheelConfig::default())
    }
}

impl From<&WheelConfig> for EngineSettings {
    fn from(wheel: &WheelConfig) -> Self {
        EngineSettings {
            spin_duration: wheel.spin_duration(),
            revolutions: wheel.revolutions(),
            remove_after_pick: wheel.remove_after_pick,
            auto_speak: wheel.auto_speak,
        }
    }
}

/// Everything the caller needs to animate an accepted spin and to settle it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinTicket {
    /// Hand back to `complete_spin` when the timer fires.
    pub generation: u64,
    pub index: usize,
    pub label: String,
    pub spin_number: u64,
    pub start_rotation: f64,
    pub target_rotation: f64,
    pub extra_revolutions: u32,
    pub duration: Duration,
}

/// Effects applied when a spin settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinOutcome {
    pub label: String,
    pub index: usize,
    pub spin_number: u64,
    /// The item was taken out of the pool (remove-after-pick).
    pub removed: bool,
    /// The caller should announce the label (auto-speak).
    pub announce: bool,
}

#[derive(Debug, Clone)]
struct PendingSpin {
    generation: u64,
    index: usize,
    label: String,
    spin_number: u64,
}

// ---------------------------------------------------------------------------
// SpinEngine
// ---------------------------------------------------------------------------

pub struct SpinEngine {
    pool: Pool,
    /// Last raw text successfully applied; `reset` re-derives the pool from it.
    raw_text: String,
    history: History,
    rotation: f64,
    spin_count: u64,
    pending: Option<PendingSpin>,
    /// Bumped on every accepted spin and every pool replacement. Settles
    /// carrying an older value are discarded.
    generation: u64,
    settings: EngineSettings,
    rng: Box<dyn RandomSource>,
}

impl SpinEngine {
    /// Create an engine whose pool is derived from `initial_raw`.
    ///
    /// An empty initial list is allowed; the wheel simply cannot spin until a
    /// non-empty list is applied.
    pub fn new(initial_raw: &str, settings: EngineSettings, rng: Box<dyn RandomSource>) -> Self {
        SpinEngine {
            pool: Pool::from_raw(initial_raw),
            raw_text: initial_raw.to_string(),
            history: History::new(),
            rotation: 0.0,
            spin_count: 0,
            pending: None,
            generation: 0,
            settings,
            rng,
        }
    }

    // -- Accessors --

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn items(&self) -> &[String] {
        self.pool.items()
    }

    pub fn slice_angle(&self) -> Option<f64> {
        self.pool.slice_angle()
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.history.latest()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> SpinState {
        if self.pending.is_some() {
            SpinState::Spinning
        } else {
            SpinState::Idle
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Index of the slice under the pointer at the current rotation.
    pub fn item_at_pointer(&self) -> Option<usize> {
        planner::index_at_pointer(self.rotation, self.pool.len())
    }

    // -- Policies --

    pub fn set_remove_after_pick(&mut self, enabled: bool) {
        self.settings.remove_after_pick = enabled;
    }

    pub fn set_auto_speak(&mut self, enabled: bool) {
        self.settings.auto_speak = enabled;
    }

    // -- Pool lifecycle --

    /// Replace the pool with the items parsed from `raw`.
    ///
    /// Returns the new pool size. An input with no items is rejected with
    /// `EmptyPool` and leaves every piece of state untouched.
    pub fn apply_list(&mut self, raw: &str) -> Result<usize, SpinError> {
        let items = parse_list(raw);
        if items.is_empty() {
            info!("Ignoring list application with no items");
            return Err(SpinError::EmptyPool);
        }
        self.raw_text = raw.to_string();
        self.install(items);
        info!("Applied list with {} items", self.pool.len());
        Ok(self.pool.len())
    }

    /// Replace the pool with the classic 75-ball preset.
    pub fn apply_preset(&mut self) -> Result<usize, SpinError> {
        self.apply_list(&preset::classic_preset_text())
    }

    /// Restore the pool from the last applied raw text and clear the session.
    pub fn reset(&mut self) -> usize {
        let items = parse_list(&self.raw_text);
        self.install(items);
        info!("Reset wheel to {} items", self.pool.len());
        self.pool.len()
    }

    fn install(&mut self, items: Vec<String>) {
        if let Some(pending) = self.pending.take() {
            debug!(
                "Discarding pending spin #{} ({}) on pool replacement",
                pending.spin_number, pending.label
            );
        }
        self.pool = Pool::new(items);
        self.history.clear();
        self.rotation = 0.0;
        self.spin_count = 0;
        self.generation += 1;
    }

    // -- Spin life cycle --

    /// Start a spin: pick an item, plan the rotation and enter `Spinning`.
    ///
    /// Fails without touching any state when the pool is empty or a spin is
    /// already in progress.
    pub fn request_spin(&mut self) -> Result<SpinTicket, SpinError> {
        if self.pending.is_some() {
            return Err(SpinError::AlreadySpinning);
        }

        let len = self.pool.len();
        let index = selector::pick(self.rng.as_mut(), len)?;
        let plan = planner::plan_spin(
            self.rng.as_mut(),
            index,
            len,
            self.rotation,
            self.settings.revolutions,
        )?;
        let label = self
            .pool
            .get(index)
            .ok_or(SpinError::IndexOutOfRange { index, len })?
            .to_string();

        // Commit: nothing below can fail.
        self.generation += 1;
        self.spin_count += 1;
        let start_rotation = self.rotation;
        self.rotation = plan.target;
        self.pending = Some(PendingSpin {
            generation: self.generation,
            index,
            label: label.clone(),
            spin_number: self.spin_count,
        });

        info!(
            "Spin #{} accepted: index {} ({}) -> rotation {:.3} ({} extra turns)",
            self.spin_count, index, label, plan.target, plan.extra_revolutions
        );

        Ok(SpinTicket {
            generation: self.generation,
            index,
            label,
            spin_number: self.spin_count,
            start_rotation,
            target_rotation: plan.target,
            extra_revolutions: plan.extra_revolutions,
            duration: self.settings.spin_duration,
        })
    }

    /// Apply the post-spin effects for the spin identified by `generation`.
    ///
    /// Returns `None` for stale or unknown generations (for example a settle
    /// that raced a reset); such calls change nothing.
    pub fn complete_spin(&mut self, generation: u64) -> Option<SpinOutcome> {
        match &self.pending {
            Some(pending) if pending.generation == generation => {}
            Some(pending) => {
                debug!(
                    "Discarding stale settle (gen {}, pending gen {})",
                    generation, pending.generation
                );
                return None;
            }
            None => {
                debug!("Discarding settle for gen {} with no spin pending", generation);
                return None;
            }
        }
        let pending = self.pending.take()?;

        self.history.prepend(pending.label.clone(), pending.spin_number);

        let removed = if self.settings.remove_after_pick {
            match self.pool.remove_at(pending.index) {
                Ok(_) => true,
                Err(e) => {
                    warn!("Failed to remove picked item {}: {}", pending.label, e);
                    false
                }
            }
        } else {
            false
        };

        info!(
            "Spin #{} settled on {}{}",
            pending.spin_number,
            pending.label,
            if removed { " (removed from pool)" } else { "" }
        );

        Some(SpinOutcome {
            label: pending.label,
            index: pending.index,
            spin_number: pending.spin_number,
            removed,
            announce: self.settings.auto_speak,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::planner::{center_angle, normalize};
    use crate::selector::StdRandom;

    /// Replays scripted indices; revolutions always the range minimum.
    struct Scripted {
        indices: VecDeque<usize>,
    }

    impl RandomSource for Scripted {
        fn index_below(&mut self, n: usize) -> usize {
            self.indices.pop_front().unwrap_or(0) % n
        }
        fn revolutions(&mut self, min: u32, _max: u32) -> u32 {
            min
        }
    }

    fn scripted(indices: &[usize]) -> Box<dyn RandomSource> {
        Box::new(Scripted {
            indices: indices.iter().copied().collect(),
        })
    }

    fn settings(remove_after_pick: bool) -> EngineSettings {
        EngineSettings {
            spin_duration: Duration::from_millis(4000),
            revolutions: RevolutionRange { min: 6, max: 9 },
            remove_after_pick,
            auto_speak: true,
        }
    }

    fn engine(raw: &str, indices: &[usize], remove_after_pick: bool) -> SpinEngine {
        SpinEngine::new(raw, settings(remove_after_pick), scripted(indices))
    }

    #[test]
    fn new_engine_is_idle_and_zeroed() {
        let e = engine("A\nB\nC", &[], false);
        assert_eq!(e.state(), SpinState::Idle);
        assert_eq!(e.items().len(), 3);
        assert_eq!(e.spin_count(), 0);
        assert_eq!(e.rotation(), 0.0);
        assert!(e.latest().is_none());
    }

    #[test]
    fn request_spin_enters_spinning_and_counts() {
        let mut e = engine("A\nB", &[1], false);
        let ticket = e.request_spin().unwrap();
        assert_eq!(e.state(), SpinState::Spinning);
        assert_eq!(e.spin_count(), 1);
        assert_eq!(ticket.index, 1);
        assert_eq!(ticket.label, "B");
        assert_eq!(ticket.spin_number, 1);
        assert_eq!(ticket.start_rotation, 0.0);
        assert_eq!(ticket.duration, Duration::from_millis(4000));
        assert!((ticket.target_rotation - (6.0 * 360.0 + 90.0)).abs() < 1e-6);
        assert_eq!(e.rotation(), ticket.target_rotation);
        // History is only updated on settle.
        assert!(e.latest().is_none());
    }

    #[test]
    fn request_spin_on_empty_pool_is_a_no_op() {
        let mut e = engine("", &[0], false);
        let before_gen = e.generation();
        assert_eq!(e.request_spin(), Err(SpinError::EmptyPool));
        assert_eq!(e.state(), SpinState::Idle);
        assert_eq!(e.spin_count(), 0);
        assert_eq!(e.rotation(), 0.0);
        assert_eq!(e.generation(), before_gen);
    }

    #[test]
    fn invalid_revolution_range_rejects_spin_without_side_effects() {
        for (min, max) in [(0, 0), (9, 6)] {
            let settings = EngineSettings {
                revolutions: RevolutionRange { min, max },
                ..settings(false)
            };
            let mut e = SpinEngine::new("A\nB\nC\nD", settings, scripted(&[0]));
            assert_eq!(
                e.request_spin(),
                Err(SpinError::InvalidRevolutions { min, max })
            );
            assert_eq!(e.state(), SpinState::Idle);
            assert_eq!(e.spin_count(), 0);
            assert_eq!(e.rotation(), 0.0);
            assert_eq!(e.generation(), 0);
        }
    }

    #[test]
    fn reentrant_spin_is_rejected_without_side_effects() {
        let mut e = engine("A\nB\nC", &[0, 2], false);
        let first = e.request_spin().unwrap();
        let rotation = e.rotation();
        let count = e.spin_count();
        let gen = e.generation();

        assert_eq!(e.request_spin(), Err(SpinError::AlreadySpinning));
        assert_eq!(e.state(), SpinState::Spinning);
        assert_eq!(e.rotation(), rotation);
        assert_eq!(e.spin_count(), count);
        assert_eq!(e.generation(), gen);
        assert!(e.history().is_empty());

        // The original spin still settles normally.
        let outcome = e.complete_spin(first.generation).unwrap();
        assert_eq!(outcome.label, "A");
    }

    #[test]
    fn complete_spin_records_history_and_returns_to_idle() {
        let mut e = engine("A\nB\nC", &[2], false);
        let ticket = e.request_spin().unwrap();
        let outcome = e.complete_spin(ticket.generation).unwrap();

        assert_eq!(e.state(), SpinState::Idle);
        assert_eq!(outcome.label, "C");
        assert_eq!(outcome.index, 2);
        assert_eq!(outcome.spin_number, 1);
        assert!(!outcome.removed);
        assert!(outcome.announce);
        assert_eq!(e.latest().unwrap().label, "C");
        assert_eq!(e.latest().unwrap().ordinal, 1);
        assert_eq!(e.items().len(), 3);
    }

    #[test]
    fn complete_spin_applies_only_once() {
        let mut e = engine("A\nB", &[0], false);
        let ticket = e.request_spin().unwrap();
        assert!(e.complete_spin(ticket.generation).is_some());
        assert!(e.complete_spin(ticket.generation).is_none());
        assert_eq!(e.history().len(), 1);
    }

    #[test]
    fn remove_after_pick_removes_the_reported_item() {
        let mut e = engine("X\nY\nZ", &[1], true);
        let ticket = e.request_spin().unwrap();
        let outcome = e.complete_spin(ticket.generation).unwrap();

        assert!(outcome.removed);
        assert_eq!(outcome.label, "Y");
        assert_eq!(e.items(), &["X".to_string(), "Z".to_string()]);
        assert_eq!(e.latest().unwrap().label, "Y");
    }

    #[test]
    fn removing_every_item_leaves_an_unspinnable_pool() {
        let mut e = engine("only", &[0, 0], true);
        let ticket = e.request_spin().unwrap();
        e.complete_spin(ticket.generation).unwrap();
        assert!(e.items().is_empty());
        assert_eq!(e.slice_angle(), None);
        assert_eq!(e.request_spin(), Err(SpinError::EmptyPool));
    }

    #[test]
    fn auto_speak_flag_flows_into_outcome() {
        let mut e = engine("A", &[0], false);
        e.set_auto_speak(false);
        let ticket = e.request_spin().unwrap();
        assert!(!e.complete_spin(ticket.generation).unwrap().announce);
    }

    #[test]
    fn settled_rotation_points_at_selected_item() {
        let mut e = engine("A\nB\nC\nD\nE", &[3, 0, 4, 4, 1], false);
        for _ in 0..5 {
            let ticket = e.request_spin().unwrap();
            let slice = e.slice_angle().unwrap();
            let expected = normalize(360.0 - center_angle(ticket.index, slice));
            assert!((normalize(ticket.target_rotation) - expected).abs() < 1e-6);
            assert!(ticket.target_rotation > ticket.start_rotation);
            e.complete_spin(ticket.generation).unwrap();
            assert_eq!(e.item_at_pointer(), Some(ticket.index));
        }
        assert_eq!(e.spin_count(), 5);
        let labels: Vec<_> = e.history().iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "E", "E", "A", "D"]);
    }

    #[test]
    fn rotation_never_decreases_across_spins() {
        let mut e = SpinEngine::new("A\nB\nC\nD", settings(false), Box::new(StdRandom::seeded(5)));
        let mut last = e.rotation();
        for _ in 0..500 {
            let ticket = e.request_spin().unwrap();
            assert!(ticket.target_rotation > last);
            last = ticket.target_rotation;
            e.complete_spin(ticket.generation).unwrap();
        }
    }

    #[test]
    fn apply_list_replaces_pool_and_clears_session() {
        let mut e = engine("A\nB", &[0], false);
        let ticket = e.request_spin().unwrap();
        e.complete_spin(ticket.generation).unwrap();

        let n = e.apply_list(" one \n\n two\nthree ").unwrap();
        assert_eq!(n, 3);
        assert_eq!(e.items(), &["one".to_string(), "two".to_string(), "three".to_string()]);
        assert!(e.history().is_empty());
        assert_eq!(e.rotation(), 0.0);
        assert_eq!(e.spin_count(), 0);
        assert_eq!(e.state(), SpinState::Idle);
        assert_eq!(e.raw_text(), " one \n\n two\nthree ");
    }

    #[test]
    fn apply_empty_list_is_rejected_and_state_kept() {
        let mut e = engine("A\nB", &[1], false);
        let ticket = e.request_spin().unwrap();
        e.complete_spin(ticket.generation).unwrap();
        let rotation = e.rotation();

        assert_eq!(e.apply_list("  \n\t\n"), Err(SpinError::EmptyPool));
        assert_eq!(e.items().len(), 2);
        assert_eq!(e.history().len(), 1);
        assert_eq!(e.rotation(), rotation);
        assert_eq!(e.spin_count(), 1);
        assert_eq!(e.raw_text(), "A\nB");
    }

    #[test]
    fn reset_restores_last_applied_list() {
        let mut e = engine("X\nY\nZ", &[0, 0], true);
        for _ in 0..2 {
            let ticket = e.request_spin().unwrap();
            e.complete_spin(ticket.generation).unwrap();
        }
        assert_eq!(e.items(), &["Z".to_string()]);

        assert_eq!(e.reset(), 3);
        assert_eq!(e.items(), &["X".to_string(), "Y".to_string(), "Z".to_string()]);
        assert!(e.history().is_empty());
        assert_eq!(e.rotation(), 0.0);
        assert_eq!(e.spin_count(), 0);
    }

    #[test]
    fn reset_during_spin_discards_pending_settle() {
        let mut e = engine("X\nY\nZ", &[1], true);
        let ticket = e.request_spin().unwrap();
        e.reset();

        assert_eq!(e.state(), SpinState::Idle);
        assert!(e.complete_spin(ticket.generation).is_none());
        assert_eq!(e.items().len(), 3, "stale settle must not remove from the new pool");
        assert!(e.history().is_empty());
    }

    #[test]
    fn apply_during_spin_discards_pending_settle() {
        let mut e = engine("X\nY", &[0], false);
        let ticket = e.request_spin().unwrap();
        e.apply_list("P\nQ").unwrap();
        assert!(e.complete_spin(ticket.generation).is_none());
        assert!(e.history().is_empty());
    }

    #[test]
    fn apply_preset_loads_75_items_and_resets_to_them() {
        let mut e = engine("A", &[], false);
        assert_eq!(e.apply_preset().unwrap(), 75);
        assert_eq!(e.items()[0], "B1");
        assert_eq!(e.items()[74], "O75");
        e.set_remove_after_pick(true);
        let ticket = e.request_spin().unwrap();
        e.complete_spin(ticket.generation).unwrap();
        assert_eq!(e.items().len(), 74);
        assert_eq!(e.reset(), 75);
    }

    #[test]
    fn unknown_generation_is_ignored_while_spinning() {
        let mut e = engine("A\nB", &[0], false);
        let ticket = e.request_spin().unwrap();
        assert!(e.complete_spin(ticket.generation + 7).is_none());
        assert!(e.is_spinning());
        assert!(e.complete_spin(ticket.generation).is_some());
    }
}
