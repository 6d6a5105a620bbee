//! Keyed, cancellable one-shot timers.
//!
//! Scheduling under a key that is already pending replaces the pending
//! timer, so every "supersede" site is a single `schedule` call. Timers only
//! advance when the engine advances them; a paused match simply stops
//! advancing, which suspends every timer with its remaining duration intact.

use serde::{Deserialize, Serialize};

/// Identifies both the timer and the handler the engine runs when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKey {
    /// Fire-rate interval after a shot.
    FireCooldown,
    /// Reload completion. The generation ties it to one specific reload.
    Reload { generation: u32 },
    /// Reload kicked off after the magazine runs dry.
    AutoReload,
    /// Resets the combo when no kill happens in time.
    ComboDecay,
    /// Ends the active powerup.
    PowerupExpiry,
    /// Replacement target spawn. Each removal gets its own sequence number.
    Respawn(u64),
    /// Match countdown, re-armed every second.
    CountdownSecond,
}

#[derive(Debug, Clone)]
struct Timer {
    key: TimerKey,
    remaining_ms: f64,
    seq: u64,
}

/// Pending timers for one match.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: Vec<Timer>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire after `delay_ms`, cancelling any pending timer
    /// with the same key.
    pub fn schedule(&mut self, key: TimerKey, delay_ms: f64) {
        self.cancel(key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Timer {
            key,
            remaining_ms: delay_ms.max(0.0),
            seq,
        });
    }

    /// Cancel a pending timer. Returns whether one was pending.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.key != key);
        self.pending.len() != before
    }

    /// Cancel every pending timer matching the predicate.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&TimerKey) -> bool) {
        self.pending.retain(|t| !predicate(&t.key));
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_scheduled(&self, key: TimerKey) -> bool {
        self.pending.iter().any(|t| t.key == key)
    }

    /// Remaining time of a pending timer.
    pub fn remaining(&self, key: TimerKey) -> Option<f64> {
        self.pending
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.remaining_ms)
    }

    /// Keys of every pending timer, in scheduling order.
    pub fn keys(&self) -> impl Iterator<Item = TimerKey> + '_ {
        self.pending.iter().map(|t| t.key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance all timers by `dt_ms` and remove the expired ones.
    ///
    /// Returned keys are ordered by expiry instant, ties broken by scheduling
    /// order.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<TimerKey> {
        let mut expired = Vec::new();
        self.pending.retain_mut(|t| {
            t.remaining_ms -= dt_ms;
            if t.remaining_ms <= 1e-9 {
                expired.push(t.clone());
                false
            } else {
                true
            }
        });
        expired.sort_by(|a, b| {
            a.remaining_ms
                .total_cmp(&b.remaining_ms)
                .then(a.seq.cmp(&b.seq))
        });
        expired.into_iter().map(|t| t.key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut timers = Timers::new();
        timers.schedule(TimerKey::ComboDecay, 100.0);
        assert!(timers.advance(60.0).is_empty());
        assert_eq!(timers.advance(40.0), vec![TimerKey::ComboDecay]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let mut timers = Timers::new();
        timers.schedule(TimerKey::ComboDecay, 100.0);
        timers.advance(90.0);
        timers.schedule(TimerKey::ComboDecay, 100.0);
        assert_eq!(timers.len(), 1);
        assert!(timers.advance(20.0).is_empty(), "old deadline must not fire");
        assert_eq!(timers.advance(80.0), vec![TimerKey::ComboDecay]);
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::new();
        timers.schedule(TimerKey::PowerupExpiry, 50.0);
        assert!(timers.cancel(TimerKey::PowerupExpiry));
        assert!(!timers.cancel(TimerKey::PowerupExpiry));
        assert!(timers.advance(100.0).is_empty());
    }

    #[test]
    fn test_expiry_order() {
        let mut timers = Timers::new();
        timers.schedule(TimerKey::Respawn(1), 30.0);
        timers.schedule(TimerKey::FireCooldown, 10.0);
        timers.schedule(TimerKey::Respawn(2), 10.0);
        let fired = timers.advance(50.0);
        assert_eq!(
            fired,
            vec![
                TimerKey::FireCooldown,
                TimerKey::Respawn(2),
                TimerKey::Respawn(1)
            ]
        );
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut timers = Timers::new();
        timers.schedule(TimerKey::AutoReload, 0.0);
        assert_eq!(timers.advance(0.0), vec![TimerKey::AutoReload]);
    }

    #[test]
    fn test_cancel_where() {
        let mut timers = Timers::new();
        timers.schedule(TimerKey::Reload { generation: 3 }, 100.0);
        timers.schedule(TimerKey::AutoReload, 100.0);
        timers.schedule(TimerKey::ComboDecay, 100.0);
        timers.cancel_where(|k| matches!(k, TimerKey::Reload { .. } | TimerKey::AutoReload));
        assert_eq!(timers.len(), 1);
        assert!(timers.is_scheduled(TimerKey::ComboDecay));
    }
}
