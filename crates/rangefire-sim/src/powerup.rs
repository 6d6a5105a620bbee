//! Timed global modifiers. At most one is active at a time.

use tracing::debug;

use rangefire_core::constants::{POWERUP_DURATION_MS, SLOWMO_FACTOR};
use rangefire_core::enums::PowerupKind;
use rangefire_core::events::GameEvent;
use rangefire_core::state::PowerupView;

use crate::targets::TargetRegistry;
use crate::timers::{TimerKey, Timers};

#[derive(Debug, Clone, Default)]
pub struct PowerupController {
    active: Option<PowerupKind>,
}

impl PowerupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<PowerupKind> {
        self.active
    }

    pub fn infinite_ammo(&self) -> bool {
        self.active == Some(PowerupKind::InfiniteAmmo)
    }

    pub fn double_points(&self) -> bool {
        self.active == Some(PowerupKind::DoublePoints)
    }

    pub fn slowmo(&self) -> bool {
        self.active == Some(PowerupKind::SlowMo)
    }

    /// Multiplier applied to target speeds, including fresh spawns.
    pub fn speed_factor(&self) -> f64 {
        if self.slowmo() {
            SLOWMO_FACTOR
        } else {
            1.0
        }
    }

    /// Replace whatever is active with `kind` for the full duration.
    pub fn activate(
        &mut self,
        kind: PowerupKind,
        targets: &mut TargetRegistry,
        timers: &mut Timers,
        events: &mut Vec<GameEvent>,
    ) {
        timers.cancel(TimerKey::PowerupExpiry);
        self.deactivate(targets, events);

        if kind == PowerupKind::SlowMo {
            targets.apply_speed_factor(SLOWMO_FACTOR);
        }
        self.active = Some(kind);
        timers.schedule(TimerKey::PowerupExpiry, POWERUP_DURATION_MS);

        debug!(?kind, "powerup activated");
        events.push(GameEvent::PowerupActivated { kind });
    }

    /// Clear the active effect. Slow-mo is undone by restoring baselines,
    /// never by dividing out the factor.
    pub fn deactivate(&mut self, targets: &mut TargetRegistry, events: &mut Vec<GameEvent>) {
        targets.restore_baseline_speeds();
        if let Some(kind) = self.active.take() {
            debug!(?kind, "powerup deactivated");
            events.push(GameEvent::PowerupDeactivated { kind });
        }
    }

    /// Expiry timer body. A no-op when nothing is active.
    pub fn expire(&mut self, targets: &mut TargetRegistry, events: &mut Vec<GameEvent>) {
        if self.active.is_none() {
            debug!("stale powerup expiry ignored");
            return;
        }
        self.deactivate(targets, events);
    }

    pub fn view(&self, timers: &Timers) -> PowerupView {
        PowerupView {
            active: self.active,
            remaining_ms: timers.remaining(TimerKey::PowerupExpiry).unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::world_setup::TargetSpeeds;

    use super::*;

    fn setup() -> (PowerupController, TargetRegistry, Timers, Vec<GameEvent>) {
        let mut targets = TargetRegistry::new(
            TargetSpeeds {
                lateral: 0.48,
                forward: 0.72,
            },
            1.2,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..4 {
            targets.spawn(&mut rng, true, 1.0);
        }
        (PowerupController::new(), targets, Timers::new(), Vec::new())
    }

    #[test]
    fn test_activation_replaces_previous() {
        let (mut pc, mut targets, mut timers, mut events) = setup();
        pc.activate(PowerupKind::SlowMo, &mut targets, &mut timers, &mut events);
        timers.advance(3000.0);
        pc.activate(PowerupKind::DoublePoints, &mut targets, &mut timers, &mut events);

        assert_eq!(pc.active(), Some(PowerupKind::DoublePoints));
        assert!(!pc.slowmo());
        assert_eq!(timers.remaining(TimerKey::PowerupExpiry), Some(POWERUP_DURATION_MS));
        for view in targets.views() {
            let m = targets.motion(view.id).unwrap();
            assert_eq!(m.side_speed, m.base_side_speed, "slow-mo cleared first");
        }
        assert_eq!(
            events,
            vec![
                GameEvent::PowerupActivated {
                    kind: PowerupKind::SlowMo
                },
                GameEvent::PowerupDeactivated {
                    kind: PowerupKind::SlowMo
                },
                GameEvent::PowerupActivated {
                    kind: PowerupKind::DoublePoints
                },
            ]
        );
    }

    #[test]
    fn test_slowmo_round_trip_restores_exact_speeds() {
        let (mut pc, mut targets, mut timers, mut events) = setup();
        let ids: Vec<u32> = targets.views().iter().map(|v| v.id).collect();
        let before: Vec<_> = ids.iter().map(|id| targets.motion(*id).unwrap()).collect();

        pc.activate(PowerupKind::SlowMo, &mut targets, &mut timers, &mut events);
        for id in &ids {
            let m = targets.motion(*id).unwrap();
            assert_eq!(m.forward_speed, m.base_forward_speed * SLOWMO_FACTOR);
        }
        assert_eq!(pc.speed_factor(), SLOWMO_FACTOR);

        assert_eq!(timers.advance(POWERUP_DURATION_MS), vec![TimerKey::PowerupExpiry]);
        pc.expire(&mut targets, &mut events);

        let after: Vec<_> = ids.iter().map(|id| targets.motion(*id).unwrap()).collect();
        assert_eq!(before, after);
        assert_eq!(pc.active(), None);
    }

    #[test]
    fn test_deactivate_clears_any_kind() {
        let (mut pc, mut targets, mut timers, mut events) = setup();
        pc.activate(PowerupKind::InfiniteAmmo, &mut targets, &mut timers, &mut events);
        pc.deactivate(&mut targets, &mut events);
        assert!(!pc.infinite_ammo());
        assert_eq!(
            events.last(),
            Some(&GameEvent::PowerupDeactivated {
                kind: PowerupKind::InfiniteAmmo
            })
        );
    }

    #[test]
    fn test_stale_expiry_is_noop() {
        let (mut pc, mut targets, _, mut events) = setup();
        pc.expire(&mut targets, &mut events);
        assert!(events.is_empty());
    }
}
