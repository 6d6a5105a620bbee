//! Live target collection backed by a hecs world.
//!
//! Every removal (destroy or escape) schedules exactly one `Respawn` timer,
//! which keeps the live count constant once the initial wave is in.

use hecs::{Entity, World};
use rand::Rng;

use rangefire_core::components::{Motion, Target};
use rangefire_core::constants::RESPAWN_DELAY_MS;
use rangefire_core::enums::TargetKind;
use rangefire_core::state::TargetView;

use crate::systems;
use crate::systems::cleanup::Escape;
use crate::timers::{TimerKey, Timers};
use crate::world_setup::{self, TargetSpeeds};

pub struct TargetRegistry {
    world: World,
    speeds: TargetSpeeds,
    target_size: f64,
    next_id: u32,
    next_respawn_seq: u64,
    despawn_buffer: Vec<Entity>,
}

impl TargetRegistry {
    pub fn new(speeds: TargetSpeeds, target_size: f64) -> Self {
        Self {
            world: World::new(),
            speeds,
            target_size,
            next_id: 0,
            next_respawn_seq: 0,
            despawn_buffer: Vec::new(),
        }
    }

    /// Spawn a target of a randomly drawn type. Powerup targets are not
    /// drawn while `powerup_active`. `speed_factor` is 0.5 under slow-mo.
    pub fn spawn(
        &mut self,
        rng: &mut impl Rng,
        powerup_active: bool,
        speed_factor: f64,
    ) -> (u32, TargetKind) {
        let kind = world_setup::roll_target_kind(rng, powerup_active);
        let id = self.spawn_kind(rng, kind, speed_factor);
        (id, kind)
    }

    /// Spawn a target of a fixed type at a random position.
    pub fn spawn_kind(&mut self, rng: &mut impl Rng, kind: TargetKind, speed_factor: f64) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        world_setup::spawn_target(&mut self.world, rng, id, kind, self.speeds, speed_factor);
        id
    }

    /// Move every target and remove the ones that escaped. Each escape
    /// schedules a replacement after `respawn_delay_ms`.
    pub fn update(
        &mut self,
        elapsed_secs: f64,
        dt: f64,
        timers: &mut Timers,
        respawn_delay_ms: f64,
    ) -> Vec<Escape> {
        systems::movement::run(&mut self.world, elapsed_secs, dt);
        let escapes = systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        for _ in &escapes {
            self.schedule_respawn(timers, respawn_delay_ms);
        }
        escapes
    }

    /// Remove a target and schedule its replacement. Returns its type, or
    /// `None` if it was already gone.
    pub fn destroy(&mut self, id: u32, timers: &mut Timers) -> Option<TargetKind> {
        let entity = self.find(id)?;
        let kind = self.world.get::<&Target>(entity).ok()?.kind;
        let _ = self.world.despawn(entity);
        self.schedule_respawn(timers, RESPAWN_DELAY_MS);
        Some(kind)
    }

    /// Subtract `damage` from a target's health. Returns the remaining
    /// health; the caller destroys the target when it drops to zero.
    pub fn apply_damage(&mut self, id: u32, damage: i32) -> Option<i32> {
        let entity = self.find(id)?;
        let mut target = self.world.get::<&mut Target>(entity).ok()?;
        target.health -= damage;
        Some(target.health)
    }

    pub fn kind_of(&self, id: u32) -> Option<TargetKind> {
        let entity = self.find(id)?;
        self.world.get::<&Target>(entity).ok().map(|t| t.kind)
    }

    pub fn motion(&self, id: u32) -> Option<Motion> {
        let entity = self.find(id)?;
        self.world.get::<&Motion>(entity).ok().map(|m| *m)
    }

    /// Set every live target's speed to `factor` times its baseline.
    pub fn apply_speed_factor(&mut self, factor: f64) {
        for (_entity, motion) in self.world.query_mut::<&mut Motion>() {
            motion.side_speed = motion.base_side_speed * factor;
            motion.forward_speed = motion.base_forward_speed * factor;
        }
    }

    /// Restore every live target's speed to exactly its baseline.
    pub fn restore_baseline_speeds(&mut self) {
        for (_entity, motion) in self.world.query_mut::<&mut Motion>() {
            motion.side_speed = motion.base_side_speed;
            motion.forward_speed = motion.base_forward_speed;
        }
    }

    pub fn views(&self) -> Vec<TargetView> {
        systems::snapshot::build_targets(&self.world, self.target_size)
    }

    pub fn target_size(&self) -> f64 {
        self.target_size
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    /// Move a target (test setup).
    #[cfg(test)]
    pub fn set_position(&mut self, id: u32, position: rangefire_core::types::Position) {
        if let Some(entity) = self.find(id) {
            if let Ok(mut pos) = self.world.get::<&mut rangefire_core::types::Position>(entity) {
                *pos = position;
            }
        }
    }

    fn schedule_respawn(&mut self, timers: &mut Timers, delay_ms: f64) {
        let seq = self.next_respawn_seq;
        self.next_respawn_seq += 1;
        timers.schedule(TimerKey::Respawn(seq), delay_ms);
    }

    fn find(&self, id: u32) -> Option<Entity> {
        self.world
            .query::<&Target>()
            .iter()
            .find(|(_, t)| t.id == id)
            .map(|(entity, _)| entity)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use rangefire_core::constants::ESCAPE_DEPTH;
    use rangefire_core::types::Position;

    use super::*;

    fn registry() -> (TargetRegistry, ChaCha8Rng, Timers) {
        let speeds = TargetSpeeds {
            lateral: 0.48,
            forward: 0.72,
        };
        (
            TargetRegistry::new(speeds, 1.2),
            ChaCha8Rng::seed_from_u64(11),
            Timers::new(),
        )
    }

    #[test]
    fn test_ids_are_unique() {
        let (mut reg, mut rng, _) = registry();
        let ids: Vec<u32> = (0..10).map(|_| reg.spawn(&mut rng, false, 1.0).0).collect();
        let mut dedup = ids.clone();
        dedup.dedup();
        assert_eq!(ids, dedup);
        assert_eq!(reg.len(), 10);
    }

    #[test]
    fn test_destroy_schedules_one_respawn() {
        let (mut reg, mut rng, mut timers) = registry();
        let id = reg.spawn_kind(&mut rng, TargetKind::Normal, 1.0);

        assert_eq!(reg.destroy(id, &mut timers), Some(TargetKind::Normal));
        assert!(reg.is_empty());
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.remaining(TimerKey::Respawn(0)), Some(RESPAWN_DELAY_MS));

        // Already gone: no second replacement.
        assert_eq!(reg.destroy(id, &mut timers), None);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_escape_removes_and_schedules_respawn() {
        let (mut reg, mut rng, mut timers) = registry();
        let runner = reg.spawn_kind(&mut rng, TargetKind::Heavy, 1.0);
        let stayer = reg.spawn_kind(&mut rng, TargetKind::Normal, 1.0);
        reg.set_position(runner, Position::new(0.0, 2.0, ESCAPE_DEPTH - 0.001));

        let escapes = reg.update(0.0, 1.0 / 60.0, &mut timers, 700.0);
        assert_eq!(
            escapes,
            vec![Escape {
                target_id: runner,
                kind: TargetKind::Heavy
            }]
        );
        assert_eq!(reg.kind_of(runner), None);
        assert_eq!(reg.kind_of(stayer), Some(TargetKind::Normal));
        assert_eq!(timers.remaining(TimerKey::Respawn(0)), Some(700.0));
    }

    #[test]
    fn test_damage_reduces_health() {
        let (mut reg, mut rng, _) = registry();
        let id = reg.spawn_kind(&mut rng, TargetKind::Heavy, 1.0);
        assert_eq!(reg.apply_damage(id, 8), Some(22));
        assert_eq!(reg.apply_damage(id, 8), Some(14));
        assert_eq!(reg.apply_damage(99, 8), None);
    }

    #[test]
    fn test_speed_factor_round_trip_is_exact() {
        let (mut reg, mut rng, _) = registry();
        let ids: Vec<u32> = (0..4).map(|_| reg.spawn(&mut rng, false, 1.0).0).collect();
        let before: Vec<Motion> = ids.iter().map(|id| reg.motion(*id).unwrap()).collect();

        reg.apply_speed_factor(0.5);
        reg.apply_speed_factor(0.5);
        for id in &ids {
            let m = reg.motion(*id).unwrap();
            assert_eq!(m.side_speed, m.base_side_speed * 0.5, "no compounding");
        }

        reg.restore_baseline_speeds();
        let after: Vec<Motion> = ids.iter().map(|id| reg.motion(*id).unwrap()).collect();
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.side_speed, a.side_speed);
            assert_eq!(b.forward_speed, a.forward_speed);
        }
    }

    #[test]
    fn test_views_sorted_and_coloured() {
        let (mut reg, mut rng, _) = registry();
        reg.spawn_kind(&mut rng, TargetKind::Penalty, 1.0);
        reg.spawn_kind(&mut rng, TargetKind::Normal, 1.0);
        let views = reg.views();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, 0);
        assert_eq!(views[0].color, 0xFF0000);
        assert_eq!(views[1].color, 0xFFFFFF);
        assert_eq!(views[1].size, 1.2);
    }
}
