//! Firing / reload / zoom state machine for the equipped weapon.
//!
//! Cooldown and reload are independent axes: `can_fire` is cleared for the
//! fire-rate interval after every shot, `is_reloading` spans a reload. The
//! zoom flag is orthogonal to both and only legal on the sniper.

use rand::Rng;

use rangefire_core::constants::*;
use rangefire_core::enums::{DenyReason, WeaponStatus, WeaponType};
use rangefire_core::state::WeaponView;
use rangefire_core::weapons::WeaponSpec;

use crate::timers::{TimerKey, Timers};

/// Result of a fire attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A shot left the barrel; resolve `pellets` hit tests.
    Fired { pellets: u32, ran_dry: bool },
    /// Empty magazine.
    DryFire,
    Denied(DenyReason),
}

/// Result of a reload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Reload in flight. `unzoomed` is set when it cancelled the scope.
    Started { unzoomed: bool },
    Denied(DenyReason),
}

/// Mutable state of the equipped weapon for one match.
#[derive(Debug, Clone)]
pub struct WeaponState {
    current: WeaponType,
    ammo: u32,
    can_fire: bool,
    is_reloading: bool,
    is_zoomed: bool,
    trigger_held: bool,
    recoil_pitch: f64,
    recoil_yaw: f64,
    /// Bumped on every reload start and every switch; a reload timer only
    /// applies if its generation is still current.
    reload_generation: u32,
    reload_weapon: WeaponType,
}

impl WeaponState {
    pub fn new(weapon: WeaponType, spec: &WeaponSpec) -> Self {
        Self {
            current: weapon,
            ammo: spec.max_ammo,
            can_fire: true,
            is_reloading: false,
            is_zoomed: false,
            trigger_held: false,
            recoil_pitch: 0.0,
            recoil_yaw: 0.0,
            reload_generation: 0,
            reload_weapon: weapon,
        }
    }

    pub fn current(&self) -> WeaponType {
        self.current
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn can_fire(&self) -> bool {
        self.can_fire
    }

    pub fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    pub fn is_zoomed(&self) -> bool {
        self.is_zoomed
    }

    pub fn trigger_held(&self) -> bool {
        self.trigger_held
    }

    /// Accumulated (pitch, yaw) kick.
    pub fn recoil(&self) -> (f64, f64) {
        (self.recoil_pitch, self.recoil_yaw)
    }

    pub fn status(&self) -> WeaponStatus {
        if self.is_reloading {
            WeaponStatus::Reloading
        } else if !self.can_fire {
            WeaponStatus::Cooldown
        } else {
            WeaponStatus::Ready
        }
    }

    /// Whether a fire attempt right now would succeed.
    pub fn ready_to_fire(&self, infinite_ammo: bool) -> bool {
        self.can_fire && !self.is_reloading && (self.ammo > 0 || infinite_ammo)
    }

    pub fn set_trigger(&mut self, held: bool) {
        self.trigger_held = held;
    }

    /// Pull the trigger once.
    pub fn fire(
        &mut self,
        spec: &WeaponSpec,
        infinite_ammo: bool,
        timers: &mut Timers,
        rng: &mut impl Rng,
    ) -> FireOutcome {
        if self.is_reloading {
            return FireOutcome::Denied(DenyReason::Reloading);
        }
        if self.ammo == 0 && !infinite_ammo {
            return FireOutcome::DryFire;
        }
        if !self.can_fire {
            return FireOutcome::Denied(DenyReason::Cooldown);
        }

        if !infinite_ammo {
            self.ammo -= 1;
        }

        if spec.fire_rate_ms > 0 {
            self.can_fire = false;
            timers.schedule(TimerKey::FireCooldown, spec.fire_rate_ms as f64);
        }

        self.recoil_pitch -= spec.recoil * (RECOIL_PITCH_MIN + rng.gen::<f64>() * RECOIL_PITCH_JITTER);
        self.recoil_yaw += (rng.gen::<f64>() - 0.5) * spec.recoil * RECOIL_YAW_SCALE;

        let ran_dry = self.ammo == 0 && !infinite_ammo;
        if ran_dry {
            timers.schedule(TimerKey::AutoReload, AUTO_RELOAD_GRACE_MS);
        }

        FireOutcome::Fired {
            pellets: spec.pellet_count.max(1),
            ran_dry,
        }
    }

    /// Fire-rate interval elapsed.
    pub fn cooldown_elapsed(&mut self) {
        self.can_fire = true;
    }

    /// Start a reload. Cancels zoom and any pending auto-reload.
    pub fn reload(&mut self, spec: &WeaponSpec, timers: &mut Timers) -> ReloadOutcome {
        if self.is_reloading {
            return ReloadOutcome::Denied(DenyReason::Reloading);
        }
        if self.ammo >= spec.max_ammo {
            return ReloadOutcome::Denied(DenyReason::MagazineFull);
        }

        let unzoomed = self.unzoom();
        self.is_reloading = true;
        self.reload_generation = self.reload_generation.wrapping_add(1);
        self.reload_weapon = self.current;
        timers.cancel(TimerKey::AutoReload);
        timers.schedule(
            TimerKey::Reload {
                generation: self.reload_generation,
            },
            spec.reload_time_ms as f64,
        );

        ReloadOutcome::Started { unzoomed }
    }

    /// Reload timer body. Applies only if this is still the active reload of
    /// the same weapon; returns whether the magazine was refilled.
    pub fn complete_reload(&mut self, generation: u32, spec: &WeaponSpec) -> bool {
        if !self.is_reloading
            || generation != self.reload_generation
            || self.reload_weapon != self.current
        {
            return false;
        }
        self.ammo = spec.max_ammo;
        self.is_reloading = false;
        true
    }

    /// Equip `weapon` with a full magazine. Cancels zoom, any reload in
    /// flight and the fire-rate cooldown. Returns whether zoom was cancelled.
    pub fn switch_to(&mut self, weapon: WeaponType, spec: &WeaponSpec, timers: &mut Timers) -> bool {
        let unzoomed = self.unzoom();

        self.is_reloading = false;
        self.reload_generation = self.reload_generation.wrapping_add(1);
        timers.cancel_where(|k| {
            matches!(
                k,
                TimerKey::Reload { .. } | TimerKey::AutoReload | TimerKey::FireCooldown
            )
        });

        self.current = weapon;
        self.ammo = spec.max_ammo;
        self.can_fire = true;
        unzoomed
    }

    /// Scope in or out. Returns the new zoom state.
    pub fn toggle_zoom(&mut self) -> Result<bool, DenyReason> {
        if self.current != WeaponType::Sniper {
            return Err(DenyReason::NotScoped);
        }
        if self.is_reloading {
            return Err(DenyReason::Reloading);
        }
        self.is_zoomed = !self.is_zoomed;
        Ok(self.is_zoomed)
    }

    /// Drop the scope. Returns whether it was up.
    pub fn unzoom(&mut self) -> bool {
        std::mem::replace(&mut self.is_zoomed, false)
    }

    /// Per-tick recoil recovery: geometric decay toward zero.
    pub fn update(&mut self, spec: &WeaponSpec) {
        self.recoil_pitch *= spec.recoil_recovery;
        self.recoil_yaw *= spec.recoil_recovery;
    }

    pub fn view(&self, spec: &WeaponSpec) -> WeaponView {
        WeaponView {
            weapon: self.current,
            ammo: self.ammo,
            max_ammo: spec.max_ammo,
            status: self.status(),
            is_zoomed: self.is_zoomed,
            trigger_held: self.trigger_held,
            recoil_pitch: self.recoil_pitch,
            recoil_yaw: self.recoil_yaw,
        }
    }
}
