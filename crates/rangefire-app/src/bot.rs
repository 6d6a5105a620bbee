//! Scripted player used by the headless runner.
//!
//! Reacts to the previous snapshot the way a human would react to the
//! screen: pick the closest scoring target, wait a moment, pull the trigger.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use rangefire_core::commands::PlayerCommand;
use rangefire_core::enums::{MatchPhase, TargetKind, WeaponStatus, WeaponType};
use rangefire_core::state::{MatchSnapshot, TargetView};
use rangefire_sim::query::SphereCaster;

/// Ticks spent on one weapon before switching.
const TICKS_PER_WEAPON: u32 = 600;

/// Reaction delay between shots, in ticks.
const REACTION_TICKS: std::ops::RangeInclusive<u32> = 6..=20;

/// Rifle burst length, in ticks.
const BURST_TICKS: std::ops::RangeInclusive<u32> = 5..=15;

pub struct Bot {
    rng: ChaCha8Rng,
    caster: SphereCaster,
    hesitation: u32,
    /// Remaining ticks of a held rifle burst.
    holding: Option<u32>,
    ticks_on_weapon: u32,
}

impl Bot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            caster: SphereCaster::default(),
            hesitation: 0,
            holding: None,
            ticks_on_weapon: 0,
        }
    }

    /// Hit query aimed wherever the bot last looked.
    pub fn caster_mut(&mut self) -> &mut SphereCaster {
        &mut self.caster
    }

    /// Intents for the next tick, given the last snapshot seen.
    pub fn plan(&mut self, last: Option<&MatchSnapshot>) -> Vec<PlayerCommand> {
        let Some(snapshot) = last else {
            return vec![PlayerCommand::StartMatch];
        };
        match snapshot.phase {
            MatchPhase::Setup => vec![PlayerCommand::StartMatch],
            MatchPhase::Running => self.plan_running(snapshot),
            MatchPhase::Paused | MatchPhase::GameOver => Vec::new(),
        }
    }

    fn plan_running(&mut self, snapshot: &MatchSnapshot) -> Vec<PlayerCommand> {
        let mut commands = Vec::new();
        let weapon = &snapshot.weapon;

        if let Some(left) = self.holding {
            if left == 0 || weapon.ammo == 0 {
                commands.push(PlayerCommand::FireStop);
                self.holding = None;
            } else {
                self.holding = Some(left - 1);
            }
        }

        self.ticks_on_weapon += 1;
        if self.ticks_on_weapon >= TICKS_PER_WEAPON && self.holding.is_none() {
            self.ticks_on_weapon = 0;
            let next = self.pick_other_weapon(weapon.weapon);
            commands.push(PlayerCommand::SwitchWeapon { weapon: next });
            return commands;
        }

        if weapon.status == WeaponStatus::Reloading {
            return commands;
        }
        if weapon.weapon == WeaponType::Sniper && !weapon.is_zoomed {
            commands.push(PlayerCommand::ToggleZoom);
        }
        if weapon.ammo == 0 {
            commands.push(PlayerCommand::Reload);
            return commands;
        }

        let Some(target) = nearest_scoring_target(&snapshot.targets) else {
            return commands;
        };
        self.caster.aim_at(target.position.to_dvec3());

        if self.hesitation > 0 {
            self.hesitation -= 1;
            return commands;
        }
        if weapon.status == WeaponStatus::Ready && !weapon.trigger_held && self.holding.is_none() {
            commands.push(PlayerCommand::FireStart);
            if weapon.weapon == WeaponType::Rifle {
                self.holding = Some(self.rng.gen_range(BURST_TICKS));
            } else {
                commands.push(PlayerCommand::FireStop);
            }
            self.hesitation = self.rng.gen_range(REACTION_TICKS);
        }
        commands
    }

    /// Press a number-row slot other than the current weapon's.
    fn pick_other_weapon(&mut self, current: WeaponType) -> WeaponType {
        let slots = WeaponType::ALL.len();
        let offset = self.rng.gen_range(1..slots);
        let slot = (current.index() + offset) % slots + 1;
        WeaponType::from_slot(slot as u8).unwrap_or(current)
    }
}

/// Closest target to the player that is worth shooting.
fn nearest_scoring_target(targets: &[TargetView]) -> Option<&TargetView> {
    targets
        .iter()
        .filter(|t| t.kind != TargetKind::Penalty)
        .max_by(|a, b| a.position.z.total_cmp(&b.position.z))
}
