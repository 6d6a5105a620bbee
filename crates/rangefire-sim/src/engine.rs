//! Simulation engine: the gameplay loop of one shooting range.
//!
//! `SimulationEngine` owns every piece of match state, processes player
//! intents, dispatches expired timers, runs the target systems and produces
//! `MatchSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use rangefire_core::commands::PlayerCommand;
use rangefire_core::constants::{DEFAULT_LIVE_TARGETS, DT, DT_MS, ESCAPE_PENALTY_POINTS};
use rangefire_core::difficulty::DifficultySettings;
use rangefire_core::enums::{GameOverReason, MatchPhase, ScoringPolicy, TargetKind, WeaponType};
use rangefire_core::error::ConfigError;
use rangefire_core::events::GameEvent;
use rangefire_core::state::{MatchSnapshot, MatchSummary};
use rangefire_core::types::SimTime;
use rangefire_core::weapons::WeaponCatalog;

use crate::hit_resolver::{self, ShotContext};
use crate::powerup::PowerupController;
use crate::query::{HitQuery, PelletRay};
use crate::session::MatchSession;
use crate::systems;
use crate::targets::TargetRegistry;
use crate::timers::{TimerKey, Timers};
use crate::weapon::{FireOutcome, ReloadOutcome, WeaponState};
use crate::world_setup::TargetSpeeds;

/// Configuration for starting a new match.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// RNG seed for determinism. Same seed = same match.
    pub seed: u64,
    pub difficulty: DifficultySettings,
    pub scoring: ScoringPolicy,
    /// Targets kept alive in the arena.
    pub live_targets: usize,
    pub weapons: WeaponCatalog,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: DifficultySettings::default(),
            scoring: ScoringPolicy::default(),
            live_targets: DEFAULT_LIVE_TARGETS,
            weapons: WeaponCatalog::standard(),
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.difficulty.validate()?;
        self.weapons.validate()
    }
}

/// The simulation engine. Owns all match state.
pub struct SimulationEngine {
    config: MatchConfig,
    time: SimTime,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
    timers: Timers,
    weapon: WeaponState,
    targets: TargetRegistry,
    powerups: PowerupController,
    session: MatchSession,
}

impl SimulationEngine {
    /// Create an engine in the `Setup` phase.
    pub fn new(config: MatchConfig) -> Self {
        let weapon = WeaponState::new(WeaponType::default(), config.weapons.get(WeaponType::default()));
        let targets = TargetRegistry::new(target_speeds(&config.difficulty), config.difficulty.target_size);
        let session = MatchSession::new(&config.difficulty, config.scoring);
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            time: SimTime::default(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            timers: Timers::new(),
            weapon,
            targets,
            powerups: PowerupController::new(),
            session,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the match by one tick and return the resulting snapshot.
    /// `query` answers the hit tests of any shot fired during the tick.
    pub fn tick(&mut self, query: &mut dyn HitQuery) -> MatchSnapshot {
        self.process_commands(query);

        if self.session.is_running() {
            self.run_systems(query);
            self.time.advance();
        }

        let spec = self.config.weapons.get(self.weapon.current());
        systems::snapshot::build_snapshot(
            &self.time,
            self.session.phase(),
            self.session.game_over_reason(),
            self.targets.views(),
            self.weapon.view(spec),
            self.session.view(),
            self.powerups.view(&self.timers),
            std::mem::take(&mut self.events),
            self.session.summary(),
        )
    }

    pub fn phase(&self) -> MatchPhase {
        self.session.phase()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn session(&self) -> &MatchSession {
        &self.session
    }

    pub fn weapon(&self) -> &WeaponState {
        &self.weapon
    }

    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    pub fn powerups(&self) -> &PowerupController {
        &self.powerups
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Final result, once the match is over.
    pub fn summary(&self) -> Option<MatchSummary> {
        self.session.summary()
    }

    /// Spawn a target of a fixed type (for tests needing a known arena).
    #[cfg(test)]
    pub fn spawn_test_target(&mut self, kind: TargetKind) -> u32 {
        let factor = self.powerups.speed_factor();
        self.targets.spawn_kind(&mut self.rng, kind, factor)
    }

    /// Move a target (for tests exercising the escape boundary).
    #[cfg(test)]
    pub fn place_target(&mut self, id: u32, position: rangefire_core::types::Position) {
        self.targets.set_position(id, position);
    }

    /// Activate a powerup directly (for tests).
    #[cfg(test)]
    pub fn activate_powerup(&mut self, kind: rangefire_core::enums::PowerupKind) {
        self.powerups
            .activate(kind, &mut self.targets, &mut self.timers, &mut self.events);
    }

    /// Process all queued commands.
    fn process_commands(&mut self, query: &mut dyn HitQuery) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command, query);
        }
    }

    /// Handle a single player command. Weapon intents only apply while running.
    fn handle_command(&mut self, command: PlayerCommand, query: &mut dyn HitQuery) {
        match command {
            PlayerCommand::StartMatch => {
                if matches!(self.session.phase(), MatchPhase::Setup | MatchPhase::GameOver) {
                    self.start_match();
                }
            }
            PlayerCommand::TogglePause => match self.session.phase() {
                MatchPhase::Running => self.pause(),
                MatchPhase::Paused => self.resume(),
                _ => {}
            },
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Resume => self.resume(),
            PlayerCommand::FireStop => self.weapon.set_trigger(false),
            _ if !self.session.is_running() => {}
            PlayerCommand::FireStart => {
                self.weapon.set_trigger(true);
                self.try_fire(query);
            }
            PlayerCommand::Reload => self.start_reload(),
            PlayerCommand::SwitchWeapon { weapon } => {
                if weapon != self.weapon.current() {
                    let spec = self.config.weapons.get(weapon);
                    if self.weapon.switch_to(weapon, spec, &mut self.timers) {
                        self.events.push(GameEvent::ZoomChanged { zoomed: false });
                    }
                    debug!(?weapon, "weapon switched");
                    self.events.push(GameEvent::WeaponSwitched { weapon });
                }
            }
            PlayerCommand::ToggleZoom => match self.weapon.toggle_zoom() {
                Ok(zoomed) => self.events.push(GameEvent::ZoomChanged { zoomed }),
                Err(reason) => self.events.push(GameEvent::FireDenied { reason }),
            },
        }
    }

    /// Build a fresh match and enter `Running`.
    fn start_match(&mut self) {
        let default_weapon = WeaponType::default();
        self.timers.cancel_all();
        self.time = SimTime::default();
        self.weapon = WeaponState::new(default_weapon, self.config.weapons.get(default_weapon));
        self.targets = TargetRegistry::new(
            target_speeds(&self.config.difficulty),
            self.config.difficulty.target_size,
        );
        self.powerups = PowerupController::new();
        self.session = MatchSession::new(&self.config.difficulty, self.config.scoring);
        self.session.start(&mut self.timers);

        for _ in 0..self.config.live_targets {
            self.spawn_target();
        }
        info!(
            seed = self.config.seed,
            scoring = ?self.config.scoring,
            targets = self.config.live_targets,
            "match started"
        );
    }

    fn pause(&mut self) {
        if !self.session.pause() {
            return;
        }
        self.weapon.set_trigger(false);
        if self.weapon.unzoom() {
            self.events.push(GameEvent::ZoomChanged { zoomed: false });
        }
        info!(tick = self.time.tick, "match paused");
        self.events.push(GameEvent::Paused);
    }

    fn resume(&mut self) {
        if !self.session.resume() {
            return;
        }
        info!(tick = self.time.tick, "match resumed");
        self.events.push(GameEvent::Resumed);
    }

    /// Enter `GameOver` and announce the result. Later calls are no-ops.
    fn end_match(&mut self, reason: GameOverReason) {
        if let Some(summary) = self.session.end(reason, &mut self.timers) {
            self.weapon.set_trigger(false);
            self.events.push(GameEvent::MatchEnded { reason, summary });
        }
    }

    fn spawn_target(&mut self) {
        let (target_id, kind) = self.targets.spawn(
            &mut self.rng,
            self.powerups.active().is_some(),
            self.powerups.speed_factor(),
        );
        self.events.push(GameEvent::TargetSpawned { target_id, kind });
    }

    /// Pull the trigger once and resolve the shot.
    fn try_fire(&mut self, query: &mut dyn HitQuery) {
        let weapon = self.weapon.current();
        let spec = self.config.weapons.get(weapon);
        let (pitch, yaw) = self.weapon.recoil();

        let outcome = self.weapon.fire(
            spec,
            self.powerups.infinite_ammo(),
            &mut self.timers,
            &mut self.rng,
        );

        match outcome {
            FireOutcome::Fired { pellets, ran_dry } => {
                self.session.register_shot();
                self.events.push(GameEvent::ShotFired { weapon });
                if ran_dry {
                    debug!(?weapon, "magazine empty, auto-reload armed");
                }

                let rays: Vec<PelletRay> = (0..pellets)
                    .map(|index| PelletRay {
                        index,
                        offset: spread_offset(&mut self.rng, spec.spread_radius),
                        recoil: DVec2::new(pitch, yaw),
                    })
                    .collect();
                let damage = spec.damage;

                let mut ctx = ShotContext {
                    targets: &mut self.targets,
                    session: &mut self.session,
                    powerups: &mut self.powerups,
                    timers: &mut self.timers,
                    events: &mut self.events,
                };
                if let Some(reason) = hit_resolver::resolve_shot(&mut ctx, &rays, query, damage) {
                    self.end_match(reason);
                }
            }
            FireOutcome::DryFire => {
                self.events.push(GameEvent::DryFire { weapon });
                self.start_reload();
            }
            FireOutcome::Denied(reason) => {
                self.events.push(GameEvent::FireDenied { reason });
            }
        }
    }

    fn start_reload(&mut self) {
        let weapon = self.weapon.current();
        let spec = self.config.weapons.get(weapon);
        match self.weapon.reload(spec, &mut self.timers) {
            ReloadOutcome::Started { unzoomed } => {
                if unzoomed {
                    self.events.push(GameEvent::ZoomChanged { zoomed: false });
                }
                debug!(?weapon, reload_ms = spec.reload_time_ms, "reload started");
                self.events.push(GameEvent::ReloadStart { weapon });
            }
            ReloadOutcome::Denied(reason) => {
                self.events.push(GameEvent::FireDenied { reason });
            }
        }
    }

    /// Run one running tick: timers, targets, weapon, automatic fire.
    fn run_systems(&mut self, query: &mut dyn HitQuery) {
        // 1. Expired timers, in expiry order
        for key in self.timers.advance(DT_MS) {
            self.dispatch_timer(key);
            if self.session.is_over() {
                return;
            }
        }

        // 2. Target movement and escapes
        let escapes = self.targets.update(
            self.time.elapsed_secs,
            DT,
            &mut self.timers,
            self.config.difficulty.spawn_delay_ms as f64,
        );
        for escape in escapes {
            debug!(target_id = escape.target_id, kind = ?escape.kind, "target escaped");
            self.events.push(GameEvent::TargetEscaped {
                target_id: escape.target_id,
                kind: escape.kind,
            });
            if escape.kind == TargetKind::Penalty {
                continue;
            }
            let delta = self.session.add_score(-ESCAPE_PENALTY_POINTS);
            if delta != 0 {
                self.events.push(GameEvent::ScoreChanged {
                    delta,
                    score: self.session.score(),
                });
            }
            if let Some(reason) = self.session.register_miss() {
                self.end_match(reason);
                return;
            }
        }

        // 3. Recoil recovery
        let spec = self.config.weapons.get(self.weapon.current());
        self.weapon.update(spec);

        // 4. Automatic fire
        let infinite = self.powerups.infinite_ammo();
        if spec.automatic && self.weapon.trigger_held() && self.weapon.ready_to_fire(infinite) {
            self.try_fire(query);
        }

        // 5. Win threshold
        if let Some(reason) = self.session.check_win() {
            self.end_match(reason);
        }
    }

    /// Run the handler for an expired timer. Each handler re-checks its
    /// precondition, so stale timers do nothing.
    fn dispatch_timer(&mut self, key: TimerKey) {
        match key {
            TimerKey::FireCooldown => self.weapon.cooldown_elapsed(),
            TimerKey::Reload { generation } => {
                let weapon = self.weapon.current();
                let spec = self.config.weapons.get(weapon);
                if self.weapon.complete_reload(generation, spec) {
                    debug!(?weapon, "reload complete");
                    self.events.push(GameEvent::ReloadComplete { weapon });
                } else {
                    debug!(generation, "stale reload completion ignored");
                }
            }
            TimerKey::AutoReload => {
                if self.weapon.ammo() == 0 && !self.weapon.is_reloading() {
                    self.start_reload();
                }
            }
            TimerKey::ComboDecay => self.session.reset_combo(),
            TimerKey::PowerupExpiry => {
                self.powerups.expire(&mut self.targets, &mut self.events);
            }
            TimerKey::Respawn(_) => {
                if self.targets.len() < self.config.live_targets {
                    self.spawn_target();
                }
            }
            TimerKey::CountdownSecond => {
                if let Some(reason) = self.session.countdown_tick(&mut self.timers) {
                    self.end_match(reason);
                }
            }
        }
    }
}

fn target_speeds(settings: &DifficultySettings) -> TargetSpeeds {
    TargetSpeeds {
        lateral: settings.lateral_speed,
        forward: settings.forward_speed,
    }
}

/// Random per-pellet aim offset within `spread` (view-plane units).
fn spread_offset(rng: &mut impl Rng, spread: f64) -> DVec2 {
    if spread <= 0.0 {
        return DVec2::ZERO;
    }
    DVec2::new(
        (rng.gen::<f64>() - 0.5) * spread,
        (rng.gen::<f64>() - 0.5) * spread,
    )
}
