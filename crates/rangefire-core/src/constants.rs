//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Milliseconds per tick (timer resolution).
pub const DT_MS: f64 = 1000.0 / TICK_RATE as f64;

// --- Targets ---

/// Number of live targets kept in the arena.
pub const DEFAULT_LIVE_TARGETS: usize = 4;

pub const NORMAL_TARGET_HEALTH: i32 = 10;
pub const HEAVY_TARGET_HEALTH: i32 = 30;
pub const PENALTY_TARGET_HEALTH: i32 = 10;
pub const POWERUP_TARGET_HEALTH: i32 = 10;

/// Roll thresholds for the spawn type draw. Checked in order:
/// powerup, penalty, heavy, else normal.
pub const SPAWN_POWERUP_THRESHOLD: f64 = 0.05;
pub const SPAWN_PENALTY_THRESHOLD: f64 = 0.15;
pub const SPAWN_HEAVY_THRESHOLD: f64 = 0.40;

/// Lateral spawn spread: x = (r - 0.5) * SPAWN_LATERAL_SPREAD.
pub const SPAWN_LATERAL_SPREAD: f64 = 8.0;

/// Vertical spawn band: y in [SPAWN_HEIGHT_MIN, SPAWN_HEIGHT_MIN + SPAWN_HEIGHT_RANGE).
pub const SPAWN_HEIGHT_MIN: f64 = 1.0;
pub const SPAWN_HEIGHT_RANGE: f64 = 2.2;

/// Depth band behind the play area: z in (SPAWN_DEPTH_NEAR - SPAWN_DEPTH_RANGE, SPAWN_DEPTH_NEAR].
pub const SPAWN_DEPTH_NEAR: f64 = -8.0;
pub const SPAWN_DEPTH_RANGE: f64 = 4.0;

/// Targets bounce back once |x| exceeds this.
pub const LATERAL_BOUND: f64 = 5.0;

/// Depth at which a target has reached the player.
pub const ESCAPE_DEPTH: f64 = 4.0;

/// Cosmetic vertical bob: dy/dt = sin(t * BOB_FREQUENCY + index) * BOB_AMPLITUDE.
pub const BOB_FREQUENCY: f64 = 1.2;
pub const BOB_AMPLITUDE: f64 = 0.072;

/// Delay before a destroyed target is replaced (ms).
pub const RESPAWN_DELAY_MS: f64 = 800.0;

// --- Scoring ---

pub const NORMAL_KILL_POINTS: i64 = 10;
pub const HEAVY_KILL_POINTS: i64 = 30;

/// Bonus for shooting a powerup target.
pub const POWERUP_BONUS_POINTS: i64 = 50;

/// Score lost when a non-penalty target escapes.
pub const ESCAPE_PENALTY_POINTS: i64 = 5;

/// Idle window after which the combo resets (ms).
pub const COMBO_DECAY_MS: f64 = 2000.0;

/// Combo events are only emitted above this value.
pub const COMBO_DISPLAY_THRESHOLD: u32 = 2;

// --- Powerups ---

/// Lifetime of every powerup (ms).
pub const POWERUP_DURATION_MS: f64 = 7000.0;

/// Speed multiplier applied to targets during slow-mo.
pub const SLOWMO_FACTOR: f64 = 0.5;

// --- Weapons ---

/// Delay between running dry and the automatic reload (ms).
pub const AUTO_RELOAD_GRACE_MS: f64 = 300.0;

/// Pitch kick: -recoil * (RECOIL_PITCH_MIN + r * RECOIL_PITCH_JITTER).
pub const RECOIL_PITCH_MIN: f64 = 0.8;
pub const RECOIL_PITCH_JITTER: f64 = 0.4;

/// Yaw kick: (r - 0.5) * recoil * RECOIL_YAW_SCALE.
pub const RECOIL_YAW_SCALE: f64 = 0.5;

// --- Match ---

/// Countdown granularity (ms).
pub const COUNTDOWN_INTERVAL_MS: f64 = 1000.0;

// --- Viewpoint ---

/// Eye position used by the default geometric hit query.
pub const CAMERA_POSITION: [f64; 3] = [0.0, 1.6, 6.0];
