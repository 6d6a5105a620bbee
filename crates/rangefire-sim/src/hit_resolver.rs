//! Per-shot hit resolution.
//!
//! Each pellet takes only the nearest hit reported by the query. Score gains
//! from all pellets are summed and applied once after the last pellet, so a
//! shotgun blast produces a single `ScoreChanged`.

use tracing::debug;

use rangefire_core::constants::COMBO_DISPLAY_THRESHOLD;
use rangefire_core::enums::{GameOverReason, TargetKind};
use rangefire_core::events::GameEvent;

use crate::powerup::PowerupController;
use crate::query::{HitQuery, PelletRay};
use crate::session::MatchSession;
use crate::targets::TargetRegistry;
use crate::timers::Timers;

/// Mutable match state a shot can touch.
pub struct ShotContext<'a> {
    pub targets: &'a mut TargetRegistry,
    pub session: &'a mut MatchSession,
    pub powerups: &'a mut PowerupController,
    pub timers: &'a mut Timers,
    pub events: &'a mut Vec<GameEvent>,
}

/// Resolve every pellet of one shot. Returns the termination reason when
/// the shot ends the match; the caller performs the transition.
pub fn resolve_shot(
    ctx: &mut ShotContext<'_>,
    rays: &[PelletRay],
    query: &mut dyn HitQuery,
    damage: i32,
) -> Option<GameOverReason> {
    let mut hit_anything = false;
    let mut gained: i64 = 0;

    for ray in rays {
        let views = ctx.targets.views();
        let Some(target_id) = query.cast(ray, &views).first().copied() else {
            continue;
        };
        let Some(kind) = ctx.targets.kind_of(target_id) else {
            debug!(target_id, "hit query reported an unknown target");
            continue;
        };
        hit_anything = true;

        match kind {
            TargetKind::Penalty => {
                destroy(ctx, target_id, kind);
            }
            TargetKind::Powerup(powerup) => {
                ctx.session.register_hit();
                gained += ctx.session.powerup_points();
                ctx.powerups.activate(powerup, ctx.targets, ctx.timers, ctx.events);
                destroy(ctx, target_id, kind);
            }
            TargetKind::Normal | TargetKind::Heavy => {
                ctx.session.register_hit();
                let remaining = ctx.targets.apply_damage(target_id, damage).unwrap_or(0).max(0);
                ctx.events.push(GameEvent::Hit {
                    target_id,
                    damage,
                    remaining_health: remaining,
                });

                if remaining == 0 {
                    let points = ctx.session.kill_points(kind);
                    gained += points;
                    ctx.events.push(GameEvent::Kill {
                        target_id,
                        kind,
                        points,
                    });
                    ctx.targets.destroy(target_id, ctx.timers);

                    let combo = ctx.session.register_kill(ctx.timers);
                    if combo > COMBO_DISPLAY_THRESHOLD {
                        ctx.events.push(GameEvent::Combo { combo });
                    }
                }
            }
        }
    }

    if gained > 0 {
        let multiplier = if ctx.powerups.double_points() { 2 } else { 1 };
        let delta = ctx.session.add_score(gained * multiplier);
        ctx.events.push(GameEvent::ScoreChanged {
            delta,
            score: ctx.session.score(),
        });
    }

    if hit_anything {
        return ctx.session.check_win();
    }

    ctx.events.push(GameEvent::Miss);
    ctx.session.rearm_combo_decay(ctx.timers);
    ctx.session.register_miss()
}

fn destroy(ctx: &mut ShotContext<'_>, target_id: u32, kind: TargetKind) {
    if ctx.targets.destroy(target_id, ctx.timers).is_some() {
        ctx.events.push(GameEvent::TargetDestroyed { target_id, kind });
    }
}
