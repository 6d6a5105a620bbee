//! Target motion: cosmetic bob, lateral bounce, forward approach.

use hecs::World;

use rangefire_core::components::{Motion, Target};
use rangefire_core::constants::{BOB_AMPLITUDE, BOB_FREQUENCY, LATERAL_BOUND};
use rangefire_core::types::Position;

/// Integrate every live target by `dt` seconds. `elapsed_secs` phases the bob.
pub fn run(world: &mut World, elapsed_secs: f64, dt: f64) {
    for (_entity, (target, pos, motion)) in
        world.query_mut::<(&Target, &mut Position, &mut Motion)>()
    {
        pos.y += (elapsed_secs * BOB_FREQUENCY + target.id as f64).sin() * BOB_AMPLITUDE * dt;

        pos.x += motion.side_direction * motion.side_speed * dt;
        if pos.x.abs() > LATERAL_BOUND {
            // Head back inward; a plain flip could stick outside the bound.
            motion.side_direction = -pos.x.signum();
        }

        pos.z += motion.forward_speed * dt;
    }
}
