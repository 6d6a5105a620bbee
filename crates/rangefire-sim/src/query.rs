//! Ray-hit queries answered by the render collaborator.
//!
//! The engine hands one `PelletRay` per pellet to a `HitQuery` together with
//! the current target views and gets back the ids along that ray,
//! nearest-first. Only the first id is used.

use std::collections::VecDeque;

use glam::{DVec2, DVec3};

use rangefire_core::constants::CAMERA_POSITION;
use rangefire_core::state::TargetView;

/// One pellet's aim perturbation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PelletRay {
    /// Pellet number within the shot.
    pub index: u32,
    /// Spread offset in view-plane units; zero for single-pellet weapons.
    pub offset: DVec2,
    /// Accumulated (pitch, yaw) recoil at the moment of firing.
    pub recoil: DVec2,
}

/// Source of ray-intersection results.
pub trait HitQuery {
    /// Ids of targets along `ray`, nearest first.
    fn cast(&mut self, ray: &PelletRay, targets: &[TargetView]) -> Vec<u32>;
}

/// Never hits anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHits;

impl HitQuery for NoHits {
    fn cast(&mut self, _ray: &PelletRay, _targets: &[TargetView]) -> Vec<u32> {
        Vec::new()
    }
}

/// Replays a queue of canned answers, one per pellet. An exhausted queue
/// answers with no hit.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHits {
    answers: VecDeque<Vec<u32>>,
}

impl ScriptedHits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer for the next pellet.
    pub fn push(&mut self, ids: Vec<u32>) -> &mut Self {
        self.answers.push_back(ids);
        self
    }

    pub fn push_hit(&mut self, id: u32) -> &mut Self {
        self.push(vec![id])
    }

    pub fn push_miss(&mut self) -> &mut Self {
        self.push(Vec::new())
    }

    pub fn pending(&self) -> usize {
        self.answers.len()
    }
}

impl HitQuery for ScriptedHits {
    fn cast(&mut self, _ray: &PelletRay, _targets: &[TargetView]) -> Vec<u32> {
        self.answers.pop_front().unwrap_or_default()
    }
}

/// Geometric query: casts from the eye toward an aim point and intersects
/// each target as a sphere of diameter `size`.
#[derive(Debug, Clone, Copy)]
pub struct SphereCaster {
    origin: DVec3,
    aim: DVec3,
}

impl Default for SphereCaster {
    fn default() -> Self {
        Self::new(DVec3::from_array(CAMERA_POSITION))
    }
}

impl SphereCaster {
    /// Caster at `origin` looking down -z.
    pub fn new(origin: DVec3) -> Self {
        Self {
            origin,
            aim: origin + DVec3::NEG_Z,
        }
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Point the caster at a world position.
    pub fn aim_at(&mut self, point: DVec3) {
        if (point - self.origin).length_squared() > f64::EPSILON {
            self.aim = point;
        }
    }

    /// Perturbed unit direction for one pellet. Recoil pitch is negative
    /// upward kick; spread and yaw shift along the view plane.
    pub fn direction(&self, ray: &PelletRay) -> DVec3 {
        let forward = (self.aim - self.origin).try_normalize().unwrap_or(DVec3::NEG_Z);
        let right = forward.cross(DVec3::Y).try_normalize().unwrap_or(DVec3::X);
        let up = right.cross(forward);

        let lateral = ray.offset.x + ray.recoil.y;
        let vertical = ray.offset.y - ray.recoil.x;
        (forward + right * lateral + up * vertical).try_normalize().unwrap_or(forward)
    }
}

impl HitQuery for SphereCaster {
    fn cast(&mut self, ray: &PelletRay, targets: &[TargetView]) -> Vec<u32> {
        let dir = self.direction(ray);
        let mut hits: Vec<(f64, u32)> = targets
            .iter()
            .filter_map(|t| {
                ray_sphere(self.origin, dir, t.position.to_dvec3(), t.size / 2.0).map(|d| (d, t.id))
            })
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        hits.into_iter().map(|(_, id)| id).collect()
    }
}

/// Distance along a unit ray to the first intersection with a sphere.
fn ray_sphere(origin: DVec3, dir: DVec3, center: DVec3, radius: f64) -> Option<f64> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let near = -b - sqrt_disc;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + sqrt_disc;
    (far >= 0.0).then_some(far)
}

#[cfg(test)]
mod tests {
    use rangefire_core::enums::TargetKind;
    use rangefire_core::types::Position;

    use super::*;

    fn view(id: u32, x: f64, y: f64, z: f64) -> TargetView {
        TargetView {
            id,
            kind: TargetKind::Normal,
            position: Position::new(x, y, z),
            health: 10,
            color: 0xFFFFFF,
            size: 1.2,
        }
    }

    fn straight() -> PelletRay {
        PelletRay {
            index: 0,
            offset: DVec2::ZERO,
            recoil: DVec2::ZERO,
        }
    }

    #[test]
    fn test_sphere_caster_orders_nearest_first() {
        let mut caster = SphereCaster::new(DVec3::new(0.0, 1.6, 6.0));
        caster.aim_at(DVec3::new(0.0, 1.6, -8.0));
        let targets = vec![view(1, 0.0, 1.6, -8.0), view(2, 0.0, 1.6, -2.0), view(3, 3.0, 1.6, -2.0)];
        assert_eq!(caster.cast(&straight(), &targets), vec![2, 1]);
    }

    #[test]
    fn test_sphere_caster_misses_off_axis() {
        let mut caster = SphereCaster::default();
        let targets = vec![view(1, 4.0, 3.0, -8.0)];
        assert!(caster.cast(&straight(), &targets).is_empty());

        caster.aim_at(DVec3::new(4.0, 3.0, -8.0));
        assert_eq!(caster.cast(&straight(), &targets), vec![1]);
    }

    #[test]
    fn test_recoil_lifts_the_ray() {
        let caster = SphereCaster::default();
        let kicked = PelletRay {
            recoil: DVec2::new(-0.1, 0.0),
            ..straight()
        };
        assert!(caster.direction(&kicked).y > 0.0);
    }

    #[test]
    fn test_scripted_hits_replay_in_order() {
        let mut q = ScriptedHits::new();
        q.push_hit(4).push_miss().push(vec![2, 3]);
        let r = straight();
        assert_eq!(q.cast(&r, &[]), vec![4]);
        assert!(q.cast(&r, &[]).is_empty());
        assert_eq!(q.cast(&r, &[]), vec![2, 3]);
        assert!(q.cast(&r, &[]).is_empty(), "exhausted queue misses");
        assert_eq!(q.pending(), 0);
    }
}
