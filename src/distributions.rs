use rand::Rng;

use crate::aabb::Aabb;
use crate::algebra::{Point3f, Vec3f, EPS};

pub trait SampleDistribution {
    /// Random direction leaving `point`, which lies on a surface with unit
    /// `normal`. The result is not necessarily normalized.
    fn sample<R: Rng + ?Sized>(&self, point: &Point3f, normal: &Vec3f, rng: &mut R) -> Vec3f;
}

/// Unit directions in the hemisphere around the normal, drawn by rejection
/// from the unit ball.
pub struct HemisphereRejection;

/// Directions towards a uniformly chosen point inside a box.
pub struct BoxTarget<'a> {
    pub bounds: &'a Aabb,
}

impl SampleDistribution for HemisphereRejection {
    fn sample<R: Rng + ?Sized>(&self, _: &Point3f, normal: &Vec3f, rng: &mut R) -> Vec3f {
        loop {
            let candidate = Vec3f::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let norm_squared = candidate.norm_squared();
            if norm_squared > 1.0 || norm_squared < EPS * EPS {
                continue;
            }
            let direction = candidate / norm_squared.sqrt();
            return if direction.dot(normal) <= 0.0 {
                -direction
            } else {
                direction
            };
        }
    }
}

impl SampleDistribution for BoxTarget<'_> {
    fn sample<R: Rng + ?Sized>(&self, point: &Point3f, _: &Vec3f, rng: &mut R) -> Vec3f {
        self.bounds.sample(rng) - *point
    }
}
