use crate::algebra::{Fp, Point3f, Vec3f};
use rand::Rng;

/// Axis-aligned box, used as the sampling region of area lights.
#[derive(Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb {
    /// Builds the box from per-axis `[low, high]` limits. Limits given in
    /// the wrong order are swapped.
    pub fn from_limits(x: [Fp; 2], y: [Fp; 2], z: [Fp; 2]) -> Aabb {
        Aabb {
            min: Point3f::new(x[0].min(x[1]), y[0].min(y[1]), z[0].min(z[1])),
            max: Point3f::new(x[0].max(x[1]), y[0].max(y[1]), z[0].max(z[1])),
        }
    }

    pub fn contains_point(&self, point: &Point3f) -> bool {
        (0..3).all(|coord| self.min[coord] <= point[coord] && point[coord] <= self.max[coord])
    }

    /// Uniformly distributed point inside the box. Flat axes collapse to
    /// their single coordinate.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point3f {
        let mut point = self.min;
        for coord in 0..3 {
            let (low, high) = (self.min[coord], self.max[coord]);
            if high > low {
                point[coord] = rng.gen_range(low..high);
            }
        }
        point
    }

    pub fn translated(&self, offset: &Vec3f) -> Aabb {
        Aabb {
            min: self.min + *offset,
            max: self.max + *offset,
        }
    }
}
