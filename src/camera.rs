use crate::algebra::{inverse_or_self, transform_point, transform_vector, Fp, Mat4, Point3f, Vec3f};
use crate::geometry::Ray;
use crate::scene::Color;

pub static DEFAULT_FOV: Fp = 90.0;
pub static DEFAULT_DEPTH: u32 = 12;

/// Per-render settings carried by the camera.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Vertical field of view in degrees. The horizontal extent follows the
    /// image aspect ratio.
    pub fov: Fp,
    /// Jittered rays per pixel, `0` shoots a single centered ray.
    pub aa: u32,
    /// Upper bound for indirect bounces, on top of `Scene::max_depth`.
    pub depth: u32,
    pub seed: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            fov: DEFAULT_FOV,
            aa: 0,
            depth: DEFAULT_DEPTH,
            seed: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    transform: Mat4,
    inv_transform: Mat4,
    pub background: Color,
    pub options: RenderOptions,
}

impl Camera {
    /// Camera at `origin` looking along `look_at`. Camera space has +x to the
    /// right, +y along `up` and +z along `look_at`.
    pub fn new(look_at: &Vec3f, up: &Vec3f, origin: &Point3f) -> Camera {
        let forward = look_at.normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(&forward);
        #[rustfmt::skip]
        let basis = Mat4::new(
            right.x, up.x, forward.x, 0.0,
            right.y, up.y, forward.y, 0.0,
            right.z, up.z, forward.z, 0.0,
            0.0,     0.0,  0.0,       1.0,
        );
        let transform = Mat4::new_translation(&origin.coords) * basis;
        Camera {
            inv_transform: inverse_or_self(&transform),
            transform,
            background: Color::zeros(),
            options: RenderOptions::default(),
        }
    }

    pub fn with_background(mut self, background: Color) -> Camera {
        self.background = background;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Camera {
        self.options = options;
        self
    }

    /// Applies `m` on top of the current camera transform.
    pub fn transform(&mut self, m: &Mat4) {
        self.transform = m * self.transform;
        self.inv_transform = inverse_or_self(&self.transform);
    }

    pub fn transform_matrix(&self) -> &Mat4 {
        &self.transform
    }

    pub fn inverse_transform(&self) -> &Mat4 {
        &self.inv_transform
    }

    pub fn position(&self) -> Point3f {
        transform_point(&self.transform, &Point3f::origin())
    }

    /// Primary ray through the continuous image position `(px, py)`, where
    /// pixel `(x, y)` covers `[x, x + 1) x [y, y + 1)` and `y` grows downwards.
    pub fn ray(&self, px: Fp, py: Fp, width: usize, height: usize) -> Ray {
        let scale = (self.options.fov.to_radians() * 0.5).tan();
        let aspect = width as Fp / height as Fp;
        let direction = Vec3f::new(
            (2.0 * px / width as Fp - 1.0) * scale * aspect,
            (1.0 - 2.0 * py / height as Fp) * scale,
            1.0,
        );
        Ray::new(self.position(), transform_vector(&self.transform, &direction))
    }
}
