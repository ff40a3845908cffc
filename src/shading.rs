//! Phong-style local shading, shadow rays, area light sampling and the
//! one-bounce indirect estimate.

use std::f64::consts::PI;
use std::ops::{AddAssign, Mul};

use rand::Rng;

use crate::algebra::{Fp, Point3f, Vec3f, EPS};
use crate::camera::Camera;
use crate::distributions::{BoxTarget, HemisphereRejection, SampleDistribution};
use crate::geometry::{Intersection, Ray};
use crate::scene::{Color, Light, Material, Scene};
use crate::utils::saturate;

/// Light arriving at a surface point, before material colors are applied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lights {
    pub diffuse: Color,
    pub specular: Color,
}

impl AddAssign for Lights {
    fn add_assign(&mut self, other: Lights) {
        self.diffuse += other.diffuse;
        self.specular += other.specular;
    }
}

impl Mul<Fp> for Lights {
    type Output = Lights;

    fn mul(self, scale: Fp) -> Lights {
        Lights {
            diffuse: self.diffuse * scale,
            specular: self.specular * scale,
        }
    }
}

fn phong(
    normal: &Vec3f,
    to_light: &Vec3f,
    view: &Vec3f,
    shininess: Fp,
    diffuse: &Color,
    specular: &Color,
) -> Lights {
    let half = (to_light + view).normalize();
    Lights {
        diffuse: diffuse * (Fp::max(0.0, normal.dot(to_light)) * PI),
        specular: specular * Fp::max(0.0, half.dot(normal)).powf(shininess),
    }
}

/// Unit direction from `point` towards the light and the distance to it.
/// Area lights have no single direction.
fn toward_light(light: &Light, point: &Point3f) -> Option<(Vec3f, Fp)> {
    match light {
        Light::Distant { direction, .. } => Some((-direction, Fp::INFINITY)),
        Light::Local { position, .. } => {
            let offset = position - point;
            Some((offset.normalize(), offset.norm()))
        }
        Light::Area { .. } => None,
    }
}

/// Read-only view of everything a render needs to trace rays.
pub struct Tracer<'a> {
    pub scene: &'a Scene,
    pub background: Color,
    /// Indirect bounces allowed below a primary ray.
    pub max_bounces: u32,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, camera: &Camera) -> Tracer<'a> {
        Tracer {
            scene,
            background: camera.background,
            max_bounces: scene.max_depth.min(camera.options.depth),
        }
    }

    /// Color seen along a primary ray, clamped to `[0, 1]` per channel.
    pub fn trace_primary<R: Rng + ?Sized>(&self, ray: &Ray, rng: &mut R) -> Color {
        self.trace(ray, 0, rng).map(saturate)
    }

    /// Unclamped color along `ray`, `depth` bounces below the primary ray.
    pub fn trace<R: Rng + ?Sized>(&self, ray: &Ray, depth: u32, rng: &mut R) -> Color {
        let Some(hit) = self.scene.nearest_hit(ray) else {
            return self.background;
        };
        let material = self.scene.material(hit.material);
        let mut color = self.shade(ray, &hit.intersection, material, rng);
        if self.scene.global_illumination && depth < self.max_bounces && !material.emits {
            color += self.indirect(&hit.intersection, depth, rng);
        }
        color
    }

    fn indirect<R: Rng + ?Sized>(&self, intersection: &Intersection, depth: u32, rng: &mut R) -> Color {
        let normal = &intersection.normal;
        let direction = HemisphereRejection.sample(&intersection.point, normal, rng);
        let bounce = Ray::new(
            intersection.point + normal * self.scene.shadow_bias,
            direction,
        );
        self.trace(&bounce, depth + 1, rng) * normal.dot(&direction)
    }

    /// Direct lighting at a hit. Emissive surfaces return their own emission.
    pub fn shade<R: Rng + ?Sized>(
        &self,
        ray: &Ray,
        intersection: &Intersection,
        material: &Material,
        rng: &mut R,
    ) -> Color {
        if material.emits {
            return material.emission_specular + material.emission_diffuse;
        }
        let lights = self.gather_lights(ray, intersection, material, rng);
        let ambient = self.scene.ambient_light * material.ka;
        ambient.component_mul(&material.ambient_color)
            + (lights.diffuse * material.kd).component_mul(&material.diffuse_color)
            + (lights.specular * material.ks).component_mul(&material.specular_color)
    }

    pub fn gather_lights<R: Rng + ?Sized>(
        &self,
        ray: &Ray,
        intersection: &Intersection,
        material: &Material,
        rng: &mut R,
    ) -> Lights {
        let mut lights = Lights::default();
        let view = ray.view_direction();
        for light in &self.scene.lights {
            let (diffuse, specular) = match light {
                Light::Distant {
                    diffuse, specular, ..
                }
                | Light::Local {
                    diffuse, specular, ..
                } => (diffuse, specular),
                Light::Area { .. } => continue,
            };
            let Some((to_light, _)) = toward_light(light, &intersection.point) else {
                continue;
            };
            if self.is_shadowed(intersection, light) {
                continue;
            }
            lights += phong(
                &intersection.normal,
                &to_light,
                &view,
                material.shininess,
                diffuse,
                specular,
            );
        }
        if self.scene.has_area_light() {
            lights += self.sample_area_lights(&view, intersection, material, rng);
        }
        lights
    }

    /// True when something sits between the hit point and a distant or
    /// local light. Area lights never shadow through this test.
    pub fn is_shadowed(&self, intersection: &Intersection, light: &Light) -> bool {
        let Some((to_light, _)) = toward_light(light, &intersection.point) else {
            return false;
        };
        let normal = &intersection.normal;
        let side = if normal.dot(&to_light) < 0.0 { -1.0 } else { 1.0 };
        let origin = intersection.point + normal * (side * self.scene.shadow_bias);
        let Some((to_light, distance)) = toward_light(light, &origin) else {
            return false;
        };
        match self.scene.nearest_hit(&Ray::new(origin, to_light)) {
            Some(hit) => hit.intersection.offset < distance,
            None => false,
        }
    }

    fn sample_area_lights<R: Rng + ?Sized>(
        &self,
        view: &Vec3f,
        intersection: &Intersection,
        material: &Material,
        rng: &mut R,
    ) -> Lights {
        let samples = self.scene.area_light_samples;
        let mut total = Lights::default();
        if samples == 0 {
            return total;
        }
        let normal = &intersection.normal;
        let origin = intersection.point + normal * self.scene.shadow_bias;
        for light in &self.scene.lights {
            let Light::Area { bounds, .. } = light else {
                continue;
            };
            let target = BoxTarget { bounds };
            let mut gathered = Lights::default();
            for _ in 0..samples {
                let direction = target.sample(&origin, normal, rng);
                if direction.norm_squared() < EPS * EPS {
                    continue;
                }
                let light_ray = Ray::new(origin, direction);
                let Some(hit) = self.scene.nearest_hit(&light_ray) else {
                    continue;
                };
                let emitter = self.scene.material(hit.material);
                if !emitter.emits {
                    continue;
                }
                gathered += phong(
                    normal,
                    &light_ray.direction,
                    view,
                    material.shininess,
                    &emitter.emission_diffuse,
                    &emitter.emission_specular,
                );
            }
            total += gathered * (1.0 / samples as Fp);
        }
        total
    }
}
