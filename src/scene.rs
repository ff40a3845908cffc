use crate::aabb::Aabb;
use crate::algebra::{transform_point, transform_vector, Fp, Mat4, Point3f, Vec3f};
use crate::geometry::{intersect_triangle, Disk, Intersection, Plane, Ray, Shape, Sphere, Triangle};
use crate::mesh::Mesh;

pub type Color = Vec3f;

/// Index of a `Material` in the owning scene's material table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Phong shading parameters. The all-zero default renders black.
#[derive(Clone, Debug, Default)]
pub struct Material {
    pub name: String,
    pub ambient_color: Color,
    pub diffuse_color: Color,
    pub specular_color: Color,
    /// Emitted colors, only read when `emits` is set or when the surface is
    /// hit while sampling an area light.
    pub emission_diffuse: Color,
    pub emission_specular: Color,
    pub ka: Fp,
    pub kd: Fp,
    pub ks: Fp,
    pub shininess: Fp,
    pub emits: bool,
}

impl Material {
    pub fn matte(name: &str, color: Color) -> Material {
        Material {
            name: name.to_string(),
            ambient_color: color,
            diffuse_color: color,
            specular_color: Color::new(1.0, 1.0, 1.0),
            ka: 0.1,
            kd: 0.6,
            ks: 0.3,
            shininess: 32.0,
            ..Default::default()
        }
    }

    pub fn emitter(name: &str, diffuse: Color, specular: Color) -> Material {
        Material {
            name: name.to_string(),
            emission_diffuse: diffuse,
            emission_specular: specular,
            emits: true,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug)]
pub enum Light {
    Distant {
        /// Unit direction the light travels in.
        direction: Vec3f,
        diffuse: Color,
        specular: Color,
    },
    Local {
        position: Point3f,
        diffuse: Color,
        specular: Color,
    },
    /// Only contributes through emissive geometry found inside `bounds`.
    Area { position: Point3f, bounds: Aabb },
}

impl Light {
    pub fn distant(direction: Vec3f, diffuse: Color, specular: Color) -> Light {
        Light::Distant {
            direction: direction.normalize(),
            diffuse,
            specular,
        }
    }

    pub fn local(position: Point3f, diffuse: Color, specular: Color) -> Light {
        Light::Local {
            position,
            diffuse,
            specular,
        }
    }

    pub fn area(position: Point3f, bounds: Aabb) -> Light {
        Light::Area { position, bounds }
    }

    pub fn is_area(&self) -> bool {
        matches!(self, Light::Area { .. })
    }

    /// Area light bounds only follow the translation part of `m`.
    pub fn transform(&mut self, m: &Mat4) {
        match self {
            Light::Distant { direction, .. } => {
                *direction = transform_vector(m, direction).normalize();
            }
            Light::Local { position, .. } => {
                *position = transform_point(m, position);
            }
            Light::Area { position, bounds } => {
                let moved = transform_point(m, position);
                *bounds = bounds.translated(&(moved - *position));
                *position = moved;
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Primitive {
    pub shape: Shape,
    pub material: Option<MaterialId>,
}

impl Primitive {
    pub fn new(shape: Shape, material: Option<MaterialId>) -> Primitive {
        Primitive { shape, material }
    }

    pub fn sphere(center: Point3f, radius: Fp, material: Option<MaterialId>) -> Primitive {
        Primitive::new(Shape::Sphere(Sphere::new(center, radius)), material)
    }

    pub fn plane(center: Point3f, normal: Vec3f, material: Option<MaterialId>) -> Primitive {
        Primitive::new(Shape::Plane(Plane::new(center, normal)), material)
    }

    pub fn disk(center: Point3f, normal: Vec3f, radius: Fp, material: Option<MaterialId>) -> Primitive {
        Primitive::new(Shape::Disk(Disk::new(center, normal, radius)), material)
    }

    pub fn triangle(triangle: Triangle, material: Option<MaterialId>) -> Primitive {
        Primitive::new(Shape::Triangle(triangle), material)
    }

    pub fn transform(&mut self, m: &Mat4) {
        self.shape = self.shape.transformed(m);
    }
}

/// Nearest intersection found in a scene, with the material of the surface.
#[derive(Clone, Debug)]
pub struct SceneHit {
    pub intersection: Intersection,
    pub material: Option<MaterialId>,
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
    pub meshes: Vec<Mesh>,
    pub lights: Vec<Light>,
    pub materials: Vec<Material>,
    pub shadow_bias: Fp,
    pub ambient_light: Color,
    pub area_light_samples: u32,
    pub max_depth: u32,
    pub samples: u32,
    pub global_illumination: bool,
    default_material: Material,
}

impl Scene {
    pub fn new(ambient_light: Color) -> Scene {
        Scene {
            primitives: vec![],
            meshes: vec![],
            lights: vec![],
            materials: vec![],
            shadow_bias: 0.01,
            ambient_light,
            area_light_samples: 16,
            max_depth: 1,
            samples: 1,
            global_illumination: false,
            default_material: Material::default(),
        }
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn find_material(&self, name: &str) -> Option<MaterialId> {
        self.materials
            .iter()
            .position(|material| material.name == name)
            .map(MaterialId)
    }

    /// Surfaces without a material (or with a dangling id) shade with the
    /// all-zero default.
    pub fn material(&self, id: Option<MaterialId>) -> &Material {
        id.and_then(|MaterialId(index)| self.materials.get(index))
            .unwrap_or(&self.default_material)
    }

    pub fn has_area_light(&self) -> bool {
        self.lights.iter().any(Light::is_area)
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::len).sum()
    }

    /// Closest hit with a strictly positive distance. Standalone primitives
    /// are tested first, then every mesh triangle.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<SceneHit> {
        let standalone = self
            .primitives
            .iter()
            .map(|primitive| (&primitive.shape, primitive.material));
        let meshes = self.meshes.iter().flat_map(|mesh| {
            mesh.triangles()
                .iter()
                .map(move |triangle| (triangle, mesh.material))
        });

        let mut nearest: Option<SceneHit> = None;
        let mut consider = |intersection: Intersection, material: Option<MaterialId>| {
            let closer = match &nearest {
                Some(hit) => intersection.offset < hit.intersection.offset,
                None => true,
            };
            if intersection.offset > 0.0 && closer {
                nearest = Some(SceneHit {
                    intersection,
                    material,
                });
            }
        };
        for (shape, material) in standalone {
            if let Some(intersection) = shape.intersect(ray) {
                consider(intersection, material);
            }
        }
        for (triangle, material) in meshes {
            if let Some(intersection) = intersect_triangle(ray, triangle) {
                consider(intersection, material);
            }
        }
        nearest
    }
}
