use crate::algebra::{transform_point, transform_vector, Fp, Mat4, Point3f, Vec3f};
use crate::utils::solve_quadratic;

/// Below this `|normal . direction|` a ray counts as parallel to a surface.
pub static PARALLEL_EPS: Fp = 1e-9;
/// Triangles with a smaller (doubled) area are rejected as degenerate.
pub static MIN_TRIANGLE_AREA: Fp = 1e-12;

#[derive(Clone, Debug)]
pub struct Ray {
    pub origin: Point3f,
    pub direction: Vec3f,
}

impl Ray {
    /// `direction` is normalized; it must not be the zero vector.
    pub fn new(origin: Point3f, direction: Vec3f) -> Ray {
        Ray {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: Fp) -> Point3f {
        self.origin + self.direction * t
    }

    /// Direction back towards the ray origin, the view vector for shading.
    pub fn view_direction(&self) -> Vec3f {
        -self.direction
    }
}

#[derive(Clone, Debug)]
pub struct Intersection {
    pub offset: Fp,
    pub point: Point3f,
    pub normal: Vec3f,
    /// Weights of the three triangle vertices, `None` for other shapes.
    pub barycentric: Option<Vec3f>,
}

#[derive(Clone, Debug)]
pub struct Sphere {
    pub center: Point3f,
    pub radius: Fp,
    pub radius2: Fp,
}

impl Sphere {
    pub fn new(center: Point3f, radius: Fp) -> Sphere {
        Sphere {
            center,
            radius,
            radius2: radius * radius,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Plane {
    pub center: Point3f,
    pub normal: Vec3f,
}

impl Plane {
    pub fn new(center: Point3f, normal: Vec3f) -> Plane {
        Plane {
            center,
            normal: normal.normalize(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Disk {
    pub center: Point3f,
    pub normal: Vec3f,
    pub radius: Fp,
    pub radius2: Fp,
}

impl Disk {
    pub fn new(center: Point3f, normal: Vec3f, radius: Fp) -> Disk {
        Disk {
            center,
            normal: normal.normalize(),
            radius,
            radius2: radius * radius,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Triangle {
    pub vertices: [Point3f; 3],
    /// `b - a`, `c - b`, `a - c`
    pub edges: [Vec3f; 3],
    pub normal: Vec3f,
    pub area: Fp,
    pub single_sided: bool,
}

impl Triangle {
    /// Double-sided triangle, or `None` when the vertices are (nearly)
    /// collinear.
    pub fn new(a: Point3f, b: Point3f, c: Point3f) -> Option<Triangle> {
        let triangle = Triangle::from_vertices(a, b, c, false);
        if triangle.area >= MIN_TRIANGLE_AREA {
            Some(triangle)
        } else {
            None
        }
    }

    pub fn single_sided(mut self, single_sided: bool) -> Triangle {
        self.single_sided = single_sided;
        self
    }

    fn from_vertices(a: Point3f, b: Point3f, c: Point3f, single_sided: bool) -> Triangle {
        let ba = b - a;
        let cb = c - b;
        let ac = a - c;
        let cross = ba.cross(&(c - a));
        let normal = cross.normalize();
        Triangle {
            vertices: [a, b, c],
            edges: [ba, cb, ac],
            normal,
            area: cross.dot(&normal),
            single_sided,
        }
    }

    /// A transform may collapse the triangle; such a triangle never
    /// reports a hit.
    pub fn transformed(&self, m: &Mat4) -> Triangle {
        let [a, b, c] = self.vertices.map(|v| transform_point(m, &v));
        Triangle::from_vertices(a, b, c, self.single_sided)
    }

    pub fn point_from_barycentric(&self, weights: &Vec3f) -> Point3f {
        let [a, b, c] = self.vertices;
        Point3f::from(a.coords * weights.x + b.coords * weights.y + c.coords * weights.z)
    }
}

#[derive(Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Disk(Disk),
    Triangle(Triangle),
}

impl Shape {
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        match self {
            Shape::Sphere(sphere) => intersect_sphere(ray, sphere),
            Shape::Plane(plane) => intersect_plane(ray, &plane.center, &plane.normal),
            Shape::Disk(disk) => intersect_disk(ray, disk),
            Shape::Triangle(triangle) => intersect_triangle(ray, triangle),
        }
    }

    pub fn transformed(&self, m: &Mat4) -> Shape {
        match self {
            Shape::Sphere(sphere) => Shape::Sphere(Sphere {
                center: transform_point(m, &sphere.center),
                ..sphere.clone()
            }),
            Shape::Plane(plane) => Shape::Plane(Plane::new(
                transform_point(m, &plane.center),
                transform_vector(m, &plane.normal),
            )),
            Shape::Disk(disk) => Shape::Disk(Disk::new(
                transform_point(m, &disk.center),
                transform_vector(m, &disk.normal),
                disk.radius,
            )),
            Shape::Triangle(triangle) => Shape::Triangle(triangle.transformed(m)),
        }
    }
}

fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> Option<Intersection> {
    let oc = ray.origin - sphere.center;
    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * ray.direction.dot(&oc);
    let c = oc.dot(&oc) - sphere.radius2;
    let (t0, t1) = solve_quadratic(a, b, c)?;
    let offset = if t0 >= 0.0 { t0 } else { t1 };
    if offset < 0.0 {
        return None;
    }
    let point = ray.at(offset);
    Some(Intersection {
        offset,
        point,
        normal: (point - sphere.center).normalize(),
        barycentric: None,
    })
}

fn intersect_plane(ray: &Ray, center: &Point3f, normal: &Vec3f) -> Option<Intersection> {
    let normal_dot_dir = normal.dot(&ray.direction);
    if !(normal_dot_dir.abs() >= PARALLEL_EPS) {
        return None;
    }
    let offset = (*center - ray.origin).dot(normal) / normal_dot_dir;
    if offset < 0.0 {
        return None;
    }
    Some(Intersection {
        offset,
        point: ray.at(offset),
        normal: *normal,
        barycentric: None,
    })
}

fn intersect_disk(ray: &Ray, disk: &Disk) -> Option<Intersection> {
    let intersection = intersect_plane(ray, &disk.center, &disk.normal)?;
    if (intersection.point - disk.center).norm_squared() > disk.radius2 {
        None
    } else {
        Some(intersection)
    }
}

pub fn intersect_triangle(ray: &Ray, triangle: &Triangle) -> Option<Intersection> {
    let normal = &triangle.normal;
    let normal_dot_dir = normal.dot(&ray.direction);
    // NaN (collapsed triangle) fails this check as well
    if !(normal_dot_dir.abs() >= PARALLEL_EPS) {
        return None;
    }
    if triangle.single_sided && normal_dot_dir > 0.0 {
        return None;
    }
    let [a, b, c] = triangle.vertices;
    let offset = (normal.dot(&a.coords) - normal.dot(&ray.origin.coords)) / normal_dot_dir;
    if offset < 0.0 {
        return None;
    }
    let point = ray.at(offset);

    let [ba, cb, ac] = triangle.edges;
    if ba.cross(&(point - a)).dot(normal) < 0.0 {
        return None;
    }
    let u = cb.cross(&(point - b)).dot(normal);
    if u < 0.0 {
        return None;
    }
    let v = ac.cross(&(point - c)).dot(normal);
    if v < 0.0 {
        return None;
    }
    let u = u / triangle.area;
    let v = v / triangle.area;
    Some(Intersection {
        offset,
        point,
        normal: *normal,
        barycentric: Some(Vec3f::new(u, v, 1.0 - u - v)),
    })
}
