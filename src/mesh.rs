use crate::algebra::{inverse_or_self, Fp, Mat4, Point3f};
use crate::error::{Error, Result};
use crate::geometry::Triangle;
use crate::scene::MaterialId;

/// Triangles sharing one material and one accumulated transform. The
/// triangle count is fixed once the mesh is built.
#[derive(Clone, Debug)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    transform: Mat4,
    inv_transform: Mat4,
    pub material: Option<MaterialId>,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>, material: Option<MaterialId>) -> Mesh {
        Mesh {
            triangles,
            transform: Mat4::identity(),
            inv_transform: Mat4::identity(),
            material,
        }
    }

    /// Builds the mesh from 0-based vertex index triples as produced by a
    /// mesh loader. Zero-area faces are skipped.
    pub fn from_indexed(
        vertices: &[Point3f],
        faces: &[[usize; 3]],
        material: Option<MaterialId>,
    ) -> Result<Mesh> {
        let mut triangles = Vec::with_capacity(faces.len());
        for (face, indices) in faces.iter().enumerate() {
            let mut corners = [Point3f::origin(); 3];
            for (corner, &index) in corners.iter_mut().zip(indices) {
                *corner = *vertices.get(index).ok_or(Error::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count: vertices.len(),
                })?;
            }
            let [a, b, c] = corners;
            match Triangle::new(a, b, c) {
                Some(triangle) => triangles.push(triangle),
                None => log::warn!("skipping degenerate face {} {:?}", face, indices),
            }
        }
        log::debug!(
            "built mesh with {} of {} faces",
            triangles.len(),
            faces.len()
        );
        Ok(Mesh::new(triangles, material))
    }

    /// Two double-sided triangles `(a, b, c)` and `(c, d, a)`.
    pub fn rectangle(
        a: Point3f,
        b: Point3f,
        c: Point3f,
        d: Point3f,
        material: Option<MaterialId>,
    ) -> Mesh {
        let triangles = [Triangle::new(a, b, c), Triangle::new(c, d, a)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        if triangles.len() < 2 {
            log::warn!("rectangle {:?} {:?} {:?} {:?} is degenerate", a, b, c, d);
        }
        Mesh::new(triangles, material)
    }

    /// `width` along +x and `height` along -z, lying on the y = 0 plane with
    /// one corner at the origin and the normal facing +y.
    pub fn rectangle_wh(width: Fp, height: Fp, material: Option<MaterialId>) -> Mesh {
        let origin = Point3f::origin();
        let a = Point3f::new(width, 0.0, 0.0);
        let b = Point3f::new(width, 0.0, -height);
        let c = Point3f::new(0.0, 0.0, -height);
        let triangles = [Triangle::new(origin, a, c), Triangle::new(a, b, c)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        if triangles.len() < 2 {
            log::warn!("rectangle of {}x{} is degenerate", width, height);
        }
        Mesh::new(triangles, material)
    }

    /// Applies `m` on top of the transforms already baked into the mesh.
    pub fn transform(&mut self, m: &Mat4) {
        for triangle in &mut self.triangles {
            *triangle = triangle.transformed(m);
        }
        self.transform = m * self.transform;
        self.inv_transform = inverse_or_self(&self.transform);
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn transform_matrix(&self) -> &Mat4 {
        &self.transform
    }

    pub fn inverse_transform(&self) -> &Mat4 {
        &self.inv_transform
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{rotation, translation, Vec3f};

    fn square() -> Vec<Point3f> {
        vec![
            Point3f::new(-1.0, -1.0, 0.0),
            Point3f::new(1.0, -1.0, 0.0),
            Point3f::new(1.0, 1.0, 0.0),
            Point3f::new(-1.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_from_indexed() {
        let mesh = Mesh::from_indexed(&square(), &[[0, 1, 2], [2, 3, 0]], None).unwrap();
        assert_eq!(mesh.len(), 2);
        for triangle in mesh.triangles() {
            assert!((triangle.normal - Vec3f::z()).norm() < 1e-12);
            assert!((triangle.area - 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_from_indexed_out_of_range() {
        let err = Mesh::from_indexed(&square(), &[[0, 1, 4]], None).unwrap_err();
        assert!(matches!(
            err,
            Error::FaceIndexOutOfRange {
                face: 0,
                index: 4,
                vertex_count: 4
            }
        ));
    }

    #[test]
    fn test_from_indexed_skips_degenerate() {
        let mesh = Mesh::from_indexed(&square(), &[[0, 1, 2], [0, 0, 1]], None).unwrap();
        assert_eq!(mesh.len(), 1);
    }

    #[test]
    fn test_rectangle_wh_faces_up() {
        let mesh = Mesh::rectangle_wh(2.0, 3.0, None);
        assert_eq!(mesh.len(), 2);
        for triangle in mesh.triangles() {
            assert!((triangle.normal - Vec3f::y()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_transform_accumulates() {
        let mut mesh = Mesh::rectangle(
            square()[0],
            square()[1],
            square()[2],
            square()[3],
            None,
        );
        let first = translation(0.0, 0.0, -2.0);
        let second = rotation(90.0, &Vec3f::y());
        mesh.transform(&first);
        mesh.transform(&second);

        let expected = second * first;
        assert!((mesh.transform_matrix() - expected).norm() < 1e-12);
        let round_trip = mesh.inverse_transform() * mesh.transform_matrix();
        assert!((round_trip - Mat4::identity()).norm() < 1e-9);
        // rotating +z by 90 degrees about y gives +x
        for triangle in mesh.triangles() {
            assert!((triangle.normal - Vec3f::x()).norm() < 1e-9);
            assert!((triangle.vertices[0].x + 2.0).abs() < 1e-9);
        }
    }
}
