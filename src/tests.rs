use crate::algebra::{rotation, translation, Point3f, Vec3f};
use crate::camera::{Camera, RenderOptions};
use crate::framebuffer::{pack_rgb, unpack_rgb, Framebuffer};
use crate::geometry::Ray;
use crate::mesh::Mesh;
use crate::rendering::{pixel_rng, render};
use crate::scene::{Color, Light, Material, Primitive, Scene};
use crate::shading::Tracer;
use crate::wavefront::parse_obj;

fn forward_camera(background: Color) -> Camera {
    Camera::new(&-Vec3f::z(), &Vec3f::y(), &Point3f::origin()).with_background(background)
}

fn sphere_scene() -> Scene {
    let mut scene = Scene::new(Color::new(0.1, 0.1, 0.1));
    let red = scene.add_material(Material::matte("red", Color::new(1.0, 0.1, 0.1)));
    scene
        .primitives
        .push(Primitive::sphere(Point3f::new(0.0, 0.0, -5.0), 1.0, Some(red)));
    scene.lights.push(Light::distant(
        Vec3f::new(0.0, 0.0, -1.0),
        Color::new(1.0, 1.0, 1.0),
        Color::new(1.0, 1.0, 1.0),
    ));
    scene
}

#[test]
fn test_sphere_in_center_of_frame() {
    let scene = sphere_scene();
    let camera = forward_camera(Color::new(0.0, 1.0, 0.0));
    let background = pack_rgb(0, 255, 0);
    let mut fb = Framebuffer::new(32, 32);
    render(&scene, &camera, &mut fb);

    assert_ne!(fb.get(16, 16), Some(background));
    let [r, _, _] = unpack_rgb(fb.get(16, 16).unwrap());
    assert!(r > 200);
    for (x, y) in [(0, 0), (31, 0), (0, 31), (31, 31)] {
        assert_eq!(fb.get(x, y), Some(background), "corner ({}, {})", x, y);
    }
}

fn flat_material() -> Material {
    Material {
        name: "flat".to_string(),
        ambient_color: Color::new(0.5, 0.25, 1.0),
        ka: 1.0,
        ..Default::default()
    }
}

/// A 2x2 rectangle one unit in front of a 90 degree camera covers the image
/// edge to edge, including pixel centers on the shared diagonal.
fn assert_fills_frame(scene: &Scene) {
    let camera = forward_camera(Color::zeros());
    let expected = pack_rgb(127, 63, 255);
    for size in [8, 9, 16, 33] {
        let mut fb = Framebuffer::new(size, size);
        render(scene, &camera, &mut fb);
        let holes = fb.pixels().iter().filter(|&&p| p != expected).count();
        assert_eq!(holes, 0, "{} pixels missed at {}x{}", holes, size, size);
    }
}

#[test]
fn test_obj_rectangle_fills_frame() {
    let obj = parse_obj(
        "v -1 -1 -1\n\
         v 1 -1 -1\n\
         v 1 1 -1\n\
         v -1 1 -1\n\
         f 1 2 3\n\
         f 1 3 4\n",
    )
    .unwrap();
    let mut scene = Scene::new(Color::new(1.0, 1.0, 1.0));
    let flat = scene.add_material(flat_material());
    scene
        .meshes
        .push(Mesh::from_indexed(&obj.vertices, &obj.faces, Some(flat)).unwrap());
    assert_fills_frame(&scene);
}

#[test]
fn test_transformed_rectangle_fills_frame() {
    let mut scene = Scene::new(Color::new(1.0, 1.0, 1.0));
    let flat = scene.add_material(flat_material());
    let mut rectangle = Mesh::rectangle_wh(2.0, 2.0, Some(flat));
    rectangle.transform(&(translation(-1.0, -1.0, -1.0) * rotation(90.0, &Vec3f::x())));
    scene.meshes.push(rectangle);
    assert_fills_frame(&scene);
}

#[test]
fn test_ambient_only_shading_is_exact() {
    let mut scene = Scene::new(Color::new(0.6, 0.6, 0.6));
    let grey = scene.add_material(Material {
        name: "grey".to_string(),
        ambient_color: Color::new(1.0, 1.0, 1.0),
        diffuse_color: Color::new(1.0, 1.0, 1.0),
        ka: 0.5,
        kd: 1.0,
        ..Default::default()
    });
    scene
        .primitives
        .push(Primitive::plane(Point3f::new(0.0, 0.0, -10.0), Vec3f::z(), Some(grey)));
    scene
        .primitives
        .push(Primitive::sphere(Point3f::new(1.0, 0.0, -5.0), 1.0, Some(grey)));
    scene.meshes.push(Mesh::rectangle(
        Point3f::new(-2.0, -1.0, -3.0),
        Point3f::new(-0.5, -1.0, -3.0),
        Point3f::new(-0.5, 1.0, -3.0),
        Point3f::new(-2.0, 1.0, -3.0),
        Some(grey),
    ));

    let camera = forward_camera(Color::new(1.0, 0.0, 0.0));
    let tracer = Tracer::new(&scene, &camera);
    let mut rng = pixel_rng(0, 0);
    let expected = Color::new(0.3, 0.3, 0.3);
    // sphere, mesh triangle and plane, each checked by the depth of the hit
    for (target, depth) in [
        (Point3f::new(1.0, 0.0, -5.0), -5.0 + 5.0 / 26.0_f64.sqrt()),
        (Point3f::new(-1.5, 0.5, -3.0), -3.0),
        (Point3f::new(0.0, 3.0, -10.0), -10.0),
    ] {
        let ray = Ray::new(Point3f::origin(), target.coords);
        let hit = scene.nearest_hit(&ray).unwrap();
        assert!((hit.intersection.point.z - depth).abs() < 1e-9);
        assert!((tracer.trace_primary(&ray, &mut rng) - expected).norm() < 1e-12);
    }

    // the plane fills every pixel not covered by the other surfaces
    let mut fb = Framebuffer::new(16, 12);
    render(&scene, &camera, &mut fb);
    assert!(fb.pixels().iter().all(|&p| p == pack_rgb(76, 76, 76)));

    // ambient beyond one clamps
    scene.ambient_light = Color::new(3.0, 3.0, 3.0);
    let tracer = Tracer::new(&scene, &camera);
    let ray = Ray::new(Point3f::origin(), -Vec3f::z());
    assert_eq!(tracer.trace_primary(&ray, &mut rng), Color::new(1.0, 1.0, 1.0));
}

#[test]
fn test_ambient_only_energy_bound() {
    let ambient = 0.3;
    let mut scene = Scene::new(Color::new(ambient, ambient, ambient));
    let white = scene.add_material(Material {
        name: "white".to_string(),
        ambient_color: Color::new(1.0, 1.0, 1.0),
        diffuse_color: Color::new(1.0, 1.0, 1.0),
        ka: 1.0,
        kd: 1.0,
        ..Default::default()
    });
    scene
        .primitives
        .push(Primitive::sphere(Point3f::new(0.5, 0.0, -4.0), 1.0, Some(white)));
    scene
        .primitives
        .push(Primitive::plane(Point3f::new(0.0, -1.0, 0.0), Vec3f::y(), Some(white)));
    let mut panel = Mesh::rectangle_wh(2.0, 2.0, Some(white));
    panel.transform(&translation(-1.0, 0.5, -3.0));
    scene.meshes.push(panel);

    let camera = forward_camera(Color::zeros()).with_options(RenderOptions {
        aa: 2,
        ..Default::default()
    });
    let mut fb = Framebuffer::new(24, 16);
    render(&scene, &camera, &mut fb);

    let bound = (255.0 * ambient) as u8;
    assert!(fb
        .pixels()
        .iter()
        .all(|&p| unpack_rgb(p).iter().all(|&c| c <= bound)));
    assert!(fb.pixels().iter().any(|&p| p != 0));
}

#[test]
fn test_seed_controls_noise() {
    let mut scene = sphere_scene();
    let floor = scene.add_material(Material::matte("floor", Color::new(0.7, 0.7, 0.7)));
    scene
        .primitives
        .push(Primitive::plane(Point3f::new(0.0, -1.0, 0.0), Vec3f::y(), Some(floor)));
    scene.global_illumination = true;

    let render_with_seed = |seed: u64| {
        let camera = forward_camera(Color::new(0.5, 0.6, 0.9)).with_options(RenderOptions {
            aa: 1,
            seed,
            ..Default::default()
        });
        let mut fb = Framebuffer::new(20, 20);
        render(&scene, &camera, &mut fb);
        fb
    };
    assert_eq!(render_with_seed(3), render_with_seed(3));
    assert_ne!(render_with_seed(3), render_with_seed(4));
}
