use std::path::PathBuf;

use anyhow::{bail, Context};
use indicatif::{ProgressBar, ProgressStyle};

use phong_tracer::aabb::Aabb;
use phong_tracer::algebra::{rotation, scaling, translation, Point3f, Vec3f};
use phong_tracer::wavefront::load_mesh;
use phong_tracer::{
    render_with_progress, Camera, Color, Framebuffer, Light, Material, Mesh, Primitive,
    RenderOptions, Scene,
};

const USAGE: &str = "usage: phong-tracer <output.ppm|output.png> [mesh.obj] [width height] [samples]";

struct Args {
    output: PathBuf,
    mesh: Option<PathBuf>,
    width: usize,
    height: usize,
    samples: u32,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = std::env::args().skip(1).peekable();
    let Some(output) = args.next() else {
        bail!(USAGE);
    };
    let mesh = args
        .next_if(|arg| arg.to_ascii_lowercase().ends_with(".obj"))
        .map(PathBuf::from);
    let rest: Vec<String> = args.collect();
    let number = |index: usize, name: &str| -> anyhow::Result<Option<u64>> {
        rest.get(index)
            .map(|value| {
                value
                    .parse::<u64>()
                    .with_context(|| format!("{} must be a number, got {:?}\n{}", name, value, USAGE))
            })
            .transpose()
    };
    let (width, height, samples) = match rest.len() {
        0 => (640, 480, 1),
        1 => (640, 480, number(0, "samples")?.unwrap_or(1)),
        2 | 3 => (
            number(0, "width")?.unwrap_or(640),
            number(1, "height")?.unwrap_or(480),
            number(2, "samples")?.unwrap_or(1),
        ),
        _ => bail!(USAGE),
    };
    Ok(Args {
        output: PathBuf::from(output),
        mesh,
        width: width as usize,
        height: height as usize,
        samples: samples.try_into().context("samples out of range")?,
    })
}

fn build_scene(args: &Args) -> anyhow::Result<Scene> {
    let mut scene = Scene::new(Color::new(0.2, 0.2, 0.25));
    scene.samples = args.samples;
    scene.global_illumination = args.samples > 1;

    let floor = scene.add_material(Material::matte("floor", Color::new(0.8, 0.8, 0.75)));
    let red = scene.add_material(Material::matte("red", Color::new(0.9, 0.15, 0.1)));
    let blue = scene.add_material(Material {
        shininess: 128.0,
        ks: 0.6,
        kd: 0.4,
        ..Material::matte("blue", Color::new(0.15, 0.3, 0.9))
    });
    let lamp = scene.add_material(Material::emitter(
        "lamp",
        Color::new(0.9, 0.85, 0.7),
        Color::new(0.1, 0.1, 0.1),
    ));

    scene
        .primitives
        .push(Primitive::plane(Point3f::new(0.0, -1.0, 0.0), Vec3f::y(), Some(floor)));
    scene
        .primitives
        .push(Primitive::sphere(Point3f::new(-1.2, -0.2, -5.0), 0.8, Some(red)));
    scene
        .primitives
        .push(Primitive::sphere(Point3f::new(1.1, -0.4, -4.2), 0.6, Some(blue)));
    scene.primitives.push(Primitive::disk(
        Point3f::new(0.0, 3.0, -4.5),
        -Vec3f::y(),
        0.7,
        Some(lamp),
    ));

    let mut back_wall = Mesh::rectangle_wh(12.0, 6.0, Some(floor));
    back_wall.transform(&(translation(-6.0, -1.0, -8.0) * rotation(90.0, &Vec3f::x())));
    scene.meshes.push(back_wall);

    if let Some(path) = &args.mesh {
        let model = scene.add_material(Material::matte("model", Color::new(0.3, 0.8, 0.3)));
        let mut mesh = load_mesh(path, Some(model))
            .with_context(|| format!("failed to load mesh {}", path.display()))?;
        mesh.transform(&(translation(0.0, -1.0, -3.5) * scaling(0.5, 0.5, 0.5)));
        scene.meshes.push(mesh);
    }

    scene.lights.push(Light::distant(
        Vec3f::new(-0.4, -1.0, -0.6),
        Color::new(0.35, 0.35, 0.35),
        Color::new(0.3, 0.3, 0.3),
    ));
    scene.lights.push(Light::local(
        Point3f::new(3.0, 2.0, -2.0),
        Color::new(0.25, 0.2, 0.2),
        Color::new(0.4, 0.4, 0.4),
    ));
    scene.lights.push(Light::area(
        Point3f::new(0.0, 3.0, -4.5),
        Aabb::from_limits([-0.5, 0.5], [3.0, 3.0], [-5.0, -4.0]),
    ));
    Ok(scene)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;
    if args.width == 0 || args.height == 0 {
        bail!("image size must be positive, got {}x{}", args.width, args.height);
    }
    let scene = build_scene(&args)?;
    let camera = Camera::new(&-Vec3f::z(), &Vec3f::y(), &Point3f::new(0.0, 0.5, 1.0))
        .with_background(Color::new(0.05, 0.05, 0.1))
        .with_options(RenderOptions {
            fov: 60.0,
            aa: 2,
            ..Default::default()
        });

    let mut framebuffer = Framebuffer::new(args.width, args.height);
    let progress = ProgressBar::new(args.height as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar}] {pos}/{len} rows {eta}")?
            .progress_chars("#>-"),
    );
    render_with_progress(&scene, &camera, &mut framebuffer, &progress);

    framebuffer
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}
