use std::time::Instant;

use indicatif::{ParallelProgressIterator, ProgressBar};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use crate::algebra::Fp;
use crate::camera::Camera;
use crate::framebuffer::{color_to_pixel, Framebuffer};
use crate::scene::{Color, Scene};
use crate::shading::Tracer;

/// Independent generator for one pixel, so the image does not depend on
/// how rows are scheduled across threads.
pub fn pixel_rng(seed: u64, index: usize) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Average color of pixel `(x, y)`. Without anti-aliasing a single ray goes
/// through the pixel center, otherwise `aa` rays are jittered inside it.
/// Every ray is traced `scene.samples` times.
pub fn render_pixel<R: Rng + ?Sized>(
    tracer: &Tracer,
    camera: &Camera,
    (x, y): (usize, usize),
    (width, height): (usize, usize),
    rng: &mut R,
) -> Color {
    let samples = tracer.scene.samples.max(1);
    let aa = camera.options.aa;
    let rays = aa.max(1);

    let mut color = Color::zeros();
    for _ in 0..rays {
        let (dx, dy) = if aa == 0 {
            (0.5, 0.5)
        } else {
            (rng.gen::<Fp>(), rng.gen::<Fp>())
        };
        let ray = camera.ray(x as Fp + dx, y as Fp + dy, width, height);
        let mut ray_color = Color::zeros();
        for _ in 0..samples {
            ray_color += tracer.trace_primary(&ray, rng);
        }
        color += ray_color / samples as Fp;
    }
    color / rays as Fp
}

/// Renders the scene into `framebuffer`, sized by the framebuffer itself.
pub fn render(scene: &Scene, camera: &Camera, framebuffer: &mut Framebuffer) {
    render_with_progress(scene, camera, framebuffer, &ProgressBar::hidden());
}

pub fn render_with_progress(
    scene: &Scene,
    camera: &Camera,
    framebuffer: &mut Framebuffer,
    progress: &ProgressBar,
) {
    let (width, height) = (framebuffer.width(), framebuffer.height());
    if width == 0 || height == 0 {
        log::warn!("nothing to render into a {}x{} framebuffer", width, height);
        return;
    }
    let tracer = Tracer::new(scene, camera);
    log::info!(
        "rendering {}x{}: {} primitives, {} mesh triangles, {} lights, aa {}, samples {}",
        width,
        height,
        scene.primitives.len(),
        scene.triangle_count(),
        scene.lights.len(),
        camera.options.aa,
        scene.samples.max(1)
    );
    let start = Instant::now();
    progress.set_length(height as u64);

    let seed = camera.options.seed;
    framebuffer
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .progress_with(progress.clone())
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let mut rng = pixel_rng(seed, y * width + x);
                let color = render_pixel(&tracer, camera, (x, y), (width, height), &mut rng);
                *pixel = color_to_pixel(&color);
            }
        });

    progress.finish();
    log::info!("render finished in {:.2?}", start.elapsed());
}
