use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::algebra::Fp;
use crate::error::{Error, Result};
use crate::scene::Color;
use crate::utils::saturate;

/// Packed `0x00RRGGBB` pixel.
pub type Pixel = u32;

pub fn pack_rgb(r: u8, g: u8, b: u8) -> Pixel {
    (r as Pixel) << 16 | (g as Pixel) << 8 | b as Pixel
}

pub fn unpack_rgb(pixel: Pixel) -> [u8; 3] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}

/// Clamps each channel to `[0, 1]` and scales it to `0..=255`, truncating.
pub fn color_to_pixel(color: &Color) -> Pixel {
    let channel = |c: Fp| (255.0 * saturate(c)) as u8;
    pack_rgb(channel(color.x), channel(color.y), channel(color.z))
}

/// Row-major image, `y = 0` is the top row.
#[derive(Clone, Debug, PartialEq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl Framebuffer {
    /// All pixels start black.
    pub fn new(width: usize, height: usize) -> Framebuffer {
        Framebuffer {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Pixel> {
        if x >= self.width {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, pixel: Pixel) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = pixel;
        }
    }

    fn check_not_empty(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Binary PPM: the header `P6 <w> <h> 255\n` followed by RGB triples.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> Result<()> {
        self.check_not_empty()?;
        writeln!(out, "P6 {} {} 255", self.width, self.height)?;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for &pixel in &self.pixels {
            bytes.extend_from_slice(&unpack_rgb(pixel));
        }
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }

    pub fn save_ppm(&self, path: &Path) -> Result<()> {
        self.check_not_empty()?;
        let file = File::create(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_ppm(&mut BufWriter::new(file))
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let mut img = RgbImage::new(self.width as u32, self.height as u32);
        for (x, y, rgb) in img.enumerate_pixels_mut() {
            rgb.0 = unpack_rgb(self.pixels[y as usize * self.width + x as usize]);
        }
        img
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.check_not_empty()?;
        self.to_rgb_image()
            .save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    /// PNG for a `.png` extension, PPM otherwise.
    pub fn save(&self, path: &Path) -> Result<()> {
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        log::info!("writing {}x{} image to {}", self.width, self.height, path.display());
        if is_png {
            self.save_png(path)
        } else {
            self.save_ppm(path)
        }
    }
}
