//! Alpha flattening.
//!
//! Label printers have no notion of transparency, so every pixel is blended
//! against an opaque white background before it is thresholded.

use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba, RgbaImage};

/// Read access to a raster, 16 bits per channel, non-premultiplied RGBA.
pub trait PixelReadable {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    fn pixel_at(&self, x: u32, y: u32) -> Rgba<u16>;
}

/// Write access to a raster.
///
/// Kept apart from [`PixelReadable`] so that conversion inputs only need to
/// be readable, while the flattening target has to be both.
pub trait PixelWritable {
    fn set_pixel(&mut self, x: u32, y: u32, pixel: Rgba<u16>);
}

/// Raster where every pixel is fully opaque, as produced by [`flatten`].
pub type OpaqueRaster = RgbaImage;

const WHITE: Rgba<u16> = Rgba([u16::MAX; 4]);

fn widen(pixel: Rgba<u8>) -> Rgba<u16> {
    Rgba(pixel.0.map(|v| u16::from(v) * 257))
}

/// Scale the color channels by alpha, returning 32-bit channel values.
pub(crate) fn premultiply(pixel: Rgba<u16>) -> [u32; 4] {
    let [r, g, b, a] = pixel.0.map(u32::from);
    [r * a / 0xffff, g * a / 0xffff, b * a / 0xffff, a]
}

impl PixelReadable for RgbaImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn pixel_at(&self, x: u32, y: u32) -> Rgba<u16> {
        widen(*self.get_pixel(x, y))
    }
}

impl PixelWritable for RgbaImage {
    fn set_pixel(&mut self, x: u32, y: u32, pixel: Rgba<u16>) {
        self.put_pixel(x, y, Rgba(pixel.0.map(|v| (v >> 8) as u8)));
    }
}

impl PixelReadable for ImageBuffer<Rgba<u16>, Vec<u16>> {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn pixel_at(&self, x: u32, y: u32) -> Rgba<u16> {
        *self.get_pixel(x, y)
    }
}

impl PixelReadable for DynamicImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn pixel_at(&self, x: u32, y: u32) -> Rgba<u16> {
        // 16-bit variants are read at full depth, everything else through
        // the 8-bit view.
        match self {
            DynamicImage::ImageRgba16(img) => *img.get_pixel(x, y),
            DynamicImage::ImageRgb16(img) => {
                let [r, g, b] = img.get_pixel(x, y).0;
                Rgba([r, g, b, u16::MAX])
            }
            DynamicImage::ImageLuma16(img) => {
                let [l] = img.get_pixel(x, y).0;
                Rgba([l, l, l, u16::MAX])
            }
            DynamicImage::ImageLumaA16(img) => {
                let [l, a] = img.get_pixel(x, y).0;
                Rgba([l, l, l, a])
            }
            _ => widen(self.get_pixel(x, y)),
        }
    }
}

/// Blend one pixel against `background`, returning an opaque 8-bit pixel.
///
/// Background and foreground contributions are combined with a bitwise OR,
/// not an addition. Existing printed output depends on this exact rounding,
/// so it must not be replaced by a regular "over" operator.
pub fn flatten_pixel(pixel: Rgba<u16>, background: Rgba<u16>) -> Rgba<u8> {
    let [r, g, b, a] = premultiply(pixel);
    let [bg_r, bg_g, bg_b, _] = background.0.map(u32::from);
    let alpha = a as f32 / 0xffff as f32;

    let conv = |c: u32, bg: u32| -> u8 {
        let mut val = 0xffff - (bg as f32 * alpha) as u32;
        val |= (c as f32 * alpha) as u32;
        (val >> 8) as u8
    };

    Rgba([conv(r, bg_r), conv(g, bg_g), conv(b, bg_b), u8::MAX])
}

/// Flatten `source` onto white into an existing `target`.
///
/// Only the area both rasters cover is written.
pub fn flatten_into<S, T>(source: &S, target: &mut T)
where
    S: PixelReadable + ?Sized,
    T: PixelReadable + PixelWritable + ?Sized,
{
    let (width, height) = source.size();
    let (target_width, target_height) = target.size();

    for y in 0..height.min(target_height) {
        for x in 0..width.min(target_width) {
            let flat = flatten_pixel(source.pixel_at(x, y), WHITE);
            target.set_pixel(x, y, widen(flat));
        }
    }
}

/// Flatten `source` onto an opaque white background.
pub fn flatten<S: PixelReadable + ?Sized>(source: &S) -> OpaqueRaster {
    let (width, height) = source.size();
    let mut target = RgbaImage::new(width, height);
    flatten_into(source, &mut target);
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn opaque_pixel_passes_through() {
        let pixel = Rgba([0x1234, 0xabcd, 0x00ff, 0xffff]);
        assert_eq!(flatten_pixel(pixel, WHITE), Rgba([0x12, 0xab, 0x00, 0xff]));
    }

    #[test]
    fn transparent_pixel_becomes_background() {
        for pixel in [Rgba([0, 0, 0, 0]), Rgba([0xffff, 0x1234, 0, 0])] {
            assert_eq!(flatten_pixel(pixel, WHITE), Rgba([0xff; 4]));
        }
    }

    #[test]
    fn half_transparent_white_uses_bitwise_blend() {
        // 0x7fff | 0x4000 stays 0x7fff; an additive blend would give 0xbf.
        let pixel = Rgba([0xffff, 0xffff, 0xffff, 0x8000]);
        assert_eq!(flatten_pixel(pixel, WHITE), Rgba([0x7f, 0x7f, 0x7f, 0xff]));
    }

    #[test]
    fn flatten_keeps_dimensions_and_forces_alpha() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(1, 1, Rgba([10, 20, 30, 255]));

        let flat = flatten(&img);

        assert_eq!(flat.dimensions(), (3, 2));
        assert_eq!(*flat.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*flat.get_pixel(1, 1), Rgba([10, 20, 30, 255]));
        assert!(flat.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn flatten_into_clips_to_target() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let mut target = RgbaImage::from_pixel(2, 3, Rgba([1, 2, 3, 4]));

        flatten_into(&img, &mut target);

        assert!(target.pixels().all(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn dynamic_image_reads_16_bit_channels() {
        let img = ImageBuffer::<Rgba<u16>, _>::from_pixel(1, 1, Rgba([0x1234, 2, 3, 0xffff]));
        let dynamic = DynamicImage::ImageRgba16(img);
        assert_eq!(dynamic.pixel_at(0, 0), Rgba([0x1234, 2, 3, 0xffff]));

        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(1, 1, image::Luma([0x80])));
        assert_eq!(gray.pixel_at(0, 0), Rgba([0x8080, 0x8080, 0x8080, 0xffff]));
    }
}
