//! Monochrome bit packing.
//!
//! ```text
//! Byte value 0x1D = 00011101 = ░░░███░█
//! ```
//!
//! Bit 7 (MSB) is the leftmost dot of each byte, a set bit prints black.

use image::Rgba;

use crate::{flatten::premultiply, Matrix, PixelReadable};

/// Bytes needed to store one scanline of `width` pixels.
pub fn row_width(width: u32) -> usize {
    (width as usize + 7) / 8
}

/// 16-bit gray value of a pixel.
pub fn luminance(pixel: Rgba<u16>) -> u16 {
    let [r, g, b, _] = premultiply(pixel);
    ((19595 * r + 38470 * g + 7471 * b + (1 << 15)) >> 16) as u16
}

/// Whether a pixel is printed as a black dot.
pub fn is_dark(pixel: Rgba<u16>) -> bool {
    luminance(pixel) < u16::MAX / 2
}

/// Threshold a raster into rows of packed bits.
///
/// Unused low bits of the last byte in a row stay zero.
pub fn pack<R: PixelReadable + ?Sized>(raster: &R) -> Matrix {
    let (width, height) = raster.size();
    let row_width = row_width(width);

    (0..height)
        .map(|y| {
            let mut row = vec![0u8; row_width];
            for x in 0..width {
                if is_dark(raster.pixel_at(x, y)) {
                    row[(x / 8) as usize] |= 0x80 >> (x % 8);
                }
            }
            row
        })
        .collect()
}

/// Render a row as upper-case hex, two digits per byte.
pub fn hex_encode(row: &[u8]) -> String {
    hex::encode_upper(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use pretty_assertions::assert_eq;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn row_width_rounds_up() {
        assert_eq!(row_width(0), 0);
        assert_eq!(row_width(1), 1);
        assert_eq!(row_width(8), 1);
        assert_eq!(row_width(24), 3);
        assert_eq!(row_width(25), 4);
    }

    #[test]
    fn threshold_is_half_of_max() {
        assert!(is_dark(Rgba([0, 0, 0, 0xffff])));
        assert!(is_dark(Rgba([0x7ffe, 0x7ffe, 0x7ffe, 0xffff])));
        assert!(!is_dark(Rgba([0x7fff, 0x7fff, 0x7fff, 0xffff])));
        assert!(!is_dark(Rgba([0xffff, 0xffff, 0xffff, 0xffff])));
    }

    #[test]
    fn pack_is_msb_first_and_zero_padded() {
        let mut img = RgbaImage::from_pixel(10, 2, Rgba([255, 255, 255, 255]));
        img.put_pixel(0, 0, BLACK);
        img.put_pixel(7, 0, BLACK);
        img.put_pixel(9, 1, BLACK);

        assert_eq!(pack(&img), vec![vec![0x81, 0x00], vec![0x00, 0x40]]);
    }

    #[test]
    fn pack_empty_raster() {
        assert!(pack(&RgbaImage::new(16, 0)).is_empty());
        assert_eq!(pack(&RgbaImage::new(0, 2)), vec![Vec::<u8>::new(), Vec::new()]);
    }

    #[test]
    fn hex_is_upper_case() {
        assert_eq!(hex_encode(&[0x01, 0xC0, 0x0F, 0xAB]), "01C00FAB");
        assert_eq!(hex_encode(&[]), "");
    }
}
