//! Image edits applied before conversion.

use std::str::FromStr;

use image::{imageops::FilterType, DynamicImage, GrayImage, Luma, Rgba};
use imageproc::gradients::sobel_gradients;

use crate::Error;

/// An image manipulation, in the order edits are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Edit {
    /// Snap every pixel to black or white.
    Monochrome,
    /// Gaussian blur scaled to the image width.
    Blur,
    /// Sobel edge detection.
    Edge,
    /// Luma threshold at 128.
    Segment,
    /// Invert colors, alpha is kept.
    Invert,
}

impl FromStr for Edit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monochrome" => Ok(Self::Monochrome),
            "blur" => Ok(Self::Blur),
            "edge" => Ok(Self::Edge),
            "segment" => Ok(Self::Segment),
            "invert" => Ok(Self::Invert),
            other => Err(Error::UnknownEdit(other.to_string())),
        }
    }
}

impl Edit {
    /// Parse a comma separated list like `invert,monochrome`.
    pub fn parse_list(list: &str) -> Result<Vec<Edit>, Error> {
        list.split(',')
            .filter(|name| !name.trim().is_empty())
            .map(|name| name.parse::<Edit>())
            .collect()
    }

    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Self::Monochrome => monochrome(img),
            Self::Blur => {
                let sigma = img.width() as f32 / 300.0;
                img.blur(sigma)
            }
            Self::Edge => DynamicImage::ImageLuma8(sobel(&img.to_luma8())),
            Self::Segment => {
                let mut luma = img.to_luma8();
                for pixel in luma.pixels_mut() {
                    pixel.0[0] = if pixel.0[0] >= 128 { 255 } else { 0 };
                }
                DynamicImage::ImageLuma8(luma)
            }
            Self::Invert => {
                let mut img = img;
                img.invert();
                img
            }
        }
    }
}

/// Apply edits in their fixed order, whatever order they were given in.
pub fn apply_edits(img: DynamicImage, edits: &[Edit]) -> DynamicImage {
    let mut edits = edits.to_vec();
    edits.sort();
    edits.dedup();
    edits.into_iter().fold(img, |img, edit| edit.apply(img))
}

/// Scale by `factor` with a Catmull-Rom filter.
pub fn resize(img: DynamicImage, factor: f64) -> Result<DynamicImage, Error> {
    if !(factor > 0.0 && factor.is_finite()) {
        return Err(Error::InvalidConfig(format!("resize factor {}", factor)));
    }
    if factor == 1.0 {
        return Ok(img);
    }

    let width = (img.width() as f64 * factor) as u32;
    let height = (img.height() as f64 * factor) as u32;
    Ok(img.resize_exact(width, height, FilterType::CatmullRom))
}

fn monochrome(img: DynamicImage) -> DynamicImage {
    let mut rgba = img.to_rgba8();
    for pixel in rgba.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let value = if r > 127 || g > 127 || b > 127 { 255 } else { 0 };
        *pixel = Rgba([value, value, value, a]);
    }
    DynamicImage::ImageRgba8(rgba)
}

/// Sobel gradient magnitude, saturated to 8 bits.
fn sobel(luma: &GrayImage) -> GrayImage {
    let gradients = sobel_gradients(luma);
    GrayImage::from_fn(luma.width(), luma.height(), |x, y| {
        let magnitude = gradients.get_pixel(x, y).0[0];
        Luma([magnitude.min(u16::from(u8::MAX)) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_edit_list() {
        assert_eq!(
            Edit::parse_list("invert, monochrome").unwrap(),
            vec![Edit::Invert, Edit::Monochrome]
        );
        assert!(Edit::parse_list("").unwrap().is_empty());
        assert!(matches!(
            Edit::parse_list("invert,sepia"),
            Err(Error::UnknownEdit(name)) if name == "sepia"
        ));
    }

    #[test]
    fn invert_keeps_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([10, 200, 0, 77]));
        let out = apply_edits(DynamicImage::ImageRgba8(img), &[Edit::Invert]).to_rgba8();
        assert_eq!(*out.get_pixel(0, 0), Rgba([245, 55, 255, 77]));
    }

    #[test]
    fn monochrome_then_invert() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([100, 100, 100, 255]));
        img.put_pixel(1, 0, Rgba([20, 128, 20, 255]));

        // Given out of order, monochrome still runs first.
        let out = apply_edits(
            DynamicImage::ImageRgba8(img),
            &[Edit::Invert, Edit::Monochrome],
        )
        .to_rgba8();
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*out.get_pixel(1, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn segment_thresholds_luma() {
        let gray = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 127 } else { 128 }]));
        let out = Edit::Segment.apply(DynamicImage::ImageLuma8(gray)).to_luma8();
        assert_eq!(out.into_raw(), vec![0, 255]);
    }

    #[test]
    fn edge_is_flat_on_uniform_image() {
        let gray = GrayImage::from_pixel(4, 4, Luma([90]));
        let out = Edit::Edge.apply(DynamicImage::ImageLuma8(gray)).to_luma8();
        assert!(out.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn edge_detects_step() {
        let gray = GrayImage::from_fn(4, 1, |x, _| Luma([if x < 2 { 0 } else { 255 }]));
        let out = sobel(&gray);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 255);
    }

    #[test]
    fn blur_keeps_dimensions() {
        let mut img = RgbaImage::from_pixel(600, 3, Rgba([255, 255, 255, 255]));
        img.put_pixel(300, 1, Rgba([0, 0, 0, 255]));

        let out = Edit::Blur.apply(DynamicImage::ImageRgba8(img)).to_rgba8();
        assert_eq!(out.dimensions(), (600, 3));
        // The single dark dot is spread out, not kept black.
        assert!(out.get_pixel(300, 1).0[0] > 0);
    }

    #[test]
    fn resize_by_factor() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(40, 20));
        let out = resize(img.clone(), 0.5).unwrap();
        assert_eq!((out.width(), out.height()), (20, 10));
        assert_eq!(resize(img.clone(), 1.0).unwrap(), img);
        assert!(resize(img, 0.0).is_err());
    }
}
