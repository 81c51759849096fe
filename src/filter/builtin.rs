/// CPU filter engine on top of the `image` crate
use image::Rgba;

use super::FilterEngine;
use crate::error::FilterError;
use crate::state::data::ImageHandle;
use crate::state::settings::FilterKind;

/// Sepia tone matrix (rows produce R, G, B)
const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Rec. 709 luma weights
const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Contrast boost applied around mid-grey by the mono filter
const MONO_CONTRAST: f32 = 1.1;

/// Default engine used by the app
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEngine;

impl BuiltinEngine {
    pub fn new() -> Self {
        Self
    }
}

impl FilterEngine for BuiltinEngine {
    fn apply(
        &self,
        image: &ImageHandle,
        kind: FilterKind,
        intensity: f32,
    ) -> Result<ImageHandle, FilterError> {
        // Build the filter first, then run it
        let filter: fn(&ImageHandle, f32) -> ImageHandle = match kind {
            FilterKind::None => return Ok(image.clone()),
            FilterKind::Sepia => sepia,
            FilterKind::Mono => |image, _intensity| mono(image),
        };

        if !intensity.is_finite() {
            return Err(FilterError::EngineUnavailable(format!(
                "cannot build {kind} filter with intensity {intensity}"
            )));
        }
        if image.is_empty() {
            return Err(FilterError::ProcessingFailed(format!(
                "{kind} filter got an empty {}x{} image",
                image.width(),
                image.height()
            )));
        }

        Ok(filter(image, intensity.clamp(0.0, 1.0)))
    }
}

/// Blend each pixel towards its sepia tone by `intensity`
fn sepia(image: &ImageHandle, intensity: f32) -> ImageHandle {
    let mut buf = image.pixels().clone();

    for pixel in buf.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let (rf, gf, bf) = (r as f32, g as f32, b as f32);
        let toned = SEPIA.map(|row| (rf * row[0] + gf * row[1] + bf * row[2]).min(255.0));
        *pixel = Rgba([
            lerp(rf, toned[0], intensity),
            lerp(gf, toned[1], intensity),
            lerp(bf, toned[2], intensity),
            a,
        ]);
    }

    ImageHandle::new(buf)
}

/// Luma grayscale with a slight contrast boost
fn mono(image: &ImageHandle) -> ImageHandle {
    let mut buf = image.pixels().clone();

    for pixel in buf.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let luma = r as f32 * LUMA[0] + g as f32 * LUMA[1] + b as f32 * LUMA[2];
        let v = ((luma - 127.5) * MONO_CONTRAST + 127.5).round().clamp(0.0, 255.0) as u8;
        *pixel = Rgba([v, v, v, a]);
    }

    ImageHandle::new(buf)
}

fn lerp(from: f32, to: f32, t: f32) -> u8 {
    (from + (to - from) * t).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn sample() -> ImageHandle {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([200, 120, 40, 255]));
        img.put_pixel(1, 0, Rgba([10, 90, 250, 128]));
        ImageHandle::new(img)
    }

    #[test]
    fn test_none_is_identity() {
        let engine = BuiltinEngine::new();
        for intensity in [0.0, 0.5, 1.0, f32::NAN] {
            let out = engine.apply(&sample(), FilterKind::None, intensity).unwrap();
            assert_eq!(out, sample());
        }
    }

    #[test]
    fn test_sepia_zero_intensity_is_identity() {
        let out = BuiltinEngine.apply(&sample(), FilterKind::Sepia, 0.0).unwrap();
        assert_eq!(out, sample());
    }

    #[test]
    fn test_sepia_full_intensity_matches_matrix() {
        let img = ImageHandle::solid(1, 1, [100, 100, 100, 255]);
        let out = BuiltinEngine.apply(&img, FilterKind::Sepia, 1.0).unwrap();
        // 100 * (0.393 + 0.769 + 0.189) = 135.1, etc.
        assert_eq!(out.pixels().get_pixel(0, 0).0, [135, 120, 94, 255]);
    }

    #[test]
    fn test_sepia_is_monotonic_in_intensity() {
        let img = ImageHandle::solid(1, 1, [100, 100, 100, 255]);
        let mut last_red = 0;
        for step in 0..=10 {
            let out = BuiltinEngine.apply(&img, FilterKind::Sepia, step as f32 / 10.0).unwrap();
            let red = out.pixels().get_pixel(0, 0).0[0];
            assert!(red >= last_red);
            last_red = red;
        }
    }

    #[test]
    fn test_mono_ignores_intensity() {
        let low = BuiltinEngine.apply(&sample(), FilterKind::Mono, 0.0).unwrap();
        let high = BuiltinEngine.apply(&sample(), FilterKind::Mono, 1.0).unwrap();
        assert_eq!(low, high);
        let [r, g, b, a] = low.pixels().get_pixel(1, 0).0;
        assert_eq!((r, r), (g, b));
        assert_eq!(a, 128);
    }

    #[test]
    fn test_empty_image_fails_processing() {
        let empty = ImageHandle::new(RgbaImage::new(0, 0));
        let err = BuiltinEngine.apply(&empty, FilterKind::Sepia, 0.5).unwrap_err();
        assert!(matches!(err, FilterError::ProcessingFailed(_)));
    }

    #[test]
    fn test_non_finite_intensity_is_engine_unavailable() {
        let err = BuiltinEngine.apply(&sample(), FilterKind::Sepia, f32::NAN).unwrap_err();
        assert!(matches!(err, FilterError::EngineUnavailable(_)));
    }
}
