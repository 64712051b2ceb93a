use std::path::Path;

use image::{imageops, imageops::FilterType, Rgba, RgbaImage};

use crate::error::CardError;

const GRADIENT_TOP: [u8; 3] = [18, 16, 40];
const GRADIENT_BOTTOM: [u8; 3] = [70, 24, 92];

/// What the card is drawn on top of.
#[derive(Debug, Clone)]
pub enum Background {
    /// A decoded image, scaled to cover the card.
    Image(RgbaImage),
    /// Generated vertical gradient, used when no image is configured.
    Gradient,
}

impl Background {
    /// Loads the background from `path`, or falls back to the gradient when
    /// `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::BackgroundFile`] if the file cannot be read or
    /// decoded.
    pub fn load(path: Option<&Path>) -> Result<Self, CardError> {
        let Some(path) = path else {
            return Ok(Self::Gradient);
        };
        let image = image::open(path).map_err(|source| CardError::BackgroundFile {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "loaded card background"
        );
        Ok(Self::Image(image.to_rgba8()))
    }

    /// # Errors
    ///
    /// Returns [`CardError::BackgroundDecode`] if `bytes` is not a supported
    /// image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CardError> {
        let image = image::load_from_memory(bytes).map_err(CardError::BackgroundDecode)?;
        Ok(Self::Image(image.to_rgba8()))
    }

    /// A `width`×`height` canvas filled with this background.
    #[must_use]
    pub fn canvas(&self, width: u32, height: u32) -> RgbaImage {
        match self {
            Self::Image(image) => cover(image, width, height),
            Self::Gradient => gradient(width, height),
        }
    }
}

/// Scales `image` to fill `width`×`height`, cropping the overflow evenly.
fn cover(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.width() == 0 || image.height() == 0 {
        return gradient(width, height);
    }
    let scale = f64::max(
        f64::from(width) / f64::from(image.width()),
        f64::from(height) / f64::from(image.height()),
    );
    let scaled_w = scaled(image.width(), scale).max(width);
    let scaled_h = scaled(image.height(), scale).max(height);
    let resized = imageops::resize(image, scaled_w, scaled_h, FilterType::Triangle);
    let x = (scaled_w - width) / 2;
    let y = (scaled_h - height) / 2;
    imageops::crop_imm(&resized, x, y, width, height).to_image()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled(len: u32, scale: f64) -> u32 {
    (f64::from(len) * scale).ceil() as u32
}

fn gradient(width: u32, height: u32) -> RgbaImage {
    let span = height.saturating_sub(1).max(1);
    RgbaImage::from_fn(width, height, |_, y| {
        let mut px = [0u8; 4];
        for (i, channel) in px.iter_mut().take(3).enumerate() {
            *channel = lerp(GRADIENT_TOP[i], GRADIENT_BOTTOM[i], y, span);
        }
        px[3] = 255;
        Rgba(px)
    })
}

fn lerp(from: u8, to: u8, step: u32, span: u32) -> u8 {
    let from = i64::from(from);
    let to = i64::from(to);
    let value = from + (to - from) * i64::from(step) / i64::from(span);
    u8::try_from(value.clamp(0, 255)).unwrap_or(u8::MAX)
}
