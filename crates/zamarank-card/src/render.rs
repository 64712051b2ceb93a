use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Pixel, Rgba, RgbaImage};
use zamarank_core::{NormalizedProfile, ProfileStatus, Timeframe};

use crate::background::Background;
use crate::error::CardError;
use crate::font::{draw_text, fit_text, text_width, GLYPH_HEIGHT};

pub const CARD_WIDTH: u32 = 1200;
pub const CARD_HEIGHT: u32 = 630;

const MARGIN: u32 = 60;
const PADDING: u32 = 40;
const COLUMN_GAP: u32 = 60;

const PANEL: Rgba<u8> = Rgba([0, 0, 0, 170]);
const ACCENT: Rgba<u8> = Rgba([255, 214, 0, 255]);
const TEXT: Rgba<u8> = Rgba([245, 245, 245, 255]);
const MUTED: Rgba<u8> = Rgba([170, 170, 190, 255]);
const WARN: Rgba<u8> = Rgba([255, 120, 90, 255]);

/// `#12`, or `-` when there is no rank.
#[must_use]
pub fn format_rank(rank: Option<i64>) -> String {
    rank.map_or_else(|| "-".to_string(), |r| format!("#{r}"))
}

/// `1.23%`, or `-` when there is no mindshare.
#[must_use]
pub fn format_mindshare(mindshare: Option<f64>) -> String {
    mindshare.map_or_else(|| "-".to_string(), |m| format!("{m:.2}%"))
}

/// Renders `profile` onto `background` and returns PNG bytes.
///
/// # Errors
///
/// Returns [`CardError::Encode`] if PNG encoding fails.
pub fn render_card(
    profile: &NormalizedProfile,
    background: &Background,
) -> Result<Vec<u8>, CardError> {
    let mut canvas = background.canvas(CARD_WIDTH, CARD_HEIGHT);

    blend_rect(
        &mut canvas,
        MARGIN,
        MARGIN,
        CARD_WIDTH - 2 * MARGIN,
        CARD_HEIGHT - 2 * MARGIN,
        PANEL,
    );
    blend_rect(&mut canvas, MARGIN, MARGIN, CARD_WIDTH - 2 * MARGIN, 8, ACCENT);

    let left = MARGIN + PADDING;
    let inner_width = CARD_WIDTH - 2 * (MARGIN + PADDING);
    let column_width = (inner_width - COLUMN_GAP) / 2;
    let right = left + column_width + COLUMN_GAP;

    draw_identity(&mut canvas, profile, left, inner_width);
    draw_seasons(&mut canvas, profile, left, column_width);
    match profile.status {
        ProfileStatus::Ok => draw_current_season(&mut canvas, profile, right, column_width),
        ProfileStatus::NotRanked => draw_not_ranked(&mut canvas, right, column_width),
    }

    let footer = "ZAMARANK";
    draw_text(
        &mut canvas,
        CARD_WIDTH - MARGIN - PADDING - text_width(footer, 2),
        CARD_HEIGHT - MARGIN - PADDING / 2 - GLYPH_HEIGHT * 2,
        footer,
        2,
        MUTED,
    );

    encode_png(canvas)
}

fn draw_identity(canvas: &mut RgbaImage, profile: &NormalizedProfile, x: u32, width: u32) {
    let top = MARGIN + PADDING;
    let handle = fit_text(&profile.handle, 8, width);
    draw_text(canvas, x, top, &handle, 8, TEXT);

    if !profile.display_name.eq_ignore_ascii_case(profile.handle.trim_start_matches('@')) {
        let name = fit_text(&profile.display_name, 4, width);
        draw_text(canvas, x, top + GLYPH_HEIGHT * 8 + 18, &name, 4, MUTED);
    }
}

const STATS_TOP: u32 = 270;
const ROW_HEIGHT: u32 = 56;

fn draw_seasons(canvas: &mut RgbaImage, profile: &NormalizedProfile, x: u32, width: u32) {
    draw_text(canvas, x, STATS_TOP, "PAST SEASONS", 3, ACCENT);
    for (i, (key, rank)) in (0u32..).zip(profile.seasons.entries()) {
        let line = format!("{key}  {}", format_rank(rank));
        let y = STATS_TOP + 44 + i * ROW_HEIGHT;
        draw_text(canvas, x, y, &fit_text(&line, 5, width), 5, TEXT);
    }
}

fn draw_current_season(canvas: &mut RgbaImage, profile: &NormalizedProfile, x: u32, width: u32) {
    draw_text(canvas, x, STATS_TOP, "SEASON 5", 3, ACCENT);
    for (i, timeframe) in (0u32..).zip(Timeframe::ALL) {
        let (rank, mindshare) = profile.s5.get(timeframe);
        let line = format!(
            "{:<4}{:<7}{}",
            timeframe.as_str(),
            format_rank(rank),
            format_mindshare(mindshare)
        );
        let y = STATS_TOP + 44 + i * ROW_HEIGHT;
        draw_text(canvas, x, y, &fit_text(&line, 4, width), 4, TEXT);
    }
}

fn draw_not_ranked(canvas: &mut RgbaImage, x: u32, width: u32) {
    draw_text(canvas, x, STATS_TOP, "SEASON 5", 3, ACCENT);
    draw_text(
        canvas,
        x,
        STATS_TOP + 60,
        &fit_text("NOT RANKED", 6, width),
        6,
        WARN,
    );
}

/// Alpha-blends `color` over the `width`×`height` rectangle at `(x, y)`.
fn blend_rect(canvas: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
    let x_end = x.saturating_add(width).min(canvas.width());
    let y_end = y.saturating_add(height).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.get_pixel_mut(px, py).blend(&color);
        }
    }
}

fn encode_png(canvas: RgbaImage) -> Result<Vec<u8>, CardError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(CardError::Encode)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zamarank_core::{CurrentSeason, SeasonsMap};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn profile(status: ProfileStatus) -> NormalizedProfile {
        let mut s5 = CurrentSeason::default();
        if status == ProfileStatus::Ok {
            s5.set(Timeframe::Day, Some(12), Some(1.234));
            s5.set(Timeframe::Week, Some(40), Some(0.5));
        }
        NormalizedProfile {
            handle: "@bob".to_string(),
            display_name: "Bob The Builder".to_string(),
            avatar: None,
            seasons: SeasonsMap {
                s1: Some(5),
                ..SeasonsMap::default()
            },
            s5,
            status,
        }
    }

    #[test]
    fn rank_and_mindshare_formatting() {
        assert_eq!(format_rank(Some(7)), "#7");
        assert_eq!(format_rank(None), "-");
        assert_eq!(format_mindshare(Some(1.234)), "1.23%");
        assert_eq!(format_mindshare(None), "-");
    }

    #[test]
    fn renders_png_of_card_size() {
        let bytes = render_card(&profile(ProfileStatus::Ok), &Background::Gradient)
            .expect("render succeeds");
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);

        let decoded = image::load_from_memory(&bytes).expect("valid PNG");
        assert_eq!(decoded.width(), CARD_WIDTH);
        assert_eq!(decoded.height(), CARD_HEIGHT);
    }

    #[test]
    fn renders_not_ranked_profile() {
        let bytes = render_card(&profile(ProfileStatus::NotRanked), &Background::Gradient)
            .expect("render succeeds");
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn renders_on_decoded_image_background() {
        let source = RgbaImage::from_pixel(64, 32, Rgba([30, 120, 200, 255]));
        let mut encoded = Vec::new();
        DynamicImage::ImageRgba8(source)
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .expect("encode fixture");

        let background = Background::from_bytes(&encoded).expect("decode fixture");
        let bytes = render_card(&profile(ProfileStatus::Ok), &background).expect("render");
        let decoded = image::load_from_memory(&bytes).expect("valid PNG").to_rgba8();

        // Outside the panel the background shows through untouched.
        let corner = decoded.get_pixel(5, 5).0;
        for (got, want) in corner.iter().zip([30u8, 120, 200, 255]) {
            assert!(got.abs_diff(want) <= 1, "corner pixel {corner:?}");
        }
    }

    #[test]
    fn panel_darkens_background() {
        let bytes = render_card(&profile(ProfileStatus::Ok), &Background::Gradient)
            .expect("render succeeds");
        let decoded = image::load_from_memory(&bytes).expect("valid PNG").to_rgba8();
        let outside = decoded.get_pixel(CARD_WIDTH / 2, 10).0;
        let inside = decoded.get_pixel(CARD_WIDTH / 2, MARGIN + 20).0;
        assert!(inside[0] < outside[0] || inside[2] < outside[2]);
    }
}
