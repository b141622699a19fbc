use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgba, RgbaImage};
use staging::ImageData;
use tracing::debug;

use crate::ExportError;

/// Custom watermark text is capped at this many characters, matching the
/// export form's input limit.
pub const MAX_CUSTOM_WATERMARK_CHARS: usize = 100;

const GLYPH_SIZE: u32 = 8;
const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 128]);
const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 96]);

/// Provenance text composited onto exported images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkMode {
    VirtuallyStaged,
    DigitallyEnhanced,
    Custom(String),
}

impl WatermarkMode {
    /// Custom text, truncated to [`MAX_CUSTOM_WATERMARK_CHARS`].
    pub fn custom(text: impl Into<String>) -> Self {
        let text: String = text.into();
        WatermarkMode::Custom(text.chars().take(MAX_CUSTOM_WATERMARK_CHARS).collect())
    }

    pub fn text(&self) -> &str {
        match self {
            WatermarkMode::VirtuallyStaged => "Virtually Staged",
            WatermarkMode::DigitallyEnhanced => "Digitally Enhanced",
            WatermarkMode::Custom(text) => text,
        }
    }
}

/// Composite the watermark bottom-right onto the image and re-encode as PNG.
///
/// Sizing follows the export dialog: font height is 3% of the image width
/// with a 24 px floor, padding is 4% of the width on both axes, text is
/// uppercased and drawn semi-transparent over a soft shadow pass.
pub fn apply_watermark(image: &ImageData, mode: &WatermarkMode) -> Result<ImageData, ExportError> {
    let bytes = image.decode()?;
    let decoded = image::load_from_memory(&bytes)?;
    let mut canvas = decoded.to_rgba8();

    let text = mode.text().to_uppercase();
    if !text.is_empty() {
        let width = canvas.width();
        let font_px = ((width as f32 * 0.03).floor() as u32).max(24);
        let scale = (font_px / GLYPH_SIZE).max(1);
        let pad = (width as f32 * 0.04).floor() as i32;

        let text_w = text.chars().count() as i32 * (GLYPH_SIZE * scale) as i32;
        let x = canvas.width() as i32 - pad - text_w;
        let y = canvas.height() as i32 - pad - (GLYPH_SIZE * scale) as i32;

        let shadow_offset = (scale as i32).max(2);
        draw_text(&mut canvas, x, y + shadow_offset, &text, SHADOW_COLOR, scale);
        draw_text(&mut canvas, x, y, &text, TEXT_COLOR, scale);
        debug!(%text, font_px, "composited watermark");
    }

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(canvas)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)?;
    Ok(ImageData::from_bytes("image/png", &out))
}

fn blend_pixel(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let a = f32::from(src[3]) / 255.0;
    if a <= 0.0 {
        return dst;
    }
    let inv = 1.0 - a;
    let mix = |d: u8, s: u8| (f32::from(d) * inv + f32::from(s) * a).round().clamp(0.0, 255.0) as u8;
    Rgba([
        mix(dst[0], src[0]),
        mix(dst[1], src[1]),
        mix(dst[2], src[2]),
        (f32::from(dst[3]) + f32::from(src[3]) * inv)
            .round()
            .clamp(0.0, 255.0) as u8,
    ])
}

/// Stamp scaled 8x8 bitmap glyphs onto the canvas, clipping at the borders.
fn draw_text(img: &mut RgbaImage, x: i32, y: i32, text: &str, color: Rgba<u8>, scale: u32) {
    let scale = scale.max(1) as i32;
    let mut cursor_x = x;
    for ch in text.chars() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            cursor_x += GLYPH_SIZE as i32 * scale;
            continue;
        };
        for (row_idx, row) in glyph.iter().enumerate() {
            let row_bits = *row;
            for col_idx in 0..8 {
                if (row_bits >> col_idx) & 1 == 0 {
                    continue;
                }
                let px = cursor_x + col_idx * scale;
                let py = y + row_idx as i32 * scale;
                for sy in 0..scale {
                    for sx in 0..scale {
                        let tx = px + sx;
                        let ty = py + sy;
                        if tx >= 0
                            && ty >= 0
                            && tx < img.width() as i32
                            && ty < img.height() as i32
                        {
                            let dst = *img.get_pixel(tx as u32, ty as u32);
                            img.put_pixel(tx as u32, ty as u32, blend_pixel(dst, color));
                        }
                    }
                }
            }
        }
        cursor_x += GLYPH_SIZE as i32 * scale;
    }
}
