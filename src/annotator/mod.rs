pub mod font;

use crate::quality_label::QualityLabel;
use font::{GLYPH_HEIGHT, GLYPH_SPACING, GLYPH_WIDTH};
use image::{Rgb, RgbImage};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub text_color: Rgb<u8>,
    pub background_color: Rgb<u8>,
    /// 0.0 leaves the photo untouched under the banner, 1.0 paints it solid.
    pub background_opacity: f32,
    /// Glyph height relative to the image height.
    pub text_height_ratio: f32,
    /// Distance from the top-left corner relative to the shorter image side.
    pub margin_ratio: f32,
    pub fallback_text: String,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            text_color: Rgb([255, 221, 0]),
            background_color: Rgb([0, 0, 0]),
            background_opacity: 0.6,
            text_height_ratio: 0.06,
            margin_ratio: 0.02,
            fallback_text: "Unknown".to_string(),
        }
    }
}

impl OverlayStyle {
    fn validate(&self) -> Result<(), RenderError> {
        if !(0.0..=1.0).contains(&self.background_opacity) {
            return Err(RenderError::InvalidStyle(format!(
                "background opacity {} is outside 0..=1",
                self.background_opacity
            )));
        }
        if !self.text_height_ratio.is_finite() || self.text_height_ratio <= 0.0 {
            return Err(RenderError::InvalidStyle(format!(
                "text height ratio {} must be positive",
                self.text_height_ratio
            )));
        }
        if !(0.0..0.5).contains(&self.margin_ratio) {
            return Err(RenderError::InvalidStyle(format!(
                "margin ratio {} is outside 0..0.5",
                self.margin_ratio
            )));
        }
        if self.fallback_text.trim().is_empty() {
            return Err(RenderError::InvalidStyle(
                "fallback text is blank".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl OverlayRect {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    pub image: RgbImage,
    /// The text that was drawn, after fallback and truncation.
    pub text: String,
    pub overlay: OverlayRect,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot annotate an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },
    #[error("invalid overlay style: {0}")]
    InvalidStyle(String),
}

struct Layout {
    scale: u32,
    padding: u32,
    visible_glyphs: usize,
    overlay: OverlayRect,
}

fn layout(width: u32, height: u32, glyph_count: u32, style: &OverlayStyle) -> Layout {
    let shorter = width.min(height);
    let margin = (shorter as f32 * style.margin_ratio) as u32;
    let margin = if margin * 2 >= shorter { 0 } else { margin };

    let available_width = width - 2 * margin;
    let available_height = height - 2 * margin;

    // One font unit of padding on each side of the text.
    let target = ((height as f32 * style.text_height_ratio) / GLYPH_HEIGHT as f32)
        .round()
        .max(1.0) as u32;
    let fit_height = available_height / (GLYPH_HEIGHT + 2);
    let fit_width = available_width / (font::line_width(glyph_count) + 2);
    let scale = target.min(fit_height).min(fit_width).max(1);
    let padding = scale;

    let usable = available_width.saturating_sub(2 * padding) / scale;
    let visible = ((usable + GLYPH_SPACING) / (GLYPH_WIDTH + GLYPH_SPACING)).clamp(1, glyph_count);

    Layout {
        scale,
        padding,
        visible_glyphs: visible as usize,
        overlay: OverlayRect {
            x: margin,
            y: margin,
            width: ((font::line_width(visible) + 2) * scale).min(available_width),
            height: ((GLYPH_HEIGHT + 2) * scale).min(available_height),
        },
    }
}

fn blend(under: &Rgb<u8>, over: &Rgb<u8>, opacity: f32) -> Rgb<u8> {
    let mix = |u: u8, o: u8| (o as f32 * opacity + u as f32 * (1.0 - opacity)).round() as u8;
    Rgb([
        mix(under[0], over[0]),
        mix(under[1], over[1]),
        mix(under[2], over[2]),
    ])
}

/// Draws `label` in the top-left corner of a copy of `image`.
pub fn annotate(
    image: &RgbImage,
    label: &QualityLabel,
    style: &OverlayStyle,
) -> Result<AnnotatedImage, RenderError> {
    style.validate()?;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }

    let full_text = label.display_text(&style.fallback_text);
    let glyph_count = full_text.chars().count() as u32;
    let layout = layout(width, height, glyph_count, style);
    let overlay = layout.overlay;

    let mut annotated = image.clone();

    for y in overlay.y..overlay.y + overlay.height {
        for x in overlay.x..overlay.x + overlay.width {
            let pixel = annotated.get_pixel_mut(x, y);
            *pixel = blend(pixel, &style.background_color, style.background_opacity);
        }
    }

    let text: String = full_text.chars().take(layout.visible_glyphs).collect();
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) * layout.scale;

    for (index, c) in text.chars().enumerate() {
        let glyph = font::glyph(c);
        let origin_x = overlay.x + layout.padding + index as u32 * advance;
        let origin_y = overlay.y + layout.padding;

        for column in 0..GLYPH_WIDTH {
            for row in 0..GLYPH_HEIGHT {
                if !font::is_set(&glyph, column, row) {
                    continue;
                }
                for dy in 0..layout.scale {
                    for dx in 0..layout.scale {
                        let x = origin_x + column * layout.scale + dx;
                        let y = origin_y + row * layout.scale + dy;
                        if overlay.contains(x, y) {
                            annotated.put_pixel(x, y, style.text_color);
                        }
                    }
                }
            }
        }
    }

    Ok(AnnotatedImage {
        image: annotated,
        text,
        overlay,
    })
}
