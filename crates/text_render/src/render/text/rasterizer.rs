//! Glyph rasterization
//!
//! The atlas builder only sees the [`GlyphRasterizer`] trait. [`FontdueRasterizer`]
//! is the real implementation backed by `fontdue`.

use std::path::Path;
use fontdue::{Font, FontSettings};

use super::error::{TextError, TextResult};

/// Coverage bitmap and metrics of one glyph at the rasterizer's size
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizedGlyph {
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Pen position to bitmap left edge, in pixels
    pub bearing_left: i32,
    /// Baseline to bitmap top edge, in pixels, y-down (negative above the baseline)
    pub bearing_top: i32,
    /// Horizontal pen advance in pixels
    pub advance: f32,
    /// Row-major 8-bit coverage, `width * height` bytes
    pub coverage: Vec<u8>,
}

/// Source of glyph bitmaps at a fixed pixel size
pub trait GlyphRasterizer {
    /// Rasterize a single character
    fn rasterize(&self, ch: char) -> RasterizedGlyph;
}

/// `fontdue`-backed rasterizer for TrueType/OpenType fonts
pub struct FontdueRasterizer {
    font: Font,
    pixel_height: f32,
    em_size: f32,
}

impl FontdueRasterizer {
    /// Parse font bytes and fix the rasterization height
    ///
    /// `pixel_height` is the distance from the ascender to the descender in
    /// pixels, not the em size.
    pub fn from_bytes(font_data: &[u8], pixel_height: f32) -> TextResult<Self> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| TextError::FontParse(format!("fontdue error: {}", e)))?;

        let em_size = em_size_for_pixel_height(&font, pixel_height);
        log::debug!(
            "Font parsed: {} glyphs, {}px height -> {:.2}px em",
            font.glyph_count(),
            pixel_height,
            em_size
        );

        Ok(Self {
            font,
            pixel_height,
            em_size,
        })
    }

    /// Read and parse a font file
    pub fn from_file<P: AsRef<Path>>(path: P, pixel_height: f32) -> TextResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| TextError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes, pixel_height)
    }

    /// Requested ascender-to-descender height
    pub fn pixel_height(&self) -> f32 {
        self.pixel_height
    }

    /// Em size passed to `fontdue`
    pub fn em_size(&self) -> f32 {
        self.em_size
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn rasterize(&self, ch: char) -> RasterizedGlyph {
        let (metrics, coverage) = self.font.rasterize(ch, self.em_size);

        // fontdue measures ymin upwards from the baseline to the bitmap bottom
        let bearing_top = -(metrics.ymin + metrics.height as i32);

        RasterizedGlyph {
            width: metrics.width as u32,
            height: metrics.height as u32,
            bearing_left: metrics.xmin,
            bearing_top,
            advance: metrics.advance_width,
            coverage,
        }
    }
}

fn em_size_for_pixel_height(font: &Font, pixel_height: f32) -> f32 {
    match font.horizontal_line_metrics(1.0) {
        Some(line) if line.ascent - line.descent > 0.0 => {
            pixel_height / (line.ascent - line.descent)
        }
        _ => pixel_height,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Deterministic glyph shapes derived from the code point
    pub(crate) struct BlockRasterizer {
        pub(crate) scale: u32,
    }

    impl BlockRasterizer {
        pub(crate) fn new() -> Self {
            Self { scale: 1 }
        }
    }

    impl GlyphRasterizer for BlockRasterizer {
        fn rasterize(&self, ch: char) -> RasterizedGlyph {
            if ch == ' ' {
                return RasterizedGlyph {
                    width: 0,
                    height: 0,
                    bearing_left: 0,
                    bearing_top: 0,
                    advance: 4.0 * self.scale as f32,
                    coverage: Vec::new(),
                };
            }

            let code = ch as u32;
            let width = (3 + code % 7) * self.scale;
            let height = (6 + code % 5) * self.scale;
            RasterizedGlyph {
                width,
                height,
                bearing_left: 1,
                bearing_top: -(height as i32),
                advance: (width + 2) as f32,
                coverage: vec![(code as u8) | 0x80; (width * height) as usize],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_font_bytes_rejected() {
        let result = FontdueRasterizer::from_bytes(&[0u8; 16], 32.0);
        assert!(matches!(result, Err(TextError::FontParse(_))));
    }

    #[test]
    fn test_missing_font_file() {
        let result = FontdueRasterizer::from_file("no/such/font.ttf", 32.0);
        match result {
            Err(TextError::FontRead { path, source }) => {
                assert_eq!(path, Path::new("no/such/font.ttf"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("expected FontRead error"),
        }
    }
}
