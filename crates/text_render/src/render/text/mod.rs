//! Atlas text rendering
//!
//! Glyphs are baked once into a single-channel atlas, strings are laid out as
//! textured quads in pixel space, and draws are batched so a frame's text costs
//! one vertex upload and one bind.

pub mod backend;
pub mod batch;
pub mod error;
pub mod font_atlas;
pub mod rasterizer;
pub mod recording;
pub mod render_state;
pub mod text_layout;
pub mod text_renderer;

pub use backend::{TextColor, TextRenderBackend};
pub use batch::{BatchEntry, BatchState, TextBatch};
pub use error::{TextError, TextResult};
pub use font_atlas::{AtlasBitmap, AtlasBuilder, FontAtlas, GlyphMetrics, GlyphTable};
pub use rasterizer::{FontdueRasterizer, GlyphRasterizer, RasterizedGlyph};
pub use recording::{DrawCommand, RecordingBackend};
pub use render_state::TextRenderState;
pub use text_layout::{layout_text, measure_text, TextVertex};
pub use text_renderer::TextRenderer;
