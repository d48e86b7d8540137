//! Text renderer facade
//!
//! Owns the glyph table, the batch state and a [`TextRenderBackend`]. With the
//! Vulkan backend it is created by [`TextRenderer::initialize`]; any other
//! backend goes through [`TextRenderer::with_backend`].

use ash::vk;

use crate::core::config::TextRendererConfig;
use crate::render::vulkan::DeviceContext;

use super::backend::{TextColor, TextRenderBackend};
use super::batch::{record_immediate, BatchState, TextBatch};
use super::error::TextResult;
use super::font_atlas::{AtlasBuilder, FontAtlas, GlyphTable};
use super::rasterizer::FontdueRasterizer;
use super::render_state::TextRenderState;
use super::text_layout::{layout_text, measure_text};

/// Atlas-based text renderer
pub struct TextRenderer<B: TextRenderBackend = TextRenderState> {
    glyphs: GlyphTable,
    atlas_size: (u32, u32),
    batch: TextBatch,
    backend: B,
}

impl TextRenderer<TextRenderState> {
    /// Bake the configured font and create all GPU resources except the pipeline
    ///
    /// The CPU copy of the atlas is released once it has been uploaded.
    pub fn initialize(context: &DeviceContext, config: &TextRendererConfig) -> TextResult<Self> {
        config.validate()?;

        let rasterizer = FontdueRasterizer::from_file(&config.font_path, config.font_size)?;
        let FontAtlas { glyphs, bitmap } =
            AtlasBuilder::new(config.atlas_width, config.atlas_height).build(&rasterizer)?;

        let state = TextRenderState::new(
            context,
            &bitmap,
            config.max_vertices,
            config.shaders.clone(),
        )?;

        Ok(Self::with_backend(
            glyphs,
            (bitmap.width(), bitmap.height()),
            state,
        ))
    }

    /// (Re)build the pipeline for `render_pass` at `extent`
    pub fn create_pipeline(
        &mut self,
        render_pass: vk::RenderPass,
        extent: vk::Extent2D,
    ) -> TextResult<()> {
        self.backend.create_pipeline(render_pass, extent)
    }

    /// Release all GPU resources; later draws fail with `PipelineMissing`
    pub fn teardown(&mut self) {
        self.backend.teardown();
    }
}

impl<B: TextRenderBackend> TextRenderer<B> {
    /// Renderer over an already baked glyph table
    pub fn with_backend(glyphs: GlyphTable, atlas_size: (u32, u32), backend: B) -> Self {
        Self {
            glyphs,
            atlas_size,
            batch: TextBatch::new(),
            backend,
        }
    }

    /// Renderer sharing the glyphs of `atlas`
    pub fn from_atlas(atlas: &FontAtlas, backend: B) -> Self {
        Self::with_backend(atlas.glyphs.clone(), atlas.size(), backend)
    }

    /// Draw one string immediately
    ///
    /// Uses the vertex buffer on its own, so it must not be mixed with a batch
    /// inside the same submission. An open batch is left as it is.
    pub fn render_text(
        &mut self,
        command_buffer: vk::CommandBuffer,
        text: &str,
        x: f32,
        y: f32,
        scale: f32,
        color: TextColor,
    ) -> TextResult<()> {
        let vertices = layout_text(&self.glyphs, self.atlas_size, text, x, y, scale);
        record_immediate(&mut self.backend, command_buffer, &vertices, color)
    }

    /// Start collecting text, discarding anything not yet submitted
    pub fn begin_batch(&mut self) {
        self.batch.begin();
    }

    /// Queue a string for the current batch
    pub fn add_text(&mut self, text: &str, x: f32, y: f32, scale: f32, color: TextColor) {
        let vertices = layout_text(&self.glyphs, self.atlas_size, text, x, y, scale);
        self.batch.push(vertices, color);
    }

    /// Upload and record everything queued since `begin_batch`
    pub fn end_batch(&mut self, command_buffer: vk::CommandBuffer) -> TextResult<()> {
        self.batch.submit(&mut self.backend, command_buffer)
    }

    /// Current batch state
    pub fn batch_state(&self) -> BatchState {
        self.batch.state()
    }

    /// Width of `text` at `scale`, in pixels
    pub fn measure_text(&self, text: &str, scale: f32) -> f32 {
        measure_text(&self.glyphs, text, scale)
    }

    /// Baked glyphs
    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    /// Atlas dimensions as `(width, height)`
    pub fn atlas_size(&self) -> (u32, u32) {
        self.atlas_size
    }

    /// Backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
