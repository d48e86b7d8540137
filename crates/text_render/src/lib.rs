//! # Text Render
//!
//! Atlas-based text rendering for Vulkan, plus the quiz session tracker the
//! demo application displays with it.
//!
//! ## Overview
//!
//! - **Atlas baking**: printable ASCII is rasterized once with `fontdue` and
//!   shelf-packed into a single R8 texture
//! - **Layout**: strings become two triangles per glyph in pixel space
//! - **Batching**: `begin_batch`/`add_text`/`end_batch` costs one upload and
//!   one bind, then one push constant and draw per string
//! - **Backends**: [`TextRenderState`] records Vulkan commands,
//!   [`RecordingBackend`] records a command log for tests and headless runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use text_render::prelude::*;
//! # fn frame(context: &DeviceContext, render_pass: ash::vk::RenderPass,
//! #          cmd: ash::vk::CommandBuffer) -> TextResult<()> {
//! let config = TextRendererConfig::new("resources/fonts/font.ttf");
//! let mut text = TextRenderer::initialize(context, &config)?;
//! text.create_pipeline(render_pass, ash::vk::Extent2D { width: 800, height: 600 })?;
//!
//! text.begin_batch();
//! text.add_text("Hello", 20.0, 40.0, 1.0, TextColor::WHITE);
//! text.end_batch(cmd)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`TextRenderState`]: render::text::TextRenderState
//! [`RecordingBackend`]: render::text::RecordingBackend

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod quiz;
pub mod render;

/// Common imports
pub mod prelude {
    pub use crate::config::{Config, ConfigError, ConfigFormat};
    pub use crate::core::config::{ShaderConfig, TextRendererConfig};
    pub use crate::foundation::logging;
    pub use crate::quiz::{QuizConfig, QuizError, QuizQuestion, QuizSession};
    pub use crate::render::text::{
        AtlasBuilder, BatchState, DrawCommand, FontAtlas, FontdueRasterizer, GlyphRasterizer,
        RecordingBackend, TextColor, TextError, TextRenderBackend, TextRenderer, TextResult,
        TextVertex,
    };
    pub use crate::render::vulkan::{DeviceContext, VulkanError, VulkanResult};
}
