//! Text Render Backend Trait
//!
//! The batch logic only talks to this interface. [`TextRenderState`] records
//! real Vulkan commands; [`RecordingBackend`] keeps a command log instead.
//!
//! [`TextRenderState`]: super::render_state::TextRenderState
//! [`RecordingBackend`]: super::recording::RecordingBackend

use ash::vk;
use bytemuck::{Pod, Zeroable};

use super::error::TextResult;
use super::text_layout::TextVertex;

/// RGBA text color, pushed to the fragment stage as 16 bytes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TextColor {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl TextColor {
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a color from components in `0.0..=1.0`
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Components as an array
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for TextColor {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

/// Backend-agnostic text drawing interface
///
/// Calls arrive in the order upload, bind, then any number of
/// push-color/draw pairs, all against the same command buffer.
pub trait TextRenderBackend {
    /// Vertices one upload may carry
    fn vertex_capacity(&self) -> usize;

    /// Replace the vertex buffer contents
    ///
    /// Must fail with `CapacityExceeded` before writing anything when
    /// `vertices.len()` exceeds [`vertex_capacity`](Self::vertex_capacity).
    fn upload_vertices(&mut self, vertices: &[TextVertex]) -> TextResult<()>;

    /// Bind pipeline, atlas descriptor set and vertex buffer
    fn bind(&mut self, command_buffer: vk::CommandBuffer) -> TextResult<()>;

    /// Set the color for following draws
    fn push_color(&mut self, command_buffer: vk::CommandBuffer, color: TextColor);

    /// Draw `vertex_count` vertices starting at `first_vertex`
    fn draw(&mut self, command_buffer: vk::CommandBuffer, vertex_count: u32, first_vertex: u32);
}
