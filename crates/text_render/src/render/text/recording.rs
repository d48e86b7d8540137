//! Command-log backend
//!
//! Records what the batch renderer asked for without a GPU. The headless app
//! prints this log as its draw plan.

use ash::vk;

use super::backend::{TextColor, TextRenderBackend};
use super::error::{check_vertex_capacity, TextResult};
use super::text_layout::TextVertex;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Vertex buffer overwritten
    Upload {
        /// Vertices uploaded
        vertex_count: usize,
    },
    /// Pipeline, descriptor set and vertex buffer bound
    Bind,
    /// Color push constant updated
    PushColor(TextColor),
    /// Vertex range drawn
    Draw {
        /// Vertices drawn
        vertex_count: u32,
        /// First vertex of the range
        first_vertex: u32,
    },
}

/// Backend that logs calls into a `Vec<DrawCommand>`
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    capacity: usize,
    commands: Vec<DrawCommand>,
    vertices: Vec<TextVertex>,
}

impl RecordingBackend {
    /// Backend accepting uploads of up to `capacity` vertices
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            commands: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Calls recorded so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Contents of the last successful upload
    pub fn vertices(&self) -> &[TextVertex] {
        &self.vertices
    }

    /// Forget recorded calls, keeping the last upload
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of draw calls recorded
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Draw { .. }))
            .count()
    }
}

impl TextRenderBackend for RecordingBackend {
    fn vertex_capacity(&self) -> usize {
        self.capacity
    }

    fn upload_vertices(&mut self, vertices: &[TextVertex]) -> TextResult<()> {
        check_vertex_capacity(vertices.len(), self.capacity)?;
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        self.commands.push(DrawCommand::Upload { vertex_count: vertices.len() });
        Ok(())
    }

    fn bind(&mut self, _command_buffer: vk::CommandBuffer) -> TextResult<()> {
        self.commands.push(DrawCommand::Bind);
        Ok(())
    }

    fn push_color(&mut self, _command_buffer: vk::CommandBuffer, color: TextColor) {
        self.commands.push(DrawCommand::PushColor(color));
    }

    fn draw(&mut self, _command_buffer: vk::CommandBuffer, vertex_count: u32, first_vertex: u32) {
        self.commands.push(DrawCommand::Draw { vertex_count, first_vertex });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::text::error::TextError;

    #[test]
    fn test_upload_over_capacity_leaves_log_untouched() {
        let mut backend = RecordingBackend::new(6);
        backend.upload_vertices(&[TextVertex::new(0.0, 0.0, 0.0, 0.0); 6]).unwrap();

        let err = backend
            .upload_vertices(&[TextVertex::new(1.0, 1.0, 0.0, 0.0); 7])
            .unwrap_err();
        assert!(matches!(err, TextError::CapacityExceeded { requested: 7, capacity: 6 }));
        assert_eq!(backend.commands(), &[DrawCommand::Upload { vertex_count: 6 }]);
        assert_eq!(backend.vertices()[0].position, [0.0, 0.0]);
    }
}
