//! Batch state machine
//!
//! Text added between `begin` and `submit` is concatenated into one vertex
//! upload, bound once, and drawn as one range per entry with its own color.

use ash::vk;

use super::backend::{TextColor, TextRenderBackend};
use super::error::{check_vertex_capacity, TextResult};
use super::text_layout::TextVertex;

/// Whether a batch is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// No batch open
    Idle,
    /// Entries are being collected
    Batching,
}

/// One piece of laid-out text waiting for submission
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    /// Glyph quads in pixel space
    pub vertices: Vec<TextVertex>,
    /// Color for the whole entry
    pub color: TextColor,
}

/// Pending entries plus the open/closed state
#[derive(Debug)]
pub struct TextBatch {
    state: BatchState,
    entries: Vec<BatchEntry>,
}

impl TextBatch {
    /// Idle batch with no entries
    pub fn new() -> Self {
        Self {
            state: BatchState::Idle,
            entries: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Entries collected since the last `begin`
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Open a batch, dropping anything not yet submitted
    pub fn begin(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("Discarding {} unsubmitted text entries", self.entries.len());
        }
        self.entries.clear();
        self.state = BatchState::Batching;
    }

    /// Queue laid-out text; opens a batch if none is open
    pub fn push(&mut self, vertices: Vec<TextVertex>, color: TextColor) {
        if self.state == BatchState::Idle {
            log::debug!("Text added outside a batch, starting one");
            self.begin();
        }
        if vertices.is_empty() {
            return;
        }
        self.entries.push(BatchEntry { vertices, color });
    }

    /// Close the batch and record it against `backend`
    ///
    /// Entries are consumed whether or not the upload succeeds. An empty batch
    /// makes no backend calls.
    pub fn submit<B: TextRenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        command_buffer: vk::CommandBuffer,
    ) -> TextResult<()> {
        self.state = BatchState::Idle;
        let entries = std::mem::take(&mut self.entries);
        if entries.is_empty() {
            return Ok(());
        }

        let total: usize = entries.iter().map(|entry| entry.vertices.len()).sum();
        if let Err(err) = check_vertex_capacity(total, backend.vertex_capacity()) {
            log::warn!("Dropping text batch: {}", err);
            return Err(err);
        }

        let mut vertices = Vec::with_capacity(total);
        for entry in &entries {
            vertices.extend_from_slice(&entry.vertices);
        }
        backend.upload_vertices(&vertices)?;
        backend.bind(command_buffer)?;

        let mut first_vertex = 0u32;
        for entry in &entries {
            let vertex_count = entry.vertices.len() as u32;
            backend.push_color(command_buffer, entry.color);
            backend.draw(command_buffer, vertex_count, first_vertex);
            first_vertex += vertex_count;
        }

        log::debug!(
            "Submitted text batch: {} entries, {} vertices",
            entries.len(),
            total
        );
        Ok(())
    }
}

impl Default for TextBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Record a single colored draw outside of any batch
pub fn record_immediate<B: TextRenderBackend + ?Sized>(
    backend: &mut B,
    command_buffer: vk::CommandBuffer,
    vertices: &[TextVertex],
    color: TextColor,
) -> TextResult<()> {
    if vertices.is_empty() {
        return Ok(());
    }
    if let Err(err) = check_vertex_capacity(vertices.len(), backend.vertex_capacity()) {
        log::warn!("Dropping text draw: {}", err);
        return Err(err);
    }
    backend.upload_vertices(vertices)?;
    backend.bind(command_buffer)?;
    backend.push_color(command_buffer, color);
    backend.draw(command_buffer, vertices.len() as u32, 0);
    Ok(())
}
