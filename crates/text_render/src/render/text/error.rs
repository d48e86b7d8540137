//! Text renderer error types

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::render::vulkan::VulkanError;

/// Errors raised while baking, uploading or drawing text
#[derive(Error, Debug)]
pub enum TextError {
    /// Font file could not be read
    #[error("Failed to read font {}: {source}", path.display())]
    FontRead {
        /// Font file path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Font bytes are not a usable font
    #[error("Failed to parse font: {0}")]
    FontParse(String),

    /// Shelf packing ran out of atlas space
    #[error("Glyph U+{code_point:04X} does not fit in the {atlas_width}x{atlas_height} atlas")]
    AtlasFull {
        /// Code point that did not fit
        code_point: u32,
        /// Atlas width in texels
        atlas_width: u32,
        /// Atlas height in texels
        atlas_height: u32,
    },

    /// A GPU object could not be created
    #[error("Failed to create {resource}: {source}")]
    ResourceCreation {
        /// Which resource failed
        resource: &'static str,
        /// Underlying Vulkan error
        source: VulkanError,
    },

    /// SPIR-V file missing or malformed
    #[error("Failed to load shader {path}: {reason}")]
    ShaderLoad {
        /// Shader file path
        path: String,
        /// What went wrong
        reason: String,
    },

    /// Vertex upload larger than the vertex buffer
    #[error("Vertex upload of {requested} vertices exceeds capacity of {capacity}")]
    CapacityExceeded {
        /// Vertices in the rejected upload
        requested: usize,
        /// Vertex buffer capacity
        capacity: usize,
    },

    /// Draw recorded before `create_pipeline`
    #[error("Text pipeline has not been created")]
    PipelineMissing,

    /// Configuration rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for text rendering operations
pub type TextResult<T> = Result<T, TextError>;

impl TextError {
    /// Wrap a Vulkan failure with the name of the resource being created
    pub fn resource(resource: &'static str) -> impl FnOnce(VulkanError) -> Self {
        move |source| Self::ResourceCreation { resource, source }
    }
}

/// Reject uploads over `capacity` before any memory is touched
pub fn check_vertex_capacity(requested: usize, capacity: usize) -> TextResult<()> {
    if requested > capacity {
        return Err(TextError::CapacityExceeded { requested, capacity });
    }
    Ok(())
}
