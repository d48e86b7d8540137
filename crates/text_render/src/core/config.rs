//! # Text Renderer Configuration
//!
//! Settings consumed once by `TextRenderer::initialize`: which font to bake, at
//! what pixel height, into how large an atlas, how many vertices a single
//! upload may carry, and where the compiled shaders live.

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use crate::config::{Config, ConfigError};

/// Default vertex shader file name produced by the build script
pub const DEFAULT_VERTEX_SHADER: &str = "text_vert.spv";
/// Default fragment shader file name produced by the build script
pub const DEFAULT_FRAGMENT_SHADER: &str = "text_frag.spv";

/// # Shader Configuration
///
/// Paths to the two SPIR-V binaries of the text pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// Path to the vertex shader SPIR-V file
    pub vertex_shader_path: String,
    /// Path to the fragment shader SPIR-V file
    pub fragment_shader_path: String,
}

impl ShaderConfig {
    /// Create a new shader configuration
    pub fn new(vertex_path: impl Into<String>, fragment_path: impl Into<String>) -> Self {
        Self {
            vertex_shader_path: vertex_path.into(),
            fragment_shader_path: fragment_path.into(),
        }
    }

    /// Create shader config with automatic path resolution
    ///
    /// Tries the usual output and source directories so binaries work from the
    /// workspace root as well as from a crate directory.
    pub fn with_path_resolution(base_vertex: &str, base_fragment: &str) -> Self {
        let shader_dirs = [
            "target/shaders/",
            "../../target/shaders/",
            "shaders/",
            "resources/shaders/",
            "./",
        ];

        let find = |file: &str| {
            shader_dirs
                .iter()
                .map(|dir| format!("{}{}", dir, file))
                .find(|candidate| Path::new(candidate).exists())
                .unwrap_or_else(|| format!("target/shaders/{}", file))
        };

        Self {
            vertex_shader_path: find(base_vertex),
            fragment_shader_path: find(base_fragment),
        }
    }

    /// Validate that shader files exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !Path::new(&self.vertex_shader_path).exists() {
            return Err(ConfigError::Invalid(format!(
                "Vertex shader not found: {}",
                self.vertex_shader_path
            )));
        }
        if !Path::new(&self.fragment_shader_path).exists() {
            return Err(ConfigError::Invalid(format!(
                "Fragment shader not found: {}",
                self.fragment_shader_path
            )));
        }
        Ok(())
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self::with_path_resolution(DEFAULT_VERTEX_SHADER, DEFAULT_FRAGMENT_SHADER)
    }
}

/// # Text Renderer Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRendererConfig {
    /// TrueType/OpenType font file baked into the atlas
    pub font_path: String,
    /// Ascender-to-descender height in pixels
    pub font_size: f32,
    /// Atlas width in texels
    pub atlas_width: u32,
    /// Atlas height in texels
    pub atlas_height: u32,
    /// Vertex buffer capacity, in vertices
    pub max_vertices: usize,
    /// Shader binaries
    pub shaders: ShaderConfig,
}

impl TextRendererConfig {
    /// Create a configuration for `font_path` with default sizes
    pub fn new(font_path: impl Into<String>) -> Self {
        Self {
            font_path: font_path.into(),
            font_size: 32.0,
            atlas_width: 512,
            atlas_height: 512,
            max_vertices: 10_000,
            shaders: ShaderConfig::default(),
        }
    }

    /// Set the pixel height glyphs are baked at
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set atlas dimensions
    pub fn with_atlas_size(mut self, width: u32, height: u32) -> Self {
        self.atlas_width = width;
        self.atlas_height = height;
        self
    }

    /// Set vertex buffer capacity
    pub fn with_max_vertices(mut self, max_vertices: usize) -> Self {
        self.max_vertices = max_vertices;
        self
    }

    /// Set custom shader configuration
    pub fn with_shaders(mut self, shaders: ShaderConfig) -> Self {
        self.shaders = shaders;
        self
    }

    /// Validate sizes without touching the filesystem
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.font_path.is_empty() {
            return Err(ConfigError::Invalid("Font path cannot be empty".to_string()));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "Font size must be positive, got {}",
                self.font_size
            )));
        }
        if self.atlas_width == 0 || self.atlas_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Atlas size must be non-zero, got {}x{}",
                self.atlas_width, self.atlas_height
            )));
        }
        if self.max_vertices == 0 {
            return Err(ConfigError::Invalid(
                "Max vertices must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate sizes and check that the font and shader files exist
    pub fn validate_files(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if !Path::new(&self.font_path).exists() {
            return Err(ConfigError::Invalid(format!("Font not found: {}", self.font_path)));
        }
        self.shaders.validate()
    }
}

impl Default for TextRendererConfig {
    fn default() -> Self {
        Self::new("resources/fonts/font.ttf")
    }
}

impl Config for TextRendererConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    fn sample() -> TextRendererConfig {
        TextRendererConfig::new("fonts/mono.ttf")
            .with_font_size(24.0)
            .with_atlas_size(256, 128)
            .with_max_vertices(600)
            .with_shaders(ShaderConfig::new("v.spv", "f.spv"))
    }

    #[test]
    fn test_defaults() {
        let config = TextRendererConfig::new("font.ttf");
        assert_eq!(config.font_size, 32.0);
        assert_eq!((config.atlas_width, config.atlas_height), (512, 512));
        assert_eq!(config.max_vertices, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = sample();
        let text = config.to_string_as(ConfigFormat::Toml).unwrap();
        let parsed = TextRendererConfig::from_str_as(&text, ConfigFormat::Toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = sample();
        let text = config.to_string_as(ConfigFormat::Ron).unwrap();
        let parsed = TextRendererConfig::from_str_as(&text, ConfigFormat::Ron).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = TextRendererConfig::from_str_as(
            "font_path = \"a.ttf\"\nmax_vertices = 60\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(parsed.font_path, "a.ttf");
        assert_eq!(parsed.max_vertices, 60);
        assert_eq!(parsed.atlas_width, 512);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(sample().with_font_size(0.0).validate().is_err());
        assert!(sample().with_font_size(f32::NAN).validate().is_err());
        assert!(sample().with_atlas_size(0, 64).validate().is_err());
        assert!(sample().with_max_vertices(0).validate().is_err());
        assert!(TextRendererConfig::new("").validate().is_err());
    }

    #[test]
    fn test_validate_files_reports_missing_font() {
        let config = TextRendererConfig::new("definitely/not/here.ttf");
        let err = config.validate_files().unwrap_err();
        assert!(err.to_string().contains("Font not found"));
    }

    #[test]
    fn test_shader_validate_missing() {
        let shaders = ShaderConfig::new("missing_vert.spv", "missing_frag.spv");
        assert!(shaders.validate().is_err());
    }
}
