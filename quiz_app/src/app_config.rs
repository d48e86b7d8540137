//! Application configuration for the headless quiz viewer

use serde::{Deserialize, Serialize};
use text_render::prelude::*;

/// Everything the viewer reads from its config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Virtual viewport the draw plan is laid out for
    pub viewport: (u32, u32),
    /// Text renderer settings
    pub renderer: TextRendererConfig,
    /// Question set
    pub quiz: QuizConfig,
    /// Where the baked atlas is written
    pub atlas_png_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            viewport: (800, 600),
            renderer: TextRendererConfig::default(),
            quiz: QuizConfig::default(),
            atlas_png_path: "target/font_atlas.png".to_string(),
        }
    }
}

impl Config for AppConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let text = r#"
log_level = "debug"

[renderer]
font_path = "fonts/mono.ttf"
font_size = 24.0
"#;
        let config = AppConfig::from_str_as(text, ConfigFormat::Toml).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.renderer.font_path, "fonts/mono.ttf");
        assert_eq!(config.renderer.atlas_width, 512);
        assert_eq!(config.quiz.questions.len(), 5);
        assert_eq!(config.viewport, (800, 600));
    }
}
