use serde::Deserialize;
use std::path::Path;

use crate::{LumeError, LumeResult};

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LumeConfig {
    pub window: WindowConfig,
    pub renderer: RendererConfig,
    pub mesh: MeshConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "LumeVisual".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Run every frame once more with rasterization discarded, timing the geometry work.
    pub measure_gpu_time: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            measure_gpu_time: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub scale_to_unit_box: bool,
}

impl LumeConfig {
    pub fn from_toml_str(source: &str) -> LumeResult<Self> {
        toml::from_str(source).map_err(|e| LumeError::ConfigLoadFailed(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> LumeResult<Self> {
        let source = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            LumeError::ConfigLoadFailed(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = LumeConfig::from_toml_str("").unwrap();
        assert_eq!(config, LumeConfig::default());
        assert!(config.renderer.measure_gpu_time);
        assert!(!config.mesh.scale_to_unit_box);
    }

    #[test]
    fn partial_sections_are_merged_with_defaults() {
        let config = LumeConfig::from_toml_str(
            r#"
            [window]
            title = "Viewer"

            [mesh]
            scale_to_unit_box = true
            "#,
        )
        .unwrap();
        assert_eq!(config.window.title, "Viewer");
        assert_eq!(config.window.width, 1280);
        assert!(config.mesh.scale_to_unit_box);
    }

    #[test]
    fn malformed_document_is_rejected() {
        let err = LumeConfig::from_toml_str("[window\nwidth = ").unwrap_err();
        assert!(matches!(err, LumeError::ConfigLoadFailed(_)));
    }
}
