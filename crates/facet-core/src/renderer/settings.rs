// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Global settings for the rendering system.

use crate::renderer::api::RasterizerStateDescriptor;
use serde::{Deserialize, Serialize};

/// Name of the pass a render core draws with by default.
pub const DEFAULT_PASS_NAME: &str = "Default";
/// Name of the pass a render core uses for shadow-map rendering by default.
pub const SHADOW_PASS_NAME: &str = "RenderShadow";

/// A collection of global settings that affect how frames are driven.
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// If `true`, the frame driver runs a shadow pass before the color pass.
    pub shadows_enabled: bool,
    /// Pass name given to newly created render cores.
    pub default_pass_name: String,
    /// Shadow pass name given to newly created render cores.
    pub shadow_pass_name: String,
    /// Rasterizer description given to newly created render cores.
    pub default_raster: RasterizerStateDescriptor,
    /// If `true`, frames are rendered with inverted culling (mirrored rendering).
    pub invert_cull_mode: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            shadows_enabled: true,
            default_pass_name: DEFAULT_PASS_NAME.to_string(),
            shadow_pass_name: SHADOW_PASS_NAME.to_string(),
            default_raster: RasterizerStateDescriptor::default(),
            invert_cull_mode: false,
        }
    }
}

impl RenderSettings {
    /// Parses settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the settings to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::CullMode;

    #[test]
    fn empty_document_gives_defaults() {
        let settings = RenderSettings::from_json_str("{}").expect("valid json");
        assert_eq!(settings, RenderSettings::default());
        assert_eq!(settings.default_pass_name, "Default");
        assert_eq!(settings.shadow_pass_name, "RenderShadow");
    }

    #[test]
    fn overrides_are_applied() {
        let settings = RenderSettings::from_json_str(
            r#"{ "shadows_enabled": false, "default_raster": { "cull_mode": "Back" } }"#,
        )
        .expect("valid json");
        assert!(!settings.shadows_enabled);
        assert_eq!(settings.default_raster.cull_mode, CullMode::Back);
    }

    #[test]
    fn json_round_trip() {
        let settings = RenderSettings {
            invert_cull_mode: true,
            ..Default::default()
        };
        let json = settings.to_json_string().expect("serializable");
        assert_eq!(RenderSettings::from_json_str(&json).expect("valid json"), settings);
    }
}
