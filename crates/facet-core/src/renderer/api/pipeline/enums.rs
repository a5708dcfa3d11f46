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

//! Enums for rasterizer configuration.

use serde::{Deserialize, Serialize};

/// Defines which face of a triangle to cull (not render).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CullMode {
    /// No culling is performed.
    #[default]
    None,
    /// Cull front-facing triangles.
    Front,
    /// Cull back-facing triangles.
    Back,
}

impl CullMode {
    /// Returns the opposite culling mode, used for mirrored rendering.
    ///
    /// `None` has no inverted counterpart.
    pub fn inverted(self) -> Option<CullMode> {
        match self {
            CullMode::None => None,
            CullMode::Front => Some(CullMode::Back),
            CullMode::Back => Some(CullMode::Front),
        }
    }
}

/// Defines which vertex winding order considers a triangle to be "front-facing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrontFace {
    /// Counter-clockwise winding order is the front face (e.g., OpenGL default).
    #[default]
    Ccw,
    /// Clockwise winding order is the front face (e.g., DirectX default).
    Cw,
}

/// Defines how polygons are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PolygonMode {
    /// Polygons are filled. This is the normal rendering mode.
    #[default]
    Fill,
    /// Polygons are rendered as outlines (wireframe).
    Line,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_swaps_front_and_back() {
        assert_eq!(CullMode::Back.inverted(), Some(CullMode::Front));
        assert_eq!(CullMode::Front.inverted(), Some(CullMode::Back));
        assert_eq!(CullMode::None.inverted(), None);
    }
}
