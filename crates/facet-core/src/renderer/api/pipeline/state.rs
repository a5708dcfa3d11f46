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

//! Rasterizer state descriptors.

use super::enums::*;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Describes depth biasing, used to prevent z-fighting and shadow acne.
///
/// Equality and hashing compare the float fields bit for bit so the type can
/// serve as a cache key.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DepthBiasState {
    /// A constant value added to the depth of each fragment.
    pub constant: i32,
    /// A factor that scales with the fragment's depth slope.
    pub slope_scale: f32,
    /// The maximum bias that can be applied.
    pub clamp: f32,
}

impl PartialEq for DepthBiasState {
    fn eq(&self, other: &Self) -> bool {
        self.constant == other.constant
            && self.slope_scale.to_bits() == other.slope_scale.to_bits()
            && self.clamp.to_bits() == other.clamp.to_bits()
    }
}

impl Eq for DepthBiasState {}

impl Hash for DepthBiasState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.constant.hash(state);
        self.slope_scale.to_bits().hash(state);
        self.clamp.to_bits().hash(state);
    }
}

/// The full fixed-function rasterizer configuration.
///
/// Immutable once registered with a state cache; structural equality on every
/// field decides whether two descriptors share one GPU state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerStateDescriptor {
    /// The rasterization mode for polygons.
    pub polygon_mode: PolygonMode,
    /// The face culling mode.
    pub cull_mode: CullMode,
    /// The vertex winding order that determines the "front" face of a triangle.
    pub front_face: FrontFace,
    /// Depth bias applied to every fragment.
    pub depth_bias: DepthBiasState,
    /// If `false`, fragments outside the near/far planes are not clipped.
    pub depth_clip_enabled: bool,
    /// If `true`, fragments outside the scissor rectangle are discarded.
    pub scissor_enabled: bool,
    /// If `true`, multisample anti-aliasing is used on MSAA targets.
    pub multisample_enabled: bool,
    /// If `true`, line anti-aliasing is enabled.
    pub antialiased_lines_enabled: bool,
}

impl Default for RasterizerStateDescriptor {
    fn default() -> Self {
        Self {
            polygon_mode: PolygonMode::Fill,
            cull_mode: CullMode::None,
            front_face: FrontFace::Ccw,
            depth_bias: DepthBiasState::default(),
            depth_clip_enabled: true,
            scissor_enabled: false,
            multisample_enabled: false,
            antialiased_lines_enabled: false,
        }
    }
}

impl RasterizerStateDescriptor {
    /// Returns a copy of this descriptor with the given cull mode.
    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    /// Returns the companion descriptor with front and back culling swapped.
    ///
    /// Returns `None` when culling is disabled, since there is nothing to invert.
    pub fn inverted_cull(&self) -> Option<Self> {
        self.cull_mode
            .inverted()
            .map(|cull_mode| self.with_cull_mode(cull_mode))
    }
}

/// An opaque handle to a GPU rasterizer state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterizerStateId(pub usize);
