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

//! Per-frame global state consumed read-only by render cores.

/// Which pass of the frame is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderPassKind {
    /// The regular color pass.
    #[default]
    Color,
    /// A depth-only pass rendering into a shadow map.
    Shadow,
}

/// Camera data in the layout the shaders expect.
///
/// Matrices are column-major. The fourth component of `position` is padding.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraData {
    /// World to view space.
    pub view: [[f32; 4]; 4],
    /// View to clip space.
    pub projection: [[f32; 4]; 4],
    /// Camera position in world space.
    pub position: [f32; 4],
}

impl CameraData {
    const IDENTITY: [[f32; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    /// Creates camera data at `position` with the given matrices.
    pub fn new(view: [[f32; 4]; 4], projection: [[f32; 4]; 4], position: [f32; 3]) -> Self {
        Self {
            view,
            projection,
            position: [position[0], position[1], position[2], 0.0],
        }
    }

    /// The data as bytes, ready for a uniform buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for CameraData {
    fn default() -> Self {
        Self {
            view: Self::IDENTITY,
            projection: Self::IDENTITY,
            position: [0.0; 4],
        }
    }
}

/// The type of a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Light coming from one direction, e.g. the sun.
    Directional {
        /// Direction the light travels in.
        direction: [f32; 3],
    },
    /// Light emitted from a point in all directions.
    Point {
        /// Position in world space.
        position: [f32; 3],
        /// Distance at which the light no longer contributes.
        range: f32,
    },
    /// Light emitted from a point in a cone.
    Spot {
        /// Position in world space.
        position: [f32; 3],
        /// Direction the cone points to.
        direction: [f32; 3],
        /// Cosine of the outer cone angle.
        outer_cone_cos: f32,
    },
}

/// One light of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightData {
    /// Type and placement.
    pub kind: LightKind,
    /// Linear color (rgb) and intensity (a).
    pub color: [f32; 4],
    /// If `true`, the light renders a shadow map.
    pub casts_shadow: bool,
}

/// Global state of the pass being rendered.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// The pass being rendered.
    pub pass: RenderPassKind,
    /// The camera of the pass. For a shadow pass this is the light's view.
    pub camera: CameraData,
    /// The lights of the frame.
    pub lights: Vec<LightData>,
    /// If `true`, cores bind their inverted-cull raster state, e.g. for
    /// mirrored rendering.
    pub invert_cull: bool,
    /// Number of the frame being rendered.
    pub frame_number: u64,
}

impl RenderContext {
    /// A color pass context with the given camera.
    pub fn color(camera: CameraData) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    /// A shadow pass context rendering from `camera`.
    pub fn shadow(camera: CameraData) -> Self {
        Self {
            pass: RenderPassKind::Shadow,
            camera,
            ..Default::default()
        }
    }

    /// Returns `true` if any light casts a shadow.
    pub fn has_shadow_casters(&self) -> bool {
        self.lights.iter().any(|light| light.casts_shadow)
    }
}
